//! Dispatcher: the engine's entry point.
//!
//! A thin facade over the pipelines. Validates the input shape, refuses
//! stub rule records, selects a pipeline by tax scheme and deal type,
//! applies reciprocity and prepaid-tax credits, and assembles the final
//! result with its invariants checked.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pipeline::{self, DraftTaxes, PipelineDraft};
use crate::reciprocity;
use crate::registry::RuleRegistry;
use crate::types::{
    DealType, LeaseBreakdown, Money, StateCode, TaxCalculationInput, TaxCalculationResult,
    TaxError, TaxLine, TaxResult, TaxRulesConfig, TaxSummary, VehicleTaxScheme,
};

/// Calculate the tax on one deal.
///
/// The single synchronous boundary operation: a pure function of the
/// input, the destination state's rules, and the registry (which supplies
/// origin-state rules and the state-pair matrix to the reciprocity
/// resolver).
pub fn calculate_tax(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
    registry: &RuleRegistry,
) -> TaxResult<TaxCalculationResult> {
    let state = validate_input(input)?;
    if state != rules.state_code {
        return Err(TaxError::invalid(
            "state_code",
            format!(
                "input is for {state} but the rule record is for {}",
                rules.state_code
            ),
        ));
    }
    if rules.is_stub() {
        return Err(TaxError::NotImplementedForState(state.to_string()));
    }

    log::debug!(
        "calculating {} deal for {} under scheme {:?}",
        input.deal_type,
        state,
        crate::interpret::interpret_vehicle_tax_scheme(rules)
    );

    let scheme = crate::interpret::interpret_vehicle_tax_scheme(rules);
    let draft = match (scheme, input.deal_type) {
        (VehicleTaxScheme::SpecialTavt, DealType::Retail) => {
            pipeline::special::calculate_tavt(input, rules)?
        }
        // Georgia taxes lease payments with ordinary sales tax, not TAVT.
        (VehicleTaxScheme::SpecialTavt, DealType::Lease) => {
            pipeline::lease::calculate(input, rules)?
        }
        (VehicleTaxScheme::SpecialHut, _) => pipeline::special::calculate_hut(input, rules)?,
        (VehicleTaxScheme::DmvPrivilegeTax, _) => {
            pipeline::special::calculate_privilege(input, rules)?
        }
        (VehicleTaxScheme::StateOnly | VehicleTaxScheme::StatePlusLocal, DealType::Retail) => {
            pipeline::retail::calculate(input, rules)?
        }
        (VehicleTaxScheme::StateOnly | VehicleTaxScheme::StatePlusLocal, DealType::Lease) => {
            pipeline::lease::calculate(input, rules)?
        }
    };

    finalize(input, rules, registry, draft)
}

/// Validate the input shape. Returns the parsed state code.
pub fn validate_input(input: &TaxCalculationInput) -> TaxResult<StateCode> {
    let state = StateCode::from_str_opt(&input.state_code)
        .ok_or_else(|| TaxError::invalid("state_code", format!("malformed: {:?}", input.state_code)))?;

    let non_negative = [
        ("vehicle_price", input.vehicle_price),
        ("accessories_amount", input.accessories_amount),
        ("trade_in_value", input.trade_in_value),
        ("rebate_manufacturer", input.rebate_manufacturer),
        ("rebate_dealer", input.rebate_dealer),
        ("doc_fee", input.doc_fee),
        ("service_contracts", input.service_contracts),
        ("gap", input.gap),
        ("negative_equity", input.negative_equity),
        ("tax_already_collected", input.tax_already_collected),
    ];
    for (field, value) in non_negative {
        if value < dec!(0) {
            return Err(TaxError::invalid(field, "negative amount"));
        }
    }
    for fee in &input.other_fees {
        if fee.amount < dec!(0) {
            return Err(TaxError::invalid(
                format!("other_fees.{}", fee.code),
                "negative amount",
            ));
        }
    }
    for rate in &input.rates {
        if rate.rate < dec!(0) || rate.rate > dec!(1) {
            return Err(TaxError::invalid(
                format!("rates.{}", rate.label),
                "rate outside [0, 1]",
            ));
        }
    }

    if input.deal_type == DealType::Lease {
        let lease = input
            .lease
            .as_ref()
            .ok_or_else(|| TaxError::invalid("lease", "lease fields required for a lease deal"))?;
        if lease.payment_count == 0 {
            return Err(TaxError::invalid("lease.payment_count", "must be positive"));
        }
        let lease_fields = [
            ("lease.gross_cap_cost", lease.gross_cap_cost),
            ("lease.cap_reduction_cash", lease.cap_reduction_cash),
            ("lease.cap_reduction_trade_in", lease.cap_reduction_trade_in),
            (
                "lease.cap_reduction_rebate_manufacturer",
                lease.cap_reduction_rebate_manufacturer,
            ),
            (
                "lease.cap_reduction_rebate_dealer",
                lease.cap_reduction_rebate_dealer,
            ),
            ("lease.base_payment", lease.base_payment),
        ];
        for (field, value) in lease_fields {
            if value < dec!(0) {
                return Err(TaxError::invalid(field, "negative amount"));
            }
        }
    }

    if let Some(origin) = &input.origin {
        if origin.tax_paid < dec!(0) {
            return Err(TaxError::invalid("origin.tax_paid", "negative amount"));
        }
        if let Some(rate) = origin.rate_paid {
            if rate < dec!(0) || rate > dec!(1) {
                return Err(TaxError::invalid("origin.rate_paid", "rate outside [0, 1]"));
            }
        }
    }

    Ok(state)
}

/// Apply credits, assemble the result, and check its invariants.
fn finalize(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
    registry: &RuleRegistry,
    draft: PipelineDraft,
) -> TaxResult<TaxCalculationResult> {
    let PipelineDraft {
        bases,
        taxes,
        mut debug,
    } = draft;

    if input.deal_type == DealType::Retail && input.lease.is_some() {
        debug.note("lease fields ignored on a retail deal");
    }

    let total_due = taxes.total_due();
    let decision = reciprocity::resolve(
        input,
        rules,
        registry,
        total_due,
        bases.total_taxable_base,
    )?;
    debug.notes.extend(decision.notes);

    // No refunds: the credit never exceeds what is due.
    let credit = decision.credit.min(total_due.clamp_zero());
    debug.reciprocity_applied = credit;

    let mut credit_lines = Vec::new();
    if !credit.is_zero() {
        let origin = input
            .origin
            .as_ref()
            .map(|o| o.origin_state.to_string())
            .unwrap_or_default();
        credit_lines.push(TaxLine::credit(
            format!("Reciprocity credit ({origin})"),
            credit,
        ));
    }

    if input.tax_already_collected > dec!(0) {
        let remaining = (total_due - credit).clamp_zero();
        let prepaid = Money::new(input.tax_already_collected).min(remaining);
        if !prepaid.is_zero() {
            debug.note(format!("tax already collected credited: {prepaid}"));
            credit_lines.push(TaxLine::credit("Tax already collected", prepaid));
        }
        if Money::new(input.tax_already_collected) > prepaid {
            debug.note("tax already collected exceeds the tax due; excess not refunded");
        }
    }

    let (summary, lease_breakdown) = match taxes {
        DraftTaxes::Retail { mut lines } => {
            lines.extend(credit_lines);
            (TaxSummary::from_lines(lines), None)
        }
        DraftTaxes::Lease {
            mut upfront,
            per_period,
            terms,
        } => {
            upfront.extend(credit_lines);
            let upfront_summary = TaxSummary::from_lines(upfront);
            let per_period_summary = TaxSummary::from_lines(per_period);
            let total_over_term = (upfront_summary.total_tax
                + per_period_summary.total_tax * Decimal::from(terms))
            .round_cents();

            // Whole-term view: upfront lines plus per-period lines scaled
            // by the term, so the headline total matches the term total.
            let mut term_lines = upfront_summary.by_label.clone();
            for line in &per_period_summary.by_label {
                let mut scaled = line.clone();
                scaled.label = format!("{} ({terms} payments)", line.label);
                scaled.amount = scaled.amount * Decimal::from(terms);
                term_lines.push(scaled);
            }

            let breakdown = LeaseBreakdown {
                upfront_taxes: upfront_summary,
                payment_taxes_per_period: per_period_summary,
                total_tax_over_term: total_over_term,
                terms,
            };
            (TaxSummary::from_lines(term_lines), Some(breakdown))
        }
    };

    let result = TaxCalculationResult {
        bases,
        taxes: summary,
        lease_breakdown,
        debug,
    };
    validate_result_invariants(&result)?;
    Ok(result)
}

/// Check the result invariants the engine promises. A violation is a bug
/// in the engine or the rule data, reported as `InternalInconsistency`.
fn validate_result_invariants(result: &TaxCalculationResult) -> TaxResult<()> {
    let line_sum = result
        .taxes
        .by_label
        .iter()
        .fold(Money::ZERO, |acc, l| acc + l.amount);
    if (line_sum - result.taxes.total_tax).as_decimal().abs() > dec!(0.01) {
        return Err(TaxError::InternalInconsistency(format!(
            "line sum {line_sum} differs from total {}",
            result.taxes.total_tax
        )));
    }

    if result.taxes.total_tax.is_negative() {
        return Err(TaxError::InternalInconsistency(
            "net tax is negative".to_string(),
        ));
    }

    if result.bases.total_taxable_base.is_negative()
        || result.bases.state_taxable_base.is_negative()
        || result.bases.local_taxable_base.is_negative()
    {
        return Err(TaxError::InternalInconsistency(
            "taxable base is negative".to_string(),
        ));
    }

    if let Some(lease) = &result.lease_breakdown {
        let expected = lease.upfront_taxes.total_tax
            + lease.payment_taxes_per_period.total_tax * Decimal::from(lease.terms);
        if (expected - lease.total_tax_over_term).as_decimal().abs() > dec!(0.01) {
            return Err(TaxError::InternalInconsistency(format!(
                "lease term total {} differs from upfront + per-period * terms = {expected}",
                lease.total_tax_over_term
            )));
        }
    }

    Ok(())
}

/// The engine facade: owns a registry, immutable once built. Hot reload
/// of rules is a new engine instance swapped at the caller's boundary.
#[derive(Debug, Clone)]
pub struct TaxEngine {
    registry: RuleRegistry,
}

impl TaxEngine {
    /// Build an engine over an explicit registry.
    pub fn new(registry: RuleRegistry) -> Self {
        TaxEngine { registry }
    }

    /// Build an engine over the rules shipped with the crate.
    pub fn with_builtin_rules() -> Self {
        TaxEngine {
            registry: RuleRegistry::builtin(),
        }
    }

    /// The engine's registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Look up the destination state's rules and calculate.
    pub fn calculate(&self, input: &TaxCalculationInput) -> TaxResult<TaxCalculationResult> {
        let state = validate_input(input)?;
        let rules = self
            .registry
            .rules_for_state(state)
            .ok_or_else(|| TaxError::UnknownState(state.to_string()))?;
        calculate_tax(input, rules, &self.registry)
    }
}

/// JSON-in/JSON-out convenience for FFI boundaries. Uses the builtin
/// registry for reciprocity lookups.
pub fn calculate_tax_json(input_json: &str, rules_json: &str) -> Result<String, String> {
    let input: TaxCalculationInput =
        serde_json::from_str(input_json).map_err(|e| format!("failed to parse input: {e}"))?;
    let rules: TaxRulesConfig =
        serde_json::from_str(rules_json).map_err(|e| format!("failed to parse rules: {e}"))?;

    let registry = RuleRegistry::builtin();
    let result =
        calculate_tax(&input, &rules, &registry).map_err(|e| format!("calculation error: {e}"))?;

    serde_json::to_string(&result).map_err(|e| format!("failed to serialize result: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RateEntry, TaxLevel};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn retail_input(state: &str) -> TaxCalculationInput {
        TaxCalculationInput {
            state_code: state.to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            deal_type: DealType::Retail,
            vehicle_price: dec!(30000),
            accessories_amount: dec!(0),
            trade_in_value: dec!(0),
            rebate_manufacturer: dec!(0),
            rebate_dealer: dec!(0),
            doc_fee: dec!(0),
            other_fees: vec![],
            service_contracts: dec!(0),
            gap: dec!(0),
            negative_equity: dec!(0),
            tax_already_collected: dec!(0),
            rates: vec![RateEntry {
                label: "state".to_string(),
                level: TaxLevel::State,
                rate: dec!(0.07),
            }],
            lease: None,
            origin: None,
            vehicle_class: None,
            gvw: None,
            customer_is_new_resident: false,
            lessee_jurisdiction: None,
        }
    }

    #[test]
    fn test_malformed_state_code() {
        let mut input = retail_input("IN");
        input.state_code = "Indiana".to_string();
        let err = validate_input(&input).unwrap_err();
        assert!(matches!(err, TaxError::InvalidInput { .. }));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut input = retail_input("IN");
        input.vehicle_price = dec!(-1);
        let err = validate_input(&input).unwrap_err();
        assert_eq!(
            err,
            TaxError::InvalidInput {
                field: "vehicle_price".to_string(),
                reason: "negative amount".to_string()
            }
        );
    }

    #[test]
    fn test_lease_without_lease_fields_rejected() {
        let mut input = retail_input("IN");
        input.deal_type = DealType::Lease;
        let err = validate_input(&input).unwrap_err();
        assert!(matches!(err, TaxError::InvalidInput { ref field, .. } if field == "lease"));
    }

    #[test]
    fn test_zero_payment_count_rejected() {
        let mut input = retail_input("IN");
        input.deal_type = DealType::Lease;
        input.lease = Some(crate::types::LeaseInput {
            gross_cap_cost: dec!(30000),
            cap_reduction_cash: dec!(0),
            cap_reduction_trade_in: dec!(0),
            cap_reduction_rebate_manufacturer: dec!(0),
            cap_reduction_rebate_dealer: dec!(0),
            base_payment: dec!(400),
            payment_count: 0,
        });
        let err = validate_input(&input).unwrap_err();
        assert!(
            matches!(err, TaxError::InvalidInput { ref field, .. } if field == "lease.payment_count")
        );
    }

    #[test]
    fn test_stub_state_reports_not_implemented() {
        let engine = TaxEngine::with_builtin_rules();
        let input = retail_input("HI");
        let err = engine.calculate(&input).unwrap_err();
        assert_eq!(err, TaxError::NotImplementedForState("HI".to_string()));
    }

    #[test]
    fn test_rule_record_state_mismatch() {
        let engine = TaxEngine::with_builtin_rules();
        let input = retail_input("IN");
        let mi_rules = engine
            .registry()
            .rules_for_state(StateCode::MI)
            .unwrap()
            .clone();
        let err = calculate_tax(&input, &mi_rules, engine.registry()).unwrap_err();
        assert!(matches!(err, TaxError::InvalidInput { .. }));
    }

    #[test]
    fn test_prepaid_tax_credited_not_refunded() {
        let engine = TaxEngine::with_builtin_rules();
        let mut input = retail_input("IN");
        input.tax_already_collected = dec!(5000);
        let result = engine.calculate(&input).unwrap();
        // 30000 * 0.07 = 2100 due, fully offset, never negative
        assert_eq!(result.taxes.total_tax, Money::ZERO);
        assert!(result
            .debug
            .notes
            .iter()
            .any(|n| n.contains("excess not refunded")));
    }

    #[test]
    fn test_determinism() {
        let engine = TaxEngine::with_builtin_rules();
        let input = retail_input("IN");
        let a = engine.calculate(&input).unwrap();
        let b = engine.calculate(&input).unwrap();
        assert_eq!(a, b);
    }
}
