//! Full-pipeline replacement calculators.
//!
//! Georgia's TAVT, North Carolina's HUT, and West Virginia's privilege tax
//! are not rate tweaks; they replace the sales-tax structure outright. Each
//! calculator keeps the generic `(input, rules) -> draft` shape and is
//! selected by the dispatcher before the generic pipelines run.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::interpret;
use crate::types::{
    DealType, ExemptComponent, Money, Rate, RateEntry, RebateApplication, RebateScope, TaxBases,
    TaxCalculationInput, TaxError, TaxLevel, TaxLine, TaxResult, TaxRulesConfig, VehicleClass,
};

use super::retail::{build_retail_bases, RetailBases};
use super::{lease, DraftTaxes, PipelineDraft};

/// Georgia Title Ad Valorem Tax: a one-time tax on vehicle value that
/// replaces sales tax for retail purchases. Lease deals are routed to the
/// generic pipeline by the dispatcher - Georgia taxes lease payments with
/// ordinary sales tax instead.
///
/// ```text
/// TAVT = (value + taxable accessories - trade credit
///         - exempt rebates + taxable rebates) * tavt_rate
/// ```
pub fn calculate_tavt(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
) -> TaxResult<PipelineDraft> {
    debug_assert_eq!(input.deal_type, DealType::Retail);
    let rate = rules.extras.tavt_rate.ok_or_else(|| {
        TaxError::InternalInconsistency("TAVT scheme without a TAVT rate".to_string())
    })?;

    let mut debug = crate::types::DebugTrace::default();
    let mut exempt = Vec::new();

    let mut base = input.vehicle_price;
    if input.accessories_amount > dec!(0) {
        if rules.tax_on_accessories {
            base += input.accessories_amount;
        } else {
            exempt.push(ExemptComponent {
                code: "accessories".to_string(),
                amount: Money::new(input.accessories_amount).round_cents(),
            });
        }
    }

    let applied = interpret::interpret_trade_in_policy(&rules.trade_in_policy, input.trade_in_value)?;
    if let Some(note) = &applied.note {
        debug.note(note.clone());
    }
    debug.applied_trade_in = Money::new(applied.state_credit.min(base)).round_cents();
    base -= applied.state_credit;

    for (scope, amount) in [
        (RebateScope::Manufacturer, input.rebate_manufacturer),
        (RebateScope::Dealer, input.rebate_dealer),
    ] {
        if amount <= dec!(0) {
            continue;
        }
        let decision = interpret::is_rebate_taxable(rules, scope);
        if let Some(note) = decision.note {
            debug.note(note);
        }
        let application = RebateApplication {
            scope,
            amount: Money::new(amount).round_cents(),
        };
        if decision.taxable {
            base += amount;
            debug.applied_rebates_taxable.push(application);
        } else {
            base -= amount;
            debug.applied_rebates_non_taxable.push(application);
        }
    }

    // Fees and F&I products are outside the title ad valorem base.
    exempt_non_vehicle_components(input, &mut exempt, &mut debug);

    if base < dec!(0) {
        debug.note("taxable value clamped to zero");
        base = dec!(0);
    }

    let line = TaxLine {
        label: "Georgia TAVT".to_string(),
        level: TaxLevel::Special,
        rate: Rate::from_decimal(rate),
        taxable_base: Money::new(base),
        amount: Money::new((base * rate).round_dp(2)),
        is_credit: false,
    };
    debug.note("title ad valorem tax replaces sales tax on this purchase");

    Ok(PipelineDraft {
        bases: TaxBases {
            total_taxable_base: Money::new(base).round_cents(),
            state_taxable_base: Money::new(base).round_cents(),
            local_taxable_base: Money::new(base).round_cents(),
            exempt_components: exempt,
        },
        taxes: DraftTaxes::Retail { lines: vec![line] },
        debug,
    })
}

/// North Carolina Highway Use Tax: a state-only levy that replaces sales
/// tax on vehicles. Retail deals tax the (capped) retail base; lease deals
/// tax each payment at the same rate.
pub fn calculate_hut(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
) -> TaxResult<PipelineDraft> {
    let rate = rules.extras.hut_rate.ok_or_else(|| {
        TaxError::InternalInconsistency("HUT scheme without a HUT rate".to_string())
    })?;

    if input.deal_type == DealType::Lease {
        // Same levy, collected on the payment stream.
        let synthetic = with_rates(
            input,
            vec![RateEntry {
                label: "NC highway use tax".to_string(),
                level: TaxLevel::State,
                rate,
            }],
        );
        let mut draft = lease::calculate(&synthetic, rules)?;
        draft
            .debug
            .note("highway use tax replaces sales tax on this lease");
        return Ok(draft);
    }

    let RetailBases {
        mut bases,
        exempt,
        mut debug,
    } = build_retail_bases(input, rules)?;

    if let Some(cap) = rules.extras.hut_base_cap {
        if bases.state > cap {
            debug.note(format!("highway use tax base capped at ${cap}"));
            bases.state = cap;
        }
    }

    let line = TaxLine {
        label: "NC highway use tax".to_string(),
        level: TaxLevel::Special,
        rate: Rate::from_decimal(rate),
        taxable_base: Money::new(bases.state),
        amount: Money::new((bases.state * rate).round_dp(2)),
        is_credit: false,
    };
    debug.note("highway use tax replaces sales tax on this purchase");

    Ok(PipelineDraft {
        bases: TaxBases {
            total_taxable_base: Money::new(bases.state).round_cents(),
            state_taxable_base: Money::new(bases.state).round_cents(),
            local_taxable_base: Money::new(bases.state).round_cents(),
            exempt_components: exempt,
        },
        taxes: DraftTaxes::Retail { lines: vec![line] },
        debug,
    })
}

/// West Virginia DMV privilege tax: replaces sales tax at titling. The
/// rate depends on the vehicle class; service contracts and GAP are
/// taxable here unlike in most states, which the rule flags express.
pub fn calculate_privilege(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
) -> TaxResult<PipelineDraft> {
    let rate = privilege_rate(rules, input.vehicle_class)?;

    if input.deal_type == DealType::Lease {
        let synthetic = with_rates(
            input,
            vec![RateEntry {
                label: "WV privilege tax".to_string(),
                level: TaxLevel::State,
                rate,
            }],
        );
        let mut draft = lease::calculate(&synthetic, rules)?;
        draft
            .debug
            .note("privilege tax replaces sales tax on this lease");
        return Ok(draft);
    }

    let RetailBases {
        bases,
        exempt,
        mut debug,
    } = build_retail_bases(input, rules)?;

    if let Some(class) = input.vehicle_class {
        debug.note(format!("privilege tax rate for {class} vehicles: {rate}"));
    }

    let line = TaxLine {
        label: "WV privilege tax".to_string(),
        level: TaxLevel::Special,
        rate: Rate::from_decimal(rate),
        taxable_base: Money::new(bases.state),
        amount: Money::new((bases.state * rate).round_dp(2)),
        is_credit: false,
    };

    Ok(PipelineDraft {
        bases: TaxBases {
            total_taxable_base: Money::new(bases.state).round_cents(),
            state_taxable_base: Money::new(bases.state).round_cents(),
            local_taxable_base: Money::new(bases.state).round_cents(),
            exempt_components: exempt,
        },
        taxes: DraftTaxes::Retail { lines: vec![line] },
        debug,
    })
}

/// Resolve the privilege rate for a vehicle class.
fn privilege_rate(
    rules: &TaxRulesConfig,
    vehicle_class: Option<VehicleClass>,
) -> TaxResult<Decimal> {
    let base = rules.extras.privilege_base_rate.ok_or_else(|| {
        TaxError::InternalInconsistency("privilege scheme without a base rate".to_string())
    })?;
    if let Some(class) = vehicle_class {
        if let Some((_, rate)) = rules
            .extras
            .privilege_class_rates
            .iter()
            .find(|(c, _)| *c == class)
        {
            return Ok(*rate);
        }
    }
    Ok(base)
}

/// Exempt the fee/product components the vehicle-value taxes ignore.
fn exempt_non_vehicle_components(
    input: &TaxCalculationInput,
    exempt: &mut Vec<ExemptComponent>,
    debug: &mut crate::types::DebugTrace,
) {
    let mut push = |code: &str, amount: Decimal| {
        if amount > dec!(0) {
            exempt.push(ExemptComponent {
                code: code.to_string(),
                amount: Money::new(amount).round_cents(),
            });
        }
    };
    push("doc_fee", input.doc_fee);
    push("service_contracts", input.service_contracts);
    push("gap", input.gap);
    for fee in &input.other_fees {
        push(&fee.code, fee.amount);
    }
    if input.doc_fee > dec!(0) || !input.other_fees.is_empty() {
        debug.note("fees and products are outside the vehicle-value tax base");
    }
}

/// Clone the input with a synthetic rate table.
fn with_rates(input: &TaxCalculationInput, rates: Vec<RateEntry>) -> TaxCalculationInput {
    let mut out = input.clone();
    out.rates = rates;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states;
    use crate::types::{LeaseInput, StateCode};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn rules(code: StateCode) -> TaxRulesConfig {
        states::all_rules()
            .into_iter()
            .find(|r| r.state_code == code)
            .expect("state populated")
    }

    fn retail_input(state: &str, price: Decimal) -> TaxCalculationInput {
        TaxCalculationInput {
            state_code: state.to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            deal_type: DealType::Retail,
            vehicle_price: price,
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
            rates: vec![],
            lease: None,
            origin: None,
            vehicle_class: None,
            gvw: None,
            customer_is_new_resident: false,
            lessee_jurisdiction: None,
        }
    }

    #[test]
    fn test_tavt_on_value_less_trade() {
        let mut input = retail_input("GA", dec!(30000));
        input.trade_in_value = dec!(10000);
        let draft = calculate_tavt(&input, &rules(StateCode::GA)).unwrap();
        match &draft.taxes {
            DraftTaxes::Retail { lines } => {
                assert_eq!(lines.len(), 1);
                // (30000 - 10000) * 0.07 = 1400
                assert_eq!(lines[0].amount, Money::new(dec!(1400.00)));
            }
            _ => panic!("retail draft expected"),
        }
    }

    #[test]
    fn test_tavt_excludes_fees_and_products() {
        let mut input = retail_input("GA", dec!(30000));
        input.doc_fee = dec!(599);
        input.service_contracts = dec!(2000);
        let draft = calculate_tavt(&input, &rules(StateCode::GA)).unwrap();
        assert_eq!(draft.bases.total_taxable_base, Money::new(dec!(30000)));
        assert_eq!(draft.bases.exempt_components.len(), 2);
    }

    #[test]
    fn test_hut_base_cap() {
        let input = retail_input("NC", dec!(120000));
        let draft = calculate_hut(&input, &rules(StateCode::NC)).unwrap();
        match &draft.taxes {
            DraftTaxes::Retail { lines } => {
                // min(120000, 80000) * 0.03 = 2400
                assert_eq!(lines[0].amount, Money::new(dec!(2400.00)));
            }
            _ => panic!("retail draft expected"),
        }
    }

    #[test]
    fn test_hut_lease_taxes_payments() {
        let mut input = retail_input("NC", dec!(35000));
        input.deal_type = DealType::Lease;
        input.lease = Some(LeaseInput {
            gross_cap_cost: dec!(35000),
            cap_reduction_cash: dec!(0),
            cap_reduction_trade_in: dec!(0),
            cap_reduction_rebate_manufacturer: dec!(0),
            cap_reduction_rebate_dealer: dec!(0),
            base_payment: dec!(500),
            payment_count: 36,
        });
        let draft = calculate_hut(&input, &rules(StateCode::NC)).unwrap();
        match &draft.taxes {
            DraftTaxes::Lease { per_period, .. } => {
                // 500 * 0.03 = 15
                assert_eq!(per_period[0].amount, Money::new(dec!(15.00)));
            }
            _ => panic!("lease draft expected"),
        }
    }

    #[test]
    fn test_privilege_class_rates() {
        let r = rules(StateCode::WV);
        assert_eq!(privilege_rate(&r, None).unwrap(), dec!(0.05));
        assert_eq!(
            privilege_rate(&r, Some(VehicleClass::Rv)).unwrap(),
            dec!(0.06)
        );
        assert_eq!(
            privilege_rate(&r, Some(VehicleClass::Trailer)).unwrap(),
            dec!(0.03)
        );
        assert_eq!(
            privilege_rate(&r, Some(VehicleClass::Passenger)).unwrap(),
            dec!(0.05)
        );
    }

    #[test]
    fn test_privilege_taxes_vsc_and_gap() {
        let mut input = retail_input("WV", dec!(30000));
        input.service_contracts = dec!(2000);
        input.gap = dec!(800);
        let draft = calculate_privilege(&input, &rules(StateCode::WV)).unwrap();
        // 32800 * 0.05 = 1640
        assert_eq!(draft.bases.total_taxable_base, Money::new(dec!(32800)));
        match &draft.taxes {
            DraftTaxes::Retail { lines } => {
                assert_eq!(lines[0].amount, Money::new(dec!(1640.00)));
            }
            _ => panic!("retail draft expected"),
        }
    }
}
