//! Reciprocity resolver.
//!
//! Given tax already paid to an origin state, computes the credit the
//! destination state grants against its own tax. Every decision appends a
//! note so audits can reconstruct the reasoning. The resolver never
//! produces a refund: the caller subtracts the credit and the floor of
//! the net tax is zero.
//!
//! Resolution order:
//! 1. master switch and deal-type scope
//! 2. per-origin override on the destination rule
//! 3. global state-pair matrix fallback
//! 4. disallow / time window / mutual-credit checks
//! 5. credit by basis (tax paid vs origin rate recomputed on this deal)
//! 6. home-state behavior and destination-tax cap

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::registry::RuleRegistry;
use crate::types::{
    DealType, Money, ReciprocityBasis, ReciprocityHomeBehavior, ReciprocityOverride, StateCode,
    TaxCalculationInput, TaxLevel, TaxResult, TaxRulesConfig,
};

/// The resolver's answer: a credit plus the reasoning behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReciprocityDecision {
    /// Credit to subtract from the destination tax
    pub credit: Money,
    /// Decision log
    pub notes: Vec<String>,
}

impl ReciprocityDecision {
    fn none(note: impl Into<String>) -> Self {
        ReciprocityDecision {
            credit: Money::ZERO,
            notes: vec![note.into()],
        }
    }
}

/// Resolve the reciprocity credit for a deal.
///
/// `destination_tax` is the tax otherwise due; `destination_base` is the
/// taxable base it was computed from (used for the `RatePaid` basis and
/// for the up-to-state-rate cap).
pub fn resolve(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
    registry: &RuleRegistry,
    destination_tax: Money,
    destination_base: Money,
) -> TaxResult<ReciprocityDecision> {
    let Some(origin) = input.origin.as_ref() else {
        return Ok(ReciprocityDecision {
            credit: Money::ZERO,
            notes: Vec::new(),
        });
    };

    let reciprocity = &rules.reciprocity;
    if !reciprocity.enabled {
        return Ok(ReciprocityDecision::none(
            "reciprocity: state grants no credit for out-of-state tax",
        ));
    }
    if !reciprocity.scope.covers(input.deal_type) {
        return Ok(ReciprocityDecision::none(format!(
            "reciprocity: scope does not cover {} deals",
            input.deal_type
        )));
    }
    if input.deal_type == DealType::Lease && reciprocity.has_lease_exception {
        return Ok(ReciprocityDecision::none(
            "reciprocity: lease deals follow a separate statute; no credit",
        ));
    }

    let mut notes = Vec::new();

    // Per-rule override first, then the global matrix.
    let rule_override = reciprocity
        .overrides
        .iter()
        .find(|o| o.origin_state == origin.origin_state && override_applies(o, input));

    let mut disallow = false;
    let mut window_days = reciprocity.default_window_days;
    let mut mutual_required = false;

    if let Some(o) = rule_override {
        notes.push(format!(
            "reciprocity: override on file for origin {}",
            o.origin_state
        ));
        disallow = o.disallow_credit;
        if o.window_days.is_some() {
            window_days = o.window_days;
        }
        mutual_required = o.mutual_credit_required;
    } else if let Some(pair) = registry.pair_rule(rules.state_code, origin.origin_state) {
        if let Some(note) = &pair.notes {
            notes.push(format!("reciprocity: state-pair rule: {note}"));
        }
        disallow = pair.disallow_credit;
        if pair.window_days.is_some() {
            window_days = pair.window_days;
        }
        mutual_required = pair.mutual_credit_required;
    }

    if disallow {
        notes.push(format!(
            "reciprocity: credit disallowed for tax paid to {}",
            origin.origin_state
        ));
        return Ok(ReciprocityDecision {
            credit: Money::ZERO,
            notes,
        });
    }

    if let Some(window) = window_days {
        let elapsed = (input.as_of_date - origin.paid_at).num_days();
        if elapsed > window {
            notes.push(format!(
                "reciprocity: origin tax paid {elapsed} days ago, outside the {window}-day window; credit denied"
            ));
            return Ok(ReciprocityDecision {
                credit: Money::ZERO,
                notes,
            });
        }
        notes.push(format!(
            "reciprocity: origin tax paid {elapsed} days ago, within the {window}-day window"
        ));
    }

    if mutual_required && !grants_credit_back(registry, origin.origin_state, rules.state_code, input.deal_type)
    {
        notes.push(format!(
            "reciprocity: {} does not grant credit back to {}; credit denied",
            origin.origin_state, rules.state_code
        ));
        return Ok(ReciprocityDecision {
            credit: Money::ZERO,
            notes,
        });
    }

    if reciprocity.require_proof_of_tax_paid && origin.tax_paid <= dec!(0) {
        notes.push("reciprocity: proof of tax paid required and none supplied; credit denied".into());
        return Ok(ReciprocityDecision {
            credit: Money::ZERO,
            notes,
        });
    }

    // Credit by basis.
    let mut credit = match reciprocity.basis {
        ReciprocityBasis::TaxPaid => {
            notes.push(format!(
                "reciprocity: crediting ${} tax paid to {}",
                origin.tax_paid, origin.origin_state
            ));
            origin.tax_paid
        }
        ReciprocityBasis::RatePaid => match origin.rate_paid {
            Some(rate) => {
                let recomputed = (destination_base.as_decimal() * rate).round_dp(2);
                notes.push(format!(
                    "reciprocity: crediting what {} would have charged on this deal: ${recomputed}",
                    origin.origin_state
                ));
                recomputed
            }
            None => {
                notes.push(
                    "reciprocity: origin rate not supplied; crediting tax paid instead".into(),
                );
                origin.tax_paid
            }
        },
    };

    // Home-state behavior.
    match reciprocity.home_state_behavior {
        ReciprocityHomeBehavior::NoCredit => {
            notes.push("reciprocity: state policy grants no credit; credit denied".into());
            return Ok(ReciprocityDecision {
                credit: Money::ZERO,
                notes,
            });
        }
        ReciprocityHomeBehavior::CreditUpToStateRate => {
            let state_rate: Decimal = input
                .rates
                .iter()
                .filter(|r| r.level == TaxLevel::State)
                .map(|r| r.rate)
                .sum();
            let cap = (destination_base.as_decimal() * state_rate).round_dp(2);
            if credit > cap {
                notes.push(format!(
                    "reciprocity: credit capped at the state-rate equivalent ${cap}"
                ));
                credit = cap;
            }
        }
        ReciprocityHomeBehavior::FullCreditNoCap => {
            notes.push("reciprocity: full credit, no cap".into());
            let credit = credit.max(dec!(0));
            return Ok(ReciprocityDecision {
                credit: Money::new(credit).round_cents(),
                notes,
            });
        }
        ReciprocityHomeBehavior::None => {}
    }

    if reciprocity.cap_at_this_states_tax && Money::new(credit) > destination_tax {
        notes.push(format!(
            "reciprocity: credit capped at this state's tax of {destination_tax}"
        ));
        credit = destination_tax.as_decimal();
    }

    Ok(ReciprocityDecision {
        credit: Money::new(credit.max(dec!(0))).round_cents(),
        notes,
    })
}

/// Does an override row apply to this deal's vehicle?
fn override_applies(o: &ReciprocityOverride, input: &TaxCalculationInput) -> bool {
    if let Some(classes) = &o.vehicle_classes {
        match input.vehicle_class {
            Some(class) if classes.contains(&class) => {}
            _ => return false,
        }
    }
    if let Some(max_gvw) = o.max_gvw {
        match input.gvw {
            Some(gvw) if gvw <= max_gvw => {}
            _ => return false,
        }
    }
    true
}

/// Would the origin state grant credit back for tax paid to `destination`?
fn grants_credit_back(
    registry: &RuleRegistry,
    origin: StateCode,
    destination: StateCode,
    deal_type: DealType,
) -> bool {
    let Some(origin_rules) = registry.rules_for_state(origin) else {
        return false;
    };
    if origin_rules.is_stub() {
        return false;
    }
    if !origin_rules.reciprocity.enabled || !origin_rules.reciprocity.scope.covers(deal_type) {
        return false;
    }
    !origin_rules
        .reciprocity
        .overrides
        .iter()
        .any(|o| o.origin_state == destination && o.disallow_credit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states;
    use crate::types::{OriginTaxInfo, RateEntry, TaxRulesConfig};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn rules(code: StateCode) -> TaxRulesConfig {
        states::all_rules()
            .into_iter()
            .find(|r| r.state_code == code)
            .expect("state populated")
    }

    fn input_with_origin(
        state: &str,
        origin: StateCode,
        tax_paid: Decimal,
        days_ago: i64,
    ) -> TaxCalculationInput {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        TaxCalculationInput {
            state_code: state.to_string(),
            as_of_date: as_of,
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
            origin: Some(OriginTaxInfo {
                origin_state: origin,
                tax_paid,
                rate_paid: None,
                paid_at: as_of - chrono::Duration::days(days_ago),
            }),
            vehicle_class: None,
            gvw: None,
            customer_is_new_resident: false,
            lessee_jurisdiction: None,
        }
    }

    #[test]
    fn test_no_origin_no_credit_no_notes() {
        let registry = RuleRegistry::builtin();
        let mut input = input_with_origin("NC", StateCode::VA, dec!(1245), 30);
        input.origin = None;
        let decision = resolve(
            &input,
            &rules(StateCode::NC),
            &registry,
            Money::new(dec!(900)),
            Money::new(dec!(30000)),
        )
        .unwrap();
        assert_eq!(decision.credit, Money::ZERO);
        assert!(decision.notes.is_empty());
    }

    #[test]
    fn test_credit_within_window() {
        let registry = RuleRegistry::builtin();
        let input = input_with_origin("NC", StateCode::VA, dec!(1245), 30);
        let decision = resolve(
            &input,
            &rules(StateCode::NC),
            &registry,
            Money::new(dec!(900)),
            Money::new(dec!(30000)),
        )
        .unwrap();
        // Capped at the destination tax
        assert_eq!(decision.credit, Money::new(dec!(900)));
    }

    #[test]
    fn test_credit_denied_outside_window() {
        let registry = RuleRegistry::builtin();
        let input = input_with_origin("NC", StateCode::VA, dec!(1245), 120);
        let decision = resolve(
            &input,
            &rules(StateCode::NC),
            &registry,
            Money::new(dec!(900)),
            Money::new(dec!(30000)),
        )
        .unwrap();
        assert_eq!(decision.credit, Money::ZERO);
        assert!(decision.notes.iter().any(|n| n.contains("window")));
    }

    #[test]
    fn test_matrix_disallow_applies() {
        let registry = RuleRegistry::builtin();
        let input = input_with_origin("IN", StateCode::OR, dec!(500), 10);
        let decision = resolve(
            &input,
            &rules(StateCode::IN),
            &registry,
            Money::new(dec!(2100)),
            Money::new(dec!(30000)),
        )
        .unwrap();
        assert_eq!(decision.credit, Money::ZERO);
    }

    #[test]
    fn test_disabled_reciprocity() {
        let registry = RuleRegistry::builtin();
        // GA TAVT is not a sales tax; sales tax paid elsewhere earns no credit
        let input = input_with_origin("GA", StateCode::NV, dec!(500), 10);
        let decision = resolve(
            &input,
            &rules(StateCode::GA),
            &registry,
            Money::new(dec!(2100)),
            Money::new(dec!(30000)),
        )
        .unwrap();
        assert_eq!(decision.credit, Money::ZERO);
        assert!(!decision.notes.is_empty());
    }

    #[test]
    fn test_mutual_credit_required_against_stub_origin() {
        let registry = RuleRegistry::builtin();
        // PA requires mutuality from NV, a stub record
        let input = input_with_origin("PA", StateCode::NV, dec!(500), 10);
        let decision = resolve(
            &input,
            &rules(StateCode::PA),
            &registry,
            Money::new(dec!(1800)),
            Money::new(dec!(30000)),
        )
        .unwrap();
        assert_eq!(decision.credit, Money::ZERO);
        assert!(decision
            .notes
            .iter()
            .any(|n| n.contains("does not grant credit back")));
    }

    #[test]
    fn test_rate_paid_basis_recomputes() {
        let registry = RuleRegistry::builtin();
        let mut input = input_with_origin("OH", StateCode::KY, dec!(9999), 10);
        if let Some(origin) = input.origin.as_mut() {
            origin.rate_paid = Some(dec!(0.06));
        }
        let decision = resolve(
            &input,
            &rules(StateCode::OH),
            &registry,
            Money::new(dec!(2000)),
            Money::new(dec!(30000)),
        )
        .unwrap();
        // 30000 * 0.06 = 1800, below the destination tax
        assert_eq!(decision.credit, Money::new(dec!(1800)));
    }
}
