//! Lease special-scheme surcharge calculators.
//!
//! These layer state-specific lines on top of the base lease method's
//! slugs. Full replacements of the pipeline (TAVT, HUT, privilege tax)
//! live in `special`, not here. Every calculator reads its numbers from
//! the rule's `extras`; a scheme tag with missing extras is rule-data
//! nonsense and reported as `InternalInconsistency`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{
    DebugTrace, LeaseInput, LeaseSpecialScheme, Money, Rate, TaxCalculationInput, TaxError,
    TaxLevel, TaxLine, TaxResult, TaxRulesConfig,
};

/// Apply the rule's lease scheme to the drafted slugs.
pub fn apply_scheme(
    input: &TaxCalculationInput,
    lease: &LeaseInput,
    rules: &TaxRulesConfig,
    upfront: &mut Vec<TaxLine>,
    per_period: &mut Vec<TaxLine>,
    debug: &mut DebugTrace,
) -> TaxResult<()> {
    match rules.lease_rules.special_scheme {
        LeaseSpecialScheme::None => Ok(()),
        // Single-article handling is a cap on the base rate rows, applied
        // where the rows are built.
        LeaseSpecialScheme::TnSingleArticleCap => Ok(()),
        LeaseSpecialScheme::PaLeaseTax => {
            let rate = rules.extras.lease_surcharge_rate.ok_or_else(|| {
                TaxError::InternalInconsistency(
                    "lease surcharge scheme without a surcharge rate".to_string(),
                )
            })?;
            per_period.push(rate_line(
                format!("{} motor vehicle lease tax", rules.state_code),
                lease.base_payment,
                rate,
            ));
            debug.note(format!(
                "motor vehicle lease tax of {}% added to each payment",
                rate * dec!(100)
            ));
            Ok(())
        }
        LeaseSpecialScheme::IlChicagoCook | LeaseSpecialScheme::CoHomeRuleLease => {
            apply_local_use_taxes(input, lease, rules, per_period, debug)
        }
        LeaseSpecialScheme::NyMtr => {
            let rate = rules.extras.lease_surcharge_rate.ok_or_else(|| {
                TaxError::InternalInconsistency(
                    "metropolitan surcharge scheme without a rate".to_string(),
                )
            })?;
            match upfront.first().map(|l| l.taxable_base) {
                Some(base) if !base.is_zero() => {
                    upfront.push(rate_line(
                        "Metropolitan transportation surcharge",
                        base.as_decimal(),
                        rate,
                    ));
                    debug.note("metropolitan transportation surcharge applied");
                }
                _ => debug.note("no upfront consideration; metropolitan surcharge not applied"),
            }
            Ok(())
        }
        LeaseSpecialScheme::NjLuxury => {
            let threshold = rules.extras.luxury_threshold.ok_or_else(|| {
                TaxError::InternalInconsistency("luxury scheme without a threshold".to_string())
            })?;
            let rate = rules.extras.luxury_rate.ok_or_else(|| {
                TaxError::InternalInconsistency("luxury scheme without a rate".to_string())
            })?;
            if lease.gross_cap_cost >= threshold {
                upfront.push(rate_line(
                    "Luxury vehicle surcharge",
                    lease.gross_cap_cost,
                    rate,
                ));
                debug.note(format!(
                    "luxury surcharge: cap cost at or above ${threshold}"
                ));
            }
            Ok(())
        }
        LeaseSpecialScheme::TxLeaseSpecial => {
            if input.customer_is_new_resident {
                let flat = rules.extras.new_resident_flat_tax.ok_or_else(|| {
                    TaxError::InternalInconsistency(
                        "new-resident scheme without a flat tax amount".to_string(),
                    )
                })?;
                upfront.clear();
                upfront.push(TaxLine::flat(
                    "New resident use tax",
                    TaxLevel::Special,
                    Money::new(flat),
                ));
                debug.note("new resident: flat use tax replaces the lease use tax");
            }
            Ok(())
        }
        LeaseSpecialScheme::VaUsage => {
            let minimum = rules.extras.minimum_tax.ok_or_else(|| {
                TaxError::InternalInconsistency("usage scheme without a minimum tax".to_string())
            })?;
            let upfront_total: Decimal = upfront.iter().map(|l| l.amount.as_decimal()).sum();
            let per_total: Decimal = per_period.iter().map(|l| l.amount.as_decimal()).sum();
            let total = upfront_total + per_total * Decimal::from(lease.payment_count);
            if total < minimum {
                upfront.push(TaxLine::flat(
                    "Minimum motor vehicle tax adjustment",
                    TaxLevel::Special,
                    Money::new(minimum - total),
                ));
                debug.note(format!("tax raised to the ${minimum} statutory minimum"));
            }
            Ok(())
        }
        LeaseSpecialScheme::MdUpfrontGain => {
            debug.note("lease taxed on full vehicle value at inception per state rule");
            Ok(())
        }
    }
}

/// Local personal-property lease use taxes keyed by jurisdiction name
/// (Chicago, Colorado home-rule cities). Applies to each payment.
fn apply_local_use_taxes(
    input: &TaxCalculationInput,
    lease: &LeaseInput,
    rules: &TaxRulesConfig,
    per_period: &mut Vec<TaxLine>,
    debug: &mut DebugTrace,
) -> TaxResult<()> {
    let Some(jurisdiction) = input.lessee_jurisdiction.as_deref() else {
        debug.note("no lessee jurisdiction supplied; local lease use taxes not applied");
        return Ok(());
    };
    let mut matched = false;
    for row in &rules.extras.lease_local_use_taxes {
        if row.jurisdiction.eq_ignore_ascii_case(jurisdiction) {
            per_period.push(rate_line(row.label.clone(), lease.base_payment, row.rate));
            debug.note(format!(
                "{} lease use tax of {}% applied to each payment",
                row.jurisdiction,
                row.rate * dec!(100)
            ));
            matched = true;
        }
    }
    if !matched {
        debug.note(format!(
            "lessee jurisdiction {jurisdiction} carries no local lease use tax"
        ));
    }
    Ok(())
}

fn rate_line(label: impl Into<String>, base: Decimal, rate: Decimal) -> TaxLine {
    TaxLine {
        label: label.into(),
        level: TaxLevel::Special,
        rate: Rate::from_decimal(rate),
        taxable_base: Money::new(base),
        amount: Money::new((base * rate).round_dp(2)),
        is_credit: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states;
    use crate::types::StateCode;

    fn rules(code: StateCode) -> TaxRulesConfig {
        states::all_rules()
            .into_iter()
            .find(|r| r.state_code == code)
            .expect("state populated")
    }

    fn lease(payment: Decimal, count: u32) -> LeaseInput {
        LeaseInput {
            gross_cap_cost: dec!(35000),
            cap_reduction_cash: dec!(0),
            cap_reduction_trade_in: dec!(0),
            cap_reduction_rebate_manufacturer: dec!(0),
            cap_reduction_rebate_dealer: dec!(0),
            base_payment: payment,
            payment_count: count,
        }
    }

    fn input_for(state: &str, jurisdiction: Option<&str>) -> TaxCalculationInput {
        TaxCalculationInput {
            state_code: state.to_string(),
            as_of_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            deal_type: crate::types::DealType::Lease,
            vehicle_price: dec!(35000),
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
            lease: Some(lease(dec!(450), 36)),
            origin: None,
            vehicle_class: None,
            gvw: None,
            customer_is_new_resident: false,
            lessee_jurisdiction: jurisdiction.map(str::to_string),
        }
    }

    #[test]
    fn test_pa_surcharge_added_per_payment() {
        let r = rules(StateCode::PA);
        let input = input_for("PA", None);
        let l = lease(dec!(450), 36);
        let mut upfront = vec![];
        let mut per_period = vec![];
        let mut debug = DebugTrace::default();

        apply_scheme(&input, &l, &r, &mut upfront, &mut per_period, &mut debug).unwrap();
        assert_eq!(per_period.len(), 1);
        assert_eq!(per_period[0].amount, Money::new(dec!(13.50)));
    }

    #[test]
    fn test_chicago_use_tax_requires_jurisdiction() {
        let r = rules(StateCode::IL);
        let l = lease(dec!(450), 36);
        let mut debug = DebugTrace::default();

        let mut per_period = vec![];
        let input = input_for("IL", Some("Chicago"));
        apply_scheme(&input, &l, &r, &mut vec![], &mut per_period, &mut debug).unwrap();
        assert_eq!(per_period.len(), 1);
        assert_eq!(per_period[0].amount, Money::new(dec!(36.00)));

        let mut per_period = vec![];
        let input = input_for("IL", None);
        apply_scheme(&input, &l, &r, &mut vec![], &mut per_period, &mut debug).unwrap();
        assert!(per_period.is_empty());
    }

    #[test]
    fn test_missing_extras_is_internal_inconsistency() {
        let mut r = rules(StateCode::PA);
        r.extras.lease_surcharge_rate = None;
        let input = input_for("PA", None);
        let l = lease(dec!(450), 36);
        let mut debug = DebugTrace::default();

        let err = apply_scheme(&input, &l, &r, &mut vec![], &mut vec![], &mut debug).unwrap_err();
        assert!(matches!(err, TaxError::InternalInconsistency(_)));
    }
}
