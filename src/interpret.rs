//! Rule interpreters.
//!
//! Small pure functions that each answer one question about a rule record.
//! They are the only code allowed to pattern-match the DSL; pipelines call
//! them and work with the answers. Adding a DSL variant is a compile error
//! here and nowhere else.
//!
//! Every interpreter is total for expected combinations and returns its
//! decision together with a note for the audit log. Rule data that
//! contradicts itself (negative caps, ratios outside [0, 1]) is reported as
//! `InternalInconsistency`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{
    FeeTaxRule, LeaseDocFeeTaxability, RebateScope, TaxError, TaxResult, TaxRulesConfig,
    TradeInPolicy, VehicleTaxScheme,
};

/// Trade-in credit split by jurisdiction level.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTradeIn {
    /// Credit against state-level bases
    pub state_credit: Decimal,
    /// Credit against local-level bases
    pub local_credit: Decimal,
    /// Decision note
    pub note: Option<String>,
}

impl AppliedTradeIn {
    /// Whether the policy produced different state and local credits.
    pub fn is_split(&self) -> bool {
        self.state_credit != self.local_credit
    }
}

/// Apply the retail trade-in policy to a trade allowance.
///
/// The returned credits are not yet clamped to the base; the pipeline does
/// that, because clamping interacts with the rest of the base build.
pub fn interpret_trade_in_policy(
    policy: &TradeInPolicy,
    trade_value: Decimal,
) -> TaxResult<AppliedTradeIn> {
    let trade = trade_value.max(dec!(0));
    match policy {
        TradeInPolicy::None { .. } => Ok(AppliedTradeIn {
            state_credit: dec!(0),
            local_credit: dec!(0),
            note: if trade > dec!(0) {
                Some("trade-in does not reduce the taxable base in this state".into())
            } else {
                None
            },
        }),
        TradeInPolicy::Full { .. } => Ok(AppliedTradeIn {
            state_credit: trade,
            local_credit: trade,
            note: None,
        }),
        TradeInPolicy::Capped { amount, .. } => {
            if *amount < dec!(0) {
                return Err(TaxError::InternalInconsistency(format!(
                    "trade-in credit cap is negative: {amount}"
                )));
            }
            let credit = trade.min(*amount);
            let note = if trade > *amount {
                Some(format!("trade-in credit capped at ${amount}"))
            } else {
                None
            };
            Ok(AppliedTradeIn {
                state_credit: credit,
                local_credit: credit,
                note,
            })
        }
        TradeInPolicy::Percentage { ratio, .. } => {
            if *ratio < dec!(0) || *ratio > dec!(1) {
                return Err(TaxError::InternalInconsistency(format!(
                    "trade-in credit ratio out of range: {ratio}"
                )));
            }
            let credit = trade * *ratio;
            Ok(AppliedTradeIn {
                state_credit: credit,
                local_credit: credit,
                note: Some(format!(
                    "trade-in credited at {}% of allowance",
                    *ratio * dec!(100)
                )),
            })
        }
        TradeInPolicy::Partial {
            state_eligible,
            local_eligible,
            ..
        } => Ok(AppliedTradeIn {
            state_credit: if *state_eligible { trade } else { dec!(0) },
            local_credit: if *local_eligible { trade } else { dec!(0) },
            note: Some(format!(
                "partial trade-in credit: state {}, local {}",
                if *state_eligible { "yes" } else { "no" },
                if *local_eligible { "yes" } else { "no" },
            )),
        }),
    }
}

/// One rebate-taxability decision.
#[derive(Debug, Clone, PartialEq)]
pub struct RebateDecision {
    /// Whether the rebate is part of the taxable base
    pub taxable: bool,
    /// Decision note
    pub note: Option<String>,
}

/// Is a rebate of the given scope taxable under the retail rules?
///
/// A scope with no rule row defaults to taxable, with a note; states that
/// exempt a scope always carry an explicit row.
pub fn is_rebate_taxable(rules: &TaxRulesConfig, scope: RebateScope) -> RebateDecision {
    match rules.rebates.iter().find(|r| r.applies_to == scope) {
        Some(rule) => RebateDecision {
            taxable: rule.taxable,
            note: rule.notes.clone(),
        },
        None => RebateDecision {
            taxable: true,
            note: Some(format!(
                "no {scope:?} rebate rule on file; treated as taxable"
            )),
        },
    }
}

/// Is the doc fee part of the retail taxable base?
pub fn is_doc_fee_taxable(rules: &TaxRulesConfig) -> bool {
    rules.doc_fee_taxable
}

/// Split a doc fee into its taxable and exempt portions under the rule's
/// cap. The whole fee is exempt when the rule says non-taxable.
pub fn doc_fee_taxable_portion(
    rules: &TaxRulesConfig,
    doc_fee: Decimal,
) -> TaxResult<(Decimal, Decimal, Option<String>)> {
    if !rules.doc_fee_taxable {
        return Ok((dec!(0), doc_fee, None));
    }
    match rules.doc_fee_cap {
        Some(cap) if cap < dec!(0) => Err(TaxError::InternalInconsistency(format!(
            "doc fee cap is negative: {cap}"
        ))),
        Some(cap) if doc_fee > cap => Ok((
            cap,
            doc_fee - cap,
            Some(format!(
                "doc fee taxable up to the ${cap} cap; ${} exempt",
                doc_fee - cap
            )),
        )),
        _ => Ok((doc_fee, dec!(0), None)),
    }
}

/// Split a lease doc fee into taxable and exempt portions under the
/// retail cap. Unlike the retail variant, the lease record has already
/// decided taxability, so only the cap applies here.
pub fn doc_fee_taxable_portion_for_lease(
    rules: &TaxRulesConfig,
    doc_fee: Decimal,
) -> TaxResult<(Decimal, Decimal, Option<String>)> {
    match rules.doc_fee_cap {
        Some(cap) if cap < dec!(0) => Err(TaxError::InternalInconsistency(format!(
            "doc fee cap is negative: {cap}"
        ))),
        Some(cap) if doc_fee > cap => Ok((
            cap,
            doc_fee - cap,
            Some(format!(
                "doc fee taxable up to the ${cap} cap; ${} exempt",
                doc_fee - cap
            )),
        )),
        _ => Ok((doc_fee, dec!(0), None)),
    }
}

/// One fee-taxability decision.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeDecision {
    /// Whether the fee joins the taxable base
    pub taxable: bool,
    /// Decision note
    pub note: Option<String>,
}

/// Is a coded fee taxable under the given fee rules? Unlisted codes are
/// exempt, with a note: states list what they tax.
pub fn is_fee_taxable(fee_rules: &[FeeTaxRule], code: &str) -> FeeDecision {
    match fee_rules
        .iter()
        .find(|r| r.code.eq_ignore_ascii_case(code))
    {
        Some(rule) => FeeDecision {
            taxable: rule.taxable,
            note: rule.notes.clone(),
        },
        None => FeeDecision {
            taxable: false,
            note: Some(format!("fee {code} has no tax rule on file; exempt")),
        },
    }
}

/// Which rate structure the rule selects.
pub fn interpret_vehicle_tax_scheme(rules: &TaxRulesConfig) -> VehicleTaxScheme {
    rules.vehicle_tax_scheme
}

/// Resolved doc-fee treatment on a lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseDocFeeResolved {
    /// Taxed in the upfront slug
    Upfront,
    /// Exempt
    Exempt,
}

/// Resolve the lease doc-fee taxability, deferring to the retail rule
/// where the lease record says to. A taxable doc fee on a lease is always
/// a signing item, so "taxable" resolves to the upfront slug.
pub fn lease_doc_fee_taxability(rules: &TaxRulesConfig) -> LeaseDocFeeResolved {
    match rules.lease_rules.doc_fee_taxability {
        LeaseDocFeeTaxability::Always | LeaseDocFeeTaxability::OnlyUpfront => {
            LeaseDocFeeResolved::Upfront
        }
        LeaseDocFeeTaxability::Never => LeaseDocFeeResolved::Exempt,
        LeaseDocFeeTaxability::FollowRetailRule => {
            if rules.doc_fee_taxable {
                LeaseDocFeeResolved::Upfront
            } else {
                LeaseDocFeeResolved::Exempt
            }
        }
    }
}

/// Is a rebate of the given scope taxable on a lease, after the lease
/// record's override is applied?
pub fn lease_rebate_taxable(rules: &TaxRulesConfig, scope: RebateScope) -> RebateDecision {
    use crate::types::LeaseRebateBehavior as B;
    match rules.lease_rules.rebate_behavior {
        B::AlwaysTaxable => RebateDecision {
            taxable: true,
            note: Some("lease rule: rebates always taxable".into()),
        },
        B::AlwaysNonTaxable => RebateDecision {
            taxable: false,
            note: Some("lease rule: rebates never taxable".into()),
        },
        // Cap-cost reductions are by definition applied at signing.
        B::NonTaxableIfAtSigning => RebateDecision {
            taxable: false,
            note: Some("lease rule: rebates applied at signing are exempt".into()),
        },
        B::FollowRetailRule => is_rebate_taxable(rules, scope),
    }
}
