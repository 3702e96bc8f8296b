//! Lease tax pipeline.
//!
//! Produces two slugs: an upfront tax due at signing and a per-period tax
//! due with each payment. The rule's `LeaseMethod` decides where the
//! consideration is taxed:
//!
//! ```text
//! Monthly     payments taxed as made; only forced-upfront items at signing
//! FullUpfront whole consideration taxed at inception (IA, OK, ND)
//! Hybrid      cap reductions taxed upfront AND payments taxed (AL)
//! NetCapCost  net capitalized cost taxed at inception (TX)
//! ReducedBase total payments taxed at inception; formula notes in extras
//! ```
//!
//! # Invariants
//! - `total_tax_over_term = upfront + per_period * payment_count` exactly:
//!   per-period lines round per period and are scaled, never re-rounded
//! - A base clamped to zero yields zero-tax lines, not negatives

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::interpret::{self, LeaseDocFeeResolved};
use crate::types::{
    AppliedFee, DebugTrace, ExemptComponent, LeaseInput, LeaseMethod, LeaseSpecialScheme,
    LeaseTradeInCreditMode, Money, RebateApplication, RebateScope, TaxBases, TaxCalculationInput,
    TaxError, TaxLevel, TaxLine, TaxResult, TaxRulesConfig, TradeInPolicy,
};

use super::{apply_rate_rows, schemes, DraftTaxes, PipelineDraft, SplitBases};

/// Run the lease pipeline for a validated input.
pub fn calculate(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
) -> TaxResult<PipelineDraft> {
    let lease = input
        .lease
        .as_ref()
        .ok_or_else(|| TaxError::invalid("lease", "lease fields required for a lease deal"))?;

    let mut debug = DebugTrace::default();
    let mut exempt = Vec::new();

    let method = rules.lease_rules.method;
    let (upfront_base, per_period_base) = match method {
        LeaseMethod::Monthly => {
            let up = forced_upfront_base(input, lease, rules, false, &mut exempt, &mut debug)?;
            (up, lease.base_payment)
        }
        LeaseMethod::Hybrid => {
            // Cap reductions are taxed at signing under this method even
            // when the flag is off.
            let up = forced_upfront_base(input, lease, rules, true, &mut exempt, &mut debug)?;
            (up, lease.base_payment)
        }
        LeaseMethod::FullUpfront => {
            let up = full_upfront_consideration(input, lease, rules, &mut exempt, &mut debug)?;
            (up, dec!(0))
        }
        LeaseMethod::NetCapCost => {
            let up = net_cap_cost_base(input, lease, rules, &mut exempt, &mut debug)?;
            (up, dec!(0))
        }
        LeaseMethod::ReducedBase => {
            let up = Decimal::from(lease.payment_count) * lease.base_payment;
            if let Some(formula) = &rules.extras.lease_price_formula {
                debug.note(format!("reduced-base lease formula: {formula}"));
            }
            debug.note("lease taxed on total payments at inception");
            // Forced-upfront items still apply.
            let extra = forced_upfront_base(input, lease, rules, false, &mut exempt, &mut debug)?;
            (up + extra, dec!(0))
        }
    };

    let upfront_base = clamp_base(upfront_base, "upfront", &mut debug);
    let per_period_base = clamp_base(per_period_base, "per-period", &mut debug);

    let state_cap = per_period_state_cap(rules, &mut debug);

    let mut upfront = if upfront_base > dec!(0) {
        apply_rate_rows(
            &input.rates,
            SplitBases::uniform(upfront_base),
            None,
            rules,
            &mut debug,
        )
    } else {
        Vec::new()
    };

    if let Some(flat) = rules.extras.lease_upfront_flat_fee {
        upfront.push(TaxLine::flat(
            format!("{} one-time lease fee", rules.state_code),
            TaxLevel::Special,
            Money::new(flat),
        ));
    }

    let mut per_period = if per_period_base > dec!(0) {
        apply_rate_rows(
            &input.rates,
            SplitBases::uniform(per_period_base),
            state_cap,
            rules,
            &mut debug,
        )
    } else {
        Vec::new()
    };

    schemes::apply_scheme(
        input,
        lease,
        rules,
        &mut upfront,
        &mut per_period,
        &mut debug,
    )?;

    Ok(PipelineDraft {
        bases: TaxBases {
            total_taxable_base: Money::new(upfront_base).round_cents(),
            state_taxable_base: Money::new(upfront_base).round_cents(),
            local_taxable_base: Money::new(upfront_base).round_cents(),
            exempt_components: exempt,
        },
        taxes: DraftTaxes::Lease {
            upfront,
            per_period,
            terms: lease.payment_count,
        },
        debug,
    })
}

/// Items the rule forces into the upfront slug: the taxable doc fee, the
/// cap-cost-reduction taxable base, taxable fees when `tax_fees_upfront`,
/// upfront title fees, and taxed-back negative equity.
fn forced_upfront_base(
    input: &TaxCalculationInput,
    lease: &LeaseInput,
    rules: &TaxRulesConfig,
    force_cap_reduction: bool,
    exempt: &mut Vec<ExemptComponent>,
    debug: &mut DebugTrace,
) -> TaxResult<Decimal> {
    let mut base = dec!(0);

    base += doc_fee_contribution(input, rules, exempt, debug)?;

    if rules.lease_rules.tax_cap_reduction || force_cap_reduction {
        base += cap_reduction_taxable(lease, rules, debug)?;
    } else if lease.cap_reduction_cash > dec!(0)
        || lease.cap_reduction_trade_in > dec!(0)
        || lease.cap_reduction_rebate_manufacturer > dec!(0)
        || lease.cap_reduction_rebate_dealer > dec!(0)
    {
        debug.note("cap-cost reductions are not taxed in this state");
    }

    base += upfront_fee_contribution(input, rules, exempt, debug);

    if rules.lease_rules.negative_equity_taxable && input.negative_equity > dec!(0) {
        debug.note("negative equity added back to the taxed consideration");
        base += input.negative_equity;
    }

    Ok(base)
}

/// The taxable portion of the doc fee, zero when the lease record exempts
/// it. The retail cap still limits the taxable portion.
fn doc_fee_contribution(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
    exempt: &mut Vec<ExemptComponent>,
    debug: &mut DebugTrace,
) -> TaxResult<Decimal> {
    if input.doc_fee <= dec!(0) {
        return Ok(dec!(0));
    }
    match interpret::lease_doc_fee_taxability(rules) {
        LeaseDocFeeResolved::Exempt => {
            exempt.push(ExemptComponent {
                code: "doc_fee".to_string(),
                amount: Money::new(input.doc_fee).round_cents(),
            });
            Ok(dec!(0))
        }
        LeaseDocFeeResolved::Upfront => {
            let (taxable, excess, note) = interpret::doc_fee_taxable_portion_for_lease(
                rules,
                input.doc_fee,
            )?;
            if let Some(note) = note {
                debug.note(note);
            }
            if excess > dec!(0) {
                exempt.push(ExemptComponent {
                    code: "doc_fee".to_string(),
                    amount: Money::new(excess).round_cents(),
                });
            }
            debug.taxable_doc_fee = Money::new(taxable).round_cents();
            Ok(taxable)
        }
    }
}

/// The cap-cost-reduction taxable base. Cash always contributes; rebates
/// contribute per the lease rebate override; the trade contribution
/// follows the lease trade-in credit mode.
fn cap_reduction_taxable(
    lease: &LeaseInput,
    rules: &TaxRulesConfig,
    debug: &mut DebugTrace,
) -> TaxResult<Decimal> {
    let mut base = lease.cap_reduction_cash;

    let rebate_rows = [
        (RebateScope::Manufacturer, lease.cap_reduction_rebate_manufacturer),
        (RebateScope::Dealer, lease.cap_reduction_rebate_dealer),
    ];
    for (scope, amount) in rebate_rows {
        if amount <= dec!(0) {
            continue;
        }
        let decision = interpret::lease_rebate_taxable(rules, scope);
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
            debug.applied_rebates_non_taxable.push(application);
        }
    }

    let (contribution, subtracts) = trade_contribution(lease.cap_reduction_trade_in, rules, debug)?;
    base += contribution;
    base -= subtracts;

    Ok(base)
}

/// Trade-in contribution to a taxed lease consideration. Returns the
/// amount taxed and the amount subtracted (a `Full` credit offsets other
/// upfront components before tax).
fn trade_contribution(
    trade: Decimal,
    rules: &TaxRulesConfig,
    debug: &mut DebugTrace,
) -> TaxResult<(Decimal, Decimal)> {
    if trade <= dec!(0) {
        return Ok((dec!(0), dec!(0)));
    }
    let mode = rules.lease_rules.trade_in_credit;
    match mode {
        LeaseTradeInCreditMode::Full => {
            debug.note("trade equity credited against the taxed consideration");
            debug.applied_trade_in = Money::new(trade).round_cents();
            Ok((dec!(0), trade))
        }
        LeaseTradeInCreditMode::None => {
            debug.note("trade equity is taxed as part of the consideration");
            Ok((trade, dec!(0)))
        }
        LeaseTradeInCreditMode::CapCostOnly => {
            debug.note("trade equity lowers the payment but is not separately taxed");
            Ok((dec!(0), dec!(0)))
        }
        LeaseTradeInCreditMode::FollowRetailRule => {
            let applied = interpret::interpret_trade_in_policy(&rules.trade_in_policy, trade)?;
            if let Some(note) = &applied.note {
                debug.note(note.clone());
            }
            match rules.trade_in_policy {
                TradeInPolicy::None { .. } => Ok((trade, dec!(0))),
                // The uncredited remainder of a capped or percentage
                // policy stays in the consideration.
                _ => {
                    debug.applied_trade_in = Money::new(applied.state_credit).round_cents();
                    Ok((trade - applied.state_credit, applied.state_credit))
                }
            }
        }
    }
}

/// Taxable coded fees, routed upfront when the rule says so. Title-fee
/// rows take precedence over the general lease fee rules for their code.
fn upfront_fee_contribution(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
    exempt: &mut Vec<ExemptComponent>,
    debug: &mut DebugTrace,
) -> Decimal {
    let mut base = dec!(0);
    for fee in &input.other_fees {
        if let Some(title_rule) = rules
            .lease_rules
            .title_fee_rules
            .iter()
            .find(|r| r.code.eq_ignore_ascii_case(&fee.code))
        {
            if title_rule.taxable && title_rule.included_in_upfront {
                base += fee.amount;
                debug.taxable_fees.push(AppliedFee {
                    code: fee.code.clone(),
                    amount: Money::new(fee.amount).round_cents(),
                });
            } else {
                exempt.push(ExemptComponent {
                    code: fee.code.clone(),
                    amount: Money::new(fee.amount).round_cents(),
                });
            }
            continue;
        }

        let decision = interpret::is_fee_taxable(&rules.lease_rules.fee_tax_rules, &fee.code);
        if let Some(note) = decision.note {
            debug.note(note);
        }
        if decision.taxable {
            if rules.lease_rules.tax_fees_upfront {
                base += fee.amount;
                debug.taxable_fees.push(AppliedFee {
                    code: fee.code.clone(),
                    amount: Money::new(fee.amount).round_cents(),
                });
            } else {
                debug.note(format!(
                    "fee {} is capitalized; taxed through the payment stream",
                    fee.code
                ));
            }
        } else {
            exempt.push(ExemptComponent {
                code: fee.code.clone(),
                amount: Money::new(fee.amount).round_cents(),
            });
        }
    }
    base
}

/// The whole-lease consideration taxed at inception (IA, OK, ND).
///
/// ```text
/// total = base_payment * payment_count
///       + taxed cap reductions (cash, rebates per override, trade per mode)
///       + taxable doc fee and fees
/// ```
///
/// Iowa's inversion - the trade allowance is added back because it already
/// reduced the observed payments - is the `None` trade-credit mode here.
fn full_upfront_consideration(
    input: &TaxCalculationInput,
    lease: &LeaseInput,
    rules: &TaxRulesConfig,
    exempt: &mut Vec<ExemptComponent>,
    debug: &mut DebugTrace,
) -> TaxResult<Decimal> {
    let payments = Decimal::from(lease.payment_count) * lease.base_payment;
    let mut total = payments + lease.cap_reduction_cash;

    let rebate_rows = [
        (RebateScope::Manufacturer, lease.cap_reduction_rebate_manufacturer),
        (RebateScope::Dealer, lease.cap_reduction_rebate_dealer),
    ];
    for (scope, amount) in rebate_rows {
        if amount <= dec!(0) {
            continue;
        }
        let decision = interpret::lease_rebate_taxable(rules, scope);
        if let Some(note) = decision.note {
            debug.note(note);
        }
        let application = RebateApplication {
            scope,
            amount: Money::new(amount).round_cents(),
        };
        if decision.taxable {
            total += amount;
            debug.applied_rebates_taxable.push(application);
        } else {
            debug.applied_rebates_non_taxable.push(application);
        }
    }

    let (contribution, subtracts) = trade_contribution(lease.cap_reduction_trade_in, rules, debug)?;
    total += contribution;
    total -= subtracts;

    if let Some(formula) = &rules.extras.lease_price_formula {
        debug.note(format!("lease consideration formula: {formula}"));
    }

    total += doc_fee_contribution(input, rules, exempt, debug)?;
    total += upfront_fee_contribution(input, rules, exempt, debug);

    if rules.lease_rules.negative_equity_taxable && input.negative_equity > dec!(0) {
        debug.note("negative equity added back to the taxed consideration");
        total += input.negative_equity;
    }

    Ok(total)
}

/// Net capitalized cost taxed at inception (TX).
fn net_cap_cost_base(
    input: &TaxCalculationInput,
    lease: &LeaseInput,
    rules: &TaxRulesConfig,
    exempt: &mut Vec<ExemptComponent>,
    debug: &mut DebugTrace,
) -> TaxResult<Decimal> {
    let mut net = lease.gross_cap_cost - lease.cap_reduction_cash;

    let rebate_rows = [
        (RebateScope::Manufacturer, lease.cap_reduction_rebate_manufacturer),
        (RebateScope::Dealer, lease.cap_reduction_rebate_dealer),
    ];
    for (scope, amount) in rebate_rows {
        if amount <= dec!(0) {
            continue;
        }
        let decision = interpret::lease_rebate_taxable(rules, scope);
        if !decision.taxable {
            net -= amount;
            debug.applied_rebates_non_taxable.push(RebateApplication {
                scope,
                amount: Money::new(amount).round_cents(),
            });
        }
    }

    // Under this method the trade either reduces the taxed cap cost or is
    // left inside it; it is never added on top.
    let (_taxed_on_top, subtracts) =
        trade_contribution(lease.cap_reduction_trade_in, rules, debug)?;
    net -= subtracts;

    debug.note("lease taxed on the net capitalized cost at inception");

    net += doc_fee_contribution(input, rules, exempt, debug)?;
    net += upfront_fee_contribution(input, rules, exempt, debug);

    Ok(net)
}

/// Per-article cap on the state portion of each payment's tax (TN).
fn per_period_state_cap(rules: &TaxRulesConfig, debug: &mut DebugTrace) -> Option<Decimal> {
    if rules.lease_rules.special_scheme == LeaseSpecialScheme::TnSingleArticleCap {
        if let Some(cap) = rules.extras.single_article_base_cap {
            debug.note(format!(
                "single-article cap: state-level payment tax base limited to ${cap}"
            ));
            return Some(cap);
        }
    }
    None
}

fn clamp_base(base: Decimal, which: &str, debug: &mut DebugTrace) -> Decimal {
    if base < dec!(0) {
        debug.note(format!("{which} taxable base clamped to zero"));
        dec!(0)
    } else {
        base
    }
}
