//! Retail tax pipeline.
//!
//! # Base Formula
//! ```text
//! base = vehicle_price
//!      + accessories (if taxable)
//!      - trade-in credit (per policy, possibly state-level only)
//!      - non-taxable rebates
//!      + taxable rebates
//!      + taxable doc fee (up to cap)
//!      + taxable fees and products
//! ```
//!
//! # Invariants
//! - Bases never go negative; a clamp is recorded as a note
//! - Each rate row rounds to the cent on its own; totals are sums of
//!   rounded lines
//! - Split state/local bases arise only from a partial trade-in credit

use rust_decimal_macros::dec;

use crate::interpret;
use crate::types::{
    AppliedFee, DebugTrace, ExemptComponent, Money, RebateApplication, RebateScope, TaxBases,
    TaxCalculationInput, TaxResult, TaxRulesConfig,
};

use super::{apply_rate_rows, DraftTaxes, PipelineDraft, SplitBases};

/// The built retail bases plus everything decided along the way. Shared
/// with the special calculators, which tax the same base differently.
#[derive(Debug, Clone)]
pub(crate) struct RetailBases {
    /// Split state/local bases after the full build
    pub bases: SplitBases,
    /// Exempted components
    pub exempt: Vec<ExemptComponent>,
    /// Decision log so far
    pub debug: DebugTrace,
}

/// Run the retail pipeline for a validated input.
pub fn calculate(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
) -> TaxResult<PipelineDraft> {
    let RetailBases {
        bases,
        exempt,
        mut debug,
    } = build_retail_bases(input, rules)?;

    let state_cap = rules.extras.single_article_base_cap;
    let lines = apply_rate_rows(&input.rates, bases, state_cap, rules, &mut debug);

    if bases.state != bases.local {
        debug.note(format!(
            "split taxable bases: state ${}, local ${}",
            bases.state.round_dp(2),
            bases.local.round_dp(2)
        ));
    }

    Ok(PipelineDraft {
        bases: TaxBases {
            total_taxable_base: Money::new(bases.state).round_cents(),
            state_taxable_base: Money::new(bases.state).round_cents(),
            local_taxable_base: Money::new(bases.local).round_cents(),
            exempt_components: exempt,
        },
        taxes: DraftTaxes::Retail { lines },
        debug,
    })
}

/// Build the retail taxable bases: gross, trade, rebates, doc fee, fees,
/// products, clamp.
pub(crate) fn build_retail_bases(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
) -> TaxResult<RetailBases> {
    let mut debug = DebugTrace::default();
    let mut exempt = Vec::new();

    let (mut bases, gross) = build_gross_base(input, rules, &mut exempt, &mut debug);

    // Trade-in
    let applied = interpret::interpret_trade_in_policy(&rules.trade_in_policy, input.trade_in_value)?;
    if let Some(note) = &applied.note {
        debug.note(note.clone());
    }
    bases.state -= applied.state_credit;
    bases.local -= applied.local_credit;
    debug.applied_trade_in = Money::new(applied.state_credit.min(gross)).round_cents();

    // Rebates
    apply_rebates(input, rules, &mut bases, &mut debug);

    // Doc fee
    let (taxable_doc, exempt_doc, note) = interpret::doc_fee_taxable_portion(rules, input.doc_fee)?;
    if let Some(note) = note {
        debug.note(note);
    }
    if taxable_doc > dec!(0) {
        bases.add(taxable_doc);
    }
    if exempt_doc > dec!(0) {
        exempt.push(ExemptComponent {
            code: "doc_fee".to_string(),
            amount: Money::new(exempt_doc).round_cents(),
        });
    }
    debug.taxable_doc_fee = Money::new(taxable_doc).round_cents();

    // Coded fees
    for fee in &input.other_fees {
        let decision = interpret::is_fee_taxable(&rules.fee_tax_rules, &fee.code);
        if let Some(note) = decision.note {
            debug.note(note);
        }
        if decision.taxable {
            bases.add(fee.amount);
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
    }

    // F&I products and negative equity
    apply_product(
        "service_contracts",
        input.service_contracts,
        rules.tax_on_service_contracts,
        &mut bases,
        &mut exempt,
    );
    apply_product("gap", input.gap, rules.tax_on_gap, &mut bases, &mut exempt);
    apply_product(
        "negative_equity",
        input.negative_equity,
        rules.tax_on_negative_equity,
        &mut bases,
        &mut exempt,
    );

    bases.clamp_zero(&mut debug);

    Ok(RetailBases {
        bases,
        exempt,
        debug,
    })
}

/// Vehicle price plus accessories, accessories exempted when the rule
/// says so. Returns the bases and the gross figure for trade clamping.
fn build_gross_base(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
    exempt: &mut Vec<ExemptComponent>,
    debug: &mut DebugTrace,
) -> (SplitBases, rust_decimal::Decimal) {
    let mut gross = input.vehicle_price;
    if input.accessories_amount > dec!(0) {
        if rules.tax_on_accessories {
            gross += input.accessories_amount;
        } else {
            debug.note("accessories are not taxable in this state");
            exempt.push(ExemptComponent {
                code: "accessories".to_string(),
                amount: Money::new(input.accessories_amount).round_cents(),
            });
        }
    }
    (SplitBases::uniform(gross), gross)
}

/// Dispose of both rebate scopes. A taxable rebate is added back to the
/// base (the negotiated price already reflects it as payment); a
/// non-taxable rebate reduces the base.
fn apply_rebates(
    input: &TaxCalculationInput,
    rules: &TaxRulesConfig,
    bases: &mut SplitBases,
    debug: &mut DebugTrace,
) {
    let scopes = [
        (RebateScope::Manufacturer, input.rebate_manufacturer),
        (RebateScope::Dealer, input.rebate_dealer),
    ];
    for (scope, amount) in scopes {
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
            bases.add(amount);
            debug.applied_rebates_taxable.push(application);
        } else {
            bases.subtract(amount);
            debug.applied_rebates_non_taxable.push(application);
        }
    }
}

fn apply_product(
    code: &str,
    amount: rust_decimal::Decimal,
    taxable: bool,
    bases: &mut SplitBases,
    exempt: &mut Vec<ExemptComponent>,
) {
    if amount <= dec!(0) {
        return;
    }
    if taxable {
        bases.add(amount);
    } else {
        exempt.push(ExemptComponent {
            code: code.to_string(),
            amount: Money::new(amount).round_cents(),
        });
    }
}
