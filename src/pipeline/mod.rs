//! Calculation pipelines.
//!
//! The dispatcher routes every deal through exactly one pipeline:
//!
//! ```text
//! Retail  -> retail::calculate
//! Lease   -> lease::calculate
//!            -> ComputeCapReductionTaxable -> ComputeMonthlyTaxable
//!            -> (if special scheme) ApplySchemeAdjustment
//!            -> ApplyRateRows -> ApplyReciprocity -> Emit
//! TAVT / HUT / privilege -> special::*  (full replacements)
//! ```
//!
//! Phases are computation steps, not run-time state; transitions are
//! unconditional in order and every call starts from scratch.

pub mod lease;
pub mod retail;
pub mod schemes;
pub mod special;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{DebugTrace, Money, Rate, RateEntry, TaxLine, TaxRulesConfig};

/// Tax lines as a pipeline produced them, before reciprocity and
/// finalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftTaxes {
    /// One flat set of lines
    Retail {
        /// Lines for the whole deal
        lines: Vec<TaxLine>,
    },
    /// Upfront and recurring slugs
    Lease {
        /// Lines due at signing
        upfront: Vec<TaxLine>,
        /// Lines due with each payment
        per_period: Vec<TaxLine>,
        /// Number of payments
        terms: u32,
    },
}

impl DraftTaxes {
    /// Total destination tax before credits: the figure reciprocity is
    /// capped against.
    pub fn total_due(&self) -> Money {
        match self {
            DraftTaxes::Retail { lines } => {
                lines.iter().fold(Money::ZERO, |acc, l| acc + l.amount)
            }
            DraftTaxes::Lease {
                upfront,
                per_period,
                terms,
            } => {
                let up = upfront.iter().fold(Money::ZERO, |acc, l| acc + l.amount);
                let per = per_period.iter().fold(Money::ZERO, |acc, l| acc + l.amount);
                up + per * Decimal::from(*terms)
            }
        }
    }
}

/// What a pipeline hands back to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDraft {
    /// Bases the pipeline built
    pub bases: crate::types::TaxBases,
    /// Draft tax lines
    pub taxes: DraftTaxes,
    /// Decision log so far
    pub debug: DebugTrace,
}

/// State and local taxable bases. Equal for most states; a partial
/// trade-in credit or a single-article cap makes them diverge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitBases {
    /// Base seen by state-level rate rows
    pub state: Decimal,
    /// Base seen by local-level rate rows
    pub local: Decimal,
}

impl SplitBases {
    /// A uniform base.
    pub fn uniform(base: Decimal) -> Self {
        SplitBases {
            state: base,
            local: base,
        }
    }

    /// Add an amount to both bases.
    pub fn add(&mut self, amount: Decimal) {
        self.state += amount;
        self.local += amount;
    }

    /// Subtract an amount from both bases (clamping happens at the end of
    /// the base build, not per step).
    pub fn subtract(&mut self, amount: Decimal) {
        self.state -= amount;
        self.local -= amount;
    }

    /// Clamp both bases at zero, noting which were clamped.
    pub fn clamp_zero(&mut self, debug: &mut DebugTrace) {
        if self.state < dec!(0) {
            debug.note("state taxable base clamped to zero");
            self.state = dec!(0);
        }
        if self.local < dec!(0) {
            debug.note("local taxable base clamped to zero");
            self.local = dec!(0);
        }
    }
}

/// Walk the rate rows and produce one tax line per row.
///
/// State-level rows tax the state base (optionally capped per taxed
/// article, Tennessee-style); every other level taxes the local base.
/// Rows are skipped with a note when the rule says vehicles are exempt
/// from local sales tax. Each line rounds to the cent on its own;
/// totals are sums of rounded lines, never round-then-sum.
pub fn apply_rate_rows(
    rates: &[RateEntry],
    bases: SplitBases,
    state_base_cap: Option<Decimal>,
    rules: &TaxRulesConfig,
    debug: &mut DebugTrace,
) -> Vec<TaxLine> {
    let mut lines = Vec::with_capacity(rates.len());
    for entry in rates {
        let base = if entry.level.is_local() {
            if !rules.vehicle_uses_local_sales_tax {
                debug.note(format!(
                    "skipped local rate row {:?}: vehicles are exempt from local sales tax",
                    entry.label
                ));
                continue;
            }
            bases.local
        } else {
            match state_base_cap {
                Some(cap) if bases.state > cap => {
                    debug.note(format!(
                        "state-level base capped at ${cap} for {:?}",
                        entry.label
                    ));
                    cap
                }
                _ => bases.state,
            }
        };
        let amount = (base * entry.rate).round_dp(2);
        lines.push(TaxLine {
            label: entry.label.clone(),
            level: entry.level,
            rate: Rate::from_decimal(entry.rate),
            taxable_base: Money::new(base),
            amount: Money::new(amount),
            is_credit: false,
        });
    }
    lines
}
