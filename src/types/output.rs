//! Calculation results.
//!
//! Everything the engine decides is visible here: the bases it built, the
//! per-jurisdiction lines it taxed, and a debug record that lets an auditor
//! reconstruct every decision without re-running the engine.

use serde::{Deserialize, Serialize};

use super::money::{Money, Rate};
use super::rules::RebateScope;
use super::TaxLevel;

/// A single tax line: one jurisdiction rate applied to one base.
/// Credits (reciprocity, prepaid tax) appear as negative-amount lines with
/// `is_credit` set, so the line sum always equals the net total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    /// Display label
    pub label: String,
    /// Jurisdiction level
    pub level: TaxLevel,
    /// Rate applied (zero for flat amounts and credits)
    pub rate: Rate,
    /// Base the rate was applied to
    pub taxable_base: Money,
    /// Resulting amount, rounded to the cent
    pub amount: Money,
    /// True for credit lines (negative amounts)
    pub is_credit: bool,
}

impl TaxLine {
    /// A flat-amount line (no rate).
    pub fn flat(label: impl Into<String>, level: TaxLevel, amount: Money) -> Self {
        TaxLine {
            label: label.into(),
            level,
            rate: Rate::ZERO,
            taxable_base: Money::ZERO,
            amount: amount.round_cents(),
            is_credit: false,
        }
    }

    /// A credit line (negative amount).
    pub fn credit(label: impl Into<String>, amount: Money) -> Self {
        TaxLine {
            label: label.into(),
            level: TaxLevel::Special,
            rate: Rate::ZERO,
            taxable_base: Money::ZERO,
            amount: (Money::ZERO - amount).round_cents(),
            is_credit: true,
        }
    }
}

/// A set of tax lines with their summed total.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Net total, exactly the sum of `by_label` amounts
    pub total_tax: Money,
    /// Individual lines
    pub by_label: Vec<TaxLine>,
}

impl TaxSummary {
    /// Build a summary from lines; the total is the exact line sum.
    pub fn from_lines(by_label: Vec<TaxLine>) -> Self {
        let total = by_label
            .iter()
            .fold(Money::ZERO, |acc, line| acc + line.amount);
        TaxSummary {
            total_tax: total.round_cents(),
            by_label,
        }
    }

    /// Append a line, keeping the total in sync.
    pub fn push(&mut self, line: TaxLine) {
        self.total_tax = (self.total_tax + line.amount).round_cents();
        self.by_label.push(line);
    }
}

/// A deal component excluded from the taxable base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExemptComponent {
    /// What was exempted (fee code, "doc_fee_excess", product name...)
    pub code: String,
    /// Exempt amount
    pub amount: Money,
}

/// The taxable bases the pipeline built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxBases {
    /// Headline base; equals the state base when the bases diverge
    pub total_taxable_base: Money,
    /// Base seen by state-level rates
    pub state_taxable_base: Money,
    /// Base seen by local-level rates
    pub local_taxable_base: Money,
    /// Everything excluded, itemized
    pub exempt_components: Vec<ExemptComponent>,
}

/// Lease tax split into its upfront and recurring slugs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseBreakdown {
    /// Tax due at signing
    pub upfront_taxes: TaxSummary,
    /// Tax due with each payment
    pub payment_taxes_per_period: TaxSummary,
    /// `upfront + per_period * terms`
    pub total_tax_over_term: Money,
    /// Number of payments
    pub terms: u32,
}

/// One rebate as the pipeline disposed of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateApplication {
    /// Rebate scope
    pub scope: RebateScope,
    /// Amount disposed
    pub amount: Money,
}

/// A fee that joined the taxable base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFee {
    /// Fee code
    pub code: String,
    /// Taxed amount
    pub amount: Money,
}

/// The audit record: every decision the pipelines made.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DebugTrace {
    /// Trade-in credit actually applied (state-level figure)
    pub applied_trade_in: Money,
    /// Rebates that joined the base
    pub applied_rebates_taxable: Vec<RebateApplication>,
    /// Rebates that reduced the base
    pub applied_rebates_non_taxable: Vec<RebateApplication>,
    /// Taxable portion of the doc fee
    pub taxable_doc_fee: Money,
    /// Coded fees that joined the base
    pub taxable_fees: Vec<AppliedFee>,
    /// Reciprocity credit granted
    pub reciprocity_applied: Money,
    /// Human-readable decision log
    pub notes: Vec<String>,
}

impl DebugTrace {
    /// Append a note to the decision log.
    pub fn note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }
}

/// The complete result of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// Bases the pipeline built
    pub bases: TaxBases,
    /// Tax lines and net total. For lease deals this is the whole-term
    /// view: upfront lines plus per-period lines scaled by the term.
    pub taxes: TaxSummary,
    /// Present exactly when the deal is a lease
    #[serde(default)]
    pub lease_breakdown: Option<LeaseBreakdown>,
    /// Decision log
    pub debug: DebugTrace,
}
