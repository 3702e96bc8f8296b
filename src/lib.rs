//! # Tax Engine
//!
//! A pure Rust calculation engine for US automotive sales/use tax.
//! Given a retail or lease deal and a per-state rule record, it produces a
//! deterministic, audit-ready breakdown of every tax, exempt fee, and
//! taxable base in the deal.
//!
//! ## Features
//!
//! - **Declarative rules** - each state is a data record in a small DSL;
//!   interpreters are the only code that reads it
//! - **Pure functions** - no side effects, no clock reads, no I/O;
//!   identical inputs produce identical outputs
//! - **Precise math** - `rust_decimal` everywhere, banker's rounding at
//!   the per-tax-line boundary
//! - **Audit trail** - every decision is recorded in the result's debug
//!   record
//!
//! ## Architecture
//!
//! ```text
//! Input -> validate -> registry lookup -> dispatch
//!       -> retail | lease | TAVT | HUT | privilege pipeline
//!       -> reciprocity resolver
//!       -> TaxCalculationResult
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tax_engine::prelude::*;
//!
//! let engine = TaxEngine::with_builtin_rules();
//! let result = engine.calculate(&input)?;
//!
//! println!("Tax due: {}", result.taxes.total_tax);
//! for line in &result.taxes.by_label {
//!     println!("  {}: {}", line.label, line.amount);
//! }
//! ```
//!
//! ## Concurrency
//!
//! Rule records and the state-pair matrix are immutable after engine
//! construction; calculations allocate only per-call values. The engine
//! may be shared across threads freely. Hot reload of rules is a new
//! engine instance swapped at the caller's boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod dispatch;
pub mod interpret;
pub mod pipeline;
pub mod reciprocity;
pub mod registry;
pub mod states;
pub mod types;

// Re-export commonly used types
pub use types::{
    // Input
    LeaseInput, OriginTaxInfo, OtherFee, RateEntry, TaxCalculationInput,

    // Money
    Money, Rate,

    // Rule DSL
    FeeTaxRule, LeaseDocFeeTaxability, LeaseMethod, LeaseRebateBehavior, LeaseRules,
    LeaseSpecialScheme, LeaseTradeInCreditMode, RebateRule, RebateScope, ReciprocityBasis,
    ReciprocityHomeBehavior, ReciprocityOverride, ReciprocityRules, ReciprocityScope, RuleExtras,
    RuleStatus, TaxRulesConfig, TitleFeeRule, TradeInPolicy, VehicleTaxScheme,

    // Output
    DebugTrace, ExemptComponent, LeaseBreakdown, TaxBases, TaxCalculationResult, TaxLine,
    TaxSummary,

    // Common
    DealType, DecimalExt, StateCode, TaxError, TaxLevel, TaxResult, VehicleClass,
};

pub use dispatch::{calculate_tax, calculate_tax_json, validate_input, TaxEngine};
pub use registry::{RuleRegistry, StatePairRule};

/// Prelude module for convenient imports
pub mod prelude {
    //! Commonly used types and traits.
    //!
    //! ```rust,ignore
    //! use tax_engine::prelude::*;
    //! ```

    pub use crate::dispatch::{calculate_tax, TaxEngine};
    pub use crate::registry::RuleRegistry;
    pub use crate::types::{
        DealType, DecimalExt, LeaseInput, Money, OriginTaxInfo, Rate, RateEntry, StateCode,
        TaxCalculationInput, TaxCalculationResult, TaxError, TaxLevel, TaxResult, TaxRulesConfig,
    };

    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_library_exports() {
        let _deal_type = DealType::Retail;
        let _money = Money::new(dec!(100));
        let _rate = Rate::from_percentage(dec!(6.25));
        let _engine = TaxEngine::with_builtin_rules();
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _money = Money::new(dec!(100));
        let _registry = RuleRegistry::builtin();
    }
}
