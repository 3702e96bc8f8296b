//! Type definitions for the tax engine.
//!
//! # Module Organization
//!
//! - `money` - Precise financial primitives (Money, Rate)
//! - `rules` - The declarative per-state rule DSL ("what a state may say")
//! - `input` - Per-call deal input
//! - `output` - Calculation results with the audit trail

pub mod input;
pub mod money;
pub mod output;
pub mod rules;

pub use input::{LeaseInput, OriginTaxInfo, OtherFee, RateEntry, TaxCalculationInput};
pub use money::{Money, Rate};
pub use output::{
    AppliedFee, DebugTrace, ExemptComponent, LeaseBreakdown, RebateApplication, TaxBases,
    TaxCalculationResult, TaxLine, TaxSummary,
};
pub use rules::{
    FeeTaxRule, LeaseDocFeeTaxability, LeaseMethod, LeaseRebateBehavior, LeaseRules,
    LeaseSpecialScheme, LeaseTradeInCreditMode, LocalLeaseUseTax, RebateRule, RebateScope,
    ReciprocityBasis, ReciprocityHomeBehavior, ReciprocityOverride, ReciprocityRules,
    ReciprocityScope, RuleExtras, RuleStatus, TaxRulesConfig, TitleFeeRule, TradeInPolicy,
    VehicleTaxScheme,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// US State codes (50 states + DC)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString,
    Display,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[allow(missing_docs)]
pub enum StateCode {
    AL, AK, AZ, AR, CA, CO, CT, DE, DC, FL,
    GA, HI, ID, IL, IN, IA, KS, KY, LA, ME,
    MD, MA, MI, MN, MS, MO, MT, NE, NV, NH,
    NJ, NM, NY, NC, ND, OH, OK, OR, PA, RI,
    SC, SD, TN, TX, UT, VT, VA, WA, WV, WI,
    WY,
}

impl StateCode {
    /// Convert from string slice, None on unknown codes.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

/// Deal type routed by the dispatcher
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum DealType {
    /// Retail purchase (cash or financed)
    Retail,
    /// Closed-end lease
    Lease,
}

/// Vehicle class used by class-sensitive rules (WV privilege rates,
/// reciprocity overrides restricted by class).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum VehicleClass {
    /// Passenger car or SUV
    Passenger,
    /// Light-duty truck
    LightTruck,
    /// Heavy truck (class-sensitive GVW rules)
    HeavyTruck,
    /// Motorcycle
    Motorcycle,
    /// Motor home / recreational vehicle
    Rv,
    /// Trailer
    Trailer,
}

/// Jurisdiction level of a rate row and of each output tax line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum TaxLevel {
    /// State-level rate (subject to state-only credits and caps)
    State,
    /// County-level rate
    County,
    /// City-level rate
    City,
    /// Special district rate (transit districts etc.)
    District,
    /// Special scheme line (TAVT, HUT, surcharges, credits)
    Special,
}

impl TaxLevel {
    /// Whether this level belongs to the "local" side of a split base.
    pub fn is_local(self) -> bool {
        !matches!(self, TaxLevel::State | TaxLevel::Special)
    }
}

/// Engine error type. Everything the engine can report at the boundary.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaxError {
    /// State code not recognised at all
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// Rule record exists but is flagged as an unresearched stub
    #[error("tax rules for {0} are not implemented")]
    NotImplementedForState(String),

    /// Structurally invalid input (negative amounts, missing lease fields...)
    #[error("invalid input: {field}: {reason}")]
    InvalidInput {
        /// Offending input field
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// Rule data that contradicts itself; a bug in the data, not the deal
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl TaxError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TaxError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for engine operations
pub type TaxResult<T> = Result<T, TaxError>;

/// Decimal extension trait for financial calculations
pub trait DecimalExt {
    /// Round to 2 decimal places using banker's rounding
    fn round_money(self) -> Decimal;
}

impl DecimalExt for Decimal {
    fn round_money(self) -> Decimal {
        self.round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_state_code_parsing() {
        assert_eq!(StateCode::from_str_opt("IN"), Some(StateCode::IN));
        assert_eq!(StateCode::from_str_opt("in"), None);
        assert_eq!(StateCode::from_str_opt("ZZ"), None);
    }

    #[test]
    fn test_tax_level_locality() {
        assert!(!TaxLevel::State.is_local());
        assert!(TaxLevel::County.is_local());
        assert!(TaxLevel::City.is_local());
        assert!(!TaxLevel::Special.is_local());
    }

    #[test]
    fn test_round_money_bankers() {
        assert_eq!(dec!(10.125).round_money(), dec!(10.12));
        assert_eq!(dec!(10.126).round_money(), dec!(10.13));
    }
}
