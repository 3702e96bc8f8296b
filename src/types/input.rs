//! Per-call deal input.
//!
//! The engine is a pure function of this record plus the rule record; the
//! surrounding systems (deal desk, HTTP layer, jurisdiction resolver) build
//! it and consume the result. All rates arrive pre-composed for the deal's
//! jurisdiction; the engine performs no rate lookups of its own.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DealType, StateCode, TaxLevel, VehicleClass};

/// One pre-composed jurisdiction rate row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Display label, carried through to the output line
    pub label: String,
    /// Jurisdiction level; drives split-base and cap handling
    pub level: TaxLevel,
    /// Decimal rate in [0, 1]
    pub rate: Decimal,
}

/// A coded fee on the deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherFee {
    /// Fee code matched against the rule's fee tax rules
    pub code: String,
    /// Fee amount
    pub amount: Decimal,
}

/// Lease-only deal figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseInput {
    /// Agreed vehicle value at lease start
    pub gross_cap_cost: Decimal,
    /// Cash cap-cost reduction
    #[serde(default)]
    pub cap_reduction_cash: Decimal,
    /// Trade-equity cap-cost reduction
    #[serde(default)]
    pub cap_reduction_trade_in: Decimal,
    /// Manufacturer-rebate cap-cost reduction
    #[serde(default)]
    pub cap_reduction_rebate_manufacturer: Decimal,
    /// Dealer-rebate cap-cost reduction
    #[serde(default)]
    pub cap_reduction_rebate_dealer: Decimal,
    /// Base payment before tax
    pub base_payment: Decimal,
    /// Number of payments in the term
    pub payment_count: u32,
}

/// Tax already paid to an origin state on this vehicle. Presence of this
/// record is what triggers the reciprocity resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginTaxInfo {
    /// State the tax was paid to
    pub origin_state: StateCode,
    /// Dollar tax paid
    pub tax_paid: Decimal,
    /// Effective rate paid, for `RatePaid`-basis states
    #[serde(default)]
    pub rate_paid: Option<Decimal>,
    /// Date the origin tax was paid
    pub paid_at: NaiveDate,
}

/// Everything the engine needs to price the tax on one deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationInput {
    /// Destination (taxing) state
    pub state_code: String,
    /// Calculation date; the engine never reads the clock
    pub as_of_date: NaiveDate,
    /// Retail or lease
    pub deal_type: DealType,

    /// Negotiated vehicle price, rebates already applied as payment
    pub vehicle_price: Decimal,
    /// Dealer-installed accessories
    #[serde(default)]
    pub accessories_amount: Decimal,
    /// Trade-in allowance
    #[serde(default)]
    pub trade_in_value: Decimal,
    /// Manufacturer rebate total
    #[serde(default)]
    pub rebate_manufacturer: Decimal,
    /// Dealer rebate total
    #[serde(default)]
    pub rebate_dealer: Decimal,
    /// Dealer documentation fee
    #[serde(default)]
    pub doc_fee: Decimal,
    /// Coded fees (title, registration, plate...)
    #[serde(default)]
    pub other_fees: Vec<OtherFee>,
    /// Vehicle service contract price
    #[serde(default)]
    pub service_contracts: Decimal,
    /// GAP coverage price
    #[serde(default)]
    pub gap: Decimal,
    /// Negative equity rolled into the deal
    #[serde(default)]
    pub negative_equity: Decimal,
    /// Tax the dealer has already collected on this deal
    #[serde(default)]
    pub tax_already_collected: Decimal,
    /// Pre-composed jurisdiction rates
    pub rates: Vec<RateEntry>,

    /// Lease figures; required when `deal_type` is `Lease`
    #[serde(default)]
    pub lease: Option<LeaseInput>,
    /// Origin-state tax record; triggers reciprocity
    #[serde(default)]
    pub origin: Option<OriginTaxInfo>,

    /// Vehicle class for class-sensitive rules
    #[serde(default)]
    pub vehicle_class: Option<VehicleClass>,
    /// Gross vehicle weight (lbs) for GVW-restricted overrides
    #[serde(default)]
    pub gvw: Option<u32>,
    /// Customer is titling as a new resident
    #[serde(default)]
    pub customer_is_new_resident: bool,
    /// Resolved local jurisdiction of the lessee (Chicago, home-rule city),
    /// matched against the rule's local lease use taxes
    #[serde(default)]
    pub lessee_jurisdiction: Option<String>,
}

impl TaxCalculationInput {
    /// Combined rate across all rate rows (informational).
    pub fn combined_rate(&self) -> Decimal {
        self.rates.iter().map(|r| r.rate).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn minimal_input() -> TaxCalculationInput {
        TaxCalculationInput {
            state_code: "IN".to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
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
                label: "IN state".to_string(),
                level: TaxLevel::State,
                rate: dec!(0.07),
            }],
            lease: None,
            origin: None,
            vehicle_class: None,
            gvw: None,
            customer_is_new_resident: false,
            lessee_jurisdiction: None,
        }
    }

    #[test]
    fn test_combined_rate() {
        let mut input = minimal_input();
        input.rates.push(RateEntry {
            label: "county".to_string(),
            level: TaxLevel::County,
            rate: dec!(0.02),
        });
        assert_eq!(input.combined_rate(), dec!(0.09));
    }

    #[test]
    fn test_input_json_round_trip() {
        let input = minimal_input();
        let json = serde_json::to_string(&input).unwrap();
        let back: TaxCalculationInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
    }
}
