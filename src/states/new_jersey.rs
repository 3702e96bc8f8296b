//! New Jersey.
//!
//! 6.625% state rate, no general local sales tax. The lessor may tax the
//! sum of payments at inception, which is how dealer systems file it. A
//! 0.4% luxury surcharge applies to vehicles at or above the statutory
//! threshold.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::NJ,
        version: 2,
        trade_in_policy: TradeInPolicy::Full { notes: None },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("price before the rebate is the receipt".into()),
            },
            RebateRule {
                applies_to: RebateScope::Dealer,
                taxable: false,
                notes: None,
            },
        ],
        doc_fee_taxable: true,
        doc_fee_cap: None,
        fee_tax_rules: vec![],
        tax_on_accessories: true,
        tax_on_negative_equity: false,
        tax_on_service_contracts: true,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::FullUpfront,
            tax_cap_reduction: true,
            rebate_behavior: LeaseRebateBehavior::AlwaysTaxable,
            doc_fee_taxability: LeaseDocFeeTaxability::Always,
            trade_in_credit: LeaseTradeInCreditMode::Full,
            negative_equity_taxable: false,
            fee_tax_rules: vec![],
            title_fee_rules: vec![],
            tax_fees_upfront: true,
            special_scheme: LeaseSpecialScheme::NjLuxury,
        },
        reciprocity: ReciprocityRules {
            enabled: true,
            scope: ReciprocityScope::Both,
            home_state_behavior: ReciprocityHomeBehavior::None,
            require_proof_of_tax_paid: true,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            default_window_days: None,
            overrides: vec![],
            notes: None,
        },
        extras: RuleExtras {
            luxury_threshold: Some(dec!(45000)),
            luxury_rate: Some(dec!(0.004)),
            docs: Some("N.J.S.A. 54:32B; luxury and fuel-inefficient surcharge".into()),
            ..RuleExtras::default()
        },
    }
}
