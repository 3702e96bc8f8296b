//! West Virginia.
//!
//! The DMV privilege tax replaces sales tax at titling: 5% base rate,
//! 6% for motor homes, 3% for trailers. The trade-in credit is capped at
//! $25,000. Unlike most states, service contracts and GAP sold with the
//! vehicle are taxable.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::WV,
        version: 2,
        trade_in_policy: TradeInPolicy::Capped {
            amount: dec!(25000),
            notes: Some("statutory ceiling on the trade-in credit".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: false,
                notes: None,
            },
            RebateRule {
                applies_to: RebateScope::Dealer,
                taxable: true,
                notes: None,
            },
        ],
        doc_fee_taxable: true,
        doc_fee_cap: None,
        fee_tax_rules: vec![],
        tax_on_accessories: true,
        tax_on_negative_equity: false,
        tax_on_service_contracts: true,
        tax_on_gap: true,
        vehicle_tax_scheme: VehicleTaxScheme::DmvPrivilegeTax,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::Monthly,
            tax_cap_reduction: false,
            rebate_behavior: LeaseRebateBehavior::FollowRetailRule,
            doc_fee_taxability: LeaseDocFeeTaxability::FollowRetailRule,
            trade_in_credit: LeaseTradeInCreditMode::CapCostOnly,
            negative_equity_taxable: false,
            fee_tax_rules: vec![],
            title_fee_rules: vec![],
            tax_fees_upfront: true,
            special_scheme: LeaseSpecialScheme::None,
        },
        reciprocity: ReciprocityRules {
            enabled: true,
            scope: ReciprocityScope::Retail,
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
            privilege_base_rate: Some(dec!(0.05)),
            privilege_class_rates: vec![
                (VehicleClass::Rv, dec!(0.06)),
                (VehicleClass::Trailer, dec!(0.03)),
            ],
            docs: Some("W. Va. Code 17A-3-4".into()),
            ..RuleExtras::default()
        },
    }
}
