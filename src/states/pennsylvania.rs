//! Pennsylvania.
//!
//! 6% state rate, plus 1% Allegheny County or 2% Philadelphia where the
//! buyer resides. Manufacturer rebates reduce the purchase price. Each
//! lease payment carries the sales tax plus the separate 3% motor vehicle
//! lease tax. Out-of-state credit is granted only to states that
//! reciprocate.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::PA,
        version: 3,
        trade_in_policy: TradeInPolicy::Full {
            notes: None,
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: false,
                notes: Some("rebate assigned to the dealer reduces the purchase price".into()),
            },
            RebateRule {
                applies_to: RebateScope::Dealer,
                taxable: false,
                notes: Some("treated as a price discount".into()),
            },
        ],
        doc_fee_taxable: true,
        doc_fee_cap: None,
        fee_tax_rules: vec![],
        tax_on_accessories: true,
        tax_on_negative_equity: false,
        tax_on_service_contracts: true,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StatePlusLocal,
        vehicle_uses_local_sales_tax: true,
        lease_rules: LeaseRules {
            method: LeaseMethod::Monthly,
            tax_cap_reduction: true,
            rebate_behavior: LeaseRebateBehavior::FollowRetailRule,
            doc_fee_taxability: LeaseDocFeeTaxability::Always,
            trade_in_credit: LeaseTradeInCreditMode::CapCostOnly,
            negative_equity_taxable: false,
            fee_tax_rules: vec![],
            title_fee_rules: vec![],
            tax_fees_upfront: true,
            special_scheme: LeaseSpecialScheme::PaLeaseTax,
        },
        reciprocity: ReciprocityRules {
            enabled: true,
            scope: ReciprocityScope::Both,
            home_state_behavior: ReciprocityHomeBehavior::CreditUpToStateRate,
            require_proof_of_tax_paid: true,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            default_window_days: None,
            overrides: vec![
                ReciprocityOverride {
                    origin_state: StateCode::NV,
                    disallow_credit: false,
                    window_days: None,
                    mutual_credit_required: true,
                    vehicle_classes: None,
                    max_gvw: None,
                    notes: Some("credit only under a reciprocal agreement".into()),
                },
                ReciprocityOverride {
                    origin_state: StateCode::AZ,
                    disallow_credit: false,
                    window_days: None,
                    mutual_credit_required: true,
                    vehicle_classes: None,
                    max_gvw: None,
                    notes: Some("credit only under a reciprocal agreement".into()),
                },
            ],
            notes: None,
        },
        extras: RuleExtras {
            lease_surcharge_rate: Some(dec!(0.03)),
            docs: Some("61 Pa. Code 31.41; PTA motor vehicle lease tax".into()),
            ..RuleExtras::default()
        },
    }
}
