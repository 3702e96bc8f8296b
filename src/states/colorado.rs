//! Colorado.
//!
//! 2.9% state rate plus stacked county, city, and district rates.
//! Home-rule cities levy their own lease use taxes on each payment,
//! collected alongside the state tax.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::CO,
        version: 2,
        trade_in_policy: TradeInPolicy::Full { notes: None },
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
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StatePlusLocal,
        vehicle_uses_local_sales_tax: true,
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
            special_scheme: LeaseSpecialScheme::CoHomeRuleLease,
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
            lease_local_use_taxes: vec![
                LocalLeaseUseTax {
                    jurisdiction: "Denver".into(),
                    label: "Denver lease use tax".into(),
                    rate: dec!(0.0481),
                },
                LocalLeaseUseTax {
                    jurisdiction: "Boulder".into(),
                    label: "Boulder lease use tax".into(),
                    rate: dec!(0.0386),
                },
            ],
            docs: Some("C.R.S. 39-26-104; home-rule city codes".into()),
            ..RuleExtras::default()
        },
    }
}
