//! Indiana.
//!
//! 7% state rate; vehicles are exempt from county and local option taxes.
//! Manufacturer rebates are deducted from the taxable price; dealer
//! incentives are not. Service contracts and GAP sold with the vehicle
//! are part of the taxable unitary price.

use crate::types::*;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::IN,
        version: 3,
        trade_in_policy: TradeInPolicy::Full {
            notes: Some("like-kind trade-in deducted from the selling price".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: false,
                notes: Some("manufacturer rebates assigned at sale reduce the taxable price".into()),
            },
            RebateRule {
                applies_to: RebateScope::Dealer,
                taxable: true,
                notes: Some("dealer incentives are consideration; no reduction".into()),
            },
        ],
        doc_fee_taxable: true,
        doc_fee_cap: None,
        fee_tax_rules: vec![
            FeeTaxRule {
                code: "TITLE".into(),
                taxable: false,
                notes: Some("government charge".into()),
            },
            FeeTaxRule {
                code: "REG".into(),
                taxable: false,
                notes: None,
            },
        ],
        tax_on_accessories: true,
        tax_on_negative_equity: true,
        tax_on_service_contracts: true,
        tax_on_gap: true,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::Monthly,
            tax_cap_reduction: false,
            rebate_behavior: LeaseRebateBehavior::FollowRetailRule,
            doc_fee_taxability: LeaseDocFeeTaxability::FollowRetailRule,
            trade_in_credit: LeaseTradeInCreditMode::FollowRetailRule,
            negative_equity_taxable: false,
            fee_tax_rules: vec![],
            title_fee_rules: vec![],
            tax_fees_upfront: true,
            special_scheme: LeaseSpecialScheme::None,
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
            notes: Some("no-tax origin states are denied through the pair matrix".into()),
        },
        extras: RuleExtras {
            docs: Some("IC 6-2.5-5; Sales Tax Information Bulletin #28S".into()),
            ..RuleExtras::default()
        },
    }
}
