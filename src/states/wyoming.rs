//! Wyoming.
//!
//! 4% state rate plus county option taxes. Claims reciprocity without a
//! published pair list; treated as credit up to this state's rate with
//! no per-origin overrides.

use crate::types::*;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::WY,
        version: 1,
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
            home_state_behavior: ReciprocityHomeBehavior::CreditUpToStateRate,
            require_proof_of_tax_paid: true,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            default_window_days: None,
            overrides: vec![],
            notes: Some("no published pair list; full credit up to this state's rate".into()),
        },
        extras: RuleExtras {
            docs: Some("Wyo. Stat. 39-15-107".into()),
            ..RuleExtras::default()
        },
    }
}
