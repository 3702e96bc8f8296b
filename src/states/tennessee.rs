//! Tennessee.
//!
//! 7% state rate plus local option rates. The single-article rule caps
//! the base the full state rate applies to; local tax is uncapped here
//! because the deal's local rate rows arrive pre-composed for the
//! county. The same cap applies per payment on leases.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::TN,
        version: 2,
        trade_in_policy: TradeInPolicy::Full { notes: None },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("rebates do not reduce the sales price".into()),
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
        tax_on_negative_equity: true,
        tax_on_service_contracts: true,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StatePlusLocal,
        vehicle_uses_local_sales_tax: true,
        lease_rules: LeaseRules {
            method: LeaseMethod::Monthly,
            tax_cap_reduction: true,
            rebate_behavior: LeaseRebateBehavior::FollowRetailRule,
            doc_fee_taxability: LeaseDocFeeTaxability::Always,
            trade_in_credit: LeaseTradeInCreditMode::Full,
            negative_equity_taxable: true,
            fee_tax_rules: vec![],
            title_fee_rules: vec![],
            tax_fees_upfront: true,
            special_scheme: LeaseSpecialScheme::TnSingleArticleCap,
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
            single_article_base_cap: Some(dec!(3200)),
            single_article_first_threshold: Some(dec!(1600)),
            single_article_second_threshold: Some(dec!(3200)),
            docs: Some("Tenn. Code 67-6-702, single article limitation".into()),
            ..RuleExtras::default()
        },
    }
}
