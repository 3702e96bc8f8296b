//! Florida.
//!
//! 6% state rate plus a county discretionary surtax. Service warranties
//! sold with the vehicle are taxable. Dealer discounts reduce the sales
//! price; manufacturer rebates do not.

use crate::types::*;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::FL,
        version: 2,
        trade_in_policy: TradeInPolicy::Full { notes: None },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("rebate is consideration from a third party".into()),
            },
            RebateRule {
                applies_to: RebateScope::Dealer,
                taxable: false,
                notes: None,
            },
        ],
        doc_fee_taxable: true,
        doc_fee_cap: None,
        fee_tax_rules: vec![FeeTaxRule {
            code: "ELT".into(),
            taxable: false,
            notes: Some("electronic title pass-through".into()),
        }],
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
            trade_in_credit: LeaseTradeInCreditMode::Full,
            negative_equity_taxable: false,
            fee_tax_rules: vec![FeeTaxRule {
                code: "ELT".into(),
                taxable: false,
                notes: None,
            }],
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
            notes: None,
        },
        extras: RuleExtras {
            docs: Some("Fla. Stat. 212.05; TIP on discretionary surtax".into()),
            ..RuleExtras::default()
        },
    }
}
