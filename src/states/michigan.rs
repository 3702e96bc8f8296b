//! Michigan.
//!
//! 6% state rate, no local tax on vehicles. The trade-in credit phases
//! in by statute and is still capped. Lease payments and cap-cost
//! reductions are both taxed.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::MI,
        version: 4,
        trade_in_policy: TradeInPolicy::Capped {
            amount: dec!(10000),
            notes: Some("phased trade-in credit ceiling; adjusted annually".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("rebates do not reduce the taxable price".into()),
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
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
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
            docs: Some("MCL 205.51; RAB on trade-in phase-in".into()),
            ..RuleExtras::default()
        },
    }
}
