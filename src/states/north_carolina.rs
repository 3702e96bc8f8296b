//! North Carolina.
//!
//! The 3% Highway Use Tax replaces sales tax on vehicles, state level
//! only, on the retail value including dealer fees, capped at the first
//! $80,000. Vehicles titled in NC within 90 days of an out-of-state
//! purchase receive credit for tax paid there; beyond 90 days the full
//! HUT is due. Lease payments carry the same 3% as gross receipts.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::NC,
        version: 3,
        trade_in_policy: TradeInPolicy::Full {
            notes: Some("trade allowance deducted before the HUT applies".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("rebates are part of the retail value".into()),
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
        vehicle_tax_scheme: VehicleTaxScheme::SpecialHut,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::Monthly,
            tax_cap_reduction: false,
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
            default_window_days: Some(90),
            overrides: vec![],
            notes: Some("90-day window from the out-of-state payment date".into()),
        },
        extras: RuleExtras {
            hut_rate: Some(dec!(0.03)),
            hut_base_cap: Some(dec!(80000)),
            docs: Some("N.C.G.S. 105-187.3".into()),
            ..RuleExtras::default()
        },
    }
}
