//! Georgia.
//!
//! The one-time Title Ad Valorem Tax replaces both sales tax and annual
//! ad valorem on titled vehicles. Trade-in value reduces the taxed fair
//! market value; rebates do not. Leases are the exception: sales tax
//! applies to each payment instead of TAVT.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::GA,
        version: 2,
        trade_in_policy: TradeInPolicy::Full {
            notes: Some("trade-in reduces the fair market value for TAVT".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("rebates do not reduce fair market value".into()),
            },
            RebateRule {
                applies_to: RebateScope::Dealer,
                taxable: true,
                notes: None,
            },
        ],
        doc_fee_taxable: false,
        doc_fee_cap: None,
        fee_tax_rules: vec![],
        tax_on_accessories: true,
        tax_on_negative_equity: false,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::SpecialTavt,
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
            enabled: false,
            scope: ReciprocityScope::None,
            home_state_behavior: ReciprocityHomeBehavior::NoCredit,
            require_proof_of_tax_paid: false,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            default_window_days: None,
            overrides: vec![],
            notes: Some("TAVT is not a sales tax; sales tax paid elsewhere earns no credit".into()),
        },
        extras: RuleExtras {
            tavt_rate: Some(dec!(0.07)),
            docs: Some("O.C.G.A. 48-5C-1".into()),
            ..RuleExtras::default()
        },
    }
}
