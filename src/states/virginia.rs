//! Virginia.
//!
//! 4.15% motor vehicle sales and use tax on the gross sales price, state
//! level only, with a statutory minimum per transaction. No trade-in
//! credit. Leases are taxed on the gross proceeds at inception.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::VA,
        version: 2,
        trade_in_policy: TradeInPolicy::None {
            notes: Some("tax is on the gross sales price; no trade deduction".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("gross price is measured before rebates".into()),
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
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::FullUpfront,
            tax_cap_reduction: true,
            rebate_behavior: LeaseRebateBehavior::AlwaysTaxable,
            doc_fee_taxability: LeaseDocFeeTaxability::Always,
            trade_in_credit: LeaseTradeInCreditMode::None,
            negative_equity_taxable: false,
            fee_tax_rules: vec![],
            title_fee_rules: vec![],
            tax_fees_upfront: true,
            special_scheme: LeaseSpecialScheme::VaUsage,
        },
        reciprocity: ReciprocityRules {
            enabled: true,
            scope: ReciprocityScope::Retail,
            home_state_behavior: ReciprocityHomeBehavior::CreditUpToStateRate,
            require_proof_of_tax_paid: true,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: true,
            default_window_days: None,
            overrides: vec![],
            notes: None,
        },
        extras: RuleExtras {
            minimum_tax: Some(dec!(75)),
            docs: Some("Va. Code 58.1-2402".into()),
            ..RuleExtras::default()
        },
    }
}
