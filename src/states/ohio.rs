//! Ohio.
//!
//! 5.75% state rate plus county and transit rates. Lease consideration
//! is taxed up front on the total of payments plus taxed cap reductions.
//! Out-of-state credit is computed from the rate the origin state would
//! have charged on this deal.

use crate::types::*;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::OH,
        version: 3,
        trade_in_policy: TradeInPolicy::Full {
            notes: Some("new vehicle trade credit; watercraft rules differ".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("price before the rebate is the tax base".into()),
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
        tax_on_negative_equity: true,
        tax_on_service_contracts: true,
        tax_on_gap: true,
        vehicle_tax_scheme: VehicleTaxScheme::StatePlusLocal,
        vehicle_uses_local_sales_tax: true,
        lease_rules: LeaseRules {
            method: LeaseMethod::FullUpfront,
            tax_cap_reduction: true,
            rebate_behavior: LeaseRebateBehavior::AlwaysTaxable,
            doc_fee_taxability: LeaseDocFeeTaxability::Always,
            trade_in_credit: LeaseTradeInCreditMode::None,
            negative_equity_taxable: true,
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
            basis: ReciprocityBasis::RatePaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            default_window_days: None,
            overrides: vec![],
            notes: Some("credit measured by the origin state's rate on this deal".into()),
        },
        extras: RuleExtras {
            docs: Some("R.C. 5739.02; ST 2007-04 leasing".into()),
            ..RuleExtras::default()
        },
    }
}
