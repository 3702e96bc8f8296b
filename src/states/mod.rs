//! Per-state rule records.
//!
//! One file per researched state, each a mechanical transliteration of the
//! state's tax research into the rule DSL. Content here is data: adding a
//! state is a new file and a line in `all_rules`, never a code change in
//! the engine.
//!
//! States without researched rules get a stub record so the dispatcher
//! can answer `NotImplementedForState` instead of guessing.

mod alabama;
mod california;
mod colorado;
mod florida;
mod georgia;
mod illinois;
mod indiana;
mod iowa;
mod maryland;
mod michigan;
mod new_jersey;
mod new_york;
mod north_carolina;
mod north_dakota;
mod ohio;
mod oklahoma;
mod pennsylvania;
mod rhode_island;
mod tennessee;
mod texas;
mod virginia;
mod west_virginia;
mod wyoming;

use crate::types::{
    LeaseDocFeeTaxability, LeaseMethod, LeaseRebateBehavior, LeaseRules, LeaseSpecialScheme,
    LeaseTradeInCreditMode, ReciprocityRules, RuleExtras, RuleStatus, StateCode, TaxRulesConfig,
    TradeInPolicy, VehicleTaxScheme,
};

/// Every researched state's rule record.
pub fn all_rules() -> Vec<TaxRulesConfig> {
    vec![
        alabama::rules(),
        california::rules(),
        colorado::rules(),
        florida::rules(),
        georgia::rules(),
        illinois::rules(),
        indiana::rules(),
        iowa::rules(),
        maryland::rules(),
        michigan::rules(),
        new_jersey::rules(),
        new_york::rules(),
        north_carolina::rules(),
        north_dakota::rules(),
        ohio::rules(),
        oklahoma::rules(),
        pennsylvania::rules(),
        rhode_island::rules(),
        tennessee::rules(),
        texas::rules(),
        virginia::rules(),
        west_virginia::rules(),
        wyoming::rules(),
    ]
}

/// Placeholder record for a state whose rules are not yet researched.
/// The dispatcher refuses to calculate against it.
pub fn stub_rules(state_code: StateCode) -> TaxRulesConfig {
    TaxRulesConfig {
        state_code,
        version: 0,
        trade_in_policy: TradeInPolicy::Full { notes: None },
        rebates: vec![],
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
        reciprocity: ReciprocityRules::disabled(),
        extras: RuleExtras {
            status: RuleStatus::Stub,
            docs: Some("rules not yet researched".to_string()),
            ..RuleExtras::default()
        },
    }
}
