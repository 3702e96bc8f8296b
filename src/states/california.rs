//! California.
//!
//! 7.25% state rate plus district taxes. No trade-in credit: the full
//! selling price is taxed regardless of trade equity. Manufacturer
//! rebates are part of the measure of tax; dealer discounts are price
//! reductions.

use crate::types::*;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::CA,
        version: 3,
        trade_in_policy: TradeInPolicy::None {
            notes: Some("trade equity never reduces the measure of tax".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("gross receipts include manufacturer rebates".into()),
            },
            RebateRule {
                applies_to: RebateScope::Dealer,
                taxable: false,
                notes: Some("dealer discount reduces gross receipts".into()),
            },
        ],
        doc_fee_taxable: true,
        doc_fee_cap: None,
        fee_tax_rules: vec![FeeTaxRule {
            code: "TIRE".into(),
            taxable: false,
            notes: Some("California tire fee is a separate levy".into()),
        }],
        tax_on_accessories: true,
        tax_on_negative_equity: false,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StatePlusLocal,
        vehicle_uses_local_sales_tax: true,
        lease_rules: LeaseRules {
            method: LeaseMethod::Monthly,
            tax_cap_reduction: true,
            rebate_behavior: LeaseRebateBehavior::NonTaxableIfAtSigning,
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
            docs: Some("Rev. & Tax. Code 6011-6012; CDTFA pub. 34".into()),
            ..RuleExtras::default()
        },
    }
}
