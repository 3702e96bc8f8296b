//! Alabama.
//!
//! 2% automotive state rate plus county/city rates. The trade-in credit
//! applies to the state portion only: the state rate taxes the
//! net-of-trade price while local rates tax the gross price. Leases are
//! taxed as a hybrid: cap-cost reductions at signing, payments monthly,
//! and trade equity used as a cap reduction is itself taxed.

use crate::types::*;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::AL,
        version: 2,
        trade_in_policy: TradeInPolicy::Partial {
            state_eligible: true,
            local_eligible: false,
            notes: Some("credit against the automotive state rate only".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("rebates are part of the measure of tax".into()),
            },
            RebateRule {
                applies_to: RebateScope::Dealer,
                taxable: true,
                notes: None,
            },
        ],
        doc_fee_taxable: true,
        doc_fee_cap: None,
        fee_tax_rules: vec![FeeTaxRule {
            code: "TITLE".into(),
            taxable: false,
            notes: None,
        }],
        tax_on_accessories: true,
        tax_on_negative_equity: false,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StatePlusLocal,
        vehicle_uses_local_sales_tax: true,
        lease_rules: LeaseRules {
            method: LeaseMethod::Hybrid,
            tax_cap_reduction: true,
            rebate_behavior: LeaseRebateBehavior::FollowRetailRule,
            doc_fee_taxability: LeaseDocFeeTaxability::Always,
            trade_in_credit: LeaseTradeInCreditMode::None,
            negative_equity_taxable: false,
            fee_tax_rules: vec![],
            title_fee_rules: vec![],
            tax_fees_upfront: true,
            special_scheme: LeaseSpecialScheme::None,
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
            notes: Some("rental/lease tax is a separate levy with no credit".into()),
        },
        extras: RuleExtras {
            docs: Some("Ala. Code 40-23-2(4); automotive rate 1.5% lease, 2% sale".into()),
            ..RuleExtras::default()
        },
    }
}
