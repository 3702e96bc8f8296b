//! Illinois.
//!
//! 6.25% state rate plus home-rule and county rates. Rebates do not
//! reduce the taxable price. Leases are taxed on each payment; Chicago
//! lessees additionally owe the city's personal property lease
//! transaction tax on every payment.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::IL,
        version: 4,
        trade_in_policy: TradeInPolicy::Full {
            notes: Some("first-division vehicle trade credit, cap repealed".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: true,
                notes: Some("rebates do not reduce the Illinois selling price".into()),
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
            code: "ERT".into(),
            taxable: false,
            notes: Some("electronic registration pass-through".into()),
        }],
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
            doc_fee_taxability: LeaseDocFeeTaxability::Always,
            trade_in_credit: LeaseTradeInCreditMode::CapCostOnly,
            negative_equity_taxable: false,
            fee_tax_rules: vec![],
            title_fee_rules: vec![],
            tax_fees_upfront: true,
            special_scheme: LeaseSpecialScheme::IlChicagoCook,
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
            lease_local_use_taxes: vec![
                LocalLeaseUseTax {
                    jurisdiction: "Chicago".into(),
                    label: "Chicago personal property lease tax".into(),
                    rate: dec!(0.08),
                },
                LocalLeaseUseTax {
                    jurisdiction: "Cook".into(),
                    label: "Cook County lease use tax".into(),
                    rate: dec!(0.0175),
                },
            ],
            docs: Some("86 Ill. Adm. Code 130; Chicago Mun. Code 3-32".into()),
            ..RuleExtras::default()
        },
    }
}
