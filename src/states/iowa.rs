//! Iowa.
//!
//! Vehicles pay a 5% one-time registration fee in lieu of sales tax, state
//! level only. Leases of 12 months or more are taxed once at registration
//! on the whole lease price; the statutory lease price adds the trade
//! allowance back because the allowance already lowered the observed
//! payments.

use crate::types::*;
use rust_decimal_macros::dec;

pub(crate) fn rules() -> TaxRulesConfig {
    TaxRulesConfig {
        state_code: StateCode::IA,
        version: 2,
        trade_in_policy: TradeInPolicy::Full {
            notes: Some("trade allowance deducted at retail".into()),
        },
        rebates: vec![
            RebateRule {
                applies_to: RebateScope::Manufacturer,
                taxable: false,
                notes: Some("rebate applied to the purchase price at sale".into()),
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
            doc_fee_taxability: LeaseDocFeeTaxability::FollowRetailRule,
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
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            default_window_days: None,
            overrides: vec![],
            notes: None,
        },
        extras: RuleExtras {
            lease_upfront_flat_fee: Some(dec!(10)),
            lease_price_formula: Some(
                "payments + cap reductions + trade allowance; the allowance reduced \
                 the observed payments, so it is added back"
                    .into(),
            ),
            docs: Some("Iowa Code 321.105A, fee for new registration".into()),
            ..RuleExtras::default()
        },
    }
}
