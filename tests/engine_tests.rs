//! Integration tests for the tax engine.
//!
//! End-to-end deal scenarios against the builtin rule registry, plus the
//! boundary behaviours the engine promises.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tax_engine::{
    DealType, LeaseInput, Money, OriginTaxInfo, RateEntry, StateCode, TaxCalculationInput,
    TaxEngine, TaxError, TaxLevel,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn input(state: &str, deal_type: DealType) -> TaxCalculationInput {
    TaxCalculationInput {
        state_code: state.to_string(),
        as_of_date: as_of(),
        deal_type,
        vehicle_price: dec!(0),
        accessories_amount: dec!(0),
        trade_in_value: dec!(0),
        rebate_manufacturer: dec!(0),
        rebate_dealer: dec!(0),
        doc_fee: dec!(0),
        other_fees: vec![],
        service_contracts: dec!(0),
        gap: dec!(0),
        negative_equity: dec!(0),
        tax_already_collected: dec!(0),
        rates: vec![],
        lease: None,
        origin: None,
        vehicle_class: None,
        gvw: None,
        customer_is_new_resident: false,
        lessee_jurisdiction: None,
    }
}

fn state_rate(label: &str, rate: Decimal) -> RateEntry {
    RateEntry {
        label: label.to_string(),
        level: TaxLevel::State,
        rate,
    }
}

fn local_rate(label: &str, rate: Decimal) -> RateEntry {
    RateEntry {
        label: label.to_string(),
        level: TaxLevel::County,
        rate,
    }
}

fn lease_fields(payment: Decimal, count: u32) -> LeaseInput {
    LeaseInput {
        gross_cap_cost: dec!(35000),
        cap_reduction_cash: dec!(0),
        cap_reduction_trade_in: dec!(0),
        cap_reduction_rebate_manufacturer: dec!(0),
        cap_reduction_rebate_dealer: dec!(0),
        base_payment: payment,
        payment_count: count,
    }
}

#[test]
fn indiana_retail_with_full_trade() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("IN", DealType::Retail);
    deal.vehicle_price = dec!(35000);
    deal.accessories_amount = dec!(2000);
    deal.trade_in_value = dec!(10000);
    deal.rebate_manufacturer = dec!(2000);
    deal.rebate_dealer = dec!(500);
    deal.doc_fee = dec!(200);
    deal.service_contracts = dec!(2500);
    deal.gap = dec!(800);
    deal.rates = vec![state_rate("IN state", dec!(0.07))];

    let result = engine.calculate(&deal).unwrap();

    // 35000 + 2000 - 10000 - 2000 + 500 + 200 + 2500 + 800 = 29000
    assert_eq!(result.bases.total_taxable_base, Money::new(dec!(29000)));
    assert_eq!(result.taxes.total_tax, Money::new(dec!(2030.00)));
    assert_eq!(result.debug.applied_trade_in, Money::new(dec!(10000)));
    assert!(result.lease_breakdown.is_none());
}

#[test]
fn illinois_chicago_lease() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("IL", DealType::Lease);
    deal.vehicle_price = dec!(35000);
    deal.doc_fee = dec!(300);
    deal.rates = vec![state_rate("IL combined", dec!(0.095))];
    deal.lease = Some(lease_fields(dec!(450), 36));
    deal.lessee_jurisdiction = Some("Chicago".to_string());

    let result = engine.calculate(&deal).unwrap();
    let lease = result.lease_breakdown.as_ref().unwrap();

    // 450 * 0.095 = 42.75 state, 450 * 0.08 = 36.00 Chicago
    assert_eq!(
        lease.payment_taxes_per_period.total_tax,
        Money::new(dec!(78.75))
    );
    // Upfront tax on the doc fee only: 300 * 0.095 = 28.50
    assert_eq!(lease.upfront_taxes.total_tax, Money::new(dec!(28.50)));
    // 78.75 * 36 + 28.50
    assert_eq!(lease.total_tax_over_term, Money::new(dec!(2863.50)));
    assert_eq!(result.taxes.total_tax, lease.total_tax_over_term);
}

#[test]
fn alabama_retail_partial_trade_credit() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("AL", DealType::Retail);
    deal.vehicle_price = dec!(30000);
    deal.doc_fee = dec!(495);
    deal.trade_in_value = dec!(10000);
    deal.rates = vec![
        state_rate("AL state", dec!(0.02)),
        local_rate("AL local", dec!(0.04)),
    ];

    let result = engine.calculate(&deal).unwrap();

    // State rate sees the net-of-trade base, local rates see the gross base
    assert_eq!(result.bases.state_taxable_base, Money::new(dec!(20495)));
    assert_eq!(result.bases.local_taxable_base, Money::new(dec!(30495)));

    let state_line = &result.taxes.by_label[0];
    let local_line = &result.taxes.by_label[1];
    assert_eq!(state_line.amount, Money::new(dec!(409.90)));
    assert_eq!(local_line.amount, Money::new(dec!(1219.80)));
    assert_eq!(result.taxes.total_tax, Money::new(dec!(1629.70)));
}

#[test]
fn iowa_lease_inverted_trade() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("IA", DealType::Lease);
    deal.vehicle_price = dec!(35000);
    deal.rates = vec![state_rate("IA state", dec!(0.05))];
    let mut lease = lease_fields(dec!(400), 36);
    lease.cap_reduction_cash = dec!(2000);
    lease.cap_reduction_trade_in = dec!(5000);
    deal.lease = Some(lease);

    let result = engine.calculate(&deal).unwrap();
    let breakdown = result.lease_breakdown.as_ref().unwrap();

    // 400 * 36 + 2000 + 5000 = 21400; the trade is added back
    assert_eq!(result.bases.total_taxable_base, Money::new(dec!(21400)));
    // 21400 * 0.05 + $10 one-time fee = 1080
    assert_eq!(breakdown.upfront_taxes.total_tax, Money::new(dec!(1080.00)));
    assert_eq!(
        breakdown.payment_taxes_per_period.total_tax,
        Money::ZERO
    );
    assert_eq!(breakdown.total_tax_over_term, Money::new(dec!(1080.00)));
}

#[test]
fn north_carolina_hut_with_timely_reciprocity() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("NC", DealType::Retail);
    deal.vehicle_price = dec!(30000);
    deal.origin = Some(OriginTaxInfo {
        origin_state: StateCode::VA,
        tax_paid: dec!(1245),
        rate_paid: None,
        paid_at: as_of() - chrono::Duration::days(30),
    });

    let result = engine.calculate(&deal).unwrap();

    // HUT 30000 * 0.03 = 900; credit min(1245, 900) = 900; net zero
    assert_eq!(result.debug.reciprocity_applied, Money::new(dec!(900)));
    assert_eq!(result.taxes.total_tax, Money::ZERO);
}

#[test]
fn north_carolina_hut_reciprocity_window_expired() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("NC", DealType::Retail);
    deal.vehicle_price = dec!(30000);
    deal.origin = Some(OriginTaxInfo {
        origin_state: StateCode::VA,
        tax_paid: dec!(1245),
        rate_paid: None,
        paid_at: as_of() - chrono::Duration::days(120),
    });

    let result = engine.calculate(&deal).unwrap();

    assert_eq!(result.debug.reciprocity_applied, Money::ZERO);
    assert_eq!(result.taxes.total_tax, Money::new(dec!(900.00)));
    assert!(result
        .debug
        .notes
        .iter()
        .any(|n| n.contains("window") && n.contains("denied")));
}

#[test]
fn pennsylvania_lease_surcharge() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("PA", DealType::Lease);
    deal.vehicle_price = dec!(35000);
    deal.rates = vec![state_rate("PA state", dec!(0.06))];
    deal.lease = Some(lease_fields(dec!(450), 36));

    let result = engine.calculate(&deal).unwrap();
    let lease = result.lease_breakdown.as_ref().unwrap();

    // 450 * (0.06 + 0.03) = 40.50 per period
    assert_eq!(
        lease.payment_taxes_per_period.total_tax,
        Money::new(dec!(40.50))
    );
    assert_eq!(lease.total_tax_over_term, Money::new(dec!(1458.00)));
}

#[test]
fn tennessee_single_article_cap() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("TN", DealType::Retail);
    deal.vehicle_price = dec!(50000);
    deal.rates = vec![
        state_rate("TN state", dec!(0.07)),
        local_rate("TN local", dec!(0.0225)),
    ];

    let result = engine.calculate(&deal).unwrap();

    // State portion capped at $3,200 of base; local portion uncapped
    assert_eq!(result.taxes.by_label[0].amount, Money::new(dec!(224.00)));
    assert_eq!(result.taxes.by_label[1].amount, Money::new(dec!(1125.00)));
}

#[test]
fn georgia_tavt_retail_and_lease_differ() {
    let engine = TaxEngine::with_builtin_rules();

    let mut retail = input("GA", DealType::Retail);
    retail.vehicle_price = dec!(30000);
    retail.trade_in_value = dec!(10000);
    retail.rates = vec![state_rate("GA state", dec!(0.04))];
    let result = engine.calculate(&retail).unwrap();
    // (30000 - 10000) * 0.07 TAVT; the sales-tax rate rows are not used
    assert_eq!(result.taxes.total_tax, Money::new(dec!(1400.00)));

    let mut lease = input("GA", DealType::Lease);
    lease.vehicle_price = dec!(30000);
    lease.rates = vec![state_rate("GA state", dec!(0.04))];
    lease.lease = Some(lease_fields(dec!(400), 36));
    let result = engine.calculate(&lease).unwrap();
    // Leases get ordinary sales tax on payments instead of TAVT
    let breakdown = result.lease_breakdown.as_ref().unwrap();
    assert_eq!(
        breakdown.payment_taxes_per_period.total_tax,
        Money::new(dec!(16.00))
    );
}

#[test]
fn west_virginia_privilege_tax_by_class() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("WV", DealType::Retail);
    deal.vehicle_price = dec!(40000);
    deal.vehicle_class = Some(tax_engine::VehicleClass::Rv);

    let result = engine.calculate(&deal).unwrap();
    // RVs pay 6% instead of the 5% base rate
    assert_eq!(result.taxes.total_tax, Money::new(dec!(2400.00)));
}

#[test]
fn west_virginia_trade_credit_capped() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("WV", DealType::Retail);
    deal.vehicle_price = dec!(50000);
    deal.trade_in_value = dec!(30000);

    let result = engine.calculate(&deal).unwrap();
    // Only $25,000 of the trade is credited: (50000 - 25000) * 0.05
    assert_eq!(result.taxes.total_tax, Money::new(dec!(1250.00)));
}

#[test]
fn zero_vehicle_price_is_zero_tax_success() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("IN", DealType::Retail);
    deal.rates = vec![state_rate("IN state", dec!(0.07))];

    let result = engine.calculate(&deal).unwrap();
    assert_eq!(result.taxes.total_tax, Money::ZERO);
}

#[test]
fn trade_in_over_price_clamps_base_with_note() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("IN", DealType::Retail);
    deal.vehicle_price = dec!(8000);
    deal.trade_in_value = dec!(12000);
    deal.rates = vec![state_rate("IN state", dec!(0.07))];

    let result = engine.calculate(&deal).unwrap();
    assert_eq!(result.bases.total_taxable_base, Money::ZERO);
    assert_eq!(result.taxes.total_tax, Money::ZERO);
    assert!(result
        .debug
        .notes
        .iter()
        .any(|n| n.contains("clamped to zero")));
}

#[test]
fn doc_fee_above_cap_splits_taxable_and_exempt() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("NY", DealType::Retail);
    deal.vehicle_price = dec!(20000);
    deal.doc_fee = dec!(300);
    deal.rates = vec![state_rate("NY state", dec!(0.04))];

    let result = engine.calculate(&deal).unwrap();
    // NY caps the taxable doc fee at $175
    assert_eq!(result.debug.taxable_doc_fee, Money::new(dec!(175)));
    assert!(result
        .bases
        .exempt_components
        .iter()
        .any(|c| c.code == "doc_fee" && c.amount == Money::new(dec!(125))));
    assert_eq!(result.bases.total_taxable_base, Money::new(dec!(20175)));
}

#[test]
fn rule_version_is_informational() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("IN", DealType::Retail);
    deal.vehicle_price = dec!(30000);
    deal.rates = vec![state_rate("IN state", dec!(0.07))];

    let registry = engine.registry();
    let mut rules = registry.rules_for_state(StateCode::IN).unwrap().clone();
    let before = tax_engine::calculate_tax(&deal, &rules, registry).unwrap();
    rules.version += 1;
    let after = tax_engine::calculate_tax(&deal, &rules, registry).unwrap();
    assert_eq!(before, after);
}

#[test]
fn malformed_state_code_is_invalid_input() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("IN", DealType::Retail);
    deal.state_code = "XX".to_string();
    deal.rates = vec![state_rate("state", dec!(0.07))];
    let err = engine.calculate(&deal).unwrap_err();
    assert!(matches!(err, TaxError::InvalidInput { .. }));
}

#[test]
fn state_missing_from_registry_is_unknown() {
    let engine = TaxEngine::new(tax_engine::RuleRegistry::new(vec![], vec![]));
    let mut deal = input("IN", DealType::Retail);
    deal.vehicle_price = dec!(30000);
    deal.rates = vec![state_rate("IN state", dec!(0.07))];
    let err = engine.calculate(&deal).unwrap_err();
    assert_eq!(err, TaxError::UnknownState("IN".to_string()));
}

#[test]
fn lease_term_total_identity_holds() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("MI", DealType::Lease);
    deal.vehicle_price = dec!(28000);
    deal.doc_fee = dec!(220);
    deal.rates = vec![state_rate("MI state", dec!(0.06))];
    let mut lease = lease_fields(dec!(387.41), 39);
    lease.cap_reduction_cash = dec!(1500);
    deal.lease = Some(lease);

    let result = engine.calculate(&deal).unwrap();
    let breakdown = result.lease_breakdown.as_ref().unwrap();
    let expected = breakdown.upfront_taxes.total_tax
        + breakdown.payment_taxes_per_period.total_tax * Decimal::from(breakdown.terms);
    assert!(
        (expected - breakdown.total_tax_over_term)
            .as_decimal()
            .abs()
            <= dec!(0.01)
    );
    assert_eq!(result.taxes.total_tax, breakdown.total_tax_over_term);
}

#[test]
fn texas_new_resident_flat_tax() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("TX", DealType::Lease);
    deal.vehicle_price = dec!(35000);
    deal.customer_is_new_resident = true;
    deal.rates = vec![state_rate("TX state", dec!(0.0625))];
    deal.lease = Some(lease_fields(dec!(450), 36));

    let result = engine.calculate(&deal).unwrap();
    let breakdown = result.lease_breakdown.as_ref().unwrap();
    assert_eq!(breakdown.upfront_taxes.total_tax, Money::new(dec!(90.00)));
    assert_eq!(breakdown.payment_taxes_per_period.total_tax, Money::ZERO);
}

#[test]
fn new_jersey_luxury_surcharge_over_threshold() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("NJ", DealType::Lease);
    deal.vehicle_price = dec!(60000);
    deal.rates = vec![state_rate("NJ state", dec!(0.06625))];
    let mut lease = lease_fields(dec!(700), 36);
    lease.gross_cap_cost = dec!(60000);
    deal.lease = Some(lease);

    let result = engine.calculate(&deal).unwrap();
    assert!(result
        .taxes
        .by_label
        .iter()
        .any(|l| l.label.contains("Luxury")));
}

#[test]
fn virginia_minimum_tax_applies_on_small_lease() {
    let engine = TaxEngine::with_builtin_rules();
    let mut deal = input("VA", DealType::Lease);
    deal.vehicle_price = dec!(4000);
    deal.rates = vec![state_rate("VA state", dec!(0.0415))];
    deal.lease = Some(LeaseInput {
        gross_cap_cost: dec!(4000),
        cap_reduction_cash: dec!(0),
        cap_reduction_trade_in: dec!(0),
        cap_reduction_rebate_manufacturer: dec!(0),
        cap_reduction_rebate_dealer: dec!(0),
        base_payment: dec!(40),
        payment_count: 12,
    });

    let result = engine.calculate(&deal).unwrap();
    // 40 * 12 * 0.0415 = 19.92, raised to the $75 statutory minimum
    assert_eq!(result.taxes.total_tax, Money::new(dec!(75.00)));
}

#[test]
fn trade_in_ignored_where_no_credit_exists() {
    let engine = TaxEngine::with_builtin_rules();
    let mut base_deal = input("VA", DealType::Retail);
    base_deal.vehicle_price = dec!(30000);
    base_deal.rates = vec![state_rate("VA state", dec!(0.0415))];

    let without = engine.calculate(&base_deal).unwrap();
    let mut with_trade = base_deal.clone();
    with_trade.trade_in_value = dec!(12000);
    let with_trade = engine.calculate(&with_trade).unwrap();

    assert_eq!(without.taxes.total_tax, with_trade.taxes.total_tax);
}
