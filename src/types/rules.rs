//! The declarative per-state rule DSL.
//!
//! A `TaxRulesConfig` is the complete statement of how one state taxes a
//! vehicle deal. Rule records are data: they are built at program start
//! (see `states`), treated as immutable, and consumed only through the
//! interpreter functions in `interpret`. Pipelines never pattern-match
//! rule variants directly.
//!
//! Tagged variants serialize with an explicit `type` discriminator, e.g.
//! `{"type": "Capped", "amount": 10000}`, matching the shape of the rule
//! files this data was transcribed from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{StateCode, VehicleClass};

/// How a trade-in allowance reduces the taxable base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TradeInPolicy {
    /// Trade-in never reduces the base (e.g. California)
    None {
        /// Rule-author rationale
        #[serde(default)]
        notes: Option<String>,
    },
    /// Full credit against the base
    Full {
        /// Rule-author rationale
        #[serde(default)]
        notes: Option<String>,
    },
    /// Credit up to a statutory dollar cap (e.g. West Virginia $25,000)
    Capped {
        /// Maximum creditable trade value
        amount: Decimal,
        /// Rule-author rationale
        #[serde(default)]
        notes: Option<String>,
    },
    /// Credit for a fraction of the trade value
    Percentage {
        /// Creditable fraction in [0, 1]
        ratio: Decimal,
        /// Rule-author rationale
        #[serde(default)]
        notes: Option<String>,
    },
    /// Credit applies to some jurisdiction levels only (Alabama: the state
    /// rate sees the net-of-trade base, local rates see the gross base).
    Partial {
        /// Credit applies to state-level rates
        state_eligible: bool,
        /// Credit applies to local-level rates
        local_eligible: bool,
        /// Rule-author rationale
        #[serde(default)]
        notes: Option<String>,
    },
}

/// Which party funds a rebate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RebateScope {
    /// Manufacturer / captive incentive
    Manufacturer,
    /// Dealer cash or discount structured as a rebate
    Dealer,
}

/// Taxability of one rebate scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateRule {
    /// Which rebates this row governs
    pub applies_to: RebateScope,
    /// Whether the rebate amount is part of the taxable base
    pub taxable: bool,
    /// Rule-author rationale
    #[serde(default)]
    pub notes: Option<String>,
}

/// Taxability of a coded dealer/government fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTaxRule {
    /// Fee code as it appears on the deal (e.g. "TITLE", "REG", "VIT")
    pub code: String,
    /// Whether the fee joins the taxable base
    pub taxable: bool,
    /// Rule-author rationale
    #[serde(default)]
    pub notes: Option<String>,
}

/// Title-fee handling on leases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleFeeRule {
    /// Fee code
    pub code: String,
    /// Whether the fee is taxable
    pub taxable: bool,
    /// Fee is capitalized into the cap cost
    pub included_in_cap_cost: bool,
    /// Fee is collected (and taxed, if taxable) at signing
    pub included_in_upfront: bool,
    /// Fee is spread across payments
    pub included_in_monthly: bool,
}

/// Which rate structure a state applies to vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleTaxScheme {
    /// State rate only; vehicles exempt from local sales tax
    StateOnly,
    /// State plus local jurisdiction rates
    StatePlusLocal,
    /// Georgia Title Ad Valorem Tax replaces sales tax
    SpecialTavt,
    /// North Carolina Highway Use Tax replaces sales tax
    SpecialHut,
    /// West Virginia DMV privilege tax replaces sales tax
    DmvPrivilegeTax,
}

/// How lease tax is timed and based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseMethod {
    /// Tax each payment as it is made
    Monthly,
    /// Tax the whole lease consideration at inception (IA, OK, ND)
    FullUpfront,
    /// Cap-cost reductions taxed upfront, payments taxed monthly (AL)
    Hybrid,
    /// Tax the net capitalized cost at inception (TX)
    NetCapCost,
    /// Tax a reduced statutory base; formula documented in `extras`
    ReducedBase,
}

/// Trade-in treatment on a lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseTradeInCreditMode {
    /// Trade equity reduces the taxable consideration
    Full,
    /// Trade equity is itself taxed as part of the consideration
    /// (Alabama cap-reduction rule; Iowa's inverted lease formula)
    None,
    /// Trade lowers the payment but is not separately taxed
    CapCostOnly,
    /// Defer to the retail trade-in policy
    FollowRetailRule,
}

/// Rebate treatment on a lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseRebateBehavior {
    /// Defer to the retail rebate rules
    FollowRetailRule,
    /// Rebates always join the taxable consideration
    AlwaysTaxable,
    /// Rebates never join the taxable consideration
    AlwaysNonTaxable,
    /// Exempt only when applied as a cap reduction at signing
    NonTaxableIfAtSigning,
}

/// Doc-fee treatment on a lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseDocFeeTaxability {
    /// Always taxed (at signing)
    Always,
    /// Never taxed
    Never,
    /// Defer to the retail doc-fee rule
    FollowRetailRule,
    /// Taxed only in the upfront slug, never in the payment stream
    OnlyUpfront,
}

/// State-specific lease surcharge or cap layered on the base method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaseSpecialScheme {
    /// No surcharge
    None,
    /// Pennsylvania 3% motor vehicle lease tax on each payment
    PaLeaseTax,
    /// Chicago / Cook County personal property lease use tax on each payment
    IlChicagoCook,
    /// Tennessee single-article cap on the state portion of payment tax
    TnSingleArticleCap,
    /// New York metropolitan transportation surcharge
    NyMtr,
    /// New Jersey luxury/fuel-inefficient vehicle surcharge
    NjLuxury,
    /// Colorado home-rule city lease use taxes
    CoHomeRuleLease,
    /// Texas motor vehicle use tax nuances (new-resident flat tax)
    TxLeaseSpecial,
    /// Virginia motor vehicle usage tax minimum
    VaUsage,
    /// Maryland full-value upfront taxation notes
    MdUpfrontGain,
}

/// Lease-specific rule record. May disagree with the retail rules for the
/// same state (e.g. VSC taxable at retail but not on a lease).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseRules {
    /// Timing/base method
    pub method: LeaseMethod,
    /// Whether cap-cost reductions are taxed upfront
    pub tax_cap_reduction: bool,
    /// Rebate override for lease deals
    pub rebate_behavior: LeaseRebateBehavior,
    /// Doc-fee override for lease deals
    pub doc_fee_taxability: LeaseDocFeeTaxability,
    /// Trade-in treatment for lease deals
    pub trade_in_credit: LeaseTradeInCreditMode,
    /// Whether rolled-in negative equity is added to the taxed consideration
    pub negative_equity_taxable: bool,
    /// Lease fee taxability, may differ from retail
    #[serde(default)]
    pub fee_tax_rules: Vec<FeeTaxRule>,
    /// Title-fee handling
    #[serde(default)]
    pub title_fee_rules: Vec<TitleFeeRule>,
    /// Taxable fees are taxed at signing rather than capitalized
    pub tax_fees_upfront: bool,
    /// State-specific surcharge/cap scheme
    pub special_scheme: LeaseSpecialScheme,
}

/// Which deal types a state's reciprocity covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReciprocityScope {
    /// No deals
    None,
    /// Retail deals only
    Retail,
    /// Lease deals only
    Lease,
    /// Both deal types
    Both,
}

impl ReciprocityScope {
    /// Does the scope cover the given deal type?
    pub fn covers(self, deal_type: super::DealType) -> bool {
        match self {
            ReciprocityScope::None => false,
            ReciprocityScope::Retail => deal_type == super::DealType::Retail,
            ReciprocityScope::Lease => deal_type == super::DealType::Lease,
            ReciprocityScope::Both => true,
        }
    }
}

/// How the destination state sizes the credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReciprocityHomeBehavior {
    /// State takes no position; resolver default applies
    None,
    /// Credit capped at what this state's state-level rate would have charged
    CreditUpToStateRate,
    /// No credit at all
    NoCredit,
    /// Full credit for tax paid elsewhere, uncapped
    FullCreditNoCap,
}

/// What the credit is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReciprocityBasis {
    /// The dollar tax actually paid to the origin state
    TaxPaid,
    /// What the origin state's rate would have charged on this deal
    RatePaid,
}

/// Per-origin-state reciprocity override. Consulted before the global
/// state-pair matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReciprocityOverride {
    /// Origin state this row governs
    pub origin_state: StateCode,
    /// Deny credit entirely for this origin
    #[serde(default)]
    pub disallow_credit: bool,
    /// Credit only within this many days of the origin payment
    #[serde(default)]
    pub window_days: Option<i64>,
    /// Credit only if the origin grants credit back to this state
    #[serde(default)]
    pub mutual_credit_required: bool,
    /// Restrict the override to these vehicle classes
    #[serde(default)]
    pub vehicle_classes: Option<Vec<VehicleClass>>,
    /// Restrict the override to vehicles at or under this GVW (lbs)
    #[serde(default)]
    pub max_gvw: Option<u32>,
    /// Rule-author rationale
    #[serde(default)]
    pub notes: Option<String>,
}

/// Interstate tax-credit rules for a destination state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReciprocityRules {
    /// Master switch
    pub enabled: bool,
    /// Deal types covered
    pub scope: ReciprocityScope,
    /// Credit-sizing behavior
    pub home_state_behavior: ReciprocityHomeBehavior,
    /// Origin proof-of-payment is required before credit is granted
    pub require_proof_of_tax_paid: bool,
    /// Credit basis
    pub basis: ReciprocityBasis,
    /// Credit never exceeds this state's own tax on the deal
    pub cap_at_this_states_tax: bool,
    /// Lease deals follow a different statute than the scope suggests
    pub has_lease_exception: bool,
    /// Proof window applied when no per-origin override matches
    /// (North Carolina: 90 days)
    #[serde(default)]
    pub default_window_days: Option<i64>,
    /// Per-origin overrides, checked before the state-pair matrix
    #[serde(default)]
    pub overrides: Vec<ReciprocityOverride>,
    /// Rule-author rationale
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReciprocityRules {
    /// A disabled reciprocity record.
    pub fn disabled() -> Self {
        ReciprocityRules {
            enabled: false,
            scope: ReciprocityScope::None,
            home_state_behavior: ReciprocityHomeBehavior::None,
            require_proof_of_tax_paid: false,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            default_window_days: None,
            overrides: Vec::new(),
            notes: None,
        }
    }
}

/// Research status of a rule record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RuleStatus {
    /// Researched and calculable
    #[default]
    Active,
    /// Placeholder; the dispatcher refuses to calculate
    Stub,
}

/// A local lease use tax keyed by jurisdiction name (Chicago, home-rule
/// Colorado cities). Matched against `TaxCalculationInput::lessee_jurisdiction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalLeaseUseTax {
    /// Jurisdiction name, matched case-insensitively
    pub jurisdiction: String,
    /// Line label in the output
    pub label: String,
    /// Rate applied to each payment
    pub rate: Decimal,
}

/// Numeric rates, caps, and documentation consulted only by the
/// special-scheme calculators. Ordinary pipelines never read this record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleExtras {
    /// Research status
    #[serde(default)]
    pub status: RuleStatus,
    /// Georgia TAVT rate
    #[serde(default)]
    pub tavt_rate: Option<Decimal>,
    /// North Carolina HUT rate
    #[serde(default)]
    pub hut_rate: Option<Decimal>,
    /// HUT taxable-base ceiling
    #[serde(default)]
    pub hut_base_cap: Option<Decimal>,
    /// WV privilege tax base rate
    #[serde(default)]
    pub privilege_base_rate: Option<Decimal>,
    /// WV privilege per-class rate overrides
    #[serde(default)]
    pub privilege_class_rates: Vec<(VehicleClass, Decimal)>,
    /// PA motor vehicle lease tax rate layered on each payment
    #[serde(default)]
    pub lease_surcharge_rate: Option<Decimal>,
    /// Local lease use taxes (Chicago, CO home-rule cities)
    #[serde(default)]
    pub lease_local_use_taxes: Vec<LocalLeaseUseTax>,
    /// TN: state-portion base cap per taxed article
    #[serde(default)]
    pub single_article_base_cap: Option<Decimal>,
    /// TN: first statutory threshold (full state rate below it)
    #[serde(default)]
    pub single_article_first_threshold: Option<Decimal>,
    /// TN: second statutory threshold (single-article rate up to it)
    #[serde(default)]
    pub single_article_second_threshold: Option<Decimal>,
    /// Flat fee collected with upfront lease tax (Iowa's one-time fee)
    #[serde(default)]
    pub lease_upfront_flat_fee: Option<Decimal>,
    /// NJ luxury surcharge threshold
    #[serde(default)]
    pub luxury_threshold: Option<Decimal>,
    /// NJ luxury surcharge rate
    #[serde(default)]
    pub luxury_rate: Option<Decimal>,
    /// VA minimum motor vehicle tax per transaction
    #[serde(default)]
    pub minimum_tax: Option<Decimal>,
    /// TX flat use tax for new residents titling an already-taxed vehicle
    #[serde(default)]
    pub new_resident_flat_tax: Option<Decimal>,
    /// Free-text description of a non-standard lease base formula
    #[serde(default)]
    pub lease_price_formula: Option<String>,
    /// Citations / research links
    #[serde(default)]
    pub docs: Option<String>,
}

/// The complete rule record for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRulesConfig {
    /// Two-letter state code
    pub state_code: StateCode,
    /// Informational data version; never affects calculation
    pub version: u32,
    /// Trade-in treatment at retail
    pub trade_in_policy: TradeInPolicy,
    /// One row per rebate scope
    pub rebates: Vec<RebateRule>,
    /// Whether the doc fee joins the retail taxable base
    pub doc_fee_taxable: bool,
    /// Statutory cap on the taxable portion of the doc fee
    #[serde(default)]
    pub doc_fee_cap: Option<Decimal>,
    /// Taxability of coded fees at retail
    #[serde(default)]
    pub fee_tax_rules: Vec<FeeTaxRule>,
    /// Dealer-installed accessories join the base
    pub tax_on_accessories: bool,
    /// Rolled-in negative equity joins the base
    pub tax_on_negative_equity: bool,
    /// Vehicle service contracts join the base
    pub tax_on_service_contracts: bool,
    /// GAP coverage joins the base
    pub tax_on_gap: bool,
    /// Rate structure applied to vehicles
    pub vehicle_tax_scheme: VehicleTaxScheme,
    /// Vehicles are subject to local sales tax at all
    pub vehicle_uses_local_sales_tax: bool,
    /// Lease-specific rules
    pub lease_rules: LeaseRules,
    /// Interstate credit rules
    pub reciprocity: ReciprocityRules,
    /// Special-scheme parameters and documentation
    #[serde(default)]
    pub extras: RuleExtras,
}

impl TaxRulesConfig {
    /// Whether this record is a placeholder the dispatcher must refuse.
    pub fn is_stub(&self) -> bool {
        self.extras.status == RuleStatus::Stub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_in_policy_tagged_encoding() {
        let policy = TradeInPolicy::Capped {
            amount: dec!(10000),
            notes: None,
        };
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["type"], "Capped");
        assert_eq!(json["amount"], "10000");

        let back: TradeInPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn test_partial_policy_round_trip() {
        let policy = TradeInPolicy::Partial {
            state_eligible: true,
            local_eligible: false,
            notes: Some("state portion only".into()),
        };
        let json = serde_json::to_string(&policy).unwrap();
        let back: TradeInPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn test_scope_covers() {
        use crate::types::DealType;
        assert!(ReciprocityScope::Both.covers(DealType::Retail));
        assert!(ReciprocityScope::Both.covers(DealType::Lease));
        assert!(!ReciprocityScope::Retail.covers(DealType::Lease));
        assert!(!ReciprocityScope::None.covers(DealType::Retail));
    }

    #[test]
    fn test_default_extras_are_active() {
        let extras = RuleExtras::default();
        assert_eq!(extras.status, RuleStatus::Active);
        assert!(extras.tavt_rate.is_none());
    }
}
