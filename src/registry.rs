//! Rule registry and the state-pair reciprocity matrix.
//!
//! The registry is a table from state code to rule record, built once at
//! engine construction and immutable afterwards. A new state is a data
//! addition, not a code change: unresearched states carry stub records so
//! the dispatcher can answer `NotImplementedForState` instead of computing
//! silently wrong results.
//!
//! Reciprocity is directional, so pairwise policy lives in two places: a
//! per-rule override list keyed by origin state (a state's own idioms),
//! and this module's global matrix used as a fallback for broad patterns.
//! The resolver checks overrides before the matrix.

use std::collections::HashMap;

use crate::states;
use crate::types::{StateCode, TaxRulesConfig};

/// One directional row of the global reciprocity matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePairRule {
    /// Taxing (destination) state
    pub destination: StateCode,
    /// State the tax was previously paid to
    pub origin: StateCode,
    /// Deny credit for this pair
    pub disallow_credit: bool,
    /// Credit only within this many days of the origin payment
    pub window_days: Option<i64>,
    /// Credit only if the origin grants credit back
    pub mutual_credit_required: bool,
    /// Why the row exists
    pub notes: Option<String>,
}

/// Immutable store of rule records plus the pair matrix.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<StateCode, TaxRulesConfig>,
    pair_matrix: Vec<StatePairRule>,
}

impl RuleRegistry {
    /// Build a registry from explicit rule records and matrix rows.
    pub fn new(rules: Vec<TaxRulesConfig>, pair_matrix: Vec<StatePairRule>) -> Self {
        let rules = rules.into_iter().map(|r| (r.state_code, r)).collect();
        RuleRegistry { rules, pair_matrix }
    }

    /// The registry shipped with the engine: every researched state's
    /// record, stubs for the rest, and the builtin pair matrix.
    pub fn builtin() -> Self {
        let mut registry = RuleRegistry::new(states::all_rules(), builtin_pair_matrix());
        for code in all_codes() {
            registry
                .rules
                .entry(code)
                .or_insert_with(|| states::stub_rules(code));
        }
        registry
    }

    /// Rule record for a state, stub records included.
    pub fn rules_for_state(&self, code: StateCode) -> Option<&TaxRulesConfig> {
        self.rules.get(&code)
    }

    /// Whether a state has calculable (non-stub) rules.
    pub fn is_state_implemented(&self, code: StateCode) -> bool {
        self.rules
            .get(&code)
            .map(|r| !r.is_stub())
            .unwrap_or(false)
    }

    /// Every state code the registry knows, sorted.
    pub fn state_codes(&self) -> Vec<StateCode> {
        let mut codes: Vec<StateCode> = self.rules.keys().copied().collect();
        codes.sort();
        codes
    }

    /// First matrix row for a directional pair, if any.
    pub fn pair_rule(&self, destination: StateCode, origin: StateCode) -> Option<&StatePairRule> {
        self.pair_matrix
            .iter()
            .find(|r| r.destination == destination && r.origin == origin)
    }
}

/// Origins that collect no vehicle sales tax; destination states deny a
/// pass-through credit because there is nothing to credit.
const NO_VEHICLE_TAX_ORIGINS: [StateCode; 5] = [
    StateCode::AK,
    StateCode::DE,
    StateCode::MT,
    StateCode::NH,
    StateCode::OR,
];

/// The builtin matrix: broad directional patterns that individual rules
/// do not restate.
fn builtin_pair_matrix() -> Vec<StatePairRule> {
    let mut rows = Vec::new();

    // Destinations that deny credit for purchases taxed nowhere.
    for destination in [
        StateCode::IN,
        StateCode::IL,
        StateCode::MI,
        StateCode::OH,
        StateCode::PA,
    ] {
        for origin in NO_VEHICLE_TAX_ORIGINS {
            rows.push(StatePairRule {
                destination,
                origin,
                disallow_credit: true,
                window_days: None,
                mutual_credit_required: false,
                notes: Some("origin collects no vehicle sales tax; no credit to pass through".into()),
            });
        }
    }

    rows
}

fn all_codes() -> Vec<StateCode> {
    use StateCode::*;
    vec![
        AL, AK, AZ, AR, CA, CO, CT, DE, DC, FL, GA, HI, ID, IL, IN, IA, KS, KY, LA, ME, MD, MA,
        MI, MN, MS, MO, MT, NE, NV, NH, NJ, NM, NY, NC, ND, OH, OK, OR, PA, RI, SC, SD, TN, TX,
        UT, VT, VA, WA, WV, WI, WY,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_code() {
        let registry = RuleRegistry::builtin();
        assert_eq!(registry.state_codes().len(), 51);
    }

    #[test]
    fn test_researched_states_are_implemented() {
        let registry = RuleRegistry::builtin();
        for code in [StateCode::IN, StateCode::AL, StateCode::GA, StateCode::NC] {
            assert!(registry.is_state_implemented(code), "{code} should be implemented");
        }
    }

    #[test]
    fn test_stub_states_are_not_implemented() {
        let registry = RuleRegistry::builtin();
        assert!(!registry.is_state_implemented(StateCode::HI));
        assert!(registry.rules_for_state(StateCode::HI).is_some());
    }

    #[test]
    fn test_matrix_is_directional() {
        let registry = RuleRegistry::builtin();
        let row = registry.pair_rule(StateCode::IN, StateCode::OR);
        assert!(row.is_some_and(|r| r.disallow_credit));
        assert!(registry.pair_rule(StateCode::OR, StateCode::IN).is_none());
    }
}
