//! This module defines `TransitionTable`, the editable rule store: an
//! upserting index keyed by (state, read spec) with exact-then-wildcard
//! lookup precedence.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::types::{ControlState, MachineError, MatchSpec, Rule, Symbol};

/// The full set of transition rules, indexed for lookup.
///
/// Rules live in a single map keyed by `(from, read)`; a state's wildcard
/// rule occupies its `(state, Any)` slot, so an exact rule and the fallback
/// never collide and lookup stays O(1) on average. The table is a runtime
/// index, not a document; serialize a `Program` instead.
#[derive(Debug, Clone)]
pub struct TransitionTable<A> {
    rules: HashMap<(ControlState, MatchSpec<A>), Rule<A>>,
    states: HashSet<ControlState>,
}

impl<A: Eq + Hash> PartialEq for TransitionTable<A> {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules && self.states == other.states
    }
}

impl<A: Eq + Hash> Eq for TransitionTable<A> {}

impl<A: Clone + Eq + Hash> TransitionTable<A> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            states: HashSet::new(),
        }
    }

    /// Inserts a rule, replacing any rule already stored for the same
    /// `(from, read)` pair.
    pub fn insert(&mut self, rule: Rule<A>) {
        self.states.insert(rule.from.clone());
        self.rules.insert((rule.from.clone(), rule.read.clone()), rule);
    }

    /// Looks up the rule for `state` reading `symbol`.
    ///
    /// An exact rule for the symbol wins; otherwise the state's wildcard
    /// rule applies. Fails with [`MachineError::NoRuleForState`] when the
    /// state has no rules at all, and with
    /// [`MachineError::NoRuleForStateAndSymbol`] when none of its rules
    /// covers `symbol`.
    pub fn find(
        &self,
        state: &ControlState,
        symbol: &Symbol<A>,
    ) -> Result<&Rule<A>, MachineError<A>> {
        if !self.states.contains(state) {
            return Err(MachineError::NoRuleForState(state.clone()));
        }
        let exact = (state.clone(), MatchSpec::Symbol(symbol.clone()));
        if let Some(rule) = self.rules.get(&exact) {
            return Ok(rule);
        }
        let fallback = (state.clone(), MatchSpec::Any);
        self.rules
            .get(&fallback)
            .ok_or_else(|| MachineError::NoRuleForStateAndSymbol(state.clone(), symbol.clone()))
    }

    /// The number of distinct `(from, read)` pairs stored.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules are stored.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All stored rules, in no particular order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule<A>> {
        self.rules.values()
    }

    /// All states with at least one rule, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &ControlState> {
        self.states.iter()
    }
}

impl<A: Clone + Eq + Hash> Default for TransitionTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone + Eq + Hash> Extend<Rule<A>> for TransitionTable<A> {
    fn extend<I: IntoIterator<Item = Rule<A>>>(&mut self, rules: I) {
        for rule in rules {
            self.insert(rule);
        }
    }
}

impl<A: Clone + Eq + Hash> FromIterator<Rule<A>> for TransitionTable<A> {
    fn from_iter<I: IntoIterator<Item = Rule<A>>>(rules: I) -> Self {
        let mut table = Self::new();
        table.extend(rules);
        table
    }
}
