use slotmap::SecondaryMap;

use crate::ops::Connector;
use crate::variable::VariableKey;

/// One `<variable> is <term>` proposition. Holds a variable key and a term
/// index into that variable's ordered term list, so clauses never own model
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub variable: VariableKey,
    pub term: usize,
}

/// A parsed fuzzy rule. Immutable once built; owned by its [`RuleBlock`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    first: Clause,
    rest: Vec<(Connector, Clause)>,
    consequents: Vec<Clause>,
}

impl Rule {
    pub fn new(first: Clause, rest: Vec<(Connector, Clause)>, consequents: Vec<Clause>) -> Self {
        debug_assert!(!consequents.is_empty());

        Self {
            first,
            rest,
            consequents,
        }
    }

    /// Antecedent clauses in evaluation order.
    pub fn antecedents(&self) -> impl Iterator<Item = &Clause> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, c)| c))
    }

    pub fn consequents(&self) -> &[Clause] {
        &self.consequents
    }

    /// Folds the antecedent left-to-right over the fuzzified degrees,
    /// AND=min and OR=max, yielding the rule's firing strength in [0, 1].
    pub fn firing_strength(&self, degrees: &SecondaryMap<VariableKey, Vec<f64>>) -> f64 {
        let clause_degree =
            |clause: &Clause| degrees[clause.variable][clause.term];

        self.rest.iter().fold(
            clause_degree(&self.first),
            |strength, (connector, clause)| connector.fold(strength, clause_degree(clause)),
        )
    }
}

/// An ordered collection of rules sharing AND=min / OR=max semantics. Rule
/// order is evaluation order, but max-aggregation makes results
/// order-independent.
pub struct RuleBlock {
    name: String,
    rules: Vec<Rule>,
}

impl RuleBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) {
        self.rules.extend(rules);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn degrees_for(
        entries: &[(VariableKey, Vec<f64>)],
    ) -> SecondaryMap<VariableKey, Vec<f64>> {
        let mut map = SecondaryMap::new();

        for (key, values) in entries {
            map.insert(*key, values.clone());
        }

        map
    }

    #[test]
    fn firing_strength_folds_left_to_right() {
        let mut slots: SlotMap<VariableKey, ()> = SlotMap::with_key();
        let a = slots.insert(());
        let b = slots.insert(());
        let degrees = degrees_for(&[(a, vec![0.7, 0.2]), (b, vec![0.4])]);

        let and_rule = Rule::new(
            Clause { variable: a, term: 0 },
            vec![(Connector::And, Clause { variable: b, term: 0 })],
            vec![Clause { variable: a, term: 1 }],
        );

        assert_eq!(and_rule.firing_strength(&degrees), 0.4);

        let or_rule = Rule::new(
            Clause { variable: a, term: 0 },
            vec![(Connector::Or, Clause { variable: b, term: 0 })],
            vec![Clause { variable: a, term: 1 }],
        );

        assert_eq!(or_rule.firing_strength(&degrees), 0.7);

        // (0.2 or 0.4) and 0.7 -> strictly left-to-right, no precedence
        let mixed = Rule::new(
            Clause { variable: a, term: 1 },
            vec![
                (Connector::Or, Clause { variable: b, term: 0 }),
                (Connector::And, Clause { variable: a, term: 0 }),
            ],
            vec![Clause { variable: a, term: 1 }],
        );

        assert_eq!(mixed.firing_strength(&degrees), 0.4);
    }

    #[test]
    fn single_clause_rule_uses_its_own_degree() {
        let mut slots: SlotMap<VariableKey, ()> = SlotMap::with_key();
        let a = slots.insert(());
        let degrees = degrees_for(&[(a, vec![0.55])]);

        let rule = Rule::new(
            Clause { variable: a, term: 0 },
            vec![],
            vec![Clause { variable: a, term: 0 }],
        );

        assert_eq!(rule.firing_strength(&degrees), 0.55);
    }
}
