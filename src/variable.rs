use std::collections::HashMap;
use std::ops::RangeInclusive;

use slotmap::{new_key_type, SlotMap};

use crate::error::{FuzzyError, FuzzyResult};
use crate::linspace::Linspace;
use crate::membership::MembershipFunction;
use crate::term::Term;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Whether a variable is fuzzified from crisp inputs or defuzzified into
/// crisp outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    Input,
    Output,
}

/// Shape family used by automatic term generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermShape {
    Triangular,
    Trapezoidal,
    Gaussian,
}

/// Labels assigned by [`Variable::with_generated`] when none are supplied.
pub const DEFAULT_LABELS: [&str; 3] = ["low", "average", "high"];

/// A linguistic variable: an ordered set of terms over a bounded domain.
/// Immutable once registered with the engine.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    minimum: f64,
    maximum: f64,
    kind: VariableKind,
    terms: Vec<Term>,
}

impl Variable {
    /// Builds a variable from an explicit term list. The universe range must
    /// be non-empty and term labels must be unique.
    pub fn new(
        name: impl Into<String>,
        kind: VariableKind,
        universe_range: RangeInclusive<f64>,
        terms: Vec<Term>,
    ) -> FuzzyResult<Self> {
        let name = name.into();
        let minimum = *universe_range.start();
        let maximum = *universe_range.end();

        if !(minimum < maximum) {
            return Err(FuzzyError::InvalidConfiguration(format!(
                "variable '{name}': minimum {minimum} must be below maximum {maximum}"
            )));
        }

        for (i, term) in terms.iter().enumerate() {
            if terms[..i].iter().any(|t| t.label() == term.label()) {
                return Err(FuzzyError::InvalidConfiguration(format!(
                    "variable '{name}': duplicate term label '{}'",
                    term.label()
                )));
            }
        }

        Ok(Self {
            name,
            minimum,
            maximum,
            kind,
            terms,
        })
    }

    /// Builds a variable whose terms are generated automatically: the domain
    /// is split into `labels.len()` equal-width segments and each segment
    /// gets one term of the requested shape, its support extended by
    /// `overlap * width / 2` into each neighboring segment. Adjacent supports
    /// therefore intersect over a band of width `overlap * width`.
    ///
    /// The first and last terms stay saturated at the domain boundaries, so
    /// an extreme crisp value always has full membership in its edge term.
    /// When `labels` is `None`, [`DEFAULT_LABELS`] is used.
    pub fn with_generated(
        name: impl Into<String>,
        kind: VariableKind,
        universe_range: RangeInclusive<f64>,
        shape: TermShape,
        overlap: f64,
        labels: Option<&[&str]>,
    ) -> FuzzyResult<Self> {
        let name = name.into();
        let labels = labels.unwrap_or(&DEFAULT_LABELS);

        if labels.is_empty() {
            return Err(FuzzyError::InvalidConfiguration(format!(
                "variable '{name}': at least one term label is required"
            )));
        }
        if !(0. ..1.).contains(&overlap) {
            return Err(FuzzyError::InvalidConfiguration(format!(
                "variable '{name}': overlap must be in [0, 1), got {overlap}"
            )));
        }

        let minimum = *universe_range.start();
        let maximum = *universe_range.end();

        if !(minimum < maximum) {
            return Err(FuzzyError::InvalidConfiguration(format!(
                "variable '{name}': minimum {minimum} must be below maximum {maximum}"
            )));
        }

        let n = labels.len();
        let width = (maximum - minimum) / n as f64;
        let ext = overlap * width / 2.;
        let mut terms = Vec::with_capacity(n);

        for (i, label) in labels.iter().enumerate() {
            let left = minimum + i as f64 * width;
            let right = left + width;
            let center = (left + right) / 2.;

            let function = match shape {
                TermShape::Triangular => {
                    if i == 0 {
                        MembershipFunction::triangular(minimum, minimum, right + ext)?
                    } else if i == n - 1 {
                        MembershipFunction::triangular(left - ext, maximum, maximum)?
                    } else {
                        MembershipFunction::triangular(left - ext, center, right + ext)?
                    }
                },
                TermShape::Trapezoidal => {
                    if i == 0 {
                        MembershipFunction::trapezoidal(minimum, minimum, right, right + ext)?
                    } else if i == n - 1 {
                        MembershipFunction::trapezoidal(left - ext, left, maximum, maximum)?
                    } else {
                        MembershipFunction::trapezoidal(left - ext, left, right, right + ext)?
                    }
                },
                TermShape::Gaussian => {
                    // Three sigmas out at the extended support edge, so the
                    // curve is down to ~1.1% where the neighbor band ends.
                    if i == 0 {
                        MembershipFunction::gaussian(minimum, (right + ext - minimum) / 3.)?
                    } else if i == n - 1 {
                        MembershipFunction::gaussian(maximum, (maximum - left + ext) / 3.)?
                    } else {
                        MembershipFunction::gaussian(center, (right + ext - center) / 3.)?
                    }
                },
            };

            terms.push(Term::new(*label, function));
        }

        Self::new(name, kind, universe_range, terms)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term_index(&self, label: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.label() == label)
    }

    /// Clamps `x` into the domain and evaluates every term at the clamped
    /// value. Returns the clamped value alongside the per-term degrees; the
    /// caller decides whether clamping is worth reporting.
    pub fn fuzzify(&self, x: f64) -> (f64, Vec<f64>) {
        let clamped = x.clamp(self.minimum, self.maximum);
        let degrees = self.terms.iter().map(|t| t.evaluate(clamped)).collect();

        (clamped, degrees)
    }

    /// Sampled membership curve of every term, for plotting and reporting.
    pub fn term_curves(&self, samples: usize) -> Vec<(String, Vec<(f64, f64)>)> {
        self.terms
            .iter()
            .map(|term| {
                let curve = Linspace::new(self.minimum, self.maximum, samples)
                    .map(|x| (x, term.evaluate(x)))
                    .collect();

                (term.label().to_owned(), curve)
            })
            .collect()
    }
}

/// Registry of all variables in a model. Inputs and outputs are kept in
/// registration order; rules refer to entries by key rather than by
/// embedding, since the registry owns every variable.
#[derive(Default)]
pub struct Variables {
    slots: SlotMap<VariableKey, Variable>,
    by_name: HashMap<String, VariableKey>,
    inputs: Vec<VariableKey>,
    outputs: Vec<VariableKey>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variable, rejecting duplicate names so that rule strings
    /// stay unambiguous.
    pub fn add(&mut self, variable: Variable) -> FuzzyResult<VariableKey> {
        if self.by_name.contains_key(variable.name()) {
            return Err(FuzzyError::InvalidConfiguration(format!(
                "variable '{}' is already registered",
                variable.name()
            )));
        }

        let name = variable.name().to_owned();
        let kind = variable.kind();
        let key = self.slots.insert(variable);

        self.by_name.insert(name, key);
        match kind {
            VariableKind::Input => self.inputs.push(key),
            VariableKind::Output => self.outputs.push(key),
        }

        Ok(key)
    }

    pub fn get(&self, key: VariableKey) -> &Variable {
        &self.slots[key]
    }

    pub fn key_of(&self, name: &str) -> Option<VariableKey> {
        self.by_name.get(name).copied()
    }

    /// Input variable keys in registration order.
    pub fn input_keys(&self) -> &[VariableKey] {
        &self.inputs
    }

    /// Output variable keys in registration order.
    pub fn output_keys(&self) -> &[VariableKey] {
        &self.outputs
    }
}
