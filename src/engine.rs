use slotmap::SecondaryMap;
use tracing::{debug, warn};

use crate::defuzz::{centroid_of_samples, DEFAULT_RESOLUTION};
use crate::error::{FuzzyError, FuzzyResult, OutOfDomainWarning};
use crate::linspace::Linspace;
use crate::ops::Implication;
use crate::outputs::Outputs;
use crate::parser::RuleParser;
use crate::rules::RuleBlock;
use crate::variable::{Variable, VariableKey, VariableKind, Variables};

/// A Mamdani fuzzy inference model: the variable registry, one active rule
/// block, and the cached result of the last inference.
///
/// Built incrementally (variables, then a rule block, then rules), queried
/// repeatedly via [`Engine::infer`]. All model state is immutable during
/// evaluation; `infer` only mutates the cached output.
pub struct Engine {
    name: String,
    description: String,
    variables: Variables,
    rule_block: Option<RuleBlock>,
    implication: Implication,
    resolution: usize,
    last_output: Option<Outputs>,
}

impl Engine {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            variables: Variables::new(),
            rule_block: None,
            implication: Implication::Minimum,
            resolution: DEFAULT_RESOLUTION,
            last_output: None,
        }
    }

    /// Selects the implication operator. Minimum (clipping) is the default.
    pub fn with_implication(mut self, implication: Implication) -> Self {
        self.implication = implication;
        self
    }

    /// Overrides the per-output sample count used for aggregation and
    /// centroid defuzzification. At least two samples are required.
    pub fn with_resolution(mut self, resolution: usize) -> FuzzyResult<Self> {
        if resolution < 2 {
            return Err(FuzzyError::InvalidConfiguration(format!(
                "resolution must be at least 2 samples, got {resolution}"
            )));
        }

        self.resolution = resolution;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Registers an input variable. The variable must have been built with
    /// [`VariableKind::Input`].
    pub fn add_input_variable(&mut self, variable: Variable) -> FuzzyResult<VariableKey> {
        if variable.kind() != VariableKind::Input {
            return Err(FuzzyError::InvalidConfiguration(format!(
                "variable '{}' is not an input variable",
                variable.name()
            )));
        }

        self.variables.add(variable)
    }

    /// Registers an output variable. The variable must have been built with
    /// [`VariableKind::Output`].
    pub fn add_output_variable(&mut self, variable: Variable) -> FuzzyResult<VariableKey> {
        if variable.kind() != VariableKind::Output {
            return Err(FuzzyError::InvalidConfiguration(format!(
                "variable '{}' is not an output variable",
                variable.name()
            )));
        }

        self.variables.add(variable)
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Input variable names in registration order.
    pub fn input_variable_names(&self) -> Vec<&str> {
        self.variables
            .input_keys()
            .iter()
            .map(|&k| self.variables.get(k).name())
            .collect()
    }

    /// Output variable names in registration order.
    pub fn output_variable_names(&self) -> Vec<&str> {
        self.variables
            .output_keys()
            .iter()
            .map(|&k| self.variables.get(k).name())
            .collect()
    }

    /// Installs a fresh, empty rule block, replacing any existing one.
    pub fn create_rule_block(&mut self, name: impl Into<String>) {
        self.rule_block = Some(RuleBlock::new(name));
    }

    pub fn rule_block(&self) -> Option<&RuleBlock> {
        self.rule_block.as_ref()
    }

    /// Parses an ordered batch of rule statements and appends them to the
    /// active rule block. Atomic: if any statement fails, the block is left
    /// untouched.
    pub fn add_rules<'s>(&mut self, rules: impl IntoIterator<Item = &'s str>) -> FuzzyResult<()> {
        let parsed = RuleParser::new(&self.variables).parse_all(rules)?;
        let block = self.rule_block.as_mut().ok_or_else(|| {
            FuzzyError::InvalidConfiguration(
                "create a rule block before adding rules".to_owned(),
            )
        })?;

        block.extend(parsed);
        Ok(())
    }

    /// Sampled membership curve of every term of `variable`, for the
    /// plotting/reporting collaborator.
    pub fn term_curves(&self, variable: &str) -> FuzzyResult<Vec<(String, Vec<(f64, f64)>)>> {
        let key = self
            .variables
            .key_of(variable)
            .ok_or_else(|| FuzzyError::UnknownVariable(variable.to_owned()))?;

        Ok(self.variables.get(key).term_curves(self.resolution))
    }

    /// The cached result of the most recent successful [`Engine::infer`].
    pub fn last_output(&self) -> Option<&Outputs> {
        self.last_output.as_ref()
    }

    /// Runs the full inference pipeline over one crisp input vector, ordered
    /// to match the input variables' registration order. On success the
    /// result is cached as the engine's current output; on failure the cache
    /// is left unchanged.
    pub fn infer(&mut self, inputs: &[f64]) -> FuzzyResult<&Outputs> {
        let outputs = self.run(inputs)?;

        Ok(self.last_output.insert(outputs))
    }

    fn run(&self, inputs: &[f64]) -> FuzzyResult<Outputs> {
        let input_keys = self.variables.input_keys();

        if inputs.len() != input_keys.len() {
            return Err(FuzzyError::InputArity {
                expected: input_keys.len(),
                got: inputs.len(),
            });
        }

        // Fuzzification
        // Evaluate every input term at its crisp value, clamping
        // out-of-domain values to the boundary rather than extrapolating.
        let mut degrees: SecondaryMap<VariableKey, Vec<f64>> = SecondaryMap::new();
        let mut warnings = Vec::new();

        for (&key, &value) in input_keys.iter().zip(inputs) {
            let variable = self.variables.get(key);
            let (clamped, term_degrees) = variable.fuzzify(value);

            if clamped != value {
                warn!(
                    variable = variable.name(),
                    value, clamped, "crisp input outside domain, clamped"
                );
                warnings.push(OutOfDomainWarning {
                    variable: variable.name().to_owned(),
                    value,
                    clamped_to: clamped,
                });
            }

            degrees.insert(key, term_degrees);
        }

        // Rule evaluation
        // Zero-strength rules are retained; they simply contribute nothing
        // to aggregation below.
        let rules = self.rule_block.as_ref().map_or(&[][..], |b| b.rules());
        let strengths: Vec<f64> = rules.iter().map(|r| r.firing_strength(&degrees)).collect();

        debug!(rules = rules.len(), "evaluated rule firing strengths");

        // Implication + aggregation + defuzzification, one output variable
        // at a time over a fixed sample grid of its domain.
        let output_keys = self.variables.output_keys();
        let mut names = Vec::with_capacity(output_keys.len());
        let mut values = Vec::with_capacity(output_keys.len());
        let mut aggregates = Vec::with_capacity(output_keys.len());

        for &out_key in output_keys {
            let variable = self.variables.get(out_key);
            let mut aggregate: Vec<(f64, f64)> =
                Linspace::new(variable.minimum(), variable.maximum(), self.resolution)
                    .map(|x| (x, 0.))
                    .collect();

            for (rule, &strength) in rules.iter().zip(&strengths) {
                if strength <= 0. {
                    continue;
                }

                for clause in rule.consequents() {
                    if clause.variable != out_key {
                        continue;
                    }

                    // Clip this consequent term by the firing strength and
                    // fold it into the aggregate via pointwise max.
                    let term = &variable.terms()[clause.term];

                    for (x, mu) in aggregate.iter_mut() {
                        let clipped = self.implication.apply(strength, term.evaluate(*x));

                        if clipped > *mu {
                            *mu = clipped;
                        }
                    }
                }
            }

            let value = centroid_of_samples(&aggregate).ok_or_else(|| {
                FuzzyError::NoActiveRules {
                    variable: variable.name().to_owned(),
                }
            })?;

            names.push(variable.name().to_owned());
            values.push(value);
            aggregates.push(aggregate);
        }

        Ok(Outputs::new(names, values, warnings, aggregates))
    }
}
