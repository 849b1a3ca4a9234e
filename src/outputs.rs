use crate::error::OutOfDomainWarning;

/// The result of one inference call: crisp values in output-variable
/// registration order, any clamping warnings raised during fuzzification,
/// and a read-only snapshot of each output's aggregated fuzzy set for
/// plotting and reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Outputs {
    names: Vec<String>,
    values: Vec<f64>,
    warnings: Vec<OutOfDomainWarning>,
    aggregates: Vec<Vec<(f64, f64)>>,
}

impl Outputs {
    pub(crate) fn new(
        names: Vec<String>,
        values: Vec<f64>,
        warnings: Vec<OutOfDomainWarning>,
        aggregates: Vec<Vec<(f64, f64)>>,
    ) -> Self {
        debug_assert_eq!(names.len(), values.len());
        debug_assert_eq!(names.len(), aggregates.len());

        Self {
            names,
            values,
            warnings,
            aggregates,
        }
    }

    /// Crisp outputs, one per registered output variable, in registration
    /// order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Crisp output of a single variable, by name.
    pub fn value(&self, variable: &str) -> Option<f64> {
        self.index_of(variable).map(|i| self.values[i])
    }

    /// Inputs that fell outside their variable's domain and were clamped.
    pub fn warnings(&self) -> &[OutOfDomainWarning] {
        &self.warnings
    }

    /// Sampled aggregated membership curve of one output variable.
    pub fn aggregate(&self, variable: &str) -> Option<&[(f64, f64)]> {
        self.index_of(variable).map(|i| &*self.aggregates[i])
    }

    fn index_of(&self, variable: &str) -> Option<usize> {
        self.names.iter().position(|n| n == variable)
    }
}
