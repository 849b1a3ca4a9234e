use crate::membership::MembershipFunction;

/// A linguistic label bound to a membership function. Labels are unique
/// within their owning [`Variable`](crate::Variable).
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    label: String,
    function: MembershipFunction,
}

impl Term {
    pub fn new(label: impl Into<String>, function: MembershipFunction) -> Self {
        Self {
            label: label.into(),
            function,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn function(&self) -> &MembershipFunction {
        &self.function
    }

    /// Membership degree of `x` in this term's fuzzy set.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.function.evaluate(x)
    }
}
