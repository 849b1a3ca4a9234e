use thiserror::Error;

/// Errors surfaced by model construction, rule parsing, and inference.
///
/// Construction-time failures leave the model unchanged; inference-time
/// failures leave the engine's cached last output unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FuzzyError {
    /// Malformed membership function parameters.
    #[error("invalid membership function parameter: {0}")]
    InvalidParameter(String),

    /// Bad automatic-generation or registration arguments.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A rule referenced a variable that was never registered.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// A rule referenced a term its variable does not define.
    #[error("unknown term '{term}' for variable '{variable}'")]
    UnknownTerm { variable: String, term: String },

    /// The rule string violated the `if ... then ...` grammar.
    #[error("syntax error in rule '{rule}' at offset {position}: {message}")]
    RuleSyntax {
        rule: String,
        position: usize,
        message: String,
    },

    /// The crisp input vector length did not match the registered inputs.
    #[error("expected {expected} crisp inputs, got {got}")]
    InputArity { expected: usize, got: usize },

    /// No rule produced any membership for an output variable, so its
    /// defuzzified value is undefined. Fallback policy is the caller's call.
    #[error("no active rules for output variable '{variable}'")]
    NoActiveRules { variable: String },
}

/// Result type for fuzzy operations.
pub type FuzzyResult<T> = Result<T, FuzzyError>;

/// Non-fatal notice that a crisp input fell outside its variable's domain
/// and was clamped to the nearest boundary before fuzzification.
#[derive(Debug, Clone, PartialEq)]
pub struct OutOfDomainWarning {
    pub variable: String,
    pub value: f64,
    pub clamped_to: f64,
}
