use num::Float;

/// Logical connector joining consecutive antecedent clauses. Connectors are
/// folded strictly left-to-right with no operator precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connector {
    /// AND, t-norm: minimum.
    And,
    /// OR, s-norm: maximum.
    Or,
}

impl Connector {
    pub fn fold<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::And => F::min(u, v),
            Self::Or => F::max(u, v),
        }
    }
}

/// Implication operator method for reducing a consequent term's membership
/// function by a rule's firing strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Implication {
    /// Mamdani clipping: `min(strength, membership)`.
    Minimum,
    /// Larsen scaling: `strength * membership`.
    Product,
}

impl Implication {
    pub fn apply<F: Float>(self, strength: F, membership: F) -> F {
        match self {
            Self::Minimum => F::min(strength, membership),
            Self::Product => strength * membership,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_folds() {
        assert_eq!(Connector::And.fold(0.6, 0.4), 0.4);
        assert_eq!(Connector::Or.fold(0.6, 0.4), 0.6);
        assert_eq!(Connector::And.fold(0.0f32, 1.), 0.);
        assert_eq!(Connector::Or.fold(0.0f32, 1.), 1.);
    }

    #[test]
    fn implication_clips_and_scales() {
        assert_eq!(Implication::Minimum.apply(0.3, 0.8), 0.3);
        assert_eq!(Implication::Minimum.apply(0.9, 0.8), 0.8);
        assert_eq!(Implication::Product.apply(0.5, 0.8), 0.4);
        assert_eq!(Implication::Product.apply(1.0, 0.8), 0.8);
    }
}
