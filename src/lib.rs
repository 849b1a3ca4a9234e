//! A Mamdani fuzzy inference engine.
//!
//! Models are built from linguistic [`Variable`]s (each an ordered set of
//! [`Term`]s over a bounded domain, written by hand or generated
//! automatically from a shape and an overlap ratio) and a [`RuleBlock`]
//! populated from textual rules like
//! `"if service is good then tip is high"`. [`Engine::infer`] fuzzifies the
//! crisp inputs, evaluates every rule with AND=min / OR=max, clips the
//! consequent terms by each rule's firing strength, aggregates them per
//! output variable with pointwise max, and defuzzifies by centroid.
//!
//! ```
//! use fuzzy_mamdani::{Engine, TermShape, Variable, VariableKind};
//!
//! let mut engine = Engine::new("tipper", "tip from service quality");
//!
//! engine.add_input_variable(Variable::with_generated(
//!     "service",
//!     VariableKind::Input,
//!     0.0..=10.0,
//!     TermShape::Triangular,
//!     0.5,
//!     Some(&["poor", "average", "good"]),
//! )?)?;
//! engine.add_output_variable(Variable::with_generated(
//!     "tip",
//!     VariableKind::Output,
//!     0.0..=25.0,
//!     TermShape::Triangular,
//!     0.5,
//!     None, // defaults to low / average / high
//! )?)?;
//!
//! engine.create_rule_block("tipping");
//! engine.add_rules([
//!     "if service is poor then tip is low",
//!     "if service is average then tip is average",
//!     "if service is good then tip is high",
//! ])?;
//!
//! let outputs = engine.infer(&[9.5])?;
//!
//! assert!(outputs.value("tip").unwrap() > 15.0);
//! # Ok::<(), fuzzy_mamdani::FuzzyError>(())
//! ```

mod defuzz;
mod engine;
mod error;
mod linspace;
mod membership;
mod ops;
mod outputs;
mod parser;
mod rules;
mod term;
mod variable;

pub use defuzz::{centroid, centroid_of_samples, DEFAULT_RESOLUTION};
pub use engine::Engine;
pub use error::{FuzzyError, FuzzyResult, OutOfDomainWarning};
pub use membership::MembershipFunction;
pub use ops::{Connector, Implication};
pub use outputs::Outputs;
pub use parser::RuleParser;
pub use rules::{Clause, Rule, RuleBlock};
pub use term::Term;
pub use variable::{
    TermShape, Variable, VariableKey, VariableKind, Variables, DEFAULT_LABELS,
};

#[cfg(test)]
fn tipper_engine() -> Engine {
    let mut engine = Engine::new("tipper", "classic restaurant tipping model");

    let quality_terms = vec![
        Term::new("low", MembershipFunction::triangular(0., 0., 5.).unwrap()),
        Term::new("average", MembershipFunction::triangular(0., 5., 10.).unwrap()),
        Term::new("high", MembershipFunction::triangular(5., 10., 10.).unwrap()),
    ];
    let service_terms = vec![
        Term::new("low", MembershipFunction::triangular(0., 0., 5.).unwrap()),
        Term::new("average", MembershipFunction::triangular(0., 5., 10.).unwrap()),
        Term::new("high", MembershipFunction::triangular(5., 10., 10.).unwrap()),
    ];
    let tip_terms = vec![
        Term::new("low", MembershipFunction::triangular(0., 0., 13.).unwrap()),
        Term::new("average", MembershipFunction::triangular(0., 13., 25.).unwrap()),
        Term::new("high", MembershipFunction::triangular(13., 25., 25.).unwrap()),
    ];

    engine
        .add_input_variable(
            Variable::new("quality", VariableKind::Input, 0. ..=10., quality_terms).unwrap(),
        )
        .unwrap();
    engine
        .add_input_variable(
            Variable::new("service", VariableKind::Input, 0. ..=10., service_terms).unwrap(),
        )
        .unwrap();
    engine
        .add_output_variable(
            Variable::new("tip", VariableKind::Output, 0. ..=25., tip_terms).unwrap(),
        )
        .unwrap();

    engine.create_rule_block("tipping");
    engine
        .add_rules([
            "if quality is low then tip is low",
            "if service is low then tip is low",
            "if service is average then tip is average",
            "if service is high then tip is high",
            "if quality is high then tip is high",
        ])
        .unwrap();

    engine
}

#[test]
fn test_tipper_product_implication() {
    // fuzzylite's AlgebraicProduct implication: great quality and service
    // earn a tip of about 20.45%.
    let mut engine = tipper_engine().with_implication(Implication::Product);
    let outputs = engine.infer(&[6.5, 9.8]).unwrap();

    let tip = outputs.value("tip").unwrap();

    assert!((tip - 20.45).abs() < 0.15, "got {tip}");
    assert_eq!(outputs.values().len(), 1);
    assert!(outputs.warnings().is_empty());
    assert_eq!(engine.last_output().unwrap().value("tip"), Some(tip));
}

#[test]
fn test_tipper_minimum_implication() {
    // Same model under clipping gives the classic Mamdani figure of ~19.85.
    let mut engine = tipper_engine();
    let tip = engine.infer(&[6.5, 9.8]).unwrap().value("tip").unwrap();

    assert!((tip - 19.86).abs() < 0.15, "got {tip}");
}

#[test]
fn test_tipper_firing_strengths_show_through() {
    // quality 6.5 -> high 0.3; service 9.8 -> high 0.96. "tip is high" is
    // referenced by two rules at different strengths; the aggregate must
    // carry the stronger clip.
    let mut engine = tipper_engine();
    let outputs = engine.infer(&[6.5, 9.8]).unwrap();
    let aggregate = outputs.aggregate("tip").unwrap();
    let peak = aggregate.iter().map(|(_, mu)| *mu).fold(0., f64::max);

    assert!((peak - 0.96).abs() < 1e-9, "got {peak}");
}

#[test]
fn test_tipper_accessors() {
    let engine = tipper_engine();

    assert_eq!(engine.name(), "tipper");
    assert_eq!(engine.input_variable_names(), vec!["quality", "service"]);
    assert_eq!(engine.output_variable_names(), vec!["tip"]);
    assert_eq!(engine.rule_block().unwrap().len(), 5);
    assert_eq!(engine.rule_block().unwrap().name(), "tipping");
}
