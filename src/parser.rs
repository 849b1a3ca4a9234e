use crate::error::{FuzzyError, FuzzyResult};
use crate::ops::Connector;
use crate::rules::{Clause, Rule};
use crate::variable::{VariableKind, Variables};

/// Parses textual rule statements of the grammar
///
/// ```text
/// if <clause> ((and | or) <clause>)* then <clause> (and <clause>)*
/// <clause> = <variable-name> is <term-label>
/// ```
///
/// Keywords are case-insensitive; variable and term names are matched
/// verbatim against the registry. Connectors fold strictly left-to-right
/// with no precedence.
pub struct RuleParser<'v> {
    variables: &'v Variables,
}

impl<'v> RuleParser<'v> {
    pub fn new(variables: &'v Variables) -> Self {
        Self { variables }
    }

    /// Parses one rule statement.
    pub fn parse(&self, text: &str) -> FuzzyResult<Rule> {
        let mut cursor = Cursor::new(text);

        cursor.expect_keyword("if")?;

        let first = self.clause(&mut cursor, VariableKind::Input)?;
        let mut rest = Vec::new();

        loop {
            let token = cursor.next("'and', 'or' or 'then'")?;

            let connector = if token.matches("and") {
                Connector::And
            } else if token.matches("or") {
                Connector::Or
            } else if token.matches("then") {
                break;
            } else {
                return Err(cursor.error_at(
                    token,
                    format!("expected 'and', 'or' or 'then', found '{}'", token.text),
                ));
            };

            rest.push((connector, self.clause(&mut cursor, VariableKind::Input)?));
        }

        let mut consequents = vec![self.clause(&mut cursor, VariableKind::Output)?];

        while let Some(token) = cursor.advance() {
            if !token.matches("and") {
                return Err(cursor.error_at(
                    token,
                    format!("expected 'and' or end of rule, found '{}'", token.text),
                ));
            }

            consequents.push(self.clause(&mut cursor, VariableKind::Output)?);
        }

        Ok(Rule::new(first, rest, consequents))
    }

    /// Parses an ordered batch of rule statements. Fails atomically: a single
    /// malformed statement yields an error and no rules.
    pub fn parse_all<'s>(
        &self,
        texts: impl IntoIterator<Item = &'s str>,
    ) -> FuzzyResult<Vec<Rule>> {
        texts.into_iter().map(|text| self.parse(text)).collect()
    }

    fn clause(&self, cursor: &mut Cursor, expected_kind: VariableKind) -> FuzzyResult<Clause> {
        let name = cursor.name("a variable name")?;
        let key = self
            .variables
            .key_of(name.text)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.text.to_owned()))?;
        let variable = self.variables.get(key);

        if variable.kind() != expected_kind {
            let side = match expected_kind {
                VariableKind::Input => "antecedent clauses must reference input variables",
                VariableKind::Output => "consequent clauses must reference output variables",
            };

            return Err(FuzzyError::InvalidConfiguration(format!(
                "variable '{}': {side}",
                name.text
            )));
        }

        cursor.expect_keyword("is")?;

        let label = cursor.name("a term label")?;
        let term = variable
            .term_index(label.text)
            .ok_or_else(|| FuzzyError::UnknownTerm {
                variable: name.text.to_owned(),
                term: label.text.to_owned(),
            })?;

        Ok(Clause { variable: key, term })
    }
}

const KEYWORDS: [&str; 5] = ["if", "then", "and", "or", "is"];

#[derive(Clone, Copy)]
struct Token<'s> {
    text: &'s str,
    offset: usize,
}

impl Token<'_> {
    fn matches(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }

    fn is_keyword(&self) -> bool {
        KEYWORDS.iter().any(|k| self.matches(k))
    }
}

/// Flat token stream over one rule string, tracking byte offsets for error
/// reporting.
struct Cursor<'s> {
    rule: &'s str,
    tokens: Vec<Token<'s>>,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(rule: &'s str) -> Self {
        let mut tokens = Vec::new();
        let mut start = None;

        for (i, ch) in rule.char_indices() {
            if ch.is_whitespace() {
                if let Some(s) = start.take() {
                    tokens.push(Token {
                        text: &rule[s..i],
                        offset: s,
                    });
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(s) = start {
            tokens.push(Token {
                text: &rule[s..],
                offset: s,
            });
        }

        Self {
            rule,
            tokens,
            pos: 0,
        }
    }

    fn advance(&mut self) -> Option<Token<'s>> {
        let token = self.tokens.get(self.pos).copied();

        if token.is_some() {
            self.pos += 1;
        }

        token
    }

    fn next(&mut self, wanted: &str) -> FuzzyResult<Token<'s>> {
        self.advance().ok_or_else(|| FuzzyError::RuleSyntax {
            rule: self.rule.to_owned(),
            position: self.rule.len(),
            message: format!("expected {wanted}, found end of rule"),
        })
    }

    fn expect_keyword(&mut self, keyword: &str) -> FuzzyResult<()> {
        let token = self.next(&format!("'{keyword}'"))?;

        if token.matches(keyword) {
            Ok(())
        } else {
            Err(self.error_at(
                token,
                format!("expected '{keyword}', found '{}'", token.text),
            ))
        }
    }

    /// Next token, required to not be a grammar keyword. Catches empty
    /// clauses like `if then ...` before name resolution does.
    fn name(&mut self, wanted: &str) -> FuzzyResult<Token<'s>> {
        let token = self.next(wanted)?;

        if token.is_keyword() {
            return Err(self.error_at(
                token,
                format!("expected {wanted}, found keyword '{}'", token.text),
            ));
        }

        Ok(token)
    }

    fn error_at(&self, token: Token, message: String) -> FuzzyError {
        FuzzyError::RuleSyntax {
            rule: self.rule.to_owned(),
            position: token.offset,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::MembershipFunction;
    use crate::term::Term;
    use crate::variable::Variable;

    fn tipper_variables() -> Variables {
        let mut vars = Variables::new();
        let triple = |lo: f64, hi: f64| {
            let mid = (lo + hi) / 2.;

            vec![
                Term::new("poor", MembershipFunction::triangular(lo, lo, mid).unwrap()),
                Term::new("average", MembershipFunction::triangular(lo, mid, hi).unwrap()),
                Term::new("good", MembershipFunction::triangular(mid, hi, hi).unwrap()),
            ]
        };

        vars.add(
            Variable::new("quality", VariableKind::Input, 0. ..=10., triple(0., 10.)).unwrap(),
        )
        .unwrap();
        vars.add(
            Variable::new("service", VariableKind::Input, 0. ..=10., triple(0., 10.)).unwrap(),
        )
        .unwrap();

        let tip_terms = vec![
            Term::new("low", MembershipFunction::triangular(0., 0., 13.).unwrap()),
            Term::new("average", MembershipFunction::triangular(0., 13., 25.).unwrap()),
            Term::new("high", MembershipFunction::triangular(13., 25., 25.).unwrap()),
        ];

        vars.add(Variable::new("tip", VariableKind::Output, 0. ..=25., tip_terms).unwrap())
            .unwrap();

        vars
    }

    #[test]
    fn round_trips_a_single_clause_rule() {
        let vars = tipper_variables();
        let parser = RuleParser::new(&vars);
        let rule = parser.parse("if quality is poor then tip is low").unwrap();

        let antecedents: Vec<Clause> = rule.antecedents().copied().collect();

        assert_eq!(antecedents.len(), 1);
        assert_eq!(antecedents[0].variable, vars.key_of("quality").unwrap());
        assert_eq!(antecedents[0].term, 0);
        assert_eq!(rule.consequents().len(), 1);
        assert_eq!(rule.consequents()[0].variable, vars.key_of("tip").unwrap());
        assert_eq!(rule.consequents()[0].term, 0);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let vars = tipper_variables();
        let parser = RuleParser::new(&vars);

        parser.parse("IF quality IS poor THEN tip IS low").unwrap();
        parser
            .parse("if quality is good AND service is good OR service is average then tip is high")
            .unwrap();
    }

    #[test]
    fn multi_clause_antecedents_and_consequents() {
        let vars = tipper_variables();
        let parser = RuleParser::new(&vars);
        let rule = parser
            .parse("if quality is good or service is good then tip is high and tip is average")
            .unwrap();

        assert_eq!(rule.antecedents().count(), 2);
        assert_eq!(rule.consequents().len(), 2);
    }

    #[test]
    fn unresolved_names_are_reported() {
        let vars = tipper_variables();
        let parser = RuleParser::new(&vars);

        assert_eq!(
            parser.parse("if flavor is poor then tip is low").unwrap_err(),
            FuzzyError::UnknownVariable("flavor".into()),
        );
        assert_eq!(
            parser.parse("if quality is stellar then tip is low").unwrap_err(),
            FuzzyError::UnknownTerm {
                variable: "quality".into(),
                term: "stellar".into(),
            },
        );
    }

    #[test]
    fn malformed_grammar_is_a_syntax_error() {
        let vars = tipper_variables();
        let parser = RuleParser::new(&vars);

        for rule in [
            "quality is poor then tip is low",     // missing if
            "if quality is poor tip is low",       // missing then
            "if quality is poor then",             // empty consequent
            "if then tip is low",                  // empty antecedent clause
            "if quality poor then tip is low",     // missing is
            "if quality is poor then tip is low x", // trailing junk
            "",
        ] {
            assert!(
                matches!(parser.parse(rule), Err(FuzzyError::RuleSyntax { .. })),
                "expected syntax error for: {rule:?}"
            );
        }
    }

    #[test]
    fn syntax_errors_carry_the_rule_and_position() {
        let vars = tipper_variables();
        let parser = RuleParser::new(&vars);
        let text = "if quality is poor maybe tip is low";

        match parser.parse(text).unwrap_err() {
            FuzzyError::RuleSyntax { rule, position, .. } => {
                assert_eq!(rule, text);
                assert_eq!(&text[position..position + 5], "maybe");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn clause_sides_are_kind_checked() {
        let vars = tipper_variables();
        let parser = RuleParser::new(&vars);

        // Output variable in the antecedent
        assert!(matches!(
            parser.parse("if tip is low then tip is low"),
            Err(FuzzyError::InvalidConfiguration(_))
        ));
        // Input variable in the consequent
        assert!(matches!(
            parser.parse("if quality is poor then service is poor"),
            Err(FuzzyError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn batch_parsing_is_atomic() {
        let vars = tipper_variables();
        let parser = RuleParser::new(&vars);

        let ok = parser.parse_all([
            "if quality is poor then tip is low",
            "if service is good then tip is high",
        ]);

        assert_eq!(ok.unwrap().len(), 2);

        let err = parser.parse_all([
            "if quality is poor then tip is low",
            "if service is amazing then tip is high",
        ]);

        assert_eq!(
            err.unwrap_err(),
            FuzzyError::UnknownTerm {
                variable: "service".into(),
                term: "amazing".into(),
            },
        );
    }
}
