//! Rules every new password has to satisfy. They run at the request boundary, before any
//! service logic or password hashing, and every failing rule is reported at once.

use serde::Serialize;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single named constraint on a candidate password
pub struct PasswordRule {
    pub code: &'static str,
    pub message: &'static str,
    check: fn(&str) -> bool,
}

impl PasswordRule {
    pub fn is_satisfied_by(&self, candidate: &str) -> bool {
        (self.check)(candidate)
    }
}

/// The rules, in the order they are evaluated and reported
pub const RULES: [PasswordRule; 3] = [
    PasswordRule {
        code: "length",
        message: "must be at least 8 characters long",
        check: long_enough,
    },
    PasswordRule {
        code: "digit",
        message: "must contain at least one digit",
        check: has_digit,
    },
    PasswordRule {
        code: "uppercase",
        message: "must contain at least one upper-case letter",
        check: has_uppercase,
    },
];

fn long_enough(candidate: &str) -> bool {
    candidate.chars().count() >= MIN_PASSWORD_LENGTH
}

fn has_digit(candidate: &str) -> bool {
    candidate.chars().any(|c| c.is_ascii_digit())
}

fn has_uppercase(candidate: &str) -> bool {
    candidate.chars().any(char::is_uppercase)
}

/// Whether one rule held for a candidate. Every violation carries the full list of outcomes
/// under its `rules` param, so callers see what passed as well as what failed.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub code: &'static str,
    pub passed: bool,
}

/// Runs every rule against the candidate and reports each result, passing or not
pub fn evaluate(candidate: &str) -> Vec<RuleOutcome> {
    RULES
        .iter()
        .map(|rule| RuleOutcome {
            code: rule.code,
            passed: rule.is_satisfied_by(candidate),
        })
        .collect()
}

/// Adds one [ValidationError] per failed rule under `field`, so DTOs can combine them with
/// other field checks
pub fn add_violations(errors: &mut ValidationErrors, field: &'static str, candidate: &str) {
    let outcomes = evaluate(candidate);

    for (rule, _) in RULES
        .iter()
        .zip(&outcomes)
        .filter(|(_, outcome)| !outcome.passed)
    {
        let mut violation = ValidationError::new(rule.code);
        violation.message = Some(Cow::Borrowed(rule.message));
        violation.add_param(Cow::Borrowed("rules"), &outcomes);
        errors.add(field, violation);
    }
}
