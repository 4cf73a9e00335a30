//! Assertion policy keyed by a case's expectation
//!
//! A failed assertion is a verdict, not an error: it comes back as an `Err`
//! carrying the observed-vs-expected message that ends up in the report.
//! How severe that verdict is depends on the case's role and is decided by
//! the runner, not here.

use crate::cases::Expectation;

/// Longest output (in characters) a length-bounded case tolerates.
const OUTPUT_LENGTH_BOUND: usize = 100;

/// Evaluate one case's contract against the observed output.
pub fn evaluate(expectation: Expectation, input: &str, observed: &str) -> Result<(), String> {
    match expectation {
        Expectation::Translates => {
            if observed.is_empty() {
                Err("expected a non-empty translation, output was empty".into())
            } else {
                Ok(())
            }
        }
        Expectation::Empty => {
            if observed.is_empty() {
                Ok(())
            } else {
                Err(format!("expected empty output, observed {:?}", observed))
            }
        }
        Expectation::Echo => {
            if observed == input {
                Ok(())
            } else {
                Err(format!(
                    "expected input echoed unchanged ({:?}), observed {:?}",
                    input, observed
                ))
            }
        }
        Expectation::NoSqlArtifact => reject_substring(observed, "DROP"),
        Expectation::NoScriptArtifact => reject_substring(observed, "<script>"),
        Expectation::NoHtmlArtifact => reject_substring(observed, "<b>"),
        Expectation::LengthBounded => {
            let len = observed.chars().count();
            if len < OUTPUT_LENGTH_BOUND {
                Ok(())
            } else {
                Err(format!(
                    "expected output under {} characters, observed {}",
                    OUTPUT_LENGTH_BOUND, len
                ))
            }
        }
        Expectation::ScriptPurity => {
            match observed.chars().find(|&c| !sinhala_or_punctuation(c)) {
                None => Ok(()),
                Some(c) => Err(format!(
                    "expected pure Sinhala output, found {:?} in {:?}",
                    c, observed
                )),
            }
        }
        // Asserted by the runner's clear-control flow, not against output.
        Expectation::ClearResets => Ok(()),
    }
}

fn reject_substring(observed: &str, needle: &str) -> Result<(), String> {
    if observed.contains(needle) {
        Err(format!(
            "expected output without {:?}, observed {:?}",
            needle, observed
        ))
    } else {
        Ok(())
    }
}

/// Sinhala block (U+0D80–U+0DFF) plus the zero-width joiner used in
/// conjuncts, whitespace, and basic punctuation.
fn sinhala_or_punctuation(c: char) -> bool {
    ('\u{0D80}'..='\u{0DFF}').contains(&c)
        || c == '\u{200D}'
        || c.is_whitespace()
        || matches!(
            c,
            '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '"' | '(' | ')' | '-'
        )
}
