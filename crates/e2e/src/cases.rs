//! Static test-case tables
//!
//! Constructed once, never mutated, each consumed exactly once per run.
//! Positive cases only assert that the translator produced *something* for
//! well-formed Singlish; translation correctness is out of scope. Negative
//! cases are adversarial contracts; several are expected to fail against
//! the live target, and that failure is the point. Do not weaken them to
//! make the run green.

use serde::{Deserialize, Serialize};

/// Which family a case belongs to, driving both the execution flow and how
/// its failures are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseRole {
    Positive,
    Negative,
    Ui,
}

impl std::fmt::Display for CaseRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseRole::Positive => write!(f, "positive"),
            CaseRole::Negative => write!(f, "negative"),
            CaseRole::Ui => write!(f, "ui"),
        }
    }
}

/// The contract a case enforces against the target app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Output is non-empty. The only positive-role contract.
    Translates,

    /// Output is exactly empty.
    Empty,

    /// Untranslatable input comes back unchanged.
    Echo,

    /// Output carries no SQL fragment ("DROP").
    NoSqlArtifact,

    /// Output carries no "<script>" tag.
    NoScriptArtifact,

    /// Output carries no "<b>" tag.
    NoHtmlArtifact,

    /// Output stays under 100 characters.
    LengthBounded,

    /// Output is pure Sinhala plus basic punctuation and whitespace.
    ScriptPurity,

    /// The clear control resets the input field to empty.
    ClearResets,
}

impl Expectation {
    /// Whether this expectation is meaningful for the given role.
    pub fn valid_for(self, role: CaseRole) -> bool {
        match self {
            Expectation::Translates => role == CaseRole::Positive,
            Expectation::ClearResets => role == CaseRole::Ui,
            _ => role == CaseRole::Negative,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TestCase {
    pub id: &'static str,
    pub input: &'static str,
    pub description: &'static str,
    pub role: CaseRole,
    pub expectation: Expectation,
}

pub const POSITIVE_CASES: &[TestCase] = &[
    TestCase {
        id: "pos-simple-sentence",
        input: "Mama gedhara yanavaa.",
        description: "Everyday declarative sentence",
        role: CaseRole::Positive,
        expectation: Expectation::Translates,
    },
    TestCase {
        id: "pos-question",
        input: "oyaata kohomadha?",
        description: "Question with trailing punctuation",
        role: CaseRole::Positive,
        expectation: Expectation::Translates,
    },
    TestCase {
        id: "pos-trip-plan",
        input: "api heta kandy valata yamuda",
        description: "Multi-word suggestion, no punctuation",
        role: CaseRole::Positive,
        expectation: Expectation::Translates,
    },
    TestCase {
        id: "pos-single-word",
        input: "sthuthiyi",
        description: "Single word",
        role: CaseRole::Positive,
        expectation: Expectation::Translates,
    },
    TestCase {
        id: "pos-need-statement",
        input: "mata bath kanna oona",
        description: "Need/want construction",
        role: CaseRole::Positive,
        expectation: Expectation::Translates,
    },
    TestCase {
        id: "pos-borrowed-word",
        input: "mama adha office ekata giyaa",
        description: "Sentence with a borrowed English word",
        role: CaseRole::Positive,
        expectation: Expectation::Translates,
    },
    TestCase {
        id: "pos-name-question",
        input: "oyaage nama mokakdha?",
        description: "Possessive question",
        role: CaseRole::Positive,
        expectation: Expectation::Translates,
    },
    TestCase {
        id: "pos-digits-in-sentence",
        input: "mama 1976 dhi ipadhunaa",
        description: "Digits embedded in a sentence",
        role: CaseRole::Positive,
        expectation: Expectation::Translates,
    },
];

pub const NEGATIVE_CASES: &[TestCase] = &[
    TestCase {
        id: "neg-empty-input",
        input: "",
        description: "Empty input must yield empty output",
        role: CaseRole::Negative,
        expectation: Expectation::Empty,
    },
    TestCase {
        id: "neg-digits-only",
        input: "12345",
        description: "Digits alone should be refused and echoed",
        role: CaseRole::Negative,
        expectation: Expectation::Echo,
    },
    TestCase {
        id: "neg-symbols-only",
        input: "@#$%^&",
        description: "Symbols alone should be refused and echoed",
        role: CaseRole::Negative,
        expectation: Expectation::Echo,
    },
    TestCase {
        id: "neg-sql-injection",
        input: "'; DROP TABLE users; --",
        description: "SQL fragment must not survive into the output",
        role: CaseRole::Negative,
        expectation: Expectation::NoSqlArtifact,
    },
    TestCase {
        id: "neg-script-tag",
        input: "<script>alert(\"XSS\")</script>",
        description: "Script tag must not survive into the output",
        role: CaseRole::Negative,
        expectation: Expectation::NoScriptArtifact,
    },
    TestCase {
        id: "neg-html-tag",
        input: "<b>bold</b>",
        description: "HTML markup must not survive into the output",
        role: CaseRole::Negative,
        expectation: Expectation::NoHtmlArtifact,
    },
    TestCase {
        id: "neg-long-input",
        input: "mama adha udhe nagitala thee ekak bila bath kala api passe gedharin eliyata gihin kandy pattata bus ekaka giyaa",
        description: "Output for oversized input should stay length-bounded",
        role: CaseRole::Negative,
        expectation: Expectation::LengthBounded,
    },
    TestCase {
        id: "neg-mixed-script",
        input: "mama \u{263a} happy \u{263a}",
        description: "Emoji and Latin filler should not leak into Sinhala output",
        role: CaseRole::Negative,
        expectation: Expectation::ScriptPurity,
    },
];

pub const UI_CASES: &[TestCase] = &[TestCase {
    id: "ui-clear-control",
    input: "api kandy valata yamuda",
    description: "Clear control empties the input field",
    role: CaseRole::Ui,
    expectation: Expectation::ClearResets,
}];

/// Every case in suite order: positive, then negative, then UI.
pub fn all_cases() -> impl Iterator<Item = &'static TestCase> {
    POSITIVE_CASES
        .iter()
        .chain(NEGATIVE_CASES.iter())
        .chain(UI_CASES.iter())
}
