//! Error types for the E2E harness

use thiserror::Error;

use crate::resolver::FieldRole;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm i playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Browser bridge error: {0}")]
    Bridge(String),

    #[error("Bridge protocol error: {0}")]
    Protocol(String),

    #[error("No selector strategy matched a visible {role} element")]
    ElementNotFound { role: FieldRole },

    #[error("No control with a label matching {pattern} found")]
    ControlNotFound { pattern: String },

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("No case matches filter: {0}")]
    NoMatchingCases(String),

    #[error("Target unreachable: {0}")]
    TargetUnreachable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
