//! Ranked-fallback resolution of the translator's UI fields
//!
//! The target page publishes no stable ids and no markup contract, so each
//! field role carries an ordered list of selector strategies, tried
//! strictly in priority order with first-match-wins semantics. Stability is
//! approximated by redundancy of heuristics, not by a contract with the
//! page. Adding a strategy is a table edit; the control flow never changes.

use std::time::Duration;

use tracing::debug;

use crate::browser::{Browser, ElementHandle};
use crate::error::{E2eError, E2eResult};

/// Which translator field is being located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Input,
    Output,
}

impl std::fmt::Display for FieldRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRole::Input => write!(f, "input"),
            FieldRole::Output => write!(f, "output"),
        }
    }
}

/// One way of finding a field, ranked by position in its role's table.
#[derive(Debug, Clone, Copy)]
pub struct SelectorStrategy {
    pub name: &'static str,
    pub selector: &'static str,
}

/// Input-field strategies, most specific first. The placeholder pattern
/// matches both "Singlish" and "singlish" without relying on attribute
/// case-insensitivity support.
pub const INPUT_STRATEGIES: &[SelectorStrategy] = &[
    SelectorStrategy {
        name: "input-placeholder",
        selector: "textarea[placeholder*='inglish']",
    },
    SelectorStrategy {
        name: "input-name",
        selector: "textarea[id*='sing' i], textarea[name*='sing' i]",
    },
    SelectorStrategy {
        name: "input-ordinal",
        selector: "textarea",
    },
];

/// Output-field strategies. The ordinal fallback assumes the page's second
/// textarea renders the translation, which holds for the known layouts.
pub const OUTPUT_STRATEGIES: &[SelectorStrategy] = &[
    SelectorStrategy {
        name: "output-placeholder",
        selector: "textarea[placeholder*='inhala']",
    },
    SelectorStrategy {
        name: "output-name",
        selector: "textarea[id*='unicode' i], div[id*='output' i]",
    },
    SelectorStrategy {
        name: "output-ordinal",
        selector: "textarea:nth-of-type(2)",
    },
];

impl FieldRole {
    pub fn strategies(self) -> &'static [SelectorStrategy] {
        match self {
            FieldRole::Input => INPUT_STRATEGIES,
            FieldRole::Output => OUTPUT_STRATEGIES,
        }
    }
}

/// Resolve a field role to a live element handle.
///
/// The first strategy yielding at least one match wins and the first
/// element of its match set is taken; later strategies are never consulted
/// after that, even if the chosen element never becomes visible. An early
/// low-precision match shadowing a later, more semantically correct one is
/// a known precision weakness of this scheme, kept deliberately.
pub async fn resolve<B>(
    browser: &mut B,
    role: FieldRole,
    timeout: Duration,
) -> E2eResult<ElementHandle>
where
    B: Browser + ?Sized,
{
    for strategy in role.strategies() {
        let matches = browser.find_elements(strategy.selector).await?;
        let Some(&handle) = matches.first() else {
            debug!(strategy = strategy.name, "no match, trying next strategy");
            continue;
        };

        debug!(
            strategy = strategy.name,
            matches = matches.len(),
            %handle,
            "selector strategy matched"
        );

        return match browser.wait_visible(handle, timeout).await {
            Ok(()) => Ok(handle),
            Err(E2eError::Timeout(_)) => Err(E2eError::ElementNotFound { role }),
            Err(e) => Err(e),
        };
    }

    Err(E2eError::ElementNotFound { role })
}
