//! Singlish E2E Test Suite
//!
//! This crate drives a third-party Singlish→Sinhala web translator through
//! its UI and documents how it behaves:
//! - Controls a browser through a long-lived node/Playwright bridge
//!   speaking line-delimited JSON
//! - Locates the translator's input/output fields with ranked fallback
//!   selector strategies (the target page offers no stable markup contract)
//! - Approximates "translation finished" with a fixed-window settle poll,
//!   since the target exposes no completion signal
//! - Runs a static table of positive, negative, and UI cases sequentially
//!   and reports per-case verdicts
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CaseRunner (Rust)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  per case, strictly ordered:                                │
//! │    navigate(base_url)                                       │
//! │    resolver::resolve(Input)  ──┐ ranked selector fallback   │
//! │    resolver::resolve(Output) ──┘                            │
//! │    set_value(input, case.input)                             │
//! │    poller::settle(output)      two-sample fixed window      │
//! │    round-trip check on input                                │
//! │    policy::evaluate | clear-control flow                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Browser (capability trait)                                 │
//! │    ├── PlaywrightBridge  node subprocess, JSON over stdio   │
//! │    └── FakeBrowser       scripted page model (tests only)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Negative cases are adversarial contracts against the external app: an
//! assertion failure there is the expected, informative outcome (a
//! documented defect in the target), reported distinctly from a harness
//! error or a positive-case regression.

pub mod browser;
pub mod cases;
pub mod error;
pub mod policy;
pub mod poller;
pub mod resolver;
pub mod runner;

#[cfg(test)]
pub(crate) mod fakes;

pub use browser::{Browser, ElementHandle};
pub use error::{E2eError, E2eResult};
pub use runner::CaseRunner;
