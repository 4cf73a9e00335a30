//! Sequential case runner
//!
//! One browser session, one case at a time, no parallelism: every case
//! shares the target page's single input/output state, so cross-case
//! concurrency would only let cases trample each other. The runner
//! navigates afresh before each case to reset that shared state.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::browser::{Browser, ElementHandle};
use crate::cases::{all_cases, CaseRole, TestCase};
use crate::error::{E2eError, E2eResult};
use crate::policy;
use crate::poller::{settle, SettlePolicy};
use crate::resolver::{resolve, FieldRole};

/// Elements scanned when looking for the clear control.
pub const CLEAR_CONTROL_CANDIDATES: &str =
    "button, input[type='button'], input[type='reset'], [role='button'], a";

/// Case-insensitive label pattern identifying a clear control.
pub const CLEAR_LABEL_PATTERN: &str = r"(?i)\b(clear|delete|reset|erase)\b";

/// How a finished case is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The case's contract held.
    Passed,

    /// A Positive or UI contract broke: harness, environment, or a target
    /// regression. Fails the run.
    Failed,

    /// A Negative contract broke. Expected and informative: it documents a
    /// defect in the target app and does not fail the run by itself.
    DocumentedDefect,

    /// The case could not be driven at all (element/control not found,
    /// bridge failure). Aborts only this case.
    HarnessError,
}

/// Result of running a single case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_id: String,
    pub role: CaseRole,
    pub observed_output: String,
    pub passed: bool,
    pub failure_reason: Option<String>,
    pub outcome: Outcome,
    pub duration_ms: u64,
}

/// Result of running the whole suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub defects: usize,
    pub errors: usize,
    pub duration_ms: u64,
    pub results: Vec<CaseResult>,
}

impl SuiteResult {
    /// Whether the run as a whole succeeded. Documented defects only count
    /// against it in strict mode.
    pub fn harness_ok(&self, strict: bool) -> bool {
        self.failed == 0 && self.errors == 0 && (!strict || self.defects == 0)
    }
}

/// Configuration for the case runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Translator page under test.
    pub base_url: String,

    /// Bound on each field's visibility wait during resolution.
    pub resolve_timeout: Duration,

    /// Fixed waits for the settle poller.
    pub settle: SettlePolicy,

    /// Where the JSON report lands.
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.easysinhalaunicode.com".to_string(),
            resolve_timeout: Duration::from_secs(10),
            settle: SettlePolicy::default(),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

struct CaseEvaluation {
    observed: String,
    verdict: Result<(), String>,
}

/// Drives the full suite against one browser session.
pub struct CaseRunner<B> {
    browser: B,
    config: RunnerConfig,
    clear_label: Regex,
}

impl<B: Browser> CaseRunner<B> {
    pub fn new(browser: B, config: RunnerConfig) -> Self {
        Self {
            browser,
            config,
            clear_label: Regex::new(CLEAR_LABEL_PATTERN).expect("static pattern compiles"),
        }
    }

    /// Hand the browser back, e.g. for an orderly bridge shutdown.
    pub fn into_browser(self) -> B {
        self.browser
    }

    /// Run every case in the static tables, in suite order.
    pub async fn run_all(&mut self) -> SuiteResult {
        let cases: Vec<&TestCase> = all_cases().collect();
        self.run_cases(&cases).await
    }

    /// Run a list of cases sequentially. Errors abort only the case that
    /// raised them; the suite always completes.
    pub async fn run_cases(&mut self, cases: &[&TestCase]) -> SuiteResult {
        let start = Instant::now();
        let mut results = Vec::with_capacity(cases.len());

        info!("Running {} case(s) against {}", cases.len(), self.config.base_url);

        for case in cases {
            let result = self.run_case(case).await;
            match result.outcome {
                Outcome::Passed => {
                    info!("✓ {} ({} ms)", result.case_id, result.duration_ms);
                }
                Outcome::DocumentedDefect => {
                    warn!(
                        "✗ {} - documented target defect: {}",
                        result.case_id,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
                Outcome::Failed | Outcome::HarnessError => {
                    error!(
                        "✗ {} - {}",
                        result.case_id,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
            results.push(result);
        }

        let count = |o: Outcome| results.iter().filter(|r| r.outcome == o).count();
        let suite = SuiteResult {
            total: results.len(),
            passed: count(Outcome::Passed),
            failed: count(Outcome::Failed),
            defects: count(Outcome::DocumentedDefect),
            errors: count(Outcome::HarnessError),
            duration_ms: start.elapsed().as_millis() as u64,
            results,
        };

        info!("");
        info!(
            "Suite: {} passed, {} failed, {} documented defect(s), {} harness error(s) ({} ms)",
            suite.passed, suite.failed, suite.defects, suite.errors, suite.duration_ms
        );

        suite
    }

    /// Run one case. Never returns an error; anything the case could not
    /// absorb is classified into the result's outcome.
    pub async fn run_case(&mut self, case: &TestCase) -> CaseResult {
        let start = Instant::now();

        let (observed, verdict) = match self.execute(case).await {
            Ok(eval) => (eval.observed, eval.verdict),
            Err(e) => {
                return CaseResult {
                    case_id: case.id.to_string(),
                    role: case.role,
                    observed_output: String::new(),
                    passed: false,
                    failure_reason: Some(e.to_string()),
                    outcome: Outcome::HarnessError,
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
        };

        let (passed, outcome, failure_reason) = match verdict {
            Ok(()) => (true, Outcome::Passed, None),
            Err(reason) => {
                let outcome = match case.role {
                    CaseRole::Negative => Outcome::DocumentedDefect,
                    CaseRole::Positive | CaseRole::Ui => Outcome::Failed,
                };
                (false, outcome, Some(reason))
            }
        };

        CaseResult {
            case_id: case.id.to_string(),
            role: case.role,
            observed_output: observed,
            passed,
            failure_reason,
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// The strictly ordered per-case flow. Every step blocks; a stuck wait
    /// elapses its timeout and surfaces as an error.
    async fn execute(&mut self, case: &TestCase) -> E2eResult<CaseEvaluation> {
        // Fresh navigation resets the page's shared input/output state
        // between cases.
        self.browser.navigate(&self.config.base_url).await?;

        let input = resolve(&mut self.browser, FieldRole::Input, self.config.resolve_timeout).await?;
        let output =
            resolve(&mut self.browser, FieldRole::Output, self.config.resolve_timeout).await?;

        self.browser.set_value(input, case.input).await?;

        let observed = settle(&mut self.browser, output, self.config.settle).await;

        // Catches the target mangling or truncating its own input field,
        // independent of translation behavior.
        let round_trip = self.browser.get_value(input).await?;
        if round_trip != case.input {
            return Ok(CaseEvaluation {
                observed,
                verdict: Err(format!(
                    "input field mangled: set {:?}, read back {:?}",
                    case.input, round_trip
                )),
            });
        }

        let verdict = match case.role {
            CaseRole::Ui => self.clear_flow(input).await?,
            _ => policy::evaluate(case.expectation, case.input, &observed),
        };

        Ok(CaseEvaluation { observed, verdict })
    }

    /// Filled → Read has already happened by the time this runs; this is
    /// Read → Cleared.
    async fn clear_flow(&mut self, input: ElementHandle) -> E2eResult<Result<(), String>> {
        let control = self.find_clear_control().await?;
        self.browser.click(control).await?;

        let after = self.browser.get_value(input).await?;
        Ok(if after.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "expected empty input after clear, observed {:?}",
                after
            ))
        })
    }

    async fn find_clear_control(&mut self) -> E2eResult<ElementHandle> {
        let candidates = self.browser.find_elements(CLEAR_CONTROL_CANDIDATES).await?;
        for handle in candidates {
            let label = self.browser.accessible_label(handle).await?;
            if self.clear_label.is_match(&label) {
                return Ok(handle);
            }
        }

        Err(E2eError::ControlNotFound {
            pattern: CLEAR_LABEL_PATTERN.to_string(),
        })
    }

    /// Write the suite result as pretty JSON under the output dir.
    pub fn write_results(&self, suite: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("results.json");
        let json = serde_json::to_string_pretty(suite)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Confirm the target answers HTTP at all before paying for a browser
/// launch and seventeen slow element-resolution timeouts.
pub async fn preflight(base_url: &str) -> E2eResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let resp = client
        .get(base_url)
        .send()
        .await
        .map_err(|e| E2eError::TargetUnreachable(e.to_string()))?;

    if !resp.status().is_success() {
        warn!("Target responded with status {}", resp.status());
    }

    Ok(())
}
