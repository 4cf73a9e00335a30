//! Browser automation capability surface and its Playwright-backed bridge
//!
//! The harness consumes browsers through the [`Browser`] trait only. The
//! production implementation, [`PlaywrightBridge`], keeps one node
//! subprocess alive for the whole suite and drives a single page through a
//! line-delimited JSON protocol on stdin/stdout. Element handles are ids
//! registered on the node side; they are invalidated by navigation.

use std::process::{Command, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tracing::{debug, warn};

use crate::error::{E2eError, E2eResult};

/// Opaque reference to an element on the current page.
///
/// Valid until the next navigation; the bridge drops all registered
/// elements when the page moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The abstract browser capability the harness is written against.
///
/// Kept deliberately small: locate, read, write, click. The harness does
/// not care which automation technology sits behind it.
#[async_trait]
pub trait Browser: Send {
    /// Load a URL in the page. Invalidates all previously returned handles.
    async fn navigate(&mut self, url: &str) -> E2eResult<()>;

    /// Return handles for every element matching the selector, in DOM order.
    async fn find_elements(&mut self, selector: &str) -> E2eResult<Vec<ElementHandle>>;

    /// Wait up to `timeout` for the element to become visible.
    async fn wait_visible(&mut self, handle: ElementHandle, timeout: Duration) -> E2eResult<()>;

    /// Read the element's current value (`value` for form fields, text
    /// content otherwise).
    async fn get_value(&mut self, handle: ElementHandle) -> E2eResult<String>;

    /// Replace the element's content with `value`, firing input events.
    async fn set_value(&mut self, handle: ElementHandle, value: &str) -> E2eResult<()>;

    async fn click(&mut self, handle: ElementHandle) -> E2eResult<()>;

    async fn text_content(&mut self, handle: ElementHandle) -> E2eResult<String>;

    /// The text a human would read for a control: text content, aria-label,
    /// title and value attribute folded together, whitespace-normalized.
    async fn accessible_label(&mut self, handle: ElementHandle) -> E2eResult<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

/// Configuration for the Playwright bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub browser: BrowserKind,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Upper bound on any single bridge round-trip.
    pub op_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            op_timeout: Duration::from_secs(30),
        }
    }
}

/// The node-side driver. Reads one JSON request per stdin line, writes one
/// JSON reply per stdout line. Element handles are entries in a Map that is
/// cleared on navigation.
const DRIVER_JS: &str = r#"
const readline = require('readline');
const { chromium, firefox, webkit } = require('playwright');

const browserName = process.env.E2E_BROWSER || 'chromium';
const headless = process.env.E2E_HEADLESS !== '0';
const viewport = (process.env.E2E_VIEWPORT || '1280x720').split('x').map(Number);

(async () => {
  const launcher = { chromium, firefox, webkit }[browserName] || chromium;
  const browser = await launcher.launch({ headless });
  const context = await browser.newContext({
    viewport: { width: viewport[0] || 1280, height: viewport[1] || 720 }
  });
  const page = await context.newPage();

  const handles = new Map();
  let nextHandle = 1;

  const reply = (obj) => process.stdout.write(JSON.stringify(obj) + '\n');
  const element = (id) => {
    const el = handles.get(id);
    if (!el) throw new Error('stale or unknown handle ' + id);
    return el;
  };

  const rl = readline.createInterface({ input: process.stdin });
  for await (const line of rl) {
    let req;
    try { req = JSON.parse(line); } catch (e) { continue; }
    const { id, op } = req;
    try {
      switch (op) {
        case 'navigate': {
          handles.clear();
          await page.goto(req.url, { waitUntil: 'load' });
          reply({ id, ok: true });
          break;
        }
        case 'query': {
          const els = await page.$$(req.selector);
          const out = [];
          for (const el of els) { handles.set(nextHandle, el); out.push(nextHandle++); }
          reply({ id, ok: true, handles: out });
          break;
        }
        case 'wait_visible': {
          const visible = await element(req.handle)
            .waitForElementState('visible', { timeout: req.timeout_ms })
            .then(() => true)
            .catch((e) => { if (e.name === 'TimeoutError') return false; throw e; });
          reply({ id, ok: true, value: visible });
          break;
        }
        case 'value': {
          const value = await element(req.handle).evaluate(
            (node) => 'value' in node ? String(node.value) : (node.textContent || ''));
          reply({ id, ok: true, value });
          break;
        }
        case 'fill': {
          await element(req.handle).fill(req.value);
          reply({ id, ok: true });
          break;
        }
        case 'click': {
          await element(req.handle).click();
          reply({ id, ok: true });
          break;
        }
        case 'text': {
          const value = (await element(req.handle).textContent()) || '';
          reply({ id, ok: true, value });
          break;
        }
        case 'label': {
          const value = await element(req.handle).evaluate((node) => {
            const parts = [
              node.textContent,
              node.getAttribute('aria-label'),
              node.getAttribute('title'),
              node.getAttribute('value'),
            ];
            return parts.filter(Boolean).join(' ').replace(/\s+/g, ' ').trim();
          });
          reply({ id, ok: true, value });
          break;
        }
        case 'shutdown': {
          reply({ id, ok: true });
          await browser.close();
          process.exit(0);
        }
        default:
          reply({ id, ok: false, error: 'unknown op: ' + op });
      }
    } catch (e) {
      reply({ id, ok: false, error: String((e && e.message) || e) });
    }
  }
  await browser.close();
})();
"#;

#[derive(Debug, Deserialize)]
struct BridgeReply {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    handles: Option<Vec<u64>>,
    #[serde(default)]
    error: Option<String>,
}

/// A live browser session backed by a node/Playwright subprocess.
pub struct PlaywrightBridge {
    child: Child,
    stdin: ChildStdin,
    replies: Lines<BufReader<ChildStdout>>,
    next_id: u64,
    op_timeout: Duration,

    // Holds the generated driver script for the child's lifetime.
    _scratch: TempDir,
}

impl PlaywrightBridge {
    /// Check that Playwright is installed and reachable via npx.
    pub fn check_installed() -> E2eResult<()> {
        let status = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Spawn the driver subprocess and wait for it to accept requests.
    pub async fn launch(config: BridgeConfig) -> E2eResult<Self> {
        Self::check_installed()?;

        let scratch = tempfile::tempdir()?;
        let driver_path = scratch.path().join("driver.js");
        std::fs::write(&driver_path, DRIVER_JS)?;

        debug!("Spawning browser driver: {}", driver_path.display());

        let mut child = TokioCommand::new("node")
            .arg(&driver_path)
            .env("E2E_BROWSER", config.browser.as_str())
            .env("E2E_HEADLESS", if config.headless { "1" } else { "0" })
            .env(
                "E2E_VIEWPORT",
                format!("{}x{}", config.viewport_width, config.viewport_height),
            )
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| E2eError::Bridge(format!("failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Protocol("driver stdin not captured".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Protocol("driver stdout not captured".into()))?;

        Ok(Self {
            child,
            stdin,
            replies: BufReader::new(stdout).lines(),
            next_id: 1,
            op_timeout: config.op_timeout,
            _scratch: scratch,
        })
    }

    /// Close the page and reap the subprocess.
    pub async fn shutdown(mut self) -> E2eResult<()> {
        let _ = self.request("shutdown", json!({})).await;
        let _ = self.child.wait().await;
        Ok(())
    }

    async fn request(&mut self, op: &str, mut payload: serde_json::Value) -> E2eResult<BridgeReply> {
        let id = self.next_id;
        self.next_id += 1;
        payload["id"] = json!(id);
        payload["op"] = json!(op);

        let line = serde_json::to_string(&payload)?;
        debug!(op, id, "bridge request");

        let reply = tokio::time::timeout(self.op_timeout, async {
            self.stdin.write_all(line.as_bytes()).await?;
            self.stdin.write_all(b"\n").await?;
            self.stdin.flush().await?;

            loop {
                let line = self
                    .replies
                    .next_line()
                    .await?
                    .ok_or_else(|| E2eError::Bridge("driver exited unexpectedly".into()))?;

                match serde_json::from_str::<BridgeReply>(&line) {
                    Ok(reply) if reply.id == id => return Ok::<BridgeReply, E2eError>(reply),
                    Ok(stale) => debug!(stale_id = stale.id, "skipping stale reply"),
                    Err(_) => warn!("unparseable driver output: {}", line),
                }
            }
        })
        .await
        .map_err(|_| E2eError::Timeout(format!("bridge op {}", op)))??;

        if reply.ok {
            Ok(reply)
        } else {
            Err(E2eError::Bridge(
                reply.error.unwrap_or_else(|| format!("op {} failed", op)),
            ))
        }
    }

    fn reply_string(reply: BridgeReply, op: &str) -> E2eResult<String> {
        match reply.value {
            Some(serde_json::Value::String(s)) => Ok(s),
            other => Err(E2eError::Protocol(format!(
                "op {} returned non-string value: {:?}",
                op, other
            ))),
        }
    }
}

#[async_trait]
impl Browser for PlaywrightBridge {
    async fn navigate(&mut self, url: &str) -> E2eResult<()> {
        self.request("navigate", json!({ "url": url })).await?;
        Ok(())
    }

    async fn find_elements(&mut self, selector: &str) -> E2eResult<Vec<ElementHandle>> {
        let reply = self.request("query", json!({ "selector": selector })).await?;
        Ok(reply
            .handles
            .unwrap_or_default()
            .into_iter()
            .map(ElementHandle)
            .collect())
    }

    async fn wait_visible(&mut self, handle: ElementHandle, timeout: Duration) -> E2eResult<()> {
        let reply = self
            .request(
                "wait_visible",
                json!({ "handle": handle.0, "timeout_ms": timeout.as_millis() as u64 }),
            )
            .await?;

        match reply.value {
            Some(serde_json::Value::Bool(true)) => Ok(()),
            Some(serde_json::Value::Bool(false)) => Err(E2eError::Timeout(format!(
                "element {} to become visible",
                handle
            ))),
            other => Err(E2eError::Protocol(format!(
                "wait_visible returned non-bool value: {:?}",
                other
            ))),
        }
    }

    async fn get_value(&mut self, handle: ElementHandle) -> E2eResult<String> {
        let reply = self.request("value", json!({ "handle": handle.0 })).await?;
        Self::reply_string(reply, "value")
    }

    async fn set_value(&mut self, handle: ElementHandle, value: &str) -> E2eResult<()> {
        self.request("fill", json!({ "handle": handle.0, "value": value }))
            .await?;
        Ok(())
    }

    async fn click(&mut self, handle: ElementHandle) -> E2eResult<()> {
        self.request("click", json!({ "handle": handle.0 })).await?;
        Ok(())
    }

    async fn text_content(&mut self, handle: ElementHandle) -> E2eResult<String> {
        let reply = self.request("text", json!({ "handle": handle.0 })).await?;
        Self::reply_string(reply, "text")
    }

    async fn accessible_label(&mut self, handle: ElementHandle) -> E2eResult<String> {
        let reply = self.request("label", json!({ "handle": handle.0 })).await?;
        Self::reply_string(reply, "label")
    }
}
