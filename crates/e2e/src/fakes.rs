//! Scripted in-memory page model implementing the browser capability trait
//!
//! Tests register which selector strings match which elements, what each
//! element holds, and how the "page" reacts to writes and clicks. Nothing
//! here talks to a real browser.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{Browser, ElementHandle};
use crate::error::{E2eError, E2eResult};

#[derive(Default)]
pub struct FakeBrowser {
    /// Registration order doubles as DOM order within a selector.
    elements: Vec<(String, ElementHandle, bool)>,
    values: HashMap<ElementHandle, String>,
    labels: HashMap<ElementHandle, String>,

    /// Per-handle count of reads that fail before reads start succeeding.
    failing_reads: HashMap<ElementHandle, u32>,

    /// Truncate writes to this handle at N characters, simulating a target
    /// input field that mangles long content.
    truncation: HashMap<ElementHandle, usize>,

    /// (input, output, f): writing `v` to input sets output to `f(v)`.
    translation: Option<(ElementHandle, ElementHandle, fn(&str) -> String)>,

    /// (control, input): clicking control empties input.
    clear: Option<(ElementHandle, ElementHandle)>,

    pub navigations: Vec<String>,
    pub clicks: Vec<ElementHandle>,

    next_id: u64,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, selector: &str, visible: bool) -> ElementHandle {
        self.next_id += 1;
        let handle = ElementHandle(self.next_id);
        self.elements.push((selector.to_string(), handle, visible));
        handle
    }

    pub fn set_element_value(&mut self, handle: ElementHandle, value: &str) {
        self.values.insert(handle, value.to_string());
    }

    pub fn set_element_label(&mut self, handle: ElementHandle, label: &str) {
        self.labels.insert(handle, label.to_string());
    }

    pub fn fail_reads(&mut self, handle: ElementHandle, count: u32) {
        self.failing_reads.insert(handle, count);
    }

    pub fn truncate_input(&mut self, handle: ElementHandle, max_chars: usize) {
        self.truncation.insert(handle, max_chars);
    }

    pub fn link_translation(
        &mut self,
        input: ElementHandle,
        output: ElementHandle,
        f: fn(&str) -> String,
    ) {
        self.translation = Some((input, output, f));
    }

    pub fn link_clear(&mut self, control: ElementHandle, input: ElementHandle) {
        self.clear = Some((control, input));
    }

    fn known(&self, handle: ElementHandle) -> E2eResult<()> {
        if self.elements.iter().any(|(_, h, _)| *h == handle) {
            Ok(())
        } else {
            Err(E2eError::Bridge(format!("stale or unknown handle {}", handle)))
        }
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn navigate(&mut self, url: &str) -> E2eResult<()> {
        self.navigations.push(url.to_string());
        Ok(())
    }

    async fn find_elements(&mut self, selector: &str) -> E2eResult<Vec<ElementHandle>> {
        Ok(self
            .elements
            .iter()
            .filter(|(s, _, _)| s == selector)
            .map(|(_, h, _)| *h)
            .collect())
    }

    async fn wait_visible(&mut self, handle: ElementHandle, _timeout: Duration) -> E2eResult<()> {
        self.known(handle)?;
        let visible = self
            .elements
            .iter()
            .any(|(_, h, visible)| *h == handle && *visible);
        if visible {
            Ok(())
        } else {
            Err(E2eError::Timeout(format!(
                "element {} to become visible",
                handle
            )))
        }
    }

    async fn get_value(&mut self, handle: ElementHandle) -> E2eResult<String> {
        self.known(handle)?;
        if let Some(remaining) = self.failing_reads.get_mut(&handle) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(E2eError::Bridge("synthetic read failure".to_string()));
            }
        }
        Ok(self.values.get(&handle).cloned().unwrap_or_default())
    }

    async fn set_value(&mut self, handle: ElementHandle, value: &str) -> E2eResult<()> {
        self.known(handle)?;
        let stored = match self.truncation.get(&handle) {
            Some(&max) => value.chars().take(max).collect(),
            None => value.to_string(),
        };
        self.values.insert(handle, stored.clone());

        if let Some((input, output, f)) = self.translation {
            if input == handle {
                self.values.insert(output, f(&stored));
            }
        }
        Ok(())
    }

    async fn click(&mut self, handle: ElementHandle) -> E2eResult<()> {
        self.known(handle)?;
        self.clicks.push(handle);
        if let Some((control, input)) = self.clear {
            if control == handle {
                self.values.insert(input, String::new());
            }
        }
        Ok(())
    }

    async fn text_content(&mut self, handle: ElementHandle) -> E2eResult<String> {
        self.known(handle)?;
        Ok(self.labels.get(&handle).cloned().unwrap_or_default())
    }

    async fn accessible_label(&mut self, handle: ElementHandle) -> E2eResult<String> {
        self.known(handle)?;
        Ok(self.labels.get(&handle).cloned().unwrap_or_default())
    }
}
