use crate::domain::error::AppError;
use crate::domain::selection::{AxAttribute, AxValue, ClipboardSnapshot};
use crate::domain::traits::{AccessibilityTree, ClipboardPort, CopyShortcut};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Max nodes one tree search may visit.
pub const NODE_BUDGET: usize = 250;

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reads the selection from the accessibility tree. Never mutates
/// anything and never waits.
pub struct AccessibilityReader<T> {
    tree: T,
    node_budget: usize,
}

impl<T: AccessibilityTree> AccessibilityReader<T> {
    pub fn new(tree: T) -> Self {
        Self::with_budget(tree, NODE_BUDGET)
    }

    pub fn with_budget(tree: T, node_budget: usize) -> Self {
        Self { tree, node_budget }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn read(&self) -> Option<String> {
        if let Some(focused) = self.tree.focused_element() {
            if let Some(text) = self.extract(&focused) {
                debug!("Selection found on focused element");
                return Some(text);
            }
            if let Some(text) = self.search(focused) {
                debug!("Selection found below focused element");
                return Some(text);
            }
        }

        let window = self.tree.focused_window()?;
        let text = self.search(window);
        if text.is_some() {
            debug!("Selection found in focused window");
        }
        text
    }

    /// Per-node policy, first non-empty wins: selected text, then value
    /// narrowed by the selected range, then the attributed string for
    /// that range.
    pub fn extract(&self, node: &T::Node) -> Option<String> {
        if let Some(AxValue::Text(selected)) = self.tree.attribute(node, AxAttribute::SelectedText)
        {
            if let Some(text) = non_blank(selected) {
                return Some(text);
            }
        }

        let range = match self.tree.attribute(node, AxAttribute::SelectedTextRange) {
            Some(AxValue::Range(range)) if range.is_resolved() => range,
            _ => return None,
        };

        if let Some(AxValue::Text(value)) = self.tree.attribute(node, AxAttribute::Value) {
            if let Some(text) = range.slice(&value).and_then(non_blank) {
                return Some(text);
            }
        }

        self.tree
            .string_for_range(node, range)
            .and_then(non_blank)
    }

    /// Breadth-first from `root`, visiting at most `node_budget` nodes
    /// whatever the graph's size or cycles.
    fn search(&self, root: T::Node) -> Option<String> {
        let mut queue = VecDeque::from([root]);
        let mut visited = 0;

        while let Some(node) = queue.pop_front() {
            if visited >= self.node_budget {
                break;
            }
            visited += 1;
            if let Some(text) = self.extract(&node) {
                return Some(text);
            }
            let room = self.node_budget.saturating_sub(visited + queue.len());
            queue.extend(self.tree.children(&node).into_iter().take(room));
        }

        debug!(visited, "Tree search found no selection");
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 8,
            interval: Duration::from_millis(200),
        }
    }
}

impl PollPolicy {
    /// Upper bound on time spent polling.
    pub fn budget(&self) -> Duration {
        self.interval * self.attempts
    }
}

/// Run a blocking platform call on tokio's blocking pool.
async fn off_runtime<T, F>(call: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?
}

/// Accept only a changed counter together with non-empty text.
fn poll_once<C: ClipboardPort + ?Sized>(clipboard: &C, initial: u64) -> Option<String> {
    let count = match clipboard.change_count() {
        Ok(count) => count,
        Err(e) => {
            debug!(error = %e, "Change counter unavailable");
            return None;
        }
    };
    if count == initial {
        return None;
    }
    match clipboard.read_text() {
        Ok(Some(text)) if !text.trim().is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Clipboard text unreadable");
            None
        }
    }
}

/// Puts the captured clipboard back. [`RestoreGuard::finish`] restores off
/// the runtime; if the read is dropped first, `Drop` restores inline.
struct RestoreGuard<C: ClipboardPort + 'static> {
    clipboard: Arc<C>,
    snapshot: Option<ClipboardSnapshot>,
}

impl<C: ClipboardPort + 'static> RestoreGuard<C> {
    fn new(clipboard: Arc<C>, snapshot: ClipboardSnapshot) -> Self {
        Self {
            clipboard,
            snapshot: Some(snapshot),
        }
    }

    async fn finish(mut self) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        let clipboard = Arc::clone(&self.clipboard);
        if let Err(e) = off_runtime(move || clipboard.restore(&snapshot)).await {
            warn!(error = %e, "Failed to restore clipboard");
        }
    }
}

impl<C: ClipboardPort + 'static> Drop for RestoreGuard<C> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            if let Err(e) = self.clipboard.restore(&snapshot) {
                warn!(error = %e, "Failed to restore clipboard");
            }
        }
    }
}

/// Reads the selection by sending the copy shortcut and watching the
/// clipboard. The user's clipboard is restored before `read` returns.
pub struct ClipboardReader<C, K> {
    clipboard: Arc<C>,
    shortcut: Arc<K>,
    policy: PollPolicy,
}

impl<C, K> ClipboardReader<C, K>
where
    C: ClipboardPort + 'static,
    K: CopyShortcut + 'static,
{
    pub fn new(clipboard: C, shortcut: K) -> Self {
        Self::with_policy(clipboard, shortcut, PollPolicy::default())
    }

    pub fn with_policy(clipboard: C, shortcut: K, policy: PollPolicy) -> Self {
        Self {
            clipboard: Arc::new(clipboard),
            shortcut: Arc::new(shortcut),
            policy,
        }
    }

    pub async fn read(&self, cancel: &CancellationToken) -> Option<String> {
        let clipboard = Arc::clone(&self.clipboard);
        let snapshot = match off_runtime(move || clipboard.capture()).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // no snapshot, no copy: we could not put things back
                warn!(error = %e, "Could not snapshot clipboard, skipping copy fallback");
                return None;
            }
        };
        if !snapshot.is_empty() && !self.clipboard.restore_survives_exit() {
            // the restored content would vanish with this process
            warn!("Clipboard restore would not outlive this process, skipping copy fallback");
            return None;
        }

        let initial = snapshot.change_count;
        let restore = RestoreGuard::new(Arc::clone(&self.clipboard), snapshot);
        let text = self.copy_and_poll(initial, cancel).await;
        restore.finish().await;
        text
    }

    async fn copy_and_poll(&self, initial: u64, cancel: &CancellationToken) -> Option<String> {
        let shortcut = Arc::clone(&self.shortcut);
        if let Err(e) = off_runtime(move || shortcut.send_copy()).await {
            warn!(error = %e, "Failed to send copy shortcut");
            return None;
        }

        for attempt in 1..=self.policy.attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempt, "Clipboard polling cancelled");
                    return None;
                }
                _ = tokio::time::sleep(self.policy.interval) => {}
            }
            let clipboard = Arc::clone(&self.clipboard);
            let polled = off_runtime(move || Ok(poll_once(&*clipboard, initial))).await;
            if let Ok(Some(text)) = polled {
                debug!(attempt, len = text.len(), "Copied selection arrived");
                return Some(text);
            }
        }

        debug!(attempts = self.policy.attempts, "Clipboard never changed");
        None
    }
}

/// Accessibility first; the copy fallback only when that finds nothing.
pub struct SelectionAcquirer<T, C, K> {
    accessibility: AccessibilityReader<T>,
    clipboard: ClipboardReader<C, K>,
}

impl<T, C, K> SelectionAcquirer<T, C, K>
where
    T: AccessibilityTree,
    C: ClipboardPort + 'static,
    K: CopyShortcut + 'static,
{
    pub fn new(accessibility: AccessibilityReader<T>, clipboard: ClipboardReader<C, K>) -> Self {
        Self {
            accessibility,
            clipboard,
        }
    }

    /// `None` means no selection could be found; blank text counts as none.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Option<String> {
        if let Some(text) = self.accessibility.read() {
            if !text.trim().is_empty() {
                info!(source = "accessibility", len = text.len(), "Selection acquired");
                return Some(text);
            }
        }

        let text = self
            .clipboard
            .read(cancel)
            .await
            .filter(|t| !t.trim().is_empty());
        match &text {
            Some(t) => info!(source = "clipboard", len = t.len(), "Selection acquired"),
            None => info!("No selection found"),
        }
        text
    }
}
