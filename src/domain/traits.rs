use crate::domain::error::{AppError, TranslateError};
use crate::domain::model::Hop;
use crate::domain::selection::{AxAttribute, AxValue, ClipboardSnapshot, TextRange};
use async_trait::async_trait;

/// One translation backend.
///
/// Implementations are stateless per call: the orchestrator hands them
/// the text and the hop, they answer once. Retrying is not their job.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, hop: Hop) -> Result<String, TranslateError>;
}

/// Get/set-by-account credential vault.
pub trait SecretStore: Send + Sync {
    fn get(&self, account: &str) -> Result<Option<String>, AppError>;

    fn set(&self, account: &str, value: &str) -> Result<(), AppError>;
}

/// System clipboard, as far as selection capture needs it.
pub trait ClipboardPort: Send + Sync {
    /// Monotonic counter bumped on every content change.
    fn change_count(&self) -> Result<u64, AppError>;

    /// Plain-text representation, if any.
    fn read_text(&self) -> Result<Option<String>, AppError>;

    /// Read every representation of every item without mutating anything.
    fn capture(&self) -> Result<ClipboardSnapshot, AppError>;

    /// Clear, then write back exactly what `snapshot` holds. An empty
    /// snapshot leaves the clipboard empty.
    fn restore(&self, snapshot: &ClipboardSnapshot) -> Result<(), AppError>;

    /// Whether restored content stays on the clipboard once this process
    /// exits. X11 and Wayland serve clipboard data from the owning client,
    /// so there it does not.
    fn restore_survives_exit(&self) -> bool {
        true
    }
}

/// Synthesises the platform copy shortcut (Cmd+C / Ctrl+C).
pub trait CopyShortcut: Send + Sync {
    fn send_copy(&self) -> Result<(), AppError>;
}

/// Read-only view of a live accessibility graph owned by another process.
///
/// The graph may be huge or cyclic; callers bound their walks.
pub trait AccessibilityTree {
    type Node;

    fn focused_element(&self) -> Option<Self::Node>;

    fn focused_window(&self) -> Option<Self::Node>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, key: AxAttribute) -> Option<AxValue>;

    /// Range-parameterised "attributed string for range", as plain text.
    fn string_for_range(&self, node: &Self::Node, range: TextRange) -> Option<String>;
}
