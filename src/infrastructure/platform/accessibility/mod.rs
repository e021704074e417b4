use crate::domain::selection::{AxAttribute, AxValue, TextRange};
use crate::domain::traits::AccessibilityTree;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::{AxElement, MacAccessibility, MacAccessibility as SystemAccessibility};

#[cfg(not(target_os = "macos"))]
pub use self::UnsupportedAccessibility as SystemAccessibility;

/// Platforms without an accessibility bridge: every query comes back
/// empty, so selection capture goes straight to the clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedAccessibility;

impl UnsupportedAccessibility {
    pub fn new() -> Self {
        Self
    }
}

impl AccessibilityTree for UnsupportedAccessibility {
    type Node = ();

    fn focused_element(&self) -> Option<()> {
        None
    }

    fn focused_window(&self) -> Option<()> {
        None
    }

    fn children(&self, _node: &()) -> Vec<()> {
        Vec::new()
    }

    fn attribute(&self, _node: &(), _key: AxAttribute) -> Option<AxValue> {
        None
    }

    fn string_for_range(&self, _node: &(), _range: TextRange) -> Option<String> {
        None
    }
}
