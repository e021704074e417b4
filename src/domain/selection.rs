//! Types shared by the selection readers and their platform adapters.

/// One representation of a clipboard item: a platform format id
/// (`public.utf8-plain-text`, `text/html`, ...) and its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    pub format: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardItem {
    pub representations: Vec<Representation>,
}

/// Byte-exact copy of the clipboard, in the original item and
/// representation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    pub items: Vec<ClipboardItem>,
    pub change_count: u64,
}

impl ClipboardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.iter().all(|i| i.representations.is_empty())
    }

    pub fn total_size_bytes(&self) -> usize {
        self.items
            .iter()
            .flat_map(|i| i.representations.iter())
            .map(|r| r.bytes.len())
            .sum()
    }
}

/// Sentinel location for "no range" (`kCFNotFound`).
pub const RANGE_NOT_FOUND: i64 = -1;

/// Location/length pair in UTF-16 code units, as accessibility APIs
/// report selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub location: i64,
    pub length: i64,
}

impl TextRange {
    pub const fn new(location: i64, length: i64) -> Self {
        Self { location, length }
    }

    /// A real, non-empty selection rather than the sentinel.
    pub fn is_resolved(&self) -> bool {
        self.location != RANGE_NOT_FOUND && self.location >= 0 && self.length > 0
    }

    /// The selected slice of `value`, or `None` when the range is the
    /// unresolved sentinel, empty, or starts past the end. A range running
    /// past the end is clamped.
    pub fn slice(&self, value: &str) -> Option<String> {
        if !self.is_resolved() {
            return None;
        }
        let units: Vec<u16> = value.encode_utf16().collect();
        let start = usize::try_from(self.location).ok()?;
        if start > units.len() {
            return None;
        }
        let len = usize::try_from(self.length).ok()?;
        let end = start.saturating_add(len).min(units.len());
        Some(String::from_utf16_lossy(&units[start..end]))
    }
}

/// Attributes the selection reader asks an accessibility node for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxAttribute {
    SelectedText,
    Value,
    SelectedTextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxValue {
    Text(String),
    Range(TextRange),
}
