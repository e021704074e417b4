use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Hebrew block, U+0590..=U+05FF.
pub const PIVOT_SCRIPT_BLOCK: RangeInclusive<u32> = 0x0590..=0x05FF;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ScriptTag {
    #[default]
    Default,
    PivotScript,
}

/// Classify `text`: any single code point in the pivot block is enough.
pub fn detect(text: &str) -> ScriptTag {
    if text.chars().any(|c| PIVOT_SCRIPT_BLOCK.contains(&(c as u32))) {
        ScriptTag::PivotScript
    } else {
        ScriptTag::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_bounds_are_inclusive() {
        assert_eq!(detect("\u{0590}"), ScriptTag::PivotScript);
        assert_eq!(detect("\u{05FF}"), ScriptTag::PivotScript);
        assert_eq!(detect("\u{058F}"), ScriptTag::Default);
        assert_eq!(detect("\u{0600}"), ScriptTag::Default);
    }

    #[test]
    fn latin_and_empty_are_default() {
        assert_eq!(detect("hello"), ScriptTag::Default);
        assert_eq!(detect(""), ScriptTag::Default);
    }

    #[test]
    fn mixed_text_is_pivot() {
        assert_eq!(detect("release notes: שלום"), ScriptTag::PivotScript);
    }
}
