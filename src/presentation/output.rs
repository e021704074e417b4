use crate::domain::model::{Provider, TranslationOutcome};
use crate::presentation::theme::Theme;
use std::fmt::Write;

pub const BILLING_URL: &str = "https://platform.openai.com/account/billing";
const GEMINI_BILLING_URL: &str = "https://aistudio.google.com/";

/// Where to go when a provider's quota is spent.
pub fn billing_hint(provider: Provider) -> Option<String> {
    let url = match provider {
        Provider::OpenAi => BILLING_URL,
        Provider::Gemini => GEMINI_BILLING_URL,
        Provider::Local => return None,
    };
    Some(format!("{} quota exhausted. Check billing: {}", provider, url))
}

/// Terminal rendering of one outcome. Never empty.
pub fn format_outcome(outcome: &TranslationOutcome, theme: &Theme) -> String {
    let mut output = String::new();

    let header = format!("{}→ru", outcome.source_lang);
    writeln!(
        output,
        "{} {}",
        (theme.title)(&header),
        (theme.label)(&format!("[{}]", outcome.provider))
    )
    .ok();
    writeln!(output, "  {}", (theme.source)(&outcome.input)).ok();
    writeln!(output, "  {}", (theme.line)(&"⸺".repeat(40))).ok();

    if outcome.is_success() {
        writeln!(output, "  {}", (theme.translation)(&outcome.display_text())).ok();
    } else {
        writeln!(output, "  {}", (theme.error)(&outcome.display_text())).ok();
        if outcome.quota_exceeded {
            if let Some(hint) = billing_hint(outcome.provider) {
                writeln!(output, "  {}", (theme.hint)(&hint)).ok();
            }
        }
    }

    output
}

/// Plain history listing, newest first.
pub fn format_history(entries: &[String]) -> String {
    if entries.is_empty() {
        return "No history yet.\n".to_string();
    }
    let mut output = String::new();
    for entry in entries {
        writeln!(output, "{}\n", entry).ok();
    }
    output
}
