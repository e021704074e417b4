use crate::domain::error::TranslateError;
use crate::domain::model::Hop;

pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Values substituted into a command template before tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders<'a> {
    pub src: &'a str,
    pub dst: &'a str,
    pub models: &'a str,
    pub max_chars: String,
}

impl<'a> Placeholders<'a> {
    pub fn for_hop(hop: Hop, models: &'a str, max_chars: u32) -> Self {
        Self {
            src: hop.src.code(),
            dst: hop.dst.code(),
            models,
            max_chars: max_chars.to_string(),
        }
    }
}

/// Plain string replacement of `{src}`, `{dst}`, `{models}`, `{max_chars}`.
///
/// Runs before tokenizing, so a value containing spaces has to sit inside
/// quotes in the template. `{text}` is left alone.
pub fn render_template(template: &str, values: &Placeholders<'_>) -> String {
    template
        .replace("{src}", values.src)
        .replace("{dst}", values.dst)
        .replace("{models}", values.models)
        .replace("{max_chars}", &values.max_chars)
}

/// Split a command line on unquoted spaces.
///
/// `"` toggles quoting and is dropped. No shell grammar: `|`, `>` and `$`
/// are ordinary characters. An unmatched quote just runs to the end.
pub fn split_command(command: &str) -> Result<Vec<String>, TranslateError> {
    let trimmed = command.trim();
    if trimmed.is_empty() {
        return Err(TranslateError::EmptyCommand);
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in trimmed.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }

    if parts.is_empty() {
        // e.g. a template of just `""`
        return Err(TranslateError::EmptyCommand);
    }
    Ok(parts)
}

/// Tokenize `command` and put `text` in place of every `{text}` token,
/// as one argument.
pub fn build_argv(command: &str, text: &str) -> Result<Vec<String>, TranslateError> {
    let argv = split_command(command)?
        .into_iter()
        .map(|part| {
            if part == TEXT_PLACEHOLDER {
                text.to_string()
            } else {
                part
            }
        })
        .collect();
    Ok(argv)
}
