use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub source: fn(&str) -> String,
    pub translation: fn(&str) -> String,
    pub error: fn(&str) -> String,
    pub hint: fn(&str) -> String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: |s| s.bright_magenta().bold().to_string(),
            label: |s| s.cyan().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            source: |s| s.bright_white().dimmed().italic().to_string(),
            translation: |s| s.white().bold().to_string(),
            error: |s| s.red().to_string(),
            hint: |s| s.yellow().to_string(),
        }
    }
}
