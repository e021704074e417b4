use crate::domain::error::AppError;
use crate::domain::model::{BackendConfig, Provider};
use crate::domain::traits::SecretStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "hotkey-translator";
pub const DEFAULT_MAX_CHARS: u32 = 2000;
const FALLBACK_COMMAND: &str = "argos-translate --from-lang {src} --to-lang {dst}";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// `local`, `openai` or `gemini`; anything else means the default provider.
    pub provider: Option<String>,
    pub local_command: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_max_chars")]
    pub max_chars: String,
    pub scripts_path: Option<String>,
    pub models_path: Option<String>,
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Some(Provider::DEFAULT.setting_name().to_string()),
            local_command: None,
            openai_model: default_openai_model(),
            gemini_model: default_gemini_model(),
            max_chars: default_max_chars(),
            scripts_path: None,
            models_path: None,
            http_proxy: None,
            logging: Logging::default(),
        }
    }
}

// Defaults
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_gemini_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}
fn default_max_chars() -> String {
    DEFAULT_MAX_CHARS.to_string()
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    pub fn provider(&self) -> Provider {
        Provider::from_setting(self.provider.as_deref())
    }

    pub fn max_chars(&self) -> u32 {
        self.max_chars.trim().parse().unwrap_or(DEFAULT_MAX_CHARS)
    }

    /// Project root holding `scripts/` and `models/`, derived from whichever
    /// path is configured.
    pub fn root_path(&self) -> Option<PathBuf> {
        non_empty(&self.scripts_path)
            .or_else(|| non_empty(&self.models_path))
            .and_then(|p| Path::new(p).parent().map(Path::to_path_buf))
    }

    /// Value substituted for `{models}`.
    pub fn models_dir(&self) -> String {
        if let Some(models) = non_empty(&self.models_path) {
            return models.to_string();
        }
        match self.root_path() {
            Some(root) => root.join("models").display().to_string(),
            None => String::new(),
        }
    }

    pub fn default_command_template(&self) -> String {
        match self.root_path() {
            Some(root) => {
                let root = root.display();
                format!(
                    "\"{root}/.venv-nllb/bin/python\" \"{root}/scripts/nllb_translate.py\" \
                     --models-dir \"{{models}}/nllb-200-distilled-600M-ct2-int8\" \
                     --tokenizer-dir \"{{models}}/nllb-200-distilled-600M-tokenizer\" \
                     --src {{src}} --dst {{dst}} --max-chars {{max_chars}}"
                )
            }
            None => FALLBACK_COMMAND.to_string(),
        }
    }

    pub fn command_template(&self) -> String {
        non_empty(&self.local_command)
            .map(str::to_string)
            .unwrap_or_else(|| self.default_command_template())
    }

    pub fn model_for(&self, provider: Provider) -> String {
        match provider {
            Provider::OpenAi => self.openai_model.trim().to_string(),
            Provider::Gemini => self.gemini_model.trim().to_string(),
            Provider::Local => String::new(),
        }
    }

    /// Freeze this config and the provider's key into a request snapshot.
    pub fn resolve(
        &self,
        provider_override: Option<Provider>,
        secrets: &dyn SecretStore,
    ) -> Result<BackendConfig, AppError> {
        let provider = provider_override.unwrap_or_else(|| self.provider());
        let api_key = match provider.key_account() {
            Some(account) => secrets.get(account)?.unwrap_or_default(),
            None => String::new(),
        };

        Ok(BackendConfig {
            provider,
            command_template: self.command_template(),
            api_key: api_key.trim().to_string(),
            model_id: self.model_for(provider),
            max_chars: self.max_chars(),
            models_dir: self.models_dir(),
        })
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|p| p.join("config.toml"))
}

pub fn get_history_path() -> PathBuf {
    get_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("history.json")
}

/// Parse a config file, falling back to defaults when it is broken.
pub fn load_config_from(path: &Path) -> Result<Config, AppError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    match toml::from_str::<Config>(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
            Ok(Config::default())
        }
    }
}

/// Read the config fresh; callers do this once per translation.
pub fn load_config() -> Result<Config, AppError> {
    match get_config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn write_config_sample(path: &Path) -> Result<bool, AppError> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let sample = Config::default();
    let toml_content = toml::to_string_pretty(&sample)
        .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, toml_content)
        .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;
    Ok(true)
}

pub fn generate_config_sample() -> Result<(), AppError> {
    let path = get_config_path()
        .ok_or_else(|| AppError::Config("Cannot determine config directory".to_string()))?;

    if write_config_sample(&path)? {
        println!("Generated config file at: {}", path.display());
    } else {
        eprintln!("Config file already exists at: {}", path.display());
    }
    Ok(())
}
