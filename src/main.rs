// Main entry point
use clap::Parser;
use colored::Colorize;
use hotkey_translator::application::selection::{
    AccessibilityReader, ClipboardReader, SelectionAcquirer,
};
use hotkey_translator::application::translate::{
    translate_selection, translate_text, until_cancelled,
};
use hotkey_translator::domain::error::{AppError, TranslateError};
use hotkey_translator::domain::model::Provider;
use hotkey_translator::infrastructure::config::{self, load_config, Config};
use hotkey_translator::infrastructure::network::{GeminiClient, ModelCatalog};
use hotkey_translator::infrastructure::platform::{
    EnigoShortcut, SystemAccessibility, SystemClipboard,
};
use hotkey_translator::interfaces::cli::Cli;
use hotkey_translator::presentation::output::{format_history, format_outcome};
use hotkey_translator::presentation::theme::Theme;
use hotkey_translator::state::AppState;
use tokio_util::sync::CancellationToken;

type Acquirer = SelectionAcquirer<SystemAccessibility, SystemClipboard, EnigoShortcut>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    let state = AppState::new(&config)?;

    // Ctrl-C drops whatever is in flight: the clipboard is restored and a
    // running local translator is killed
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to listen for shutdown signal: {}", e);
            } else {
                cancel.cancel();
            }
        });
    }

    // Handle commands (flags)
    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        edit_config().await?;
        return Ok(());
    }
    if cli.status {
        print_status(&state, &config)?;
        return Ok(());
    }
    if let Some(provider) = cli.set_key {
        set_key(&state, provider.into())?;
        return Ok(());
    }
    if cli.history {
        print!("{}", format_history(&state.history.entries()?));
        return Ok(());
    }
    if cli.list_models || cli.check_model.is_some() {
        return until_cancelled(&cancel, handle_models(&state, &cli))
            .await
            .unwrap_or_else(|| interrupted());
    }

    let result = if cli.text.is_empty() {
        let acquirer = build_acquirer()?;
        if cli.selection {
            let text = acquirer.acquire(&cancel).await;
            if cancel.is_cancelled() {
                interrupted();
            }
            match text {
                Some(text) => println!("{}", text),
                None => exit_with(&TranslateError::NoSelectionFound.to_string()),
            }
            return Ok(());
        }
        translate_selection(&state, &acquirer, &cancel, cli.provider()).await
    } else {
        until_cancelled(
            &cancel,
            translate_text(&state, &cli.text.join(" "), cli.provider()),
        )
        .await
        .transpose()
    };
    let outcome = match result {
        Ok(Some(outcome)) => outcome,
        Ok(None) => interrupted(),
        Err(AppError::Translate(e)) => exit_with(&e.to_string()),
        Err(e) => return Err(e.into()),
    };

    // Output result
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", format_outcome(&outcome, &Theme::default()));
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn exit_with(message: &str) -> ! {
    eprintln!("{}", message.red());
    std::process::exit(1);
}

fn interrupted() -> ! {
    eprintln!("{}", "Interrupted".yellow());
    std::process::exit(130);
}

fn build_acquirer() -> anyhow::Result<Acquirer> {
    Ok(SelectionAcquirer::new(
        AccessibilityReader::new(SystemAccessibility::new()),
        ClipboardReader::new(SystemClipboard::new()?, EnigoShortcut),
    ))
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn edit_config() -> anyhow::Result<()> {
    let Some(config_path) = config::get_config_path() else {
        eprintln!("{}", "Config file not found".red());
        return Ok(());
    };
    if config::write_config_sample(&config_path)? {
        println!("Generated config file at: {}", config_path.display());
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    // Run editor in blocking task
    tokio::task::spawn_blocking(move || {
        std::process::Command::new(editor)
            .arg(&config_path)
            .status()
    })
    .await??;
    Ok(())
}

fn set_key(state: &AppState, provider: Provider) -> anyhow::Result<()> {
    let Some(account) = provider.key_account() else {
        eprintln!("{}", format!("{} provider does not use an API key", provider).yellow());
        return Ok(());
    };

    eprintln!("Paste the {} API key and press Enter:", provider);
    let mut key = String::new();
    std::io::stdin().read_line(&mut key)?;
    let key = key.trim();
    if key.is_empty() {
        exit_with("No key entered, nothing stored");
    }

    state.secrets.set(account, key)?;
    // some vault backends accept a write without keeping it
    if state.secrets.get(account)?.as_deref() != Some(key) {
        exit_with(&format!("{} API key was not kept by the credential store", provider));
    }
    println!("{}", format!("✓ Stored {} API key", provider).green());
    Ok(())
}

async fn handle_models(state: &AppState, cli: &Cli) -> anyhow::Result<()> {
    let config = state.load_config()?;
    let backend = config.resolve(Some(Provider::Gemini), state.secrets.as_ref())?;
    if backend.api_key.is_empty() {
        exit_with(&TranslateError::MissingApiKey(Provider::Gemini).to_string());
    }

    let catalog = ModelCatalog::new(GeminiClient::new(
        state.http_client.clone(),
        backend.api_key.as_str(),
        backend.model_id.as_str(),
    ));

    if cli.list_models {
        for id in catalog.model_ids().await? {
            let marker = if id == backend.model_id { "*" } else { " " };
            println!("{} {}", marker.green(), id);
        }
    }

    if let Some(model) = &cli.check_model {
        if catalog.supports(model).await? {
            println!("{}", format!("✓ {} supports generateContent", model).green());
        } else {
            exit_with(&format!("✘ {} is not available for generateContent", model));
        }
    }

    Ok(())
}

fn print_status(state: &AppState, config: &Config) -> anyhow::Result<()> {
    println!("{}", "hkt Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "Config: {}",
        state
            .config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );

    let provider = config.provider();
    println!("Provider: {}", provider);
    match provider {
        Provider::Local => println!("Command: {}", config.command_template()),
        _ => println!("Model: {}", config.model_for(provider)),
    }
    println!("Max chars: {}", config.max_chars());

    for cloud in [Provider::OpenAi, Provider::Gemini] {
        let Some(account) = cloud.key_account() else {
            continue;
        };
        let stored = match state.secrets.get(account) {
            Ok(Some(key)) => !key.trim().is_empty(),
            Ok(None) => false,
            Err(e) => {
                println!("{} API key: {}", cloud, format!("unavailable ({})", e).red());
                continue;
            }
        };
        let label = if stored { "Configured" } else { "Not configured" };
        println!("{} API key: {}", cloud, label);
    }

    println!(
        "History: {} ({} entries)",
        state.history.path().display(),
        state.history.entries()?.len()
    );

    Ok(())
}
