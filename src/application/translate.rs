use crate::application::orchestrator::{self, Backend};
use crate::application::selection::SelectionAcquirer;
use crate::domain::error::{AppError, TranslateError};
use crate::domain::model::{BackendConfig, Provider, TranslationOutcome, TranslationRequest};
use crate::domain::traits::{AccessibilityTree, ClipboardPort, CopyShortcut};
use crate::state::AppState;
use reqwest::Client;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Translate `text` with a fresh config snapshot and record the result
/// in history. Translation failures come back inside the outcome; only
/// setup failures (config, vault) are errors here.
pub async fn translate_text(
    state: &AppState,
    text: &str,
    provider: Option<Provider>,
) -> Result<TranslationOutcome, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TranslateError::EmptyInput.into());
    }

    let config = state.load_config()?;
    let backend = config.resolve(provider, state.secrets.as_ref())?;
    debug!(?backend, "Resolved backend");

    let outcome = translate_with(&state.http_client, &backend, text).await;
    if let Err(e) = state.history.record(&outcome) {
        warn!(error = %e, path = %state.history.path().display(), "Failed to write history");
    }
    Ok(outcome)
}

/// Run one request against an already resolved backend.
pub async fn translate_with(http: &Client, config: &BackendConfig, text: &str) -> TranslationOutcome {
    let request = TranslationRequest::new(text, config.provider);
    let result = match Backend::from_config(config, http) {
        Ok(backend) => orchestrator::run(&backend, &request).await,
        Err(e) => Err(e),
    };
    outcome_for(&request, result)
}

pub fn outcome_for(
    request: &TranslationRequest,
    result: Result<String, TranslateError>,
) -> TranslationOutcome {
    let source_lang = request.source_language().code().to_string();
    match result {
        Ok(translation) => {
            info!(provider = %request.provider, src = %source_lang, len = translation.len(), "Translation done");
            TranslationOutcome {
                input: request.source_text.clone(),
                source_lang,
                provider: request.provider,
                translation: Some(translation),
                error: None,
                quota_exceeded: false,
            }
        }
        Err(e) => {
            info!(provider = %request.provider, error = %e, "Translation failed");
            TranslationOutcome {
                input: request.source_text.clone(),
                source_lang,
                provider: request.provider,
                translation: None,
                quota_exceeded: e.is_quota(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Acquire the current selection, then translate it. `Ok(None)` means
/// `cancel` fired first; the clipboard has been restored by then.
pub async fn translate_selection<T, C, K>(
    state: &AppState,
    acquirer: &SelectionAcquirer<T, C, K>,
    cancel: &CancellationToken,
    provider: Option<Provider>,
) -> Result<Option<TranslationOutcome>, AppError>
where
    T: AccessibilityTree,
    C: ClipboardPort + 'static,
    K: CopyShortcut + 'static,
{
    // acquisition watches `cancel` itself so the restore always completes
    let text = acquirer.acquire(cancel).await;
    if cancel.is_cancelled() {
        return Ok(None);
    }
    let text = text.ok_or(TranslateError::NoSelectionFound)?;
    until_cancelled(cancel, translate_text(state, &text, provider))
        .await
        .transpose()
}

/// Drive `work` until it finishes or `cancel` fires. On cancellation the
/// future is dropped before this returns, which kills a running local
/// translator and aborts in-flight HTTP requests.
pub async fn until_cancelled<F: Future>(cancel: &CancellationToken, work: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("Cancelled");
            None
        }
        output = work => Some(output),
    }
}
