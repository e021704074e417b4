//! 翻译编排 (直译 / 希伯来语经英语中转) 测试

use async_trait::async_trait;
use hotkey_translator::application::orchestrator::{plan, run, Backend};
use hotkey_translator::domain::error::TranslateError;
use hotkey_translator::domain::model::{
    BackendConfig, Hop, Language, Provider, TranslationRequest,
};
use hotkey_translator::domain::script::ScriptTag;
use hotkey_translator::domain::traits::Translator;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records every call and answers from a scripted queue.
struct Recording {
    calls: Mutex<Vec<(String, Hop)>>,
    replies: Mutex<VecDeque<Result<String, TranslateError>>>,
}

impl Recording {
    fn new(replies: Vec<Result<String, TranslateError>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
        }
    }

    fn calls(&self) -> Vec<(String, Hop)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for Recording {
    async fn translate(&self, text: &str, hop: Hop) -> Result<String, TranslateError> {
        self.calls.lock().unwrap().push((text.to_string(), hop));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

const HE_EN: Hop = Hop::new(Language::Hebrew, Language::English);
const EN_RU: Hop = Hop::new(Language::English, Language::Russian);

#[test]
fn test_plans() {
    assert_eq!(plan(ScriptTag::Default), &[EN_RU]);
    assert_eq!(plan(ScriptTag::PivotScript), &[HE_EN, EN_RU]);
}

#[tokio::test]
async fn test_direct_request_is_one_call() {
    let fake = Recording::new(vec![Ok("Привет".to_string())]);
    let request = TranslationRequest::new("Hello", Provider::Local);

    let out = run(&fake, &request).await.unwrap();

    assert_eq!(out, "Привет");
    assert_eq!(fake.calls(), vec![("Hello".to_string(), EN_RU)]);
}

#[tokio::test]
async fn test_pivot_feeds_first_output_into_second_hop() {
    let fake = Recording::new(vec![Ok("  Peace  ".to_string()), Ok("Мир".to_string())]);
    let request = TranslationRequest::new("שלום", Provider::Local);

    let out = run(&fake, &request).await.unwrap();

    assert_eq!(out, "Мир");
    assert_eq!(
        fake.calls(),
        vec![("שלום".to_string(), HE_EN), ("Peace".to_string(), EN_RU)]
    );
}

#[tokio::test]
async fn test_mixed_text_pivots() {
    let fake = Recording::new(vec![Ok("a".to_string()), Ok("b".to_string())]);
    let request = TranslationRequest::new("Hello שלום", Provider::Gemini);

    run(&fake, &request).await.unwrap();

    assert_eq!(fake.calls().len(), 2);
}

#[tokio::test]
async fn test_first_hop_failure_stops_pivot() {
    let fake = Recording::new(vec![Err(TranslateError::ProcessFailed {
        code: 2,
        stderr: "model missing".to_string(),
    })]);
    let request = TranslationRequest::new("שלום", Provider::Local);

    let err = run(&fake, &request).await.unwrap_err();

    assert!(matches!(err, TranslateError::ProcessFailed { code: 2, .. }));
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn test_empty_first_hop_is_empty_response() {
    let fake = Recording::new(vec![Ok("   ".to_string()), Ok("never".to_string())]);
    let request = TranslationRequest::new("שלום", Provider::Local);

    let err = run(&fake, &request).await.unwrap_err();

    assert!(matches!(err, TranslateError::EmptyResponse));
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn test_quota_error_passes_through() {
    let fake = Recording::new(vec![Err(TranslateError::QuotaExceeded("out".to_string()))]);
    let request = TranslationRequest::new("Hello", Provider::OpenAi);

    let err = run(&fake, &request).await.unwrap_err();

    assert!(err.is_quota());
}

fn backend_config(provider: Provider, api_key: &str) -> BackendConfig {
    BackendConfig {
        provider,
        command_template: "echo {text}".to_string(),
        api_key: api_key.to_string(),
        model_id: "m".to_string(),
        max_chars: 2000,
        models_dir: String::new(),
    }
}

#[test]
fn test_backend_selection() {
    let http = reqwest::Client::new();
    for provider in [Provider::Local, Provider::OpenAi, Provider::Gemini] {
        let backend = Backend::from_config(&backend_config(provider, "key"), &http).unwrap();
        assert_eq!(backend.provider(), provider);
    }
}

#[test]
fn test_cloud_backend_needs_key() {
    let http = reqwest::Client::new();
    for provider in [Provider::OpenAi, Provider::Gemini] {
        let err = Backend::from_config(&backend_config(provider, ""), &http)
            .err()
            .unwrap();
        assert!(matches!(err, TranslateError::MissingApiKey(p) if p == provider));
    }
    assert!(Backend::from_config(&backend_config(Provider::Local, ""), &http).is_ok());
}

#[test]
fn test_backend_config_debug_hides_key() {
    let debug = format!("{:?}", backend_config(Provider::OpenAi, "sk-secret"));
    assert!(!debug.contains("sk-secret"));
    assert!(debug.contains("<redacted>"));
}
