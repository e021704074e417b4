//! 本地翻译进程测试
#![cfg(unix)]

use hotkey_translator::domain::error::TranslateError;
use hotkey_translator::domain::model::{Hop, Language};
use hotkey_translator::domain::traits::Translator;
use hotkey_translator::infrastructure::process::{run_command, LocalTranslator};

const EN_RU: Hop = Hop::new(Language::English, Language::Russian);

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

#[tokio::test]
async fn test_stdout_is_trimmed() {
    let out = run_command(&argv(&["echo", "  hi  "]), "").await.unwrap();
    assert_eq!(out, "hi");
}

#[tokio::test]
async fn test_input_goes_to_stdin() {
    let out = run_command(&argv(&["cat"]), "hello from stdin\n").await.unwrap();
    assert_eq!(out, "hello from stdin");
}

#[tokio::test]
async fn test_nonzero_exit_reports_stderr() {
    let err = run_command(&argv(&["sh", "-c", "echo bad >&2; exit 1"]), "")
        .await
        .unwrap_err();
    match err {
        TranslateError::ProcessFailed { code, stderr } => {
            assert_eq!(code, 1);
            assert_eq!(stderr, "bad");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_silent_failure_gets_generic_message() {
    let err = run_command(&argv(&["sh", "-c", "exit 3"]), "").await.unwrap_err();
    match err {
        TranslateError::ProcessFailed { code, stderr } => {
            assert_eq!(code, 3);
            assert_eq!(stderr, "Local translation failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_child_ignoring_stdin_still_completes() {
    let big = "x".repeat(1 << 20);
    let out = run_command(&argv(&["echo", "done"]), &big).await;
    assert_eq!(out.unwrap(), "done");
}

#[tokio::test]
async fn test_local_translator_expands_text_and_hop() {
    let local = LocalTranslator::new("echo {src}-{dst}: {text}", "", 2000);
    let out = local.translate("shalom", EN_RU).await.unwrap();
    assert_eq!(out, "en-ru: shalom");
}

#[tokio::test]
async fn test_local_translator_empty_template() {
    let local = LocalTranslator::new("   ", "", 2000);
    let err = local.translate("text", EN_RU).await.unwrap_err();
    assert!(matches!(err, TranslateError::EmptyCommand));
}
