use crate::domain::error::TranslateError;
use crate::domain::model::{BackendConfig, Hop};
use crate::domain::traits::Translator;
use crate::infrastructure::process::command::{build_argv, render_template, Placeholders};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Resolves bare executable names through the search path, which may
/// differ from a login shell's when launched from a desktop session.
#[cfg(unix)]
pub const RESOLVER: &str = "/usr/bin/env";

const GENERIC_FAILURE: &str = "Local translation failed";

#[cfg(unix)]
fn resolver_command(program: &str) -> Command {
    let mut cmd = Command::new(RESOLVER);
    cmd.arg(program);
    cmd
}

#[cfg(not(unix))]
fn resolver_command(program: &str) -> Command {
    Command::new(program)
}

/// Run `argv` with `input` on stdin and return its trimmed stdout.
///
/// Blocks (asynchronously) until the process exits. There is no timeout:
/// a hung translator hangs the request.
pub async fn run_command(argv: &[String], input: &str) -> Result<String, TranslateError> {
    let (program, args) = argv.split_first().ok_or(TranslateError::EmptyCommand)?;

    let mut child = resolver_command(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(TranslateError::Spawn)?;

    debug!(program = %program, args = args.len(), input_len = input.len(), "Spawned local translator");

    // Feed stdin from its own task so a chatty child can't deadlock us
    // while its stdout pipe is full.
    let stdin = child.stdin.take();
    let data = input.as_bytes().to_vec();
    let writer = tokio::spawn(async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&data).await?;
            stdin.shutdown().await?;
        }
        Ok::<(), std::io::Error>(())
    });

    let output = child
        .wait_with_output()
        .await
        .map_err(TranslateError::Spawn)?;

    match writer.await {
        Ok(Err(e)) => debug!(error = %e, "Translator closed stdin early"),
        Err(e) => debug!(error = %e, "Stdin writer task failed"),
        Ok(Ok(())) => {}
    }

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            stderr
        };
        info!(code, "Local translator exited with failure");
        return Err(TranslateError::ProcessFailed { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Backend running an external command per hop.
#[derive(Debug, Clone)]
pub struct LocalTranslator {
    template: String,
    models_dir: String,
    max_chars: u32,
}

impl LocalTranslator {
    pub fn new(template: impl Into<String>, models_dir: impl Into<String>, max_chars: u32) -> Self {
        Self {
            template: template.into(),
            models_dir: models_dir.into(),
            max_chars,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(
            config.command_template.clone(),
            config.models_dir.clone(),
            config.max_chars,
        )
    }

    /// The command line a hop would run, before `{text}` expansion.
    pub fn command_for(&self, hop: Hop) -> String {
        render_template(
            &self.template,
            &Placeholders::for_hop(hop, &self.models_dir, self.max_chars),
        )
    }
}

#[async_trait]
impl Translator for LocalTranslator {
    async fn translate(&self, text: &str, hop: Hop) -> Result<String, TranslateError> {
        let command = self.command_for(hop);
        let argv = build_argv(&command, text)?;
        run_command(&argv, text).await
    }
}
