use crate::domain::error::ArgosError;
use crate::domain::model::{LanguagePair, TranslationSettings};
use crate::domain::traits::Translator;
use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

const DEVICE_TYPE_ENV: &str = "ARGOS_DEVICE_TYPE";

/// Runs the `argos-translate` executable once per text.
///
/// The process gets `--from <lang> --to <lang> <text>` and
/// `ARGOS_DEVICE_TYPE=auto`; the first line it prints is the translation.
/// A process that prints nothing yields `None`, a blank line `Some("")`.
/// Each call is bounded by `timeout`, after which the child is killed.
pub struct ArgosTranslator {
    path: String,
    timeout: Duration,
}

impl ArgosTranslator {
    pub fn new(path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &TranslationSettings, timeout: Duration) -> Self {
        Self::new(settings.argos_path.clone(), timeout)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    async fn run(&self, text: &str, languages: &LanguagePair) -> Result<Option<String>, ArgosError> {
        let mut child = Command::new(&self.path)
            .arg("--from")
            .arg(&languages.from)
            .arg("--to")
            .arg(&languages.to)
            .arg(text)
            .env(DEVICE_TYPE_ENV, "auto")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ArgosError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ArgosError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "translator stdout is not captured",
            ))
        })?;
        // Only the first line counts; the reader is dropped before waiting
        let mut buf = Vec::new();
        let read = BufReader::new(stdout).read_until(b'\n', &mut buf).await?;
        let line = (read > 0).then(|| first_line(&buf));

        let status = child.wait().await?;
        if !status.success() {
            tracing::debug!(path = %self.path, %status, "translator exited with failure status");
        }

        Ok(line)
    }
}

/// Decode one output line; invalid UTF-8 becomes U+FFFD instead of an error.
fn first_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

#[async_trait]
impl Translator for ArgosTranslator {
    fn name(&self) -> &str {
        "argos-translate"
    }

    async fn translate(
        &self,
        text: &str,
        languages: &LanguagePair,
    ) -> Result<Option<String>, ArgosError> {
        match tokio::time::timeout(self.timeout, self.run(text, languages)).await {
            Ok(result) => result,
            Err(_) => Err(ArgosError::Timeout(self.timeout)),
        }
    }
}
