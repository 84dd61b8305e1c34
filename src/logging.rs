//! Logging setup with secret redaction
//!
//! Every formatted log line passes through [`RedactionPatterns`] before it
//! reaches stderr, so bot tokens embedded in Telegram request URLs and image
//! host credentials never show up in logs.

use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting sensitive data
pub struct RedactionPatterns {
    bot_url: Regex,
    bare_token: Regex,
    bot_prefix: Regex,
    bearer: Regex,
    token_field: Regex,
}

impl RedactionPatterns {
    /// Compile all patterns
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            bot_url: Regex::new(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)(/['\s]*)")?,
            bare_token: Regex::new(r"([0-9]{8,10}:[A-Za-z0-9_-]{35})")?,
            bot_prefix: Regex::new(r"(bot[0-9]{8,10}:)[A-Za-z0-9_-]+")?,
            bearer: Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._~+/=-]+")?,
            token_field: Regex::new(r"(?i)((?:token|api_key)=)[^\s&]+")?,
        })
    }

    /// Replace every known secret shape in `input`
    #[must_use]
    pub fn redact(&self, input: &str) -> String {
        let output = self.bot_url.replace_all(input, "$1[TELEGRAM_TOKEN]$3");
        let output = self.bare_token.replace_all(&output, "[TELEGRAM_TOKEN]");
        let output = self.bot_prefix.replace_all(&output, "$1[TELEGRAM_TOKEN]");
        let output = self.bearer.replace_all(&output, "$1[MASKED]");
        let output = self.token_field.replace_all(&output, "$1[MASKED]");
        output.into_owned()
    }
}

/// Masks secrets in every formatted event before it hits the sink
pub struct RedactingWriter<W: Write> {
    sink: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    /// Forward masked output to `sink`
    pub const fn new(sink: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { sink, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let masked = self.patterns.redact(&String::from_utf8_lossy(buf));
        self.sink.write_all(masked.as_bytes())?;
        // The caller's whole buffer is consumed even though fewer or more bytes went out.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// Hands `tracing_subscriber` a fresh [`RedactingWriter`] per event
pub struct RedactingMakeWriter<F> {
    open_sink: F,
    patterns: Arc<RedactionPatterns>,
}

impl<F> RedactingMakeWriter<F> {
    /// `open_sink` is called once per event, e.g. `io::stderr`
    pub const fn new(open_sink: F, patterns: Arc<RedactionPatterns>) -> Self {
        Self {
            open_sink,
            patterns,
        }
    }
}

impl<'a, F, W> MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.open_sink)(), Arc::clone(&self.patterns))
    }
}

/// Install the global subscriber
///
/// Level comes from `RUST_LOG`, falling back to `info`; output goes to stderr
/// through [`RedactingMakeWriter`].
pub fn init_logging(patterns: Arc<RedactionPatterns>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = RedactingMakeWriter::new(io::stderr, patterns);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> RedactionPatterns {
        RedactionPatterns::new().unwrap()
    }

    #[test]
    fn test_redacts_bot_url() {
        let line = "error sending request for url (https://api.telegram.org/bot123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw/getFile)";
        let redacted = patterns().redact(line);
        assert!(!redacted.contains("AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw"));
        assert!(redacted.contains("/bot[TELEGRAM_TOKEN]/getFile"));
    }

    #[test]
    fn test_redacts_bare_token() {
        let redacted = patterns().redact("token 123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsawX leaked");
        assert_eq!(redacted, "token [TELEGRAM_TOKEN] leaked");
    }

    #[test]
    fn test_redacts_upload_credentials() {
        let p = patterns();
        assert_eq!(
            p.redact("authorization: Bearer abc.def-123"),
            "authorization: Bearer [MASKED]"
        );
        assert_eq!(
            p.redact("POST /api/index.php?token=s3cr3t&x=1"),
            "POST /api/index.php?token=[MASKED]&x=1"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        let line = "Image uploaded url=https://img.example/i/2024/cat.png";
        assert_eq!(patterns().redact(line), line);
    }

    #[test]
    fn test_writer_reports_original_length() {
        let mut sink = Vec::new();
        {
            let mut writer = RedactingWriter::new(&mut sink, Arc::new(patterns()));
            let input = b"Bearer abcdefghijklmnopqrstuvwxyz";
            assert_eq!(writer.write(input).unwrap(), input.len());
        }
        assert_eq!(String::from_utf8(sink).unwrap(), "Bearer [MASKED]");
    }
}
