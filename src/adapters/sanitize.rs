//! Log sanitization for untrusted text.
//!
//! Labels, database paths, and disease names come from files this crate does
//! not control and are echoed into log lines. This module neutralizes terminal
//! escape sequences and other control characters so a crafted label cannot
//! rewrite the operator's terminal or forge extra log lines.
//!
//! Input is capped at `FLORAGUARD_SANITIZE_MAX_BYTES` (default 16 KiB) per
//! call.

use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// CSI and OSC escape sequences.
static ESCAPE_PATTERN: OnceLock<Regex> = OnceLock::new();

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("FLORAGUARD_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn escape_pattern() -> Option<&'static Regex> {
    if let Some(re) = ESCAPE_PATTERN.get() {
        return Some(re);
    }
    let re = Regex::new(r"\x1b(?:\[[0-9;?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)?)").ok()?;
    Some(ESCAPE_PATTERN.get_or_init(|| re))
}

/// Sanitize one line of text.
///
/// Escape sequences are removed, other control characters except the
/// trailing newline and tabs are rendered as `\u{..}`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    // Fast path
    if !contains_control(prefix) {
        let mut out = prefix.to_string();
        if truncated {
            out.push_str(" [TRUNCATED]");
        }
        return out;
    }

    let stripped = match escape_pattern() {
        Some(re) => re.replace_all(prefix, "").into_owned(),
        None => prefix.to_string(),
    };

    let body_len = stripped.strip_suffix('\n').map_or(stripped.len(), str::len);
    let mut result = String::with_capacity(stripped.len());
    for (i, c) in stripped.char_indices() {
        if i >= body_len {
            result.push(c);
        } else if c.is_control() && c != '\t' {
            result.push_str(&c.escape_unicode().to_string());
        } else {
            result.push(c);
        }
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Whether the text holds control characters other than tab and newline.
#[must_use]
pub fn contains_control(input: &str) -> bool {
    input.chars().any(|c| c.is_control() && c != '\t' && c != '\n')
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// line by line before it reaches the underlying sink.
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M> Clone for SanitizingMakeWriter<M>
where
    M: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single huge line without newlines is flushed in one piece.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if hard_cap > 0 && self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_plain_text_untouched() {
        let input = "Loaded 38 disease entries from assets/DISEASE_DATABASE.json\n";
        assert_eq!(sanitize(input), input);
        assert!(!contains_control(input));
    }

    #[test]
    fn test_strips_ansi_sequences() {
        let input = "label=\x1b[2J\x1b[31mTomato___Late_blight\x1b[0m";
        let sanitized = sanitize(input);
        assert_eq!(sanitized, "label=Tomato___Late_blight");
    }

    #[test]
    fn test_strips_osc_title_sequence() {
        let sanitized = sanitize("before\x1b]0;owned\x07after");
        assert_eq!(sanitized, "beforeafter");
    }

    #[test]
    fn test_escapes_embedded_newlines_and_controls() {
        let sanitized = sanitize("Apple\r fake INFO line\u{0008}\n");
        assert_eq!(sanitized, "Apple\\u{d} fake INFO line\\u{8}\n");
        assert!(contains_control("a\rb"));
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("Corn___Common_rust_extra_long", 10);
        assert_eq!(sanitized, "Corn___Com [TRUNCATED]");

        // Multi-byte boundary must not panic.
        let sanitized = sanitize_with_limit("ééééé", 3);
        assert!(sanitized.starts_with('é'));
    }

    #[test]
    fn test_writer_sanitizes_per_line() {
        let mut out = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut out);
            writer.write_all(b"one \x1b[1mbold").expect("Should write");
            writer.write_all(b"\x1b[0m\ntwo\x07\n").expect("Should write");
            writer.flush().expect("Should flush");
        }
        assert_eq!(String::from_utf8_lossy(&out), "one bold\ntwo\\u{7}\n");
    }
}
