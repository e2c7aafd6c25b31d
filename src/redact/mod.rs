// ============================================
// PLANGUARD - Redaction Engine
// Scrubs secrets from plan text before it leaves the machine
// ============================================

mod file;

pub use file::{meta_path, redact_file, RedactError};

use regex::Regex;
use std::fmt;

/// Replaces a whole `-----BEGIN ... PRIVATE KEY-----` block
pub const PRIVATE_KEY_PLACEHOLDER: &str = "[REDACTED: PRIVATE KEY BLOCK]";
/// Replaces a whole line that assigns an `API_KEY`
pub const API_KEY_LINE_PLACEHOLDER: &str = "[REDACTED: API KEY LINE]";
/// Replaces the credential after `Bearer` / `Token:`
pub const CREDENTIAL_PLACEHOLDER: &str = "[REDACTED]";

lazy_static::lazy_static! {
    static ref PRIVATE_KEY_BLOCK: Regex = Regex::new(
        r"(?s)-----BEGIN [A-Z ]+ PRIVATE KEY-----.*?-----END [A-Z ]+ PRIVATE KEY-----"
    ).unwrap();

    static ref API_KEY_LINE: Regex = Regex::new(r"(?m)^.*API_KEY.*=.*$").unwrap();

    // The credential must sit on the same line as its keyword
    static ref BEARER_TOKEN: Regex = Regex::new(r"(Bearer|Token:)[^\S\r\n]+[A-Za-z0-9_-]+").unwrap();
}

/// A single scrubbing rule: every match of `pattern` is rewritten with
/// `replacement` (which may reference capture groups, e.g. `${1}`).
#[derive(Debug, Clone)]
pub struct RedactionRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: String,
}

impl RedactionRule {
    pub fn new(name: &'static str, pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            name,
            pattern,
            replacement: replacement.into(),
        }
    }

    /// Apply the rule, returning the rewritten text and how many matches it saw.
    pub fn apply(&self, input: &str) -> (String, usize) {
        let count = self.pattern.find_iter(input).count();
        if count == 0 {
            return (input.to_string(), 0);
        }

        let output = self
            .pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned();
        (output, count)
    }
}

/// Total number of redactions made in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedactionReport {
    pub redaction_count: usize,
}

impl RedactionReport {
    /// Contents of the `.meta` sidecar file
    pub fn to_meta(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for RedactionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "redaction_count={}", self.redaction_count)
    }
}

/// Output of [`Redactor::redact`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub text: String,
    pub report: RedactionReport,
}

/// Ordered redaction pipeline.
///
/// Rules run in sequence and each one sees the output of the previous rule,
/// so placeholders written by an earlier rule are part of a later rule's
/// input. None of the placeholders can match any of the rules, which keeps
/// the pipeline idempotent.
#[derive(Debug, Clone)]
pub struct Redactor {
    rules: Vec<RedactionRule>,
}

impl Redactor {
    pub fn new() -> Self {
        let rules = vec![
            RedactionRule::new(
                "private_key_block",
                PRIVATE_KEY_BLOCK.clone(),
                PRIVATE_KEY_PLACEHOLDER,
            ),
            RedactionRule::new(
                "api_key_line",
                API_KEY_LINE.clone(),
                API_KEY_LINE_PLACEHOLDER,
            ),
            RedactionRule::new(
                "bearer_token",
                BEARER_TOKEN.clone(),
                format!("${{1}} {}", CREDENTIAL_PLACEHOLDER),
            ),
        ];

        Self { rules }
    }

    /// Redact `document`, returning the scrubbed copy and the total match count.
    pub fn redact(&self, document: &str) -> Redaction {
        let mut text = document.to_string();
        let mut report = RedactionReport::default();

        for rule in &self.rules {
            let (next, count) = rule.apply(&text);
            if count > 0 {
                tracing::debug!(rule = rule.name, count, "Applied redaction rule");
            }
            report.redaction_count += count;
            text = next;
        }

        Redaction { text, report }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}
