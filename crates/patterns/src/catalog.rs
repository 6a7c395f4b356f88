//! The canonical PII pattern table (spec.md §4.1).
//!
//! Iteration order is part of the public contract: overlapping matches are
//! resolved by the earlier category winning, because `sanitize` applies
//! patterns in this order and replaces as it goes, so a later pattern never
//! sees the text a prior one already replaced.

use regex::Regex;
use std::sync::LazyLock;

/// Bumped whenever a pattern's regex or replacement token changes in a way
/// that would alter stored `SanitizationLog` output for the same input.
pub const CATALOG_VERSION: u32 = 1;

pub struct PatternSpec {
    pub name: &'static str,
    pub replacement: &'static str,
    regex_src: &'static str,
}

pub static CATALOG: LazyLock<Vec<CompiledPattern>> = LazyLock::new(|| {
    RAW_CATALOG
        .iter()
        .map(|spec| CompiledPattern {
            name: spec.name,
            replacement: spec.replacement,
            regex: Regex::new(spec.regex_src)
                .unwrap_or_else(|e| panic!("invalid regex for {}: {e}", spec.name)),
        })
        .collect()
});

pub struct CompiledPattern {
    pub name: &'static str,
    pub replacement: &'static str,
    pub regex: Regex,
}

/// The twelve categories and replacement tokens from spec.md §4.1, in
/// contract order.
const RAW_CATALOG: &[PatternSpec] = &[
    PatternSpec {
        name: "EMAIL",
        replacement: "[REDACTED_EMAIL]",
        regex_src: r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
    },
    PatternSpec {
        name: "PHONE",
        replacement: "[REDACTED_PHONE]",
        regex_src: r"\+?\d{1,3}[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
    },
    PatternSpec {
        name: "IP",
        replacement: "[REDACTED_IP]",
        regex_src: r"\b(?:(?:25[0-5]|2[0-4]\d|[01]?\d?\d)\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d?\d)\b",
    },
    PatternSpec {
        name: "PATH",
        replacement: "[REDACTED_PATH]",
        regex_src: r"(?:/(?:Users|home)/[A-Za-z0-9_.\-]+(?:/[A-Za-z0-9_.\-]+)*)",
    },
    PatternSpec {
        name: "API_KEY_OPENAI",
        replacement: "[REDACTED_API_KEY_OPENAI]",
        regex_src: r"\bsk-[A-Za-z0-9]{48}\b",
    },
    PatternSpec {
        name: "API_KEY_ANTHROPIC",
        replacement: "[REDACTED_API_KEY_ANTHROPIC]",
        regex_src: r"\bsk-ant-[A-Za-z0-9_-]{95}\b",
    },
    PatternSpec {
        name: "AWS_ACCESS_KEY",
        replacement: "[REDACTED_AWS_ACCESS_KEY]",
        regex_src: r"\bAKIA[0-9A-Z]{16}\b",
    },
    PatternSpec {
        name: "GITHUB_TOKEN",
        replacement: "[REDACTED_GITHUB_TOKEN]",
        regex_src: r"\bghp_[A-Za-z0-9]{36}\b",
    },
    PatternSpec {
        name: "JWT",
        replacement: "[REDACTED_JWT]",
        regex_src: r"\beyJ[A-Za-z0-9_-]+\.eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+",
    },
    PatternSpec {
        name: "SSH_KEY",
        replacement: "[REDACTED_SSH_KEY]",
        regex_src: r"(?s)-----BEGIN [A-Z ]*PRIVATE KEY-----.*?-----END [A-Z ]*PRIVATE KEY-----",
    },
    PatternSpec {
        name: "CREDIT_CARD",
        replacement: "[REDACTED_CREDIT_CARD]",
        regex_src: r"\b\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b",
    },
    PatternSpec {
        name: "SSN",
        replacement: "[REDACTED_SSN]",
        regex_src: r"\b\d{3}-\d{2}-\d{4}\b",
    },
];
