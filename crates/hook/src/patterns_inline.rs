#![forbid(unsafe_code)]

//! Self-contained copy of the pattern catalog and fast sanitizer
//! (`cg_patterns::catalog` / `cg_patterns::sanitize`), duplicated verbatim
//! rather than taken as a path dependency. The hook is the one ingress
//! point where no unsanitized byte may ever reach durable storage; keeping
//! its own compiled-in copy means a change to the library sanitizer cannot
//! silently desync the hook's behavior without a matching, reviewed change
//! here too.

use regex::Regex;
use std::sync::LazyLock;

pub(crate) const CATALOG_VERSION: u32 = 1;

struct PatternSpec {
    name: &'static str,
    replacement: &'static str,
    regex_src: &'static str,
}

struct CompiledPattern {
    name: &'static str,
    replacement: &'static str,
    regex: Regex,
}

static CATALOG: LazyLock<Vec<CompiledPattern>> = LazyLock::new(|| {
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

pub(crate) struct SanitizeOutput {
    pub(crate) sanitized: String,
    pub(crate) redaction_count: usize,
}

pub(crate) fn sanitize(text: &str) -> SanitizeOutput {
    let mut current = text.to_string();
    let mut redaction_count = 0usize;

    for pattern in CATALOG.iter() {
        if !pattern.regex.is_match(&current) {
            continue;
        }
        let mut replaced = String::with_capacity(current.len());
        let mut last_end = 0;
        for m in pattern.regex.find_iter(&current) {
            replaced.push_str(&current[last_end..m.start()]);
            replaced.push_str(pattern.replacement);
            redaction_count += 1;
            last_end = m.end();
        }
        replaced.push_str(&current[last_end..]);
        current = replaced;
    }

    SanitizeOutput {
        sanitized: current,
        redaction_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_email_and_ssn() {
        let out = sanitize("contact me at leaked@example.com, SSN 123-45-6789");
        assert!(out.sanitized.contains("[REDACTED_EMAIL]"));
        assert!(out.sanitized.contains("[REDACTED_SSN]"));
        assert_eq!(out.redaction_count, 2);
    }

    #[test]
    fn catalog_version_is_pinned() {
        assert_eq!(CATALOG_VERSION, 1);
    }
}
