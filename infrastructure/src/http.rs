//! Shared HTTP helpers for the REST adapters

use reqwest::Client;
use std::time::Duration;

/// Longest error body surfaced to the user
const MAX_ERROR_BODY_LEN: usize = 300;

/// Build a client with a request timeout and user agent
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout.max(Duration::from_secs(1)))
        .user_agent(user_agent)
        .build()
}

/// Truncate an error response body and redact it if it may carry credentials
pub fn sanitize_error_body(body: &str) -> String {
    // Patterns that might indicate secrets in error responses
    const SECRET_PATTERNS: &[&str] = &[
        "token",
        "secret",
        "password",
        "credential",
        "bearer",
        "api_key",
        "sk-",
        "ghp_",
        "gho_",
        "ghs_",
        "github_pat_",
    ];

    let trimmed = body.trim();
    let truncated = match trimmed.char_indices().nth(MAX_ERROR_BODY_LEN) {
        Some((idx, _)) => format!("{}... (truncated)", &trimmed[..idx]),
        None => trimmed.to_string(),
    };

    let lower = truncated.to_lowercase();
    if SECRET_PATTERNS.iter().any(|p| lower.contains(p)) {
        return "(error details redacted - may contain sensitive data)".to_string();
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_body_is_kept() {
        assert_eq!(
            sanitize_error_body("  {\"message\":\"Not Found\"}\n"),
            "{\"message\":\"Not Found\"}"
        );
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(1000);
        let sanitized = sanitize_error_body(&body);
        assert!(sanitized.ends_with("... (truncated)"));
        assert_eq!(sanitized.len(), MAX_ERROR_BODY_LEN + "... (truncated)".len());
    }

    #[test]
    fn test_secret_body_is_redacted() {
        let sanitized = sanitize_error_body("invalid token ghp_abcdef");
        assert!(sanitized.contains("redacted"));
        assert!(!sanitized.contains("ghp_"));
    }
}
