//! Text helpers shared by the config loader and the HTTP client.

/// Longest server text quoted back inside an error message
pub const ERROR_SNIPPET_CHARS: usize = 180;

/// Trimmed value, or `None` when absent or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Whether `value` names an `http://` or `https://` endpoint with a host part.
pub fn has_http_scheme(value: &str) -> bool {
    let lowered = value.trim().to_ascii_lowercase();
    ["http://", "https://"].iter().any(|scheme| {
        lowered
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty())
    })
}

/// Single-line, length-capped excerpt of a response body for error messages.
pub fn error_snippet(body: &str) -> String {
    body.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(ERROR_SNIPPET_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn non_blank_trims_and_drops_empty_values() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" \t\n".to_string())), None);
        assert_eq!(non_blank(Some(" notes ".to_string())), Some("notes".to_string()));
    }

    #[test]
    fn has_http_scheme_requires_scheme_and_host() {
        assert!(has_http_scheme("http://localhost:3377"));
        assert!(has_http_scheme("HTTPS://notes.example.com"));
        assert!(!has_http_scheme("https://"));
        assert!(!has_http_scheme("ftp://notes.example.com"));
        assert!(!has_http_scheme("localhost:3377"));
    }

    #[test]
    fn error_snippet_flattens_and_caps_body() {
        assert_eq!(error_snippet("  bad\n  gateway \n"), "bad gateway");
        let long = "x".repeat(ERROR_SNIPPET_CHARS * 2);
        assert_eq!(error_snippet(&long).chars().count(), ERROR_SNIPPET_CHARS);
    }
}
