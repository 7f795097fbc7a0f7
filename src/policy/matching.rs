//! Model and host predicates.

use url::Url;

/// Model family the directive targets when `onlyClaude` is set.
pub(crate) const TARGET_MODEL_FAMILY: &str = "claude";

/// Case-insensitive substring test.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether `model` belongs to the targeted model family.
pub fn is_target_model(model: &str) -> bool {
    contains_ignore_case(model, TARGET_MODEL_FAMILY)
}

/// Whether `api_url` points at the configured host.
///
/// A parseable URL matches when either its hostname or the full URL contains
/// `substring`; an unparseable one falls back to a plain substring search.
/// Comparison is case-insensitive. An empty URL never matches.
pub fn is_target_host(api_url: &str, substring: &str) -> bool {
    if api_url.is_empty() {
        return false;
    }
    match Url::parse(api_url) {
        Ok(url) => {
            url.host_str()
                .is_some_and(|host| contains_ignore_case(host, substring))
                || contains_ignore_case(api_url, substring)
        }
        Err(_) => contains_ignore_case(api_url, substring),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_match_ignores_case() {
        assert!(is_target_model("claude-3-5-sonnet"));
        assert!(is_target_model("anthropic/Claude-Opus-4"));
        assert!(is_target_model("CLAUDE"));
        assert!(!is_target_model("gpt-4"));
        assert!(!is_target_model(""));
    }

    #[test]
    fn host_match_on_hostname() {
        assert!(is_target_host("https://api.nanogpt.com/v1", "nanogpt"));
        assert!(is_target_host("https://API.NanoGPT.com/v1", "nanogpt"));
        assert!(!is_target_host("https://api.openai.com/v1", "nanogpt"));
    }

    #[test]
    fn host_match_on_full_url() {
        // substring only present in the path still matches
        assert!(is_target_host("https://proxy.example.com/nanogpt/v1", "NanoGPT"));
    }

    #[test]
    fn unparseable_url_falls_back_to_substring() {
        assert!(is_target_host("nano-gpt.com/api/v1", "nano-gpt"));
        assert!(!is_target_host("localhost:5000/v1", "nanogpt"));
    }

    #[test]
    fn empty_url_never_matches() {
        assert!(!is_target_host("", "nanogpt"));
        assert!(!is_target_host("", ""));
    }

    #[test]
    fn empty_substring_matches_any_url() {
        assert!(is_target_host("https://api.openai.com/v1", ""));
    }
}
