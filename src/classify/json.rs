//! JSON extraction from model responses.
//!
//! Classification responses often arrive wrapped in markdown fences or
//! conversational text. This module digs the JSON object out.

/// Extract a JSON object from a model response.
///
/// Tries a ` ```json ` fenced block first, then a bare fence whose content
/// starts with `{`, then a balanced-brace scan over the raw text. Returns the
/// trimmed input unchanged when nothing better is found.
pub fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json")
        && let Some(end) = trimmed[start + 7..].find("```")
    {
        return trimmed[start + 7..start + 7 + end].trim().to_string();
    }

    if let Some(start) = trimmed.find("```")
        && let Some(end) = trimmed[start + 3..].find("```")
    {
        let inner = trimmed[start + 3..start + 3 + end].trim();
        if inner.starts_with('{') {
            return inner.to_string();
        }
    }

    if let Some(object) = first_json_object(trimmed) {
        return object;
    }

    trimmed.to_string()
}

/// Scan for the first substring that parses as a JSON object.
///
/// For each `{` in the input, walks forward tracking brace depth while
/// respecting string literals and escapes, then validates the candidate with
/// serde_json before accepting it.
fn first_json_object(text: &str) -> Option<String> {
    for (start, _) in text.match_indices('{') {
        let rest = &text[start..];

        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (idx, ch) in rest.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &rest[..=idx];
                        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                            return Some(candidate.to_string());
                        }
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_json() {
        let input = r#"{"src/a.rs": "feat"}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn test_extract_from_json_fence() {
        let input = "Here you go:\n```json\n{\"src/a.rs\": \"fix\"}\n```\nHope that helps!";
        assert_eq!(extract_json(input), r#"{"src/a.rs": "fix"}"#);
    }

    #[test]
    fn test_extract_from_bare_fence() {
        let input = "```\n{\"src/a.rs\": \"docs\"}\n```";
        assert_eq!(extract_json(input), r#"{"src/a.rs": "docs"}"#);
    }

    #[test]
    fn test_extract_from_surrounding_prose() {
        let input = "The classification is {\"src/a.rs\": \"test\"} as requested.";
        assert_eq!(extract_json(input), r#"{"src/a.rs": "test"}"#);
    }

    #[test]
    fn test_extract_handles_braces_in_strings() {
        let input = r#"{"note": "use { and } carefully", "src/a.rs": "chore"}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn test_extract_falls_through_on_garbage() {
        assert_eq!(extract_json("  no json here  "), "no json here");
    }
}
