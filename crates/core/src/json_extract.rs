//! LLMs wrap JSON in prose; every parse site in this pipeline locates the
//! outermost `{...}` before handing the slice to `serde_json`.

/// Returns the substring spanning the first `{` through the matching last
/// `}` in `text`, or `None` if no brace pair is present.
pub fn extract_outermost_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Convenience wrapper: extract and parse in one step.
pub fn parse_outermost_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let slice = extract_outermost_json(text).ok_or_else(|| {
        serde::de::Error::custom("no outermost JSON object found in text")
    })?;
    serde_json::from_str(slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn extracts_json_wrapped_in_prose() {
        let text = "Sure, here you go:\n{\"a\": 1}\nHope that helps!";
        assert_eq!(extract_outermost_json(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn returns_none_without_braces() {
        assert_eq!(extract_outermost_json("no json here"), None);
    }

    #[test]
    fn parses_nested_objects() {
        let text = "{\"a\": {\"b\": 1}}";
        let v: Value = parse_outermost_json(text).unwrap();
        assert_eq!(v["a"]["b"], 1);
    }

    #[test]
    fn errors_without_braces() {
        let result: Result<Value, _> = parse_outermost_json("no json here");
        assert!(result.is_err());
    }
}
