//! JSON token list parser
//!
//! Accepts `[{"time": 1, "text": "I"}, {"time": 2, "text": "want"}]`, with
//! `startTime` / `start_time` accepted in place of `time`.

use super::types::{LyricToken, process_tokens};

/// Parse a JSON token list
pub fn parse_json(src: &str) -> Result<Vec<LyricToken>, serde_json::Error> {
    let mut tokens: Vec<LyricToken> = serde_json::from_str(src)?;
    process_tokens(&mut tokens);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let src = r#"[
            {"time": 2, "text": "want"},
            {"time": 1, "text": "I"},
            {"time": 3.5, "text": "you to know"}
        ]"#;
        let tokens = parse_json(src).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], LyricToken::new(1.0, "I"));
        assert_eq!(tokens[2].start_time, 3.5);
    }

    #[test]
    fn test_field_aliases() {
        let src = r#"[{"startTime": 0.5, "text": "a"}, {"start_time": 1, "text": "b"}]"#;
        let tokens = parse_json(src).unwrap();
        assert_eq!(tokens[0].start_time, 0.5);
        assert_eq!(tokens[1].text, "b");
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_json("[{\"time\": \"soon\"}]").is_err());
        assert!(parse_json("not json").is_err());
    }
}
