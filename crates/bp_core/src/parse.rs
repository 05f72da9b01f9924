use serde::de::DeserializeOwned;
use crate::{Error, Result, Source};

/// Removes markdown code-fence markers the model tends to wrap JSON in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Strips fences and parses what is left. Anything that does not parse is an error,
/// there is no partial result.
pub fn parse_json_response<T: DeserializeOwned>(text: &str) -> Result<T> {
    let clean = strip_code_fences(text);
    if clean.is_empty() {
        return Err(Error::Inference("Empty response, nothing to parse".to_string()));
    }
    Ok(serde_json::from_str(&clean)?)
}

/// Numbered reference lines (`[1] title - url`) matching the citation indices.
pub fn render_reference_block(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("[{}] {} - {}", i + 1, s.title, s.url))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topic;

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```json\n[{\"title\": \"a\", \"description\": \"b\"}]\n```";
        assert_eq!(strip_code_fences(fenced), "[{\"title\": \"a\", \"description\": \"b\"}]");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn test_parse_fenced_and_unfenced_alike() {
        let body = r#"[{"title": "ROS 2 on Jetson Thor", "description": "Latency budgets"}]"#;
        let plain: Vec<Topic> = parse_json_response(body).unwrap();
        let fenced: Vec<Topic> = parse_json_response(&format!("```json\n{}\n```", body)).unwrap();
        assert_eq!(plain, fenced);
        assert_eq!(plain[0].title, "ROS 2 on Jetson Thor");
    }

    #[test]
    fn test_parse_rejects_truncated_json() {
        let truncated = r#"[{"title": "A", "url": "https://example.com", "snip"#;
        let result = parse_json_response::<Vec<Source>>(truncated);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_parse_rejects_empty_body() {
        assert!(parse_json_response::<Vec<Topic>>("```json\n```").is_err());
    }

    #[test]
    fn test_reference_block() {
        let sources = vec![
            Source { title: "Hopper whitepaper".into(), url: "https://nvidia.com/h".into(), ..Default::default() },
            Source { title: "MLPerf v5".into(), url: "https://mlcommons.org/r".into(), ..Default::default() },
        ];
        assert_eq!(
            render_reference_block(&sources),
            "[1] Hopper whitepaper - https://nvidia.com/h\n[2] MLPerf v5 - https://mlcommons.org/r"
        );
        assert_eq!(render_reference_block(&[]), "");
    }
}
