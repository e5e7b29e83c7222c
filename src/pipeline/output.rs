//! Lenient parsing of pipeline output.
//!
//! The model controls the final text, so nothing here returns an error:
//! a complete report passes through, anything less degrades to the best
//! partial object that can be assembled from the task outputs.

use super::PipelineOutput;
use serde_json::Value;

/// Parse the pipeline output into the aggregated report value.
///
/// A final text that parses to an object containing `results` is returned
/// as-is. Otherwise the parsed pieces are merged: whatever the final text
/// yielded, plus the hashtag list from the first task output that has one.
/// When nothing is usable the fixed error object is returned.
pub fn parse_pipeline_output(output: &PipelineOutput) -> Value {
    let parsed = parse_json_object(&output.raw);

    if let Some(map) = &parsed {
        if map.contains_key("results") {
            return Value::Object(map.clone());
        }
    }

    let mut merged = parsed.unwrap_or_default();

    if !merged.contains_key("hashtags") {
        for task in &output.tasks {
            if let Some(map) = parse_json_object(&task.raw) {
                if let Some(hashtags) = map.get("hashtags") {
                    merged.insert("hashtags".to_string(), hashtags.clone());
                    break;
                }
            }
        }
    }

    if merged.is_empty() {
        serde_json::json!({"error": "Could not parse crew output"})
    } else {
        Value::Object(merged)
    }
}

/// Parse text as a JSON object, tolerating markdown code fences.
fn parse_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str(strip_json_fences(text)) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Strip a surrounding markdown code fence, with or without a language tag.
fn strip_json_fences(s: &str) -> &str {
    let s = s.trim();
    if s.starts_with("```") {
        s.trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::super::TaskOutput;
    use super::*;
    use serde_json::json;

    fn pipeline_output(tasks: &[(&str, &str)]) -> PipelineOutput {
        let tasks: Vec<TaskOutput> = tasks
            .iter()
            .map(|(name, raw)| TaskOutput {
                name: name.to_string(),
                raw: raw.to_string(),
            })
            .collect();
        PipelineOutput {
            raw: tasks.last().map(|t| t.raw.clone()).unwrap_or_default(),
            tasks,
        }
    }

    #[test]
    fn test_complete_report_passes_through() {
        let output = pipeline_output(&[
            ("generate_hashtags", r#"{"hashtags": ["cats"]}"#),
            (
                "scrape_and_report",
                r#"{"results": {"cats": {"videos": []}}, "note": "kept"}"#,
            ),
        ]);

        let value = parse_pipeline_output(&output);
        assert_eq!(value["results"]["cats"]["videos"], json!([]));
        // Extra keys on a complete report survive untouched
        assert_eq!(value["note"], "kept");
    }

    #[test]
    fn test_fenced_report_parses() {
        let fenced = "```json\n{\"results\": {\"dogs\": {\"videos\": []}}}\n```";
        let output = pipeline_output(&[("scrape_and_report", fenced)]);

        let value = parse_pipeline_output(&output);
        assert!(value.get("results").is_some());
    }

    #[test]
    fn test_nothing_usable_returns_error_object() {
        let output = pipeline_output(&[
            ("generate_hashtags", "I could not produce hashtags."),
            ("scrape_and_report", "Sorry, something went wrong."),
        ]);

        let value = parse_pipeline_output(&output);
        assert_eq!(value, json!({"error": "Could not parse crew output"}));
    }

    #[test]
    fn test_hashtags_recovered_from_intermediate_output() {
        let output = pipeline_output(&[
            ("generate_hashtags", r#"{"hashtags": ["cats", "dogs"]}"#),
            ("scrape_and_report", "The scrape did not complete."),
        ]);

        let value = parse_pipeline_output(&output);
        assert_eq!(value, json!({"hashtags": ["cats", "dogs"]}));
    }

    #[test]
    fn test_first_parsable_hashtag_list_wins() {
        let output = pipeline_output(&[
            ("generate_hashtags", r#"{"hashtags": ["first"]}"#),
            ("retry_hashtags", r#"{"hashtags": ["second"]}"#),
            ("scrape_and_report", "not json"),
        ]);

        let value = parse_pipeline_output(&output);
        assert_eq!(value["hashtags"], json!(["first"]));
    }

    #[test]
    fn test_final_partial_object_keeps_its_own_hashtags() {
        let output = pipeline_output(&[
            ("generate_hashtags", r#"{"hashtags": ["early"]}"#),
            ("scrape_and_report", r#"{"hashtags": ["final"], "partial": true}"#),
        ]);

        let value = parse_pipeline_output(&output);
        assert_eq!(value["hashtags"], json!(["final"]));
        assert_eq!(value["partial"], true);
    }

    #[test]
    fn test_non_object_json_is_not_a_report() {
        let output = pipeline_output(&[
            ("generate_hashtags", r#"{"hashtags": ["cats"]}"#),
            ("scrape_and_report", r#"["results"]"#),
        ]);

        let value = parse_pipeline_output(&output);
        assert_eq!(value, json!({"hashtags": ["cats"]}));
    }

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(strip_json_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }
}
