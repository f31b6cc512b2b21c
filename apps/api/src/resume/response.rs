use serde_json::Value;

use crate::models::resume::ParsedResume;
use crate::resume::ResumeError;

/// Parses the model's answer strictly as a JSON object and stamps the source file name.
///
/// Truncated or non-JSON output is rejected outright; so is valid JSON that is not
/// an object, since there is nowhere to put "File Name".
pub fn parse_response(raw_text: &str, file_name: &str) -> Result<ParsedResume, ResumeError> {
    let value: Value = serde_json::from_str(raw_text)
        .map_err(|e| ResumeError::InvalidResponseFormat(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(ResumeError::InvalidResponseFormat(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    };

    let mut record = ParsedResume::from_map(fields);
    record.set_file_name(file_name);
    Ok(record)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_object_gets_file_name() {
        let record = parse_response(r#"{"Name":"A"}"#, "r.pdf").unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"Name": "A", "File Name": "r.pdf"})
        );
    }

    #[test]
    fn test_not_json_is_invalid_format() {
        let err = parse_response("not json", "r.pdf").unwrap_err();
        assert!(matches!(err, ResumeError::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_truncated_json_is_invalid_format() {
        let err = parse_response(r#"{"Name":"A","Skills":["Ru"#, "r.pdf").unwrap_err();
        assert!(matches!(err, ResumeError::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_fenced_json_is_not_coerced() {
        let err = parse_response("```json\n{\"Name\":\"A\"}\n```", "r.pdf").unwrap_err();
        assert!(matches!(err, ResumeError::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_array_is_invalid_format() {
        let err = parse_response(r#"[{"Name":"A"}]"#, "r.pdf").unwrap_err();
        match err {
            ResumeError::InvalidResponseFormat(msg) => assert!(msg.contains("an array")),
            other => panic!("expected InvalidResponseFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_model_supplied_file_name_is_replaced() {
        let record = parse_response(r#"{"File Name":"guess.pdf","Name":"A"}"#, "r.pdf").unwrap();
        assert_eq!(record.file_name(), Some("r.pdf"));
        assert_eq!(record.keys().count(), 2);
    }

    #[test]
    fn test_nested_sections_survive_untouched() {
        let raw = r#"{"Name":"A","Experience":[{"job_title":"Engineer","company":"X"}]}"#;
        let record = parse_response(raw, "r.pdf").unwrap();
        assert_eq!(
            record.get("Experience"),
            Some(&json!([{"job_title": "Engineer", "company": "X"}]))
        );
    }
}
