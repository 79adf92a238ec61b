//! Pretty-printing for API error payloads.
//!
//! The catalog (and the rest of the farm API) reports request failures as a
//! flat JSON object of `field: problem` pairs. Concatenating those into one
//! readable sentence per pair is all the structure we need for logs and
//! error details.

use serde_json::Value;

/// Concats and capitalizes all of the error key/value pairs returned by an
/// API endpoint.
///
/// Returns an empty string if the payload is not a non-empty JSON object;
/// callers are expected to fall back to the raw status line in that case.
pub fn pretty_print_api_errors(payload: &Value) -> String {
    let Some(errors) = payload.as_object() else {
        return String::new();
    };

    errors
        .iter()
        .map(|(field, problem)| {
            let field = field.replace('_', " ");
            let problem = match problem.as_str() {
                Some(problem) => problem.to_owned(),
                None => problem.to_string(),
            };
            capitalize(&format!("{field}: {problem}.").to_lowercase())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn formats_error_pairs() {
        let payload = json!({ "name": "is too short" });
        assert_eq!(pretty_print_api_errors(&payload), "Name: is too short.");
    }

    #[test]
    fn splits_underscored_fields_and_joins() {
        // serde_json objects iterate in key order.
        let payload = json!({
            "pin_number": "Is already in use",
            "label": "can't be blank",
        });
        assert_eq!(
            pretty_print_api_errors(&payload),
            "Label: can't be blank. Pin number: is already in use."
        );
    }

    #[test]
    fn stringifies_non_string_problems() {
        let payload = json!({ "retry_after": 30 });
        assert_eq!(pretty_print_api_errors(&payload), "Retry after: 30.");
    }

    #[test]
    fn oddball_payloads_yield_nothing() {
        assert_eq!(pretty_print_api_errors(&json!("boom")), "");
        assert_eq!(pretty_print_api_errors(&json!(null)), "");
        assert_eq!(pretty_print_api_errors(&json!({})), "");
    }
}
