//! Repair pass for malformed model output
//!
//! The model may wrap its JSON in commentary, emit `est_cost` as a bare
//! number, or drop cost keys. Parsing is two-stage: a strict schema decode
//! first, then extraction of the first balanced bracketed region plus
//! field-level normalization before a second decode attempt.

use serde_json::{Value, json};
use tracing::debug;

use super::GenerationError;
use crate::schema::PlanOutput;

/// Parse raw model output into a PlanOutput, repairing if needed
pub fn parse_plan_output(raw: &str) -> Result<PlanOutput, GenerationError> {
    match serde_json::from_str::<PlanOutput>(raw) {
        Ok(plan) => Ok(plan),
        Err(strict_err) => {
            debug!(%strict_err, "strict decode failed, entering repair pass");
            let region = extract_json_region(raw).ok_or(GenerationError::NoJson)?;
            let mut data: Value = serde_json::from_str(region)?;
            normalize_est_costs(&mut data);
            serde_json::from_value(data).map_err(|e| GenerationError::InvalidStructure(e.to_string()))
        }
    }
}

/// Extract the first balanced `{...}` region, or failing that `[...]`
pub fn extract_json_region(text: &str) -> Option<&str> {
    extract_balanced(text, '{', '}').or_else(|| extract_balanced(text, '[', ']'))
}

/// Stack-based scan for a balanced bracketed substring
///
/// Honors JSON string and escape rules, so brackets inside string literals
/// do not affect the depth count.
fn extract_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + offset + close.len_utf8()]);
            }
        }
    }

    None
}

/// Normalize every item's `est_cost` in place
///
/// A bare number N becomes `{activity: N, accommodation: 0,
/// transportation: 0}`; partial objects get their missing keys filled with
/// zero; anything else non-absent is replaced with an all-zero object.
pub fn normalize_est_costs(data: &mut Value) {
    let Some(days) = data.get_mut("itinerary").and_then(Value::as_array_mut) else {
        return;
    };

    for day in days {
        let Some(items) = day.get_mut("items").and_then(Value::as_array_mut) else {
            continue;
        };

        for item in items {
            let Some(obj) = item.as_object_mut() else {
                continue;
            };

            let replacement = match obj.get_mut("est_cost") {
                Some(Value::Number(n)) => {
                    let amount = n
                        .as_u64()
                        .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
                        .unwrap_or(0);
                    Some(json!({"activity": amount, "accommodation": 0, "transportation": 0}))
                }
                Some(Value::Object(est)) => {
                    for key in ["activity", "accommodation", "transportation"] {
                        est.entry(key).or_insert(json!(0));
                    }
                    None
                }
                Some(_) => Some(json!({"activity": 0, "accommodation": 0, "transportation": 0})),
                // Absent is fine: the schema defaults it to all zeros
                None => None,
            };

            if let Some(value) = replacement {
                obj.insert("est_cost".to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_object_with_surrounding_prose() {
        let text = "Sure! Here is your plan:\n{\"a\": 1}\nEnjoy the trip.";
        assert_eq!(extract_json_region(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_nested_braces() {
        let text = "x {\"a\": {\"b\": {\"c\": 1}}} y {\"d\": 2}";
        assert_eq!(extract_json_region(text), Some("{\"a\": {\"b\": {\"c\": 1}}}"));
    }

    #[test]
    fn test_extract_ignores_braces_inside_strings() {
        let text = r#"{"note": "curly } inside", "n": 1}"#;
        assert_eq!(extract_json_region(text), Some(text));
    }

    #[test]
    fn test_extract_handles_escaped_quotes() {
        let text = r#"noise {"quote": "she said \"}\" loudly"} tail"#;
        assert_eq!(extract_json_region(text), Some(r#"{"quote": "she said \"}\" loudly"}"#));
    }

    #[test]
    fn test_extract_falls_back_to_array() {
        let text = "no object here, only [1, 2, [3]] trailing";
        assert_eq!(extract_json_region(text), Some("[1, 2, [3]]"));
    }

    #[test]
    fn test_extract_none_when_no_brackets() {
        assert_eq!(extract_json_region("plain prose, nothing structured"), None);
    }

    #[test]
    fn test_normalize_bare_number() {
        let mut data = serde_json::json!({
            "itinerary": [
                {"day": 1, "items": [{"time": "09:00", "name": "Museum", "type": "activity", "est_cost": 500}]}
            ]
        });

        normalize_est_costs(&mut data);

        assert_eq!(
            data["itinerary"][0]["items"][0]["est_cost"],
            serde_json::json!({"activity": 500, "accommodation": 0, "transportation": 0})
        );
    }

    #[test]
    fn test_normalize_partial_object() {
        let mut data = serde_json::json!({
            "itinerary": [
                {"day": 1, "items": [{"time": "09:00", "name": "Hotel", "type": "lodging", "est_cost": {"accommodation": 90}}]}
            ]
        });

        normalize_est_costs(&mut data);

        let est = &data["itinerary"][0]["items"][0]["est_cost"];
        assert_eq!(est["accommodation"], 90);
        assert_eq!(est["transportation"], 0);
        assert_eq!(est["activity"], 0);
    }

    #[test]
    fn test_normalize_null_becomes_zeroed_object() {
        let mut data = serde_json::json!({
            "itinerary": [
                {"day": 1, "items": [{"time": "09:00", "name": "Walk", "type": "activity", "est_cost": null}]}
            ]
        });

        normalize_est_costs(&mut data);

        assert_eq!(
            data["itinerary"][0]["items"][0]["est_cost"],
            serde_json::json!({"activity": 0, "accommodation": 0, "transportation": 0})
        );
    }

    #[test]
    fn test_parse_strict_path() {
        let raw = r#"{
            "itinerary": [{"day": 1, "date": null, "items": [
                {"time": "09:00", "name": "Museum", "type": "activity", "est_cost": {"activity": 20}}
            ]}],
            "estimate": {"accommodation": 0, "transportation": 0, "activity": 20, "total": null}
        }"#;

        let plan = parse_plan_output(raw).unwrap();
        assert_eq!(plan.itinerary.len(), 1);
        assert_eq!(plan.itinerary[0].items[0].est_cost.activity, 20);
        assert_eq!(plan.itinerary[0].items[0].est_cost.accommodation, 0);
    }

    #[test]
    fn test_parse_repairs_commentary_and_bare_cost() {
        let raw = r#"Here you go!
{
    "itinerary": [{"day": 1, "items": [
        {"time": "09:00", "name": "Museum", "type": "activity", "est_cost": 500}
    ]}],
    "estimate": {"accommodation": 0, "transportation": 0, "activity": 500}
}
Have fun!"#;

        let plan = parse_plan_output(raw).unwrap();
        let cost = plan.itinerary[0].items[0].est_cost;
        assert_eq!(cost.activity, 500);
        assert_eq!(cost.accommodation, 0);
        assert_eq!(cost.transportation, 0);
    }

    #[test]
    fn test_parse_missing_itinerary_is_structural_error() {
        let raw = r#"prose {"tips": ["pack light"], "estimate": {"accommodation": 0, "transportation": 0, "activity": 0}} prose"#;

        let err = parse_plan_output(raw).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidStructure(_)));
    }

    #[test]
    fn test_parse_no_json_at_all() {
        let err = parse_plan_output("I cannot produce a plan right now.").unwrap_err();
        assert!(matches!(err, GenerationError::NoJson));
    }
}
