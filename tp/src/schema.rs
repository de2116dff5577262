//! Trip plan data contracts
//!
//! The shared schema every other component reads or produces: the model is
//! instructed to emit exactly this shape, the repair pass coerces near-misses
//! into it, and the HTTP layer serializes it back out.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Per-item cost breakdown
///
/// All three keys are present after any successful decode; keys the model
/// omitted default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstCost {
    pub accommodation: u64,
    pub transportation: u64,
    pub activity: u64,
}

/// One scheduled activity or leg within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Start time, "HH:MM" or free text
    pub time: String,

    /// Display name of the place or activity
    pub name: String,

    /// Category tag, e.g. "activity", "transport", "lodging"
    #[serde(rename = "type")]
    pub kind: String,

    pub description: Option<String>,

    #[serde(default)]
    pub est_cost: EstCost,
}

/// One day of the itinerary; item order is chronological
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// 1-based sequence number
    pub day: u32,

    /// ISO date string, if the model assigned one
    pub date: Option<String>,

    pub items: Vec<Item>,
}

/// Aggregate cost rollup across the whole plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub accommodation: u64,
    pub transportation: u64,
    pub activity: u64,

    /// Filled in after generation when the model left it absent or zero
    pub total: Option<u64>,
}

impl Estimate {
    /// Sum of the three component totals
    pub fn component_sum(&self) -> u64 {
        self.accommodation + self.transportation + self.activity
    }
}

/// Derived summary fields computed after generation, never model-authored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraInfo {
    /// Item names present in this plan but absent from the prior one, sorted
    pub changes: Vec<String>,

    /// Item name -> scheduled time; last occurrence wins on collision
    pub best_time_to_visit: BTreeMap<String, String>,

    /// Item name -> activity-cost component; last occurrence wins
    pub tickets: BTreeMap<String, u64>,
}

/// The full structured itinerary returned to the caller
///
/// Constructed once per generation call and immutable afterwards; an update
/// produces a brand-new PlanOutput.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutput {
    /// Days in chronological order
    pub itinerary: Vec<Day>,

    #[serde(default)]
    pub tips: Vec<String>,

    pub estimate: Estimate,

    pub extra_info: Option<ExtraInfo>,
}

impl PlanOutput {
    /// Iterate every item across every day, in plan order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.itinerary.iter().flat_map(|day| day.items.iter())
    }

    /// Distinct item names across the whole itinerary
    pub fn item_names(&self) -> BTreeSet<String> {
        self.items().map(|item| item.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_est_cost_missing_keys_default_to_zero() {
        let cost: EstCost = serde_json::from_str(r#"{"activity": 120}"#).unwrap();
        assert_eq!(cost.activity, 120);
        assert_eq!(cost.accommodation, 0);
        assert_eq!(cost.transportation, 0);
    }

    #[test]
    fn test_est_cost_serializes_all_three_keys() {
        let json = serde_json::to_value(EstCost::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("accommodation"));
        assert!(obj.contains_key("transportation"));
        assert!(obj.contains_key("activity"));
    }

    #[test]
    fn test_item_without_est_cost_decodes() {
        let item: Item =
            serde_json::from_str(r#"{"time": "09:00", "name": "Museum", "type": "activity"}"#).unwrap();
        assert_eq!(item.est_cost, EstCost::default());
        assert!(item.description.is_none());
    }

    #[test]
    fn test_item_type_field_round_trips() {
        let item = Item {
            time: "09:00".to_string(),
            name: "Museum".to_string(),
            kind: "activity".to_string(),
            description: None,
            est_cost: EstCost::default(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "activity");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_plan_output_decodes_without_optional_sections() {
        let json = r#"{
            "itinerary": [
                {"day": 1, "items": [{"time": "08:00", "name": "Ferry", "type": "transport"}]}
            ],
            "estimate": {"accommodation": 100, "transportation": 50, "activity": 30}
        }"#;

        let plan: PlanOutput = serde_json::from_str(json).unwrap();
        assert!(plan.tips.is_empty());
        assert!(plan.extra_info.is_none());
        assert!(plan.itinerary[0].date.is_none());
        assert_eq!(plan.estimate.total, None);
        assert_eq!(plan.estimate.component_sum(), 180);
    }

    #[test]
    fn test_item_names_collapse_duplicates() {
        let json = r#"{
            "itinerary": [
                {"day": 1, "date": null, "items": [
                    {"time": "09:00", "name": "Old Town", "type": "activity"},
                    {"time": "14:00", "name": "Old Town", "type": "activity"}
                ]}
            ],
            "estimate": {"accommodation": 0, "transportation": 0, "activity": 0, "total": null}
        }"#;

        let plan: PlanOutput = serde_json::from_str(json).unwrap();
        assert_eq!(plan.item_names().len(), 1);
    }
}
