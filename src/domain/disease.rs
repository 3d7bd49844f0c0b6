//! Disease information records.
//!
//! Mirrors the shape of the bundled disease database. Every field apart from
//! the names is optional: entries in the wild are frequently partial.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key of the `causes` entry rendered as "Root Causes".
pub const CAUSES_DETAILS: &str = "details";

/// Key of the `causes` entry holding the one-line summary.
pub const CAUSES_PRIMARY: &str = "primary";

/// Key of the `prevention` entry rendered as the prevention list.
pub const PREVENTION_MEASURES: &str = "measures";

/// Structured medical information for one disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causes: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevention: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<Treatment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<Medication>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency: Option<Emergency>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<Recovery>,
}

impl DiseaseInfo {
    /// Create an entry with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            causes: None,
            prevention: None,
            treatment: None,
            medications: None,
            emergency: None,
            recovery: None,
        }
    }

    /// Treatment stages in chronological order (empty when absent).
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        self.treatment
            .as_ref()
            .and_then(|t| t.stages.as_deref())
            .unwrap_or(&[])
    }

    /// The detailed causes text, if any.
    #[must_use]
    pub fn causes_details(&self) -> Option<&str> {
        self.causes
            .as_ref()
            .and_then(|c| c.get(CAUSES_DETAILS))
            .map(String::as_str)
    }

    /// Prevention measures (empty when absent).
    #[must_use]
    pub fn prevention_measures(&self) -> &[String] {
        self.prevention
            .as_ref()
            .and_then(|p| p.get(PREVENTION_MEASURES))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Ordered treatment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<Stage>>,
}

/// One chronological treatment phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,
}

/// Signs that require escalation and what to do about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emergency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signs: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recovery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_entry_deserializes() {
        let info: DiseaseInfo = serde_json::from_str(
            r#"{
                "name": "Apple Scab",
                "treatment": { "stages": [ { "name": "Stage 1", "description": "Prune." } ] },
                "emergency": { "action": "Call an agronomist." },
                "unexpected": 42
            }"#,
        )
        .expect("Should parse partial entry");

        assert_eq!(info.name, "Apple Scab");
        assert!(info.causes.is_none());
        assert_eq!(info.stages().len(), 1);
        assert!(info.stages()[0].components.is_none());
        assert!(info.emergency.as_ref().and_then(|e| e.signs.as_ref()).is_none());
    }

    #[test]
    fn test_stage_order_preserved() {
        let info: DiseaseInfo = serde_json::from_str(
            r#"{
                "name": "X",
                "treatment": { "stages": [
                    { "name": "c", "description": "" },
                    { "name": "a", "description": "" },
                    { "name": "b", "description": "" }
                ] }
            }"#,
        )
        .expect("Should parse");

        let names: Vec<&str> = info.stages().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_accessors_on_empty_entry() {
        let info = DiseaseInfo::named("Nothing");
        assert!(info.stages().is_empty());
        assert!(info.causes_details().is_none());
        assert!(info.prevention_measures().is_empty());
    }

    #[test]
    fn test_treatment_without_stages() {
        let info: DiseaseInfo =
            serde_json::from_str(r#"{ "name": "X", "treatment": {} }"#).expect("Should parse");
        assert!(info.treatment.is_some());
        assert!(info.stages().is_empty());
    }

    #[test]
    fn test_missing_names_default_to_empty() {
        let info: DiseaseInfo = serde_json::from_str(
            r#"{
                "treatment": { "stages": [ { "description": "Prune." } ] },
                "medications": [ { "dosage": "1 tsp/gal" } ]
            }"#,
        )
        .expect("Should parse entry without names");

        assert!(info.name.is_empty());
        assert!(info.stages()[0].name.is_empty());
        assert_eq!(info.stages()[0].description, "Prune.");
        let meds = info.medications.as_ref().expect("Should have medications");
        assert!(meds[0].name.is_empty());
    }
}
