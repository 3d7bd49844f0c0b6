//! Generic advice for labels that have no database entry.
//!
//! The template is plain data; [`generic_disease_info`] only interpolates the
//! display name into the primary cause.

use std::collections::BTreeMap;

use super::disease::{
    DiseaseInfo, Emergency, Medication, Recovery, Stage, Treatment, CAUSES_DETAILS,
    CAUSES_PRIMARY, PREVENTION_MEASURES,
};

/// Fixed template for a treatment stage.
pub struct StageTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub components: &'static [&'static str],
    pub medications: &'static [&'static str],
}

/// Fixed template for a medication.
pub struct MedicationTemplate {
    pub name: &'static str,
    pub dosage: &'static str,
    pub frequency: &'static str,
    pub side_effects: &'static str,
}

/// Complete fallback template.
pub struct FallbackTemplate {
    /// Primary cause; `{name}` is replaced with the display name.
    pub primary_cause: &'static str,
    pub cause_details: &'static str,
    pub prevention: &'static [&'static str],
    pub stages: &'static [StageTemplate],
    pub medications: &'static [MedicationTemplate],
    pub emergency_signs: &'static [&'static str],
    pub emergency_action: &'static str,
    pub recovery_timeline: &'static [&'static str],
    pub success_rate: &'static str,
}

const NAME_PLACEHOLDER: &str = "{name}";

/// Agronomic advice that applies to most fungal and bacterial leaf diseases.
pub const GENERIC_PLANT_DISEASE: FallbackTemplate = FallbackTemplate {
    primary_cause: "Fungal or bacterial infection associated with {name}.",
    cause_details: "This condition is typically caused by pathogens that thrive in specific \
        environmental conditions. It spreads through water splashes, wind, or contaminated tools. \
        High humidity and poor air circulation often exacerbate the spread.",
    prevention: &[
        "Maintain proper plant spacing to ensure good airflow.",
        "Water at the base of the plant to avoid wetting foliage.",
        "Remove and destroy infected leaves immediately.",
        "Apply preventive organic fungicides early in the season.",
        "Rotate crops to prevent soil-borne pathogen buildup.",
        "Use disease-resistant plant varieties where possible.",
        "Sanitize gardening tools between uses.",
    ],
    stages: &[
        StageTemplate {
            name: "Stage 1: Early Detection (Days 1-7)",
            description: "Immediate isolation and removal of affected parts.",
            components: &[
                "Isolate the plant to prevent spread to others.",
                "Prune all visible infected leaves.",
                "Improve air circulation around the plant.",
            ],
            medications: &["Copper Fungicide Spray"],
        },
        StageTemplate {
            name: "Stage 2: Active Treatment (Days 7-21)",
            description: "Intensive treatment to halt disease progression.",
            components: &[
                "Apply fungicide every 7-10 days.",
                "Monitor daily for new lesions.",
                "Reduce watering frequency to lower humidity.",
            ],
            medications: &["Mancozeb", "Neem Oil"],
        },
        StageTemplate {
            name: "Stage 3: Recovery (Days 21-60)",
            description: "Maintenance and monitoring for recurrence.",
            components: &[
                "Resume normal care but keep foliage dry.",
                "Apply preventive spray monthly.",
                "Strengthen plant immunity with organic compost.",
            ],
            medications: &[],
        },
    ],
    medications: &[
        MedicationTemplate {
            name: "Copper Fungicide",
            dosage: "2-3 tablespoons per gallon of water",
            frequency: "Every 7-10 days",
            side_effects: "May cause leaf burn in very hot weather.",
        },
        MedicationTemplate {
            name: "Neem Oil (Organic)",
            dosage: "1-2 tablespoons per gallon",
            frequency: "Every 7-14 days",
            side_effects: "Safe for most plants, avoid direct sun after application.",
        },
    ],
    emergency_signs: &[
        "More than 50% of leaves are affected.",
        "Disease has spread to the main stem.",
        "Plant is wilting rapidly despite watering.",
        "No improvement after 2 weeks of treatment.",
    ],
    emergency_action: "Consult an agricultural expert immediately. It may be necessary to remove \
        and destroy the entire plant to save the rest of your garden.",
    recovery_timeline: &[
        "Week 1: Stop disease spread",
        "Week 2-3: New healthy growth appears",
        "Week 4-8: Full recovery expected",
    ],
    success_rate: "85-90% with early treatment",
};

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl FallbackTemplate {
    /// Instantiate the template for a disease display name.
    #[must_use]
    pub fn instantiate(&self, display_name: &str) -> DiseaseInfo {
        let causes = BTreeMap::from([
            (
                CAUSES_PRIMARY.to_string(),
                self.primary_cause.replace(NAME_PLACEHOLDER, display_name),
            ),
            (CAUSES_DETAILS.to_string(), self.cause_details.to_string()),
        ]);

        let prevention = BTreeMap::from([(PREVENTION_MEASURES.to_string(), owned(self.prevention))]);

        let stages = self
            .stages
            .iter()
            .map(|s| Stage {
                name: s.name.to_string(),
                description: s.description.to_string(),
                components: Some(owned(s.components)),
                medications: Some(owned(s.medications)),
            })
            .collect();

        let medications = self
            .medications
            .iter()
            .map(|m| Medication {
                name: m.name.to_string(),
                dosage: Some(m.dosage.to_string()),
                frequency: Some(m.frequency.to_string()),
                side_effects: Some(m.side_effects.to_string()),
            })
            .collect();

        DiseaseInfo {
            name: display_name.to_string(),
            causes: Some(causes),
            prevention: Some(prevention),
            treatment: Some(Treatment {
                stages: Some(stages),
            }),
            medications: Some(medications),
            emergency: Some(Emergency {
                signs: Some(owned(self.emergency_signs)),
                action: Some(self.emergency_action.to_string()),
            }),
            recovery: Some(Recovery {
                timeline: Some(owned(self.recovery_timeline)),
                success_rate: Some(self.success_rate.to_string()),
            }),
        }
    }
}

/// Generic fallback entry for an unmatched label.
#[must_use]
pub fn generic_disease_info(display_name: &str) -> DiseaseInfo {
    GENERIC_PLANT_DISEASE.instantiate(display_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let info = generic_disease_info("Tomato - Late blight");

        assert_eq!(info.name, "Tomato - Late blight");
        let stages: Vec<&str> = info.stages().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            stages,
            vec![
                "Stage 1: Early Detection (Days 1-7)",
                "Stage 2: Active Treatment (Days 7-21)",
                "Stage 3: Recovery (Days 21-60)",
            ]
        );
        let signs = info
            .emergency
            .as_ref()
            .and_then(|e| e.signs.as_ref())
            .expect("Should have signs");
        assert_eq!(signs.len(), 4);
        assert_eq!(info.prevention_measures().len(), 7);
        assert_eq!(info.medications.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_fallback_interpolates_only_the_primary_cause() {
        let a = generic_disease_info("Alpha");
        let b = generic_disease_info("Beta");

        assert_eq!(
            a.causes.as_ref().and_then(|c| c.get(CAUSES_PRIMARY)).map(String::as_str),
            Some("Fungal or bacterial infection associated with Alpha.")
        );
        assert_eq!(a.causes_details(), b.causes_details());
        assert_eq!(a.treatment, b.treatment);
        assert_eq!(a.medications, b.medications);
        assert_eq!(a.emergency, b.emergency);
        assert_eq!(a.recovery, b.recovery);
    }

    #[test]
    fn test_cause_details_is_single_spaced() {
        let info = generic_disease_info("X");
        let details = info.causes_details().expect("Should have details");
        assert!(!details.contains("  "));
        assert!(details.starts_with("This condition is typically caused"));
    }
}
