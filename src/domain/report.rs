//! Plain-text rendering of disease information.
//!
//! Sections appear in a fixed order and only when they have content:
//! Root Causes, Prevention, Treatment Plan, Medications, Emergency.

use std::fmt::Write as _;

use super::disease::{DiseaseInfo, Medication};
use super::result::DiseaseResult;

const BULLET: &str = "• ";

/// A titled block of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<String>,
}

fn bullets(items: &[String]) -> Vec<String> {
    items
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("{BULLET}{s}"))
        .collect()
}

fn medication_line(med: &Medication) -> String {
    let mut line = med.name.clone();
    match (med.dosage.as_deref(), med.frequency.as_deref()) {
        (Some(dosage), Some(frequency)) => {
            let _ = write!(line, ": {dosage} ({frequency})");
        }
        (Some(dosage), None) => {
            let _ = write!(line, ": {dosage}");
        }
        (None, Some(frequency)) => {
            let _ = write!(line, " ({frequency})");
        }
        (None, None) => {}
    }
    line
}

/// Build the populated sections for a disease, in display order.
#[must_use]
pub fn sections(info: &DiseaseInfo) -> Vec<Section> {
    let mut out = Vec::new();

    if let Some(details) = info.causes_details().filter(|d| !d.trim().is_empty()) {
        out.push(Section {
            title: "Root Causes",
            lines: vec![details.to_string()],
        });
    }

    let prevention = bullets(info.prevention_measures());
    if !prevention.is_empty() {
        out.push(Section {
            title: "Prevention",
            lines: prevention,
        });
    }

    let mut treatment = Vec::new();
    for stage in info.stages() {
        if !stage.name.trim().is_empty() {
            treatment.push(stage.name.clone());
        }
        if !stage.description.trim().is_empty() {
            treatment.push(stage.description.clone());
        }
        if let Some(components) = &stage.components {
            treatment.extend(bullets(components));
        }
    }
    if !treatment.is_empty() {
        out.push(Section {
            title: "Treatment Plan",
            lines: treatment,
        });
    }

    if let Some(meds) = info.medications.as_ref().filter(|m| !m.is_empty()) {
        out.push(Section {
            title: "Medications",
            lines: meds.iter().map(medication_line).collect(),
        });
    }

    if let Some(emergency) = &info.emergency {
        let mut lines = Vec::new();
        if let Some(action) = emergency.action.as_ref().filter(|a| !a.trim().is_empty()) {
            lines.push(action.clone());
        }
        if let Some(signs) = &emergency.signs {
            lines.extend(bullets(signs));
        }
        if !lines.is_empty() {
            out.push(Section {
                title: "Emergency",
                lines,
            });
        }
    }

    out
}

/// Render disease information as a multi-section text block.
///
/// Sections are separated by a blank line. Returns an empty string when
/// nothing beyond the name is known.
#[must_use]
pub fn format_rich_text(info: &DiseaseInfo) -> String {
    let mut text = String::new();
    for (i, section) in sections(info).iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let _ = writeln!(text, "{}", section.title);
        for line in &section.lines {
            let _ = writeln!(text, "{line}");
        }
    }
    text
}

/// Full text report for a result: header, then the rich-text block.
#[must_use]
pub fn format_report(result: &DiseaseResult, date: chrono::NaiveDate) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", result.display_name());
    let _ = writeln!(text, "Confidence: {:.1}%", result.confidence * 100.0);
    let _ = writeln!(text, "Date: {}", date.format("%Y-%m-%d"));

    if let Some(info) = &result.disease_info {
        let body = format_rich_text(info);
        if !body.is_empty() {
            text.push('\n');
            text.push_str(&body);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::disease::{Emergency, Stage, Treatment};
    use crate::domain::fallback::generic_disease_info;
    use std::sync::Arc;

    #[test]
    fn test_section_order_for_fallback() {
        let info = generic_disease_info("Tomato - Late blight");
        let titles: Vec<&str> = sections(&info).iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["Root Causes", "Prevention", "Treatment Plan", "Medications", "Emergency"]
        );
    }

    #[test]
    fn test_rich_text_content() {
        let text = format_rich_text(&generic_disease_info("X"));

        assert!(text.starts_with("Root Causes\nThis condition is typically caused"));
        assert!(text.contains("Prevention\n• Maintain proper plant spacing"));
        assert!(text.contains(
            "Stage 1: Early Detection (Days 1-7)\nImmediate isolation and removal of affected parts.\n• Isolate the plant"
        ));
        assert!(text.contains("Copper Fungicide: 2-3 tablespoons per gallon of water (Every 7-10 days)"));
        assert!(text.contains("Emergency\nConsult an agricultural expert immediately."));

        let stage1 = text.find("Stage 1").expect("Stage 1");
        let stage3 = text.find("Stage 3").expect("Stage 3");
        assert!(stage1 < stage3);
    }

    #[test]
    fn test_missing_sections_are_skipped() {
        let mut info = DiseaseInfo::named("Sparse");
        info.emergency = Some(Emergency {
            signs: Some(vec!["Wilting".to_string()]),
            action: None,
        });
        info.treatment = Some(Treatment {
            stages: Some(vec![Stage {
                name: "Only stage".to_string(),
                description: "Water less.".to_string(),
                components: None,
                medications: None,
            }]),
        });

        let text = format_rich_text(&info);
        assert_eq!(text, "Treatment Plan\nOnly stage\nWater less.\n\nEmergency\n• Wilting\n");
        assert!(!text.contains("Root Causes"));
        assert!(!text.contains("Medications"));
    }

    #[test]
    fn test_empty_collections_do_not_emit_headers() {
        let mut info = DiseaseInfo::named("Empty");
        info.medications = Some(vec![]);
        info.emergency = Some(Emergency {
            signs: Some(vec![]),
            action: Some("  ".to_string()),
        });
        assert_eq!(format_rich_text(&info), "");
    }

    #[test]
    fn test_medication_line_variants() {
        let med = |dosage: Option<&str>, frequency: Option<&str>| Medication {
            name: "Neem".to_string(),
            dosage: dosage.map(str::to_string),
            frequency: frequency.map(str::to_string),
            side_effects: None,
        };
        assert_eq!(medication_line(&med(Some("1 tbsp"), Some("weekly"))), "Neem: 1 tbsp (weekly)");
        assert_eq!(medication_line(&med(Some("1 tbsp"), None)), "Neem: 1 tbsp");
        assert_eq!(medication_line(&med(None, Some("weekly"))), "Neem (weekly)");
        assert_eq!(medication_line(&med(None, None)), "Neem");
    }

    #[test]
    fn test_report_header() {
        let result = DiseaseResult::assemble(
            "Tomato___Late_blight",
            0.873,
            31,
            Arc::new(generic_disease_info("Tomato - Late blight")),
        );
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
        let report = format_report(&result, date);

        assert!(report.starts_with("Tomato - Late blight\nConfidence: 87.3%\nDate: 2026-03-01\n\nRoot Causes"));
    }
}
