//! Label normalization.
//!
//! Classifier labels look like `Tomato___Late_blight`: crop and condition
//! separated by a triple underscore, words joined by single underscores.

/// Separator between crop and condition in raw labels.
const CLASS_SEPARATOR: &str = "___";

/// Normalize a raw label into the key used by the disease database.
///
/// `"Tomato___Late_blight"` becomes `"tomato_late_blight"`.
#[must_use]
pub fn lookup_key(label: &str) -> String {
    label
        .replace(CLASS_SEPARATOR, "_")
        .replace(' ', "_")
        .to_lowercase()
        .trim()
        .to_string()
}

/// Human-readable form of a raw label.
///
/// `"Tomato___Late_blight"` becomes `"Tomato - Late blight"`. Only the first
/// character is re-cased, and only when it is lowercase.
#[must_use]
pub fn display_name(label: &str) -> String {
    let spaced = label.replace(CLASS_SEPARATOR, " - ").replace('_', " ");

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Tomato___Late_blight"), "Tomato - Late blight");
        assert_eq!(display_name("apple___Black_rot"), "Apple - Black rot");
        assert_eq!(display_name("Corn_(maize)___healthy"), "Corn (maize) - healthy");
    }

    #[test]
    fn test_display_name_keeps_other_casing() {
        assert_eq!(display_name("grape___Esca_(Black_Measles)"), "Grape - Esca (Black Measles)");
        assert_eq!(display_name("1st___stage"), "1st - stage");
    }

    #[test]
    fn test_lookup_key() {
        assert_eq!(lookup_key("Tomato___Late_blight"), "tomato_late_blight");
        assert_eq!(lookup_key("Pepper,_bell___Bacterial spot"), "pepper,_bell_bacterial_spot");
    }

    #[test]
    fn test_lookup_key_is_case_insensitive() {
        for label in ["Tomato___Late_blight", "Squash___Powdery_mildew", "background"] {
            assert_eq!(lookup_key(label), lookup_key(&label.to_uppercase()));
        }
    }

    #[test]
    fn test_lookup_key_trims_after_replacing() {
        // Spaces become underscores before trimming, so only other
        // whitespace survives to be trimmed.
        assert_eq!(lookup_key("\tPotato___Early_blight\n"), "potato_early_blight");
        assert_eq!(lookup_key(" leaf "), "_leaf_");
    }

    #[test]
    fn test_empty_label() {
        assert_eq!(lookup_key(""), "");
        assert_eq!(display_name(""), "");
    }
}
