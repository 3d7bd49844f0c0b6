//! Detection history records.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::label;
use super::result::DiseaseResult;

/// Follow-up state of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    /// Treatment in progress
    Ongoing,
    /// Marked as recovered or dismissed
    Resolved,
}

impl HistoryStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ongoing" => Ok(Self::Ongoing),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!("Unknown history status: {other}")),
        }
    }
}

/// One persisted detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Unique identifier
    pub id: String,

    /// Raw classifier label
    pub disease: String,

    pub display_name: String,

    pub confidence: f32,

    pub processing_time_ms: u64,

    /// SHA-256 of the classified image, hex encoded
    pub image_digest: Option<String>,

    pub status: HistoryStatus,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl HistoryRecord {
    /// Create an ongoing record for a fresh result.
    #[must_use]
    pub fn from_result(result: &DiseaseResult, image: Option<&[u8]>) -> Self {
        Self {
            id: uuid_v4(),
            disease: result.disease.clone(),
            display_name: label::display_name(&result.disease),
            confidence: result.confidence,
            processing_time_ms: result.processing_time_ms,
            image_digest: image.map(sha256_hex),
            status: HistoryStatus::Ongoing,
            created_at: chrono::Utc::now(),
        }
    }

    /// Whole days since the detection, never negative.
    #[must_use]
    pub fn days_since(&self, now: chrono::DateTime<chrono::Utc>) -> u32 {
        u32::try_from((now - self.created_at).num_days().max(0)).unwrap_or(u32::MAX)
    }
}

/// Hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    Sha256::digest(bytes).iter().map(|b| format!("{b:02x}")).collect()
}

/// Generate a random UUID v4 string.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
