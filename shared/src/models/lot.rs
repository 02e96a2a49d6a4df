//! Lot media: photos and plate notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A photo attached to a lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotPhoto {
    pub id: Uuid,
    pub name: String,
    /// Base64 encoded image
    pub image: String,
    pub sequence: i32,
    pub captured_at: Option<DateTime<Utc>>,
    pub notes: String,
}

/// Photos of the lot behind a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotPhotos {
    pub lot_name: String,
    pub product_name: String,
    pub photos: Vec<LotPhoto>,
}

/// Free-text plate notes of a lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotNotes {
    pub lot_name: String,
    pub product_name: String,
    pub notes: String,
}

fn default_sequence() -> i32 {
    10
}

/// Input for attaching a photo to a lot
#[derive(Debug, Clone, Deserialize)]
pub struct SaveLotPhotoInput {
    pub name: String,
    /// Base64 encoded image
    pub data: String,
    #[serde(default = "default_sequence")]
    pub sequence: i32,
    #[serde(default)]
    pub notes: String,
}

/// Input for replacing the plate notes of a lot
#[derive(Debug, Clone, Deserialize)]
pub struct SaveLotNotesInput {
    #[serde(default)]
    pub notes: String,
}

/// Result of a lot write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResult {
    pub success: bool,
    pub message: String,
}

impl SaveResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_input_defaults() {
        let input: SaveLotPhotoInput =
            serde_json::from_str(r#"{"name": "front", "data": "aGVsbG8="}"#).unwrap();
        assert_eq!(input.sequence, 10);
        assert_eq!(input.notes, "");
    }
}
