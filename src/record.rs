//! The persisted metadata model.
//!
//! These types define the on-disk shape of `export/info.json`: a JSON array of
//! [`ImageRecord`] objects with snake_case keys. The file is rewritten in full
//! after every save, so the serialized form here is the canonical record of a
//! tagging session — nothing lives only in memory.
//!
//! ## JSON layout
//!
//! ```json
//! {
//!   "id": "4e0c0f6a-...",
//!   "format": "png",
//!   "parent": "91d2b3c4-...",
//!   "author": "alice",
//!   "rating": 1,
//!   "text": { "lang": "en", "content": ["line one", "line two"] },
//!   "tags": {
//!     "parodies": ["foo"],
//!     "characters": {
//!       "sexes": { "female": 2 },
//!       "names": ["bar"],
//!       "racial_attributes": { "elf": 2 },
//!       "attributes": ["long hair"]
//!     },
//!     "poses": [], "clothes": [], "sexes": [], "others": []
//!   },
//!   "comment": "...",
//!   "title": "..."
//! }
//! ```
//!
//! ## Frequency-counted categories
//!
//! Character sexes and racial attributes are tallied, not listed: the UI adds
//! the same value repeatedly and the count is meaningful ("female: 2" on a
//! two-character image). They persist as maps so the counts survive a round
//! trip. `BTreeMap` keeps the serialized output deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Content rating, persisted as its integer index (0/1/2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    #[default]
    Safe,
    Questionable,
    Explicit,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Safe, Rating::Questionable, Rating::Explicit];

    pub fn label(self) -> &'static str {
        match self {
            Rating::Safe => "safe",
            Rating::Questionable => "questionable",
            Rating::Explicit => "explicit",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Safe),
            1 => Ok(Rating::Questionable),
            2 => Ok(Rating::Explicit),
            other => Err(format!("rating index out of range: {other}")),
        }
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value as u8
    }
}

impl std::str::FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "safe" => Ok(Rating::Safe),
            "questionable" => Ok(Rating::Questionable),
            "explicit" => Ok(Rating::Explicit),
            other => Err(format!("unknown rating: {other}")),
        }
    }
}

/// Embedded text block: language plus the text lines in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub lang: String,
    pub content: Vec<String>,
}

/// Character-level tags nested inside [`TagBundle`].
///
/// `sexes` and `racial_attributes` are frequency maps (see module docs);
/// `names` and `attributes` are ordered lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterBundle {
    pub sexes: BTreeMap<String, u32>,
    pub names: Vec<String>,
    pub racial_attributes: BTreeMap<String, u32>,
    pub attributes: Vec<String>,
}

/// All taxonomy tags for one image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagBundle {
    pub parodies: Vec<String>,
    pub characters: CharacterBundle,
    pub poses: Vec<String>,
    pub clothes: Vec<String>,
    pub sexes: Vec<String>,
    pub others: Vec<String>,
}

/// One tagged image: identity, provenance, rating, and the tag bundle.
///
/// `id` is assigned once when the source image is imported and never reused.
/// `parent` references another record's id; the reference is not validated —
/// a dangling parent is the curator's problem, not a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub author: String,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBlock>,
    pub tags: TagBundle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ImageRecord {
    /// Filename for the full-resolution copy and its thumbnail.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> ImageRecord {
        ImageRecord {
            id: "abc-123".into(),
            format: "png".into(),
            parent: Some("def-456".into()),
            author: "alice".into(),
            rating: Rating::Questionable,
            text: Some(TextBlock {
                lang: "en".into(),
                content: vec!["first line".into(), "second line".into()],
            }),
            tags: TagBundle {
                parodies: vec!["foo".into()],
                characters: CharacterBundle {
                    sexes: BTreeMap::from([("female".into(), 2)]),
                    names: vec!["bar".into()],
                    racial_attributes: BTreeMap::from([("elf".into(), 2)]),
                    attributes: vec!["long hair".into()],
                },
                poses: vec!["standing".into()],
                clothes: vec!["dress".into()],
                sexes: vec!["female".into()],
                others: vec!["outdoors".into()],
            },
            comment: Some("a comment".into()),
            title: Some("a title".into()),
        }
    }

    // =========================================================================
    // Rating tests
    // =========================================================================

    #[test]
    fn rating_serializes_as_index() {
        assert_eq!(serde_json::to_string(&Rating::Safe).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Rating::Questionable).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Rating::Explicit).unwrap(), "2");
    }

    #[test]
    fn rating_deserializes_from_index() {
        assert_eq!(serde_json::from_str::<Rating>("2").unwrap(), Rating::Explicit);
    }

    #[test]
    fn rating_rejects_out_of_range_index() {
        assert!(serde_json::from_str::<Rating>("3").is_err());
    }

    #[test]
    fn rating_parses_from_label() {
        assert_eq!("safe".parse::<Rating>().unwrap(), Rating::Safe);
        assert_eq!("Explicit".parse::<Rating>().unwrap(), Rating::Explicit);
        assert!("spicy".parse::<Rating>().is_err());
    }

    #[test]
    fn every_rating_round_trips_its_label_and_index() {
        for (index, rating) in Rating::ALL.into_iter().enumerate() {
            assert_eq!(rating.label().parse::<Rating>().unwrap(), rating);
            assert_eq!(Rating::try_from(index as u8).unwrap(), rating);
        }
    }

    // =========================================================================
    // Round-trip tests
    // =========================================================================

    #[test]
    fn record_round_trips_field_for_field() {
        let record = full_record();
        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: ImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn unset_options_are_omitted_from_json() {
        let record = ImageRecord {
            id: "abc".into(),
            format: "jpg".into(),
            author: "alice".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"parent\""));
        assert!(!json.contains("\"text\""));
        assert!(!json.contains("\"comment\""));
        assert!(!json.contains("\"title\""));
    }

    #[test]
    fn snake_case_keys_match_on_disk_format() {
        let json = serde_json::to_string(&full_record()).unwrap();
        for key in [
            "\"id\"",
            "\"format\"",
            "\"parent\"",
            "\"author\"",
            "\"rating\"",
            "\"text\"",
            "\"lang\"",
            "\"content\"",
            "\"tags\"",
            "\"parodies\"",
            "\"characters\"",
            "\"racial_attributes\"",
            "\"poses\"",
            "\"clothes\"",
            "\"sexes\"",
            "\"others\"",
            "\"comment\"",
            "\"title\"",
        ] {
            assert!(json.contains(key), "missing key {key} in {json}");
        }
    }

    #[test]
    fn frequency_maps_preserve_counts() {
        let record = full_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: ImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tags.characters.sexes.get("female"), Some(&2));
        assert_eq!(back.tags.characters.racial_attributes.get("elf"), Some(&2));
    }

    #[test]
    fn missing_tag_sections_default_to_empty() {
        // Records written by older revisions omit categories entirely.
        let json = r#"{"id":"x","format":"png","author":"a","rating":0,"tags":{"parodies":["p"]}}"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tags.parodies, vec!["p"]);
        assert!(record.tags.poses.is_empty());
        assert!(record.tags.characters.names.is_empty());
    }

    #[test]
    fn file_name_joins_id_and_format() {
        let record = full_record();
        assert_eq!(record.file_name(), "abc-123.png");
    }
}
