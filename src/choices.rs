//! Choice-list derivation from an imported metadata collection.
//!
//! Given the records of a previous session, derive the distinct values seen
//! for every taxonomy field. Front ends use these sets to populate dropdown
//! suggestions so a returning curator picks from prior vocabulary instead of
//! retyping it. This is a read-only fold over the collection — deriving
//! choices never mutates a record.
//!
//! Sets, not lists: duplicates collapse, and ordering carries no meaning
//! (`BTreeSet` gives a stable alphabetical order for free, which is what a
//! dropdown wants anyway).

use crate::record::ImageRecord;
use std::collections::BTreeSet;

/// Distinct values observed per taxonomy field across a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceLists {
    pub authors: BTreeSet<String>,
    /// Saved record ids, offered as parent references.
    pub parents: BTreeSet<String>,
    pub parodies: BTreeSet<String>,
    pub names: BTreeSet<String>,
    pub character_sexes: BTreeSet<String>,
    pub races: BTreeSet<String>,
    pub attributes: BTreeSet<String>,
    pub poses: BTreeSet<String>,
    pub clothes: BTreeSet<String>,
    pub sexes: BTreeSet<String>,
    pub others: BTreeSet<String>,
}

impl ChoiceLists {
    /// Derive choice lists from a collection.
    pub fn derive(records: &[ImageRecord]) -> Self {
        let mut lists = Self::default();
        for record in records {
            lists.absorb(record);
        }
        lists
    }

    /// Fold one record's values into the lists.
    pub fn absorb(&mut self, record: &ImageRecord) {
        if !record.author.is_empty() {
            self.authors.insert(record.author.clone());
        }
        if !record.id.is_empty() {
            self.parents.insert(record.id.clone());
        }

        let tags = &record.tags;
        self.parodies.extend(tags.parodies.iter().cloned());
        self.poses.extend(tags.poses.iter().cloned());
        self.clothes.extend(tags.clothes.iter().cloned());
        self.sexes.extend(tags.sexes.iter().cloned());
        self.others.extend(tags.others.iter().cloned());

        let characters = &tags.characters;
        self.names.extend(characters.names.iter().cloned());
        self.attributes.extend(characters.attributes.iter().cloned());
        self.character_sexes
            .extend(characters.sexes.keys().cloned());
        self.races
            .extend(characters.racial_attributes.keys().cloned());
    }

    /// Field name / value-set pairs, for display in field order.
    pub fn sections(&self) -> [(&'static str, &BTreeSet<String>); 11] {
        [
            ("authors", &self.authors),
            ("parents", &self.parents),
            ("parodies", &self.parodies),
            ("names", &self.names),
            ("character sexes", &self.character_sexes),
            ("races", &self.races),
            ("attributes", &self.attributes),
            ("poses", &self.poses),
            ("clothes", &self.clothes),
            ("sexes", &self.sexes),
            ("others", &self.others),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.sections().iter().all(|(_, set)| set.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CharacterBundle, Rating, TagBundle};
    use std::collections::BTreeMap;

    fn record(id: &str, author: &str, parodies: &[&str]) -> ImageRecord {
        ImageRecord {
            id: id.into(),
            format: "png".into(),
            author: author.into(),
            rating: Rating::Safe,
            tags: TagBundle {
                parodies: parodies.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn derive_collapses_duplicates() {
        let records = vec![
            record("a", "alice", &["foo", "bar"]),
            record("b", "alice", &["foo"]),
        ];

        let lists = ChoiceLists::derive(&records);

        assert_eq!(lists.authors, BTreeSet::from(["alice".to_string()]));
        assert_eq!(
            lists.parodies,
            BTreeSet::from(["bar".to_string(), "foo".to_string()])
        );
    }

    #[test]
    fn derive_collects_parent_ids_from_saved_records() {
        let records = vec![record("a", "alice", &[]), record("b", "bob", &[])];
        let lists = ChoiceLists::derive(&records);
        assert_eq!(
            lists.parents,
            BTreeSet::from(["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn derive_reads_character_bundle_and_map_keys() {
        let mut rec = record("a", "alice", &[]);
        rec.tags.characters = CharacterBundle {
            sexes: BTreeMap::from([("female".to_string(), 2)]),
            names: vec!["bar".into()],
            racial_attributes: BTreeMap::from([("elf".to_string(), 1)]),
            attributes: vec!["long hair".into()],
        };

        let lists = ChoiceLists::derive(&[rec]);

        assert!(lists.character_sexes.contains("female"));
        assert!(lists.races.contains("elf"));
        assert!(lists.names.contains("bar"));
        assert!(lists.attributes.contains("long hair"));
    }

    #[test]
    fn derive_skips_empty_fields_without_error() {
        // A partially populated record (no text, no characters) contributes
        // what it has and nothing else.
        let rec = ImageRecord {
            id: "a".into(),
            format: "png".into(),
            ..Default::default()
        };

        let lists = ChoiceLists::derive(&[rec]);

        assert!(lists.authors.is_empty());
        assert_eq!(lists.parents, BTreeSet::from(["a".to_string()]));
        assert!(lists.parodies.is_empty());
    }

    #[test]
    fn derive_does_not_mutate_source() {
        let records = vec![record("a", "alice", &["foo"])];
        let before = records.clone();
        let _ = ChoiceLists::derive(&records);
        assert_eq!(records, before);
    }

    #[test]
    fn empty_collection_yields_empty_lists() {
        let lists = ChoiceLists::derive(&[]);
        assert!(lists.is_empty());
    }
}
