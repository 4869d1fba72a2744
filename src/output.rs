//! CLI output formatting.
//!
//! Pure `format_*` functions return lines so they are unit-testable; the
//! binary prints them. Nothing in here touches the filesystem.

use crate::choices::ChoiceLists;
use crate::export::ExportSummary;
use crate::record::ImageRecord;
use crate::store::ImportOutcome;

/// Total number of tag values on a record, counting each tally occurrence.
fn tag_count(record: &ImageRecord) -> usize {
    let tags = &record.tags;
    let characters = &tags.characters;
    tags.parodies.len()
        + tags.poses.len()
        + tags.clothes.len()
        + tags.sexes.len()
        + tags.others.len()
        + characters.names.len()
        + characters.attributes.len()
        + characters.sexes.values().map(|&n| n as usize).sum::<usize>()
        + characters
            .racial_attributes
            .values()
            .map(|&n| n as usize)
            .sum::<usize>()
}

/// One summary line per record: id, format, rating, author, tag count.
pub fn format_records(records: &[ImageRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec!["No saved records.".to_string()];
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!("{} record(s):", records.len()));
    for record in records {
        let title = record.title.as_deref().unwrap_or("-");
        lines.push(format!(
            "  {}.{}  [{}]  author={}  tags={}  {}",
            record.id,
            record.format,
            record.rating.label(),
            if record.author.is_empty() {
                "-"
            } else {
                record.author.as_str()
            },
            tag_count(record),
            title,
        ));
    }
    lines
}

/// Choice lists, one section per non-empty field.
pub fn format_choices(choices: &ChoiceLists) -> Vec<String> {
    if choices.is_empty() {
        return vec!["No choices derived (empty collection).".to_string()];
    }

    let mut lines = Vec::new();
    for (name, values) in choices.sections() {
        if values.is_empty() {
            continue;
        }
        lines.push(format!("{} ({}):", name, values.len()));
        for value in values {
            lines.push(format!("  {value}"));
        }
    }
    lines
}

/// Import summary, including how many malformed entries were skipped.
pub fn format_import_outcome(outcome: &ImportOutcome) -> String {
    if outcome.skipped == 0 {
        format!("Imported {} record(s).", outcome.records.len())
    } else {
        format!(
            "Imported {} record(s), skipped {} malformed entr{}.",
            outcome.records.len(),
            outcome.skipped,
            if outcome.skipped == 1 { "y" } else { "ies" },
        )
    }
}

/// Result of a save: the minted id and the new collection size.
pub fn format_saved(id: &str, collection_size: usize) -> String {
    format!("Saved {id} ({collection_size} record(s) in collection).")
}

/// Result of an export.
pub fn format_export(summary: &ExportSummary) -> Vec<String> {
    vec![
        format!(
            "Packed {} file(s) ({} bytes) into {}.",
            summary.files,
            summary.bytes,
            summary.archive.display()
        ),
        "Working tree reset for a new session.".to_string(),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
