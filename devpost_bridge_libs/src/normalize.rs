use crate::devpost::model::{RawHackathon, RawTheme};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Unknown Hackathon";
pub const DEFAULT_SUBMISSION_PERIOD: &str = "Unknown dates";
pub const DEFAULT_STATUS: &str = "Unknown";
pub const DEFAULT_PRIZES: &str = "No prize information";
pub const DEFAULT_LOCATION: &str = "Online";

/// A hackathon listing with every field populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HackathonRecord {
    pub title: String,
    pub url: Option<String>,
    pub submission_period: String,
    pub status: String,
    pub time_left: String,
    pub prizes: String,
    pub participants: String,
    pub description: String,
    pub organizer: String,
    pub theme: Vec<String>,
    pub location: String,
    pub featured: bool,
    pub scraped_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// Outcome of normalizing one upstream item.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Record(HackathonRecord),
    Skipped(SkippedRecord),
}

#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<HackathonRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl FromIterator<Normalized> for NormalizedBatch {
    fn from_iter<I: IntoIterator<Item = Normalized>>(iter: I) -> Self {
        let mut batch = NormalizedBatch::default();
        for outcome in iter {
            match outcome {
                Normalized::Record(record) => batch.records.push(record),
                Normalized::Skipped(skipped) => batch.skipped.push(skipped),
            }
        }
        batch
    }
}

pub fn normalize_record(raw: RawHackathon, scraped_at: DateTime<FixedOffset>) -> HackathonRecord {
    let location = raw
        .displayed_location
        .and_then(|location| location.location)
        .unwrap_or_else(|| String::from(DEFAULT_LOCATION));
    let theme = raw
        .themes
        .unwrap_or_default()
        .into_iter()
        .filter_map(RawTheme::into_name)
        .collect();
    let participants = raw
        .registrations_count
        .map(|count| count.to_string())
        .unwrap_or_else(|| String::from("0"));

    HackathonRecord {
        title: raw.title.unwrap_or_else(|| String::from(DEFAULT_TITLE)),
        url: raw.url,
        submission_period: raw
            .submission_period_dates
            .unwrap_or_else(|| String::from(DEFAULT_SUBMISSION_PERIOD)),
        status: raw.open_state.unwrap_or_else(|| String::from(DEFAULT_STATUS)),
        time_left: raw.time_left_to_submission.unwrap_or_default(),
        prizes: raw
            .prize_amount
            .unwrap_or_else(|| String::from(DEFAULT_PRIZES)),
        participants: format!("{} participants", participants),
        description: raw.description.unwrap_or_default(),
        organizer: raw.organization_name.unwrap_or_default(),
        theme,
        location,
        featured: raw.featured.unwrap_or(false),
        scraped_at,
    }
}

pub fn normalize_item(index: usize, item: Value, scraped_at: DateTime<FixedOffset>) -> Normalized {
    if !item.is_object() {
        return Normalized::Skipped(SkippedRecord {
            index,
            reason: format!("expected a JSON object, found {}", item),
        });
    }
    match serde_json::from_value::<RawHackathon>(item) {
        Ok(raw) => Normalized::Record(normalize_record(raw, scraped_at)),
        Err(e) => Normalized::Skipped(SkippedRecord {
            index,
            reason: e.to_string(),
        }),
    }
}

/// Normalizes every item, keeping upstream order. Malformed items are skipped, not fatal.
pub fn normalize_batch(items: Vec<Value>, scraped_at: DateTime<FixedOffset>) -> NormalizedBatch {
    let batch: NormalizedBatch = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| normalize_item(index, item, scraped_at))
        .collect();

    for skipped in batch.skipped.iter() {
        tracing::warn!(
            "skipped hackathon at index {} cause: {}",
            skipped.index,
            skipped.reason
        );
    }

    batch
}
