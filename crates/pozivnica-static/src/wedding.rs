//! Wedding data as read from JSON, its validation and slug derivation.

use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::locale::parse_date;

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("Invalid slug regex"));

/// Fields every wedding must provide.
pub const REQUIRED_FIELDS: &[&str] = &[
    "bride_name",
    "groom_name",
    "wedding_date",
    "ceremony_venue",
    "ceremony_address",
    "ceremony_time",
    "reception_venue",
    "reception_address",
    "reception_time",
];

/// Raw wedding data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeddingData {
    pub slug: Option<String>,

    pub bride_name: String,
    pub groom_name: String,

    /// ISO date, `YYYY-MM-DD`
    pub wedding_date: String,

    pub ceremony_venue: String,
    pub ceremony_address: String,
    pub ceremony_time: String,
    pub ceremony_map_url: Option<String>,

    pub reception_venue: String,
    pub reception_address: String,
    pub reception_time: String,
    pub reception_map_url: Option<String>,

    pub invitation_intro: Option<String>,
    pub invitation_text: Option<String>,
    pub invitation_signature: Option<String>,

    pub story_text: Option<String>,
    pub story_photo_url: Option<String>,

    pub dress_code_text: Option<String>,
    pub dress_code_colors: Vec<String>,

    pub additional_info: Option<String>,
    pub wedding_hashtag: Option<String>,
    pub rsvp_deadline: Option<String>,

    pub meal_options: Vec<MealOption>,

    pub music_url: Option<String>,
    pub music_title: Option<String>,
    pub music_artist: Option<String>,

    pub timeline: Vec<TimelineEvent>,
    pub gallery: Vec<GalleryPhoto>,
}

/// An entry of the RSVP meal select.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealOption {
    pub value: String,
    pub label: String,
}

/// One step of the couple's story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineEvent {
    pub date: String,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryPhoto {
    pub url: String,
    pub thumbnail: Option<String>,
    pub caption: Option<String>,
}

/// Errors loading or validating wedding data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("No wedding data found for {slug}; add data/{slug}.json, an entry in data/weddings.json, or pass --data")]
    NotFound { slug: String },

    #[error("Invalid wedding data: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("Invalid slug {0:?}: use letters, digits, '-' and '_' only")]
    InvalidSlug(String),
}

impl WeddingData {
    /// Check required fields and the wedding date.
    ///
    /// Returns the parsed wedding date; every problem found is reported at
    /// once.
    pub fn validate(&self) -> Result<NaiveDate, DataError> {
        let mut errors = Vec::new();

        for field in REQUIRED_FIELDS {
            if self.required(field).trim().is_empty() {
                errors.push(format!("Missing required field: {field}"));
            }
        }

        let date = parse_date(&self.wedding_date);
        if date.is_none() && !self.wedding_date.trim().is_empty() {
            errors.push("Invalid wedding_date format. Use ISO 8601 format (YYYY-MM-DD)".to_string());
        }

        match date {
            Some(date) if errors.is_empty() => Ok(date),
            _ => Err(DataError::Invalid(errors)),
        }
    }

    /// Explicit slug when set, otherwise one derived from the names.
    pub fn slug(&self) -> String {
        self.slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| slugify(&self.bride_name, &self.groom_name))
    }

    fn required(&self, field: &str) -> &str {
        match field {
            "bride_name" => &self.bride_name,
            "groom_name" => &self.groom_name,
            "wedding_date" => &self.wedding_date,
            "ceremony_venue" => &self.ceremony_venue,
            "ceremony_address" => &self.ceremony_address,
            "ceremony_time" => &self.ceremony_time,
            "reception_venue" => &self.reception_venue,
            "reception_address" => &self.reception_address,
            "reception_time" => &self.reception_time,
            _ => "",
        }
    }
}

/// Derive a URL-safe slug from two names.
///
/// Serbian Cyrillic and Latin diacritics are transliterated, everything is
/// lowercased and runs of other characters collapse into `-`.
pub fn slugify(bride_name: &str, groom_name: &str) -> String {
    let combined = format!("{bride_name}-{groom_name}");

    let mut latin = String::with_capacity(combined.len());
    for c in combined.chars() {
        match transliterate(c) {
            Some(s) => latin.push_str(s),
            None => latin.push(c),
        }
    }

    let lower = latin.to_lowercase();
    NON_SLUG_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Reject slugs that are unsafe as a directory name.
pub fn validate_slug(slug: &str) -> Result<(), DataError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(DataError::InvalidSlug(slug.to_string()))
    }
}

fn transliterate(c: char) -> Option<&'static str> {
    let s = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'ђ' | 'đ' => "dj",
        'е' => "e",
        'ж' | 'з' | 'ž' => "z",
        'и' => "i",
        'ј' => "j",
        'к' => "k",
        'л' => "l",
        'љ' => "lj",
        'м' => "m",
        'н' => "n",
        'њ' => "nj",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' | 'ш' | 'š' => "s",
        'т' => "t",
        'ћ' | 'ц' | 'ч' | 'č' | 'ć' => "c",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'џ' => "dz",
        'А' => "A",
        'Б' => "B",
        'В' => "V",
        'Г' => "G",
        'Д' => "D",
        'Ђ' | 'Đ' => "Dj",
        'Е' => "E",
        'Ж' | 'З' | 'Ž' => "Z",
        'И' => "I",
        'Ј' => "J",
        'К' => "K",
        'Л' => "L",
        'Љ' => "Lj",
        'М' => "M",
        'Н' => "N",
        'Њ' => "Nj",
        'О' => "O",
        'П' => "P",
        'Р' => "R",
        'С' | 'Ш' | 'Š' => "S",
        'Т' => "T",
        'Ћ' | 'Ц' | 'Ч' | 'Č' | 'Ć' => "C",
        'У' => "U",
        'Ф' => "F",
        'Х' => "H",
        'Џ' => "Dz",
        _ => return None,
    };
    Some(s)
}
