//! The per-artifact metadata record.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// File name of the record inside an artifact directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Creation and expiry metadata stored next to generated files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Artifact slug
    #[serde(default)]
    pub slug: String,

    /// Layout name, absent for classic previews
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    #[serde(default)]
    pub bride_name: Option<String>,

    #[serde(default)]
    pub groom_name: Option<String>,

    /// Themes rendered into the artifact
    #[serde(default)]
    pub themes: Vec<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Errors reading or writing a record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed record {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Expiry must be after creation ({expires_at} <= {created_at})")]
    ExpiryBeforeCreation {
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },

    #[error("Expiry duration must be positive, got {0}")]
    NonPositiveTtl(Duration),
}

impl ArtifactRecord {
    /// Create a record expiring `ttl` after `created_at`.
    pub fn create(
        slug: impl Into<String>,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, RecordError> {
        if ttl <= Duration::zero() {
            return Err(RecordError::NonPositiveTtl(ttl));
        }

        let created_at = created_at.trunc_subsecs(3);
        Ok(Self {
            slug: slug.into(),
            layout: None,
            bride_name: None,
            groom_name: None,
            themes: Vec::new(),
            created_at: Some(created_at),
            expires_at: Some(created_at + ttl),
        })
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_names(mut self, bride: impl Into<String>, groom: impl Into<String>) -> Self {
        self.bride_name = Some(bride.into());
        self.groom_name = Some(groom.into());
        self
    }

    pub fn with_themes(mut self, themes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.themes = themes.into_iter().map(Into::into).collect();
        self
    }

    /// Load the record stored in an artifact directory.
    ///
    /// Fails when the file is missing, is not valid JSON, carries an
    /// unparseable timestamp, or expires before it was created.
    pub fn load(dir: &Path) -> Result<Self, RecordError> {
        let path = dir.join(METADATA_FILE);
        let content = fs::read_to_string(&path).map_err(|source| RecordError::Read {
            path: path.clone(),
            source,
        })?;

        let record: ArtifactRecord =
            serde_json::from_str(&content).map_err(|e| RecordError::Malformed {
                path: path.clone(),
                message: e.to_string(),
            })?;

        if let (Some(created_at), Some(expires_at)) = (record.created_at, record.expires_at) {
            if expires_at <= created_at {
                return Err(RecordError::ExpiryBeforeCreation {
                    created_at,
                    expires_at,
                });
            }
        }

        Ok(record)
    }

    /// Write the record into an artifact directory.
    pub fn save(&self, dir: &Path) -> Result<(), RecordError> {
        let path = dir.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| RecordError::Malformed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, json).map_err(|source| RecordError::Write { path, source })
    }

    /// The moment this artifact expires.
    ///
    /// Uses `expires_at` when present, otherwise `created_at + default_ttl`.
    pub fn effective_expiry(&self, default_ttl: Duration) -> Option<DateTime<Utc>> {
        self.expires_at
            .or_else(|| self.created_at.map(|created| created + default_ttl))
    }

    /// Whether the artifact has expired at `now`.
    ///
    /// A record with neither timestamp is expired.
    pub fn is_expired(&self, now: DateTime<Utc>, default_ttl: Duration) -> bool {
        match self.effective_expiry(default_ttl) {
            Some(expiry) => now > expiry,
            None => true,
        }
    }
}

/// Expiry check that treats an unreadable record (`None`) as expired.
pub fn is_expired(record: Option<&ArtifactRecord>, now: DateTime<Utc>, default_ttl: Duration) -> bool {
    record.map_or(true, |r| r.is_expired(now, default_ttl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn minutes(m: i64) -> Duration {
        Duration::minutes(m)
    }

    #[test]
    fn expires_after_ttl() {
        let record = ArtifactRecord::create("ana-marko", t0(), Duration::hours(24)).unwrap();
        let default_ttl = Duration::hours(24);

        assert_eq!(record.expires_at, Some(t0() + Duration::hours(24)));
        assert!(!record.is_expired(t0() + minutes(23 * 60 + 59), default_ttl));
        assert!(record.is_expired(t0() + minutes(24 * 60 + 1), default_ttl));
    }

    #[test]
    fn falls_back_to_created_at_plus_default() {
        let record = ArtifactRecord {
            expires_at: None,
            ..ArtifactRecord::create("ana-marko", t0(), Duration::hours(1)).unwrap()
        };
        let default_ttl = Duration::hours(24);

        assert!(!record.is_expired(t0() + minutes(23 * 60 + 59), default_ttl));
        assert!(record.is_expired(t0() + minutes(24 * 60 + 1), default_ttl));
    }

    #[test]
    fn record_without_timestamps_is_expired() {
        let record = ArtifactRecord {
            created_at: None,
            expires_at: None,
            ..ArtifactRecord::create("x", t0(), Duration::hours(1)).unwrap()
        };

        assert!(record.is_expired(t0() - Duration::days(365), Duration::hours(24)));
    }

    #[test]
    fn unreadable_record_is_expired() {
        assert!(is_expired(None, t0(), Duration::hours(24)));
    }

    #[test]
    fn rejects_non_positive_ttl() {
        let err = ArtifactRecord::create("x", t0(), Duration::zero()).unwrap_err();
        assert!(matches!(err, RecordError::NonPositiveTtl(_)));
    }

    #[test]
    fn saves_and_loads() {
        let dir = tempdir().unwrap();
        let record = ArtifactRecord::create("ana-marko", t0(), Duration::hours(24))
            .unwrap()
            .with_names("Ана", "Марко")
            .with_themes(["classic", "modern"]);

        record.save(dir.path()).unwrap();
        let loaded = ArtifactRecord::load(dir.path()).unwrap();

        assert_eq!(loaded, record);
        let raw = fs::read_to_string(dir.path().join(METADATA_FILE)).unwrap();
        assert!(raw.contains("\"created_at\": \"2025-06-01T12:00:00Z\""));
    }

    #[test]
    fn malformed_json_fails_to_load() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILE), "{ not json").unwrap();

        let err = ArtifactRecord::load(dir.path()).unwrap_err();
        assert!(matches!(err, RecordError::Malformed { .. }));
    }

    #[test]
    fn garbage_timestamp_fails_to_load() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(METADATA_FILE),
            r#"{"slug":"x","expires_at":"sutra u podne"}"#,
        )
        .unwrap();

        assert!(ArtifactRecord::load(dir.path()).is_err());
    }

    #[test]
    fn expiry_before_creation_fails_to_load() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(METADATA_FILE),
            r#"{"slug":"x","created_at":"2025-06-02T00:00:00Z","expires_at":"2025-06-01T00:00:00Z"}"#,
        )
        .unwrap();

        let err = ArtifactRecord::load(dir.path()).unwrap_err();
        assert!(matches!(err, RecordError::ExpiryBeforeCreation { .. }));
    }

    #[test]
    fn reads_records_with_millisecond_timestamps() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(METADATA_FILE),
            r#"{"slug":"x","bride_name":"Ана","created_at":"2025-06-01T12:00:00.000Z"}"#,
        )
        .unwrap();

        let record = ArtifactRecord::load(dir.path()).unwrap();
        assert_eq!(record.created_at, Some(t0()));
        assert_eq!(record.expires_at, None);
        assert!(record.themes.is_empty());
    }
}
