//! Scanning a preview root and removing expired artifacts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::record::ArtifactRecord;

const TOMBSTONE_SUFFIX: &str = ".deleting";
const UNKNOWN: &str = "Unknown";

/// What the sweep saw for one artifact directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactInfo {
    /// Directory name under the preview root
    pub dir_name: String,

    /// Slug from the record, or the directory name
    pub slug: String,

    pub bride_name: String,

    pub groom_name: String,

    pub created_at: Option<DateTime<Utc>>,

    /// Effective expiry, after applying the default duration
    pub expires_at: Option<DateTime<Utc>>,

    /// Why the record could not be read, or why deletion failed
    pub problem: Option<String>,
}

/// Outcome of a sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Nothing was deleted; `deleted` lists what would have been
    pub dry_run: bool,

    pub deleted: Vec<ArtifactInfo>,

    pub kept: Vec<ArtifactInfo>,
}

impl SweepReport {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn kept_count(&self) -> usize {
        self.kept.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Failed to scan {path}: {message}")]
    Scan { path: PathBuf, message: String },
}

/// Sweep `root`, deleting every artifact directory that has expired at `now`.
///
/// Only direct subdirectories are considered; files and hidden entries are
/// ignored. A directory whose record cannot be read is expired. A failed
/// deletion is logged and the artifact is reported as kept. With `dry_run`
/// nothing is removed and `deleted` lists what would be.
///
/// A missing `root` yields an empty report.
pub fn sweep(
    root: &Path,
    now: DateTime<Utc>,
    default_ttl: Duration,
    dry_run: bool,
) -> Result<SweepReport, SweepError> {
    let mut report = SweepReport {
        dry_run,
        ..SweepReport::default()
    };

    if !root.exists() {
        debug!("Preview root {} does not exist", root.display());
        return Ok(report);
    }

    if !dry_run {
        clear_tombstones(root);
    }

    for entry in artifact_dirs(root)? {
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let (record, problem) = match ArtifactRecord::load(entry.path()) {
            Ok(record) => (Some(record), None),
            Err(e) => {
                warn!("{}", e);
                (None, Some(e.to_string()))
            }
        };

        let mut artifact = describe(&dir_name, record.as_ref(), default_ttl, problem);
        let expired = record
            .as_ref()
            .map_or(true, |r| r.is_expired(now, default_ttl));

        if !expired {
            report.kept.push(artifact);
            continue;
        }

        if dry_run {
            report.deleted.push(artifact);
            continue;
        }

        match remove_artifact(root, &dir_name) {
            Ok(()) => {
                info!("Deleted expired artifact {}", dir_name);
                report.deleted.push(artifact);
            }
            Err(e) => {
                warn!("Failed to delete {}: {}", dir_name, e);
                artifact.problem = Some(format!("Failed to delete: {e}"));
                report.kept.push(artifact);
            }
        }
    }

    Ok(report)
}

/// Remove an artifact directory so that it disappears in one step.
///
/// The directory is first renamed to a hidden tombstone next to it, which
/// takes it out of the served tree, and the tombstone is then removed.
pub fn remove_artifact(root: &Path, dir_name: &str) -> io::Result<()> {
    let path = root.join(dir_name);
    let tombstone = root.join(format!(".{dir_name}{TOMBSTONE_SUFFIX}"));

    if tombstone.exists() {
        fs::remove_dir_all(&tombstone)?;
    }
    fs::rename(&path, &tombstone)?;

    if let Err(e) = fs::remove_dir_all(&tombstone) {
        // Already gone from the served tree; the next sweep retries.
        warn!("Failed to remove {}: {}", tombstone.display(), e);
    }
    Ok(())
}

fn artifact_dirs(root: &Path) -> Result<Vec<walkdir::DirEntry>, SweepError> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(SweepError::Scan {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_dir() && !is_hidden(&entry) {
            dirs.push(entry);
        }
    }

    Ok(dirs)
}

fn clear_tombstones(root: &Path) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') && name.ends_with(TOMBSTONE_SUFFIX) {
            match fs::remove_dir_all(entry.path()) {
                Ok(()) => debug!("Removed leftover {}", name),
                Err(e) => warn!("Failed to remove leftover {}: {}", name, e),
            }
        }
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn describe(
    dir_name: &str,
    record: Option<&ArtifactRecord>,
    default_ttl: Duration,
    problem: Option<String>,
) -> ArtifactInfo {
    let field = |value: Option<&String>| {
        value
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| UNKNOWN.to_string())
    };

    ArtifactInfo {
        dir_name: dir_name.to_string(),
        slug: record
            .map(|r| r.slug.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| dir_name.to_string()),
        bride_name: field(record.and_then(|r| r.bride_name.as_ref())),
        groom_name: field(record.and_then(|r| r.groom_name.as_ref())),
        created_at: record.and_then(|r| r.created_at),
        expires_at: record.and_then(|r| r.effective_expiry(default_ttl)),
        problem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::METADATA_FILE;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn day() -> Duration {
        Duration::hours(24)
    }

    fn artifact(root: &Path, name: &str, created_at: DateTime<Utc>, ttl: Duration) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.html"), "<html></html>").unwrap();
        ArtifactRecord::create(name, created_at, ttl)
            .unwrap()
            .with_names("Ана", "Марко")
            .save(&dir)
            .unwrap();
    }

    /// An expired preview, an active one and one with a corrupt record.
    fn three_artifacts() -> tempfile::TempDir {
        let root = tempdir().unwrap();
        artifact(root.path(), "a", now() - Duration::hours(48), day());
        artifact(root.path(), "b", now() - Duration::hours(1), day());
        fs::create_dir_all(root.path().join("c")).unwrap();
        fs::write(root.path().join("c").join(METADATA_FILE), "{ corrupt").unwrap();
        root
    }

    fn names(infos: &[ArtifactInfo]) -> Vec<&str> {
        infos.iter().map(|i| i.dir_name.as_str()).collect()
    }

    #[test]
    fn dry_run_reports_without_deleting() {
        let root = three_artifacts();

        let report = sweep(root.path(), now(), day(), true).unwrap();

        assert!(report.dry_run);
        assert_eq!(names(&report.deleted), ["a", "c"]);
        assert_eq!(names(&report.kept), ["b"]);
        for name in ["a", "b", "c"] {
            assert!(root.path().join(name).exists(), "{name} should remain");
        }
    }

    #[test]
    fn sweep_deletes_expired_and_corrupt() {
        let root = three_artifacts();

        let report = sweep(root.path(), now(), day(), false).unwrap();

        assert_eq!(report.deleted_count(), 2);
        assert_eq!(report.kept_count(), 1);
        assert!(!root.path().join("a").exists());
        assert!(root.path().join("b").exists());
        assert!(!root.path().join("c").exists());
    }

    #[test]
    fn records_without_expiry_use_the_default_ttl() {
        let root = tempdir().unwrap();
        artifact(root.path(), "past", now() - Duration::hours(30), day());
        artifact(root.path(), "future", now(), Duration::days(10));

        let dir = root.path().join("created-only");
        fs::create_dir_all(&dir).unwrap();
        let mut record = ArtifactRecord::create("created-only", now() - Duration::hours(48), day()).unwrap();
        record.expires_at = None;
        record.save(&dir).unwrap();

        let report = sweep(root.path(), now(), day(), true).unwrap();
        assert_eq!(names(&report.deleted), ["created-only", "past"]);
        assert_eq!(names(&report.kept), ["future"]);
        assert_eq!(report.deleted[0].expires_at, Some(now() - Duration::hours(24)));
        for name in ["past", "created-only", "future"] {
            assert!(root.path().join(name).exists(), "{name} should remain");
        }

        let report = sweep(root.path(), now(), day(), false).unwrap();
        assert_eq!(report.deleted_count(), 2);
        assert_eq!(report.kept_count(), 1);
        assert!(!root.path().join("past").exists());
        assert!(!root.path().join("created-only").exists());
        assert!(root.path().join("future").exists());
    }

    #[test]
    fn corrupt_record_falls_back_to_unknown_names() {
        let root = three_artifacts();

        let report = sweep(root.path(), now(), day(), true).unwrap();
        let corrupt = &report.deleted[1];

        assert_eq!(corrupt.slug, "c");
        assert_eq!(corrupt.bride_name, "Unknown");
        assert_eq!(corrupt.groom_name, "Unknown");
        assert!(corrupt.problem.is_some());
    }

    #[test]
    fn kept_artifacts_carry_their_expiry() {
        let root = three_artifacts();

        let report = sweep(root.path(), now(), day(), true).unwrap();
        let active = &report.kept[0];

        assert_eq!(active.bride_name, "Ана");
        assert_eq!(active.expires_at, Some(now() + Duration::hours(23)));
    }

    #[test]
    fn directory_without_record_is_expired() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("bare")).unwrap();

        let report = sweep(root.path(), now(), day(), false).unwrap();

        assert_eq!(names(&report.deleted), ["bare"]);
        assert!(!root.path().join("bare").exists());
    }

    #[test]
    fn ignores_files_and_hidden_directories() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("index.html"), "selector").unwrap();
        fs::create_dir_all(root.path().join(".staging-x")).unwrap();

        let report = sweep(root.path(), now(), day(), false).unwrap();

        assert_eq!(report.deleted_count(), 0);
        assert_eq!(report.kept_count(), 0);
        assert!(root.path().join("index.html").exists());
        assert!(root.path().join(".staging-x").exists());
    }

    #[test]
    fn missing_root_is_an_empty_report() {
        let root = tempdir().unwrap();
        let report = sweep(&root.path().join("nope"), now(), day(), false).unwrap();

        assert_eq!(report.deleted_count(), 0);
        assert_eq!(report.kept_count(), 0);
    }

    #[test]
    fn clears_leftover_tombstones() {
        let root = tempdir().unwrap();
        let tombstone = root.path().join(".old.deleting");
        fs::create_dir_all(&tombstone).unwrap();

        sweep(root.path(), now(), day(), false).unwrap();

        assert!(!tombstone.exists());
    }

    #[test]
    fn layout_previews_use_their_own_expiry() {
        let root = tempdir().unwrap();
        artifact(
            root.path(),
            "ana-marko-aurora",
            now() - Duration::days(10),
            Duration::days(30),
        );

        let report = sweep(root.path(), now(), day(), false).unwrap();

        assert_eq!(names(&report.kept), ["ana-marko-aurora"]);
    }

    #[test]
    fn remove_artifact_leaves_nothing_behind() {
        let root = tempdir().unwrap();
        artifact(root.path(), "gone", now(), day());

        remove_artifact(root.path(), "gone").unwrap();

        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
