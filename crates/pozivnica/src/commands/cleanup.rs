//! Expired preview cleanup command.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use pozivnica_lifecycle::{sweep, ArtifactInfo, SweepReport};

use super::format_time;
use crate::config::load_config;

/// Run the cleanup command.
pub async fn run(config_path: &Path, dry_run: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let build = config.build_config(false);

    if dry_run {
        tracing::info!("Dry run, nothing will be deleted");
    }

    let report = sweep(&build.preview_dir, Utc::now(), build.preview_ttl, dry_run)?;
    print!("{}", summary(&report));

    Ok(())
}

/// Human-readable sweep summary.
pub fn summary(report: &SweepReport) -> String {
    let verb = if report.dry_run { "Would delete" } else { "Deleted" };
    let mut lines = Vec::new();

    for info in &report.deleted {
        lines.push(format!("{verb}: {}", info.slug));
        lines.push(format!("    Names: {} & {}", info.bride_name, info.groom_name));
        lines.push(format!("    Expired: {}", expiry(info)));
        if let Some(problem) = &info.problem {
            lines.push(format!("    Note: {problem}"));
        }
    }

    lines.push("--- Summary ---".to_string());
    lines.push(format!(
        "Expired ({}): {}",
        if report.dry_run { "would delete" } else { "deleted" },
        report.deleted_count()
    ));
    lines.push(format!("Active (kept): {}", report.kept_count()));

    if !report.kept.is_empty() {
        lines.push("Active previews:".to_string());
        for info in &report.kept {
            let mut line = format!("  - {} (expires: {})", info.slug, expiry(info));
            if let Some(problem) = &info.problem {
                line.push_str(&format!(" [{problem}]"));
            }
            lines.push(line);
        }
    }

    lines.join("\n") + "\n"
}

fn expiry(info: &ArtifactInfo) -> String {
    info.expires_at
        .map(format_time)
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn info(slug: &str, day: u32) -> ArtifactInfo {
        ArtifactInfo {
            dir_name: slug.to_string(),
            slug: slug.to_string(),
            bride_name: "Ана".to_string(),
            groom_name: "Марко".to_string(),
            created_at: None,
            expires_at: Some(Utc.with_ymd_and_hms(2025, 5, day, 8, 0, 0).unwrap()),
            problem: None,
        }
    }

    #[test]
    fn dry_run_summary() {
        let report = SweepReport {
            dry_run: true,
            deleted: vec![info("ana-marko", 1)],
            kept: vec![info("mila-jovan", 20)],
        };

        assert_eq!(
            summary(&report),
            "Would delete: ana-marko
    Names: Ана & Марко
    Expired: 2025-05-01 08:00 UTC
--- Summary ---
Expired (would delete): 1
Active (kept): 1
Active previews:
  - mila-jovan (expires: 2025-05-20 08:00 UTC)
"
        );
    }

    #[test]
    fn reports_problems_and_unknown_expiry() {
        let mut broken = info("broken", 1);
        broken.expires_at = None;
        broken.problem = Some("Failed to delete: busy".to_string());

        let report = SweepReport {
            dry_run: false,
            deleted: Vec::new(),
            kept: vec![broken],
        };
        let out = summary(&report);

        assert!(out.contains("Expired (deleted): 0"));
        assert!(out.contains("  - broken (expires: unknown) [Failed to delete: busy]"));
    }
}
