use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const ENV_OVERRIDES: [&str; 6] = [
    "RSVP_SCRIPT_URL",
    "RSVP_COUNT_SCRIPT_URL",
    "THEME_SELECTION_URL",
    "PREVIEW_EXPIRY_HOURS",
    "PREVIEW_EXPIRY_DAYS",
    "DOMAIN",
];

fn pozivnica(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pozivnica").unwrap();
    cmd.current_dir(dir);
    for key in ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

fn initialized() -> TempDir {
    let dir = tempdir().unwrap();
    pozivnica(dir.path()).arg("init").assert().success();
    dir
}

fn write_record(root: &Path, name: &str, created: &str, expires: &str) {
    let dir = root.join("public/preview").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("metadata.json"),
        format!(
            r#"{{"slug":"{name}","bride_name":"Ана","groom_name":"Марко","created_at":"{created}","expires_at":"{expires}"}}"#
        ),
    )
    .unwrap();
}

#[test]
fn init_scaffolds_a_workspace() {
    let dir = initialized();

    assert!(dir.path().join("pozivnica.toml").is_file());
    assert!(dir.path().join("data/sample-wedding.json").is_file());
    assert!(dir.path().join("templates/base.html").is_file());
    assert!(dir.path().join("templates/script.js").is_file());
    assert!(dir.path().join("templates/themes/whimsical/style.css").is_file());
}

#[test]
fn preview_generates_every_classic_theme() {
    let dir = initialized();

    pozivnica(dir.path())
        .args(["preview", "sample-wedding"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Preview URL: http://localhost:3000/preview/sample-wedding/",
        ));

    let out = dir.path().join("public/preview/sample-wedding");
    for file in ["classic.html", "gatsby.html", "index.html", "metadata.json", "sample-wedding.ics"] {
        assert!(out.join(file).is_file(), "{file}");
    }
    let page = fs::read_to_string(out.join("classic.html")).unwrap();
    assert!(page.contains("Ана & Марко"));
    assert!(page.contains("<option value=\"fish\">Риба</option>"));
    assert!(!page.contains("{{"));
}

#[test]
fn preview_accepts_inline_data() {
    let dir = initialized();
    let data = r#"{"bride_name":"Мила","groom_name":"Јован","wedding_date":"2026-09-05",
        "ceremony_venue":"Саборна црква","ceremony_address":"Кнеза Симе Марковића 3","ceremony_time":"15:00",
        "reception_venue":"Клуб књижевника","reception_address":"Француска 7","reception_time":"18:00"}"#;

    pozivnica(dir.path())
        .args(["preview", "mila-jovan", "--data", data])
        .assert()
        .success();

    let page =
        fs::read_to_string(dir.path().join("public/preview/mila-jovan/modern.html")).unwrap();
    assert!(page.contains("Мила & Јован"));
}

#[test]
fn preview_rejects_invalid_data() {
    let dir = initialized();

    pozivnica(dir.path())
        .args(["preview", "ana", "--data", r#"{"bride_name":"Ана"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required field: groom_name"));

    assert!(!dir.path().join("public/preview/ana").exists());
}

#[test]
fn missing_data_without_fallback_fails() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("pozivnica.toml"),
        "[build]\nsample_fallback = false\n",
    )
    .unwrap();

    pozivnica(dir.path())
        .args(["preview", "nepoznat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No wedding data for nepoznat"));
}

#[test]
fn layout_list_names_every_layout() {
    let dir = tempdir().unwrap();

    pozivnica(dir.path())
        .args(["layout", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aurora").and(predicate::str::contains("wabisabi")));
}

#[test]
fn layout_without_templates_fails() {
    let dir = initialized();

    pozivnica(dir.path())
        .args(["layout", "aurora", "sample-wedding"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing template asset"));

    assert!(!dir.path().join("public/preview/sample-wedding-aurora").exists());
}

#[test]
fn final_site_with_cleanup() {
    let dir = initialized();
    pozivnica(dir.path())
        .args(["preview", "sample-wedding"])
        .assert()
        .success();

    pozivnica(dir.path())
        .args(["final", "sample-wedding", "modern", "--cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site URL: https://pozivnice.rs/sample-wedding/"));

    let site = dir.path().join("public/site/sample-wedding");
    assert!(site.join("index.html").is_file());
    assert!(site.join("site-info.json").is_file());
    assert!(!dir.path().join("public/preview/sample-wedding").exists());
}

#[test]
fn final_rejects_unknown_theme() {
    let dir = initialized();

    pozivnica(dir.path())
        .args(["final", "sample-wedding", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid theme neon for layout classic"));
}

#[test]
fn cleanup_dry_run_then_delete() {
    let dir = tempdir().unwrap();
    write_record(dir.path(), "old", "2020-01-01T00:00:00Z", "2020-01-02T00:00:00Z");
    write_record(dir.path(), "fresh", "2020-01-01T00:00:00Z", "2999-01-01T00:00:00Z");
    fs::create_dir_all(dir.path().join("public/preview/corrupt")).unwrap();
    let created_only = dir.path().join("public/preview/created-only");
    fs::create_dir_all(&created_only).unwrap();
    fs::write(
        created_only.join("metadata.json"),
        r#"{"slug":"created-only","created_at":"2020-01-01T00:00:00Z"}"#,
    )
    .unwrap();

    pozivnica(dir.path())
        .args(["cleanup", "--dry-run"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Expired (would delete): 3")
                .and(predicate::str::contains("Active (kept): 1"))
                .and(predicate::str::contains("- fresh (expires: 2999-01-01 00:00 UTC)")),
        );
    assert!(dir.path().join("public/preview/old").exists());
    assert!(dir.path().join("public/preview/corrupt").exists());
    assert!(dir.path().join("public/preview/created-only").exists());

    pozivnica(dir.path())
        .arg("cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Expired (deleted): 3"));
    assert!(!dir.path().join("public/preview/old").exists());
    assert!(!dir.path().join("public/preview/corrupt").exists());
    assert!(!dir.path().join("public/preview/created-only").exists());
    assert!(dir.path().join("public/preview/fresh").exists());
}

#[test]
fn invalid_config_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("pozivnica.toml"), "[preview]\nexpiry_hours = 0\n").unwrap();

    pozivnica(dir.path())
        .arg("cleanup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("preview.expiry_hours"));
}
