//! HTML listings for directories without an index.

use std::io;
use std::path::Path;

use pozivnica_template::html_escape;

/// A directory entry shown in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read the visible entries of `dir`, directories first, each group by name.
///
/// Hidden entries, which include in-flight staging directories and
/// tombstones, are left out.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().await?.is_dir();
        entries.push(ListingEntry { name, is_dir });
    }

    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

/// Render a listing page for `url_path`, which must end with `/`.
pub fn render(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = html_escape(url_path);

    let items: Vec<String> = entries
        .iter()
        .map(|entry| {
            let (icon, suffix) = if entry.is_dir { ("📁", "/") } else { ("📄", "") };
            let name = html_escape(&entry.name);
            format!(r#"    <li>{icon} <a href="{name}{suffix}">{name}{suffix}</a></li>"#)
        })
        .collect();

    let back = if url_path == "/" {
        ""
    } else {
        r#"  <p class="back"><a href="../">⬆️ Назад</a></p>
"#
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="sr">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Index of {title}</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; max-width: 800px; margin: 2rem auto; padding: 0 1rem; background: #f5f5f5; }}
    h1 {{ color: #333; font-weight: 500; }}
    ul {{ list-style: none; padding: 0; }}
    li {{ padding: 0.5rem 1rem; background: white; margin: 0.25rem 0; border-radius: 4px; }}
    a {{ color: #2563eb; text-decoration: none; }}
  </style>
</head>
<body>
  <h1>Index of {title}</h1>
{back}  <ul>
{items}
  </ul>
</body>
</html>
"#,
        items = items.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn lists_directories_first_without_hidden_entries() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("mila-jovan")).unwrap();
        std::fs::create_dir(dir.path().join("ana-marko")).unwrap();
        std::fs::create_dir(dir.path().join(".ana-marko.staging-x1")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, ["ana-marko", "mila-jovan", "notes.txt"]);
        assert!(entries[0].is_dir);
        assert!(!entries[2].is_dir);
    }

    #[test]
    fn renders_links_and_escapes_names() {
        let entries = vec![
            ListingEntry {
                name: "ana-marko".to_string(),
                is_dir: true,
            },
            ListingEntry {
                name: "<b>.html".to_string(),
                is_dir: false,
            },
        ];

        let html = render("/preview/", &entries);

        assert!(html.contains(r#"<a href="ana-marko/">ana-marko/</a>"#));
        assert!(html.contains("&lt;b&gt;.html"));
        assert!(html.contains(r#"<a href="../">"#));
        assert!(!render("/", &[]).contains(r#"class="back""#));
    }
}
