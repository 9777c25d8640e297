//! Scaffold a new invitation workspace.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pozivnica_static::registry::DEFAULT_LAYOUT;
use pozivnica_static::LayoutRegistry;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing pozivnica...");

    write_file(config_path, DEFAULT_CONFIG, yes)?;
    write_file(Path::new("data/sample-wedding.json"), SAMPLE_WEDDING, yes)?;

    let templates = Path::new("templates");
    let registry = LayoutRegistry::builtin();
    let layout = registry
        .get(DEFAULT_LAYOUT)
        .context("Built-in classic layout is missing")?;

    write_file(&templates.join(&layout.base_template), BASE_TEMPLATE, yes)?;
    for style in &layout.shared_styles {
        write_file(&templates.join(style), &shared_style(style), yes)?;
    }
    if let Some(script) = &layout.script {
        write_file(&templates.join(script), CLIENT_SCRIPT, yes)?;
    }
    for (i, theme) in layout.themes.iter().enumerate() {
        let path = templates.join(&layout.theme_dir).join(&theme.id).join("style.css");
        write_file(&path, &theme_style(&theme.id, i), yes)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'pozivnica preview sample-wedding' to generate a preview.");

    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

fn shared_style(path: &Path) -> String {
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("shared");
    match name {
        "animations" => ANIMATIONS_CSS.to_string(),
        "components" => COMPONENTS_CSS.to_string(),
        _ => format!("/* {name} */\n"),
    }
}

const ACCENTS: [&str; 10] = [
    "#B8860B", "#2F3A4A", "#C97B84", "#222222", "#8B5A2B", "#4A6B53", "#6D1A36", "#C9A227",
    "#111111", "#7FA7C9",
];

fn theme_style(id: &str, index: usize) -> String {
    format!(
        r#"/* {id} */
:root {{
  --accent: {accent};
  --paper: #FFFDF8;
  --ink: #2B2B2B;
}}

body {{
  margin: 0;
  background: var(--paper);
  color: var(--ink);
  font-family: Georgia, serif;
}}

.couple {{
  color: var(--accent);
}}
"#,
        accent = ACCENTS[index % ACCENTS.len()],
    )
}

const DEFAULT_CONFIG: &str = r#"# Pozivnica configuration

[paths]
templates = "templates"
public = "public"
preview = "public/preview"
site = "public/site"
data = "data"

[preview]
# Lifetime of classic previews
expiry_hours = 24
# Lifetime of layout previews
expiry_days = 30

[site]
domain = "pozivnice.rs"
timezone = "Europe/Belgrade"
rsvp_script_url = ""
rsvp_count_script_url = ""
theme_selection_url = ""

[server]
port = 3000

[build]
minify = false
# Use data/sample-wedding.json when a slug has no data
sample_fallback = true
"#;

const SAMPLE_WEDDING: &str = r##"{
  "slug": "sample-wedding",
  "bride_name": "Ана",
  "groom_name": "Марко",
  "wedding_date": "2026-06-13",
  "ceremony_venue": "Црква Светог Марка",
  "ceremony_address": "Булевар краља Александра 17, Београд",
  "ceremony_time": "16:00",
  "reception_venue": "Хотел Метропол",
  "reception_address": "Булевар краља Александра 69, Београд",
  "reception_time": "19:00",
  "story_text": "Упознали смо се једног летњег дана на Калемегдану.",
  "dress_code_text": "Свечано",
  "dress_code_colors": ["#B8860B", "#F5F0E8"],
  "rsvp_deadline": "2026-05-31",
  "wedding_hashtag": "#AnaIMarko",
  "meal_options": [
    { "value": "meat", "label": "Месо" },
    { "value": "fish", "label": "Риба" },
    { "value": "vegetarian", "label": "Вегетаријански" }
  ],
  "timeline": [
    { "date": "2019", "title": "Упознавање", "description": "Први сусрет", "icon": "☕" },
    { "date": "2025", "title": "Веридба", "description": "Рекла је да!", "icon": "💍" }
  ]
}
"##;

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="sr">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{BRIDE_NAME}} & {{GROOM_NAME}} - {{WEDDING_DATE_SHORT}}</title>
  {{THEME_FONTS}}
  {{ANIMATIONS_CSS}}
  {{THEME_CSS}}
</head>
<body>
  <div class="floating-icons" aria-hidden="true">
    <span>{{FLOATING_ICON_1}}</span><span>{{FLOATING_ICON_2}}</span><span>{{FLOATING_ICON_3}}</span><span>{{FLOATING_ICON_4}}</span>
  </div>

  <header class="hero animate-fade-up">
    <p class="intro">{{INVITATION_INTRO}}</p>
    <h1 class="couple">{{BRIDE_NAME}} & {{GROOM_NAME}}</h1>
    <p class="date"><time datetime="{{WEDDING_DATE_ISO}}">{{WEDDING_DATE_FORMATTED}}</time></p>
    <div id="countdown" data-date="{{WEDDING_DATE_ISO}}"></div>
  </header>

  <main>
    <section class="invitation animate-fade-up">
      <p>{{INVITATION_TEXT}}</p>
    </section>

    {{#IF_STORY}}
    <section class="story animate-fade-up">
      <h2>Наша прича</h2>
      {{#IF_STORY_PHOTO}}<img src="{{STORY_PHOTO_URL}}" alt="{{BRIDE_NAME}} & {{GROOM_NAME}}">{{/IF_STORY_PHOTO}}
      <p>{{STORY_TEXT}}</p>
    </section>
    {{/IF_STORY}}

    {{#IF_TIMELINE}}
    <section class="timeline animate-fade-up">
      <h2>Наш пут</h2>
      {{TIMELINE_ITEMS}}
    </section>
    {{/IF_TIMELINE}}

    <section class="details animate-fade-up">
      <div class="event">
        <h2>Венчање</h2>
        <p>{{CEREMONY_TIME}}</p>
        <p>{{CEREMONY_VENUE}}</p>
        <p>{{CEREMONY_ADDRESS}}</p>
        {{#IF_CEREMONY_MAP}}<a href="{{CEREMONY_MAP_URL}}" target="_blank" rel="noopener">Мапа</a>{{/IF_CEREMONY_MAP}}
      </div>
      <div class="event">
        <h2>Свечани ручак</h2>
        <p>{{RECEPTION_TIME}}</p>
        <p>{{RECEPTION_VENUE}}</p>
        <p>{{RECEPTION_ADDRESS}}</p>
        {{#IF_RECEPTION_MAP}}<a href="{{RECEPTION_MAP_URL}}" target="_blank" rel="noopener">Мапа</a>{{/IF_RECEPTION_MAP}}
      </div>
      {{CALENDAR_BUTTONS}}
    </section>

    {{#IF_DRESS_CODE}}
    <section class="dress-code animate-fade-up">
      <h2>Дрес код</h2>
      <p>{{DRESS_CODE_TEXT}}</p>
      {{#IF_DRESS_CODE_COLORS}}<div class="swatches">{{DRESS_CODE_COLOR_SWATCHES}}</div>{{/IF_DRESS_CODE_COLORS}}
    </section>
    {{/IF_DRESS_CODE}}

    {{#IF_GALLERY}}
    <section class="gallery animate-fade-up">
      {{GALLERY_ITEMS}}
    </section>
    {{/IF_GALLERY}}

    {{#IF_ADDITIONAL_INFO}}
    <section class="info animate-fade-up">
      <p>{{ADDITIONAL_INFO}}</p>
    </section>
    {{/IF_ADDITIONAL_INFO}}

    <section class="rsvp animate-fade-up">
      <h2>Потврда доласка</h2>
      {{#IF_RSVP_DEADLINE}}<p>Молимо вас да потврдите долазак до {{RSVP_DEADLINE}}.</p>{{/IF_RSVP_DEADLINE}}
      <form id="rsvp-form">
        <input id="guest-name" name="name" required placeholder="Име и презиме">
        <label><input type="radio" name="attending" value="yes" checked> Долазим</label>
        <label><input type="radio" name="attending" value="no"> Не долазим</label>
        {{#IF_MEAL_OPTIONS}}
        <select id="meal-preference" name="meal">
          {{MEAL_OPTIONS}}
        </select>
        {{/IF_MEAL_OPTIONS}}
        <button type="submit" id="submit-btn">Пошаљи</button>
        <p id="form-message" class="form-message"></p>
      </form>
    </section>

    {{#IF_MUSIC}}
    <audio id="music" src="{{MUSIC_URL}}" title="{{MUSIC_TITLE}}" loop></audio>
    {{/IF_MUSIC}}
  </main>

  <footer>
    <p>{{INVITATION_SIGNATURE}}</p>
    {{#IF_HASHTAG}}<p class="hashtag">{{WEDDING_HASHTAG}}</p>{{/IF_HASHTAG}}
  </footer>

  <script>
{{INLINE_SCRIPT}}
  </script>
</body>
</html>
"#;

const ANIMATIONS_CSS: &str = r#".animate-fade-up {
  opacity: 0;
  transform: translateY(24px);
  transition: opacity 0.8s ease, transform 0.8s ease;
}

.animate-fade-up.visible {
  opacity: 1;
  transform: none;
}
"#;

const COMPONENTS_CSS: &str = r#".calendar-buttons {
  display: flex;
  gap: 0.5rem;
  flex-wrap: wrap;
}

.color-swatch {
  display: inline-block;
  width: 2rem;
  height: 2rem;
  border-radius: 50%;
}
"#;

const CLIENT_SCRIPT: &str = r#"(function() {
  'use strict';

  const CONFIG = {
    RSVP_SCRIPT_URL: '{{RSVP_SCRIPT_URL}}',
    WEDDING_SLUG: '{{WEDDING_SLUG}}'
  };

  const observer = new IntersectionObserver(function(entries) {
    entries.forEach(function(entry) {
      if (entry.isIntersecting) {
        entry.target.classList.add('visible');
        observer.unobserve(entry.target);
      }
    });
  }, { threshold: 0.1 });
  document.querySelectorAll('.animate-fade-up').forEach(function(el) { observer.observe(el); });

  const countdown = document.getElementById('countdown');
  if (countdown) {
    const target = new Date(countdown.dataset.date);
    const days = Math.ceil((target - new Date()) / 86400000);
    countdown.textContent = days > 0 ? 'Још ' + days + ' дана' : '';
  }

  const form = document.getElementById('rsvp-form');
  if (!form) return;
  form.addEventListener('submit', function(e) {
    e.preventDefault();
    const message = document.getElementById('form-message');
    const data = {
      slug: CONFIG.WEDDING_SLUG,
      name: document.getElementById('guest-name').value.trim(),
      attending: form.querySelector('input[name="attending"]:checked').value,
      meal_preference: document.getElementById('meal-preference') ? document.getElementById('meal-preference').value : '',
      submitted_at: new Date().toISOString()
    };
    if (!CONFIG.RSVP_SCRIPT_URL) {
      console.log('RSVP (demo mode):', data);
      message.textContent = 'Хвала!';
      return;
    }
    fetch(CONFIG.RSVP_SCRIPT_URL, {
      method: 'POST',
      mode: 'no-cors',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(data)
    })
      .then(function() { message.textContent = 'Хвала! Ваша потврда је забележена.'; form.reset(); })
      .catch(function() { message.textContent = 'Дошло је до грешке. Покушајте поново.'; });
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pozivnica_static::load_wedding;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_wedding_is_valid_data() {
        let loaded = load_wedding(Path::new("data"), "sample-wedding", Some(SAMPLE_WEDDING), false)
            .unwrap();

        loaded.data.validate().unwrap();
        assert_eq!(loaded.data.wedding_hashtag.as_deref(), Some("#AnaIMarko"));
        assert_eq!(loaded.data.dress_code_colors, vec!["#B8860B", "#F5F0E8"]);
        assert!(SAMPLE_WEDDING.trim_end().ends_with('}'));
    }

    #[test]
    fn theme_styles_cycle_accents() {
        let first = theme_style("classic", 0);
        let wrapped = theme_style("classic", ACCENTS.len());

        assert!(first.starts_with("/* classic */"));
        assert!(first.contains("--accent: #B8860B;"));
        assert_eq!(first, wrapped);
    }
}
