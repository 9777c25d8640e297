//! Pre-built HTML fragments substituted under raw keys.
//!
//! Every value taken from wedding data is escaped here, since the engine
//! inserts these fragments verbatim.

use pozivnica_template::html_escape;

use crate::wedding::{GalleryPhoto, MealOption, TimelineEvent};

/// `<option>` elements for the RSVP meal select.
pub fn meal_options(options: &[MealOption]) -> String {
    options
        .iter()
        .map(|opt| {
            format!(
                r#"<option value="{}">{}</option>"#,
                html_escape(&opt.value),
                html_escape(&opt.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dress-code colour swatches.
///
/// Colours that are not plain CSS colour tokens are skipped.
pub fn color_swatches(colors: &[String]) -> String {
    colors
        .iter()
        .filter(|c| is_css_color(c))
        .map(|c| {
            let c = html_escape(c.trim());
            format!(r#"<div class="color-swatch" style="background-color: {c};" title="{c}"></div>"#)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn timeline_items(events: &[TimelineEvent]) -> String {
    events
        .iter()
        .map(|event| {
            let icon = event
                .icon
                .as_deref()
                .filter(|i| !i.is_empty())
                .map(|i| format!(r#"<div class="timeline-icon">{}</div>"#, html_escape(i)))
                .unwrap_or_default();

            format!(
                r#"<div class="timeline-item">
  {icon}
  <div class="timeline-date">{}</div>
  <h3 class="timeline-title">{}</h3>
  <p class="timeline-description">{}</p>
</div>"#,
                html_escape(&event.date),
                html_escape(&event.title),
                html_escape(&event.description)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn gallery_items(photos: &[GalleryPhoto]) -> String {
    photos
        .iter()
        .enumerate()
        .map(|(index, photo)| {
            let caption = photo.caption.as_deref().unwrap_or_default();
            let thumbnail = photo
                .thumbnail
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(&photo.url);
            let alt = if caption.is_empty() {
                format!("Фотографија {}", index + 1)
            } else {
                caption.to_string()
            };

            format!(
                r#"<div class="gallery-item" tabindex="0" data-full-src="{}" data-caption="{}">
  <img src="{}" alt="{}" loading="lazy">
  <div class="gallery-item-overlay">
    <p class="gallery-item-caption">{}</p>
  </div>
</div>"#,
                html_escape(&photo.url),
                html_escape(caption),
                html_escape(thumbnail),
                html_escape(&alt),
                html_escape(caption)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hex codes, color names and `rgb()`/`hsl()` forms.
fn is_css_color(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn meal_options_escape_values_and_labels() {
        let options = [
            MealOption {
                value: "fish".to_string(),
                label: "Риба".to_string(),
            },
            MealOption {
                value: r#"x"><script>"#.to_string(),
                label: "<b>Месо</b>".to_string(),
            },
        ];

        assert_eq!(
            meal_options(&options),
            "<option value=\"fish\">Риба</option>\n\
             <option value=\"x&quot;&gt;&lt;script&gt;\">&lt;b&gt;Месо&lt;/b&gt;</option>"
        );
    }

    #[test]
    fn empty_lists_render_nothing() {
        assert_eq!(meal_options(&[]), "");
        assert_eq!(timeline_items(&[]), "");
        assert_eq!(gallery_items(&[]), "");
        assert_eq!(color_swatches(&[]), "");
    }

    #[test]
    fn swatches_skip_suspicious_colors() {
        let colors = vec![
            "#C9A962".to_string(),
            "red; background:url(x)".to_string(),
            "rgb(10, 20, 30)".to_string(),
        ];
        let html = color_swatches(&colors);

        assert!(html.contains("background-color: #C9A962;"));
        assert!(html.contains("background-color: rgb(10, 20, 30);"));
        assert!(!html.contains("url("));
    }

    #[test]
    fn timeline_icon_is_optional() {
        let events = [TimelineEvent {
            date: "2019".to_string(),
            title: "Упознали смо се".to_string(),
            description: "На факултету & у кафићу".to_string(),
            icon: None,
        }];
        let html = timeline_items(&events);

        assert!(!html.contains("timeline-icon"));
        assert!(html.contains("На факултету &amp; у кафићу"));
    }

    #[test]
    fn gallery_falls_back_to_url_and_numbered_alt() {
        let photos = [GalleryPhoto {
            url: "img/1.jpg".to_string(),
            thumbnail: None,
            caption: None,
        }];
        let html = gallery_items(&photos);

        assert!(html.contains(r#"<img src="img/1.jpg" alt="Фотографија 1""#));
    }
}
