//! Wedding data to template keys.

use chrono::{DateTime, NaiveDate, Utc};
use pozivnica_template::TemplateData;

use crate::builder::SiteSettings;
use crate::calendar::{calendar_buttons, CalendarEvent};
use crate::fragments;
use crate::locale::{format_date, parse_date, DateStyle};
use crate::registry::{default_icons, LayoutConfig, ThemeConfig};
use crate::wedding::WeddingData;

const DEFAULT_INTRO: &str = "Са великом радошћу вас позивамо на наше венчање";
const DEFAULT_TEXT: &str = "Молимо вас да нам се придружите у прослави нашег венчања.";
const DEFAULT_SIGNATURE: &str = "Са љубављу, младенци";
const DEFAULT_MUSIC_TITLE: &str = "Наша песма";

/// Inputs shared by every page of one artifact.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub data: &'a WeddingData,
    pub date: NaiveDate,
    pub slug: &'a str,
    pub layout: &'a LayoutConfig,
    pub site: &'a SiteSettings,
    pub now: DateTime<Utc>,
}

impl PageContext<'_> {
    pub fn ics_filename(&self) -> String {
        format!("{}.ics", self.slug)
    }

    pub fn calendar_event(&self) -> CalendarEvent {
        CalendarEvent::for_wedding(
            self.data,
            self.date,
            self.slug,
            &self.site.domain,
            &self.site.timezone,
        )
    }

    /// The `.ics` file body, stamped with the generation time.
    pub fn ics(&self) -> String {
        self.calendar_event().to_ics(self.now)
    }
}

/// Build the template keys for one theme.
///
/// Text keys hold display strings, flag keys only drive conditional blocks.
/// Fragment keys (`MEAL_OPTIONS`, `TIMELINE_ITEMS` and friends) are
/// pre-escaped HTML. Theme assets (`THEME_CSS`, `ANIMATIONS_CSS`,
/// `INLINE_SCRIPT`) are added by the builder.
pub fn prepare(ctx: &PageContext<'_>, theme: &ThemeConfig) -> TemplateData {
    let d = ctx.data;
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    let or_default = |v: &Option<String>, default: &str| {
        v.as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    };

    let event = ctx.calendar_event();
    let ics = ctx.ics_filename();

    let mut out = TemplateData::new()
        .with("BRIDE_NAME", d.bride_name.as_str())
        .with("GROOM_NAME", d.groom_name.as_str())
        .with("WEDDING_SLUG", ctx.slug)
        .with("WEDDING_DATE_ISO", ctx.date.format("%Y-%m-%dT00:00:00.000Z").to_string())
        .with("WEDDING_DATE_FORMATTED", format_date(ctx.date, ctx.layout.date_style))
        .with("WEDDING_DATE_SHORT", format_date(ctx.date, DateStyle::Short))
        .with("WEDDING_DATE_NUMERIC", format_date(ctx.date, DateStyle::Numeric))
        .with("WEDDING_YEAR", ctx.date.format("%Y").to_string())
        .with("CEREMONY_TIME", d.ceremony_time.as_str())
        .with("CEREMONY_VENUE", d.ceremony_venue.as_str())
        .with("CEREMONY_ADDRESS", d.ceremony_address.as_str())
        .with("CEREMONY_MAP_URL", text(&d.ceremony_map_url))
        .with("RECEPTION_TIME", d.reception_time.as_str())
        .with("RECEPTION_VENUE", d.reception_venue.as_str())
        .with("RECEPTION_ADDRESS", d.reception_address.as_str())
        .with("RECEPTION_MAP_URL", text(&d.reception_map_url))
        .with("INVITATION_INTRO", or_default(&d.invitation_intro, DEFAULT_INTRO))
        .with("INVITATION_TEXT", or_default(&d.invitation_text, DEFAULT_TEXT))
        .with("INVITATION_SIGNATURE", or_default(&d.invitation_signature, DEFAULT_SIGNATURE))
        .with("STORY_TEXT", text(&d.story_text))
        .with("STORY_PHOTO_URL", text(&d.story_photo_url))
        .with("DRESS_CODE_TEXT", text(&d.dress_code_text))
        .with("ADDITIONAL_INFO", text(&d.additional_info))
        .with("WEDDING_HASHTAG", text(&d.wedding_hashtag))
        .with("RSVP_DEADLINE", rsvp_deadline(d))
        .with("MUSIC_URL", text(&d.music_url))
        .with("MUSIC_TITLE", or_default(&d.music_title, DEFAULT_MUSIC_TITLE))
        .with("MUSIC_ARTIST", text(&d.music_artist))
        .with("MEAL_OPTIONS", fragments::meal_options(&d.meal_options))
        .with("TIMELINE_ITEMS", fragments::timeline_items(&d.timeline))
        .with("GALLERY_ITEMS", fragments::gallery_items(&d.gallery))
        .with("DRESS_CODE_COLOR_SWATCHES", fragments::color_swatches(&d.dress_code_colors))
        .with("THEME_NAME", theme.name.as_str())
        .with("THEME_ID", theme.id.as_str())
        .with("THEME_FONTS", ctx.layout.fonts_for(theme))
        .with("RSVP_SCRIPT_URL", ctx.site.rsvp_script_url.as_str())
        .with("RSVP_COUNT_SCRIPT_URL", ctx.site.rsvp_count_script_url.as_str())
        .with("THEME_SELECTION_URL", ctx.site.theme_selection_url.as_str())
        .with("GOOGLE_CALENDAR_URL", event.google_url())
        .with("OUTLOOK_CALENDAR_URL", event.outlook_url())
        .with("ICS_CALENDAR_URL", ics.as_str())
        .with("ICS_FILENAME", ics.as_str())
        .with("CALENDAR_BUTTONS", calendar_buttons(&event, &ics))
        .with("STORY", present(&d.story_text))
        .with("STORY_PHOTO", present(&d.story_photo_url))
        .with("DRESS_CODE", present(&d.dress_code_text))
        .with("DRESS_CODE_COLORS", !d.dress_code_colors.is_empty())
        .with("CEREMONY_MAP", present(&d.ceremony_map_url))
        .with("RECEPTION_MAP", present(&d.reception_map_url))
        .with("HASHTAG", present(&d.wedding_hashtag))
        .with("MUSIC", present(&d.music_url))
        .with("TIMELINE", !d.timeline.is_empty())
        .with("GALLERY", !d.gallery.is_empty());

    let icons: Vec<&str> = if theme.icons.len() == 8 {
        theme.icons.iter().map(String::as_str).collect()
    } else {
        default_icons().to_vec()
    };
    for (i, icon) in icons.into_iter().enumerate() {
        out.insert(format!("FLOATING_ICON_{}", i + 1), icon);
    }

    out
}

fn rsvp_deadline(d: &WeddingData) -> String {
    let Some(raw) = d.rsvp_deadline.as_deref().filter(|s| !s.trim().is_empty()) else {
        return String::new();
    };
    match parse_date(raw) {
        Some(date) => format_date(date, DateStyle::Short),
        None => {
            tracing::warn!("RSVP deadline {:?} is not an ISO date, using it as written", raw);
            raw.to_string()
        }
    }
}
