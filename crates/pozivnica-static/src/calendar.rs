//! "Add to calendar" links and `.ics` files.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use pozivnica_template::html_escape;
use url::Url;

use crate::locale::parse_time;
use crate::wedding::WeddingData;

static GOOGLE_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://calendar.google.com/calendar/render").expect("Invalid Google Calendar URL")
});

static OUTLOOK_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://outlook.live.com/calendar/0/deeplink/compose")
        .expect("Invalid Outlook URL")
});

/// Events are assumed to last this long.
const EVENT_HOURS: i64 = 8;

const COMPACT_FORMAT: &str = "%Y%m%dT%H%M%S";

/// The wedding as a calendar event, in local wall-clock time.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub title: String,
    pub location: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// IANA zone the local times are in
    pub timezone: String,
}

impl CalendarEvent {
    /// Build the event for a wedding.
    ///
    /// Starts at the ceremony, or 14:00 when the ceremony time does not
    /// parse.
    pub fn for_wedding(
        data: &WeddingData,
        date: NaiveDate,
        slug: &str,
        domain: &str,
        timezone: &str,
    ) -> Self {
        let time = parse_time(&data.ceremony_time).unwrap_or_else(|| {
            tracing::warn!(
                "Ceremony time {:?} is not HH:MM, calendar event starts at 14:00",
                data.ceremony_time
            );
            NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default()
        });
        let start = date.and_time(time);

        let mut description = format!("Венчање: {} у {}", data.ceremony_venue, data.ceremony_time);
        if !data.reception_venue.is_empty() {
            description.push_str(&format!(
                "\nПрослава: {}, {} у {}",
                data.reception_venue, data.reception_address, data.reception_time
            ));
        }

        Self {
            uid: format!("{slug}@{domain}"),
            title: format!("Венчање: {} & {}", data.bride_name, data.groom_name),
            location: format!("{}, {}", data.ceremony_venue, data.ceremony_address),
            description,
            start,
            end: start + Duration::hours(EVENT_HOURS),
            timezone: timezone.to_string(),
        }
    }

    pub fn google_url(&self) -> String {
        let dates = format!(
            "{}/{}",
            self.start.format(COMPACT_FORMAT),
            self.end.format(COMPACT_FORMAT)
        );

        let mut url = GOOGLE_BASE.clone();
        url.query_pairs_mut()
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &self.title)
            .append_pair("dates", &dates)
            .append_pair("ctz", &self.timezone)
            .append_pair("location", &self.location)
            .append_pair("details", &self.description);
        url.into()
    }

    pub fn outlook_url(&self) -> String {
        let mut url = OUTLOOK_BASE.clone();
        url.query_pairs_mut()
            .append_pair("subject", &self.title)
            .append_pair("startdt", &self.start.format("%Y-%m-%dT%H:%M:%S").to_string())
            .append_pair("enddt", &self.end.format("%Y-%m-%dT%H:%M:%S").to_string())
            .append_pair("location", &self.location)
            .append_pair("body", &self.description);
        url.into()
    }

    /// iCalendar document for the event.
    pub fn to_ics(&self, stamp: DateTime<Utc>) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Pozivnica//SR".to_string(),
            "CALSCALE:GREGORIAN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", ics_text(&self.uid)),
            format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")),
            format!("DTSTART;TZID={}:{}", self.timezone, self.start.format(COMPACT_FORMAT)),
            format!("DTEND;TZID={}:{}", self.timezone, self.end.format(COMPACT_FORMAT)),
            format!("SUMMARY:{}", ics_text(&self.title)),
            format!("LOCATION:{}", ics_text(&self.location)),
            format!("DESCRIPTION:{}", ics_text(&self.description)),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];

        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }
}

/// The three "add to calendar" buttons.
pub fn calendar_buttons(event: &CalendarEvent, ics_filename: &str) -> String {
    format!(
        r#"<div class="calendar-buttons">
  <a href="{google}" target="_blank" rel="noopener" class="calendar-btn calendar-btn-google">
    <span class="calendar-icon">📅</span>
    <span>Google Calendar</span>
  </a>
  <a href="{outlook}" target="_blank" rel="noopener" class="calendar-btn calendar-btn-outlook">
    <span class="calendar-icon">📆</span>
    <span>Outlook</span>
  </a>
  <a href="{ics}" download="{ics}" class="calendar-btn calendar-btn-ics">
    <span class="calendar-icon">🗓️</span>
    <span>Apple / iCal</span>
  </a>
</div>"#,
        google = html_escape(&event.google_url()),
        outlook = html_escape(&event.outlook_url()),
        ics = html_escape(ics_filename),
    )
}

/// Escape a TEXT value per RFC 5545.
fn ics_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
