//! This encoder builds the iCalendar feed from synthesized events.

use chrono::{DateTime, FixedOffset, Utc};
use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, IcalEventBuilder, Property},
    ical_property,
};

use crate::{
    adjustment::{today_at, TIMEZONE},
    schedule::Schedule,
    synthesizer::{EventDescriptor, RejectedEntry, Synthesizer},
};

static PROD_ID: [&str; 2] = ["Oil Price Calendar", "example.com"];
static CALENDAR_NAME: &str = "Fuel price adjustments";
static FORMAT: &str = "%Y%m%dT%H%M%S";

/// The content type of the encoded feed.
pub static CONTENT_TYPE: &str = "text/calendar";
/// The file name suggested to subscribers downloading the feed.
pub static FILE_NAME: &str = "oil-price-calendar.ics";

/// Get the calendar of the schedule as it is seen at `now`.
///
/// Schedule entries which could not be turned into events are returned alongside.
pub fn get(
    schedule: &Schedule,
    synthesizer: &Synthesizer,
    now: DateTime<Utc>,
) -> (IcalCalendar, Vec<RejectedEntry>) {
    let future_dates = schedule.future_dates(today_at(now));
    let synthesis = synthesizer.synthesize_at(&future_dates, &schedule.trend_info, now);
    (get_calendar(&synthesis.events, now), synthesis.rejected)
}

/// Build the calendar from the synthesized events.
///
/// `changed` becomes the `DTSTAMP` of every event.
pub fn get_calendar(events: &[EventDescriptor], changed: DateTime<Utc>) -> IcalCalendar {
    let changed = changed.format("%Y%m%dT%H%M%SZ").to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(prod_id())
        .build();
    calendar
        .properties
        .push(ical_property!("X-WR-CALNAME", CALENDAR_NAME));
    calendar
        .properties
        .push(ical_property!("X-WR-TIMEZONE", TIMEZONE));
    for event in events {
        calendar.events.push(get_event(event, &changed));
    }
    calendar
}

/// Build a single event, its times are local times of [`TIMEZONE`].
fn get_event(event: &EventDescriptor, changed: &str) -> IcalEvent {
    IcalEventBuilder::tzid(TIMEZONE)
        .uid(uid(&event.start))
        .changed(changed)
        .start(local(&event.start))
        .end(local(&event.end))
        .set(ical_property!("SUMMARY", &event.summary))
        .set(ical_property!("DESCRIPTION", &event.description))
        .set(ical_property!("URL", &event.url))
        .set(ical_property!("CATEGORIES", &event.category))
        .set(ical_property!("TRANSP", "TRANSPARENT"))
        .build()
}

fn local(date_time: &DateTime<FixedOffset>) -> String {
    date_time.naive_local().format(FORMAT).to_string()
}

fn prod_id() -> String {
    let mut strings: Vec<String> = Vec::from(PROD_ID).into_iter().map(String::from).collect();
    strings.splice(0..0, [String::from("-")]);
    strings.join("//")
}

/// Get a unique id for the adjustment starting at `start`.
///
/// Changing this function is a breaking change!
fn uid(start: &DateTime<FixedOffset>) -> String {
    format!("oil-price-adjustment_{}@example.com", local(start))
}
