//! This crate synthesizes a subscription calendar of fuel price adjustment dates.
//!
//! The adjustment schedule is merged with the latest scraped or manually set trend and turned
//! into iCalendar events, one per upcoming adjustment date.

pub use ical;

pub mod adjustment;
pub mod calendar;
pub mod error;
pub mod news;
pub mod schedule;
pub mod synthesizer;
pub mod trend;
