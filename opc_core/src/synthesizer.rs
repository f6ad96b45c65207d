//! This synthesizer turns upcoming adjustment dates and the latest trend into calendar events.
//!
//! It is a pure transformation: the only input besides its arguments is the clock, which is
//! consulted when there is no upcoming adjustment at all.

use chrono::{DateTime, Duration, FixedOffset, SubsecRound, Utc};

use crate::{
    adjustment::{timezone, AdjustmentDate, CutoffMoment},
    error::DateError,
    trend::{Trend, TrendInfo},
};

pub static EVENT_URL: &str = "https://example.com/oil-price";
pub static EVENT_CATEGORY: &str = "Fuel price adjustment";

static SUMMARY_LABEL: &str = "Fuel price adjustment";
static SOURCE_MANUAL: &str = "Source: manually set";
static SUMMARY_NONE_EXPECTED: &str = "no upcoming adjustment is currently expected";

/// One synthesized calendar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub summary: String,
    pub description: String,
    pub url: String,
    pub category: String,
}

/// A schedule entry whose date could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// The position of the entry in the input.
    pub index: usize,
    pub raw: String,
    pub error: DateError,
}

/// The events synthesized for a schedule and the entries which had to be left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Synthesis {
    pub events: Vec<EventDescriptor>,
    pub rejected: Vec<RejectedEntry>,
}

/// How many of the leading events show the expected trend instead of "to be predicted".
///
/// A manual override is only ever applied to the nearest event, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailPolicy {
    detailed_events: usize,
}

impl DetailPolicy {
    pub const NEAREST_ONLY: DetailPolicy = DetailPolicy { detailed_events: 1 };
    pub const ALL: DetailPolicy = DetailPolicy {
        detailed_events: usize::MAX,
    };

    pub fn leading(detailed_events: usize) -> Self {
        Self { detailed_events }
    }

    fn is_detailed(&self, index: usize) -> bool {
        index < self.detailed_events
    }
}

impl Default for DetailPolicy {
    fn default() -> Self {
        Self::NEAREST_ONLY
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer {
    policy: DetailPolicy,
}

/// Synthesize the events with the default policy.
pub fn synthesize(future_dates: &[AdjustmentDate], trend_info: &TrendInfo) -> Synthesis {
    Synthesizer::default().synthesize(future_dates, trend_info)
}

impl Synthesizer {
    pub fn new(policy: DetailPolicy) -> Self {
        Self { policy }
    }

    /// Synthesize one event per future adjustment date, in the given order.
    ///
    /// The dates must be sorted and must not lie in the past, they are neither sorted nor filtered
    /// here. Entries with malformed dates are reported in [`Synthesis::rejected`] and skipped.
    pub fn synthesize(&self, future_dates: &[AdjustmentDate], trend_info: &TrendInfo) -> Synthesis {
        self.synthesize_at(future_dates, trend_info, Utc::now())
    }

    /// Like [`Synthesizer::synthesize`], with `now` used for the placeholder of an empty schedule.
    pub fn synthesize_at(
        &self,
        future_dates: &[AdjustmentDate],
        trend_info: &TrendInfo,
        now: DateTime<Utc>,
    ) -> Synthesis {
        if future_dates.is_empty() {
            return Synthesis {
                events: vec![placeholder_event(now)],
                rejected: vec![],
            };
        }
        let mut synthesis = Synthesis::default();
        for (index, adjustment_date) in future_dates.iter().enumerate() {
            let moment = match adjustment_date.moment() {
                Ok(moment) => moment,
                Err(error) => {
                    synthesis.rejected.push(RejectedEntry {
                        index,
                        raw: adjustment_date.date.clone(),
                        error,
                    });
                    continue;
                }
            };
            let event = if self.policy.is_detailed(index) {
                detailed_event(moment, resolve(moment, trend_info, index == 0))
            } else {
                undetermined_event(moment)
            };
            synthesis.events.push(event);
        }
        synthesis
    }
}

/// The effective trend of an event after applying the override precedence.
#[derive(Debug, PartialEq)]
struct Resolution {
    trend: Trend,
    amount: Option<String>,
    source: Option<String>,
}

impl Resolution {
    fn expectation(&self) -> String {
        match &self.amount {
            Some(amount) => format!("{} {amount}", self.trend.label()),
            None => self.trend.label().to_string(),
        }
    }
}

fn resolve(moment: CutoffMoment, trend_info: &TrendInfo, nearest: bool) -> Resolution {
    let manual_applies = nearest
        && trend_info
            .manual_update
            .as_deref()
            .and_then(|raw| raw.parse::<CutoffMoment>().ok())
            .is_some_and(|manual_moment| manual_moment.date() == moment.date());
    if let (true, Some(manual_trend)) = (manual_applies, trend_info.manual_trend) {
        return Resolution {
            trend: manual_trend,
            amount: trend_info.manual_amount.as_ref().and_then(|amount| amount.display()),
            source: Some(SOURCE_MANUAL.to_string()),
        };
    }
    Resolution {
        trend: trend_info.last_trend.unwrap_or(Trend::Unknown),
        amount: trend_info.last_amount.as_ref().and_then(|amount| amount.display()),
        source: trend_info
            .last_news_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| format!("See details: {url}")),
    }
}

fn detailed_event(moment: CutoffMoment, resolution: Resolution) -> EventDescriptor {
    let expectation = resolution.expectation();
    let mut description = format!("Expected adjustment: {expectation}\nAdjustment date: {moment}");
    if let Some(source) = &resolution.source {
        description.push('\n');
        description.push_str(source);
    }
    event(
        moment.start(),
        format!("{SUMMARY_LABEL}: {expectation}"),
        description,
    )
}

fn undetermined_event(moment: CutoffMoment) -> EventDescriptor {
    let label = Trend::Unknown.label();
    event(
        moment.start(),
        format!("{SUMMARY_LABEL}: {label} ({moment})"),
        format!("Expected adjustment: {label}\nAdjustment date: {moment}"),
    )
}

fn placeholder_event(now: DateTime<Utc>) -> EventDescriptor {
    event(
        now.with_timezone(&timezone()).trunc_subsecs(0),
        format!("{SUMMARY_LABEL}: {SUMMARY_NONE_EXPECTED}"),
        format!(
            "No fuel price adjustment is currently expected.\n\
             Subscribe to this calendar to get the latest fuel price information.\n\
             Link: {EVENT_URL}"
        ),
    )
}

fn event(start: DateTime<FixedOffset>, summary: String, description: String) -> EventDescriptor {
    EventDescriptor {
        start,
        end: start + Duration::hours(1),
        summary,
        description,
        url: EVENT_URL.to_string(),
        category: EVENT_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::{
        adjustment::AdjustmentDate,
        error::DateError,
        synthesizer::{synthesize, DetailPolicy, RejectedEntry, Synthesizer, EVENT_CATEGORY, EVENT_URL},
        trend::{Amount, Trend, TrendInfo},
    };

    fn get_test_dates() -> Vec<AdjustmentDate> {
        vec![
            AdjustmentDate::new("2024-06-01"),
            AdjustmentDate::new("2024-06-15"),
        ]
    }

    fn get_scraped_trend_info() -> TrendInfo {
        TrendInfo {
            last_trend: Some(Trend::Up),
            last_amount: Some(Amount::from("0.20")),
            ..TrendInfo::default()
        }
    }

    fn get_manual_trend_info() -> TrendInfo {
        TrendInfo {
            last_trend: Some(Trend::Up),
            last_amount: Some(Amount::from("0.20")),
            last_news_url: Some("https://news.example.com/oil".to_string()),
            manual_trend: Some(Trend::Down),
            manual_amount: Some(Amount::from("0.15")),
            manual_update: Some("2024-06-01".to_string()),
        }
    }

    #[test]
    fn test_scraped_trend_on_nearest_event() {
        let synthesis = synthesize(&get_test_dates(), &get_scraped_trend_info());
        assert!(synthesis.rejected.is_empty());
        assert_eq!(synthesis.events.len(), 2);
        let nearest = &synthesis.events[0];
        assert_eq!(nearest.start.to_rfc3339(), "2024-06-01T16:00:00+08:00");
        assert_eq!(nearest.end.to_rfc3339(), "2024-06-01T17:00:00+08:00");
        assert_eq!(nearest.summary, "Fuel price adjustment: increase 0.20");
        assert_eq!(
            nearest.description,
            "Expected adjustment: increase 0.20\nAdjustment date: 2024-06-01"
        );
        assert_eq!(nearest.url, EVENT_URL);
        assert_eq!(nearest.category, EVENT_CATEGORY);
        let next = &synthesis.events[1];
        assert_eq!(next.start.to_rfc3339(), "2024-06-15T16:00:00+08:00");
        assert_eq!(
            next.summary,
            "Fuel price adjustment: to be predicted (2024-06-15)"
        );
    }

    #[test]
    fn test_manual_override_takes_precedence() {
        let synthesis = synthesize(&get_test_dates(), &get_manual_trend_info());
        let nearest = &synthesis.events[0];
        assert_eq!(nearest.summary, "Fuel price adjustment: decrease 0.15");
        assert!(nearest.description.contains("manually set"));
        assert!(!nearest.description.contains("increase"));
        assert!(!nearest.description.contains("0.20"));
        assert!(!nearest.description.contains("https://news.example.com/oil"));
    }

    #[test]
    fn test_manual_override_for_other_date_is_ignored() {
        let mut trend_info = get_manual_trend_info();
        trend_info.manual_update = Some("2024-06-15".to_string());
        let synthesis = synthesize(&get_test_dates(), &trend_info);
        assert_eq!(
            synthesis.events[0].summary,
            "Fuel price adjustment: increase 0.20"
        );
        assert!(synthesis.events[0]
            .description
            .ends_with("See details: https://news.example.com/oil"));
        assert_eq!(
            synthesis.events[1].summary,
            "Fuel price adjustment: to be predicted (2024-06-15)"
        );
    }

    #[test]
    fn test_manual_override_matches_end_of_day_marker() {
        let mut trend_info = get_manual_trend_info();
        trend_info.manual_update = Some("2024-06-01 24:00".to_string());
        let dates = vec![AdjustmentDate::new("2024-06-01 24:00")];
        let synthesis = synthesize(&dates, &trend_info);
        assert_eq!(
            synthesis.events[0].summary,
            "Fuel price adjustment: decrease 0.15"
        );
        assert_eq!(
            synthesis.events[0].start.to_rfc3339(),
            "2024-06-01T16:00:00+08:00"
        );
    }

    #[test]
    fn test_manual_update_without_manual_trend_falls_back() {
        let mut trend_info = get_manual_trend_info();
        trend_info.manual_trend = None;
        let synthesis = synthesize(&get_test_dates(), &trend_info);
        assert_eq!(
            synthesis.events[0].summary,
            "Fuel price adjustment: increase 0.20"
        );
    }

    #[test]
    fn test_manual_override_without_amount() {
        let mut trend_info = get_manual_trend_info();
        trend_info.manual_trend = Some(Trend::Stranded);
        trend_info.manual_amount = None;
        let synthesis = synthesize(&get_test_dates(), &trend_info);
        assert_eq!(
            synthesis.events[0].summary,
            "Fuel price adjustment: held/no change"
        );
    }

    #[test]
    fn test_missing_trend_is_to_be_predicted() {
        let synthesis = synthesize(&get_test_dates(), &TrendInfo::default());
        assert_eq!(
            synthesis.events[0].summary,
            "Fuel price adjustment: to be predicted"
        );
        assert_eq!(
            synthesis.events[0].description,
            "Expected adjustment: to be predicted\nAdjustment date: 2024-06-01"
        );
    }

    #[test]
    fn test_blank_amount_is_not_rendered() {
        let trend_info = TrendInfo {
            last_trend: Some(Trend::Down),
            last_amount: Some(Amount::from("")),
            ..TrendInfo::default()
        };
        let synthesis = synthesize(&get_test_dates(), &trend_info);
        assert_eq!(synthesis.events[0].summary, "Fuel price adjustment: decrease");
    }

    #[test]
    fn test_trailing_events_are_always_to_be_predicted() {
        let dates: Vec<AdjustmentDate> = ["2024-06-01", "2024-06-15", "2024-06-29", "2024-07-12"]
            .into_iter()
            .map(AdjustmentDate::new)
            .collect();
        for trend_info in [get_scraped_trend_info(), get_manual_trend_info()] {
            let synthesis = synthesize(&dates, &trend_info);
            assert_eq!(synthesis.events.len(), dates.len());
            for (event, date) in synthesis.events.iter().zip(&dates).skip(1) {
                assert!(event.summary.contains("to be predicted"));
                assert!(event.summary.contains(&date.date));
                assert!(!event.description.contains("manually set"));
            }
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let dates: Vec<AdjustmentDate> = ["2024-07-12", "2024-06-01", "2024-06-15"]
            .into_iter()
            .map(AdjustmentDate::new)
            .collect();
        let synthesis = synthesize(&dates, &get_scraped_trend_info());
        let starts: Vec<String> = synthesis
            .events
            .iter()
            .map(|event| event.start.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(starts, vec!["2024-07-12", "2024-06-01", "2024-06-15"]);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let first = synthesize(&get_test_dates(), &get_manual_trend_info());
        let second = synthesize(&get_test_dates(), &get_manual_trend_info());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_schedule_placeholder() {
        let before = Utc::now();
        let synthesis = synthesize(&[], &get_manual_trend_info());
        let after = Utc::now();
        assert_eq!(synthesis.events.len(), 1);
        let placeholder = &synthesis.events[0];
        let start = placeholder.start.with_timezone(&Utc);
        assert!(start >= before - Duration::seconds(1));
        assert!(start <= after);
        assert_eq!(placeholder.end - placeholder.start, Duration::hours(1));
        assert!(placeholder
            .summary
            .contains("no upcoming adjustment is currently expected"));
        assert_eq!(placeholder.url, EVENT_URL);
    }

    #[test]
    fn test_placeholder_uses_administrative_timezone() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 1, 2, 3).unwrap();
        let synthesis = Synthesizer::default().synthesize_at(&[], &TrendInfo::default(), now);
        assert_eq!(
            synthesis.events[0].start.to_rfc3339(),
            "2024-06-01T09:02:03+08:00"
        );
    }

    #[test]
    fn test_malformed_entries_are_rejected_individually() {
        let dates = vec![
            AdjustmentDate::new("2024-06-01"),
            AdjustmentDate::new("2024-06-xx"),
            AdjustmentDate::new("2024-06-29"),
        ];
        let synthesis = synthesize(&dates, &get_scraped_trend_info());
        assert_eq!(
            synthesis.rejected,
            vec![RejectedEntry {
                index: 1,
                raw: "2024-06-xx".to_string(),
                error: DateError::InvalidDate("2024-06-xx".to_string()),
            }]
        );
        assert_eq!(synthesis.events.len(), 2);
        assert_eq!(
            synthesis.events[1].start.to_rfc3339(),
            "2024-06-29T16:00:00+08:00"
        );
    }

    #[test]
    fn test_malformed_nearest_entry_does_not_promote_next() {
        let dates = vec![
            AdjustmentDate::new("not a date"),
            AdjustmentDate::new("2024-06-15"),
        ];
        let synthesis = synthesize(&dates, &get_scraped_trend_info());
        assert_eq!(synthesis.rejected.len(), 1);
        assert_eq!(synthesis.rejected[0].index, 0);
        assert_eq!(synthesis.events.len(), 1);
        assert!(synthesis.events[0].summary.contains("to be predicted"));
    }

    #[test]
    fn test_all_rejected_yields_no_placeholder() {
        let dates = vec![AdjustmentDate::new("")];
        let synthesis = synthesize(&dates, &TrendInfo::default());
        assert!(synthesis.events.is_empty());
        assert_eq!(synthesis.rejected[0].error, DateError::Empty);
    }

    #[test]
    fn test_detail_policy_all() {
        let synthesizer = Synthesizer::new(DetailPolicy::ALL);
        let synthesis = synthesizer.synthesize(&get_test_dates(), &get_manual_trend_info());
        assert_eq!(
            synthesis.events[0].summary,
            "Fuel price adjustment: decrease 0.15"
        );
        assert_eq!(
            synthesis.events[1].summary,
            "Fuel price adjustment: increase 0.20"
        );
    }
}
