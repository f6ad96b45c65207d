//! This parser extracts adjustment news from already downloaded pages.
//!
//! Fetching the pages is left to the caller.

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use bitmask_enum::bitmask;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::{Html, Selector};

use crate::trend::Trend;

/// The selector matching search result snippets.
pub static SEARCH_SELECTOR: &str = ".b_algo, .b_caption";
/// The selector matching the headline box of fuel price portals.
pub static PORTAL_SELECTOR: &str = "#left > div:nth-child(1)";

static KEYWORD_PRICE: &str = "油价";
static KEYWORDS_ADJUSTMENT: [&str; 3] = ["上调", "下调", "调整"];
static KEYWORDS_UP: [&str; 2] = ["上调", "上涨"];
static KEYWORDS_DOWN: [&str; 2] = ["下调", "下降"];
static KEYWORDS_STRANDED: [&str; 1] = ["搁浅"];

#[bitmask(u8)]
pub enum FuelTypeBitmask {
    Gasoline92,
    Gasoline95,
    Gasoline98,
    Diesel0,
}

static FUEL_TYPES: [(&str, FuelTypeBitmask); 4] = [
    ("92", FuelTypeBitmask::Gasoline92),
    ("95", FuelTypeBitmask::Gasoline95),
    ("98", FuelTypeBitmask::Gasoline98),
    ("0", FuelTypeBitmask::Diesel0),
];

impl FuelTypeBitmask {
    /// The grades as they are written in the news, e.g. `92` for 92 octane gasoline.
    pub fn labels(&self) -> Vec<String> {
        FUEL_TYPES
            .iter()
            .filter(|(_, fuel_type)| self.contains(*fuel_type))
            .map(|(label, _)| label.to_string())
            .collect()
    }
}

/// What can be read from a single news text.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsInfo {
    /// The moment the adjustment takes effect, `YYYY-MM-DD HH:00`.
    pub date: String,
    pub trend: Option<Trend>,
    /// The change in yuan per liter.
    pub amount: Option<f64>,
    pub fuel_types: FuelTypeBitmask,
}

/// A news item found on a page, together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsReport {
    pub title: String,
    pub source: String,
    pub url: String,
    pub info: NewsInfo,
}

/// Parse a news text.
///
/// The text only names month and day, the year is taken from `now`, which is also the fallback
/// when the text does not name a time at all.
pub fn parse(text: &str, now: NaiveDateTime) -> NewsInfo {
    NewsInfo {
        date: parse_date(text, now),
        trend: parse_trend(text),
        amount: parse_amount(text),
        fuel_types: parse_fuel_types(text),
    }
}

fn time_regex() -> &'static Regex {
    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    TIME_REGEX.get_or_init(|| {
        Regex::new(
            r"(?x)
                (?P<month>\d{1,2})月
                (?P<day>\d{1,2})日
                (?P<hour>\d{1,2})时
            ",
        )
        .unwrap()
    })
}

fn amount_regex() -> &'static Regex {
    static AMOUNT_REGEX: OnceLock<Regex> = OnceLock::new();
    AMOUNT_REGEX.get_or_init(|| Regex::new(r"(?P<amount>\d+(?:\.\d+)?)元/升").unwrap())
}

fn grade_regex() -> &'static Regex {
    static GRADE_REGEX: OnceLock<Regex> = OnceLock::new();
    GRADE_REGEX.get_or_init(|| Regex::new(r"(?P<grade>\d{1,2})号").unwrap())
}

fn parse_date(text: &str, now: NaiveDateTime) -> String {
    let parsed = time_regex().captures(text).and_then(|captures| {
        let month: u32 = captures["month"].parse().ok()?;
        let day: u32 = captures["day"].parse().ok()?;
        let hour: u32 = captures["hour"].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(now.year(), month, day)?;
        (hour <= 24).then(|| format!("{} {hour:02}:00", date.format("%Y-%m-%d")))
    });
    parsed.unwrap_or_else(|| now.format("%Y-%m-%d %H:%M").to_string())
}

fn parse_trend(text: &str) -> Option<Trend> {
    let contains_any = |keywords: &[&str]| keywords.iter().any(|keyword| text.contains(keyword));
    match () {
        _ if contains_any(&KEYWORDS_UP) => Some(Trend::Up),
        _ if contains_any(&KEYWORDS_DOWN) => Some(Trend::Down),
        _ if contains_any(&KEYWORDS_STRANDED) => Some(Trend::Stranded),
        _ => None,
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    amount_regex()
        .captures(text)
        .and_then(|captures| captures["amount"].parse().ok())
}

/// Collect the named fuel grades, 92 octane gasoline if none is named.
fn parse_fuel_types(text: &str) -> FuelTypeBitmask {
    let mut fuel_types = FuelTypeBitmask::none();
    for captures in grade_regex().captures_iter(text) {
        if let Some((_, fuel_type)) = FUEL_TYPES
            .iter()
            .find(|(label, _)| *label == &captures["grade"])
        {
            fuel_types |= *fuel_type;
        }
    }
    if fuel_types.is_none() {
        fuel_types = FuelTypeBitmask::Gasoline92;
    }
    fuel_types
}

/// Find the first element matching `selector` which reports a price adjustment.
pub fn find_news(html: &str, selector: &str) -> Result<Option<String>> {
    let selector =
        Selector::parse(selector).map_err(|err| anyhow!("invalid selector `{selector}`: {err}"))?;
    let dom = Html::parse_document(html);
    let news = dom
        .select(&selector)
        .map(|element| element.text().map(str::trim).collect::<String>())
        .find(|text| {
            text.contains(KEYWORD_PRICE)
                && KEYWORDS_ADJUSTMENT
                    .iter()
                    .any(|keyword| text.contains(keyword))
        });
    Ok(news)
}

/// Find and parse the adjustment news on a page.
pub fn read_report(
    html: &str,
    selector: &str,
    source: &str,
    url: &str,
    now: NaiveDateTime,
) -> Result<Option<NewsReport>> {
    let report = find_news(html, selector)?.map(|title| NewsReport {
        info: parse(&title, now),
        title,
        source: source.to_string(),
        url: url.to_string(),
    });
    Ok(report)
}
