//! The adjustment schedule document and the future adjustment dates read from it.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::{
    adjustment::{AdjustmentDate, CutoffMoment},
    news::NewsReport,
    trend::{Amount, Trend, TrendInfo},
};

/// The number of news items kept in the history.
pub const NEWS_HISTORY_LENGTH: usize = 30;

static NEWS_SCORE: u32 = 10;

/// The schedule document as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub adjustment_dates: Vec<AdjustmentDate>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(flatten)]
    pub trend_info: TrendInfo,
    #[serde(default)]
    pub last_types: Vec<String>,
    #[serde(default)]
    pub last_source: Option<String>,
    #[serde(default)]
    pub last_news: Option<String>,
    #[serde(default)]
    pub news_history: Vec<NewsHistoryItem>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_version() -> String {
    String::from("1.0")
}

fn default_description() -> String {
    String::from("Fuel price adjustment schedule")
}

/// A news item which once updated the schedule, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsHistoryItem {
    pub date: String,
    pub title: String,
    pub source: String,
    pub url: String,
    pub trend: Option<Trend>,
    pub amount: Option<Amount>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub score: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            adjustment_dates: vec![],
            last_update: None,
            trend_info: TrendInfo::default(),
            last_types: vec![],
            last_source: None,
            last_news: None,
            news_history: vec![],
            version: default_version(),
            description: default_description(),
        }
    }
}

impl Schedule {
    /// Load the schedule, an empty schedule if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "schedule does not exist, starting empty");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read schedule {}", path.display()))?;
        let schedule = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse schedule {}", path.display()))?;
        Ok(schedule)
    }

    /// Save the schedule, readers see either the old or the new document.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create a file next to {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("failed to write schedule {}", path.display()))?;
        file.persist(path)
            .with_context(|| format!("failed to replace schedule {}", path.display()))?;
        Ok(())
    }

    /// The adjustment dates on or after `today`, in ascending order.
    ///
    /// Entries with malformed dates cannot be ordered. They are put in front of the others, so
    /// the synthesizer reports them and none of the following dates is taken for the nearest one.
    pub fn future_dates(&self, today: NaiveDate) -> Vec<AdjustmentDate> {
        let mut malformed_dates = vec![];
        let mut future_dates: Vec<(CutoffMoment, &AdjustmentDate)> = vec![];
        for adjustment_date in &self.adjustment_dates {
            match adjustment_date.moment() {
                Ok(moment) if moment.date() >= today => future_dates.push((moment, adjustment_date)),
                Ok(_) => continue,
                Err(err) => {
                    warn!(date = %adjustment_date.date, %err, "malformed adjustment date");
                    malformed_dates.push(adjustment_date.clone());
                }
            }
        }
        future_dates.sort_by_key(|(moment, _)| *moment);
        malformed_dates.extend(
            future_dates
                .into_iter()
                .map(|(_, adjustment_date)| adjustment_date.clone()),
        );
        malformed_dates
    }

    /// Record a manual trend for one adjustment date.
    ///
    /// Returns `false` if the date is not part of the schedule.
    pub fn set_manual_trend(&mut self, date: &str, trend: Trend, amount: Option<Amount>) -> bool {
        let wanted = date.parse::<CutoffMoment>().ok();
        let Some(adjustment_date) = self.adjustment_dates.iter_mut().find(|adjustment_date| {
            adjustment_date.date == date
                || wanted.is_some_and(|wanted| adjustment_date.moment().ok() == Some(wanted))
        }) else {
            return false;
        };
        adjustment_date.trend = Some(trend);
        self.trend_info.manual_update = Some(adjustment_date.date.clone());
        self.trend_info.manual_trend = Some(trend);
        self.trend_info.manual_amount = amount;
        true
    }

    /// Take over the latest news as the scraped trend.
    pub fn apply_news(&mut self, report: &NewsReport) {
        let amount = report.info.amount.map(Amount::Number);
        let types = report.info.fuel_types.labels();
        self.last_update = Some(report.info.date.clone());
        self.trend_info.last_trend = report.info.trend;
        self.trend_info.last_amount = amount.clone();
        self.trend_info.last_news_url = Some(report.url.clone());
        self.last_types = types.clone();
        self.last_source = Some(report.source.clone());
        self.last_news = Some(report.title.clone());
        self.news_history.insert(
            0,
            NewsHistoryItem {
                date: report.info.date.clone(),
                title: report.title.clone(),
                source: report.source.clone(),
                url: report.url.clone(),
                trend: report.info.trend,
                amount,
                types,
                score: NEWS_SCORE,
            },
        );
        self.news_history.truncate(NEWS_HISTORY_LENGTH);
    }
}
