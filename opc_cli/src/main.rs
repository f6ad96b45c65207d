use std::{env::current_dir, fs, path::PathBuf};

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use opc_core::{
    adjustment::timezone,
    calendar::{self, FILE_NAME},
    ical::generator::Emitter,
    news::{self, SEARCH_SELECTOR},
    schedule::Schedule,
    synthesizer::{DetailPolicy, Synthesizer},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// write the calendar of a schedule to the current directory
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// read the adjustment news from a downloaded page into a schedule
    Import {
        #[command(flatten)]
        args: ImportArgs,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// the schedule document
    pub schedule: PathBuf,
    /// how many of the nearest adjustments show the expected trend
    #[arg(long, default_value_t = 1)]
    pub detailed_events: usize,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// the schedule document
    pub schedule: PathBuf,
    /// the downloaded HTML page
    pub page: PathBuf,
    /// the name of the site the page is from
    #[arg(long)]
    pub source: String,
    /// the address the page was downloaded from
    #[arg(long)]
    pub url: String,
    /// the CSS selector of the elements which may contain the news
    #[arg(long, default_value = SEARCH_SELECTOR)]
    pub selector: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Arguments::parse();
    match args.command {
        Command::Generate { args } => generate(args)?,
        Command::Import { args } => import(args)?,
    };
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let schedule = Schedule::load(&args.schedule)?;
    let synthesizer = Synthesizer::new(DetailPolicy::leading(args.detailed_events));
    let (calendar, rejected) = calendar::get(&schedule, &synthesizer, Utc::now());
    for entry in &rejected {
        warn!(index = entry.index, date = %entry.raw, err = %entry.error, "adjustment date left out of the calendar");
    }
    let mut path = current_dir()?;
    path.push(FILE_NAME);
    fs::write(&path, calendar.generate())?;
    info!(path = %path.display(), events = calendar.events.len(), "calendar written");
    Ok(())
}

fn import(args: ImportArgs) -> Result<()> {
    let html = fs::read_to_string(&args.page)?;
    let now = Utc::now().with_timezone(&timezone()).naive_local();
    let Some(report) = news::read_report(&html, &args.selector, &args.source, &args.url, now)? else {
        bail!("no adjustment news found in {}", args.page.display());
    };
    info!(title = %report.title, date = %report.info.date, "adjustment news found");
    let mut schedule = Schedule::load(&args.schedule)?;
    schedule.apply_news(&report);
    schedule.save(&args.schedule)?;
    Ok(())
}
