use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};
use vsafe_cache::{CacheError, RecordCache};
use vsafe_cli::report::values::{ValueScanOptions, scan_values};
use vsafe_cli::report::visits::VisitSummary;
use vsafe_cli::report::{ReportError, load_visit_tallies, vaccine_issue_summary};
use vsafe_cli::summary::{write_toc, write_values};
use vsafe_csv::CsvReader;

use crate::cli::{HistoryArgs, TocArgs, ValuesArgs, VisitsArgs};
use crate::progress::Spinner;

/// Progress output shared by the readers and caches of one command.
struct Scan {
    interval: u64,
    spinner: Spinner,
}

impl Scan {
    fn new(interval: u64, message: &str) -> Self {
        let enabled = interval > 0 && io::stderr().is_terminal();
        Self {
            interval,
            spinner: Spinner::new(enabled, message),
        }
    }

    fn open(&self, path: &Path) -> vsafe_csv::Result<CsvReader<File>> {
        self.spinner
            .set_message(format!("Reading {}", path.display()));
        Ok(CsvReader::open(path)?.with_progress(self.interval, self.spinner.rows()))
    }

    fn cache(&self, path: &Path) -> RecordCache {
        let interval = usize::try_from(self.interval).unwrap_or(usize::MAX);
        RecordCache::new(path).with_progress(interval, self.spinner.cache())
    }
}

impl Drop for Scan {
    fn drop(&mut self) {
        self.spinner.finish();
    }
}

pub fn run_toc(args: &TocArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in &args.files {
        let mut reader =
            CsvReader::open(path).with_context(|| format!("open {}", path.display()))?;
        let header = reader
            .read_header()
            .with_context(|| format!("read header of {}", path.display()))?;
        write_toc(&mut out, path, &header)?;
    }
    out.flush()?;
    Ok(())
}

pub fn run_visits(args: &VisitsArgs, progress_interval: u64) -> Result<VisitSummary> {
    let _span = info_span!("visits").entered();
    let scan = Scan::new(progress_interval, "Health care interactions");
    let mut cache = scan.cache(&args.cache);
    let tallies = load_visit_tallies(&mut cache, &args.source.checkin, |path| scan.open(path))
        .with_context(|| format!("visit tallies ({})", args.cache.display()))?;
    info!(subjects = tallies.len(), "visit tallies ready");
    Ok(VisitSummary::from_tallies(&tallies))
}

pub fn run_history(args: &HistoryArgs, progress_interval: u64) -> Result<VisitSummary> {
    let _span = info_span!("history").entered();
    let scan = Scan::new(progress_interval, "Subject histories");
    let mut visits_cache = scan.cache(&args.visits_cache);
    let tallies =
        load_visit_tallies(&mut visits_cache, &args.source.checkin, |path| scan.open(path))
            .with_context(|| format!("visit tallies ({})", args.visits_cache.display()))?;

    let mut history_cache = scan.cache(&args.cache);
    vaccine_issue_summary(
        &mut history_cache,
        &tallies,
        &args.source.checkin,
        &args.vaccinations,
        |path| scan.open(path),
    )
    .with_context(|| format!("subject histories ({})", args.cache.display()))
}

pub fn run_values(args: &ValuesArgs, progress_interval: u64) -> Result<()> {
    let _span = info_span!("values").entered();
    let scan = Scan::new(progress_interval, "Distinct values");
    let mut reader = scan
        .open(&args.file)
        .with_context(|| format!("open {}", args.file.display()))?;
    let options = ValueScanOptions {
        skip_columns: args.skip_columns,
        max_values: args.max_values,
        ..ValueScanOptions::default()
    };
    let result = scan_values(&mut reader, &args.file, &options)?;
    drop(scan);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_values(&mut out, &result)?;
    out.flush()?;
    Ok(())
}

/// A hint for resolving a failed cache read or write, if the error has one.
pub fn suggestion(error: &anyhow::Error) -> Option<String> {
    error.chain().find_map(|cause| {
        if let Some(ReportError::Cache(e)) = cause.downcast_ref::<ReportError>() {
            return e.suggestion();
        }
        cause.downcast_ref::<CacheError>().and_then(CacheError::suggestion)
    })
}
