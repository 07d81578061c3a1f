//! End-to-end report runs over small exports, with caches on disk.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vsafe_cache::{CacheMap, RecordCache, SubjectHistory};
use vsafe_cli::report::values::{ValueScanOptions, scan_values};
use vsafe_cli::report::visits::{VisitCounts, VisitSummary};
use vsafe_cli::report::{load_visit_tallies, vaccine_issue_summary};
use vsafe_cli::summary::{visit_rows, write_toc, write_values};
use vsafe_csv::{CsvHeader, CsvReader};

const CHECKIN: &str = "\
REGISTRANT_CODE,SURVEY_START_DATE,VACCINE_CAUSED_HEALTH_ISSUES,HEALTHCARE_VISITS
R1,1/10/2021,No,Hospitalization
R1,1/5/2021,No,
R1,1/20/2021,Yes,None
R1,1/25/2021,No,Emergency room or emergency department visit
R2,1/8/2021,No,Outpatient clinic or urgent care clinic visit
R3,1/9/2021,Yes,
R4,1/9/2021,No,N/A
";

const VACCINATIONS: &str = "\
REGISTRANT_CODE,VAX_TYPE,DOSE_NUMBER,VACCINATION_DATE
R1,MODERNA,1,1/1/2021
R1,MODERNA,2,1/29/2021
R9,PFIZER,1,1/2/2021
";

struct Exports {
    dir: TempDir,
    checkin: PathBuf,
    vaccinations: PathBuf,
}

impl Exports {
    fn new(checkin: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let checkin_path = dir.path().join("checkin.csv");
        let vaccinations = dir.path().join("vaccinations.csv");
        fs::write(&checkin_path, checkin).unwrap();
        fs::write(&vaccinations, VACCINATIONS).unwrap();
        Self {
            dir,
            checkin: checkin_path,
            vaccinations,
        }
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.dir.path().join("cache").join(name)
    }
}

fn open(path: &Path) -> vsafe_csv::Result<CsvReader<File>> {
    CsvReader::open(path)
}

fn never_open(path: &Path) -> vsafe_csv::Result<CsvReader<File>> {
    panic!("{} read although a cache exists", path.display())
}

#[test]
fn test_visits_report_is_cached_after_first_scan() {
    let exports = Exports::new(CHECKIN);
    let cache_path = exports.cache_path("hinteraction.bin");

    let mut cache = RecordCache::new(&cache_path);
    let tallies = load_visit_tallies(&mut cache, &exports.checkin, open).unwrap();
    assert!(cache_path.exists());
    assert_eq!(tallies.len(), 4);
    assert_eq!(tallies["R1"].hospital, 1);
    assert_eq!(tallies["R1"].er, 1);

    let summary = VisitSummary::from_tallies(&tallies);
    assert_eq!(summary.total_subjects, 4);
    assert_eq!(
        summary.counts,
        VisitCounts {
            any: 2,
            er: 1,
            hospital: 1,
            outpatient: 1,
            telehealth: 0,
        }
    );
    assert_eq!(visit_rows(&summary)[0].2, "50.00%");

    let mut cache = RecordCache::new(&cache_path);
    let reloaded = load_visit_tallies(&mut cache, &exports.checkin, never_open).unwrap();
    assert_eq!(reloaded, tallies);
}

#[test]
fn test_history_counts_visits_from_first_vaccine_flag() {
    let exports = Exports::new(CHECKIN);
    let visits_path = exports.cache_path("hinteraction.bin");
    let history_path = exports.cache_path("healthlogs.bin");

    let tallies =
        load_visit_tallies(&mut RecordCache::new(&visits_path), &exports.checkin, open).unwrap();
    let summary = vaccine_issue_summary(
        &mut RecordCache::new(&history_path),
        &tallies,
        &exports.checkin,
        &exports.vaccinations,
        open,
    )
    .unwrap();

    assert_eq!(summary.title, "Health care interactions after vaccine flag set");
    assert_eq!(summary.total_subjects, 4);
    assert_eq!(
        summary.counts,
        VisitCounts {
            any: 1,
            er: 1,
            ..VisitCounts::default()
        }
    );

    let histories: CacheMap<SubjectHistory> =
        RecordCache::new(&history_path).load().unwrap();
    assert_eq!(histories.len(), 2);
    let r1 = &histories["R1"];
    let dates: Vec<String> = r1.reports.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, ["1/5/2021", "1/10/2021", "1/20/2021", "1/25/2021"]);
    assert_eq!(r1.doses.len(), 2);
    assert_eq!(r1.doses[0].dose_number, 1);
    assert!(histories["R2"].doses.is_empty());

    let again = vaccine_issue_summary(
        &mut RecordCache::new(&history_path),
        &tallies,
        &exports.checkin,
        &exports.vaccinations,
        never_open,
    )
    .unwrap();
    assert_eq!(again, summary);
}

#[test]
fn test_unknown_answer_names_file_and_row() {
    let exports = Exports::new(
        "REGISTRANT_CODE,HEALTHCARE_VISITS\n\
         R1,Hospitalization\n\
         R2,House call\n",
    );
    let cache_path = exports.cache_path("hinteraction.bin");
    let err = load_visit_tallies(&mut RecordCache::new(&cache_path), &exports.checkin, open)
        .unwrap_err();

    let message = err.to_string();
    assert!(message.ends_with("checkin.csv, row 2"), "{message}");
    let cause = std::error::Error::source(&err).unwrap().to_string();
    assert_eq!(cause, "unknown value 'House call' in column HEALTHCARE_VISITS");
    assert!(!cache_path.exists());
}

#[test]
fn test_missing_export_is_reported() {
    let exports = Exports::new(CHECKIN);
    let missing = exports.dir.path().join("absent.csv");
    let err = load_visit_tallies(
        &mut RecordCache::new(exports.cache_path("hinteraction.bin")),
        &missing,
        open,
    )
    .unwrap_err();
    assert!(err.to_string().contains("absent.csv"), "{err}");
}

#[test]
fn test_toc_listing() {
    let header = CsvHeader::new(vec![
        "REGISTRANT_CODE".to_string(),
        "SURVEY_START_DATE".to_string(),
        "HEALTHCARE_VISITS".to_string(),
    ]);
    let mut out = Vec::new();
    write_toc(&mut out, Path::new("data/checkin.csv"), &header).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("\n\n"));
    insta::assert_snapshot!(text.trim_end(), @r"
    data/checkin.csv
        REGISTRANT_CODE
        SURVEY_START_DATE
        HEALTHCARE_VISITS
    ");
}

#[test]
fn test_values_listing() {
    let options = ValueScanOptions {
        skip_columns: 2,
        max_values: 3,
        ..ValueScanOptions::default()
    };
    let mut reader = CsvReader::new(CHECKIN.as_bytes());
    let scan = scan_values(&mut reader, Path::new("checkin.csv"), &options).unwrap();
    assert_eq!(scan.rows, 7);

    let mut out = Vec::new();
    write_values(&mut out, &scan).unwrap();
    let text = String::from_utf8(out).unwrap();
    insta::assert_snapshot!(text.trim_end(), @r#"
    # rows 7
    
    Column 2: VACCINE_CAUSED_HEALTH_ISSUES
        "No"
        "Yes"
    
    Column 3: HEALTHCARE_VISITS
        (too many distinct values)
    "#);
}
