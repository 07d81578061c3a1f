//! Cache file integration tests.

use std::cell::Cell;
use std::fs;

use vsafe_cache::{
    CacheError, CacheMap, CheckinReport, HealthcareVisits, RecordCache, Severity, SubjectHistory,
    VaccineDose, VisitTally, from_bytes, load_or_compute, temp_path_for, to_bytes,
};
use vsafe_date::CalendarDate;

fn date(text: &str) -> CalendarDate {
    CalendarDate::parse(text).unwrap()
}

fn history(reports: usize, doses: usize) -> SubjectHistory {
    let base = date("1/1/2021");
    let reports = (0..reports)
        .map(|i| {
            let mut report = CheckinReport::blank(base.checked_add_days(i as i32).unwrap());
            report.symptoms.fatigue = Severity::Moderate;
            report.vaccine_caused_health_issues = i % 2 == 1;
            report.healthcare_visits = HealthcareVisits::OUTPATIENT;
            if i == 0 {
                report.tested_positive = true;
                report.tested_positive_date = Some(date("12/30/2020"));
            }
            report
        })
        .collect();
    let doses = (0..doses)
        .map(|i| VaccineDose {
            date: base.checked_add_days(21 * i as i32).unwrap(),
            dose_number: i as u8 + 1,
        })
        .collect();
    SubjectHistory { reports, doses }
}

fn three_subjects() -> CacheMap<SubjectHistory> {
    CacheMap::from([
        ("R-0001".to_string(), history(0, 0)),
        ("R-0002".to_string(), history(1, 2)),
        ("R-\u{e9}3".to_string(), history(4, 1)),
    ])
}

#[test]
fn test_container_round_trips() {
    for (reports, doses) in [(0, 0), (1, 0), (0, 1), (5, 3)] {
        let value = history(reports, doses);
        let bytes = to_bytes(&value).unwrap();
        assert_eq!(from_bytes::<SubjectHistory>(&bytes).unwrap(), value);
    }
}

#[test]
fn test_store_and_reload_three_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache").join("healthlogs.bin");
    let entries = three_subjects();

    let mut cache = RecordCache::new(&path);
    cache.store(&entries).unwrap();
    assert!(path.exists());
    assert!(!temp_path_for(&path).exists());

    let reloaded: CacheMap<SubjectHistory> = cache.load().unwrap();
    assert_eq!(reloaded, entries);
}

#[test]
fn test_corrupted_version_byte_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("healthlogs.bin");
    let mut cache = RecordCache::new(&path);
    cache.store(&three_subjects()).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[0] = 0xFF;
    fs::write(&path, &bytes).unwrap();

    let err = cache.load::<SubjectHistory>().unwrap_err();
    assert!(err.is_format_error());
    assert!(err.to_string().contains("cache format version mismatch"));
}

#[test]
fn test_truncated_file_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("healthlogs.bin");
    let mut cache = RecordCache::new(&path);
    cache.store(&three_subjects()).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let err = cache.load::<SubjectHistory>().unwrap_err();
    assert!(matches!(err, CacheError::Truncated { .. }), "{err:?}");
}

#[test]
fn test_trailing_bytes_are_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visits.bin");
    let mut cache = RecordCache::new(&path);
    cache
        .store(&CacheMap::from([("R-1".to_string(), VisitTally::default())]))
        .unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes.push(0);
    fs::write(&path, &bytes).unwrap();

    let err = cache.load::<VisitTally>().unwrap_err();
    assert!(matches!(err, CacheError::TrailingBytes));
}

#[test]
fn test_load_or_compute_skips_compute_when_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visits.bin");
    let calls = Cell::new(0);

    let compute = || {
        calls.set(calls.get() + 1);
        let mut tally = VisitTally::default();
        tally.record(HealthcareVisits::HOSPITAL);
        Ok::<_, CacheError>(CacheMap::from([("R-1".to_string(), tally)]))
    };

    let first = load_or_compute(&path, compute).unwrap();
    let second = load_or_compute(&path, compute).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(first, second);
    assert_eq!(second["R-1"].hospital, 1);
}

#[test]
fn test_invalid_cache_is_not_recomputed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visits.bin");
    fs::write(&path, [1u8, 5, 0]).unwrap();

    let result: Result<CacheMap<VisitTally>, CacheError> =
        load_or_compute(&path, || panic!("compute must not run"));
    let err = result.unwrap_err();
    assert!(err.is_format_error());
    assert_eq!(fs::read(&path).unwrap(), [1u8, 5, 0]);
}
