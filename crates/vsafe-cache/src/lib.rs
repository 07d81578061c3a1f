//! Versioned binary cache for per-subject aggregates.
//!
//! A full scan of the check-in export takes a long time, so its results are
//! persisted as a compact binary map from subject identifier to record. Every
//! record carries a version byte and every file starts with a format version;
//! any mismatch, truncation or trailing data is a hard error.
//!
//! # Example
//!
//! ```
//! use vsafe_cache::{CacheError, CacheMap, HealthcareVisits, RecordCache, VisitTally};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut cache = RecordCache::new(dir.path().join("visits.bin"));
//!
//! let computed: CacheMap<VisitTally> = cache
//!     .load_or_compute(|| {
//!         let mut tally = VisitTally::default();
//!         tally.record(HealthcareVisits::ER);
//!         Ok::<_, CacheError>(CacheMap::from([("R-1".to_string(), tally)]))
//!     })
//!     .unwrap();
//!
//! let reloaded: CacheMap<VisitTally> = cache
//!     .load_or_compute(|| -> Result<_, CacheError> { unreachable!() })
//!     .unwrap();
//! assert_eq!(reloaded, computed);
//! ```

mod cache;
mod codec;
mod error;
mod records;
mod store;

// === Error Types ===
pub use error::{CacheError, Result};

// === Codec ===
pub use codec::{BinaryRecord, Decoder, Encoder, NO_DATE, from_bytes, to_bytes};

// === Records ===
pub use records::{
    CheckinReport, Feeling, HealthChange, HealthImpact, HealthNow, HealthcareVisits,
    PregnancyStatus, Severity, SiteReaction, SubjectHistory, SymptomSeverities, SystemicReaction,
    VaccineDose, VisitTally,
};

// === Cache Files ===
pub use cache::{CacheMap, CachePhase, ProgressEvent, RecordCache, load_or_compute};
pub use store::{CACHE_FORMAT_VERSION, decode_map, encode_map, temp_path_for};
