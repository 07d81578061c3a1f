//! Load-or-compute cache of per-subject records.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::codec::BinaryRecord;
use crate::error::{CacheError, Result};
use crate::store::{decode_map, encode_map, open_buffered, with_path, write_atomic};

/// In-memory cache contents, keyed by subject identifier.
pub type CacheMap<V> = HashMap<String, V>;

/// Which direction a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePhase {
    Decode,
    Encode,
}

impl fmt::Display for CachePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => write!(f, "Reading cache"),
            Self::Encode => write!(f, "Writing cache"),
        }
    }
}

/// Periodic report from a cache load or store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: CachePhase,
    /// Entries handled so far.
    pub processed: usize,
    /// Entries in the whole cache.
    pub total: usize,
}

struct Progress {
    interval: usize,
    callback: Box<dyn FnMut(ProgressEvent)>,
}

impl Progress {
    fn tick(&mut self, phase: CachePhase, processed: usize, total: usize) {
        if processed % self.interval == 0 {
            (self.callback)(ProgressEvent {
                phase,
                processed,
                total,
            });
        }
    }
}

/// A cache file holding one map of subject records.
///
/// The file is created once, after the first computation finishes, and only
/// read afterwards. A cache that fails to decode is an error: it is never
/// silently replaced.
pub struct RecordCache {
    path: PathBuf,
    progress: Option<Progress>,
}

impl RecordCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            progress: None,
        }
    }

    /// Call `callback` every `interval` entries while encoding or decoding.
    ///
    /// An interval of zero disables progress reporting.
    pub fn with_progress(
        mut self,
        interval: usize,
        callback: impl FnMut(ProgressEvent) + 'static,
    ) -> Self {
        self.progress = (interval > 0).then(|| Progress {
            interval,
            callback: Box::new(callback),
        });
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if a cache file is present.
    pub fn exists(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io("inspect", &self.path, e)),
        }
    }

    /// Decode the whole cache file.
    pub fn load<V: BinaryRecord>(&mut self) -> Result<CacheMap<V>> {
        let reader = open_buffered(&self.path)?;
        let total = Cell::new(0);
        let progress = &mut self.progress;
        let entries = decode_map(
            reader,
            |count| total.set(count),
            |processed| {
                if let Some(progress) = progress.as_mut() {
                    progress.tick(CachePhase::Decode, processed, total.get());
                }
            },
        )
        .map_err(|e| with_path(e, "read", &self.path))?;

        tracing::info!(
            "Loaded {} {} entries from {}",
            entries.len(),
            V::NAME,
            self.path.display()
        );
        Ok(entries)
    }

    /// Write `entries` to the cache path, replacing it atomically.
    pub fn store<V: BinaryRecord>(&mut self, entries: &CacheMap<V>) -> Result<()> {
        let total = entries.len();
        let progress = &mut self.progress;
        write_atomic(&self.path, |writer| {
            encode_map(writer, entries, |processed| {
                if let Some(progress) = progress.as_mut() {
                    progress.tick(CachePhase::Encode, processed, total);
                }
            })
        })?;

        tracing::info!(
            "Saved {} {} entries to {}",
            total,
            V::NAME,
            self.path.display()
        );
        Ok(())
    }

    /// Return the cached map, or compute it and persist it first.
    ///
    /// An existing cache is always decoded and never recomputed, even when it
    /// is invalid. `compute` runs only when no cache file exists; its result
    /// is written before being returned.
    pub fn load_or_compute<V, E, F>(&mut self, compute: F) -> std::result::Result<CacheMap<V>, E>
    where
        V: BinaryRecord,
        E: From<CacheError>,
        F: FnOnce() -> std::result::Result<CacheMap<V>, E>,
    {
        if self.exists()? {
            return Ok(self.load()?);
        }

        tracing::info!(
            "No cache at {}; computing {} entries",
            self.path.display(),
            V::NAME
        );
        let entries = compute()?;
        self.store(&entries)?;
        Ok(entries)
    }
}

/// [`RecordCache::load_or_compute`] without progress reporting.
pub fn load_or_compute<V, E, F>(path: &Path, compute: F) -> std::result::Result<CacheMap<V>, E>
where
    V: BinaryRecord,
    E: From<CacheError>,
    F: FnOnce() -> std::result::Result<CacheMap<V>, E>,
{
    RecordCache::new(path).load_or_compute(compute)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::records::VisitTally;

    fn tallies(n: u32) -> CacheMap<VisitTally> {
        (0..n)
            .map(|i| {
                (
                    format!("R-{i}"),
                    VisitTally {
                        er: i,
                        ..VisitTally::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_progress_events() {
        let dir = tempfile::tempdir().unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut cache = RecordCache::new(dir.path().join("visits.bin"))
            .with_progress(2, move |event| sink.borrow_mut().push(event));

        cache.store(&tallies(5)).unwrap();
        let loaded: CacheMap<VisitTally> = cache.load().unwrap();
        assert_eq!(loaded.len(), 5);

        let events = events.borrow();
        let phases: Vec<_> = events.iter().map(|e| (e.phase, e.processed)).collect();
        assert_eq!(
            phases,
            vec![
                (CachePhase::Encode, 2),
                (CachePhase::Encode, 4),
                (CachePhase::Decode, 2),
                (CachePhase::Decode, 4),
            ]
        );
        assert!(events.iter().all(|e| e.total == 5));
    }

    #[test]
    fn test_exists() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecordCache::new(dir.path().join("absent.bin"));
        assert!(!cache.exists().unwrap());
        assert_eq!(cache.path(), dir.path().join("absent.bin"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = RecordCache::new(dir.path().join("absent.bin"));
        let err = cache.load::<VisitTally>().unwrap_err();
        assert!(matches!(err, CacheError::Io { operation: "open", .. }));
    }

    #[test]
    fn test_compute_error_is_returned_and_nothing_is_written() {
        #[derive(Debug)]
        enum ScanError {
            Cache,
            Source,
        }
        impl From<CacheError> for ScanError {
            fn from(_: CacheError) -> Self {
                Self::Cache
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visits.bin");
        let result: std::result::Result<CacheMap<VisitTally>, ScanError> =
            load_or_compute(&path, || Err(ScanError::Source));
        assert!(matches!(result, Err(ScanError::Source)));
        assert!(!path.exists());
    }
}
