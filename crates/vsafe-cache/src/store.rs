//! Cache file layout and atomic persistence.
//!
//! Format:
//! - 1 byte: cache format version ([`CACHE_FORMAT_VERSION`])
//! - 4 bytes: entry count (u32 little-endian)
//! - per entry: length-prefixed UTF-8 subject key, then the value record
//!
//! Entries are written in key order so the same map always produces the
//! same bytes.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::codec::{BinaryRecord, Decoder, Encoder};
use crate::error::{CacheError, Result};

/// Version byte at the start of every cache file.
pub const CACHE_FORMAT_VERSION: u8 = 1;

const IO_BUFFER_SIZE: usize = 1024 * 1024;

/// Encode `entries` to `writer`, calling `on_entry` with the running count.
pub fn encode_map<W, V>(
    writer: W,
    entries: &HashMap<String, V>,
    mut on_entry: impl FnMut(usize),
) -> Result<W>
where
    W: Write,
    V: BinaryRecord,
{
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort_unstable();

    let mut encoder = Encoder::new(writer);
    encoder.write_u8(CACHE_FORMAT_VERSION)?;
    encoder.write_len(keys.len())?;
    for (idx, key) in keys.into_iter().enumerate() {
        encoder.write_str(key)?;
        entries[key].encode(&mut encoder)?;
        on_entry(idx + 1);
    }
    Ok(encoder.into_inner())
}

/// Decode a full cache from `reader`.
///
/// `on_start` receives the entry count from the header, `on_entry` the
/// running count. The stream must end exactly after the last entry.
pub fn decode_map<R, V>(
    reader: R,
    on_start: impl FnOnce(usize),
    mut on_entry: impl FnMut(usize),
) -> Result<HashMap<String, V>>
where
    R: Read,
    V: BinaryRecord,
{
    let mut decoder = Decoder::new(reader);
    decoder.expect_version("cache", CACHE_FORMAT_VERSION)?;
    let count = decoder.read_len()?;
    on_start(count);

    let mut entries = HashMap::with_capacity(count.min(1 << 16));
    for idx in 0..count {
        let key = decoder.read_string()?;
        let value = V::decode(&mut decoder)?;
        match entries.entry(key) {
            Entry::Occupied(_) => return Err(CacheError::DuplicateKey),
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
        on_entry(idx + 1);
    }
    decoder.finish()?;
    Ok(entries)
}

/// Path of the temporary sibling a cache is staged in before the rename.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write a file through a temporary sibling and rename it into place.
///
/// The target is only replaced after `write` succeeds and the data is synced.
/// On any failure the temporary file is removed.
pub fn write_atomic(
    path: &Path,
    write: impl FnOnce(BufWriter<File>) -> Result<BufWriter<File>>,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| CacheError::io("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_temp(&temp_path, write).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| CacheError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });

    if result.is_err() && fs::remove_file(&temp_path).is_ok() {
        tracing::debug!("Removed incomplete cache {}", temp_path.display());
    }
    result
}

fn write_temp(
    temp_path: &Path,
    write: impl FnOnce(BufWriter<File>) -> Result<BufWriter<File>>,
) -> Result<()> {
    let file = File::create(temp_path).map_err(|e| CacheError::io("create", temp_path, e))?;
    tracing::debug!("Writing cache to temp file {}", temp_path.display());

    let writer = write(BufWriter::with_capacity(IO_BUFFER_SIZE, file))
        .map_err(|e| with_path(e, "write", temp_path))?;
    let file = writer
        .into_inner()
        .map_err(|e| CacheError::io("write", temp_path, e.into_error()))?;
    file.sync_all()
        .map_err(|e| CacheError::io("sync", temp_path, e))?;
    Ok(())
}

/// Open a cache file for buffered reading.
pub fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| CacheError::io("open", path, e))?;
    Ok(BufReader::with_capacity(IO_BUFFER_SIZE, file))
}

/// Attach `path` to a bare stream error.
pub fn with_path(err: CacheError, operation: &'static str, path: &Path) -> CacheError {
    match err {
        CacheError::Stream(source) => CacheError::io(operation, path, source),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::VisitTally;

    fn sample() -> HashMap<String, VisitTally> {
        HashMap::from([
            (
                "R-2".to_string(),
                VisitTally {
                    er: 1,
                    ..VisitTally::default()
                },
            ),
            ("R-1".to_string(), VisitTally::default()),
        ])
    }

    #[test]
    fn test_header_and_key_order() {
        let bytes = encode_map(Vec::new(), &sample(), |_| {}).unwrap();
        assert_eq!(bytes[0], CACHE_FORMAT_VERSION);
        assert_eq!(&bytes[1..5], &[2, 0, 0, 0]);
        // first key is "R-1" regardless of hash order
        assert_eq!(&bytes[5..9], &[3, 0, 0, 0]);
        assert_eq!(&bytes[9..12], b"R-1");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let first = encode_map(Vec::new(), &sample(), |_| {}).unwrap();
        let second = encode_map(Vec::new(), &sample(), |_| {}).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_reports_counts() {
        let bytes = encode_map(Vec::new(), &sample(), |_| {}).unwrap();
        let mut total = 0;
        let mut seen = Vec::new();
        let map: HashMap<String, VisitTally> =
            decode_map(bytes.as_slice(), |count| total = count, |n| seen.push(n)).unwrap();
        assert_eq!(map, sample());
        assert_eq!(total, 2);
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_key() {
        let mut encoder = Encoder::new(Vec::new());
        encoder.write_u8(CACHE_FORMAT_VERSION).unwrap();
        encoder.write_len(2).unwrap();
        for _ in 0..2 {
            encoder.write_str("R-1").unwrap();
            VisitTally::default().encode(&mut encoder).unwrap();
        }
        let bytes = encoder.into_inner();

        let result: Result<HashMap<String, VisitTally>> =
            decode_map(bytes.as_slice(), |_| {}, |_| {});
        assert!(matches!(result, Err(CacheError::DuplicateKey)));
    }

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for(Path::new("cache/healthlogs.bin")),
            PathBuf::from("cache/healthlogs.bin.tmp")
        );
    }

    #[test]
    fn test_failed_write_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("visits.bin");

        let result = write_atomic(&path, |_| Err(CacheError::LengthOverflow { len: 0 }));
        assert!(matches!(result, Err(CacheError::LengthOverflow { .. })));
        assert!(!path.exists());
        assert!(!temp_path_for(&path).exists());
    }
}
