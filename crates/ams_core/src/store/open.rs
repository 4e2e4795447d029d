//! Store bootstrap.
//!
//! # Responsibility
//! - Open (or create) the account file in read/write mode.
//! - Load the record-count header before any record access.
//!
//! # Invariants
//! - An empty file is a valid, empty store.
//! - A returned `RecordFile` always carries a non-negative count.

use super::file::RecordFile;
use super::layout::RECORD_COUNT_LENGTH;
use super::{StoreError, StoreResult};
use log::{error, info};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Instant;

/// Fixed location of the account file relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "accounts.dbf";

/// Opens the account file at `path` and reads its header.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<RecordFile> {
    let started_at = Instant::now();
    info!("event=store_open module=store status=start");

    let opened = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path.as_ref())
        .map_err(StoreError::from)
        .and_then(|mut file| {
            let count = read_header(&mut file)?;
            Ok(RecordFile::new(file, count))
        });

    match opened {
        Ok(store) => {
            info!(
                "event=store_open module=store status=ok duration_ms={} records={}",
                started_at.elapsed().as_millis(),
                store.record_count()
            );
            Ok(store)
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn read_header(file: &mut File) -> StoreResult<u32> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(0);
    }
    if len < RECORD_COUNT_LENGTH {
        return Err(StoreError::TruncatedHeader { len });
    }

    file.seek(SeekFrom::Start(0))?;
    let mut bytes = [0u8; 4];
    file.read_exact(&mut bytes)?;
    let value = i32::from_be_bytes(bytes);
    u32::try_from(value).map_err(|_| StoreError::InvalidHeader(value))
}
