//! Positioned I/O over the account file.

use super::layout::{record_offset, state_offset, RecordImage, RecordState, RECORD_LENGTH};
use super::StoreResult;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

/// Open account file plus its cached record count.
///
/// Every method seeks before it reads or writes, so callers never depend on
/// the current cursor position.
#[derive(Debug)]
pub struct RecordFile {
    file: File,
    record_count: u32,
}

impl RecordFile {
    pub(super) fn new(file: File, record_count: u32) -> Self {
        Self { file, record_count }
    }

    /// Total allocated slots, active and inactive.
    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    /// Reads the raw state value of slot `index`.
    pub fn read_state(&mut self, index: u32) -> StoreResult<i32> {
        self.file.seek(SeekFrom::Start(state_offset(index)))?;
        let mut bytes = [0u8; 4];
        self.file.read_exact(&mut bytes)?;
        Ok(i32::from_be_bytes(bytes))
    }

    /// Overwrites only the state field of slot `index`.
    pub fn write_state(&mut self, index: u32, state: RecordState) -> StoreResult<()> {
        self.file.seek(SeekFrom::Start(state_offset(index)))?;
        self.file.write_all(&state.to_value().to_be_bytes())?;
        Ok(())
    }

    /// Reads the full image of slot `index`.
    pub fn read_record(&mut self, index: u32) -> StoreResult<RecordImage> {
        self.file.seek(SeekFrom::Start(record_offset(index)))?;
        let mut image = [0u8; RECORD_LENGTH];
        self.file.read_exact(&mut image)?;
        Ok(image)
    }

    /// Writes `image` into the next free slot and bumps the header.
    ///
    /// Returns the slot index the record landed in. The record is written
    /// before the header, so a failed write leaves the count unchanged.
    pub fn append_record(&mut self, image: &RecordImage) -> StoreResult<u32> {
        let index = self.record_count;
        self.file.seek(SeekFrom::Start(record_offset(index)))?;
        self.file.write_all(image)?;

        let next = index + 1;
        self.write_header(next)?;
        self.record_count = next;
        Ok(index)
    }

    /// Flushes OS buffers for the backing file.
    pub fn sync(&mut self) -> StoreResult<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn write_header(&mut self, count: u32) -> StoreResult<()> {
        let value = i32::try_from(count).unwrap_or(i32::MAX);
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&value.to_be_bytes())?;
        Ok(())
    }
}
