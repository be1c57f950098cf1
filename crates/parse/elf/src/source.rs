//! Bounds-checked access to the raw bytes of an ELF image.
//!
//! Every decoder reads through [`ByteSource`], so no offset computed from
//! file contents is ever used to index the buffer without a check first.

use crate::error::{DecodeError, Structure};

/// Read a little-endian `u16` from `data` at byte offset `off`.
///
/// # Panics
///
/// Panics if `off + 2 > data.len()`. Callers must bounds-check first.
pub(crate) fn le_u16(data: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([data[off], data[off + 1]])
}

/// Read a little-endian `u32` from `data` at byte offset `off`.
///
/// # Panics
///
/// Panics if `off + 4 > data.len()`. Callers must bounds-check first.
pub(crate) fn le_u32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

/// A borrowed, already-loaded ELF image.
///
/// The source never copies or mutates the buffer; it only hands out
/// sub-slices after checking them against the buffer length.
#[derive(Debug, Clone, Copy)]
pub struct ByteSource<'a> {
    data: &'a [u8],
}

impl<'a> ByteSource<'a> {
    /// Wraps a caller-owned byte buffer.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `length` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::OutOfBounds`] if the range does not lie
    /// entirely within the buffer (including on arithmetic overflow).
    pub fn read(&self, offset: usize, length: usize) -> Result<&'a [u8], DecodeError> {
        match offset.checked_add(length) {
            Some(end) if end <= self.len() => Ok(&self.data[offset..end]),
            _ => Err(DecodeError::OutOfBounds {
                offset,
                length,
                available: self.data.len(),
            }),
        }
    }

    /// Reads a fixed-size on-disk record, reporting a short buffer as
    /// [`DecodeError::TruncatedInput`] for `structure`.
    pub(crate) fn record(
        &self,
        structure: Structure,
        offset: usize,
        size: usize,
    ) -> Result<Record<'a>, DecodeError> {
        self.read(offset, size)
            .map(|bytes| Record { bytes })
            .map_err(|_| DecodeError::TruncatedInput {
                structure,
                offset,
                needed: size,
                available: self.data.len().saturating_sub(offset),
            })
    }
}

/// A fixed-size record whose length has already been validated.
///
/// Field offsets passed to the accessors are relative to the start of the
/// record and are compile-time constants of the ELF32 layout.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    bytes: &'a [u8],
}

impl<'a> Record<'a> {
    pub(crate) fn u8(&self, off: usize) -> u8 {
        self.bytes[off]
    }

    pub(crate) fn u16(&self, off: usize) -> u16 {
        le_u16(self.bytes, off)
    }

    pub(crate) fn u32(&self, off: usize) -> u32 {
        le_u32(self.bytes, off)
    }

    pub(crate) fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}
