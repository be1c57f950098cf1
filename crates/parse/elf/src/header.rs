//! ELF32 file header decoding.
//!
//! Decodes the 52-byte file header with safe field extraction and exposes the
//! program/section table geometry that drives the table decoders.

use alloc::vec::Vec;

use crate::error::{DecodeError, Structure};
use crate::ident::{Identification, decode_identification};
use crate::source::{ByteSource, Record};
use crate::translate::{Class, Endianness, Machine, ObjectType};

/// Size of an ELF32 file header (16 ident bytes + 36 fixed bytes).
pub const ELF32_EHDR_SIZE: usize = 52;

/// Size of an ELF32 program header entry.
pub const ELF32_PHDR_SIZE: usize = 32;

/// Size of an ELF32 section header entry.
pub const ELF32_SHDR_SIZE: usize = 40;

/// Section index meaning "no section" (`SHN_UNDEF`).
pub const SHN_UNDEF: u16 = 0;

const E_TYPE: usize = 16;
const E_MACHINE: usize = 18;
const E_VERSION: usize = 20;
const E_ENTRY: usize = 24;
const E_PHOFF: usize = 28;
const E_SHOFF: usize = 32;
const E_FLAGS: usize = 36;
const E_EHSIZE: usize = 40;
const E_PHENTSIZE: usize = 42;
const E_PHNUM: usize = 44;
const E_SHENTSIZE: usize = 46;
const E_SHNUM: usize = 48;
const E_SHSTRNDX: usize = 50;

/// On-disk layout used to decode everything after `e_ident`.
///
/// Only ELF32 little-endian records exist so far. An `Elf64Le` variant would
/// slot in here; the table decoders already take their record size from the
/// layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Layout {
    /// 32-bit fields, little-endian.
    Elf32Le,
}

impl Layout {
    /// Selects the layout for an identification.
    ///
    /// Only ELF32 little-endian has a decoder. Any other class/encoding pair
    /// is read with the same layout.
    #[must_use]
    #[expect(clippy::match_same_arms, reason = "one layout per class/encoding pair")]
    pub fn for_identification(ident: &Identification) -> Self {
        match (ident.class, ident.endianness) {
            (Class::Elf32, Endianness::Little) => Self::Elf32Le,
            (_, _) => Self::Elf32Le,
        }
    }

    /// Size of one program header record.
    #[must_use]
    pub const fn program_header_size(self) -> usize {
        match self {
            Self::Elf32Le => ELF32_PHDR_SIZE,
        }
    }

    /// Size of one section header record.
    #[must_use]
    pub const fn section_header_size(self) -> usize {
        match self {
            Self::Elf32Le => ELF32_SHDR_SIZE,
        }
    }
}

/// Decoded ELF32 file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileHeader {
    /// Decoded `e_ident` bytes.
    pub identification: Identification,
    /// `e_type`.
    pub object_type: ObjectType,
    /// `e_machine`.
    pub machine: Machine,
    /// `e_version`.
    pub version: u32,
    /// `e_entry`: virtual address of the entry point.
    pub entry_point: u32,
    /// `e_phoff`: file offset of the program header table.
    pub program_header_offset: u32,
    /// `e_shoff`: file offset of the section header table.
    pub section_header_offset: u32,
    /// `e_flags`: processor-specific flags.
    pub flags: u32,
    /// `e_ehsize`.
    pub header_size: u16,
    /// `e_phentsize`: stride of the program header table.
    pub program_header_entry_size: u16,
    /// `e_phnum`.
    pub program_header_count: u16,
    /// `e_shentsize`: stride of the section header table.
    pub section_header_entry_size: u16,
    /// `e_shnum`.
    pub section_header_count: u16,
    /// `e_shstrndx`: index of the section name string table.
    pub section_header_string_index: u16,
}

/// Geometry of a header table: where it starts, its stride, and its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// File offset of entry 0.
    pub offset: u32,
    /// Distance between consecutive entries.
    pub entry_size: u16,
    /// Number of entries.
    pub count: u16,
}

impl TableLayout {
    /// File offset of entry `index`.
    #[must_use]
    pub fn entry_offset(&self, index: u16) -> u64 {
        u64::from(self.offset) + u64::from(index) * u64::from(self.entry_size)
    }

    /// One past the last byte covered by the table.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.entry_offset(self.count)
    }
}

impl FileHeader {
    /// Layout used to decode the tables.
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::for_identification(&self.identification)
    }

    /// Geometry of the program header table.
    #[must_use]
    pub fn program_table(&self) -> TableLayout {
        TableLayout {
            offset: self.program_header_offset,
            entry_size: self.program_header_entry_size,
            count: self.program_header_count,
        }
    }

    /// Geometry of the section header table.
    #[must_use]
    pub fn section_table(&self) -> TableLayout {
        TableLayout {
            offset: self.section_header_offset,
            entry_size: self.section_header_entry_size,
            count: self.section_header_count,
        }
    }

    /// Returns `false` when `e_shstrndx` is `SHN_UNDEF`.
    #[must_use]
    pub fn has_string_table(&self) -> bool {
        self.section_header_string_index != SHN_UNDEF
    }
}

/// Decode the ELF32 file header at the start of `data`.
///
/// Object type and machine codes without a name decode to `Unknown(code)`.
/// The extents of the program and section header tables are not checked
/// here; each table decoder checks its whole table before reading it.
///
/// # Errors
///
/// - [`DecodeError::TruncatedInput`] if `data` is shorter than the header.
/// - [`DecodeError::NotAnElfFile`] if the magic bytes do not match.
pub fn decode_file_header(data: &[u8]) -> Result<FileHeader, DecodeError> {
    let identification = decode_identification(data)?;
    if !identification.magic_valid {
        return Err(DecodeError::NotAnElfFile {
            magic: [data[0], data[1], data[2], data[3]],
        });
    }

    let hdr = ByteSource::new(data).record(Structure::FileHeader, 0, ELF32_EHDR_SIZE)?;

    match Layout::for_identification(&identification) {
        Layout::Elf32Le => Ok(FileHeader {
            identification,
            object_type: ObjectType::from_raw(hdr.u16(E_TYPE)),
            machine: Machine::from_raw(hdr.u16(E_MACHINE)),
            version: hdr.u32(E_VERSION),
            entry_point: hdr.u32(E_ENTRY),
            program_header_offset: hdr.u32(E_PHOFF),
            section_header_offset: hdr.u32(E_SHOFF),
            flags: hdr.u32(E_FLAGS),
            header_size: hdr.u16(E_EHSIZE),
            program_header_entry_size: hdr.u16(E_PHENTSIZE),
            program_header_count: hdr.u16(E_PHNUM),
            section_header_entry_size: hdr.u16(E_SHENTSIZE),
            section_header_count: hdr.u16(E_SHNUM),
            section_header_string_index: hdr.u16(E_SHSTRNDX),
        }),
    }
}

/// Walks `table` in file order, decoding each `record_size`-byte entry.
///
/// The whole table extent (`count * entry_size` bytes from `offset`) must lie
/// within `source`; a short buffer is reported as truncation of `whole` before
/// anything is allocated. Each entry is then read at its stride, and an entry
/// whose record overruns the buffer (a stride smaller than the record) is
/// reported through `entry(index)`.
pub(crate) fn walk_table<'a, T>(
    source: ByteSource<'a>,
    table: TableLayout,
    record_size: usize,
    whole: Structure,
    entry: fn(u16) -> Structure,
    mut decode: impl FnMut(Record<'a>) -> T,
) -> Result<Vec<T>, DecodeError> {
    if table.count == 0 {
        return Ok(Vec::new());
    }

    let offset = usize::try_from(table.offset).unwrap_or(usize::MAX);
    let end = usize::try_from(table.end()).unwrap_or(usize::MAX);
    if end > source.len() {
        return Err(DecodeError::TruncatedInput {
            structure: whole,
            offset,
            needed: end.saturating_sub(offset),
            available: source.len().saturating_sub(offset),
        });
    }

    let mut entries = Vec::with_capacity(usize::from(table.count));
    for index in 0..table.count {
        let offset = usize::try_from(table.entry_offset(index)).unwrap_or(usize::MAX);
        let record = source.record(entry(index), offset, record_size)?;
        entries.push(decode(record));
    }
    Ok(entries)
}
