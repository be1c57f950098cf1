//! Section header table decoding and section name resolution.
//!
//! Decoding happens in two passes. The first walks `e_shnum` entries of
//! `e_shentsize` bytes from `e_shoff` and produces unnamed entries. The
//! second locates the section named by `e_shstrndx`, treats its bytes as a
//! string table, and produces a new table with every `name` filled in.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{DecodeError, Structure};
use crate::header::{FileHeader, walk_table};
use crate::options::DecodeOptions;
use crate::source::{ByteSource, Record};
use crate::translate::{SectionFlags, SectionType};

const SH_NAME: usize = 0;
const SH_TYPE: usize = 4;
const SH_FLAGS: usize = 8;
const SH_ADDR: usize = 12;
const SH_OFFSET: usize = 16;
const SH_SIZE: usize = 20;
const SH_LINK: usize = 24;
const SH_INFO: usize = 28;
const SH_ADDRALIGN: usize = 32;
const SH_ENTSIZE: usize = 36;

/// Decoded ELF32 section header entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionHeaderEntry {
    /// Offset of this section's name in the section name string table.
    pub name_index: u32,
    /// Resolved name; empty until names have been resolved, or when the
    /// file has no section name string table.
    pub name: String,
    /// Section type.
    pub section_type: SectionType,
    /// Section flags.
    pub flags: SectionFlags,
    /// Virtual address of the section in memory (0 for non-loaded sections).
    pub address: u32,
    /// File offset of the section data.
    pub offset: u32,
    /// Size of the section data in bytes.
    pub size: u32,
    /// Associated section index; meaning depends on the type.
    pub link: u32,
    /// Extra info; meaning depends on the type.
    pub info: u32,
    /// Required alignment of the section.
    pub addr_align: u32,
    /// Size of each entry, for sections holding fixed-size entries.
    pub entry_size: u32,
}

impl SectionHeaderEntry {
    fn decode(rec: Record<'_>, options: &DecodeOptions) -> Self {
        Self {
            name_index: rec.u32(SH_NAME),
            name: String::new(),
            section_type: SectionType::from_raw(rec.u32(SH_TYPE)),
            flags: SectionFlags::from_raw(rec.u32(SH_FLAGS), options.flag_mode),
            address: rec.u32(SH_ADDR),
            offset: rec.u32(SH_OFFSET),
            size: rec.u32(SH_SIZE),
            link: rec.u32(SH_LINK),
            info: rec.u32(SH_INFO),
            addr_align: rec.u32(SH_ADDRALIGN),
            entry_size: rec.u32(SH_ENTSIZE),
        }
    }

    /// Returns the bytes of this section within `data`.
    ///
    /// `SHT_NOBITS` sections occupy no file space and yield an empty slice.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::OutOfBounds`] if `sh_offset + sh_size` lies
    /// past the end of `data`.
    pub fn data<'a>(&self, data: &'a [u8]) -> Result<&'a [u8], DecodeError> {
        if self.section_type == SectionType::NoBits {
            return Ok(&[]);
        }
        ByteSource::new(data).read(self.offset as usize, self.size as usize)
    }
}

/// A borrowed string table section: NUL-terminated strings addressed by byte
/// offset.
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'a> {
    data: &'a [u8],
}

impl<'a> StringTable<'a> {
    /// Creates a new string table from the raw section data.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Looks up the string starting at byte `offset`.
    ///
    /// The string ends at the first NUL byte, or at the end of the table if
    /// there is none. An offset equal to the table length yields an empty
    /// string.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::OutOfBounds`], with offsets relative to the
    /// table, if `offset` lies past the end of the table.
    pub fn get(&self, offset: u32) -> Result<&'a [u8], DecodeError> {
        let start = offset as usize;
        let Some(remaining) = self.data.get(start..) else {
            return Err(DecodeError::OutOfBounds {
                offset: start,
                length: 0,
                available: self.data.len(),
            });
        };
        let len = remaining
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(remaining.len());
        Ok(&remaining[..len])
    }

    /// Like [`get`](Self::get), decoding the bytes as UTF-8 and replacing
    /// invalid sequences.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn name(&self, offset: u32) -> Result<Cow<'a, str>, DecodeError> {
        self.get(offset).map(String::from_utf8_lossy)
    }
}

/// First pass: decode the section header table without resolving names.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedInput`] if the table extent runs past the
/// end of `data`, or naming the first entry whose record does not fit.
pub fn decode_raw_section_headers(
    data: &[u8],
    header: &FileHeader,
    options: &DecodeOptions,
) -> Result<Vec<SectionHeaderEntry>, DecodeError> {
    walk_table(
        ByteSource::new(data),
        header.section_table(),
        header.layout().section_header_size(),
        Structure::SectionHeaderTable,
        Structure::SectionHeader,
        |rec| SectionHeaderEntry::decode(rec, options),
    )
}

/// The entry named by `e_shstrndx`, or `None` for `SHN_UNDEF`.
fn name_table_entry<'s>(
    header: &FileHeader,
    sections: &'s [SectionHeaderEntry],
) -> Result<Option<&'s SectionHeaderEntry>, DecodeError> {
    if !header.has_string_table() {
        return Ok(None);
    }
    let index = header.section_header_string_index;
    match sections.get(usize::from(index)) {
        Some(entry) => Ok(Some(entry)),
        None => Err(DecodeError::InvalidStringTableIndex {
            index,
            count: sections.len(),
            sections: sections.to_vec(),
        }),
    }
}

fn read_string_table<'a>(
    data: &'a [u8],
    entry: &SectionHeaderEntry,
) -> Result<StringTable<'a>, DecodeError> {
    ByteSource::new(data)
        .read(entry.offset as usize, entry.size as usize)
        .map(StringTable::new)
}

/// Returns the section name string table named by `e_shstrndx`.
///
/// Returns `Ok(None)` when the header has no string table (`SHN_UNDEF`).
///
/// # Errors
///
/// - [`DecodeError::InvalidStringTableIndex`] if `e_shstrndx` is not an index
///   into `sections`; the error carries a copy of `sections`.
/// - [`DecodeError::OutOfBounds`] if the string table section extends past
///   the end of `data`.
pub fn section_name_table<'a>(
    data: &'a [u8],
    header: &FileHeader,
    sections: &[SectionHeaderEntry],
) -> Result<Option<StringTable<'a>>, DecodeError> {
    name_table_entry(header, sections)?
        .map(|entry| read_string_table(data, entry))
        .transpose()
}

/// Second pass: produce a copy of `sections` with every `name` resolved.
///
/// When the file has no section name string table every name stays empty.
///
/// # Errors
///
/// - [`DecodeError::InvalidStringTableIndex`] if `e_shstrndx` is out of
///   range. The unnamed table is carried in the error.
/// - [`DecodeError::OutOfBounds`] if the string table lies outside `data`.
/// - [`DecodeError::NameOutOfRange`] if a `sh_name` points past the end of
///   the string table.
pub fn resolve_section_names(
    data: &[u8],
    header: &FileHeader,
    sections: &[SectionHeaderEntry],
) -> Result<Vec<SectionHeaderEntry>, DecodeError> {
    let Some(entry) = name_table_entry(header, sections)? else {
        return Ok(sections.to_vec());
    };
    let strtab = read_string_table(data, entry)?;
    sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let name = strtab
                .name(section.name_index)
                .map_err(|_| DecodeError::NameOutOfRange {
                    section: index,
                    name_index: section.name_index,
                    table_offset: entry.offset,
                    table_size: entry.size,
                })?;
            Ok(SectionHeaderEntry {
                name: name.into_owned(),
                ..section.clone()
            })
        })
        .collect()
}

/// Decode the section header table and resolve names, with default options.
///
/// # Errors
///
/// See [`decode_section_headers_with`].
pub fn decode_section_headers(
    data: &[u8],
    header: &FileHeader,
) -> Result<Vec<SectionHeaderEntry>, DecodeError> {
    decode_section_headers_with(data, header, &DecodeOptions::default())
}

/// Decode the section header table and resolve names.
///
/// # Errors
///
/// - [`DecodeError::TruncatedInput`] if the table does not fit in `data`.
/// - [`DecodeError::InvalidStringTableIndex`] if `e_shstrndx` is out of
///   range; [`DecodeError::into_sections`] recovers the unnamed table.
/// - [`DecodeError::OutOfBounds`] if the string table lies outside `data`.
/// - [`DecodeError::NameOutOfRange`] if a name offset is past the string
///   table.
pub fn decode_section_headers_with(
    data: &[u8],
    header: &FileHeader,
    options: &DecodeOptions,
) -> Result<Vec<SectionHeaderEntry>, DecodeError> {
    let raw = decode_raw_section_headers(data, header, options)?;
    resolve_section_names(data, header, &raw)
}
