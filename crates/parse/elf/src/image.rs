//! Whole-file decoding.
//!
//! [`ElfImage`] runs the header, program header and section header decoders
//! over one buffer and keeps the results together for lookups.

use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::header::{FileHeader, decode_file_header};
use crate::options::DecodeOptions;
use crate::section::{SectionHeaderEntry, StringTable, decode_section_headers_with};
use crate::segment::{ProgramHeaderEntry, decode_program_headers_with};
use crate::translate::{SectionType, SegmentType};

/// The decoded structural metadata of an ELF32 file.
///
/// Holds owned copies only; the input buffer is not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElfImage {
    /// File header.
    pub header: FileHeader,
    /// Program header table, in file order.
    pub program_headers: Vec<ProgramHeaderEntry>,
    /// Section header table, in file order, with names resolved.
    pub section_headers: Vec<SectionHeaderEntry>,
}

impl ElfImage {
    /// Decode `data` with default options.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] hit by any decoder.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        Self::parse_with(data, &DecodeOptions::default())
    }

    /// Decode `data`.
    ///
    /// The header is decoded first and a failure there stops everything.
    /// The two tables are then decoded independently from the header.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] hit by any decoder.
    pub fn parse_with(data: &[u8], options: &DecodeOptions) -> Result<Self, DecodeError> {
        let header = decode_file_header(data)?;
        let program_headers = decode_program_headers_with(data, &header, options)?;
        let section_headers = decode_section_headers_with(data, &header, options)?;
        Ok(Self {
            header,
            program_headers,
            section_headers,
        })
    }

    /// Finds the first section with the given resolved name.
    #[must_use]
    pub fn section_by_name(&self, name: &str) -> Option<&SectionHeaderEntry> {
        self.section_headers.iter().find(|s| s.name == name)
    }

    /// Finds the first section of the given type.
    #[must_use]
    pub fn section_by_type(&self, section_type: SectionType) -> Option<&SectionHeaderEntry> {
        self.section_headers
            .iter()
            .find(|s| s.section_type == section_type)
    }

    /// Iterates over segments of the given type, in file order.
    pub fn segments_of_type(
        &self,
        segment_type: SegmentType,
    ) -> impl Iterator<Item = &ProgramHeaderEntry> {
        self.program_headers
            .iter()
            .filter(move |p| p.segment_type == segment_type)
    }

    /// Returns the contents of `section` within `data`.
    ///
    /// `data` must be the buffer this image was decoded from.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::OutOfBounds`] if the section lies outside
    /// `data`.
    pub fn section_data<'a>(
        &self,
        data: &'a [u8],
        section: &SectionHeaderEntry,
    ) -> Result<&'a [u8], DecodeError> {
        section.data(data)
    }

    /// Views `section` as a string table.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::OutOfBounds`] if the section lies outside
    /// `data`.
    pub fn string_table<'a>(
        &self,
        data: &'a [u8],
        section: &SectionHeaderEntry,
    ) -> Result<StringTable<'a>, DecodeError> {
        section.data(data).map(StringTable::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::tests::{append_phdr, make_elf_header, set_u16};
    use crate::section::tests::{SHSTRTAB, make_elf_with_sections};
    use crate::translate::ObjectType;

    #[test]
    fn parse_whole_file() {
        let buf = make_elf_with_sections();
        let image = ElfImage::parse(&buf).expect("valid ELF");
        assert_eq!(image.header.object_type, ObjectType::Executable);
        assert!(image.program_headers.is_empty());
        assert_eq!(image.section_headers.len(), 5);
    }

    #[test]
    fn lookups() {
        let buf = make_elf_with_sections();
        let image = ElfImage::parse(&buf).expect("valid ELF");

        let text = image.section_by_name(".text").expect(".text present");
        assert_eq!(text.address, 0x1000);
        assert_eq!(image.section_data(&buf, text), Ok(&[0x90; 4][..]));
        assert!(image.section_by_name(".debug_info").is_none());

        let strtab = image
            .section_by_type(SectionType::StrTab)
            .expect("string table present");
        let table = image.string_table(&buf, strtab).expect("in bounds");
        assert_eq!(table.get(13), Ok(&b".bss"[..]));
        assert_eq!(strtab.size as usize, SHSTRTAB.len());
    }

    #[test]
    fn segments_filter_by_type() {
        let mut buf = make_elf_header();
        append_phdr(&mut buf, 6, 52, 0, 0, 0x60, 0x60, 4, 4);
        append_phdr(&mut buf, 1, 0, 0, 0, 0x100, 0x100, 5, 0x1000);
        append_phdr(&mut buf, 1, 0x100, 0x1100, 0x1100, 0x10, 0x20, 6, 0x1000);

        let image = ElfImage::parse(&buf).expect("valid ELF");
        let loads: Vec<_> = image.segments_of_type(SegmentType::Load).collect();
        assert_eq!(loads.len(), 2);
        assert_eq!(loads[1].virtual_addr, 0x1100);
        assert_eq!(image.segments_of_type(SegmentType::Dynamic).count(), 0);
    }

    #[test]
    fn header_failure_short_circuits() {
        let mut buf = make_elf_with_sections();
        buf[1] = b'X';
        assert!(matches!(
            ElfImage::parse(&buf),
            Err(DecodeError::NotAnElfFile { .. })
        ));
    }

    #[test]
    fn string_index_error_propagates() {
        let mut buf = make_elf_with_sections();
        set_u16(&mut buf, 50, 40);
        assert!(matches!(
            ElfImage::parse(&buf),
            Err(DecodeError::InvalidStringTableIndex { index: 40, .. })
        ));
    }
}
