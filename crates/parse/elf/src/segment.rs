//! Program header table decoding.
//!
//! Walks `e_phnum` entries of `e_phentsize` bytes starting at `e_phoff` and
//! yields one [`ProgramHeaderEntry`] per row, in file order.

use alloc::vec::Vec;

use crate::error::{DecodeError, Structure};
use crate::header::{FileHeader, walk_table};
use crate::options::DecodeOptions;
use crate::source::{ByteSource, Record};
use crate::translate::{SegmentFlags, SegmentType};

const P_TYPE: usize = 0;
const P_OFFSET: usize = 4;
const P_VADDR: usize = 8;
const P_PADDR: usize = 12;
const P_FILESZ: usize = 16;
const P_MEMSZ: usize = 20;
const P_FLAGS: usize = 24;
const P_ALIGN: usize = 28;

/// Decoded ELF32 program header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProgramHeaderEntry {
    /// Segment type.
    pub segment_type: SegmentType,
    /// Offset of the segment data in the file.
    pub offset: u32,
    /// Virtual address of the segment.
    pub virtual_addr: u32,
    /// Physical address of the segment, where relevant.
    pub physical_addr: u32,
    /// Size of the segment data in the file.
    pub file_size: u32,
    /// Size of the segment in memory.
    pub mem_size: u32,
    /// Segment permission flags.
    pub flags: SegmentFlags,
    /// Required alignment of the segment.
    pub align: u32,
}

impl ProgramHeaderEntry {
    fn decode(rec: Record<'_>, options: &DecodeOptions) -> Self {
        Self {
            segment_type: SegmentType::from_raw(rec.u32(P_TYPE)),
            offset: rec.u32(P_OFFSET),
            virtual_addr: rec.u32(P_VADDR),
            physical_addr: rec.u32(P_PADDR),
            file_size: rec.u32(P_FILESZ),
            mem_size: rec.u32(P_MEMSZ),
            flags: SegmentFlags::from_raw(rec.u32(P_FLAGS), options.flag_mode),
            align: rec.u32(P_ALIGN),
        }
    }

    /// Returns `true` for `PT_LOAD` segments.
    #[must_use]
    pub fn is_load(&self) -> bool {
        self.segment_type == SegmentType::Load
    }

    /// Returns the file-backed bytes of this segment.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::OutOfBounds`] if `p_offset + p_filesz` lies
    /// past the end of `data`.
    pub fn file_data<'a>(&self, data: &'a [u8]) -> Result<&'a [u8], DecodeError> {
        ByteSource::new(data).read(self.offset as usize, self.file_size as usize)
    }
}

/// Decode the program header table with default options.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedInput`] if the table extent runs past the
/// end of `data`, or naming the first entry whose record does not fit.
pub fn decode_program_headers(
    data: &[u8],
    header: &FileHeader,
) -> Result<Vec<ProgramHeaderEntry>, DecodeError> {
    decode_program_headers_with(data, header, &DecodeOptions::default())
}

/// Decode the program header table.
///
/// `e_phnum == 0` yields an empty vector.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedInput`] if the table extent runs past the
/// end of `data`, or naming the first entry whose record does not fit.
pub fn decode_program_headers_with(
    data: &[u8],
    header: &FileHeader,
    options: &DecodeOptions,
) -> Result<Vec<ProgramHeaderEntry>, DecodeError> {
    walk_table(
        ByteSource::new(data),
        header.program_table(),
        header.layout().program_header_size(),
        Structure::ProgramHeaderTable,
        Structure::ProgramHeader,
        |rec| ProgramHeaderEntry::decode(rec, options),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::decode_file_header;
    use crate::header::tests::{append_phdr, make_elf_header, set_u16};
    use crate::options::FlagMode;
    use crate::translate::SegmentPermissions;
    use alloc::format;

    const PHDR0: usize = 52;

    fn decode(buf: &[u8]) -> Result<Vec<ProgramHeaderEntry>, DecodeError> {
        let hdr = decode_file_header(buf).expect("valid header");
        decode_program_headers(buf, &hdr)
    }

    #[test]
    fn no_segments_yields_empty_table() {
        let buf = make_elf_header();
        assert_eq!(decode(&buf), Ok(Vec::new()));
    }

    #[test]
    fn one_load_segment() {
        let mut buf = make_elf_header();
        append_phdr(&mut buf, 1, 0, 0x0804_8000, 0x0804_8000, 0x5c4, 0x5c4, 5, 0x1000);

        let phdrs = decode(&buf).expect("valid table");
        assert_eq!(
            phdrs,
            [ProgramHeaderEntry {
                segment_type: SegmentType::Load,
                offset: 0,
                virtual_addr: 0x0804_8000,
                physical_addr: 0x0804_8000,
                file_size: 0x5c4,
                mem_size: 0x5c4,
                flags: SegmentFlags::Known(SegmentPermissions::R | SegmentPermissions::X),
                align: 0x1000,
            }]
        );
        assert!(phdrs[0].is_load());
        assert_eq!(format!("{}", phdrs[0].flags), "R X");
    }

    #[test]
    fn order_is_file_order() {
        let mut buf = make_elf_header();
        append_phdr(&mut buf, 6, 52, 0x34, 0x34, 0x100, 0x100, 4, 4);
        append_phdr(&mut buf, 3, 0x134, 0x134, 0x134, 0x13, 0x13, 4, 1);
        append_phdr(&mut buf, 1, 0, 0, 0, 0x800, 0x800, 5, 0x1000);
        append_phdr(&mut buf, 1, 0x800, 0x1800, 0x1800, 0x100, 0x200, 6, 0x1000);
        append_phdr(&mut buf, 0x6474_e551, 0, 0, 0, 0, 0, 6, 0x10);

        let phdrs = decode(&buf).expect("valid table");
        let types: Vec<_> = phdrs.iter().map(|p| p.segment_type).collect();
        assert_eq!(
            types,
            [
                SegmentType::Phdr,
                SegmentType::Interp,
                SegmentType::Load,
                SegmentType::Load,
                SegmentType::Unknown(0x6474_e551),
            ]
        );
        assert_eq!(phdrs[3].mem_size, 0x200);
        assert_eq!(format!("{}", phdrs[3].flags), "R W");
    }

    #[test]
    fn out_of_domain_flags_are_unknown() {
        let mut buf = make_elf_header();
        append_phdr(&mut buf, 1, 0, 0, 0, 0, 0, 9, 0);
        let phdrs = decode(&buf).expect("valid table");
        assert_eq!(phdrs[0].flags, SegmentFlags::Unknown(9));
    }

    #[test]
    fn bitmask_mode_keeps_extra_bits() {
        let mut buf = make_elf_header();
        append_phdr(&mut buf, 1, 0, 0, 0, 0, 0, 0x0800_0005, 0);
        let hdr = decode_file_header(&buf).expect("valid header");
        let options = DecodeOptions::with_flag_mode(FlagMode::Bitmask);
        let phdrs = decode_program_headers_with(&buf, &hdr, &options).expect("valid table");
        assert_eq!(phdrs[0].flags.code(), 0x0800_0005);
        assert_eq!(format!("{}", phdrs[0].flags), "R X 0x8000000");
    }

    #[test]
    fn truncated_table_is_reported_whole() {
        let mut buf = make_elf_header();
        append_phdr(&mut buf, 1, 0, 0, 0, 0, 0, 4, 0);
        append_phdr(&mut buf, 1, 0, 0, 0, 0, 0, 4, 0);
        buf.truncate(PHDR0 + 32 + 20);

        assert_eq!(
            decode(&buf),
            Err(DecodeError::TruncatedInput {
                structure: Structure::ProgramHeaderTable,
                offset: PHDR0,
                needed: 64,
                available: 52,
            })
        );
    }

    #[test]
    fn count_past_end_of_file() {
        let mut buf = make_elf_header();
        set_u16(&mut buf, 44, 1); // e_phnum without any table bytes
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::TruncatedInput {
                structure: Structure::ProgramHeaderTable,
                available: 0,
                ..
            })
        ));
    }

    #[test]
    fn stride_larger_than_record() {
        let mut buf = make_elf_header();
        set_u16(&mut buf, 42, 48); // e_phentsize
        append_phdr(&mut buf, 3, 0, 0, 0, 0, 0, 4, 1);
        buf.extend_from_slice(&[0xEE; 16]);
        append_phdr(&mut buf, 4, 0, 0, 0, 0, 0, 4, 4);
        buf.extend_from_slice(&[0xEE; 16]);

        let phdrs = decode(&buf).expect("valid table");
        assert_eq!(phdrs.len(), 2);
        assert_eq!(phdrs[0].segment_type, SegmentType::Interp);
        assert_eq!(phdrs[1].segment_type, SegmentType::Note);
    }

    #[test]
    fn stride_runs_past_end_of_buffer() {
        let mut buf = make_elf_header();
        set_u16(&mut buf, 42, 64); // e_phentsize
        append_phdr(&mut buf, 1, 0, 0, 0, 0, 0, 5, 0x1000);
        assert_eq!(buf.len(), PHDR0 + 32);

        assert_eq!(
            decode(&buf),
            Err(DecodeError::TruncatedInput {
                structure: Structure::ProgramHeaderTable,
                offset: PHDR0,
                needed: 64,
                available: 32,
            })
        );
    }

    #[test]
    fn stride_smaller_than_record_names_entry() {
        let mut buf = make_elf_header();
        set_u16(&mut buf, 42, 16); // e_phentsize
        append_phdr(&mut buf, 1, 0, 0, 0, 0, 0, 5, 0x1000);
        set_u16(&mut buf, 44, 2); // e_phnum: table ends exactly at end of buffer

        assert_eq!(
            decode(&buf),
            Err(DecodeError::TruncatedInput {
                structure: Structure::ProgramHeader(1),
                offset: PHDR0 + 16,
                needed: 32,
                available: 16,
            })
        );
    }

    #[test]
    fn segment_file_data() {
        let mut buf = make_elf_header();
        let data_offset = (PHDR0 + 32) as u32;
        append_phdr(&mut buf, 3, data_offset, 0, 0, 13, 13, 4, 1);
        buf.extend_from_slice(b"/lib/ld.so.1\0");

        let phdrs = decode(&buf).expect("valid table");
        assert_eq!(phdrs[0].file_data(&buf), Ok(&b"/lib/ld.so.1\0"[..]));

        buf.truncate(buf.len() - 1);
        assert!(matches!(
            phdrs[0].file_data(&buf),
            Err(DecodeError::OutOfBounds { .. })
        ));
    }
}
