//! ELF32 structural metadata decoder.
//!
//! Decodes the identification bytes, file header, program header table and
//! section header table of an ELF32 little-endian object from a raw byte
//! slice, and translates numeric fields to their symbolic meanings. All
//! reads are bounds-checked; malformed input produces a [`DecodeError`],
//! never a panic. No unsafe code.
//!
//! # Usage
//!
//! ```
//! use elfscope_elf::{decode_file_header, decode_program_headers, decode_section_headers};
//!
//! fn inspect(data: &[u8]) -> Result<(), elfscope_elf::DecodeError> {
//!     let header = decode_file_header(data)?;
//!     for segment in decode_program_headers(data, &header)? {
//!         // segment.segment_type, segment.flags, ...
//!     }
//!     for section in decode_section_headers(data, &header)? {
//!         // section.name, section.section_type, ...
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod error;
pub mod header;
pub mod ident;
pub mod image;
pub mod options;
pub mod section;
pub mod segment;
pub mod source;
pub mod translate;

pub use error::{DecodeError, Structure};
pub use header::{
    ELF32_EHDR_SIZE, ELF32_PHDR_SIZE, ELF32_SHDR_SIZE, FileHeader, Layout, SHN_UNDEF,
    TableLayout, decode_file_header,
};
pub use ident::{EI_NIDENT, ELF_MAGIC, Identification, decode_identification};
pub use image::ElfImage;
pub use options::{DecodeOptions, FlagMode};
pub use section::{
    SectionHeaderEntry, StringTable, decode_raw_section_headers, decode_section_headers,
    decode_section_headers_with, resolve_section_names, section_name_table,
};
pub use segment::{ProgramHeaderEntry, decode_program_headers, decode_program_headers_with};
pub use source::ByteSource;
pub use translate::{
    Class, Endianness, Machine, ObjectType, OsAbi, SectionAttributes, SectionFlags, SectionType,
    SegmentFlags, SegmentPermissions, SegmentType,
};
