//! Decode errors.

use alloc::vec::Vec;
use core::fmt;

use crate::section::SectionHeaderEntry;

/// The on-disk structure a decoder was reading when it ran out of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// The 16-byte `e_ident` prefix.
    Identification,
    /// The fixed ELF32 file header.
    FileHeader,
    /// The whole program header table (`e_phoff .. e_phoff + e_phnum * e_phentsize`).
    ProgramHeaderTable,
    /// Program header table entry at the given index.
    ProgramHeader(u16),
    /// The whole section header table (`e_shoff .. e_shoff + e_shnum * e_shentsize`).
    SectionHeaderTable,
    /// Section header table entry at the given index.
    SectionHeader(u16),
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identification => write!(f, "identification bytes"),
            Self::FileHeader => write!(f, "file header"),
            Self::ProgramHeaderTable => write!(f, "program header table"),
            Self::ProgramHeader(i) => write!(f, "program header {i}"),
            Self::SectionHeaderTable => write!(f, "section header table"),
            Self::SectionHeader(i) => write!(f, "section header {i}"),
        }
    }
}

/// Errors that can occur while decoding an ELF image.
///
/// Structural faults fail the call that hit them. Unrecognized enumeration
/// codes are never errors; they decode to `Unknown(code)` values instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer does not start with `\x7fELF`.
    NotAnElfFile {
        /// The first four bytes actually found.
        magic: [u8; 4],
    },
    /// The buffer ends before a required record does.
    TruncatedInput {
        /// What was being read.
        structure: Structure,
        /// File offset of the record.
        offset: usize,
        /// Size of the record in bytes.
        needed: usize,
        /// Bytes present from `offset` to the end of the buffer.
        available: usize,
    },
    /// A computed range lies (partly) outside the buffer.
    OutOfBounds {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range.
        length: usize,
        /// Total buffer length.
        available: usize,
    },
    /// `e_shstrndx` does not name an entry of the section header table.
    ///
    /// Names cannot be resolved, but the table itself decoded fine; it is
    /// carried here with every `name` left empty.
    InvalidStringTableIndex {
        /// The offending `e_shstrndx` value.
        index: u16,
        /// Number of entries in the decoded table.
        count: usize,
        /// The decoded, unnamed section headers.
        sections: Vec<SectionHeaderEntry>,
    },
    /// A section's `sh_name` points past the end of the section name table.
    NameOutOfRange {
        /// Index of the section whose name could not be read.
        section: usize,
        /// The offending `sh_name` value.
        name_index: u32,
        /// File offset of the section name table.
        table_offset: u32,
        /// Size of the section name table in bytes.
        table_size: u32,
    },
}

impl DecodeError {
    /// Recovers the unnamed section table from an
    /// [`InvalidStringTableIndex`](Self::InvalidStringTableIndex) error.
    #[must_use]
    pub fn into_sections(self) -> Option<Vec<SectionHeaderEntry>> {
        match self {
            Self::InvalidStringTableIndex { sections, .. } => Some(sections),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnElfFile { magic } => write!(
                f,
                "not an ELF file (magic {:02x} {:02x} {:02x} {:02x})",
                magic[0], magic[1], magic[2], magic[3]
            ),
            Self::TruncatedInput {
                structure,
                offset,
                needed,
                available,
            } => write!(
                f,
                "{structure} truncated: need {needed} bytes at offset {offset:#x}, \
                 only {available} available"
            ),
            Self::OutOfBounds {
                offset,
                length,
                available,
            } => write!(
                f,
                "range {offset:#x}..{:#x} exceeds buffer of {available} bytes",
                offset.saturating_add(*length)
            ),
            Self::InvalidStringTableIndex { index, count, .. } => write!(
                f,
                "section header string table index {index} out of range ({count} sections)"
            ),
            Self::NameOutOfRange {
                section,
                name_index,
                table_offset,
                table_size,
            } => write!(
                f,
                "section {section} name offset {name_index:#x} is past the end of the \
                 section name table ({table_size} bytes at offset {table_offset:#x})"
            ),
        }
    }
}

impl core::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    #[test]
    fn display_errors() {
        let errors = [
            DecodeError::NotAnElfFile {
                magic: *b"MZ\x90\0",
            },
            DecodeError::TruncatedInput {
                structure: Structure::SectionHeader(3),
                offset: 0x200,
                needed: 40,
                available: 12,
            },
            DecodeError::OutOfBounds {
                offset: 0x10,
                length: 0x20,
                available: 8,
            },
            DecodeError::InvalidStringTableIndex {
                index: 9,
                count: 4,
                sections: vec![],
            },
            DecodeError::NameOutOfRange {
                section: 1,
                name_index: 0x200,
                table_offset: 0x104,
                table_size: 28,
            },
        ];
        for err in &errors {
            let msg = format!("{err}");
            assert!(!msg.is_empty());
        }
    }

    #[test]
    fn truncated_message_has_context() {
        let err = DecodeError::TruncatedInput {
            structure: Structure::ProgramHeader(1),
            offset: 0x54,
            needed: 32,
            available: 10,
        };
        assert_eq!(
            format!("{err}"),
            "program header 1 truncated: need 32 bytes at offset 0x54, only 10 available"
        );
    }

    #[test]
    fn table_truncated_message() {
        let err = DecodeError::TruncatedInput {
            structure: Structure::ProgramHeaderTable,
            offset: 0x34,
            needed: 64,
            available: 32,
        };
        assert_eq!(
            format!("{err}"),
            "program header table truncated: need 64 bytes at offset 0x34, only 32 available"
        );
    }

    #[test]
    fn name_out_of_range_message() {
        let err = DecodeError::NameOutOfRange {
            section: 1,
            name_index: 0x200,
            table_offset: 0x104,
            table_size: 28,
        };
        assert_eq!(
            format!("{err}"),
            "section 1 name offset 0x200 is past the end of the section name table \
             (28 bytes at offset 0x104)"
        );
    }

    #[test]
    fn not_an_elf_message() {
        let err = DecodeError::NotAnElfFile {
            magic: [0x7f, b'E', b'L', b'G'],
        };
        assert_eq!(format!("{err}"), "not an ELF file (magic 7f 45 4c 47)");
    }

    #[test]
    fn into_sections_only_for_string_table_error() {
        let err = DecodeError::InvalidStringTableIndex {
            index: 5,
            count: 0,
            sections: vec![],
        };
        assert_eq!(err.into_sections(), Some(vec![]));

        let err = DecodeError::OutOfBounds {
            offset: 0,
            length: 1,
            available: 0,
        };
        assert_eq!(err.into_sections(), None);
    }
}
