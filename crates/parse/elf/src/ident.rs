//! `e_ident` decoding.
//!
//! The first 16 bytes of every ELF file identify it as ELF and describe how
//! the rest of the file is encoded. Nothing past them can be trusted until
//! the magic has been checked.

use crate::error::{DecodeError, Structure};
use crate::source::ByteSource;
use crate::translate::{Class, Endianness, OsAbi};

/// ELF magic bytes: `\x7fELF`.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Size of the `e_ident` array.
pub const EI_NIDENT: usize = 16;

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;
const EI_VERSION: usize = 6;
const EI_OSABI: usize = 7;
const EI_ABIVERSION: usize = 8;

/// Decoded `e_ident` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Identification {
    /// Whether the magic bytes matched. The remaining fields are meaningless
    /// when this is `false`.
    pub magic_valid: bool,
    /// File class (32/64-bit).
    pub class: Class,
    /// Data encoding.
    pub endianness: Endianness,
    /// `EI_VERSION`.
    pub ident_version: u8,
    /// Target OS ABI.
    pub os_abi: OsAbi,
    /// `EI_ABIVERSION`.
    pub abi_version: u8,
}

/// Decode the identification prefix of `data`.
///
/// A magic mismatch is reported through [`Identification::magic_valid`], not
/// as an error; [`decode_file_header`](crate::decode_file_header) turns it
/// into [`DecodeError::NotAnElfFile`].
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedInput`] if `data` is shorter than
/// [`EI_NIDENT`] bytes.
pub fn decode_identification(data: &[u8]) -> Result<Identification, DecodeError> {
    let ident = ByteSource::new(data).record(Structure::Identification, 0, EI_NIDENT)?;

    Ok(Identification {
        magic_valid: ident.bytes()[..4] == ELF_MAGIC,
        class: Class::from_raw(ident.u8(EI_CLASS)),
        endianness: Endianness::from_raw(ident.u8(EI_DATA)),
        ident_version: ident.u8(EI_VERSION),
        os_abi: OsAbi::from_raw(ident.u8(EI_OSABI)),
        abi_version: ident.u8(EI_ABIVERSION),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident_bytes(class: u8, data: u8, version: u8, osabi: u8, abiversion: u8) -> [u8; 16] {
        let mut b = [0u8; EI_NIDENT];
        b[..4].copy_from_slice(&ELF_MAGIC);
        b[EI_CLASS] = class;
        b[EI_DATA] = data;
        b[EI_VERSION] = version;
        b[EI_OSABI] = osabi;
        b[EI_ABIVERSION] = abiversion;
        b
    }

    #[test]
    fn system_v_elf32_little_endian() {
        let ident = decode_identification(&ident_bytes(1, 1, 1, 0, 0)).expect("valid ident");
        assert_eq!(
            ident,
            Identification {
                magic_valid: true,
                class: Class::Elf32,
                endianness: Endianness::Little,
                ident_version: 1,
                os_abi: OsAbi::SystemV,
                abi_version: 0,
            }
        );
        assert_eq!(ident.os_abi.name(), "UNIX - System V");
    }

    #[test]
    fn bad_magic_is_reported_not_raised() {
        let mut b = ident_bytes(1, 1, 1, 0, 0);
        b[3] = b'G';
        let ident = decode_identification(&b).expect("16 bytes present");
        assert!(!ident.magic_valid);
    }

    #[test]
    fn unrecognized_bytes_are_kept() {
        let ident = decode_identification(&ident_bytes(7, 9, 3, 200, 4)).expect("valid ident");
        assert!(ident.magic_valid);
        assert_eq!(ident.class, Class::Unknown(7));
        assert_eq!(ident.endianness, Endianness::Unknown(9));
        assert_eq!(ident.os_abi, OsAbi::Unknown(200));
        assert_eq!(ident.ident_version, 3);
        assert_eq!(ident.abi_version, 4);
    }

    #[test]
    fn none_class_and_encoding() {
        let ident = decode_identification(&ident_bytes(0, 0, 1, 0, 0)).expect("valid ident");
        assert_eq!(ident.class, Class::None);
        assert_eq!(ident.endianness, Endianness::Unknown(0));
    }

    #[test]
    fn elf64_big_endian() {
        let ident = decode_identification(&ident_bytes(2, 2, 1, 9, 0)).expect("valid ident");
        assert_eq!(ident.class, Class::Elf64);
        assert_eq!(ident.endianness, Endianness::Big);
        assert_eq!(ident.os_abi, OsAbi::Unknown(9));
    }

    #[test]
    fn reject_short_input() {
        let b = ident_bytes(1, 1, 1, 0, 0);
        assert_eq!(
            decode_identification(&b[..15]),
            Err(DecodeError::TruncatedInput {
                structure: Structure::Identification,
                offset: 0,
                needed: EI_NIDENT,
                available: 15,
            })
        );
        assert!(matches!(
            decode_identification(&[]),
            Err(DecodeError::TruncatedInput { available: 0, .. })
        ));
    }
}
