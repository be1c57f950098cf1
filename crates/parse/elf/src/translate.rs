//! Symbolic names for the numeric fields of ELF headers.
//!
//! Every translator is total: codes without a name decode to an explicit
//! `Unknown(code)` variant, and [`code`](ObjectType::code) gives the raw value
//! back for any variant.

use core::fmt;

use bitflags::bitflags;

use crate::options::FlagMode;

/// Generates a code-backed enum with an `Unknown` fallback, plus `from_raw`,
/// `code` and `name`.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $repr:ty, unknown = $unknown:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A code with no symbolic name; the raw value is kept.
            Unknown($repr),
        }

        impl $name {
            /// Translates a raw code. Never fails.
            #[must_use]
            pub const fn from_raw(code: $repr) -> Self {
                match code {
                    $( $code => Self::$variant, )+
                    other => Self::Unknown(other),
                }
            }

            /// The raw on-disk code for this value.
            #[must_use]
            pub const fn code(self) -> $repr {
                match self {
                    $( Self::$variant => $code, )+
                    Self::Unknown(code) => code,
                }
            }

            /// Human-readable name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                    Self::Unknown(_) => $unknown,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

code_enum! {
    /// Target operating system ABI (`e_ident[EI_OSABI]`).
    ///
    /// Only the common values are named; 9, 10 and 12 and above are left
    /// unmapped.
    pub enum OsAbi: u8, unknown = "Could not detect OS ABI" {
        /// `ELFOSABI_NONE`.
        SystemV = 0 => "UNIX - System V",
        /// `ELFOSABI_HPUX`.
        HpUx = 1 => "HP-UX",
        /// `ELFOSABI_NETBSD`.
        NetBsd = 2 => "NetBSD",
        /// `ELFOSABI_GNU`.
        Gnu = 3 => "GNU",
        /// `ELFOSABI_LINUX` (historical alias of GNU).
        Linux = 4 => "Linux",
        /// `ELFOSABI_SOLARIS`.
        Solaris = 5 => "Sun Solaris",
        /// `ELFOSABI_AIX`.
        Aix = 6 => "AIX",
        /// `ELFOSABI_FREEBSD`.
        FreeBsd = 7 => "FreeBSD",
        /// `ELFOSABI_TRU64`.
        Tru64 = 8 => "TRU64 UNIX",
        /// `ELFOSABI_MODESTO`.
        Modesto = 11 => "Novell Modesto",
    }
}

code_enum! {
    /// Object file type (`e_type`).
    pub enum ObjectType: u16, unknown = "Couldn't detect file type" {
        /// `ET_NONE`.
        None = 0 => "No file type",
        /// `ET_REL`.
        Relocatable = 1 => "Relocatable file",
        /// `ET_EXEC`.
        Executable = 2 => "Executable file",
        /// `ET_DYN`.
        SharedObject = 3 => "Shared object file",
        /// `ET_CORE`.
        Core = 4 => "Core file",
    }
}

code_enum! {
    /// Target architecture (`e_machine`).
    pub enum Machine: u16, unknown = "Couldn't detect machine type" {
        /// `EM_NONE`.
        None = 0 => "No machine",
        /// `EM_M32`.
        We32100 = 1 => "AT&T WE 32100",
        /// `EM_SPARC`.
        Sparc = 2 => "SPARC",
        /// `EM_386`.
        I386 = 3 => "Intel 80386",
        /// `EM_68K`.
        M68k = 4 => "Motorola 68000",
        /// `EM_88K`.
        M88k = 5 => "Motorola 88000",
        /// `EM_860`.
        I860 = 7 => "Intel 80860",
        /// `EM_MIPS`.
        Mips = 8 => "MIPS R3000",
        /// `EM_PPC`.
        PowerPc = 20 => "PowerPC",
        /// `EM_PPC64`.
        PowerPc64 = 21 => "64-bit PowerPC",
        /// `EM_ARM`.
        Arm = 40 => "ARM 32-bit architecture",
        /// `EM_X86_64`.
        X86_64 = 62 => "AMD x86-64 architecture",
        /// `EM_AARCH64`.
        AArch64 = 183 => "ARM 64-bit architecture",
        /// `EM_RISCV`.
        RiscV = 243 => "RISC-V",
    }
}

code_enum! {
    /// Program header segment type (`p_type`).
    pub enum SegmentType: u32, unknown = "Unknown" {
        /// `PT_NULL`: unused entry.
        Null = 0 => "NULL",
        /// `PT_LOAD`: loadable segment.
        Load = 1 => "LOAD",
        /// `PT_DYNAMIC`: dynamic linking information.
        Dynamic = 2 => "DYNAMIC",
        /// `PT_INTERP`: path of the program interpreter.
        Interp = 3 => "INTERP",
        /// `PT_NOTE`: auxiliary information.
        Note = 4 => "NOTE",
        /// `PT_SHLIB`: reserved.
        Shlib = 5 => "SHLIB",
        /// `PT_PHDR`: the program header table itself.
        Phdr = 6 => "PHDR",
    }
}

code_enum! {
    /// Section type (`sh_type`).
    ///
    /// Codes 12 to 14 carry the processor/user range names under the
    /// numbering this tool has always reported for them.
    pub enum SectionType: u32, unknown = "Unknown" {
        /// `SHT_NULL`: inactive header.
        Null = 0 => "NULL",
        /// `SHT_PROGBITS`: program-defined contents.
        ProgBits = 1 => "PROGBITS",
        /// `SHT_SYMTAB`: symbol table.
        SymTab = 2 => "SYMTAB",
        /// `SHT_STRTAB`: string table.
        StrTab = 3 => "STRTAB",
        /// `SHT_RELA`: relocations with addends.
        Rela = 4 => "RELA",
        /// `SHT_HASH`: symbol hash table.
        Hash = 5 => "HASH",
        /// `SHT_DYNAMIC`: dynamic linking information.
        Dynamic = 6 => "DYNAMIC",
        /// `SHT_NOTE`: notes.
        Note = 7 => "NOTE",
        /// `SHT_NOBITS`: occupies no file space (`.bss`).
        NoBits = 8 => "NOBITS",
        /// `SHT_REL`: relocations without addends.
        Rel = 9 => "REL",
        /// `SHT_SHLIB`: reserved.
        Shlib = 10 => "SHLIB",
        /// `SHT_DYNSYM`: dynamic linker symbol table.
        DynSym = 11 => "DYNSYM",
        /// Processor-specific range.
        LoProc = 12 => "LOPROC, HIPROC",
        /// Start of the application range.
        LoUser = 13 => "LOUSER",
        /// End of the application range.
        HiUser = 14 => "HIUSER",
    }
}

/// ELF class (`e_ident[EI_CLASS]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Class {
    /// `ELFCLASSNONE`.
    None,
    /// `ELFCLASS32`.
    Elf32,
    /// `ELFCLASS64`.
    Elf64,
    /// Any other byte.
    Unknown(u8),
}

impl Class {
    /// Translates the class byte.
    #[must_use]
    pub const fn from_raw(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Elf32,
            2 => Self::Elf64,
            other => Self::Unknown(other),
        }
    }

    /// The raw class byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Elf32 => 1,
            Self::Elf64 => 2,
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Elf32 => f.write_str("ELF32"),
            Self::Elf64 => f.write_str("ELF64"),
            Self::Unknown(code) => write!(f, "Unknown ({code})"),
        }
    }
}

/// Data encoding (`e_ident[EI_DATA]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Endianness {
    /// `ELFDATA2LSB`.
    Little,
    /// `ELFDATA2MSB`.
    Big,
    /// `ELFDATANONE` (0) or any unrecognized byte.
    Unknown(u8),
}

impl Endianness {
    /// Translates the data-encoding byte.
    #[must_use]
    pub const fn from_raw(code: u8) -> Self {
        match code {
            1 => Self::Little,
            2 => Self::Big,
            other => Self::Unknown(other),
        }
    }

    /// The raw data-encoding byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Little => 1,
            Self::Big => 2,
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => f.write_str("Little-endian"),
            Self::Big => f.write_str("Big-endian"),
            Self::Unknown(0) => f.write_str("Unknown"),
            Self::Unknown(code) => write!(f, "Unknown ({code})"),
        }
    }
}

bitflags! {
    /// Segment permission bits (`p_flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SegmentPermissions: u32 {
        /// `PF_X`: executable.
        const X = 0x1;
        /// `PF_W`: writable.
        const W = 0x2;
        /// `PF_R`: readable.
        const R = 0x4;
    }
}

bitflags! {
    /// Section attribute bits (`sh_flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SectionAttributes: u32 {
        /// `SHF_WRITE`: writable at run time.
        const WRITE = 0x1;
        /// `SHF_ALLOC`: occupies memory during execution.
        const ALLOC = 0x2;
        /// `SHF_EXECINSTR`: executable machine instructions.
        const EXECINSTR = 0x4;
        /// `SHF_MERGE`: may be merged to eliminate duplicates.
        const MERGE = 0x10;
        /// `SHF_STRINGS`: NUL-terminated strings.
        const STRINGS = 0x20;
        /// `SHF_INFO_LINK`: `sh_info` holds a section index.
        const INFO_LINK = 0x40;
        /// `SHF_LINK_ORDER`: ordering requirements.
        const LINK_ORDER = 0x80;
        /// `SHF_OS_NONCONFORMING`.
        const OS_NONCONFORMING = 0x100;
        /// `SHF_GROUP`: member of a section group.
        const GROUP = 0x200;
        /// `SHF_TLS`: thread-local storage.
        const TLS = 0x400;
    }
}

/// Decoded segment flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SegmentFlags {
    /// A recognized permission set. Empty means no permissions.
    Known(SegmentPermissions),
    /// A raw value outside the recognized domain.
    Unknown(u32),
}

impl SegmentFlags {
    /// Translates a raw `p_flags` word.
    ///
    /// In [`FlagMode::Exact`] only `0..=7` is recognized. In
    /// [`FlagMode::Bitmask`] every word is accepted and bits beyond `R`, `W`
    /// and `X` are retained.
    #[must_use]
    pub fn from_raw(raw: u32, mode: FlagMode) -> Self {
        match mode {
            FlagMode::Exact if raw > 0b111 => Self::Unknown(raw),
            FlagMode::Exact => Self::Known(SegmentPermissions::from_bits_truncate(raw)),
            FlagMode::Bitmask => Self::Known(SegmentPermissions::from_bits_retain(raw)),
        }
    }

    /// The raw `p_flags` word.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Known(perms) => perms.bits(),
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for SegmentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let perms = match self {
            Self::Unknown(_) => return f.write_str("Unknown"),
            Self::Known(perms) => *perms,
        };
        if perms.is_empty() {
            return f.write_str("None");
        }
        let mut sep = "";
        for (bit, label) in [
            (SegmentPermissions::R, "R"),
            (SegmentPermissions::W, "W"),
            (SegmentPermissions::X, "X"),
        ] {
            if perms.contains(bit) {
                write!(f, "{sep}{label}")?;
                sep = " ";
            }
        }
        let extra = perms.bits() & !SegmentPermissions::all().bits();
        if extra != 0 {
            write!(f, "{sep}{extra:#x}")?;
        }
        Ok(())
    }
}

/// Decoded section flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SectionFlags {
    /// Exactly `SHF_WRITE`.
    Write,
    /// Exactly `SHF_ALLOC`.
    Alloc,
    /// Exactly `SHF_EXECINSTR`.
    ExecInstr,
    /// An arbitrary bit set, produced only in [`FlagMode::Bitmask`].
    Set(SectionAttributes),
    /// Any other raw value in [`FlagMode::Exact`].
    Unknown(u32),
}

impl SectionFlags {
    /// Translates a raw `sh_flags` word.
    #[must_use]
    pub fn from_raw(raw: u32, mode: FlagMode) -> Self {
        match (mode, raw) {
            (FlagMode::Exact, 0x1) => Self::Write,
            (FlagMode::Exact, 0x2) => Self::Alloc,
            (FlagMode::Exact, 0x4) => Self::ExecInstr,
            (FlagMode::Exact, other) => Self::Unknown(other),
            (FlagMode::Bitmask, bits) => Self::Set(SectionAttributes::from_bits_retain(bits)),
        }
    }

    /// The raw `sh_flags` word.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Write => SectionAttributes::WRITE.bits(),
            Self::Alloc => SectionAttributes::ALLOC.bits(),
            Self::ExecInstr => SectionAttributes::EXECINSTR.bits(),
            Self::Set(attrs) => attrs.bits(),
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for SectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => f.write_str("WRITE"),
            Self::Alloc => f.write_str("ALLOC"),
            Self::ExecInstr => f.write_str("EXECINSTR"),
            Self::Unknown(_) => f.write_str("Unknown"),
            Self::Set(attrs) if attrs.is_empty() => f.write_str("None"),
            Self::Set(attrs) => {
                let mut sep = "";
                for (label, _) in attrs.iter_names() {
                    write!(f, "{sep}{label}")?;
                    sep = " ";
                }
                let extra = attrs.bits() & !SectionAttributes::all().bits();
                if extra != 0 {
                    write!(f, "{sep}{extra:#x}")?;
                }
                Ok(())
            }
        }
    }
}
