//! Decode configuration.

/// How the raw `p_flags` and `sh_flags` words are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FlagMode {
    /// Match the whole word against single known values.
    ///
    /// Segment flags map only for values `0..=7`; section flags map only for
    /// exactly `WRITE`, `ALLOC` or `EXECINSTR`. Everything else, including
    /// combinations such as `WRITE | ALLOC`, decodes to `Unknown`.
    #[default]
    Exact,
    /// Treat the word as a set of independent bits.
    Bitmask,
}

/// Options shared by the table decoders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Interpretation of segment and section flag words.
    pub flag_mode: FlagMode,
}

impl DecodeOptions {
    /// Options with the given flag mode.
    #[must_use]
    pub fn with_flag_mode(flag_mode: FlagMode) -> Self {
        Self { flag_mode }
    }
}
