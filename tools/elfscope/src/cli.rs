//! Command-line interface definitions for elfscope.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use elfscope_elf::FlagMode;

/// Display ELF32 file headers, program headers and section headers.
#[derive(Parser)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent switch"
)]
#[command(name = "elfscope", version, about, disable_help_flag = true)]
pub struct Cli {
    /// ELF file to inspect.
    #[arg(value_name = "FILE", required_unless_present = "file_flag")]
    pub file: Option<PathBuf>,

    /// ELF file to inspect (same as the positional argument).
    #[arg(short = 'f', long = "file", value_name = "FILE", conflicts_with = "file")]
    pub file_flag: Option<PathBuf>,

    /// Display the file header, program headers and section headers.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Display the ELF file header.
    #[arg(short = 'h', long)]
    pub file_header: bool,

    /// Display the program headers.
    #[arg(short = 'l', long)]
    pub program_headers: bool,

    /// Display the section headers.
    #[arg(short = 'S', long)]
    pub section_headers: bool,

    /// How segment and section flag words are matched.
    #[arg(long, value_enum, default_value_t = FlagModeArg::Exact)]
    pub flag_mode: FlagModeArg,

    /// Emit JSON instead of text tables.
    #[arg(long)]
    pub json: bool,

    /// Suppress warnings; show only the report and errors.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print decode diagnostics and timings to stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

/// Flag matching mode, as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FlagModeArg {
    /// Match whole flag words against single known values.
    Exact,
    /// Decode flag words as bit sets.
    Bitmask,
}

impl From<FlagModeArg> for FlagMode {
    fn from(arg: FlagModeArg) -> Self {
        match arg {
            FlagModeArg::Exact => FlagMode::Exact,
            FlagModeArg::Bitmask => FlagMode::Bitmask,
        }
    }
}

/// Which parts of the file to display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// The file header block.
    pub file_header: bool,
    /// The program header table.
    pub program_headers: bool,
    /// The section header table.
    pub section_headers: bool,
}

impl Cli {
    /// The input path, from either the positional argument or `-f`.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref().or(self.file_flag.as_deref())
    }

    /// Resolves the display switches. With none given, everything is shown.
    pub fn selection(&self) -> Selection {
        let none = !(self.file_header || self.program_headers || self.section_headers);
        let all = self.all || none;
        Selection {
            file_header: all || self.file_header,
            program_headers: all || self.program_headers,
            section_headers: all || self.section_headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("elfscope").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults_to_everything() {
        let cli = parse(&["a.out"]);
        assert_eq!(cli.path(), Some(Path::new("a.out")));
        assert_eq!(
            cli.selection(),
            Selection {
                file_header: true,
                program_headers: true,
                section_headers: true,
            }
        );
        assert_eq!(cli.flag_mode, FlagModeArg::Exact);
    }

    #[test]
    fn single_switches() {
        let cli = parse(&["-S", "-f", "lib.so"]);
        assert_eq!(cli.path(), Some(Path::new("lib.so")));
        assert_eq!(
            cli.selection(),
            Selection {
                file_header: false,
                program_headers: false,
                section_headers: true,
            }
        );

        let cli = parse(&["-h", "-l", "a.out"]);
        let sel = cli.selection();
        assert!(sel.file_header && sel.program_headers && !sel.section_headers);
    }

    #[test]
    fn all_overrides_switches() {
        let cli = parse(&["-a", "-l", "a.out"]);
        assert!(cli.selection().section_headers);
    }

    #[test]
    fn flag_mode_value() {
        let cli = parse(&["--flag-mode", "bitmask", "a.out"]);
        assert_eq!(FlagMode::from(cli.flag_mode), FlagMode::Bitmask);
    }

    #[test]
    fn file_is_required() {
        assert!(Cli::try_parse_from(["elfscope", "-a"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["elfscope", "-q", "-v", "a.out"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
