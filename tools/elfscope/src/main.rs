//! elfscope: display the structure of ELF32 files.
//!
//! Pipeline: read file → decode header → decode requested tables →
//!           render text or JSON to stdout.

mod cli;
mod output;
mod verbose;

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use elfscope_elf::{
    DecodeError, DecodeOptions, decode_file_header, decode_program_headers_with,
    decode_section_headers_with,
};
use output::Report;
use verbose::{Timer, vprintln, wprintln};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    let Some(path) = cli.path() else {
        bail!("no input file given");
    };
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    vprintln!("read {} ({} bytes)", path.display(), data.len());

    let options = DecodeOptions::with_flag_mode(cli.flag_mode.into());
    let report = decode(&data, cli.selection(), &options)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let mut out = BufWriter::new(io::stdout().lock());
    if cli.json {
        output::write_json(&mut out, &report)?;
    } else {
        output::write_text(&mut out, &report)?;
    }
    out.flush()?;
    Ok(())
}

/// Decode the header and whichever tables `selection` asks for.
///
/// Tables that were not requested are never touched, so `-h` still works on
/// a file whose tables are damaged.
fn decode(
    data: &[u8],
    selection: cli::Selection,
    options: &DecodeOptions,
) -> Result<Report, DecodeError> {
    let _t = Timer::start("decode");

    let header = decode_file_header(data)?;
    vprintln!(
        "  {} {} {}, layout {:?}",
        header.identification.class,
        header.identification.endianness,
        header.machine,
        header.layout()
    );

    let program_headers = if selection.program_headers {
        let table = header.program_table();
        vprintln!(
            "  program headers: {} x {} bytes at {:#x}",
            table.count,
            table.entry_size,
            table.offset
        );
        Some(decode_program_headers_with(data, &header, options)?)
    } else {
        None
    };

    let section_headers = if selection.section_headers {
        let table = header.section_table();
        vprintln!(
            "  section headers: {} x {} bytes at {:#x}, names in section {}",
            table.count,
            table.entry_size,
            table.offset,
            header.section_header_string_index
        );
        match decode_section_headers_with(data, &header, options) {
            Ok(sections) => Some(sections),
            Err(err @ DecodeError::InvalidStringTableIndex { .. }) => {
                wprintln!("{err}; section names left empty");
                err.into_sections()
            }
            Err(err) => return Err(err),
        }
    } else {
        None
    };

    Ok(Report {
        header,
        show_header: selection.file_header,
        program_headers,
        section_headers,
    })
}
