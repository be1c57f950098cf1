//! Report rendering: readelf-style text tables and JSON.

use std::io::{self, Write};

use elfscope_elf::{FileHeader, ProgramHeaderEntry, SectionHeaderEntry};
use serde::Serialize;

/// Everything decoded for one invocation.
pub struct Report {
    /// The file header. Always decoded, since the tables depend on it.
    pub header: FileHeader,
    /// Whether the file header block was requested.
    pub show_header: bool,
    /// Program header table, if requested.
    pub program_headers: Option<Vec<ProgramHeaderEntry>>,
    /// Section header table, if requested.
    pub section_headers: Option<Vec<SectionHeaderEntry>>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file_header: Option<&'a FileHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    program_headers: Option<&'a [ProgramHeaderEntry]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_headers: Option<&'a [SectionHeaderEntry]>,
}

/// Serialize the requested parts of `report` as pretty-printed JSON.
pub fn write_json(w: &mut impl Write, report: &Report) -> serde_json::Result<()> {
    let json = JsonReport {
        file_header: report.show_header.then_some(&report.header),
        program_headers: report.program_headers.as_deref(),
        section_headers: report.section_headers.as_deref(),
    };
    serde_json::to_writer_pretty(&mut *w, &json)?;
    writeln!(w).map_err(serde_json::Error::io)
}

/// Render the requested parts of `report` as text, separated by blank lines.
pub fn write_text(w: &mut impl Write, report: &Report) -> io::Result<()> {
    let mut blocks = 0;
    if report.show_header {
        write_file_header(w, &report.header)?;
        blocks += 1;
    }
    if let Some(phdrs) = &report.program_headers {
        if blocks > 0 {
            writeln!(w)?;
        }
        write_program_headers(w, &report.header, phdrs)?;
        blocks += 1;
    }
    if let Some(shdrs) = &report.section_headers {
        if blocks > 0 {
            writeln!(w)?;
        }
        write_section_headers(w, &report.header, shdrs)?;
    }
    Ok(())
}

fn write_file_header(w: &mut impl Write, hdr: &FileHeader) -> io::Result<()> {
    let ident = &hdr.identification;
    let fields: [(&str, String); 18] = [
        ("Class:", ident.class.to_string()),
        ("Data:", ident.endianness.to_string()),
        ("Version:", ident.ident_version.to_string()),
        ("OS/ABI:", ident.os_abi.to_string()),
        ("ABI Version:", ident.abi_version.to_string()),
        ("File Type:", hdr.object_type.to_string()),
        ("Supported machine:", hdr.machine.to_string()),
        ("File version:", format!("{:#x}", hdr.version)),
        ("Entry point address:", format!("{:#x}", hdr.entry_point)),
        (
            "Start of program headers:",
            format!("{} (bytes into file)", hdr.program_header_offset),
        ),
        (
            "Start of section headers:",
            format!("{} (bytes into file)", hdr.section_header_offset),
        ),
        ("Flags:", format!("{:#x}", hdr.flags)),
        ("Size of this header:", format!("{} (bytes)", hdr.header_size)),
        (
            "Size of program headers:",
            format!("{} (bytes)", hdr.program_header_entry_size),
        ),
        (
            "Number of program headers:",
            hdr.program_header_count.to_string(),
        ),
        (
            "Size of section headers:",
            format!("{} (bytes)", hdr.section_header_entry_size),
        ),
        (
            "Number of section headers:",
            hdr.section_header_count.to_string(),
        ),
        (
            "Section header string table index:",
            hdr.section_header_string_index.to_string(),
        ),
    ];
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    writeln!(w, "ELF Header:")?;
    writeln!(w, "  {:<width$} {}", "Magic:", hex_bytes(&elfscope_elf::ELF_MAGIC))?;
    for (label, value) in &fields {
        writeln!(w, "  {label:<width$} {value}")?;
    }
    Ok(())
}

fn write_program_headers(
    w: &mut impl Write,
    hdr: &FileHeader,
    phdrs: &[ProgramHeaderEntry],
) -> io::Result<()> {
    writeln!(w, "ELF file type is {}", hdr.object_type)?;
    writeln!(w, "Entry point {:#x}", hdr.entry_point)?;
    if phdrs.is_empty() {
        writeln!(w, "There are no program headers in this file.")?;
        return Ok(());
    }
    writeln!(
        w,
        "There are {} program headers, starting at offset {}",
        phdrs.len(),
        hdr.program_header_offset
    )?;
    writeln!(w)?;
    writeln!(w, "Program Headers:")?;

    let rows: Vec<Vec<String>> = phdrs
        .iter()
        .map(|p| {
            vec![
                p.segment_type.to_string(),
                format!("{:#08x}", p.offset),
                format!("{:#010x}", p.virtual_addr),
                format!("{:#010x}", p.physical_addr),
                format!("{:#07x}", p.file_size),
                format!("{:#07x}", p.mem_size),
                p.flags.to_string(),
                format!("{:#x}", p.align),
            ]
        })
        .collect();
    write_table(
        w,
        &[
            "Type", "Offset", "VirtAddr", "PhysAddr", "FileSiz", "MemSiz", "Flags", "Align",
        ],
        &rows,
    )
}

fn write_section_headers(
    w: &mut impl Write,
    hdr: &FileHeader,
    shdrs: &[SectionHeaderEntry],
) -> io::Result<()> {
    if shdrs.is_empty() {
        writeln!(w, "There are no sections in this file.")?;
        return Ok(());
    }
    writeln!(
        w,
        "There are {} section headers, starting at offset {:#x}:",
        shdrs.len(),
        hdr.section_header_offset
    )?;
    writeln!(w)?;
    writeln!(w, "Section Headers:")?;

    let rows: Vec<Vec<String>> = shdrs
        .iter()
        .enumerate()
        .map(|(i, s)| {
            vec![
                format!("[{i:2}]"),
                s.name.clone(),
                s.section_type.to_string(),
                format!("{:08x}", s.address),
                format!("{:06x}", s.offset),
                format!("{:06x}", s.size),
                format!("{:02x}", s.entry_size),
                s.flags.to_string(),
                s.link.to_string(),
                s.info.to_string(),
                s.addr_align.to_string(),
            ]
        })
        .collect();
    write_table(
        w,
        &[
            "[Nr]", "Name", "Type", "Address", "Offset", "Size", "EntSize", "Flags", "Link",
            "Info", "Align",
        ],
        &rows,
    )
}

/// Left-aligned table with a dashed rule under the header row. Column
/// widths fit the widest cell.
fn write_table(w: &mut impl Write, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, h)| {
            rows.iter()
                .map(|row| row[col].len())
                .max()
                .unwrap_or(0)
                .max(h.len())
        })
        .collect();

    write_row(w, headers.iter().copied(), &widths)?;
    let rule: Vec<String> = widths.iter().map(|&width| "-".repeat(width)).collect();
    write_row(w, rule.iter().map(String::as_str), &widths)?;
    for row in rows {
        write_row(w, row.iter().map(String::as_str), &widths)?;
    }
    Ok(())
}

fn write_row<'a>(
    w: &mut impl Write,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> io::Result<()> {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(w, "  {}", padded.join("  ").trim_end())
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
