//! Human-readable and JSON citation reports.

use std::io::{self, Write};

use citecompass_config::{ReportConfig, ReportFormat};
use serde::Serialize;

use crate::entry::CitationEntry;
use crate::registry::CitationRegistry;

#[derive(Serialize)]
struct JsonReport<'a> {
    all: Vec<&'a CitationEntry>,
    used: Vec<&'a CitationEntry>,
    imports: Vec<String>,
}

/// Write a report of `registry` to `out` in the configured format.
pub fn write_report<W: Write>(
    out: &mut W,
    registry: &CitationRegistry,
    options: &ReportConfig,
) -> io::Result<()> {
    let visible = |e: &&CitationEntry| options.include_imports || !e.import_marker;
    let all: Vec<&CitationEntry> = registry.entries().filter(visible).collect();
    let used: Vec<&CitationEntry> = registry.used_entries().filter(visible).collect();

    match options.format {
        ReportFormat::Json => {
            let report = JsonReport {
                all,
                used,
                imports: registry.all_imports(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)
        }
        ReportFormat::Text => {
            write_section(out, "All citations", &all, options.show_urls)?;
            write_section(out, "Used citations", &used, options.show_urls)?;
            if options.include_imports {
                writeln!(out, "Imports:")?;
                for name in registry.all_imports() {
                    writeln!(out, "  {name}")?;
                }
            }
            Ok(())
        }
    }
}

fn write_section<W: Write>(
    out: &mut W,
    heading: &str,
    entries: &[&CitationEntry],
    show_urls: bool,
) -> io::Result<()> {
    writeln!(out, "{heading}:")?;
    if entries.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for entry in entries {
        writeln!(out, "  {entry}")?;
        if show_urls {
            for url in &entry.urls {
                writeln!(out, "    <{url}>")?;
            }
        }
    }
    Ok(())
}

/// Render a report to a string.
pub fn render_report(registry: &CitationRegistry, options: &ReportConfig) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_report(&mut buf, registry, options);
    String::from_utf8_lossy(&buf).into_owned()
}
