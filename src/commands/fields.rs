use crate::report::{vocabulary, ReportType, FIELD_VOCABULARY_VERSION};
use anyhow::Result;
use std::io::Write;

pub fn print_fields(report: ReportType) -> Result<()> {
    let stdout = std::io::stdout();
    write_fields(report, &mut stdout.lock())
}

/// Version header, then one field id per line in template order.
pub fn write_fields<W: Write>(report: ReportType, writer: &mut W) -> Result<()> {
    writeln!(writer, "# {} field vocabulary {}", report, FIELD_VOCABULARY_VERSION)?;
    for field in vocabulary(report) {
        writeln!(writer, "{}", field)?;
    }
    Ok(())
}
