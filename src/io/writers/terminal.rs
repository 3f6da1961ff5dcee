use crate::io::output::OutputWriter;
use crate::report::{ContextValue, ReportContext};
use crate::tables::{Cell, PresentationTable};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Color, ContentArrangement, Table};
use std::io::Write;

/// Human summary of a compiled context: scalar fields in one table, then
/// every presentation table, then the fields left unset.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, context: &ReportContext) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".cyan())?;
        writeln!(
            self.writer,
            "{}",
            format!("   REPORT CONTEXT ({})", context.report().code().to_uppercase())
                .bold()
                .cyan()
        )?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".cyan())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_scalars(&mut self, context: &ReportContext) -> anyhow::Result<()> {
        let mut table = new_table();
        table.set_header(vec!["Field", "Value"]);
        for (field, value) in context.entries() {
            if !matches!(value, ContextValue::Table(_)) {
                table.add_row(vec![field.to_string(), value.summary()]);
            }
        }
        writeln!(self.writer, "{}", table)?;
        Ok(())
    }

    fn write_tables(&mut self, context: &ReportContext) -> anyhow::Result<()> {
        for (field, value) in context.entries() {
            if let ContextValue::Table(presentation) = value {
                writeln!(self.writer)?;
                writeln!(
                    self.writer,
                    "{} {}",
                    field.to_string().bold(),
                    format!("({} rows)", presentation.row_count()).dimmed()
                )?;
                writeln!(self.writer, "{}", render_table(presentation))?;
            }
        }
        Ok(())
    }

    fn write_missing(&mut self, context: &ReportContext) -> anyhow::Result<()> {
        let missing = context.missing_fields();
        writeln!(self.writer)?;
        if missing.is_empty() {
            writeln!(self.writer, "{}", "All template fields are set.".green())?;
        } else {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            writeln!(
                self.writer,
                "{} {}",
                format!("{} fields not set:", missing.len()).yellow(),
                names.join(", ")
            )?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_context(&mut self, context: &ReportContext) -> anyhow::Result<()> {
        self.write_header(context)?;
        self.write_scalars(context)?;
        self.write_tables(context)?;
        self.write_missing(context)?;
        Ok(())
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Flagged cells are shown in red; merged cells are printed only on the
/// first row of their span.
fn render_table(presentation: &PresentationTable) -> Table {
    let mut table = new_table();
    table.set_header(
        presentation
            .columns()
            .iter()
            .map(|c| c.title.clone())
            .collect::<Vec<_>>(),
    );
    for row in presentation.rows() {
        table.add_row(row.iter().map(|cell| match cell {
            Cell::Flagged(_) => comfy_table::Cell::new(cell.display()).fg(Color::Red),
            other => comfy_table::Cell::new(other.display()),
        }));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fields::qsd;
    use crate::report::ReportType;
    use crate::tables::Column;

    #[test]
    fn prints_scalars_tables_and_missing_fields() {
        colored::control::set_override(false);
        let mut presentation =
            PresentationTable::new(vec![Column::named("Ponto"), Column::named("Cromo")]);
        presentation.push_row(vec![Cell::text("P1"), Cell::Flagged("0,06".into())]);

        let mut context = ReportContext::new(ReportType::Sediment);
        context.insert(qsd::QSD_14, ContextValue::Integer(1)).unwrap();
        context.insert(qsd::QSD_38, ContextValue::Table(presentation)).unwrap();

        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer).write_context(&context).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("REPORT CONTEXT (QSD)"));
        assert!(output.contains("QSD_14"));
        assert!(output.contains("QSD_38"));
        assert!(output.contains("0,06"));
        assert!(output.contains("fields not set"));
    }
}
