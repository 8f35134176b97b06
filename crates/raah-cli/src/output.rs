use std::io::Write;

use owo_colors::OwoColorize;
use raah_core::{Book, ChapterCount, ComparisonPayload, Edition, HealthStatus};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

pub const MISSING_VERSE: &str = "Verse not available";

pub fn print_editions(
    w: &mut dyn Write,
    editions: &[Edition],
    color: ColorMode,
) -> std::io::Result<()> {
    if editions.is_empty() {
        writeln!(w, "No versions available")?;
        return Ok(());
    }
    let id_width = editions.iter().map(|e| e.id.len()).max().unwrap_or(0);
    for edition in editions {
        let id = format!("{:<id_width$}", edition.id);
        let detail = if edition.name.is_empty() {
            format!("{} ({})", edition.abbreviation, edition.language)
        } else {
            format!(
                "{} {} ({})",
                edition.abbreviation, edition.name, edition.language
            )
        };
        if color.enabled() {
            writeln!(w, "{}  {}", id.bold(), detail)?;
        } else {
            writeln!(w, "{}  {}", id, detail)?;
        }
    }
    Ok(())
}

pub fn print_books(
    w: &mut dyn Write,
    edition_id: &str,
    books: &[Book],
    color: ColorMode,
) -> std::io::Result<()> {
    let header = format!("Books in {} ({})", edition_id, books.len());
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    let id_width = books.iter().map(|b| b.id.len()).max().unwrap_or(0);
    for book in books {
        let chapters = match book.chapter_count {
            ChapterCount::Known(1) => "1 chapter".to_string(),
            ChapterCount::Known(n) => format!("{n} chapters"),
            ChapterCount::Unknown => "chapters unknown".to_string(),
        };
        if color.enabled() {
            writeln!(
                w,
                "  {:<id_width$}  {}  {}",
                book.id,
                book.name,
                chapters.dimmed()
            )?;
        } else {
            writeln!(w, "  {:<id_width$}  {}  {}", book.id, book.name, chapters)?;
        }
    }
    Ok(())
}

/// Print a chapter with one line per edition under each verse number.
/// `columns` are `(edition_id, label)` pairs in display order.
pub fn print_comparison(
    w: &mut dyn Write,
    payload: &ComparisonPayload,
    columns: &[(String, String)],
    color: ColorMode,
) -> std::io::Result<()> {
    let heading = payload.heading();
    if color.enabled() {
        writeln!(w, "{}", heading.bold().underline())?;
    } else {
        writeln!(w, "{}", heading)?;
        writeln!(w, "{}", "=".repeat(heading.chars().count()))?;
    }

    if payload.verses.is_empty() {
        writeln!(w, "(no verses)")?;
        return Ok(());
    }

    let label_width = columns
        .iter()
        .map(|(_, label)| label.chars().count())
        .max()
        .unwrap_or(0);
    for verse in &payload.verses {
        writeln!(w)?;
        if color.enabled() {
            writeln!(w, "{}", verse.number.to_string().cyan().bold())?;
        } else {
            writeln!(w, "{}", verse.number)?;
        }
        for (id, label) in columns {
            let label = format!("{label:<label_width$}");
            match (verse.text_for(id), color.enabled()) {
                (Some(text), true) => writeln!(w, "  {}  {}", label.dimmed(), text)?,
                (Some(text), false) => writeln!(w, "  {}  {}", label, text)?,
                (None, true) => writeln!(w, "  {}  {}", label.dimmed(), MISSING_VERSE.yellow().italic())?,
                (None, false) => writeln!(w, "  {}  {}", label, MISSING_VERSE)?,
            }
        }
    }
    Ok(())
}

pub fn print_health(
    w: &mut dyn Write,
    base_url: &str,
    health: &HealthStatus,
    color: ColorMode,
) -> std::io::Result<()> {
    let ok = health.status.eq_ignore_ascii_case("healthy");
    let status = if color.enabled() {
        if ok {
            health.status.green().bold().to_string()
        } else {
            health.status.red().bold().to_string()
        }
    } else {
        health.status.clone()
    };
    write!(w, "{}: {}", base_url, status)?;
    if !health.message.is_empty() {
        write!(w, " ({})", health.message)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print an error line to stderr-like output.
pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "error:".red().bold(), message)
    } else {
        writeln!(w, "error: {}", message)
    }
}
