//! Table and JSON rendering for the terminal.

use std::io::{self, Write};

use serde::Serialize;
use shelfmark_core::models::{BookRecord, EditOutcome, OverdueReport};

const NOT_AVAILABLE: &str = "N/A";
const RULE_WIDTH: usize = 100;

/// Print records as a fixed-width table.
pub fn book_table(out: &mut impl Write, heading: &str, records: &[&BookRecord]) -> io::Result<()> {
    writeln!(out, "\n{heading}:")?;
    writeln!(
        out,
        "{:<30} {:<20} {:<15} {:<12} {:<12} {:<10}",
        "Title", "Author", "ISBN", "Status", "Due Date", "Borrower"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    if records.is_empty() {
        writeln!(out, "(no books)")?;
    }
    for record in records {
        let due_date = record
            .due_date()
            .map_or_else(|| NOT_AVAILABLE.to_string(), |d| d.to_string());
        writeln!(
            out,
            "{:<30} {:<20} {:<15} {:<12} {:<12} {:<10}",
            truncate(&record.title, 28),
            truncate(&record.author, 18),
            record.isbn,
            record.status.as_str(),
            due_date,
            record.borrower().unwrap_or(NOT_AVAILABLE),
        )?;
    }
    Ok(())
}

/// Print one record with every field on its own line.
pub fn book_detail(out: &mut impl Write, record: &BookRecord) -> io::Result<()> {
    writeln!(out, "Title:    {}", record.title)?;
    writeln!(out, "Author:   {}", record.author)?;
    writeln!(out, "ISBN:     {}", record.isbn)?;
    writeln!(out, "Status:   {}", record.status.as_str())?;
    if let Some(loan) = record.loan() {
        writeln!(out, "Borrower: {}", loan.borrower)?;
        writeln!(out, "Due Date: {}", loan.due_date)?;
    }
    Ok(())
}

pub fn overdue_table(out: &mut impl Write, report: &OverdueReport) -> io::Result<()> {
    if report.is_empty() {
        writeln!(out, "No overdue books.")?;
        return Ok(());
    }

    writeln!(out, "\nOverdue Books:")?;
    writeln!(
        out,
        "{:<30} {:<15} {:<12} {:<12} {:>6} {:>8}",
        "Title", "ISBN", "Borrower", "Due Date", "Days", "Fine"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for entry in &report.entries {
        let record = &entry.record;
        writeln!(
            out,
            "{:<30} {:<15} {:<12} {:<12} {:>6} {:>8}",
            truncate(&record.title, 28),
            record.isbn,
            truncate(record.borrower().unwrap_or(NOT_AVAILABLE), 10),
            record
                .due_date()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |d| d.to_string()),
            entry.days_overdue,
            entry.fine.to_string(),
        )?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "Total fines: {}", report.total_fine)?;
    Ok(())
}

pub fn edit_summary(out: &mut impl Write, outcome: &EditOutcome) -> io::Result<()> {
    if let Some(reason) = &outcome.isbn_rejected {
        writeln!(out, "ISBN not changed: {reason}")?;
    }
    if outcome.changed_anything() {
        writeln!(out, "Book updated successfully.")?;
    } else {
        writeln!(out, "Nothing to update.")?;
    }
    book_detail(out, &outcome.record)
}

pub fn json(out: &mut impl Write, value: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// Shorten `text` to at most `max` characters.
fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
