//! Command-line surface: argument parsing and command dispatch.
//!
//! Each command runs exactly one catalog or lending operation and renders
//! its result. No business rules live here.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use shelfmark_core::lending::today;
use shelfmark_core::models::{CreateBookInput, Fine, SearchField, UpdateBookInput};
use shelfmark_core::{report, Catalog, ConflictError, CsvStore, LendingEngine, LibraryConfig};

use crate::display;

#[derive(Debug, Parser)]
#[command(name = "shelfmark")]
#[command(about = "Track a small library's books and loans in a CSV file")]
pub struct Cli {
    /// Path of the CSV data file
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Directory for exported reports
    #[arg(long, global = true)]
    pub report_dir: Option<PathBuf>,

    /// Length of a loan in days
    #[arg(long, global = true)]
    pub loan_days: Option<u32>,

    /// Late fee per overdue day, e.g. 0.50
    #[arg(long, global = true, value_parser = parse_fine)]
    pub fine_per_day: Option<Fine>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show every book in the catalog
    List,
    /// Add a new book
    Add {
        title: String,
        author: String,
        /// 13-digit ISBN
        isbn: String,
    },
    /// Show one book by ISBN
    Find { isbn: String },
    /// Search by title, author or ISBN (case-insensitive substring)
    Search {
        #[arg(value_parser = parse_field)]
        field: SearchField,
        term: String,
    },
    /// Change a book's title, author or ISBN
    Edit {
        isbn: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        new_isbn: Option<String>,
    },
    /// Remove a book that is not checked out
    Delete {
        isbn: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Lend a book
    Checkout { isbn: String, borrower: String },
    /// Take a book back
    Return { isbn: String },
    /// List overdue books and fines
    Overdue {
        /// Date to compute overdue days against (YYYY-MM-DD); defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Write a timestamped CSV report
    Export {
        #[command(subcommand)]
        report: ExportCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Every book in the catalog
    Inventory,
    /// Overdue books with days overdue and fine
    Overdue {
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

impl Cli {
    /// Defaults from the platform data directory, overridden by flags.
    pub fn config(&self) -> LibraryConfig {
        let mut config = LibraryConfig::from_default_dirs();
        if let Some(path) = &self.data_file {
            config.data_file = path.clone();
        }
        if let Some(dir) = &self.report_dir {
            config.report_dir = dir.clone();
        }
        if let Some(days) = self.loan_days {
            config.policy.loan_period_days = days;
        }
        if let Some(fine) = self.fine_per_day {
            config.policy.fine_per_day = fine;
        }
        config
    }
}

fn parse_fine(raw: &str) -> Result<Fine, String> {
    Fine::parse(raw).map_err(|e| e.to_string())
}

fn parse_field(raw: &str) -> Result<SearchField, String> {
    SearchField::from_str(raw).ok_or_else(|| format!("unknown field {raw:?} (use title, author or isbn)"))
}

/// Execute `cli` against the configured catalog, reading confirmations
/// from `input` and writing results to `out`.
pub fn run(cli: Cli, input: &mut impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    let config = cli.config();
    tracing::debug!("Using data file {}", config.data_file.display());

    let mut catalog = Catalog::open(CsvStore::new(&config.data_file))
        .with_context(|| format!("Failed to open {}", config.data_file.display()))?;
    let engine = LendingEngine::new(config.policy);

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => {
            let records: Vec<_> = catalog.list().iter().collect();
            if cli.json {
                display::json(out, &records)?;
            } else {
                display::book_table(out, "Current Library Inventory", &records)?;
            }
        }
        Commands::Add { title, author, isbn } => {
            let record = catalog.add(CreateBookInput { title, author, isbn })?;
            if cli.json {
                display::json(out, &record)?;
            } else {
                writeln!(out, "Book {:?} added successfully.", record.title)?;
            }
        }
        Commands::Find { isbn } => {
            let record = catalog.find(&isbn)?;
            if cli.json {
                display::json(out, record)?;
            } else {
                display::book_detail(out, record)?;
            }
        }
        Commands::Search { field, term } => {
            let hits = catalog.search(field, &term);
            if cli.json {
                display::json(out, &hits)?;
            } else if hits.is_empty() {
                writeln!(out, "No books found with {} matching {:?}.", field.as_str(), term)?;
            } else {
                display::book_table(out, "Search Results", &hits)?;
            }
        }
        Commands::Edit {
            isbn,
            title,
            author,
            new_isbn,
        } => {
            let outcome = catalog.edit(
                &isbn,
                UpdateBookInput {
                    title,
                    author,
                    isbn: new_isbn,
                },
            )?;
            if cli.json {
                display::json(out, &outcome)?;
            } else {
                display::edit_summary(out, &outcome)?;
            }
        }
        Commands::Delete { isbn, yes } => {
            let record = catalog.find(&isbn)?;
            if record.is_checked_out() {
                return Err(ConflictError::DeleteWhileCheckedOut(record.isbn.to_string()).into());
            }
            if !yes && !confirm(input, out, &format!("Delete {:?} ({})?", record.title, record.isbn))? {
                writeln!(out, "Deletion cancelled.")?;
                return Ok(());
            }
            let removed = catalog.delete(&isbn)?;
            writeln!(out, "Book {:?} deleted successfully.", removed.title)?;
        }
        Commands::Checkout { isbn, borrower } => {
            let due = engine.check_out(&mut catalog, &isbn, &borrower)?;
            writeln!(out, "Book checked out to {}. Due date: {}", borrower.trim(), due)?;
        }
        Commands::Return { isbn } => {
            let record = engine.return_book(&mut catalog, &isbn)?;
            writeln!(out, "Book {:?} returned successfully.", record.title)?;
        }
        Commands::Overdue { as_of } => {
            let report = engine.overdue(&catalog, as_of.unwrap_or_else(today));
            if cli.json {
                display::json(out, &report)?;
            } else {
                display::overdue_table(out, &report)?;
            }
        }
        Commands::Export { report: kind } => {
            let generated_at = Local::now().naive_local();
            let path = match kind {
                ExportCommand::Inventory => {
                    report::export_inventory(catalog.list(), &config.report_dir, generated_at)?
                }
                ExportCommand::Overdue { as_of } => report::export_overdue(
                    catalog.list(),
                    as_of.unwrap_or_else(today),
                    engine.policy(),
                    &config.report_dir,
                    generated_at,
                )?,
            };
            writeln!(out, "Report written to {}", path.display())?;
        }
    }

    Ok(())
}

/// Ask a yes/no question. Anything but `y`/`yes` counts as no.
fn confirm(input: &mut impl BufRead, out: &mut impl Write, question: &str) -> anyhow::Result<bool> {
    write!(out, "{question} (yes/no): ")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        bail!("No confirmation given; pass --yes to delete without prompting");
    }
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
