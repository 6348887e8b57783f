use speculate2::speculate;

speculate! {
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    use clap::Parser;
    use shelfmark::{run, Cli};
    use tempfile::TempDir;

    fn shelfmark(dir: &Path, args: &[&str], input: &str) -> anyhow::Result<String> {
        let data_file = dir.join("library_books.csv");
        let report_dir = dir.join("reports");
        let mut argv = vec![
            "shelfmark",
            "--data-file",
            data_file.to_str().unwrap(),
            "--report-dir",
            report_dir.to_str().unwrap(),
        ];
        argv.extend_from_slice(args);

        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(cli, &mut Cursor::new(input.as_bytes()), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    before {
        let dir = TempDir::new().unwrap();
        shelfmark(dir.path(), &["add", "Book A", "Author A", "1111111111111"], "").unwrap();
    }

    describe "add and list" {
        it "shows the added book in the inventory table" {
            let out = shelfmark(dir.path(), &["list"], "").unwrap();

            assert!(out.contains("Current Library Inventory:"));
            assert!(out.contains("Book A"));
            assert!(out.contains("1111111111111"));
        }

        it "lists by default when no command is given" {
            let out = shelfmark(dir.path(), &[], "").unwrap();
            assert!(out.contains("Book A"));
        }

        it "writes the canonical data file" {
            let contents = fs::read_to_string(dir.path().join("library_books.csv")).unwrap();
            assert_eq!(
                contents,
                "title,author,isbn,status,due_date,borrower\nBook A,Author A,1111111111111,available,,\n"
            );
        }

        it "rejects a malformed ISBN" {
            let err = shelfmark(dir.path(), &["add", "Book B", "Author B", "12345"], "").unwrap_err();
            assert!(err.to_string().contains("13 digits"));
        }
    }

    describe "search" {
        it "rejects unknown fields at parse time" {
            assert!(shelfmark(dir.path(), &["search", "publisher", "x"], "").is_err());
        }

        it "prints JSON when asked" {
            let out = shelfmark(dir.path(), &["--json", "search", "title", "book"], "").unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

            assert_eq!(parsed[0]["isbn"], "1111111111111");
            assert_eq!(parsed[0]["status"], "available");
        }
    }

    describe "lending" {
        it "checks out, reports overdue fines, and returns" {
            let out = shelfmark(dir.path(), &["checkout", "1111111111111", "Bob"], "").unwrap();
            assert!(out.contains("Book checked out to Bob"));

            let out = shelfmark(dir.path(), &["overdue", "--as-of", "2999-01-01"], "").unwrap();
            assert!(out.contains("Book A"));
            assert!(out.contains("Total fines:"));

            shelfmark(dir.path(), &["return", "1111111111111"], "").unwrap();
            let out = shelfmark(dir.path(), &["overdue", "--as-of", "2999-01-01"], "").unwrap();
            assert!(out.contains("No overdue books."));
        }

        it "honours the configured loan period" {
            shelfmark(dir.path(), &["--loan-days", "1", "checkout", "1111111111111", "Bob"], "").unwrap();

            let out = shelfmark(dir.path(), &["--json", "find", "1111111111111"], "").unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
            let due = chrono::Local::now().date_naive() + chrono::Days::new(1);
            assert_eq!(parsed["due_date"], due.to_string());
            assert_eq!(parsed["borrower"], "Bob");
            assert_eq!(parsed["status"], "checked out");
        }
    }

    describe "edit" {
        it "reports a rejected ISBN in JSON output" {
            let out = shelfmark(
                dir.path(),
                &["--json", "edit", "1111111111111", "--title", "Book A2", "--new-isbn", "12345"],
                "",
            )
            .unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

            assert_eq!(parsed["title_changed"], true);
            assert_eq!(parsed["isbn_changed"], false);
            assert!(parsed["isbn_rejected"].as_str().unwrap().contains("13 digits"));
            assert_eq!(parsed["record"]["title"], "Book A2");
            assert_eq!(parsed["record"]["isbn"], "1111111111111");
        }
    }

    describe "delete" {
        it "asks for confirmation and keeps the book on no" {
            let out = shelfmark(dir.path(), &["delete", "1111111111111"], "no\n").unwrap();

            assert!(out.contains("Deletion cancelled."));
            assert!(shelfmark(dir.path(), &["find", "1111111111111"], "").is_ok());
        }

        it "deletes after a yes" {
            shelfmark(dir.path(), &["delete", "1111111111111"], "yes\n").unwrap();

            assert!(shelfmark(dir.path(), &["find", "1111111111111"], "").is_err());
        }

        it "refuses a checked-out book before asking for confirmation" {
            shelfmark(dir.path(), &["checkout", "1111111111111", "Bob"], "").unwrap();

            let err = shelfmark(dir.path(), &["delete", "1111111111111"], "").unwrap_err();

            assert!(err.to_string().contains("currently checked out"), "{err}");
            assert!(shelfmark(dir.path(), &["find", "1111111111111"], "").is_ok());
        }

        it "skips the prompt with --yes" {
            let out = shelfmark(dir.path(), &["delete", "--yes", "1111111111111"], "").unwrap();
            assert!(out.contains("deleted successfully"));
        }
    }

    describe "export" {
        it "writes a timestamped inventory report" {
            let out = shelfmark(dir.path(), &["export", "inventory"], "").unwrap();
            assert!(out.contains("inventory_report_"));

            let reports: Vec<_> = fs::read_dir(dir.path().join("reports")).unwrap().collect();
            assert_eq!(reports.len(), 1);
        }
    }
}
