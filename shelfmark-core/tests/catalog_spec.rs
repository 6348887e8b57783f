use speculate2::speculate;

speculate! {
    use std::fs;

    use shelfmark_core::models::{BookStatus, CreateBookInput, SearchField, UpdateBookInput};
    use shelfmark_core::{
        Catalog, ConflictError, CsvStore, LendingEngine, LibraryError, Missing, ValidationError,
    };
    use tempfile::TempDir;

    fn book(title: &str, author: &str, isbn: &str) -> CreateBookInput {
        CreateBookInput {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }

    fn reopen(dir: &TempDir) -> Catalog {
        Catalog::open(CsvStore::new(dir.path().join("library_books.csv"))).unwrap()
    }

    before {
        let dir = TempDir::new().unwrap();
        let mut catalog = reopen(&dir);
    }

    describe "add" {
        it "creates an available record that find returns" {
            catalog.add(book("Dune", "Frank Herbert", "1111111111111")).unwrap();

            let found = catalog.find("1111111111111").unwrap();
            assert_eq!(found.title, "Dune");
            assert_eq!(found.status, BookStatus::Available);
            assert!(found.due_date().is_none());
            assert!(found.borrower().is_none());
        }

        it "persists before returning" {
            catalog.add(book("Dune", "Frank Herbert", "1111111111111")).unwrap();

            let reloaded = reopen(&dir);
            assert_eq!(reloaded.list(), catalog.list());
        }

        it "rejects malformed ISBNs and leaves the catalog unchanged" {
            for isbn in ["", "123456789012", "12345678901234", "12345678901X3", "978-0-441-17271-9"] {
                let result = catalog.add(book("Dune", "Frank Herbert", isbn));
                assert!(
                    matches!(result, Err(LibraryError::Validation(ValidationError::MalformedIsbn(_)))),
                    "{isbn:?} should be rejected"
                );
            }
            assert!(catalog.is_empty());
            assert!(reopen(&dir).is_empty());
        }

        it "rejects a duplicate ISBN" {
            catalog.add(book("Dune", "Frank Herbert", "1111111111111")).unwrap();

            let result = catalog.add(book("Emma", "Jane Austen", "1111111111111"));

            assert!(matches!(
                result,
                Err(LibraryError::Validation(ValidationError::DuplicateIsbn(_)))
            ));
            assert_eq!(catalog.len(), 1);
        }
    }

    describe "find" {
        it "reports unknown ISBNs as not found" {
            assert!(matches!(
                catalog.find("9999999999999"),
                Err(LibraryError::NotFound { isbn, missing: Missing::Book }) if isbn == "9999999999999"
            ));
        }
    }

    describe "search" {
        before {
            catalog.add(book("Pride and Prejudice", "Jane Austen", "1111111111111")).unwrap();
            catalog.add(book("Emma", "Jane Austen", "2222222222222")).unwrap();
            catalog.add(book("Dune", "Frank Herbert", "3333333333333")).unwrap();
        }

        it "matches substrings regardless of case" {
            let titles: Vec<&str> = catalog
                .search(SearchField::Author, "jane")
                .into_iter()
                .map(|r| r.title.as_str())
                .collect();
            assert_eq!(titles, vec!["Pride and Prejudice", "Emma"]);

            assert_eq!(catalog.search(SearchField::Title, "PREJ").len(), 1);
            assert_eq!(catalog.search(SearchField::Isbn, "3333").len(), 1);
        }

        it "returns an empty result when nothing matches" {
            assert!(catalog.search(SearchField::Title, "Ulysses").is_empty());
        }
    }

    describe "edit" {
        before {
            catalog.add(book("Dune", "Frank Herbert", "1111111111111")).unwrap();
            catalog.add(book("Emma", "Jane Austen", "2222222222222")).unwrap();
        }

        it "changes the ISBN when the new one is valid and unused" {
            let outcome = catalog
                .edit("1111111111111", UpdateBookInput {
                    isbn: Some("3333333333333".into()),
                    ..Default::default()
                })
                .unwrap();

            assert!(outcome.isbn_changed);
            assert!(catalog.find("1111111111111").is_err());
            assert_eq!(reopen(&dir).find("3333333333333").unwrap().title, "Dune");
        }

        it "keeps the old ISBN but applies other fields when the new ISBN is malformed" {
            let outcome = catalog
                .edit("1111111111111", UpdateBookInput {
                    title: Some("Dune Messiah".into()),
                    author: None,
                    isbn: Some("12345".into()),
                })
                .unwrap();

            assert!(outcome.title_changed);
            assert!(!outcome.isbn_changed);
            assert!(matches!(outcome.isbn_rejected, Some(ValidationError::MalformedIsbn(_))));
            assert_eq!(catalog.find("1111111111111").unwrap().title, "Dune Messiah");
        }

        it "keeps the old ISBN when the new one belongs to another book" {
            let outcome = catalog
                .edit("1111111111111", UpdateBookInput {
                    author: Some("F. Herbert".into()),
                    isbn: Some("2222222222222".into()),
                    ..Default::default()
                })
                .unwrap();

            assert!(matches!(outcome.isbn_rejected, Some(ValidationError::DuplicateIsbn(_))));
            let record = catalog.find("1111111111111").unwrap();
            assert_eq!(record.author, "F. Herbert");
            assert_eq!(catalog.find("2222222222222").unwrap().title, "Emma");
        }

        it "accepts the record's own ISBN without complaint" {
            let outcome = catalog
                .edit("1111111111111", UpdateBookInput {
                    isbn: Some("1111111111111".into()),
                    ..Default::default()
                })
                .unwrap();

            assert!(outcome.isbn_rejected.is_none());
            assert!(!outcome.changed_anything());
        }

        it "keeps the loan of a checked-out book" {
            LendingEngine::default()
                .check_out(&mut catalog, "1111111111111", "Alice")
                .unwrap();

            catalog
                .edit("1111111111111", UpdateBookInput {
                    title: Some("Dune (2nd ed.)".into()),
                    ..Default::default()
                })
                .unwrap();

            assert_eq!(catalog.find("1111111111111").unwrap().borrower(), Some("Alice"));
        }
    }

    describe "delete" {
        before {
            catalog.add(book("Dune", "Frank Herbert", "1111111111111")).unwrap();
        }

        it "removes an available record" {
            let removed = catalog.delete("1111111111111").unwrap();

            assert_eq!(removed.title, "Dune");
            assert!(matches!(catalog.find("1111111111111"), Err(LibraryError::NotFound { .. })));
            assert!(reopen(&dir).is_empty());
        }

        it "refuses to delete a checked-out record" {
            LendingEngine::default()
                .check_out(&mut catalog, "1111111111111", "Alice")
                .unwrap();

            assert!(matches!(
                catalog.delete("1111111111111"),
                Err(LibraryError::Conflict(ConflictError::DeleteWhileCheckedOut(_)))
            ));
            assert!(catalog.find("1111111111111").is_ok());
        }

        it "reports unknown ISBNs as not found" {
            assert!(matches!(catalog.delete("9999999999999"), Err(LibraryError::NotFound { .. })));
        }
    }

    describe "opening a malformed data file" {
        it "fails with a storage error" {
            fs::write(
                dir.path().join("library_books.csv"),
                "title,author,isbn,status,due_date,borrower\nDune,,1111111111111,available,,\n",
            )
            .unwrap();

            let result = Catalog::open(CsvStore::new(dir.path().join("library_books.csv")));

            assert!(matches!(result, Err(LibraryError::Storage(_))));
        }
    }
}
