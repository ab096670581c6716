//! CSV export tests
//!
//! Exports are parsed back with `csv::Reader` to check quoting.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::export::{array_to_csv, escape_csv_value, export_filename, purchases_csv, ExportError};
use shared::{Purchase, PurchaseLine};
use uuid::Uuid;

fn parse(csv_text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(csv_text.as_bytes());
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_escape_csv_value() {
        assert_eq!(escape_csv_value("plain"), "plain");
        assert_eq!(escape_csv_value("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_value("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_value("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_array_to_csv_quotes_only_when_needed() {
        let csv_text = array_to_csv(
            &["Name", "Notes"],
            &[vec!["Dabinett", "sharp, bittersweet"], vec!["Foxwhelp", "plain"]],
        )
        .unwrap();
        assert_eq!(
            csv_text,
            "Name,Notes\nDabinett,\"sharp, bittersweet\"\nFoxwhelp,plain\n"
        );
    }

    #[test]
    fn test_quoted_batch_name_round_trips() {
        let cell = "Batch \"A\", 1.0L";
        assert_eq!(escape_csv_value(cell), "\"Batch \"\"A\"\", 1.0L\"");

        let csv_text = array_to_csv(&["Batch"], &[vec![cell]]).unwrap();
        assert_eq!(parse(&csv_text), vec![vec!["Batch".to_string()], vec![cell.to_string()]]);
    }

    #[test]
    fn test_row_length_mismatch() {
        let result = array_to_csv(&["A", "B"], &[vec!["only one"]]);
        assert!(matches!(
            result,
            Err(ExportError::RowLength { row: 0, found: 1, expected: 2 })
        ));
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();
        assert_eq!(export_filename("reconciliation", date), "reconciliation-2024-10-18.csv");
    }

    #[test]
    fn test_purchases_csv_one_row_per_line() {
        let purchase = Purchase {
            id: Uuid::new_v4(),
            vendor_id: Uuid::new_v4(),
            vendor_name: Some("Orchard \"North\", LLC".to_string()),
            purchase_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            notes: None,
            lines: vec![
                PurchaseLine {
                    id: Uuid::new_v4(),
                    item_name: "Kingston Black".to_string(),
                    quantity: Decimal::from(20),
                    unit: "bushel".to_string(),
                    unit_price: Decimal::new(1850, 2),
                    harvest_date: None,
                },
                PurchaseLine {
                    id: Uuid::new_v4(),
                    item_name: "Yarlington Mill".to_string(),
                    quantity: Decimal::new(25, 1),
                    unit: "bushel".to_string(),
                    unit_price: Decimal::new(1999, 2),
                    harvest_date: None,
                },
            ],
            created_at: Utc::now(),
        };

        let rows = parse(&purchases_csv(&[purchase]).unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], "Orchard \"North\", LLC");
        assert_eq!(rows[1][6], "370.00");
        assert_eq!(rows[2][3], "2.5");
        assert_eq!(rows[2][6], "49.98");
    }
}

proptest! {
    /// Whatever the cell text, the reader gets it back unchanged
    #[test]
    fn prop_cells_survive_csv(cells in prop::collection::vec("[a-zA-Z0-9 ,\"\n]{1,12}", 1..6)) {
        let headers: Vec<String> = (0..cells.len()).map(|i| format!("h{}", i)).collect();
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        let csv_text = array_to_csv(&header_refs, &[cells.clone()]).unwrap();

        let rows = parse(&csv_text);
        prop_assert_eq!(rows.len(), 2);
        prop_assert_eq!(&rows[1], &cells);
    }
}
