//! CSV exports for spreadsheets.
//!
//! Files start with a UTF-8 byte-order mark so spreadsheet programs
//! pick the right encoding. Text fields are quoted with embedded
//! quotes doubled; dates are written day/month/year.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use finquina_types::{Crop, CropId, CropLog, Expense};

use crate::farm::{Farm, read_or_default};

const BOM: &str = "\u{FEFF}";

/// Header row of the crop notebook.
pub const CROPS_HEADER: &str =
    "ID,Nombre,Variedad,Estado,Bancal,Fila,Fecha Plantacion,Ultima Nota,Ultimo Informe IA";

/// Header row of the expense ledger.
pub const EXPENSES_HEADER: &str = "ID,Articulo,Cantidad,Categoria,Tienda,Fecha";

/// A quoted CSV field.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// A quoted field with commas and line breaks flattened to spaces.
fn flattened(value: Option<&str>) -> String {
    let flat: String = value
        .unwrap_or_default()
        .chars()
        .map(|c| if matches!(c, ',' | '\n' | '\r') { ' ' } else { c })
        .collect();
    quoted(&flat)
}

fn short_date(date: DateTime<Utc>) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// The crop notebook: one row per crop with its latest journal entry.
pub fn crops_csv(crops: &[Crop], latest: &HashMap<CropId, CropLog>) -> String {
    let mut csv = format!("{BOM}{CROPS_HEADER}\n");
    for crop in crops {
        let log = latest.get(&crop.id);
        let row = [
            crop.id.to_string(),
            quoted(&crop.name),
            quoted(crop.variety.as_deref().unwrap_or_default()),
            quoted(crop.status.as_str()),
            quoted(crop.bed.as_deref().unwrap_or_default()),
            quoted(crop.row.as_deref().unwrap_or_default()),
            short_date(crop.planted_at),
            flattened(log.and_then(|l| l.note.as_deref())),
            flattened(log.and_then(|l| l.ai_analysis.as_deref())),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// The expense ledger, in the order given.
pub fn expenses_csv(expenses: &[Expense]) -> String {
    let mut csv = format!("{BOM}{EXPENSES_HEADER}\n");
    for expense in expenses {
        let row = [
            expense.id.to_string(),
            quoted(&expense.item),
            expense.amount.to_string(),
            quoted(&expense.category),
            quoted(expense.shop.as_deref().unwrap_or_default()),
            short_date(expense.date),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// Download name for an export made on `date`.
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_la_finquina_{}.csv", date.format("%Y-%m-%d"))
}

impl Farm {
    /// Every crop with its latest note and analysis.
    pub async fn export_crops(&self) -> String {
        let crops = self.db.crops();
        let logs = self.db.crop_logs();
        let (all, latest) = tokio::join!(crops.list(), logs.latest_per_crop());
        crops_csv(
            &read_or_default("export_crops", all),
            &read_or_default("export_crop_logs", latest),
        )
    }

    /// Every expense, newest first.
    pub async fn export_expenses(&self) -> String {
        expenses_csv(&self.list_expenses().await)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use finquina_types::{CropLogId, CropStatus, ExpenseId};
    use rust_decimal::Decimal;

    use crate::testing::offline_farm;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).single().unwrap_or_default()
    }

    #[test]
    fn crop_rows_flatten_the_latest_log() {
        let crop = Crop {
            id: CropId(7),
            name: "Tomate \"Corazón\"".to_owned(),
            variety: None,
            status: CropStatus::Planted,
            planted_at: at(2026, 4, 3),
            harvest_date: None,
            location: None,
            bed: Some("B1".to_owned()),
            row: None,
            image_url: None,
            latitude: None,
            longitude: None,
            notes: None,
        };
        let mut latest = HashMap::new();
        latest.insert(
            CropId(7),
            CropLog {
                id: CropLogId(1),
                crop_id: CropId(7),
                date: at(2026, 5, 1),
                created_at: at(2026, 5, 1),
                image_url: None,
                note: Some("Flores, primeras\nbien".to_owned()),
                ai_analysis: None,
            },
        );

        let csv = crops_csv(&[crop], &latest);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(format!("{BOM}{CROPS_HEADER}").as_str()));
        assert_eq!(
            lines.next(),
            Some(
                "7,\"Tomate \"\"Corazón\"\"\",\"\",\"Planted\",\"B1\",\"\",3/4/2026,\"Flores  primeras bien\",\"\""
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn expense_rows_keep_amounts_unquoted() {
        let expense = Expense {
            id: ExpenseId(3),
            item: "Abono".to_owned(),
            amount: Decimal::new(1250, 2),
            category: "Abonos".to_owned(),
            date: at(2026, 10, 19),
            shop: None,
        };
        let csv = expenses_csv(&[expense]);
        assert!(csv.starts_with('\u{FEFF}'));
        assert!(csv.ends_with("3,\"Abono\",12.50,\"Abonos\",\"\",19/10/2026\n"));
    }

    #[test]
    fn filename_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default();
        assert_eq!(export_filename("gastos", date), "gastos_la_finquina_2026-10-19.csv");
    }

    #[tokio::test]
    async fn offline_exports_are_header_only() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        assert_eq!(farm.export_crops().await, format!("{BOM}{CROPS_HEADER}\n"));
        assert_eq!(farm.export_expenses().await, format!("{BOM}{EXPENSES_HEADER}\n"));
    }
}
