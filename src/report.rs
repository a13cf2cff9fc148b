//! CSV serialization of a batch's records.

use crate::batch::DateRange;
use crate::extract::InventoryRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Writes one CSV file for a batch window: a header row with the eight
/// column names, then one row per record in input order. An existing
/// file of the same name is replaced.
pub fn write(records: &[InventoryRecord], range: &DateRange, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(file_name(range));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(path)
}

// "obsolecencia" is misspelled in the filename the downstream consumers
// expect; keep it.
fn file_name(range: &DateRange) -> String {
    format!(
        "Equipos cambiados por obsolecencia {} hasta {}.csv",
        range.start.format("%d-%m-%Y"),
        range.end.format("%d-%m-%Y"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn range() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(),
        }
    }

    fn record(usuario: &str, fecha: &str) -> InventoryRecord {
        InventoryRecord {
            usuario: usuario.to_string(),
            cpu_nuevo: "pc1".to_string(),
            fecha: fecha.to_string(),
            ..InventoryRecord::default()
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name(&range()),
            "Equipos cambiados por obsolecencia 01-01-2020 hasta 01-07-2020.csv",
        );
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record("ana", "2020-01-02 03:04:05"),
            record("bea", "2020-02-03 04:05:06"),
        ];
        let path = write(&records, &range(), dir.path()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read: Vec<InventoryRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read, records);
    }

    #[test]
    fn test_header_matches_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&[record("ana", "")], &range(), dir.path()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().next().unwrap(),
            "usuario,cpu_nuevo,monitor_nuevo,teclado_nuevo,cpu_viejo,monitor_viejo,teclado_viejo,fecha",
        );
    }

    #[test]
    fn test_values_with_delimiters_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let mut with_comma = record("ana", "");
        with_comma.usuario = "Ana,Bea".to_string();
        let path = write(&[with_comma.clone()], &range(), dir.path()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Ana,Bea\""));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read: Vec<InventoryRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read, vec![with_comma]);
    }

    #[test]
    fn test_existing_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        write(&[record("ana", ""), record("bea", "")], &range(), dir.path()).unwrap();
        let path = write(&[record("carla", "")], &range(), dir.path()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read: Vec<InventoryRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].usuario, "carla");
    }
}
