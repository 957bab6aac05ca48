//! Download-style export of a filtered activity list.

use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::codec;
use crate::error::ExportError;
use crate::types::ActivityRecord;

/// Outcome of [`write_export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub count: usize,
}

/// `activities_export_<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("activities_export_{}.json", date.format("%Y-%m-%d"))
}

/// Write the pretty-printed records to `out`.
pub fn write_to(out: &mut dyn Write, records: &[ActivityRecord]) -> Result<(), ExportError> {
    let json = codec::encode_pretty(records)?;
    out.write_all(json.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Write `records` into `dir` under the dated export name, replacing any
/// export already written that day.
pub fn write_export(
    dir: &Path,
    records: &[ActivityRecord],
    date: NaiveDate,
) -> Result<ExportOutcome, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    let mut file = std::fs::File::create(&path)?;
    write_to(&mut file, records)?;
    tracing::debug!("activity export: {} records to {}", records.len(), path.display());
    Ok(ExportOutcome {
        path,
        count: records.len(),
    })
}

/// Read an export back, e.g. to import it into another ledger.
pub fn read_from(input: &mut dyn Read) -> Result<Vec<ActivityRecord>, ExportError> {
    let mut data = String::new();
    input.read_to_string(&mut data)?;
    Ok(codec::decode(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_file_after_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(export_file_name(date), "activities_export_2024-02-09.json");
    }

    #[test]
    fn empty_export_is_an_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let outcome = write_export(dir.path(), &[], date).unwrap();
        assert_eq!(outcome.count, 0);
        assert_eq!(std::fs::read_to_string(&outcome.path).unwrap(), "[]");
    }
}
