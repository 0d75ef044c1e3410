use crate::compose::InMemoryLegs;
use crate::error::Result;
use crate::types::RawLegRow;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Records the CSV reader itself could not decode.
    pub unreadable_rows: usize,
}

/// Reads leg rows from any CSV source. Columns are matched by header name;
/// missing columns read as empty and undecodable records are skipped.
pub fn read_legs<R: Read>(reader: R) -> (Vec<RawLegRow>, LoadReport) {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut report = LoadReport::default();
    let mut rows = Vec::new();

    for result in rdr.deserialize::<RawLegRow>() {
        report.total_rows += 1;
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(row = report.total_rows, error = %e, "unreadable CSV record");
                report.unreadable_rows += 1;
            }
        }
    }
    report.loaded_rows = rows.len();
    (rows, report)
}

pub fn load_legs(path: &Path) -> Result<(InMemoryLegs, LoadReport)> {
    let file = std::fs::File::open(path)?;
    let (rows, report) = read_legs(file);
    info!(
        path = %path.display(),
        rows = report.loaded_rows,
        unreadable = report.unreadable_rows,
        "loaded leg rows"
    );
    Ok((InMemoryLegs::new(rows), report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_by_header_with_missing_columns() {
        let csv = "\
date,direction,route,passengers,delays
2024-01-05,ARRIVAL,TZL-MLH,120,93:20:P
2024-01-06,DEPARTURE, TZL-BSL ,,
";
        let (rows, report) = read_legs(csv.as_bytes());
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(rows[0].passengers.as_deref(), Some("120"));
        assert_eq!(rows[0].delays.as_deref(), Some("93:20:P"));
        assert_eq!(rows[1].route.as_deref(), Some("TZL-BSL"));
        assert!(rows[1].status.is_none());
    }
}
