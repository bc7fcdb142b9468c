use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::core::analysis::GroupStats;
use crate::core::roster::{Record, Roster};
use crate::error::IoError;

/// Parse a CSV roster from any reader.
///
/// The first row is the header. Every field is kept as text; rows whose
/// field count differs from the header are rejected by the csv reader.
pub fn read_roster<R: Read>(input: R) -> Result<Roster, IoError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(IoError::MissingHeaders);
    }

    let mut roster = Roster::new(headers.iter().map(str::to_owned).collect());
    for row in reader.records() {
        let row = row?;
        roster.push_row(row.iter().map(str::to_owned).collect());
    }

    Ok(roster)
}

pub fn read_roster_str(input: &str) -> Result<Roster, IoError> {
    read_roster(input.as_bytes())
}

/// Load a CSV roster from disk
pub fn read_roster_file(path: &Path) -> Result<Roster, IoError> {
    info!("Reading roster from {:?}", path);
    let file = File::open(path)?;
    let roster = read_roster(BufReader::new(file))?;
    info!(
        "Loaded {} records with columns {:?}",
        roster.len(),
        roster.headers()
    );
    Ok(roster)
}

/// Render a header plus records as CSV text
pub fn write_records_string<'a>(
    headers: &[String],
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<String, IoError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(headers)?;
    for record in records {
        writer.write_record(&record.fields)?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Render a stats summary as CSV: `group,<codes...>` then one row per group
pub fn write_stats_string(stats: &GroupStats) -> Result<String, IoError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    let mut header = vec!["group".to_string()];
    header.extend(stats.codes.iter().map(|c| c.as_str().to_string()));
    writer.write_record(&header)?;

    for row in &stats.rows {
        let mut fields = vec![row.group.clone()];
        fields.extend(row.counts.iter().map(usize::to_string));
        writer.write_record(&fields)?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::StatsRow;
    use crate::core::roster::CategoryCode;

    #[test]
    fn test_read_roster_keeps_text_fields() {
        let roster = read_roster_str("Roll,Name\n2101CS01,\"Rao, Asha\"\n0042EE07,Ravi\n").unwrap();
        assert_eq!(roster.headers(), &["Roll".to_string(), "Name".to_string()]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.records()[0].field(1), Some("Rao, Asha"));
        assert_eq!(roster.records()[1].field(0), Some("0042EE07"));
        assert_eq!(roster.records()[1].position, 1);
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        assert!(matches!(read_roster_str(""), Err(IoError::MissingHeaders)));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        assert!(matches!(
            read_roster_str("Roll,Name\n2101CS01\n"),
            Err(IoError::Csv(_))
        ));
    }

    #[test]
    fn test_write_records_quotes_when_needed() {
        let roster = read_roster_str("Roll,Name\n2101CS01,\"Rao, Asha\"\n").unwrap();
        let out = write_records_string(roster.headers(), roster.records()).unwrap();
        assert_eq!(out, "Roll,Name\n2101CS01,\"Rao, Asha\"\n");
    }

    #[test]
    fn test_header_only_table() {
        let out = write_records_string(&["Roll".to_string()], std::iter::empty::<&Record>()).unwrap();
        assert_eq!(out, "Roll\n");
    }

    #[test]
    fn test_write_stats() {
        let stats = GroupStats {
            codes: vec![CategoryCode::new("CS"), CategoryCode::new("EE")],
            rows: vec![
                StatsRow {
                    group: "g1".to_string(),
                    counts: vec![2, 1],
                },
                StatsRow {
                    group: "g2".to_string(),
                    counts: vec![0, 3],
                },
            ],
        };
        let out = write_stats_string(&stats).unwrap();
        assert_eq!(out, "group,CS,EE\ng1,2,1\ng2,0,3\n");
    }
}
