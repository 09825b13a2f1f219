//! Analysis table persistence
//!
//! Each run is written to its own CSV file:
//! - `analysis_<stem>_<YYYYmmdd_HHMMSS>.csv`, with a `_1`, `_2`, ... suffix
//!   when that name is taken, so earlier runs are never overwritten
//! - RFC 4180 quoting, one row per clause, reasons joined with `"; "`
//! - Files are created exclusively; the output directory is created on demand
//!
//! Filtered views are exported the same way, either to an explicit path or
//! as `clause_analysis_<YYYYmmdd>.csv` inside a directory.

use chrono::{DateTime, Local};
use clausewise_core::{AnalysisTable, ClauseAnalysisResult, Error, Result, RiskLevel};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column names, in file order
pub const CSV_HEADER: [&str; 5] = [
    "Clause Type",
    "Original Text",
    "Summary",
    "Risk Level",
    "Risk Reasons",
];

const FILE_PREFIX: &str = "analysis_";
const EXPORT_PREFIX: &str = "clause_analysis_";
const EXPORT_DATE_FORMAT: &str = "%Y%m%d";
const FILE_EXTENSION: &str = "csv";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A saved analysis file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedReport {
    /// Full path to the CSV file
    pub path: PathBuf,

    /// Last modification time
    pub modified: DateTime<Local>,
}

impl SavedReport {
    /// File name without directory
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Save `table` under `output_dir`, named after the source document's stem
pub fn save_table(table: &AnalysisTable, output_dir: &Path, document_stem: &str) -> Result<PathBuf> {
    save_table_at(table, output_dir, document_stem, Local::now())
}

/// Save `table` using an explicit timestamp for the file name
pub fn save_table_at(
    table: &AnalysisTable,
    output_dir: &Path,
    document_stem: &str,
    timestamp: DateTime<Local>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let base = format!(
        "{}{}_{}",
        FILE_PREFIX,
        document_stem,
        timestamp.format(TIMESTAMP_FORMAT)
    );

    let (path, file) = create_unique(output_dir, &base)?;
    let mut writer = BufWriter::new(file);
    write_table(table, &mut writer)?;
    writer.flush()?;

    info!("Saved {} rows to {}", table.len(), path.display());
    Ok(path)
}

/// Open the first free `<base>.csv`, `<base>_1.csv`, ... in `dir`
fn create_unique(dir: &Path, base: &str) -> Result<(PathBuf, File)> {
    let mut suffix = 0u32;

    loop {
        let name = if suffix == 0 {
            format!("{}.{}", base, FILE_EXTENSION)
        } else {
            format!("{}_{}.{}", base, suffix, FILE_EXTENSION)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("{} exists, trying next suffix", path.display());
                suffix += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Export `rows` as CSV to `path`
///
/// An existing directory receives `clause_analysis_<YYYYmmdd>.csv` (suffixed
/// when taken). Any other path names the file itself and must not exist yet.
pub fn export_rows(rows: &[&ClauseAnalysisResult], path: &Path) -> Result<PathBuf> {
    export_rows_at(rows, path, Local::now())
}

/// Export using an explicit date for directory targets
pub fn export_rows_at(
    rows: &[&ClauseAnalysisResult],
    path: &Path,
    timestamp: DateTime<Local>,
) -> Result<PathBuf> {
    let (path, file) = if path.is_dir() {
        let base = format!("{}{}", EXPORT_PREFIX, timestamp.format(EXPORT_DATE_FORMAT));
        create_unique(path, &base)?
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    Error::report(format!("{} already exists", path.display()))
                }
                _ => e.into(),
            })?;
        (path.to_path_buf(), file)
    };

    let mut writer = BufWriter::new(file);
    write_rows(rows.iter().copied(), &mut writer)?;
    writer.flush()?;

    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

/// Write `table` as CSV, header first
pub fn write_table<W: Write>(table: &AnalysisTable, writer: &mut W) -> Result<()> {
    write_rows(table, writer)
}

fn write_rows<'a, W, I>(rows: I, writer: &mut W) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ClauseAnalysisResult>,
{
    write_record(writer, &CSV_HEADER)?;

    for row in rows {
        let reasons = row.joined_reasons();
        write_record(
            writer,
            &[
                row.clause_type.as_str(),
                row.original_text.as_str(),
                row.summary.as_str(),
                row.risk_level.as_str(),
                reasons.as_str(),
            ],
        )?;
    }

    Ok(())
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| quote_field(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{}", line)?;
    Ok(())
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Load a saved CSV back into a table
pub fn read_table(path: &Path) -> Result<AnalysisTable> {
    let content = std::fs::read_to_string(path)?;
    let mut records = parse_csv(&content)
        .map_err(|e| Error::report(format!("{}: {}", path.display(), e)))?
        .into_iter();

    let header = records
        .next()
        .ok_or_else(|| Error::report(format!("{}: missing header", path.display())))?;
    if header != CSV_HEADER {
        return Err(Error::report(format!(
            "{}: unexpected header {:?}",
            path.display(),
            header
        )));
    }

    records
        .enumerate()
        .map(|(i, record)| {
            row_from_record(record)
                .map_err(|e| Error::report(format!("{} row {}: {}", path.display(), i + 1, e)))
        })
        .collect()
}

fn row_from_record(record: Vec<String>) -> std::result::Result<ClauseAnalysisResult, String> {
    let [clause_type, original_text, summary, risk_level, reasons]: [String; 5] = record
        .try_into()
        .map_err(|r: Vec<String>| format!("expected {} fields, found {}", CSV_HEADER.len(), r.len()))?;

    Ok(ClauseAnalysisResult {
        clause_type,
        original_text,
        summary,
        risk_level: risk_level.parse::<RiskLevel>()?,
        risk_reasons: reasons
            .split(';')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect(),
    })
}

/// Split RFC 4180 text into records
fn parse_csv(content: &str) -> std::result::Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                other => field.push(other),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            other => field.push(other),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

/// Saved analyses in `dir`, newest first. A missing directory has none.
pub fn list_saved(dir: &Path) -> Result<Vec<SavedReport>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reports = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.extension().is_some_and(|e| e == FILE_EXTENSION) {
            continue;
        }

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        reports.push(SavedReport {
            path,
            modified: DateTime::<Local>::from(metadata.modified()?),
        });
    }

    reports.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.path.cmp(&a.path)));
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn sample_table() -> AnalysisTable {
        AnalysisTable::from(vec![
            ClauseAnalysisResult {
                clause_type: "Termination".to_string(),
                original_text: "Either party may terminate, with \"cause\",\non notice.".to_string(),
                summary: "Ends on notice.".to_string(),
                risk_level: RiskLevel::Low,
                risk_reasons: vec!["Contains 'may be'".to_string()],
            },
            ClauseAnalysisResult {
                clause_type: "Liability".to_string(),
                original_text: "Liability is uncapped.".to_string(),
                summary: String::new(),
                risk_level: RiskLevel::High,
                risk_reasons: vec![
                    "Contains 'uncapped'".to_string(),
                    "Contains 'solely responsible'".to_string(),
                ],
            },
            ClauseAnalysisResult::error("", "Empty clause text"),
        ])
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_save_and_read_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let table = sample_table();

        let path = save_table(&table, temp_dir.path(), "contract").unwrap();
        let loaded = read_table(&path).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_file_name_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = save_table_at(&sample_table(), temp_dir.path(), "msa_v2", fixed_time()).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "analysis_msa_v2_20240309_140507.csv"
        );
    }

    #[test]
    fn test_same_second_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let first_table = sample_table();
        let second_table = AnalysisTable::new();

        let first = save_table_at(&first_table, temp_dir.path(), "contract", fixed_time()).unwrap();
        let second = save_table_at(&second_table, temp_dir.path(), "contract", fixed_time()).unwrap();
        let third = save_table_at(&second_table, temp_dir.path(), "contract", fixed_time()).unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("analysis_contract_20240309_140507_1.csv"));
        assert!(third.ends_with("analysis_contract_20240309_140507_2.csv"));
        assert_eq!(read_table(&first).unwrap(), first_table);
        assert!(read_table(&second).unwrap().is_empty());
    }

    #[test]
    fn test_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("outputs").join("runs");

        let path = save_table(&AnalysisTable::new(), &nested, "contract").unwrap();
        assert!(path.starts_with(&nested));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Clause Type,Original Text,Summary,Risk Level,Risk Reasons\n");
    }

    #[test]
    fn test_csv_quoting() {
        let mut out = Vec::new();
        write_table(&sample_table(), &mut out).unwrap();
        let content = String::from_utf8(out).unwrap();

        assert!(content.contains(
            "Termination,\"Either party may terminate, with \"\"cause\"\",\non notice.\",Ends on notice.,low,Contains 'may be'\n"
        ));
        assert!(content.contains("high,Contains 'uncapped'; Contains 'solely responsible'\n"));
        assert!(content.ends_with("Error,,Empty clause text,none,\n"));
    }

    #[test]
    fn test_parse_crlf_and_missing_trailing_newline() {
        let records = parse_csv("a,b\r\n\"x\r\ny\",z").unwrap();
        assert_eq!(
            records,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["x\r\ny".to_string(), "z".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_unterminated_quote() {
        assert!(parse_csv("a,\"b\n").is_err());
    }

    #[test]
    fn test_read_rejects_foreign_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("other.csv");

        std::fs::write(&path, "id,name\n1,x\n").unwrap();
        assert!(matches!(read_table(&path), Err(Error::Report(_))));

        std::fs::write(&path, "").unwrap();
        assert!(matches!(read_table(&path), Err(Error::Report(_))));

        std::fs::write(
            &path,
            "Clause Type,Original Text,Summary,Risk Level,Risk Reasons\nTermination,text,summary,severe,\n",
        )
        .unwrap();
        assert!(matches!(read_table(&path), Err(Error::Report(_))));
    }

    #[test]
    fn test_list_saved_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let older = save_table_at(&sample_table(), dir, "old", fixed_time()).unwrap();
        let newer = save_table_at(&sample_table(), dir, "new", fixed_time()).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let now = SystemTime::now();
        File::options()
            .write(true)
            .open(&older)
            .unwrap()
            .set_modified(now - Duration::from_secs(3600))
            .unwrap();
        File::options()
            .write(true)
            .open(&newer)
            .unwrap()
            .set_modified(now)
            .unwrap();

        let saved = list_saved(dir).unwrap();
        let paths: Vec<_> = saved.iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec![newer, older]);
        assert_eq!(saved[0].file_name(), "analysis_new_20240309_140507.csv");
    }

    #[test]
    fn test_list_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_saved(&temp_dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_export_filtered_rows() {
        let temp_dir = TempDir::new().unwrap();
        let table = sample_table();
        let high: Vec<_> = table.iter().filter(|r| r.risk_level == RiskLevel::High).collect();
        let target = temp_dir.path().join("exports").join("high.csv");

        let path = export_rows(&high, &target).unwrap();
        assert_eq!(path, target);

        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.rows()[0], table.rows()[1]);
    }

    #[test]
    fn test_export_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("view.csv");
        std::fs::write(&target, "keep me").unwrap();

        let table = sample_table();
        let rows: Vec<_> = table.iter().collect();

        assert!(matches!(export_rows(&rows, &target), Err(Error::Report(_))));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep me");
    }

    #[test]
    fn test_export_into_directory_uses_dated_name() {
        let temp_dir = TempDir::new().unwrap();
        let table = sample_table();
        let rows: Vec<_> = table.iter().collect();

        let first = export_rows_at(&rows, temp_dir.path(), fixed_time()).unwrap();
        let second = export_rows_at(&[], temp_dir.path(), fixed_time()).unwrap();

        assert!(first.ends_with("clause_analysis_20240309.csv"));
        assert!(second.ends_with("clause_analysis_20240309_1.csv"));
        assert_eq!(read_table(&first).unwrap(), table);
        assert!(read_table(&second).unwrap().is_empty());
    }
}
