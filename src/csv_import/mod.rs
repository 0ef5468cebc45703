//! Ingestion of the three external CSV exports.
//!
//! Parsing is pure: each source module turns decoded text into an
//! [`ImportBatch`]. [`commit_batch`] then writes the batch inside one
//! transaction, all or nothing.

pub mod attendance;
pub mod fields;
pub mod freee;
pub mod kincone;

use std::collections::HashMap;

use encoding_rs::{EUC_JP, Encoding, ISO_2022_JP, SHIFT_JIS, UTF_8, WINDOWS_1252};
use serde::Serialize;
use sqlx::{MySqlConnection, MySqlPool};
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use fields::Aliases;

/// Tried in order when the upload carries no byte-order mark.
/// Shift_JIS here is the WHATWG flavour, a CP932 superset.
const CANDIDATE_ENCODINGS: &[&Encoding] = &[UTF_8, SHIFT_JIS, EUC_JP, ISO_2022_JP, WINDOWS_1252];

/// What to do when no candidate encoding decodes the upload cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFallback {
    Reject,
    LossyUtf8,
}

/// Reject uploads that are obviously not a CSV export before decoding.
pub fn validate_upload(file_name: Option<&str>, bytes: &[u8]) -> AppResult<()> {
    let Some(name) = file_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Err(AppError::BadRequest("A CSV file is required".into()));
    };
    if !name.to_lowercase().ends_with(".csv") {
        return Err(AppError::BadRequest(format!("{name} is not a .csv file")));
    }
    if bytes.is_empty() {
        return Err(AppError::BadRequest("CSV file is empty".into()));
    }
    Ok(())
}

pub fn decode_upload(bytes: &[u8], fallback: DecodeFallback) -> AppResult<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!(encoding = encoding.name(), "Stripped byte-order mark");
        if let Some(text) =
            encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        {
            return Ok(text.into_owned());
        }
        warn!(encoding = encoding.name(), "Content does not match its byte-order mark");
        return lossy_or_reject(&bytes[bom_len..], fallback);
    }

    for encoding in CANDIDATE_ENCODINGS {
        match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => {
                info!(encoding = encoding.name(), "Decoded upload");
                return Ok(text.into_owned());
            }
            None => debug!(encoding = encoding.name(), "Upload does not decode"),
        }
    }

    lossy_or_reject(bytes, fallback)
}

fn lossy_or_reject(bytes: &[u8], fallback: DecodeFallback) -> AppResult<String> {
    match fallback {
        DecodeFallback::LossyUtf8 => {
            warn!("Decoding upload as UTF-8 with replacement characters");
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
        DecodeFallback::Reject => {
            error!("Upload matches none of the supported encodings");
            Err(AppError::BadRequest("Unsupported CSV character encoding".into()))
        }
    }
}

/// Key under which [`CsvRow::to_json`] keeps values beyond the header.
pub const EXTRA_FIELDS_KEY: &str = "_extra";

/// One data row addressed by header name. Rows may be shorter or longer
/// than the header; missing fields read as `""`.
pub struct CsvRow<'a> {
    index: &'a HashMap<String, usize>,
    header_len: usize,
    record: &'a csv::StringRecord,
}

impl<'a> CsvRow<'a> {
    /// First non-empty value among `aliases`, or `""`.
    pub fn get(&self, aliases: Aliases) -> &'a str {
        aliases
            .iter()
            .filter_map(|h| self.index.get(*h))
            .filter_map(|&i| self.record.get(i))
            .find(|v| !v.trim().is_empty())
            .unwrap_or("")
    }

    pub fn get_trimmed(&self, aliases: Aliases) -> String {
        self.get(aliases).trim().to_string()
    }

    /// The raw row as a header → value JSON object. Columns missing from a
    /// short row map to `""`; non-empty values past the last header are
    /// kept under [`EXTRA_FIELDS_KEY`].
    pub fn to_json(&self) -> serde_json::Value {
        let mut columns: Vec<(&String, &usize)> = self.index.iter().collect();
        columns.sort_by_key(|(_, i)| **i);
        let mut map: serde_json::Map<String, serde_json::Value> = columns
            .into_iter()
            .map(|(header, &i)| {
                let value = self.record.get(i).unwrap_or("").to_string();
                (header.clone(), serde_json::Value::String(value))
            })
            .collect();

        let extras: Vec<serde_json::Value> = self
            .record
            .iter()
            .skip(self.header_len)
            .filter(|v| !v.trim().is_empty())
            .map(|v| serde_json::Value::String(v.to_string()))
            .collect();
        if !extras.is_empty() {
            map.insert(EXTRA_FIELDS_KEY.to_string(), serde_json::Value::Array(extras));
        }
        serde_json::Value::Object(map)
    }
}

/// Parsed rows (with their 1-based file line, header = 1) and row errors.
#[derive(Debug)]
pub struct ImportBatch<T> {
    pub records: Vec<(usize, T)>,
    pub errors: Vec<String>,
}

impl<T> ImportBatch<T> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run `convert` over every data row. Rows shorter or longer than the
/// header are accepted; reader errors and conversion failures are
/// recorded as `row N: ...` and parsing goes on.
pub fn parse_rows<T, F>(text: &str, mut convert: F) -> AppResult<ImportBatch<T>>
where
    F: FnMut(&CsvRow<'_>) -> Result<T, String>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::BadRequest(format!("Unreadable CSV header: {e}")))?
        .clone();

    let mut index = HashMap::with_capacity(headers.len());
    for (i, h) in headers.iter().enumerate() {
        index.entry(h.trim().to_string()).or_insert(i);
    }

    let mut batch = ImportBatch {
        records: Vec::new(),
        errors: Vec::new(),
    };

    for (i, result) in reader.records().enumerate() {
        let row_num = i + 2;
        let outcome = result.map_err(|e| e.to_string()).and_then(|record| {
            let row = CsvRow {
                index: &index,
                header_len: headers.len(),
                record: &record,
            };
            convert(&row)
        });
        match outcome {
            Ok(rec) => batch.records.push((row_num, rec)),
            Err(msg) => {
                error!(row = row_num, error = %msg, "Row rejected");
                batch.errors.push(format!("row {row_num}: {msg}"));
            }
        }
    }

    Ok(batch)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    #[schema(example = 12)]
    pub imported_count: usize,
    pub errors: Vec<String>,
    pub success: bool,
}

impl ImportResponse {
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            imported_count: 0,
            errors,
            success: false,
        }
    }
}

/// A record the importer knows how to insert on an open transaction.
pub trait Insertable {
    async fn insert(&self, conn: &mut MySqlConnection) -> Result<u64, sqlx::Error>;
}

/// Insert the whole batch in one transaction. Any row error, whether from
/// parsing or from the insert itself, rolls everything back.
pub async fn commit_batch<T: Insertable>(
    pool: &MySqlPool,
    batch: ImportBatch<T>,
) -> AppResult<ImportResponse> {
    let ImportBatch {
        records,
        mut errors,
    } = batch;

    if !errors.is_empty() {
        error!(errors = errors.len(), "CSV import failed, nothing written");
        return Ok(ImportResponse::failed(errors));
    }

    let mut tx = pool.begin().await?;
    for (row_num, record) in &records {
        if let Err(e) = record.insert(&mut *tx).await {
            error!(row = row_num, error = %e, "Insert failed");
            errors.push(format!("row {row_num}: {e}"));
        }
    }

    if !errors.is_empty() {
        tx.rollback().await?;
        error!(errors = errors.len(), "CSV import rolled back");
        return Ok(ImportResponse::failed(errors));
    }

    tx.commit().await?;
    info!(imported = records.len(), "CSV import committed");
    Ok(ImportResponse {
        imported_count: records.len(),
        errors: Vec::new(),
        success: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBER: Aliases = &["従業員番号", "Employee Number"];

    #[test]
    fn upload_must_be_a_non_empty_csv() {
        assert!(validate_upload(Some("march.csv"), b"a,b").is_ok());
        assert!(validate_upload(Some("MARCH.CSV"), b"a,b").is_ok());
        assert!(matches!(
            validate_upload(Some("march.xlsx"), b"a,b"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_upload(Some("march.csv"), b""),
            Err(AppError::BadRequest(_))
        ));
        assert!(validate_upload(None, b"a,b").is_err());
    }

    #[test]
    fn decodes_utf8_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("従業員番号\n7\n".as_bytes());
        let text = decode_upload(&bytes, DecodeFallback::Reject).unwrap();
        assert!(text.starts_with("従業員番号"));
    }

    #[test]
    fn decodes_shift_jis_exports() {
        let (encoded, _, _) = SHIFT_JIS.encode("従業員番号,従業員名\n7,山田\n");
        let text = decode_upload(&encoded, DecodeFallback::Reject).unwrap();
        assert!(text.contains("山田"));
    }

    #[test]
    fn decodes_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "id\n7\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_upload(&bytes, DecodeFallback::Reject).unwrap(), "id\n7\n");
    }

    #[test]
    fn broken_utf16_is_rejected_or_lossy() {
        // BOM followed by a lone high surrogate
        let bytes = [0xFF, 0xFE, 0x00, 0xD8];
        assert!(decode_upload(&bytes, DecodeFallback::Reject).is_err());
        assert!(decode_upload(&bytes, DecodeFallback::LossyUtf8).is_ok());
    }

    #[test]
    fn alias_lookup_prefers_first_non_empty_header() {
        let text = "従業員番号,Employee Number,extra\n,42,x\n7,42,y\n";
        let batch = parse_rows(text, |row| Ok(row.get_trimmed(NUMBER))).unwrap();
        let values: Vec<_> = batch.records.into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec!["42".to_string(), "7".to_string()]);
    }

    #[test]
    fn uneven_rows_import_with_defaults() {
        let text = "Employee Number,Name,Days\n1,a,20,\n2,b\n3,c,18\n4,d,19,unexpected\n";
        let batch = parse_rows(text, |row| {
            Ok((row.get_trimmed(NUMBER), row.get(&["Days"]).to_string(), row.to_json()))
        })
        .unwrap();
        assert!(batch.is_clean(), "{:?}", batch.errors);

        let lines: Vec<usize> = batch.records.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![2, 3, 4, 5]);

        let (_, (number, days, raw)) = &batch.records[1];
        assert_eq!(number, "2");
        assert_eq!(days, "");
        assert_eq!(raw["Days"], "");

        let (_, (_, _, trailing_comma)) = &batch.records[0];
        assert!(trailing_comma.get(EXTRA_FIELDS_KEY).is_none());

        let (_, (_, days, extra)) = &batch.records[3];
        assert_eq!(days, "19");
        assert_eq!(extra[EXTRA_FIELDS_KEY], serde_json::json!(["unexpected"]));
    }

    struct Never;

    impl Insertable for Never {
        async fn insert(&self, _conn: &mut MySqlConnection) -> Result<u64, sqlx::Error> {
            unreachable!("a batch with row errors is never written")
        }
    }

    #[actix_web::test]
    async fn any_row_error_rejects_the_whole_batch() {
        // never connects: the batch is rejected before a transaction opens
        let pool = MySqlPool::connect_lazy("mysql://payroll@localhost/payroll_test").unwrap();
        let batch = ImportBatch {
            records: vec![(2, Never), (3, Never), (4, Never), (6, Never)],
            errors: vec!["row 5: unreadable amount".to_string()],
        };

        let response = commit_batch(&pool, batch).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.imported_count, 0);
        assert_eq!(response.errors, vec!["row 5: unreadable amount".to_string()]);
    }

    #[test]
    fn conversion_failures_are_collected_not_fatal() {
        let text = "Employee Number\n1\nbad\n3\n";
        let batch = parse_rows(text, |row| {
            let v = row.get(NUMBER);
            v.parse::<u32>().map_err(|_| format!("not a number: {v}"))
        })
        .unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.errors, vec!["row 3: not a number: bad".to_string()]);
    }

    #[test]
    fn raw_row_keeps_header_order() {
        let text = "b,a\n2,1\n";
        let batch = parse_rows(text, |row| Ok(row.to_json())).unwrap();
        let json = &batch.records[0].1;
        assert_eq!(json["a"], "1");
        assert_eq!(json["b"], "2");
    }
}
