use crate::domain::model::{BenchmarkRecord, BenchmarkReport, ComparisonRecord, DatasetFailure};
use crate::domain::ports::{ReportSink, Storage};
use crate::utils::error::{BenchError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SUPPORTED_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Serialize)]
struct ReportEnvelope<'a, T: Serialize> {
    name: &'a str,
    generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    algorithm: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    capacity: Option<u64>,
    records: &'a [T],
    failures: &'a [DatasetFailure],
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| BenchError::IoError(e.into_error()))
}

/// 把精確解與貪婪解的紀錄依 (資料集, 容量) 配對，順序依精確解紀錄
pub fn compare_records(
    exact: &[BenchmarkRecord],
    greedy: &[BenchmarkRecord],
) -> Vec<ComparisonRecord> {
    exact
        .iter()
        .filter_map(|e| {
            let matched = greedy
                .iter()
                .find(|g| g.dataset == e.dataset && g.capacity == e.capacity);
            if matched.is_none() {
                tracing::warn!(
                    "No greedy record for {} (W={}), skipped in comparison",
                    e.dataset,
                    e.capacity
                );
            }
            matched.map(|g| ComparisonRecord::from_records(e, g))
        })
        .collect()
}

/// 將報表寫入 `Storage`，每種格式一個檔案
pub struct FileReportSink<S: Storage> {
    storage: S,
    formats: Vec<String>,
}

impl<S: Storage> FileReportSink<S> {
    pub fn new(storage: S, formats: Vec<String>) -> Result<Self> {
        crate::utils::validation::validate_one_of("output.formats", &formats, &SUPPORTED_FORMATS)?;
        Ok(Self { storage, formats })
    }

    fn write_all<T: Serialize>(
        &self,
        name: &str,
        algorithm: Option<&str>,
        capacity: Option<u64>,
        records: &[T],
        failures: &[DatasetFailure],
    ) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in &self.formats {
            let file_name = format!("{}.{}", name, format);
            let data = match format.as_str() {
                "csv" => to_csv(records)?,
                "json" => serde_json::to_vec_pretty(&ReportEnvelope {
                    name,
                    generated_at: Utc::now(),
                    algorithm,
                    capacity,
                    records,
                    failures,
                })?,
                other => {
                    return Err(BenchError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: format!("Valid formats: {}", SUPPORTED_FORMATS.join(", ")),
                    })
                }
            };

            tracing::debug!("Writing {} ({} bytes)", file_name, data.len());
            self.storage.write_file(&file_name, &data)?;
            written.push(file_name);
        }

        Ok(written)
    }
}

impl<S: Storage> ReportSink for FileReportSink<S> {
    fn write_report(&self, name: &str, report: &BenchmarkReport) -> Result<Vec<String>> {
        self.write_all(
            name,
            Some(report.algorithm()),
            Some(report.capacity()),
            report.records(),
            report.failures(),
        )
    }

    fn write_comparison(&self, name: &str, rows: &[ComparisonRecord]) -> Result<Vec<String>> {
        self.write_all(name, None, None, rows, &[])
    }
}
