use crate::domain::model::{Instance, Item};
use crate::domain::ports::{InstanceSource, Storage};
use crate::utils::error::{BenchError, Result};
use crate::utils::validation::{validate_positive_number, validate_value, validate_weight};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawItem {
    // 以字串讀入，避免大整數經過 f64 時失真
    weight: String,
    value: f64,
}

/// 資料集標籤：去掉副檔名的檔名 (knapsack_instance_50.csv -> knapsack_instance_50)
pub fn dataset_label(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
        .to_string()
}

/// 解析含 `weight`、`value` 欄位的 CSV；其他欄位忽略
pub fn parse_items_csv(dataset: &str, data: &[u8]) -> Result<Vec<Item>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for required in ["weight", "value"] {
        if !headers.iter().any(|h| h == required) {
            return Err(BenchError::DatasetError {
                dataset: dataset.to_string(),
                reason: format!("missing '{}' column", required),
            });
        }
    }

    let mut items = Vec::new();
    for (index, row) in reader.deserialize::<RawItem>().enumerate() {
        let raw = row?;
        let row_number = index + 1;
        items.push(Item {
            weight: validate_weight(row_number, &raw.weight)?,
            value: validate_value(row_number, raw.value)?,
        });
    }

    tracing::debug!("Parsed {} items from {}", items.len(), dataset);
    Ok(items)
}

pub fn write_items_csv(items: &[Item]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for item in items {
        writer.serialize(item)?;
    }
    writer
        .into_inner()
        .map_err(|e| BenchError::IoError(e.into_error()))
}

/// 從 `Storage` 讀取 CSV 資料集的載入器
pub struct CsvInstanceLoader<S: Storage> {
    storage: S,
}

impl<S: Storage> CsvInstanceLoader<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> InstanceSource for CsvInstanceLoader<S> {
    fn load(&self, dataset: &str, capacity: u64) -> Result<Instance> {
        let data = self.storage.read_file(dataset)?;
        let items = parse_items_csv(dataset, &data)?;
        Ok(Instance::new(dataset_label(dataset), &items, capacity))
    }
}

/// 以固定種子產生合成資料集，重量與價值皆為均勻分布的正整數
pub struct DatasetGenerator {
    rng: SmallRng,
    max_weight: u64,
    max_value: u64,
}

impl DatasetGenerator {
    pub fn new(seed: u64, max_weight: u64, max_value: u64) -> Result<Self> {
        validate_positive_number("max_weight", max_weight, 1)?;
        validate_positive_number("max_value", max_value, 1)?;
        Ok(Self {
            rng: SmallRng::seed_from_u64(seed),
            max_weight,
            max_value,
        })
    }

    pub fn generate(&mut self, n_items: usize) -> Vec<Item> {
        (0..n_items)
            .map(|_| Item {
                weight: self.rng.random_range(1..=self.max_weight),
                value: self.rng.random_range(1..=self.max_value) as f64,
            })
            .collect()
    }

    pub fn file_name(n_items: usize) -> String {
        format!("knapsack_instance_{}.csv", n_items)
    }

    /// 產生並寫入一個資料集，回傳檔名
    pub fn write_instance<S: Storage>(&mut self, storage: &S, n_items: usize) -> Result<String> {
        let items = self.generate(n_items);
        let file_name = Self::file_name(n_items);
        storage.write_file(&file_name, &write_items_csv(&items)?)?;
        tracing::info!("📝 Generated {} ({} items)", file_name, n_items);
        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_label_strips_extension() {
        assert_eq!(dataset_label("knapsack_instance_50.csv"), "knapsack_instance_50");
        assert_eq!(dataset_label("nested/dir/small.csv"), "small");
    }

    #[test]
    fn test_parse_items_accepts_integral_floats_and_extra_columns() {
        let csv = b"id,weight,value\n1,2,3\n2,3.0,4.5\n";
        let items = parse_items_csv("inline", csv).unwrap();
        assert_eq!(
            items,
            vec![
                Item { weight: 2, value: 3.0 },
                Item { weight: 3, value: 4.5 },
            ]
        );
    }

    #[test]
    fn test_parse_items_rejects_fractional_weight() {
        let csv = b"weight,value\n2,3\n2.5,4\n";
        match parse_items_csv("inline", csv) {
            Err(BenchError::InvalidInput { reason }) => assert!(reason.contains("row 2")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_items_rejects_negative_weight() {
        let csv = b"weight,value\n-2,3\n";
        assert!(matches!(
            parse_items_csv("inline", csv),
            Err(BenchError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_parse_items_does_not_round_large_weights() {
        let csv = b"weight,value\n9007199254740993,5\n";
        let items = parse_items_csv("large", csv).unwrap();
        assert_eq!(items[0].weight, 9_007_199_254_740_993);

        // 比容量多 1 的物品不能被放入
        let greedy = crate::core::greedy::GreedySolver;
        let value = crate::domain::ports::Solver::solve(
            &greedy,
            &[items[0].weight],
            &[items[0].value],
            9_007_199_254_740_992,
        )
        .unwrap();
        assert_eq!(value, 0.0);

        let overflow = b"weight,value\n18446744073709551616,1\n";
        assert!(matches!(
            parse_items_csv("overflow", overflow),
            Err(BenchError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_generator_rejects_zero_bounds() {
        assert!(DatasetGenerator::new(1, 0, 10).is_err());
        assert!(DatasetGenerator::new(1, 10, 0).is_err());
        assert!(DatasetGenerator::new(1, 1 << 32, 10).is_ok());
    }

    #[test]
    fn test_parse_items_requires_columns() {
        let csv = b"weight,price\n2,3\n";
        assert!(matches!(
            parse_items_csv("inline", csv),
            Err(BenchError::DatasetError { .. })
        ));
    }

    #[test]
    fn test_generator_is_deterministic_and_bounded() {
        let first = DatasetGenerator::new(42, 30, 100).unwrap().generate(50);
        let second = DatasetGenerator::new(42, 30, 100).unwrap().generate(50);
        assert_eq!(first, second);
        assert!(first
            .iter()
            .all(|item| (1..=30).contains(&item.weight) && (1.0..=100.0).contains(&item.value)));
    }

    #[test]
    fn test_written_csv_parses_back() {
        let items = DatasetGenerator::new(7, 10, 10).unwrap().generate(5);
        let data = write_items_csv(&items).unwrap();
        assert_eq!(parse_items_csv("generated", &data).unwrap(), items);
    }
}
