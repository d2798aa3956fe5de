use crate::utils::error::{BenchError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid_value(field_name: &str, value: impl ToString, reason: impl Into<String>) -> BenchError {
    BenchError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    match path {
        "" => Err(invalid_value(field_name, path, "Path cannot be empty")),
        p if p.contains('\0') => Err(invalid_value(field_name, path, "Path contains null bytes")),
        _ => Ok(()),
    }
}

pub fn validate_positive_number<T>(field_name: &str, value: T, min_value: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value >= min_value {
        Ok(())
    } else {
        Err(invalid_value(
            field_name,
            &value,
            format!("Value must be at least {}", min_value),
        ))
    }
}

/// 每個檔名都必須帶有允許的副檔名 (資料集只接受 csv)
pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    for file in files {
        let extension = Path::new(file).extension().and_then(|ext| ext.to_str());
        match extension {
            Some(ext) if allowed_extensions.contains(&ext) => {}
            Some(ext) => {
                return Err(invalid_value(
                    field_name,
                    file,
                    format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        ext,
                        allowed_extensions.join(", ")
                    ),
                ))
            }
            None => return Err(invalid_value(field_name, file, "File has no extension")),
        }
    }
    Ok(())
}

/// 檢查值是否屬於允許清單 (例如輸出格式、演算法名稱)
pub fn validate_one_of(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    for value in values {
        if !allowed.contains(&value.as_str()) {
            return Err(invalid_value(
                field_name,
                value,
                format!("Unsupported value. Valid values: {}", allowed.join(", ")),
            ));
        }
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_value(field_name, value, "Value cannot be blank"));
    }
    Ok(())
}

/// 背包容量必須為非負整數；設定檔與命令列皆以有號整數讀入後在此轉換
pub fn validate_capacity(field_name: &str, raw: i64) -> Result<u64> {
    u64::try_from(raw)
        .map_err(|_| invalid_value(field_name, raw, "Capacity must be a non-negative integer"))
}

/// 以 f64 表示仍保證精確的最大整數 (2^53)
const MAX_EXACT_FLOAT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// 物品重量必須為非負整數 (DP 以重量作為索引)。
///
/// 先以整數解析，不經過浮點數；`12.0` 這類整數值浮點數只在 2^53 以內接受，
/// 超過時無法確定原始整數，一律拒絕。
pub fn validate_weight(row: usize, raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if let Ok(weight) = raw.parse::<u64>() {
        return Ok(weight);
    }

    let rejected = || {
        BenchError::invalid_input(format!(
            "row {}: weight {} is not a non-negative integer",
            row, raw
        ))
    };
    let float: f64 = raw.parse().map_err(|_| rejected())?;
    if !float.is_finite() || float < 0.0 || float.fract() != 0.0 || float > MAX_EXACT_FLOAT_INTEGER
    {
        return Err(rejected());
    }
    Ok(float as u64)
}

pub fn validate_value(row: usize, raw: f64) -> Result<f64> {
    if !raw.is_finite() || raw < 0.0 {
        return Err(BenchError::invalid_input(format!(
            "row {}: value {} is not a non-negative number",
            row, raw
        )));
    }
    Ok(raw)
}
