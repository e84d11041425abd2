//! アップロードレスポンスパーサー
//!
//! 解析サービスのJSONレスポンスを「成功」「サーバ側エラー」に振り分ける。
//! HTTPステータスは見ない（エラー時もJSONボディで判定する）。

use crate::error::{Error, Result};
use crate::types::AnalysisResult;
use serde_json::Value;

/// レスポンスの判定結果
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// 解析成功
    Analysis(AnalysisResult),
    /// サーバが `error` フィールドで失敗を返した
    Rejected(String),
}

/// レスポンスボディをパース
///
/// 判定順:
/// 1. JSONでなければエラー
/// 2. `error` が真値なら `Rejected`（他のフィールドは無視）
/// 3. 解析結果としてパースし、値を検証
///
/// # Arguments
/// * `body` - レスポンスボディ
///
/// # Returns
/// * `Ok(UploadOutcome)` - 成功またはサーバ側エラー
/// * `Err` - JSONでない、フィールド不足、値が不正
///
/// # Examples
/// ```
/// use object_measure_common::{parse_upload_response, UploadOutcome};
///
/// let outcome = parse_upload_response(r#"{"error": "no objects detected"}"#).unwrap();
/// assert_eq!(outcome, UploadOutcome::Rejected("no objects detected".into()));
/// ```
pub fn parse_upload_response(body: &str) -> Result<UploadOutcome> {
    let value: Value = serde_json::from_str(body)?;

    if let Some(error) = value.get("error").filter(|e| is_truthy(e)) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(UploadOutcome::Rejected(message));
    }

    let result: AnalysisResult = serde_json::from_value(value)?;
    validate(&result)?;
    Ok(UploadOutcome::Analysis(result))
}

/// JSの真偽判定に合わせる（null, false, 0, "" は偽）
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn validate(result: &AnalysisResult) -> Result<()> {
    if result.total_area < 0.0 {
        return Err(Error::InvalidResponse(format!(
            "total_area must be non-negative: {}",
            result.total_area
        )));
    }

    if result.object_sizes.len() as u64 != result.object_count {
        return Err(Error::InvalidResponse(format!(
            "object_sizes has {} entries, object_count is {}",
            result.object_sizes.len(),
            result.object_count
        )));
    }

    if let Some((index, size)) = result
        .object_sizes
        .iter()
        .enumerate()
        .find(|(_, size)| **size < 0.0)
    {
        return Err(Error::InvalidResponse(format!(
            "object_sizes[{}] must be non-negative: {}",
            index, size
        )));
    }

    Ok(())
}
