//! 結果表示用の整形
//!
//! 面積は四捨五入（.5 は正方向へ切り上げ）し、3桁ごとにカンマで区切る。

use crate::types::AnalysisResult;
use serde::{Deserialize, Serialize};

/// 面積の単位表記
pub const AREA_UNIT: &str = "px²";

/// 一覧の見出し
pub const OBJECT_LIST_HEADING: &str = "Individual Objects:";

/// 四捨五入（.5 は +∞ 方向）
pub fn js_round(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// 四捨五入して3桁区切りの文字列にする
///
/// # Examples
/// ```
/// use object_measure_common::format_area;
///
/// assert_eq!(format_area(2456.7), "2,457");
/// assert_eq!(format_area(999.4), "999");
/// ```
pub fn format_area(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = js_round(value);
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 平均面積（物体数0のときは0）
pub fn mean_area(total_area: f64, object_count: u64) -> f64 {
    if object_count == 0 {
        0.0
    } else {
        total_area / object_count as f64
    }
}

/// 物体一覧の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// "Object 1" 形式のラベル
    pub label: String,
    /// 整形済みの面積（単位なし）
    pub area: String,
}

impl ObjectEntry {
    pub fn area_with_unit(&self) -> String {
        format!("{} {}", self.area, AREA_UNIT)
    }
}

/// 表示用に整形済みの解析結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedResult {
    pub object_count: String,
    pub total_area: String,
    pub average_area: String,
    pub result_image: String,
    pub objects: Vec<ObjectEntry>,
}

impl RenderedResult {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let average_area = if result.object_count > 0 {
            format_area(mean_area(result.total_area, result.object_count))
        } else {
            "0".to_string()
        };

        let objects = result
            .object_sizes
            .iter()
            .enumerate()
            .map(|(index, size)| ObjectEntry {
                label: format!("Object {}", index + 1),
                area: format_area(*size),
            })
            .collect();

        Self {
            object_count: result.object_count.to_string(),
            total_area: format_area(result.total_area),
            average_area,
            result_image: result.result_image.clone(),
            objects,
        }
    }
}
