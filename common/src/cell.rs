//! 单元格值与表格网格

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 单元格值（未区分表头）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    /// 日期・时刻（Excel 序列值 1 未满的值只有时刻部分）
    DateTime(NaiveDateTime),
    /// 公式与缓存的计算结果
    Formula {
        formula: String,
        cached: Box<CellValue>,
    },
}

/// Excel 中只含时刻的值换算成的日期
fn time_only_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 31)
}

/// 日期时刻值的显示形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeKind {
    Date,
    Time,
    DateTime,
}

impl DateTimeKind {
    pub fn of(value: &NaiveDateTime) -> Self {
        if Some(value.date()) == time_only_date() {
            DateTimeKind::Time
        } else if value.time() == NaiveTime::MIN {
            DateTimeKind::Date
        } else {
            DateTimeKind::DateTime
        }
    }

    /// chrono 格式
    pub fn pattern(&self) -> &'static str {
        match self {
            DateTimeKind::Date => "%Y-%m-%d",
            DateTimeKind::Time => "%H:%M:%S",
            DateTimeKind::DateTime => "%Y-%m-%d %H:%M:%S",
        }
    }

    /// Excel 数字格式
    pub fn num_format(&self) -> &'static str {
        match self {
            DateTimeKind::Date => "yyyy-mm-dd",
            DateTimeKind::Time => "hh:mm:ss",
            DateTimeKind::DateTime => "yyyy-mm-dd hh:mm:ss",
        }
    }
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// 空单元格或空字符串
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn formula(formula: impl Into<String>, cached: CellValue) -> Self {
        CellValue::Formula {
            formula: formula.into(),
            cached: Box::new(cached),
        }
    }

    /// 公式单元格返回缓存值，其他原样返回
    pub fn resolved(&self) -> CellValue {
        match self {
            CellValue::Formula { cached, .. } => cached.resolved(),
            other => other.clone(),
        }
    }

    /// 字符串化（空单元格为空字符串，整数值的浮点数不带小数点，公式取缓存值）
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Number(f) => format_number(*f),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::DateTime(dt) => dt.format(DateTimeKind::of(dt).pattern()).to_string(),
            CellValue::Formula { cached, .. } => cached.to_text(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

fn format_number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

/// 行优先的矩形网格
///
/// 坐标为绝对位置（A1 = (0, 0)），不足的位置以 `CellValue::Empty` 补齐。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            rows: vec![vec![CellValue::Empty; width]; height],
            width,
        }
    }

    /// 由行数据构建，行长度不一时按最长行补齐
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// 越界写入会被忽略
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Vec<CellValue>> {
        self.rows.iter_mut()
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }
}
