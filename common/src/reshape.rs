//! 月报工作表整形
//!
//! 原始月报每张工作表：
//! - 前4行是标题等说明行
//! - 第1列是姓名
//! - 从某一列开始才是需要保留的每日考勤数据
//!
//! 整形后的列顺序固定为 `[姓名, 员工信息列..., 保留的数据列...]`。

use crate::cell::{CellValue, Grid};
use std::fmt;
use std::ops::Range;

/// 丢弃的前导行数
pub const LEADING_ROWS: usize = 4;

/// 跳过工作表的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 行数不足（需要多于4行）
    TooFewRows { rows: usize },
    /// 列数不足
    TooFewColumns { columns: usize, required: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewRows { rows } => {
                write!(f, "行数不足（{}行，需要多于{}行）", rows, LEADING_ROWS)
            }
            SkipReason::TooFewColumns { columns, required } => {
                write!(f, "列数不足（{}列，需要至少{}列）", columns, required)
            }
        }
    }
}

/// 整形结果
#[derive(Debug, Clone, PartialEq)]
pub enum ReshapeOutcome {
    Reshaped(ReshapedSheet),
    Skip(SkipReason),
}

/// 整形后的工作表
#[derive(Debug, Clone, PartialEq)]
pub struct ReshapedSheet {
    headers: Vec<CellValue>,
    rows: Vec<Vec<CellValue>>,
    metadata_columns: usize,
}

impl ReshapedSheet {
    pub fn headers(&self) -> &[CellValue] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// 插入的员工信息列数
    pub fn metadata_columns(&self) -> usize {
        self.metadata_columns
    }

    /// 不参与文本清理的前导列数（姓名 + 员工信息列）
    pub fn protected_columns(&self) -> usize {
        1 + self.metadata_columns
    }

    /// 数据列的列号范围
    pub fn data_columns(&self) -> Range<usize> {
        self.protected_columns()..self.width()
    }

    /// 第 `row` 行的姓名
    pub fn name_at(&self, row: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.first())
    }

    /// 写入第 `row` 行的员工信息列，多余的值被忽略
    pub fn set_metadata(&mut self, row: usize, values: &[CellValue]) {
        let count = self.metadata_columns;
        if let Some(r) = self.rows.get_mut(row) {
            for (offset, value) in values.iter().take(count).enumerate() {
                r[1 + offset] = value.clone();
            }
        }
    }

    /// 对每个数据单元格套用 `f`
    pub fn map_data_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(&CellValue) -> CellValue,
    {
        let data = self.data_columns();
        for row in &mut self.rows {
            for cell in &mut row[data.clone()] {
                *cell = f(cell);
            }
        }
    }

    /// 表头行 + 数据行
    pub fn to_grid(&self) -> Grid {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.headers.clone());
        rows.extend(self.rows.iter().cloned());
        Grid::from_rows(rows)
    }
}

/// 整形一张工作表
///
/// # Arguments
/// * `raw` - 原始网格（无表头）
/// * `start_index` - 第一个保留数据列的列号（0起）
/// * `name_label` - 姓名列表头
/// * `metadata_labels` - 插入在姓名列之后的员工信息列表头
///
/// # Returns
/// 不满足行数・列数条件时返回 `Skip`
pub fn reshape(
    raw: &Grid,
    start_index: usize,
    name_label: &str,
    metadata_labels: &[String],
) -> ReshapeOutcome {
    if raw.height() <= LEADING_ROWS {
        return ReshapeOutcome::Skip(SkipReason::TooFewRows { rows: raw.height() });
    }
    let required = start_index + 1;
    if raw.width() < required {
        return ReshapeOutcome::Skip(SkipReason::TooFewColumns {
            columns: raw.width(),
            required,
        });
    }

    let retained = raw.width() - start_index;
    let metadata_columns = metadata_labels.len();

    let mut headers = Vec::with_capacity(1 + metadata_columns + retained);
    headers.push(CellValue::text(name_label));
    headers.extend(metadata_labels.iter().map(|l| CellValue::text(l.as_str())));
    // 数据列表头沿用位置编号 1..n
    headers.extend((1..=retained).map(|i| CellValue::Int(i as i64)));

    let rows = raw
        .rows()
        .skip(LEADING_ROWS)
        .map(|row| {
            let mut out = Vec::with_capacity(headers.len());
            // 行位置改变，公式只保留计算结果
            out.push(row[0].resolved());
            out.extend(std::iter::repeat(CellValue::text("")).take(metadata_columns));
            out.extend(row[start_index..].iter().map(CellValue::resolved));
            out
        })
        .collect();

    ReshapeOutcome::Reshaped(ReshapedSheet {
        headers,
        rows,
        metadata_columns,
    })
}
