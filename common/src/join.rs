//! 员工信息匹配
//!
//! 员工信息表（班次表）按姓名建立索引，把员工ID・部门・班次填入整形后的月报。
//! 姓名按字符串完全一致匹配，不做模糊匹配，也不去除空白。

use crate::cell::{CellValue, Grid};
use crate::error::{Error, Result};
use crate::reshape::ReshapedSheet;
use std::collections::HashMap;

/// 员工信息表（首个非空行为表头）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl ReferenceTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// 从网格构建，跳过表头之前的空行
    pub fn from_grid(grid: &Grid) -> Self {
        let mut rows = grid
            .rows()
            .skip_while(|row| row.iter().all(CellValue::is_empty));

        let headers = match rows.next() {
            Some(row) => row.iter().map(CellValue::to_text).collect(),
            None => return Self::default(),
        };
        let rows = rows.map(<[CellValue]>::to_vec).collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 缺少的列（按 `required` 的顺序）
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|col| self.column_index(col).is_none())
            .cloned()
            .collect()
    }
}

/// 姓名 → 员工信息
#[derive(Debug, Clone, Default)]
pub struct EmployeeIndex {
    fields: Vec<String>,
    entries: HashMap<String, Vec<CellValue>>,
}

impl EmployeeIndex {
    /// 员工信息列名（与插入列的顺序一致）
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&[CellValue]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 建立姓名索引
///
/// # Arguments
/// * `reference` - 员工信息表
/// * `name_column` - 姓名列名
/// * `fields` - 需要填入的列名（员工ID、部门、班次…）
///
/// # Returns
/// 缺少任何必要列时返回 `Error::MissingColumns`，只列出缺少的列。
/// 重名时后出现的行覆盖先出现的行。
pub fn build_index(
    reference: &ReferenceTable,
    name_column: &str,
    fields: &[String],
) -> Result<EmployeeIndex> {
    let required: Vec<String> = std::iter::once(name_column.to_string())
        .chain(fields.iter().cloned())
        .collect();
    let missing = reference.missing_columns(&required);
    if !missing.is_empty() {
        return Err(Error::MissingColumns { missing });
    }

    let column_of = |col: &str| reference.column_index(col).unwrap_or_default();
    let name_idx = column_of(name_column);
    let field_idx: Vec<usize> = fields.iter().map(|f| column_of(f)).collect();

    let mut entries = HashMap::with_capacity(reference.rows.len());
    for row in &reference.rows {
        let name = row.get(name_idx).map(CellValue::to_text).unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        let values = field_idx
            .iter()
            .map(|&i| row.get(i).map(CellValue::resolved).unwrap_or_default())
            .collect();
        entries.insert(name, values);
    }

    Ok(EmployeeIndex {
        fields: fields.to_vec(),
        entries,
    })
}

/// 按姓名填入员工信息
///
/// 姓名为空或不在索引中的行保持空白，不视为错误。
///
/// # Returns
/// 匹配成功的行数
pub fn fill(sheet: &mut ReshapedSheet, index: &EmployeeIndex) -> usize {
    let mut matched = 0;
    for row in 0..sheet.rows().len() {
        let name = match sheet.name_at(row) {
            Some(cell) if !cell.is_empty() => cell.to_text(),
            _ => continue,
        };
        if let Some(values) = index.get(&name) {
            sheet.set_metadata(row, values);
            matched += 1;
        }
    }
    matched
}
