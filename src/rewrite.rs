//! 第二阶段：单元格级清理
//!
//! 在第一阶段的输出上逐单元格套用扩展删除规则和分号折叠规则。
//! 隐藏工作表原样写出；前导的姓名・员工信息列不处理。

use crate::error::Result;
use crate::excel::{self, Sheet, Workbook};
use attendance_common::rules::{COLLAPSE, REWRITE_DELETE};
use attendance_common::{strip_and_collapse, CellValue};
use std::path::{Path, PathBuf};

/// 默认保护列数（姓名・员工ID・部门）
pub const DEFAULT_PROTECTED_COLUMNS: usize = 3;

/// 单个工作表的替换统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRewrite {
    pub name: String,
    /// 修改的单元格数
    pub modified: usize,
    /// 隐藏工作表未处理
    pub skipped_hidden: bool,
}

#[derive(Debug, Clone)]
pub struct RewriteReport {
    pub output_path: PathBuf,
    pub sheets: Vec<SheetRewrite>,
}

impl RewriteReport {
    pub fn total_modified(&self) -> usize {
        self.sheets.iter().map(|s| s.modified).sum()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CellRewriter {
    protected_columns: usize,
}

impl Default for CellRewriter {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_COLUMNS)
    }
}

impl CellRewriter {
    pub fn new(protected_columns: usize) -> Self {
        Self { protected_columns }
    }

    pub fn rewrite(&self, input_path: &Path, output_path: &Path) -> Result<RewriteReport> {
        let mut workbook = excel::read_workbook(input_path)?;
        let sheets = self.rewrite_workbook(&mut workbook);

        excel::write_workbook(&workbook, output_path)?;
        tracing::info!(path = %output_path.display(), "替换完成");

        Ok(RewriteReport {
            output_path: output_path.to_path_buf(),
            sheets,
        })
    }

    pub fn rewrite_workbook(&self, workbook: &mut Workbook) -> Vec<SheetRewrite> {
        workbook
            .sheets
            .iter_mut()
            .map(|sheet| {
                if !sheet.visibility.is_visible() {
                    tracing::debug!(sheet = %sheet.name, "隐藏工作表，已跳过");
                    return SheetRewrite {
                        name: sheet.name.clone(),
                        modified: 0,
                        skipped_hidden: true,
                    };
                }
                let modified = self.rewrite_sheet(sheet);
                tracing::info!(sheet = %sheet.name, modified, "工作表替换完成");
                SheetRewrite {
                    name: sheet.name.clone(),
                    modified,
                    skipped_hidden: false,
                }
            })
            .collect()
    }

    /// 返回修改的单元格数
    pub fn rewrite_sheet(&self, sheet: &mut Sheet) -> usize {
        let mut modified = 0;
        for row in sheet.grid.rows_mut() {
            for cell in row.iter_mut().skip(self.protected_columns) {
                // 只处理文本单元格，数值・日期・公式原样保留
                let CellValue::Text(original) = cell else {
                    continue;
                };
                if original.is_empty() {
                    continue;
                }
                let cleaned = strip_and_collapse(original.as_str(), &REWRITE_DELETE, &COLLAPSE);
                if cleaned != *original {
                    *cell = CellValue::Text(cleaned);
                    modified += 1;
                }
            }
        }
        modified
    }
}
