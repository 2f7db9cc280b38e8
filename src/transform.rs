//! 第一阶段：月报整形 + 员工信息匹配 + 状态标注清理
//!
//! ## 处理流程
//! 1. 读取员工信息表并校验必要列（缺列时立即失败，不产生输出）
//! 2. 逐个工作表整形，不满足条件的工作表跳过
//! 3. 按姓名填入员工ID・部门（・班次）
//! 4. 对数据列套用删除规则
//! 5. 按原顺序写出所有未跳过的工作表

use crate::error::{CleanerError, Result};
use crate::excel::{self, Sheet, Workbook};
use attendance_common::{
    build_index, fill, normalize, reshape, CellValue, ColumnLabels, EmployeeIndex,
    ReferenceTable, ReshapeOutcome, SkipReason, TransformProfile,
};
use std::path::{Path, PathBuf};

/// 单个工作表的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum SheetResult {
    Processed {
        /// 数据行数（不含表头）
        rows: usize,
        /// 匹配到员工信息的行数
        matched: usize,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetReport {
    pub name: String,
    pub result: SheetResult,
}

/// 第一阶段处理结果
#[derive(Debug, Clone)]
pub struct TransformReport {
    pub output_path: PathBuf,
    pub sheets: Vec<SheetReport>,
}

impl TransformReport {
    pub fn processed_count(&self) -> usize {
        self.sheets
            .iter()
            .filter(|s| matches!(s.result, SheetResult::Processed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.sheets.len() - self.processed_count()
    }
}

/// 月报整形器（按版式参数化）
#[derive(Debug, Clone)]
pub struct WorkbookTransformer {
    profile: TransformProfile,
    labels: ColumnLabels,
}

impl WorkbookTransformer {
    pub fn new(profile: TransformProfile, labels: ColumnLabels) -> Self {
        Self { profile, labels }
    }

    pub fn profile(&self) -> &TransformProfile {
        &self.profile
    }

    /// 文件到文件的处理
    ///
    /// # Arguments
    /// * `input_path` - 原始月报
    /// * `reference_path` - 员工信息表
    /// * `shift_column` - 员工信息表中的班次列名（如「8月班次」），省略时使用班次表头
    /// * `output_path` - 输出文件
    pub fn transform(
        &self,
        input_path: &Path,
        reference_path: &Path,
        shift_column: Option<&str>,
        output_path: &Path,
    ) -> Result<TransformReport> {
        let reference = excel::read_reference_table(reference_path)?;
        let index = self.build_index(&reference, shift_column)?;
        tracing::info!(
            path = %reference_path.display(),
            employees = index.len(),
            "员工信息读取完成"
        );

        let input = excel::read_workbook(input_path)?;
        let (output, sheets) = self.transform_workbook(&input, &index);

        if output.is_empty() {
            return Err(CleanerError::NoSheetsProduced(input_path.display().to_string()));
        }

        excel::write_workbook(&output, output_path)?;
        tracing::info!(path = %output_path.display(), "文件处理完成");

        Ok(TransformReport {
            output_path: output_path.to_path_buf(),
            sheets,
        })
    }

    /// 建立姓名索引，校验员工信息表的必要列
    pub fn build_index(
        &self,
        reference: &ReferenceTable,
        shift_column: Option<&str>,
    ) -> Result<EmployeeIndex> {
        let shift_column = shift_column.unwrap_or(&self.labels.shift);
        let fields = self.profile.reference_fields(&self.labels, shift_column);
        Ok(build_index(reference, &self.labels.name, &fields)?)
    }

    /// 内存中的工作簿处理
    pub fn transform_workbook(
        &self,
        input: &Workbook,
        index: &EmployeeIndex,
    ) -> (Workbook, Vec<SheetReport>) {
        let mut output = Workbook::new();
        let mut reports = Vec::with_capacity(input.len());

        for sheet in &input.sheets {
            let result = match self.transform_sheet(sheet, index) {
                Ok((grid_sheet, result)) => {
                    output.push(grid_sheet);
                    result
                }
                Err(reason) => {
                    tracing::warn!(sheet = %sheet.name, %reason, "工作表已跳过");
                    SheetResult::Skipped(reason)
                }
            };
            reports.push(SheetReport {
                name: sheet.name.clone(),
                result,
            });
        }

        (output, reports)
    }

    fn transform_sheet(
        &self,
        sheet: &Sheet,
        index: &EmployeeIndex,
    ) -> std::result::Result<(Sheet, SheetResult), SkipReason> {
        let metadata_labels = self.profile.metadata_labels(&self.labels);
        let mut reshaped = match reshape(
            &sheet.grid,
            self.profile.data_start_index(),
            &self.labels.name,
            &metadata_labels,
        ) {
            ReshapeOutcome::Reshaped(reshaped) => reshaped,
            ReshapeOutcome::Skip(reason) => return Err(reason),
        };

        let matched = fill(&mut reshaped, index);
        tracing::info!(sheet = %sheet.name, matched, "已匹配并填充员工信息");

        let rules = self.profile.delete_rules();
        reshaped.map_data_cells(|cell| CellValue::Text(normalize(&cell.to_text(), rules)));

        let rows = reshaped.rows().len();
        Ok((
            Sheet::new(sheet.name.clone(), reshaped.to_grid()),
            SheetResult::Processed { rows, matched },
        ))
    }
}
