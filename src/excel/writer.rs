//! 工作簿写入（rust_xlsxwriter）
//!
//! 先写到同目录的临时文件，成功后再重命名到目标路径：
//! 失败时目标路径上不会出现写了一半的文件。

use super::Workbook;
use crate::error::{CleanerError, Result};
use attendance_common::{CellValue, DateTimeKind};
use rust_xlsxwriter::{Format, Formula, Workbook as XlsxWorkbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

pub fn write_workbook(workbook: &Workbook, output_path: &Path) -> Result<()> {
    let mut book = XlsxWorkbook::new();
    let formats = DateFormats::new();
    // 活动工作表不能隐藏，取第一个可见工作表
    let active = workbook.sheets.iter().position(|s| s.visibility.is_visible());

    for (index, sheet) in workbook.sheets.iter().enumerate() {
        let worksheet = book.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .map_err(|e| CleanerError::write(output_path, e))?;

        for (r, row) in sheet.grid.rows().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (Ok(row_num), Ok(col_num)) = (u32::try_from(r), u16::try_from(c)) else {
                    return Err(CleanerError::Unexpected(format!(
                        "单元格位置超出范围: 工作表 {} 第{}行 第{}列",
                        sheet.name,
                        r + 1,
                        c + 1
                    )));
                };
                write_cell(worksheet, row_num, col_num, cell, &formats)
                    .map_err(|e| CleanerError::write(output_path, e))?;
            }
        }

        if Some(index) == active {
            worksheet.set_active(true);
        } else if !sheet.visibility.is_visible() {
            worksheet.set_hidden(true);
        }
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_sibling(output_path);
    if let Err(e) = book.save(&temp_path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(CleanerError::write(output_path, e));
    }
    if let Err(e) = std::fs::rename(&temp_path, output_path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    tracing::debug!(path = %output_path.display(), sheets = workbook.len(), "工作簿写入完成");
    Ok(())
}

/// 日期・时刻单元格的数字格式
struct DateFormats {
    date: Format,
    time: Format,
    datetime: Format,
}

impl DateFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format(DateTimeKind::Date.num_format()),
            time: Format::new().set_num_format(DateTimeKind::Time.num_format()),
            datetime: Format::new().set_num_format(DateTimeKind::DateTime.num_format()),
        }
    }

    fn get(&self, kind: DateTimeKind) -> &Format {
        match kind {
            DateTimeKind::Date => &self.date,
            DateTimeKind::Time => &self.time,
            DateTimeKind::DateTime => &self.datetime,
        }
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    formats: &DateFormats,
) -> std::result::Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Text(s) if s.is_empty() => {}
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Number(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_datetime_with_format(row, col, dt, formats.get(DateTimeKind::of(dt)))?;
        }
        CellValue::Formula { formula, cached } => {
            let formula = Formula::new(formula).set_result(cached.to_text());
            worksheet.write_formula(row, col, formula)?;
        }
    }
    Ok(())
}

/// `dir/.name.<uuid>.tmp`
fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output.xlsx".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
}
