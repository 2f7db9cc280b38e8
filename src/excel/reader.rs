//! 工作簿读取（calamine）

use super::{Sheet, Visibility, Workbook};
use crate::error::{CleanerError, Result};
use attendance_common::{CellValue, Grid, ReferenceTable};
use calamine::{open_workbook_auto, Data, Range, Reader, SheetType, SheetVisible};
use std::path::Path;

/// 读取整个工作簿（仅普通工作表，按原顺序）
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(CleanerError::FileNotFound(path.display().to_string()));
    }

    let mut book = open_workbook_auto(path).map_err(|e| CleanerError::read(path, e))?;

    let sheets_meta: Vec<(String, Visibility)> = book
        .sheets_metadata()
        .iter()
        .filter(|s| s.typ == SheetType::WorkSheet)
        .map(|s| (s.name.clone(), visibility_of(s.visible)))
        .collect();

    let mut workbook = Workbook::new();
    for (name, visibility) in sheets_meta {
        let sheet_error = |source: calamine::Error| CleanerError::ReadSheet {
            path: path.display().to_string(),
            sheet: name.clone(),
            source,
        };
        let range = book.worksheet_range(&name).map_err(sheet_error)?;
        let formulas = book.worksheet_formula(&name).map_err(sheet_error)?;
        let grid = range_to_grid(&range, &formulas);
        workbook.push(Sheet {
            name,
            visibility,
            grid,
        });
    }

    tracing::debug!(path = %path.display(), sheets = workbook.len(), "工作簿读取完成");
    Ok(workbook)
}

/// 读取员工信息表（第一张工作表，首个非空行为表头）
pub fn read_reference_table(path: &Path) -> Result<ReferenceTable> {
    let workbook = read_workbook(path)?;
    let first = workbook.sheets.first().ok_or_else(|| {
        CleanerError::Unexpected(format!("员工信息文件没有工作表: {}", path.display()))
    })?;
    Ok(ReferenceTable::from_grid(&first.grid))
}

fn visibility_of(visible: SheetVisible) -> Visibility {
    match visible {
        SheetVisible::Visible => Visibility::Visible,
        SheetVisible::Hidden => Visibility::Hidden,
        SheetVisible::VeryHidden => Visibility::VeryHidden,
    }
}

/// Range → 绝对坐标网格
///
/// calamine 的 Range 从第一个非空单元格开始，这里补回前导空行・空列。
/// 公式单元格保留公式文本，值作为缓存结果。
fn range_to_grid(range: &Range<Data>, formulas: &Range<String>) -> Grid {
    let Some((height, width)) = [range.end(), formulas.end()]
        .into_iter()
        .flatten()
        .map(|(r, c)| (r as usize + 1, c as usize + 1))
        .reduce(|(h1, w1), (h2, w2)| (h1.max(h2), w1.max(w2)))
    else {
        return Grid::default();
    };

    let mut grid = Grid::new(height, width);
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for (r, c, data) in range.used_cells() {
        grid.set(start_row as usize + r, start_col as usize + c, to_cell(data));
    }

    let (start_row, start_col) = formulas.start().unwrap_or((0, 0));
    for (r, c, formula) in formulas.used_cells() {
        let (row, col) = (start_row as usize + r, start_col as usize + c);
        let cached = grid.get(row, col).cloned().unwrap_or_default();
        grid.set(row, col, CellValue::formula(formula.as_str(), cached));
    }
    grid
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_to_grid_keeps_absolute_position() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("张三".to_string()));
        range.set_value((3, 2), Data::Float(8.0));

        let grid = range_to_grid(&range, &Range::empty());
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.get(0, 0), Some(&CellValue::Empty));
        assert_eq!(grid.get(2, 1), Some(&CellValue::text("张三")));
        assert_eq!(grid.get(3, 2), Some(&CellValue::Number(8.0)));
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert_eq!(range_to_grid(&range, &Range::empty()).height(), 0);
    }

    #[test]
    fn test_range_to_grid_keeps_formulas() {
        let mut values: Range<Data> = Range::new((0, 0), (0, 1));
        values.set_value((0, 0), Data::Float(1.0));
        values.set_value((0, 1), Data::Float(2.0));
        let mut formulas: Range<String> = Range::new((0, 1), (1, 1));
        formulas.set_value((0, 1), "A1+1".to_string());
        formulas.set_value((1, 1), "A1*3".to_string());

        let grid = range_to_grid(&values, &formulas);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(0, 0), Some(&CellValue::Number(1.0)));
        assert_eq!(
            grid.get(0, 1),
            Some(&CellValue::formula("A1+1", CellValue::Number(2.0)))
        );
        // 没有缓存值的公式
        assert_eq!(grid.get(1, 1), Some(&CellValue::formula("A1*3", CellValue::Empty)));
    }

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Int(3)), CellValue::Int(3));
        assert_eq!(to_cell(&Data::Bool(false)), CellValue::Bool(false));
        assert_eq!(
            to_cell(&Data::DateTimeIso("2025-08-01".to_string())),
            CellValue::text("2025-08-01")
        );
    }
}
