//! 测试用工作簿的生成与读取
#![allow(dead_code)]

use calamine::{open_workbook, Data, Range, Reader, SheetVisible, Xlsx};
use rust_xlsxwriter::Workbook;
use std::path::Path;

pub struct FixtureSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
    pub hidden: bool,
}

impl FixtureSheet {
    pub fn new(name: &str, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            rows,
            hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// 所有单元格按字符串写入，空字符串不写
pub fn write_fixture(path: &Path, sheets: &[FixtureSheet]) {
    let mut book = Workbook::new();
    for sheet in sheets {
        let ws = book.add_worksheet();
        ws.set_name(&sheet.name).expect("工作表名设置失败");
        for (r, row) in sheet.rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    ws.write_string(r as u32, c as u16, value).expect("单元格写入失败");
                }
            }
        }
        if sheet.hidden {
            ws.set_hidden(true);
        }
    }
    book.save(path).expect("测试文件保存失败");
}

/// 月报工作表：前4行标题，之后每行 `[姓名, 填充…, data…]`，data 从 `start_index` 开始
pub fn monthly_rows(start_index: usize, people: &[(&str, &[&str])]) -> Vec<Vec<String>> {
    let data_width = people.iter().map(|(_, d)| d.len()).max().unwrap_or(1).max(1);
    let width = start_index + data_width;

    let mut rows = Vec::new();
    rows.push(vec!["上下班打卡_月报".to_string()]);
    rows.push(vec!["统计日期: 2025-08-01 至 2025-08-31".to_string()]);
    rows.push((0..width).map(|c| format!("表头{}", c)).collect());
    rows.push((0..width).map(|c| format!("子表头{}", c)).collect());

    for (name, data) in people {
        let mut row = vec![String::new(); width];
        row[0] = name.to_string();
        for c in 1..start_index {
            row[c] = format!("汇总{}", c);
        }
        for (offset, value) in data.iter().enumerate() {
            row[start_index + offset] = value.to_string();
        }
        rows.push(row);
    }
    rows
}

/// 员工信息表
pub fn reference_rows(headers: &[&str], rows: &[&[&str]]) -> Vec<Vec<String>> {
    std::iter::once(headers)
        .chain(rows.iter().copied())
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}

pub fn read_sheet(path: &Path, name: &str) -> Range<Data> {
    let mut book: Xlsx<_> = open_workbook(path).expect("输出文件打开失败");
    book.worksheet_range(name).expect("工作表读取失败")
}

pub fn read_formulas(path: &Path, name: &str) -> Range<String> {
    let mut book: Xlsx<_> = open_workbook(path).expect("输出文件打开失败");
    book.worksheet_formula(name).expect("公式读取失败")
}

pub fn sheet_names(path: &Path) -> Vec<String> {
    let book: Xlsx<_> = open_workbook(path).expect("输出文件打开失败");
    book.sheet_names()
}

pub fn sheet_visibility(path: &Path, name: &str) -> Option<SheetVisible> {
    let book: Xlsx<_> = open_workbook(path).expect("输出文件打开失败");
    book.sheets_metadata()
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.visible)
}

/// 绝对坐标的单元格文本（空单元格为空字符串）
pub fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    range
        .get_value((row, col))
        .map(|d| d.to_string())
        .unwrap_or_default()
}
