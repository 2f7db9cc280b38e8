//! 第二阶段（单元格清理）的集成测试

mod common;

use attendance_cleaner::rewrite::CellRewriter;
use calamine::{Data, DataType, SheetVisible};
use chrono::{NaiveDate, NaiveDateTime};
use common::{
    cell_text, read_formulas, read_sheet, sheet_visibility, write_fixture, FixtureSheet,
};
use rust_xlsxwriter::{Format, Formula, Workbook};
use std::path::Path;
use tempfile::tempdir;

fn report_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// 第一张工作表隐藏，第二张含日期・数值・公式
fn write_typed_fixture(path: &Path) {
    let mut book = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let backup = book.add_worksheet();
    backup.set_name("备份").unwrap();
    backup.write_string(0, 0, "姓名").unwrap();
    backup.write_string(1, 0, "张三").unwrap();
    backup.write_string(1, 3, "正常-").unwrap();
    backup.set_hidden(true);

    let sheet = book.add_worksheet();
    sheet.set_name("8月").unwrap();
    sheet.set_active(true);
    for (c, header) in ["入职日期", "工号", "部门", "1", "2", "3"].iter().enumerate() {
        sheet.write_string(0, c as u16, *header).unwrap();
    }
    sheet.write_datetime_with_format(1, 0, &report_date(), &date_format).unwrap();
    sheet.write_number(1, 1, 1001.0).unwrap();
    sheet.write_string(1, 2, "正常-").unwrap();
    sheet.write_datetime_with_format(1, 3, &report_date(), &date_format).unwrap();
    sheet.write_formula(1, 4, Formula::new("=1+1").set_result("2")).unwrap();
    sheet.write_string(1, 5, "正常-09:00").unwrap();

    book.save(path).unwrap();
}

fn assert_report_date(value: Option<&Data>) {
    let Some(Data::DateTime(dt)) = value else {
        panic!("日期单元格类型改变: {:?}", value);
    };
    assert_eq!(dt.as_datetime(), Some(report_date()));
}

fn rows(values: &[&[&str]]) -> Vec<Vec<String>> {
    values
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn test_rewrite_cleans_visible_sheets() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("处理月报.xlsx");
    let output = dir.path().join("原始数据.xlsx");

    write_fixture(
        &input,
        &[FixtureSheet::new(
            "8月",
            rows(&[
                &["姓名", "员工ID", "部门", "1", "2", "3"],
                &["张三", "正常-", "缺卡", "迟到5分钟-", "正常(休息)", "早退 3 分钟;09:00"],
            ]),
        )],
    );

    let report = CellRewriter::default()
        .rewrite(&input, &output)
        .expect("替换失败");
    assert_eq!(report.total_modified(), 3);

    let range = read_sheet(&output, "8月");
    // 保护列不处理
    assert_eq!(cell_text(&range, 1, 1), "正常-");
    assert_eq!(cell_text(&range, 1, 2), "缺卡");
    // 数据列
    assert_eq!(cell_text(&range, 1, 3), ";");
    assert_eq!(cell_text(&range, 1, 4), "");
    assert_eq!(cell_text(&range, 1, 5), "09:00");
    // 表头不变
    assert_eq!(cell_text(&range, 0, 3), "1");
}

#[test]
fn test_rewrite_keeps_hidden_sheets_unchanged() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("处理月报.xlsx");
    let output = dir.path().join("原始数据.xlsx");

    write_fixture(
        &input,
        &[
            FixtureSheet::new("8月", rows(&[&["姓名", "员工ID", "部门", "1"], &["张三", "", "", "正常-"]])),
            FixtureSheet::new("备份", rows(&[&["姓名", "员工ID", "部门", "1"], &["张三", "", "", "正常-"]]))
                .hidden(),
        ],
    );

    let report = CellRewriter::default()
        .rewrite(&input, &output)
        .expect("替换失败");

    assert_eq!(report.sheets.len(), 2);
    assert!(!report.sheets[0].skipped_hidden);
    assert!(report.sheets[1].skipped_hidden);
    assert_eq!(report.sheets[1].modified, 0);

    let visible = read_sheet(&output, "8月");
    assert_eq!(cell_text(&visible, 1, 3), "");

    let hidden = read_sheet(&output, "备份");
    assert_eq!(cell_text(&hidden, 1, 3), "正常-");
    assert_eq!(sheet_visibility(&output, "备份"), Some(SheetVisible::Hidden));
    assert_eq!(sheet_visibility(&output, "8月"), Some(SheetVisible::Visible));
}

#[test]
fn test_rewrite_custom_protected_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("in.xlsx");
    let output = dir.path().join("out.xlsx");

    write_fixture(
        &input,
        &[FixtureSheet::new(
            "8月",
            rows(&[&["姓名", "员工ID", "部门", "班次", "1"], &["张三", "E001", "Sales", "正常(休息)", "正常(休息)"]]),
        )],
    );

    CellRewriter::new(4).rewrite(&input, &output).expect("替换失败");

    let range = read_sheet(&output, "8月");
    assert_eq!(cell_text(&range, 1, 3), "正常(休息)");
    assert_eq!(cell_text(&range, 1, 4), "");
}

#[test]
fn test_rewrite_keeps_first_sheet_hidden() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("处理月报.xlsx");
    let output = dir.path().join("原始数据.xlsx");
    write_typed_fixture(&input);
    assert_eq!(sheet_visibility(&input, "备份"), Some(SheetVisible::Hidden));

    let report = CellRewriter::default()
        .rewrite(&input, &output)
        .expect("替换失败");
    assert!(report.sheets[0].skipped_hidden);

    assert_eq!(sheet_visibility(&output, "备份"), Some(SheetVisible::Hidden));
    assert_eq!(sheet_visibility(&output, "8月"), Some(SheetVisible::Visible));
    let backup = read_sheet(&output, "备份");
    assert_eq!(cell_text(&backup, 1, 3), "正常-");
}

#[test]
fn test_rewrite_keeps_cell_types() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("处理月报.xlsx");
    let output = dir.path().join("原始数据.xlsx");
    write_typed_fixture(&input);

    let report = CellRewriter::default()
        .rewrite(&input, &output)
        .expect("替换失败");
    // 只有文本数据单元格被修改
    assert_eq!(report.sheets[1].modified, 1);

    let range = read_sheet(&output, "8月");
    // 保护列
    assert_report_date(range.get_value((1, 0)));
    assert_eq!(range.get_value((1, 1)).and_then(|d| d.get_float()), Some(1001.0));
    assert_eq!(cell_text(&range, 1, 2), "正常-");
    // 数据列
    assert_report_date(range.get_value((1, 3)));
    assert_eq!(cell_text(&range, 1, 4), "2");
    assert_eq!(cell_text(&range, 1, 5), "09:00");

    let formulas = read_formulas(&output, "8月");
    let formula = formulas.get_value((1, 4)).expect("公式丢失");
    assert_eq!(formula.trim_start_matches('='), "1+1");
}
