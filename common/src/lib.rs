//! Attendance Common Library
//!
//! 考勤月报清洗的纯逻辑部分：清理规则、工作表整形、员工信息匹配（不涉及文件读写）

pub mod cell;
pub mod error;
pub mod join;
pub mod profile;
pub mod reshape;
pub mod rules;

pub use cell::{CellValue, DateTimeKind, Grid};
pub use error::{Error, Result};
pub use join::{build_index, fill, EmployeeIndex, ReferenceTable};
pub use profile::{shift_column_for_month, ColumnLabels, ReportVariant, TransformProfile};
pub use reshape::{reshape, ReshapeOutcome, ReshapedSheet, SkipReason};
pub use rules::{normalize, strip_and_collapse, Rule, RuleSet};
