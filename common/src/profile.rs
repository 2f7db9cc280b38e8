//! 月报版式与处理参数
//!
//! 两种月报版式只在三处不同：数据起始列、是否匹配班次、是否清理「未排班」相关标注。

use crate::rules::{RuleSet, STANDARD_DELETE, UNSCHEDULED_DELETE};
use serde::{Deserialize, Serialize};

/// 列名（员工信息表的列名，同时用作输出表头）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLabels {
    pub name: String,
    pub employee_id: String,
    pub department: String,
    /// 输出中班次列的表头（员工信息表中的班次列名由调用方指定）
    pub shift: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            name: "姓名".into(),
            employee_id: "员工ID".into(),
            department: "部门".into(),
            shift: "班次".into(),
        }
    }
}

/// 月报版式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportVariant {
    /// 第27列起为数据，匹配班次
    #[default]
    WithShift,
    /// 第47列起为数据，不匹配班次，额外清理「未排班」「地点异常」
    WithoutShift,
}

impl std::str::FromStr for ReportVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "with-shift" | "shift" | "班次" => Ok(ReportVariant::WithShift),
            "without-shift" | "no-shift" | "无班次" => Ok(ReportVariant::WithoutShift),
            _ => Err(format!("Unknown variant: {}. Use with-shift or without-shift", s)),
        }
    }
}

impl std::fmt::Display for ReportVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportVariant::WithShift => write!(f, "with-shift"),
            ReportVariant::WithoutShift => write!(f, "without-shift"),
        }
    }
}

/// 第一阶段处理参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformProfile {
    /// 数据起始列（1起，与表格软件中的列号一致）
    pub data_start_column: usize,
    /// 是否插入并匹配班次列
    pub include_shift: bool,
    /// 是否追加「未排班」相关删除规则
    pub strip_unscheduled: bool,
}

impl TransformProfile {
    pub fn for_variant(variant: ReportVariant) -> Self {
        match variant {
            ReportVariant::WithShift => Self {
                data_start_column: 27,
                include_shift: true,
                strip_unscheduled: false,
            },
            ReportVariant::WithoutShift => Self {
                data_start_column: 47,
                include_shift: false,
                strip_unscheduled: true,
            },
        }
    }

    /// 数据起始列（0起）
    pub fn data_start_index(&self) -> usize {
        self.data_start_column.saturating_sub(1)
    }

    /// 插入的员工信息列表头
    pub fn metadata_labels(&self, labels: &ColumnLabels) -> Vec<String> {
        let mut out = vec![labels.employee_id.clone(), labels.department.clone()];
        if self.include_shift {
            out.push(labels.shift.clone());
        }
        out
    }

    /// 员工信息表中需要取值的列（与 `metadata_labels` 一一对应）
    pub fn reference_fields(&self, labels: &ColumnLabels, shift_column: &str) -> Vec<String> {
        let mut out = vec![labels.employee_id.clone(), labels.department.clone()];
        if self.include_shift {
            out.push(shift_column.to_string());
        }
        out
    }

    /// 不参与清理的前导列数
    pub fn protected_columns(&self) -> usize {
        if self.include_shift {
            4
        } else {
            3
        }
    }

    pub fn delete_rules(&self) -> &'static RuleSet {
        if self.strip_unscheduled {
            &UNSCHEDULED_DELETE
        } else {
            &STANDARD_DELETE
        }
    }
}

impl Default for TransformProfile {
    fn default() -> Self {
        Self::for_variant(ReportVariant::default())
    }
}

/// 由月份生成班次列名（8 → "8月班次"）
pub fn shift_column_for_month(month: u32) -> Option<String> {
    (1..=12).contains(&month).then(|| format!("{}月班次", month))
}
