//! 错误类型定义

use thiserror::Error;

/// 公共错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 员工信息表缺少必要的列
    #[error("员工信息文件缺少必要的列: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("替换规则无效 `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result类型别名
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_columns() {
        let error = Error::MissingColumns {
            missing: vec!["员工ID".to_string(), "8月班次".to_string()],
        };
        assert_eq!(format!("{}", error), "员工信息文件缺少必要的列: 员工ID, 8月班次");
    }

    #[test]
    fn test_error_display_invalid_pattern() {
        let source = regex::Regex::new("缺卡(").unwrap_err();
        let error = Error::InvalidPattern { pattern: "缺卡(".to_string(), source };
        let display = format!("{}", error);
        assert!(display.contains("缺卡("));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::MissingColumns { missing: vec!["部门".to_string()] };
        let debug = format!("{:?}", error);
        assert!(debug.contains("MissingColumns"));
        assert!(debug.contains("部门"));
    }
}
