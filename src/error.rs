use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("设置错误: {0}")]
    Config(String),

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("读取文件失败 {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("读取工作表失败 {path} [{sheet}]: {source}")]
    ReadSheet {
        path: String,
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("写入文件失败 {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("没有可输出的工作表: {0}")]
    NoSheetsProduced(String),

    #[error("JSON解析错误: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] attendance_common::Error),

    #[error("处理失败: {0}")]
    Unexpected(String),
}

impl CleanerError {
    pub fn read(path: &Path, source: calamine::Error) -> Self {
        CleanerError::Read {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn write(path: &Path, source: rust_xlsxwriter::XlsxError) -> Self {
        CleanerError::Write {
            path: path.display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanerError>;
