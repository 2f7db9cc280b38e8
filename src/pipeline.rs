//! 两阶段一括处理
//!
//! 月报 + 员工信息表 → 中间文件（第一阶段）→ 结果文件（第二阶段）。
//! 中间文件放在临时目录，处理结束后删除；结果文件登记到 [`ProcessedFileStore`]。

use crate::config::Config;
use crate::error::{CleanerError, Result};
use crate::rewrite::{CellRewriter, RewriteReport};
use crate::store::{clean_temp_files, ProcessedFileStore};
use crate::transform::{TransformReport, WorkbookTransformer};
use attendance_common::{ColumnLabels, TransformProfile};
use std::path::{Path, PathBuf};

/// 一次处理的输入
#[derive(Debug, Clone)]
pub struct PipelineRequest<'a> {
    pub report_path: &'a Path,
    pub reference_path: &'a Path,
    /// 员工信息表中的班次列名（如「8月班次」）
    pub shift_column: Option<&'a str>,
    pub profile: TransformProfile,
    /// 省略时输出到临时目录下的「<班次列名>原始数据.xlsx」
    pub output_path: Option<&'a Path>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub file_id: String,
    pub output_path: PathBuf,
    pub transform: TransformReport,
    pub rewrite: RewriteReport,
}

pub struct Pipeline {
    labels: ColumnLabels,
    temp_dir: PathBuf,
    max_temp_age: std::time::Duration,
    store: ProcessedFileStore,
}

impl Pipeline {
    pub fn new(labels: ColumnLabels, temp_dir: PathBuf, max_temp_age_secs: u64) -> Self {
        Self {
            labels,
            temp_dir,
            max_temp_age: std::time::Duration::from_secs(max_temp_age_secs),
            store: ProcessedFileStore::with_max_age_secs(max_temp_age_secs),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.labels.clone(), config.temp_dir(), config.max_temp_age_secs)
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn store(&self) -> &ProcessedFileStore {
        &self.store
    }

    /// 按文件ID取结果文件
    pub fn processed_file(&self, file_id: &str) -> Option<&Path> {
        self.store.get(file_id)
    }

    pub fn run(&mut self, request: &PipelineRequest<'_>) -> Result<PipelineOutcome> {
        std::fs::create_dir_all(&self.temp_dir)?;

        let intermediate_path = self
            .temp_dir
            .join(format!("处理月报_{}.xlsx", uuid::Uuid::new_v4()));
        let output_path = match request.output_path {
            Some(path) => path.to_path_buf(),
            None => {
                let label = request.shift_column.unwrap_or(&self.labels.shift);
                self.temp_dir.join(format!("{}原始数据.xlsx", label))
            }
        };

        let result = self.run_stages(request, &intermediate_path, &output_path);

        if intermediate_path.exists() {
            if let Err(e) = std::fs::remove_file(&intermediate_path) {
                tracing::warn!(path = %intermediate_path.display(), error = %e, "中间文件删除失败");
            }
        }

        let (transform, rewrite) = result?;
        let file_id = self.store.insert(output_path.clone());
        tracing::info!(file_id = %file_id, path = %output_path.display(), "结果文件已登记");

        Ok(PipelineOutcome {
            file_id,
            output_path,
            transform,
            rewrite,
        })
    }

    fn run_stages(
        &self,
        request: &PipelineRequest<'_>,
        intermediate_path: &Path,
        output_path: &Path,
    ) -> Result<(TransformReport, RewriteReport)> {
        let transformer = WorkbookTransformer::new(request.profile, self.labels.clone());
        let transform = transformer.transform(
            request.report_path,
            request.reference_path,
            request.shift_column,
            intermediate_path,
        )?;
        if !intermediate_path.exists() {
            return Err(CleanerError::Unexpected(format!(
                "未生成中间文件: {}",
                intermediate_path.display()
            )));
        }

        let rewriter = CellRewriter::new(request.profile.protected_columns());
        let rewrite = rewriter.rewrite(intermediate_path, output_path)?;
        if !output_path.exists() {
            return Err(CleanerError::Unexpected(format!(
                "未生成结果文件: {}",
                output_path.display()
            )));
        }

        Ok((transform, rewrite))
    }

    /// 清理过期登记和临时目录中的过期文件
    pub fn clean_temp_files(&mut self) -> Result<usize> {
        self.store.evict_expired();
        clean_temp_files(&self.temp_dir, self.max_temp_age)
    }
}
