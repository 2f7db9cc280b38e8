use crate::error::{CleanerError, Result};
use attendance_common::{ColumnLabels, ReportVariant};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const TEMP_DIR_ENV: &str = "ATTENDANCE_CLEAN_TEMP_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 员工信息表列名・输出表头
    pub labels: ColumnLabels,
    /// 中间文件・结果文件的存放目录
    pub temp_dir: PathBuf,
    /// 临时文件保留时间（秒）
    pub max_temp_age_secs: u64,
    pub default_variant: ReportVariant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            labels: ColumnLabels::default(),
            temp_dir: PathBuf::from("temp_files"),
            max_temp_age_secs: 3600,
            default_variant: ReportVariant::WithShift,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CleanerError::Config("找不到用户主目录".into()))?;
        Ok(home.join(".config").join("attendance-clean").join("config.json"))
    }

    /// 临时目录（环境变量优先）
    pub fn temp_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(TEMP_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        self.temp_dir.clone()
    }

    pub fn set_temp_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.temp_dir = dir;
        self.save()
    }
}
