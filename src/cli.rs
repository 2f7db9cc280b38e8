use attendance_common::ReportVariant;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "attendance-clean")]
#[command(about = "考勤月报清洗工具：匹配员工信息并清理状态标注", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 第一阶段：整形月报并匹配员工信息
    Transform {
        /// 原始月报文件
        #[arg(required = true)]
        input: PathBuf,

        /// 员工信息（班次）文件
        #[arg(required = true)]
        reference: PathBuf,

        /// 输出文件
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// 第二阶段：清理已整形文件中的状态标注
    Rewrite {
        /// 第一阶段的输出文件
        #[arg(required = true)]
        input: PathBuf,

        /// 输出文件
        #[arg(short, long)]
        output: PathBuf,

        /// 不处理的前导列数（姓名・员工ID・部门）
        #[arg(long, default_value = "3")]
        protected_columns: usize,
    },

    /// 两个阶段一并执行
    Run {
        /// 原始月报文件
        #[arg(required = true)]
        input: PathBuf,

        /// 员工信息（班次）文件
        #[arg(required = true)]
        reference: PathBuf,

        /// 输出文件（默认: 临时目录/<班次列名>原始数据.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// 清理临时目录中的过期文件
    Clean {
        /// 保留时间（秒，默认使用设置值）
        #[arg(long)]
        max_age: Option<u64>,
    },

    /// 显示/修改设置
    Config {
        /// 设置临时目录
        #[arg(long)]
        set_temp_dir: Option<PathBuf>,

        /// 显示设置
        #[arg(long)]
        show: bool,
    },
}

/// 月报版式相关参数
#[derive(clap::Args, Clone, Debug)]
pub struct LayoutArgs {
    /// 月报版式 (with-shift/without-shift)
    #[arg(long)]
    pub variant: Option<ReportVariant>,

    /// 数据起始列（1起，覆盖版式默认值）
    #[arg(long, value_parser = clap::value_parser!(u16).range(2..))]
    pub start_column: Option<u16>,

    /// 班次月份（1-12，对应「N月班次」列）
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12), conflicts_with = "shift_column")]
    pub month: Option<u32>,

    /// 员工信息表中的班次列名
    #[arg(long)]
    pub shift_column: Option<String>,
}

impl LayoutArgs {
    /// 班次列名（--shift-column 优先，其次由 --month 生成）
    pub fn shift_column(&self) -> Option<String> {
        self.shift_column
            .clone()
            .or_else(|| self.month.and_then(attendance_common::shift_column_for_month))
    }
}
