use attendance_cleaner::{cli, config, error, logging, pipeline, rewrite, store, transform};
use attendance_common::TransformProfile;
use clap::Parser;
use cli::{Cli, Commands, LayoutArgs};
use config::Config;
use error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;
    let config = Config::load()?;

    match cli.command {
        Commands::Transform { input, reference, output, layout } => {
            println!("📋 attendance-clean - 月报整形\n");

            let profile = profile_for(&layout, &config);
            let shift_column = layout.shift_column();
            let transformer = transform::WorkbookTransformer::new(profile, config.labels.clone());

            println!("[1/1] 整形・匹配员工信息中...");
            let report = transformer.transform(&input, &reference, shift_column.as_deref(), &output)?;
            print_transform_summary(&report);
            println!("✔ 已保存: {}", report.output_path.display());
        }

        Commands::Rewrite { input, output, protected_columns } => {
            println!("🧹 attendance-clean - 状态标注清理\n");

            let rewriter = rewrite::CellRewriter::new(protected_columns);
            let report = rewriter.rewrite(&input, &output)?;
            print_rewrite_summary(&report);
            println!("✔ 已保存: {}", report.output_path.display());
        }

        Commands::Run { input, reference, output, layout } => {
            println!("🚀 attendance-clean - 一并处理\n");

            let profile = profile_for(&layout, &config);
            let shift_column = layout.shift_column();
            let mut runner = pipeline::Pipeline::from_config(&config);

            println!("- 整形・匹配员工信息・清理状态标注中...");
            let outcome = runner.run(&pipeline::PipelineRequest {
                report_path: &input,
                reference_path: &reference,
                shift_column: shift_column.as_deref(),
                profile,
                output_path: output.as_deref(),
            })?;

            print_transform_summary(&outcome.transform);
            print_rewrite_summary(&outcome.rewrite);
            println!("\n✅ 完成: {}", outcome.output_path.display());
            println!("  文件ID: {}", outcome.file_id);

            runner.clean_temp_files()?;
        }

        Commands::Clean { max_age } => {
            let dir = config.temp_dir();
            let max_age = std::time::Duration::from_secs(max_age.unwrap_or(config.max_temp_age_secs));
            let removed = store::clean_temp_files(&dir, max_age)?;
            println!("✔ 已删除 {} 个过期文件: {}", removed, dir.display());
        }

        Commands::Config { set_temp_dir, show } => {
            let mut config = config;

            if let Some(dir) = set_temp_dir {
                config.set_temp_dir(dir)?;
                println!("✔ 已设置临时目录");
            }

            if show {
                println!("设置:");
                println!("  临时目录: {}", config.temp_dir().display());
                println!("  保留时间: {}秒", config.max_temp_age_secs);
                println!("  默认版式: {}", config.default_variant);
                println!(
                    "  列名: {} / {} / {} / {}",
                    config.labels.name,
                    config.labels.employee_id,
                    config.labels.department,
                    config.labels.shift
                );
            }
        }
    }

    Ok(())
}

fn profile_for(layout: &LayoutArgs, config: &Config) -> TransformProfile {
    let mut profile = TransformProfile::for_variant(layout.variant.unwrap_or(config.default_variant));
    if let Some(column) = layout.start_column {
        profile.data_start_column = usize::from(column);
    }
    profile
}

fn print_transform_summary(report: &transform::TransformReport) {
    for sheet in &report.sheets {
        match &sheet.result {
            transform::SheetResult::Processed { rows, matched } => {
                println!("  ✔ {}: {}行，匹配 {} 条", sheet.name, rows, matched);
            }
            transform::SheetResult::Skipped(reason) => {
                println!("  - {}: 已跳过（{}）", sheet.name, reason);
            }
        }
    }
}

fn print_rewrite_summary(report: &rewrite::RewriteReport) {
    for sheet in &report.sheets {
        if sheet.skipped_hidden {
            println!("  - {}: 隐藏工作表，已跳过", sheet.name);
        } else {
            println!("  ✔ {}: 处理 {} 个单元格", sheet.name, sheet.modified);
        }
    }
}
