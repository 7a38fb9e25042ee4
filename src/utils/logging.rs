//! 日志工具模块
//!
//! 提供日志初始化和统计输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::HarvestStats;

/// 初始化 tracing
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。重复调用无副作用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scholar_bib={},warn", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📄 输入: {}", config.input_path.display());
    info!("💾 输出: {}", config.output_path.display());
    info!(
        "⏱️ 请求间隔: {:.1}s (随机放大至 1.5 倍), 最多尝试 {} 次",
        config.delay.as_secs_f64(),
        config.max_retries
    );
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &HarvestStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "✅ 共获取 {} 条记录 / 输入 {} 条",
        stats.found, stats.total
    );
    info!("📋 已处理: {}", stats.processed);
    info!("⏭️ 无标题跳过: {}", stats.skipped);
    info!("✗ 未找到: {}", stats.not_found);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", config.output_path.display());
    if let Some(path) = &config.unresolved_path {
        info!("未找到清单: {}", path.display());
    }
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
