//! 应用入口 - 编排层
//!
//! 负责资源的获取与释放：
//! 1. 读取输入文件（失败直接退出，不启动浏览器）
//! 2. 启动或连接浏览器
//! 3. 批量检索
//! 4. 无论检索是否中途出错，先关闭浏览器，再写输出文件和统计

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::bibtex;
use crate::browser::{self, BrowserDriver, ChromeDriver};
use crate::config::Config;
use crate::error::DriverError;
use crate::models::BibDatabase;
use crate::orchestrator::harvester::{HarvestStats, Harvester};
use crate::services::UnresolvedWriter;
use crate::utils::logging::{log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<HarvestStats> {
        log_startup(&self.config);

        let input = bibtex::read_file(&self.config.input_path)
            .await
            .with_context(|| format!("无法加载输入文件: {}", self.config.input_path.display()))?;
        if input.is_empty() {
            warn!("⚠️ 输入文件中没有任何记录");
        }

        let driver = self.open_browser().await.context("浏览器启动失败")?;
        self.run_with_driver(&input, driver).await
    }

    async fn open_browser(&self) -> Result<ChromeDriver, DriverError> {
        match self.config.browser.debug_port {
            Some(port) => browser::connect_to_browser(port).await,
            None => browser::launch_browser(&self.config.browser).await,
        }
    }

    /// 使用已经打开的浏览器会话处理输入，并负责关闭它
    pub async fn run_with_driver<D>(&self, input: &BibDatabase, mut driver: D) -> Result<HarvestStats>
    where
        D: BrowserDriver,
    {
        let harvester = Harvester::new(&self.config);
        let report = harvester.run(&driver, input).await;

        if let Err(e) = driver.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        info!("浏览器已关闭");

        bibtex::write_file(&self.config.output_path, &report.found)
            .await
            .with_context(|| format!("无法写入输出文件: {}", self.config.output_path.display()))?;

        if let Some(path) = &self.config.unresolved_path {
            UnresolvedWriter::with_path(path).write(&report.unresolved)?;
        }

        print_final_stats(&report.stats, &self.config);

        match report.fatal {
            Some(e) => Err(anyhow::Error::new(e).context(format!(
                "检索在第 {}/{} 条时中止，已保存 {} 条结果",
                report.stats.processed, report.stats.total, report.stats.found
            ))),
            None => Ok(report.stats),
        }
    }
}
