//! # Scholar Bib
//!
//! 读取已有的 BibTeX 文件，逐条用标题去 Google Scholar 检索，
//! 把"引用 → BibTeX"导出的记录写入新的 BibTeX 文件。
//!
//! ## 分层
//!
//! ### ① 基础设施层
//! - `infrastructure/` - `JsExecutor` 持有唯一的 page，只暴露执行 JS 的能力
//! - `browser/` - `BrowserDriver` 能力接口、chromiumoxide 实现与测试用假浏览器
//!
//! ### ② 业务能力层
//! - `bibtex/` - BibTeX 读写
//! - `models/` - 记录模型与标题清洗
//! - `services/` - `ScholarSearch` 检索能力、`UnresolvedWriter` 未找到清单
//!
//! ### ③ 流程层
//! - `workflow/` - 单条记录：清洗标题 → 检索 → 归类
//!
//! ### ④ 编排层
//! - `orchestrator/` - 遍历、节流、统计，浏览器生命周期与文件输出

pub mod bibtex;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use browser::{BrowserDriver, ChromeDriver, Locator};
pub use config::{BrowserOptions, Config};
pub use error::{BibError, ConfigError, DriverError, SearchError};
pub use models::{BibDatabase, BibRecord};
pub use orchestrator::{App, HarvestStats};
