//! 单条目处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 清洗标题，没有标题则跳过
//! 2. Google Scholar 检索
//! 3. 归类为 找到 / 未找到 / 失败

use tracing::{error, info, warn};

use crate::browser::BrowserDriver;
use crate::error::SearchError;
use crate::models::{extract_title, BibRecord};
use crate::services::ScholarSearch;
use crate::utils::logging::truncate_text;
use crate::workflow::EntryCtx;

/// 单条目处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// 没有可用标题
    Skipped,
    Found(BibRecord),
    NotFound { title: String },
    /// 页面结构类失败，已重试仍不成功
    Failed { title: String, reason: String },
}

/// 单条目处理流程
///
/// 不持有浏览器，只依赖检索能力
pub struct EntryFlow {
    search: ScholarSearch,
}

impl EntryFlow {
    pub fn new(search: ScholarSearch) -> Self {
        Self { search }
    }

    /// 处理一条输入记录
    ///
    /// 只有浏览器本身出错时返回 `Err`，其余情况都归入 [`EntryOutcome`]
    pub async fn run<D>(
        &self,
        driver: &D,
        record: &BibRecord,
        ctx: &EntryCtx,
    ) -> Result<EntryOutcome, SearchError>
    where
        D: BrowserDriver + ?Sized,
    {
        let title = match extract_title(record) {
            Some(title) => title,
            None => {
                warn!("{} 跳过: 没有标题 ({})", ctx, record.key);
                return Ok(EntryOutcome::Skipped);
            }
        };

        info!("{} 🔍 {}", ctx, truncate_text(&title, 60));

        match self.search.search(driver, &title).await {
            Ok(Some(found)) => {
                info!("{} ✓ 已找到: {}", ctx, found.key);
                Ok(EntryOutcome::Found(found))
            }
            Ok(None) => {
                info!("{} ✗ Google Scholar 上未找到", ctx);
                Ok(EntryOutcome::NotFound { title })
            }
            Err(e) if e.is_fatal() => {
                error!("{} ❌ 浏览器异常: {}", ctx, e);
                Err(e)
            }
            Err(e) => {
                warn!("{} ⚠️ 检索失败: {}", ctx, e);
                Ok(EntryOutcome::Failed {
                    title,
                    reason: e.to_string(),
                })
            }
        }
    }
}
