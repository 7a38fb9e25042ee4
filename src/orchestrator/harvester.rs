//! 批量检索 - 编排层
//!
//! 顺序遍历输入记录，逐条检索并汇总。浏览器由调用方持有，这里只借用。

use tracing::error;

use crate::browser::BrowserDriver;
use crate::config::Config;
use crate::error::SearchError;
use crate::models::{extract_title, BibDatabase};
use crate::orchestrator::pacing::Pacer;
use crate::services::{ScholarSearch, Unresolved, UnresolvedReason};
use crate::workflow::{EntryCtx, EntryFlow, EntryOutcome};

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestStats {
    /// 输入条目总数
    pub total: usize,
    /// 实际遍历到的条目数（含跳过）
    pub processed: usize,
    pub found: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub failed: usize,
}

/// 一次运行的结果
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub found: BibDatabase,
    pub stats: HarvestStats,
    pub unresolved: Vec<Unresolved>,
    /// 导致提前结束的浏览器错误
    pub fatal: Option<SearchError>,
}

pub struct Harvester {
    flow: EntryFlow,
    pacer: Pacer,
}

impl Harvester {
    pub fn new(config: &Config) -> Self {
        Self {
            flow: EntryFlow::new(ScholarSearch::new(config)),
            pacer: Pacer::new(config.delay),
        }
    }

    /// 依次处理所有输入记录
    ///
    /// 浏览器错误会中止循环并记录在 `fatal` 中，已取得的结果保留
    pub async fn run<D>(&self, driver: &D, input: &BibDatabase) -> HarvestReport
    where
        D: BrowserDriver + ?Sized,
    {
        let total = input.len();
        let mut report = HarvestReport {
            stats: HarvestStats {
                total,
                ..HarvestStats::default()
            },
            ..HarvestReport::default()
        };

        for (i, record) in input.iter().enumerate() {
            let ctx = EntryCtx::new(i + 1, total);
            report.stats.processed += 1;

            match self.flow.run(driver, record, &ctx).await {
                Ok(EntryOutcome::Skipped) => {
                    report.stats.skipped += 1;
                    continue;
                }
                Ok(EntryOutcome::Found(found)) => {
                    report.stats.found += 1;
                    report.found.push(found);
                }
                Ok(EntryOutcome::NotFound { title }) => {
                    report.stats.not_found += 1;
                    report.unresolved.push(Unresolved {
                        index: ctx.index,
                        title,
                        reason: UnresolvedReason::NotFound,
                    });
                }
                Ok(EntryOutcome::Failed { title, reason }) => {
                    report.stats.failed += 1;
                    report.unresolved.push(Unresolved {
                        index: ctx.index,
                        title,
                        reason: UnresolvedReason::Failed(reason),
                    });
                }
                Err(e) => {
                    error!("{} 浏览器不可用，停止处理剩余条目", ctx);
                    report.stats.failed += 1;
                    report.unresolved.push(Unresolved {
                        index: ctx.index,
                        title: extract_title(record).unwrap_or_else(|| record.key.clone()),
                        reason: UnresolvedReason::Failed(e.to_string()),
                    });
                    report.fatal = Some(e);
                    break;
                }
            }

            if !ctx.is_last() {
                self.pacer.pause().await;
            }
        }

        report
    }
}
