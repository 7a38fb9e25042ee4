//! 未找到清单写入服务 - 业务能力层
//!
//! 只负责把没拿到 BibTeX 的标题写进文本文件，方便人工补录

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

/// 没拿到 BibTeX 的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    NotFound,
    Failed(String),
}

/// 一条未找到记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// 输入文件中的序号（从 1 开始）
    pub index: usize,
    pub title: String,
    pub reason: UnresolvedReason,
}

/// 未找到清单写入服务
pub struct UnresolvedWriter {
    path: PathBuf,
}

impl UnresolvedWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 覆盖写入整份清单
    pub fn write(&self, entries: &[Unresolved]) -> Result<()> {
        debug!("写入 {} 条未找到记录到 {}", entries.len(), self.path.display());

        let mut content = String::new();
        for entry in entries {
            let reason = match &entry.reason {
                UnresolvedReason::NotFound => "未找到".to_string(),
                UnresolvedReason::Failed(e) => format!("失败: {}", e),
            };
            let _ = writeln!(content, "#{} | {} | {}", entry.index, entry.title, reason);
        }

        fs::write(&self.path, content)
            .with_context(|| format!("无法写入未找到清单: {}", self.path.display()))
    }
}
