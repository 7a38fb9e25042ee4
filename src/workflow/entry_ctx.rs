//! 条目处理上下文
//!
//! 封装"我正在处理输入文件里的第几条"这一信息

use std::fmt::Display;

#[derive(Debug, Clone, Copy)]
pub struct EntryCtx {
    /// 条目序号（从 1 开始）
    pub index: usize,
    /// 输入条目总数
    pub total: usize,
}

impl EntryCtx {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    pub fn is_last(&self) -> bool {
        self.index >= self.total
    }
}

impl Display for EntryCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[条目 {}/{}]", self.index, self.total)
    }
}
