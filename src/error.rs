use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// BibTeX 文件读写错误
#[derive(Debug, Error)]
pub enum BibError {
    /// 语法错误
    #[error("BibTeX 解析失败 (第 {line} 行): {message}")]
    Parse { line: usize, message: String },

    /// 记录无法序列化
    #[error("记录 {key} 无法写成 BibTeX: {message}")]
    Format { key: String, message: String },

    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BibError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        BibError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// 浏览器驱动错误
#[derive(Debug, Error)]
pub enum DriverError {
    /// 等待元素超时
    #[error("等待元素 {locator} 超时 ({timeout:?})")]
    Timeout { locator: String, timeout: Duration },

    /// 元素不存在
    #[error("找不到元素: {locator}")]
    ElementNotFound { locator: String },

    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BoxError,
    },

    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    Script {
        #[source]
        source: BoxError,
    },

    /// 启动或连接浏览器失败
    #[error("浏览器启动失败: {message}")]
    Launch { message: String },
}

impl DriverError {
    pub fn script(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        DriverError::Script {
            source: Box::new(source),
        }
    }

    pub fn navigation(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DriverError::Navigation {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// 页面结构类的失败（超时、元素缺失）可以重试，其余都是浏览器本身出了问题
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DriverError::Timeout { .. } | DriverError::ElementNotFound { .. }
        )
    }
}

/// 单个标题搜索失败
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// 引用弹窗里的 BibTeX 片段无法解析
    #[error("BibTeX 片段无法解析: {0}")]
    Snippet(#[from] BibError),

    /// 重试次数用尽
    #[error("已尝试 {attempts} 次仍失败: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: DriverError,
    },
}

impl SearchError {
    /// 是否需要终止整个运行
    pub fn is_fatal(&self) -> bool {
        match self {
            SearchError::Driver(e) => !e.is_transient(),
            SearchError::Snippet(_) | SearchError::Exhausted { .. } => false,
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("请求间隔必须在 0 ~ 3600 秒之间，当前值: {0}")]
    InvalidDelay(f64),

    #[error("等待超时必须是正数，当前值: {0}")]
    InvalidTimeout(f64),

    #[error("最大尝试次数至少为 1")]
    ZeroRetries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_driver_errors_are_not_fatal() {
        let timeout = SearchError::from(DriverError::Timeout {
            locator: ".gs_ri".into(),
            timeout: Duration::from_secs(10),
        });
        assert!(!timeout.is_fatal());

        let missing = SearchError::from(DriverError::ElementNotFound {
            locator: "pre".into(),
        });
        assert!(!missing.is_fatal());
    }

    #[test]
    fn browser_failures_are_fatal() {
        let err = SearchError::from(DriverError::Launch {
            message: "no chrome".into(),
        });
        assert!(err.is_fatal());

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(SearchError::from(DriverError::script(io)).is_fatal());
    }

    #[test]
    fn parse_error_reports_line() {
        let err = BibError::parse(7, "缺少 '='");
        assert_eq!(err.to_string(), "BibTeX 解析失败 (第 7 行): 缺少 '='");
    }
}
