use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// 默认 User-Agent，模拟普通桌面浏览器
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 请求间隔上限
pub const MAX_DELAY: Duration = Duration::from_secs(3600);

/// 浏览器启动参数
///
/// 启动时一次性确定，之后只读
#[derive(Clone, Debug)]
pub struct BrowserOptions {
    /// 是否无头运行
    pub headless: bool,
    /// 代理地址，如 `http://127.0.0.1:7890`
    pub proxy: Option<String>,
    pub user_agent: String,
    pub window_size: (u32, u32),
    /// 浏览器可执行文件路径，缺省时自动查找
    pub executable: Option<PathBuf>,
    /// 设置后连接已在该调试端口运行的浏览器，而不是新启动一个
    pub debug_port: Option<u16>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: false,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            window_size: (1920, 1080),
            executable: None,
            debug_port: None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 输入 BibTeX 文件
    pub input_path: PathBuf,
    /// 输出 BibTeX 文件
    pub output_path: PathBuf,
    /// 未找到的标题清单，`None` 表示不写
    pub unresolved_path: Option<PathBuf>,
    /// 两次检索之间的基础间隔，实际间隔为其 1.0 ~ 1.5 倍
    pub delay: Duration,
    /// 每个标题最多尝试次数
    pub max_retries: usize,
    /// 等待页面元素出现的超时
    pub wait_timeout: Duration,
    /// 两次尝试之间的等待
    pub retry_backoff: Duration,
    /// Google Scholar 地址，可替换为镜像站
    pub base_url: String,
    pub browser: BrowserOptions,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("reference.bib"),
            output_path: PathBuf::from("google.bib"),
            unresolved_path: None,
            delay: Duration::from_secs(3),
            max_retries: 3,
            wait_timeout: Duration::from_secs(10),
            retry_backoff: Duration::from_secs(2),
            base_url: "https://scholar.google.com".to_string(),
            browser: BrowserOptions::default(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 秒数转换为间隔，拒绝负数、非有限值和超过 [`MAX_DELAY`] 的值
    pub fn delay_from_secs(secs: f64) -> Result<Duration, ConfigError> {
        match Duration::try_from_secs_f64(secs) {
            Ok(d) if d <= MAX_DELAY => Ok(d),
            _ => Err(ConfigError::InvalidDelay(secs)),
        }
    }

    pub fn timeout_from_secs(secs: f64) -> Result<Duration, ConfigError> {
        match Duration::try_from_secs_f64(secs) {
            Ok(d) if !d.is_zero() => Ok(d),
            _ => Err(ConfigError::InvalidTimeout(secs)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.delay > MAX_DELAY {
            return Err(ConfigError::InvalidDelay(self.delay.as_secs_f64()));
        }
        if self.wait_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(0.0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = Config::default();
        assert_eq!(config.input_path, PathBuf::from("reference.bib"));
        assert_eq!(config.output_path, PathBuf::from("google.bib"));
        assert_eq!(config.delay, Duration::from_secs(3));
        assert!(config.browser.proxy.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_delays() {
        assert!(Config::delay_from_secs(-1.0).is_err());
        assert!(Config::delay_from_secs(f64::NAN).is_err());
        assert_eq!(Config::delay_from_secs(0.0).unwrap(), Duration::ZERO);
        assert_eq!(
            Config::delay_from_secs(2.5).unwrap(),
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn caps_the_delay() {
        assert!(Config::delay_from_secs(1.5e19).is_err());
        assert!(Config::delay_from_secs(3601.0).is_err());
        assert_eq!(Config::delay_from_secs(3600.0).unwrap(), MAX_DELAY);

        let config = Config {
            delay: Duration::from_secs(7200),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDelay(_))));
    }

    #[test]
    fn rejects_zero_timeout_and_retries() {
        assert!(Config::timeout_from_secs(0.0).is_err());
        let config = Config {
            max_retries: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroRetries)));
    }
}
