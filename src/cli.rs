use std::path::PathBuf;

use clap::Parser;

use crate::config::{BrowserOptions, Config, DEFAULT_USER_AGENT};
use crate::error::ConfigError;

/// 根据已有 BibTeX 文件中的标题，从 Google Scholar 抓取 BibTeX 记录
#[derive(Parser, Debug)]
#[command(name = "scholar-bib", version, about)]
pub struct Cli {
    /// 输入 BibTeX 文件
    #[arg(long, default_value = "reference.bib")]
    pub input: PathBuf,

    /// 输出 BibTeX 文件
    #[arg(long, default_value = "google.bib")]
    pub output: PathBuf,

    /// 两次检索之间的基础间隔（秒）
    #[arg(long, default_value_t = 3.0)]
    pub delay: f64,

    /// 代理地址（可选）
    #[arg(long, env = "SCHOLAR_PROXY")]
    pub proxy: Option<String>,

    /// 每个标题的最多尝试次数
    #[arg(long, default_value_t = 3)]
    pub max_retries: usize,

    /// 等待页面元素的超时（秒）
    #[arg(long, default_value_t = 10.0)]
    pub timeout: f64,

    /// 以无头模式运行浏览器
    #[arg(long)]
    pub headless: bool,

    /// 浏览器可执行文件路径
    #[arg(long, env = "CHROME_PATH")]
    pub chrome: Option<PathBuf>,

    /// 连接已在该调试端口运行的浏览器
    #[arg(long, env = "BROWSER_DEBUG_PORT")]
    pub debug_port: Option<u16>,

    /// 浏览器 User-Agent
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Google Scholar 地址（镜像站）
    #[arg(long, env = "SCHOLAR_BASE_URL", default_value = "https://scholar.google.com")]
    pub base_url: String,

    /// 把未找到的标题写入该文件
    #[arg(long)]
    pub unresolved: Option<PathBuf>,

    /// 显示调试日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let defaults = Config::default();
        let config = Config {
            input_path: cli.input,
            output_path: cli.output,
            unresolved_path: cli.unresolved,
            delay: Config::delay_from_secs(cli.delay)?,
            max_retries: cli.max_retries,
            wait_timeout: Config::timeout_from_secs(cli.timeout)?,
            retry_backoff: defaults.retry_backoff,
            base_url: cli.base_url.trim_end_matches('/').to_string(),
            browser: BrowserOptions {
                headless: cli.headless,
                proxy: cli.proxy.filter(|p| !p.trim().is_empty()),
                user_agent: cli.user_agent,
                executable: cli.chrome,
                debug_port: cli.debug_port,
                ..defaults.browser
            },
            verbose_logging: cli.verbose,
        };
        config.validate()?;
        Ok(config)
    }
}
