use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::ChromeDriver;
use crate::config::BrowserOptions;
use crate::error::DriverError;
use crate::infrastructure::JsExecutor;

/// 组装 Chrome 启动参数
pub fn launch_args(options: &BrowserOptions) -> Vec<String> {
    let mut args = vec![
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        format!(
            "--window-size={},{}",
            options.window_size.0, options.window_size.1
        ),
        format!("--user-agent={}", options.user_agent),
    ];
    if let Some(proxy) = &options.proxy {
        args.push(format!("--proxy-server={}", proxy));
    }
    args
}

/// 启动浏览器并打开一个空白页
///
/// 返回的会话拥有浏览器进程，调用方负责 [`close`](super::BrowserDriver::close)
pub async fn launch_browser(options: &BrowserOptions) -> Result<ChromeDriver, DriverError> {
    info!("🚀 启动浏览器...");
    if let Some(proxy) = &options.proxy {
        info!("🌐 使用代理: {}", redact_proxy(proxy));
    }

    let mut builder = BrowserConfig::builder().args(launch_args(options));
    builder = if options.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = &options.executable {
        debug!("浏览器路径: {}", path.display());
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        DriverError::Launch { message: e }
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        DriverError::Launch {
            message: e.to_string(),
        }
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        DriverError::Launch {
            message: e.to_string(),
        }
    })?;

    info!("✅ 浏览器已就绪");
    Ok(ChromeDriver::new(
        browser,
        JsExecutor::new(page),
        handler_task,
        true,
    ))
}

/// 隐藏代理地址中的账号密码，只用于日志
pub fn redact_proxy(proxy: &str) -> String {
    match (proxy.find("://"), proxy.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &proxy[..scheme_end], &proxy[at + 1..])
        }
        (None, Some(at)) => format!("***@{}", &proxy[at + 1..]),
        _ => proxy.to_string(),
    }
}
