use chromiumoxide::Browser;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::ChromeDriver;
use crate::error::DriverError;
use crate::infrastructure::JsExecutor;

/// 连接到已经以 `--remote-debugging-port` 启动的浏览器，并新开一个标签页
///
/// 适合需要先手动通过验证码的场景；关闭会话时只关闭这个标签页
pub async fn connect_to_browser(port: u16) -> Result<ChromeDriver, DriverError> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        DriverError::Launch {
            message: format!("无法连接到 {}: {}", browser_url, e),
        }
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        DriverError::Launch {
            message: e.to_string(),
        }
    })?;
    info!("✓ 已在外部浏览器中打开新标签页");

    Ok(ChromeDriver::new(
        browser,
        JsExecutor::new(page),
        handler_task,
        false,
    ))
}
