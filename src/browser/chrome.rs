//! 基于 chromiumoxide 的 [`BrowserDriver`] 实现

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Browser;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{poll_until_present, BrowserDriver, Locator};
use crate::error::DriverError;
use crate::infrastructure::JsExecutor;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Deserialize)]
struct TextProbe {
    found: bool,
    #[serde(default)]
    text: String,
}

/// 浏览器会话
///
/// 持有 Browser、事件处理任务和唯一的 page。
/// `owns_process` 为 true 时 close 会关闭整个浏览器进程，否则只关闭自己打开的标签页。
pub struct ChromeDriver {
    browser: Browser,
    executor: JsExecutor,
    handler: JoinHandle<()>,
    owns_process: bool,
}

impl ChromeDriver {
    pub(crate) fn new(
        browser: Browser,
        executor: JsExecutor,
        handler: JoinHandle<()>,
        owns_process: bool,
    ) -> Self {
        Self {
            browser,
            executor,
            handler,
            owns_process,
        }
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        debug!("导航到: {}", url);
        self.executor.goto(url).await
    }

    async fn wait_for(&self, locator: &Locator, limit: Duration) -> Result<(), DriverError> {
        poll_until_present(self, locator, limit, POLL_INTERVAL).await
    }

    async fn count(&self, locator: &Locator) -> Result<usize, DriverError> {
        self.executor
            .eval_as::<usize>(format!("{}.length", locator.to_js()))
            .await
    }

    async fn click(&self, locator: &Locator) -> Result<(), DriverError> {
        let js = format!(
            "(() => {{ const el = {}[0]; if (!el) return false; el.click(); return true; }})()",
            locator.to_js()
        );
        if self.executor.eval_as::<bool>(js).await? {
            debug!("已点击: {}", locator);
            Ok(())
        } else {
            Err(DriverError::ElementNotFound {
                locator: locator.to_string(),
            })
        }
    }

    async fn read_text(&self, locator: &Locator) -> Result<String, DriverError> {
        let js = format!(
            "(() => {{ const el = {}[0]; return el ? {{ found: true, text: el.innerText || el.textContent || '' }} : {{ found: false }}; }})()",
            locator.to_js()
        );
        let probe: TextProbe = self.executor.eval_as(js).await?;
        if probe.found {
            Ok(probe.text)
        } else {
            Err(DriverError::ElementNotFound {
                locator: locator.to_string(),
            })
        }
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if self.owns_process {
            debug!("关闭浏览器进程");
            self.browser.close().await.map_err(DriverError::script)?;
            if let Err(e) = self.browser.wait().await {
                warn!("等待浏览器进程退出失败: {}", e);
            }
        } else {
            debug!("关闭标签页，保留外部浏览器");
            self.executor
                .page()
                .clone()
                .close()
                .await
                .map_err(DriverError::script)?;
        }
        self.handler.abort();
        Ok(())
    }
}
