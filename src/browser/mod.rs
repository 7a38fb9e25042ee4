//! 浏览器能力层
//!
//! 业务代码只依赖 [`BrowserDriver`] 这组窄接口：导航、等待元素、点击、读文本。
//! 真实实现是基于 chromiumoxide 的 [`ChromeDriver`]，测试使用 [`fake::FakeDriver`]。

pub mod chrome;
pub mod connection;
pub mod fake;
pub mod headless;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::error::DriverError;

pub use chrome::ChromeDriver;
pub use connection::connect_to_browser;
pub use headless::launch_browser;

/// 页面元素定位方式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS 选择器
    Css(String),
    /// 在第一个匹配 `scope` 的元素内部按 CSS 查找
    Within { scope: String, css: String },
    /// 可见文本包含指定内容的链接
    LinkText(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn within(scope: impl Into<String>, css: impl Into<String>) -> Self {
        Locator::Within {
            scope: scope.into(),
            css: css.into(),
        }
    }

    pub fn link_text(text: impl Into<String>) -> Self {
        Locator::LinkText(text.into())
    }

    /// 生成返回所有匹配元素数组的 JS 表达式，按文档顺序排列
    pub fn to_js(&self) -> String {
        match self {
            Locator::Css(css) => {
                format!("Array.from(document.querySelectorAll({}))", js_str(css))
            }
            Locator::Within { scope, css } => format!(
                "(() => {{ const s = document.querySelector({}); return s ? Array.from(s.querySelectorAll({})) : []; }})()",
                js_str(scope),
                js_str(css)
            ),
            Locator::LinkText(text) => format!(
                "Array.from(document.querySelectorAll('a')).filter(a => (a.innerText || a.textContent || '').includes({}))",
                js_str(text)
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "{}", css),
            Locator::Within { scope, css } => write!(f, "{} >> {}", scope, css),
            Locator::LinkText(text) => write!(f, "a:contains('{}')", text),
        }
    }
}

fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// 浏览器自动化能力
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// 打开指定 URL
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// 等待元素出现，超时返回 [`DriverError::Timeout`]；等待期间的脚本错误不中断等待
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), DriverError>;

    /// 当前页面上匹配的元素数量
    async fn count(&self, locator: &Locator) -> Result<usize, DriverError>;

    /// 点击第一个匹配的元素
    async fn click(&self, locator: &Locator) -> Result<(), DriverError>;

    /// 读取第一个匹配元素的文本
    async fn read_text(&self, locator: &Locator) -> Result<String, DriverError>;

    /// 释放浏览器资源
    async fn close(&mut self) -> Result<(), DriverError>;
}

/// 轮询 `count` 直到元素出现
///
/// 等待期间页面可能正在跳转（点击 BibTeX 链接后尤其如此），此时执行上下文被销毁，
/// 脚本报错只说明页面还没准备好，继续轮询；到 `limit` 仍未出现返回 [`DriverError::Timeout`]。
pub async fn poll_until_present<D>(
    driver: &D,
    locator: &Locator,
    limit: Duration,
    interval: Duration,
) -> Result<(), DriverError>
where
    D: BrowserDriver + ?Sized,
{
    let poll = async {
        loop {
            match driver.count(locator).await {
                Ok(n) if n > 0 => return,
                Ok(_) => {}
                Err(e) => debug!("等待 {} 时脚本执行失败，继续等待: {}", locator, e),
            }
            sleep(interval).await;
        }
    };

    timeout(limit, poll).await.map_err(|_| DriverError::Timeout {
        locator: locator.to_string(),
        timeout: limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeDriver, FakePage};
    use crate::services::selectors;

    #[test]
    fn selectors_are_quoted_as_js_strings() {
        let js = Locator::css("a[title=\"x\"]").to_js();
        assert_eq!(
            js,
            r#"Array.from(document.querySelectorAll("a[title=\"x\"]"))"#
        );
    }

    #[test]
    fn scoped_locator_searches_inside_first_scope_match() {
        let js = Locator::within(".gs_ri", ".gs_or_cit").to_js();
        assert!(js.contains(r#"document.querySelector(".gs_ri")"#));
        assert!(js.contains(r#"s.querySelectorAll(".gs_or_cit")"#));
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Locator::link_text("BibTeX").to_string(), "a:contains('BibTeX')");
        assert_eq!(Locator::within("a", "b").to_string(), "a >> b");
    }

    #[tokio::test(start_paused = true)]
    async fn script_errors_while_waiting_do_not_end_the_wait() {
        let driver = FakeDriver::new()
            .with_page("T", FakePage::Found("@misc{k}".into()))
            .with_script_hiccups("T", 2);
        driver.navigate("x?q=T").await.unwrap();
        driver.click(&selectors::first_cite_button()).await.unwrap();
        driver.click(&selectors::bibtex_link()).await.unwrap();

        let body = selectors::bibtex_body();
        poll_until_present(&driver, &body, Duration::from_secs(5), Duration::from_millis(100))
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn endless_script_errors_end_as_a_timeout() {
        let driver = FakeDriver::new()
            .with_page("T", FakePage::Found("@misc{k}".into()))
            .with_script_hiccups("T", usize::MAX);
        driver.navigate("x?q=T").await.unwrap();
        driver.click(&selectors::first_cite_button()).await.unwrap();
        driver.click(&selectors::bibtex_link()).await.unwrap();

        let err = poll_until_present(
            &driver,
            &selectors::bibtex_body(),
            Duration::from_secs(1),
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DriverError::Timeout { .. }), "{err}");
        assert!(err.is_transient());
    }
}
