//! 内存中的假浏览器，用于测试检索流程
//!
//! 按标题预设页面行为：
//! - `FakePage::Found` 正常给出 BibTeX
//! - `FakePage::NoResults` 结果容器始终不出现
//! - `FakePage::MissingCite` / `FakePage::MissingBibtexLink` 页面结构缺失
//! - `FakePage::Broken` 导航失败（浏览器本身出错）
//!
//! `with_script_hiccups` 模拟点击 BibTeX 链接后页面跳转期间脚本执行失败

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::{poll_until_present, BrowserDriver, Locator};
use crate::error::DriverError;
use crate::services::selectors;

/// 某个标题对应的页面行为
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakePage {
    Found(String),
    NoResults,
    MissingCite,
    MissingBibtexLink,
    Broken,
}

#[derive(Debug, Default)]
struct FakeState {
    current: Option<FakePage>,
    cite_open: bool,
    bibtex_open: bool,
    navigations: Vec<String>,
    flaky: HashMap<String, usize>,
    hiccups: HashMap<String, usize>,
    current_title: String,
    /// 剩余会失败的 count 次数
    reloading: usize,
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 假浏览器
#[derive(Debug, Default)]
pub struct FakeDriver {
    pages: HashMap<String, FakePage>,
    state: Mutex<FakeState>,
    closed: Arc<AtomicBool>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为标题预设页面，未预设的标题视为没有结果
    pub fn with_page(mut self, title: impl Into<String>, page: FakePage) -> Self {
        self.pages.insert(title.into(), page);
        self
    }

    /// 该标题前 `failures` 次访问时结果容器不出现
    pub fn with_flaky(self, title: impl Into<String>, failures: usize) -> Self {
        self.lock().flaky.insert(title.into(), failures);
        self
    }

    /// 点击该标题的 BibTeX 链接后，接下来 `times` 次 count 返回脚本错误
    pub fn with_script_hiccups(self, title: impl Into<String>, times: usize) -> Self {
        self.lock().hiccups.insert(title.into(), times);
        self
    }

    /// 所有导航过的 URL
    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    /// 会话关闭标志，driver 被移走后仍可查询
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_present(&self, locator: &Locator) -> bool {
        let state = self.lock();
        let page = match &state.current {
            Some(page) => page,
            None => return false,
        };
        let has_results = !matches!(page, FakePage::NoResults | FakePage::Broken);

        if *locator == selectors::results() {
            has_results
        } else if *locator == selectors::first_cite_button() {
            has_results && *page != FakePage::MissingCite
        } else if *locator == selectors::cite_popup() {
            state.cite_open
        } else if *locator == selectors::bibtex_link() {
            state.cite_open && *page != FakePage::MissingBibtexLink
        } else if *locator == selectors::bibtex_body() {
            state.bibtex_open
        } else {
            false
        }
    }
}

/// 从检索 URL 中还原标题
fn title_from_url(url: &str) -> String {
    url.split_once("q=")
        .map(|(_, q)| q.replace('+', " "))
        .unwrap_or_default()
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let title = title_from_url(url);
        let mut page = self
            .pages
            .get(&title)
            .cloned()
            .unwrap_or(FakePage::NoResults);

        let mut state = self.lock();
        state.navigations.push(url.to_string());
        state.cite_open = false;
        state.bibtex_open = false;
        state.reloading = 0;
        state.current_title = title.clone();

        if page == FakePage::Broken {
            state.current = None;
            let err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "browser gone");
            return Err(DriverError::navigation(url, err));
        }
        if let Some(remaining) = state.flaky.get_mut(&title) {
            if *remaining > 0 {
                *remaining -= 1;
                page = FakePage::NoResults;
            }
        }
        state.current = Some(page);
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), DriverError> {
        poll_until_present(self, locator, timeout, POLL_INTERVAL).await
    }

    async fn count(&self, locator: &Locator) -> Result<usize, DriverError> {
        {
            let mut state = self.lock();
            if state.reloading > 0 {
                state.reloading -= 1;
                let err = std::io::Error::other("Execution context was destroyed");
                return Err(DriverError::script(err));
            }
        }
        Ok(usize::from(self.is_present(locator)))
    }

    async fn click(&self, locator: &Locator) -> Result<(), DriverError> {
        if !self.is_present(locator) {
            return Err(DriverError::ElementNotFound {
                locator: locator.to_string(),
            });
        }
        let mut state = self.lock();
        if *locator == selectors::first_cite_button() {
            state.cite_open = true;
        } else if *locator == selectors::bibtex_link() {
            state.bibtex_open = true;
            let title = state.current_title.clone();
            if let Some(times) = state.hiccups.remove(&title) {
                state.reloading = times;
            }
        }
        Ok(())
    }

    async fn read_text(&self, locator: &Locator) -> Result<String, DriverError> {
        if !self.is_present(locator) {
            return Err(DriverError::ElementNotFound {
                locator: locator.to_string(),
            });
        }
        match &self.lock().current {
            Some(FakePage::Found(bibtex)) if *locator == selectors::bibtex_body() => {
                Ok(bibtex.clone())
            }
            _ => Ok(String::new()),
        }
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_title_from_search_url() {
        assert_eq!(
            title_from_url("https://scholar.google.com/scholar?q=Deep+Learning"),
            "Deep Learning"
        );
    }

    #[tokio::test]
    async fn count_outside_a_wait_surfaces_script_errors() {
        let driver = FakeDriver::new()
            .with_page("T", FakePage::Found("@misc{k}".into()))
            .with_script_hiccups("T", 1);
        driver.navigate("x?q=T").await.unwrap();
        driver.click(&selectors::first_cite_button()).await.unwrap();
        driver.click(&selectors::bibtex_link()).await.unwrap();

        let err = driver.count(&selectors::bibtex_body()).await.unwrap_err();
        assert!(matches!(err, DriverError::Script { .. }));
        assert_eq!(driver.count(&selectors::bibtex_body()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn walks_through_the_citation_panel() {
        let driver = FakeDriver::new().with_page("T", FakePage::Found("@misc{k}".into()));
        driver.navigate("x?q=T").await.unwrap();

        assert!(driver.wait_for(&selectors::cite_popup(), Duration::ZERO).await.is_err());
        driver.click(&selectors::first_cite_button()).await.unwrap();
        driver.click(&selectors::bibtex_link()).await.unwrap();
        assert_eq!(
            driver.read_text(&selectors::bibtex_body()).await.unwrap(),
            "@misc{k}"
        );
    }
}
