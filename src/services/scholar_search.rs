//! Google Scholar 检索服务 - 业务能力层
//!
//! 只负责"用一个标题换一条 BibTeX"，不关心批量流程

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::bibtex;
use crate::browser::BrowserDriver;
use crate::config::Config;
use crate::error::{DriverError, SearchError};
use crate::models::BibRecord;
use crate::services::selectors;

/// 单次尝试的结果
enum Attempt {
    /// 流程走完，可能解析出记录
    Done(Option<BibRecord>),
    /// 结果容器在超时内没有出现
    NoResults(DriverError),
}

/// Google Scholar 检索服务
///
/// 重试策略：
/// - 等待超时、按钮或链接缺失视为暂时性问题，最多尝试 `max_retries` 次
/// - 所有尝试都等不到结果容器，视为"没有结果"
/// - 引用片段解析失败不重试
/// - 浏览器本身的错误（导航、等待之外的脚本执行）直接返回；等待元素期间的脚本错误由 `wait_for` 吸收
pub struct ScholarSearch {
    base_url: String,
    max_retries: usize,
    wait_timeout: Duration,
    retry_backoff: Duration,
}

impl ScholarSearch {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            max_retries: config.max_retries.max(1),
            wait_timeout: config.wait_timeout,
            retry_backoff: config.retry_backoff,
        }
    }

    /// 拼接检索 URL，空格替换为 `+`，不做其他转义
    pub fn search_url(&self, title: &str) -> String {
        format!("{}/scholar?q={}", self.base_url, title.replace(' ', "+"))
    }

    /// 按标题检索，返回第一条结果的 BibTeX 记录
    pub async fn search<D>(&self, driver: &D, title: &str) -> Result<Option<BibRecord>, SearchError>
    where
        D: BrowserDriver + ?Sized,
    {
        let url = self.search_url(title);
        let mut last_error = None;
        let mut no_results = false;

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                sleep(self.retry_backoff).await;
            }
            debug!("第 {}/{} 次尝试: {}", attempt, self.max_retries, url);

            match self.attempt(driver, &url).await {
                Ok(Attempt::Done(record)) => return Ok(record),
                Ok(Attempt::NoResults(e)) => {
                    warn!(
                        "未等到检索结果 (尝试 {}/{})",
                        attempt, self.max_retries
                    );
                    no_results = true;
                    last_error = Some(e);
                }
                Err(SearchError::Driver(e)) if e.is_transient() => {
                    warn!("{} (尝试 {}/{})", e, attempt, self.max_retries);
                    no_results = false;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        if no_results {
            info!("没有检索结果");
            return Ok(None);
        }
        match last_error {
            Some(last) => Err(SearchError::Exhausted {
                attempts: self.max_retries,
                last,
            }),
            None => Ok(None),
        }
    }

    async fn attempt<D>(&self, driver: &D, url: &str) -> Result<Attempt, SearchError>
    where
        D: BrowserDriver + ?Sized,
    {
        driver.navigate(url).await?;

        let results = selectors::results();
        match driver.wait_for(&results, self.wait_timeout).await {
            Ok(()) => {}
            Err(e @ DriverError::Timeout { .. }) => return Ok(Attempt::NoResults(e)),
            Err(e) => return Err(e.into()),
        }
        if driver.count(&results).await? == 0 {
            return Ok(Attempt::Done(None));
        }

        driver.click(&selectors::first_cite_button()).await?;
        driver
            .wait_for(&selectors::cite_popup(), self.wait_timeout)
            .await?;

        driver.click(&selectors::bibtex_link()).await?;
        let body = selectors::bibtex_body();
        driver.wait_for(&body, self.wait_timeout).await?;
        let snippet = driver.read_text(&body).await?;
        debug!("BibTeX 片段: {}", snippet);

        let db = bibtex::parse(&snippet)?;
        Ok(Attempt::Done(db.into_first()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeDriver, FakePage};

    const SNIPPET: &str = "@article{lecun2015deep,\n  title={Deep learning},\n  author={LeCun, Yann},\n  year={2015}\n}";

    fn search() -> ScholarSearch {
        ScholarSearch::new(&Config {
            retry_backoff: Duration::ZERO,
            wait_timeout: Duration::from_millis(100),
            ..Config::default()
        })
    }

    #[test]
    fn url_replaces_spaces_only() {
        assert_eq!(
            search().search_url("Deep Learning: a review & more"),
            "https://scholar.google.com/scholar?q=Deep+Learning:+a+review+&+more"
        );
    }

    #[tokio::test]
    async fn returns_first_record_of_snippet() {
        let driver = FakeDriver::new().with_page("Deep Learning", FakePage::Found(SNIPPET.into()));

        let record = search().search(&driver, "Deep Learning").await.unwrap().unwrap();

        assert_eq!(record.key, "lecun2015deep");
        assert_eq!(record.title(), Some("Deep learning"));
        assert_eq!(driver.navigations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_results_after_every_attempt_is_none() {
        let driver = FakeDriver::new();

        let record = search().search(&driver, "Unknown Paper").await.unwrap();

        assert!(record.is_none());
        assert_eq!(driver.navigations().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_results_appear() {
        let driver = FakeDriver::new()
            .with_page("Flaky", FakePage::Found(SNIPPET.into()))
            .with_flaky("Flaky", 2);

        let record = search().search(&driver, "Flaky").await.unwrap();

        assert!(record.is_some());
        assert_eq!(driver.navigations().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn page_reload_after_bibtex_click_is_not_fatal() {
        let driver = FakeDriver::new()
            .with_page("Deep Learning", FakePage::Found(SNIPPET.into()))
            .with_script_hiccups("Deep Learning", 1);

        let record = search().search(&driver, "Deep Learning").await.unwrap();

        assert_eq!(record.unwrap().key, "lecun2015deep");
        assert_eq!(driver.navigations().len(), 1);
    }

    #[tokio::test]
    async fn missing_cite_button_exhausts_retries() {
        let driver = FakeDriver::new().with_page("T", FakePage::MissingCite);

        let err = search().search(&driver, "T").await.unwrap_err();

        assert!(matches!(err, SearchError::Exhausted { attempts: 3, .. }), "{err}");
        assert!(!err.is_fatal());
        assert_eq!(driver.navigations().len(), 3);
    }

    #[tokio::test]
    async fn missing_bibtex_link_exhausts_retries() {
        let driver = FakeDriver::new().with_page("T", FakePage::MissingBibtexLink);

        let err = search().search(&driver, "T").await.unwrap_err();

        assert!(matches!(
            err,
            SearchError::Exhausted {
                last: DriverError::ElementNotFound { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn malformed_snippet_is_not_retried() {
        let driver = FakeDriver::new().with_page("T", FakePage::Found("@article{broken,".into()));

        let err = search().search(&driver, "T").await.unwrap_err();

        assert!(matches!(err, SearchError::Snippet(_)));
        assert_eq!(driver.navigations().len(), 1);
    }

    #[tokio::test]
    async fn empty_snippet_is_none() {
        let driver = FakeDriver::new().with_page("T", FakePage::Found(String::new()));
        assert!(search().search(&driver, "T").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn browser_failure_is_fatal_and_not_retried() {
        let driver = FakeDriver::new().with_page("T", FakePage::Broken);

        let err = search().search(&driver, "T").await.unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(driver.navigations().len(), 1);
    }

    #[tokio::test]
    async fn single_attempt_policy() {
        let search = ScholarSearch::new(&Config {
            max_retries: 1,
            ..Config::default()
        });
        let driver = FakeDriver::new().with_page("T", FakePage::MissingCite);

        let err = search.search(&driver, "T").await.unwrap_err();

        assert!(matches!(err, SearchError::Exhausted { attempts: 1, .. }));
        assert_eq!(driver.navigations().len(), 1);
    }
}
