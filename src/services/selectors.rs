//! Google Scholar 页面结构
//!
//! 站点没有稳定的 DOM 约定，改版时只需要改这里

use crate::browser::Locator;

/// 单条检索结果的容器
pub const RESULT: &str = ".gs_ri";
/// 结果下方的"引用"按钮
pub const CITE_BUTTON: &str = ".gs_or_cit.gs_or_btn.gs_nph";
/// 引用弹窗中的格式列表
pub const CITE_POPUP: &str = ".gs_citi";
/// 导出链接文字
pub const BIBTEX_LINK_TEXT: &str = "BibTeX";
/// BibTeX 导出页中的正文
pub const BIBTEX_BODY: &str = "pre";

pub fn results() -> Locator {
    Locator::css(RESULT)
}

/// 第一条结果内的引用按钮
pub fn first_cite_button() -> Locator {
    Locator::within(RESULT, CITE_BUTTON)
}

pub fn cite_popup() -> Locator {
    Locator::css(CITE_POPUP)
}

pub fn bibtex_link() -> Locator {
    Locator::link_text(BIBTEX_LINK_TEXT)
}

pub fn bibtex_body() -> Locator {
    Locator::css(BIBTEX_BODY)
}
