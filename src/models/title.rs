//! 标题清洗
//!
//! 把 BibTeX 标题里的排版标记去掉，得到可以直接用于检索的纯文本

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::BibRecord;

static COMMAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[a-zA-Z]+").expect("valid regex"));
static BRACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{}]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// 提取记录的检索标题
///
/// 没有 title 字段，或清洗后为空时返回 `None`
pub fn extract_title(record: &BibRecord) -> Option<String> {
    record.title().and_then(normalize_title)
}

/// 清洗标题文本
///
/// - 先去掉 `\emph`、`\textit` 这类反斜杠命令，再去掉 `{` `}`，命令参数里的文字保留
/// - 连续空白合并成一个空格并去掉首尾空白
pub fn normalize_title(raw: &str) -> Option<String> {
    let mut text = raw.to_string();
    // 去掉花括号后可能拼出新的命令（如 `\{a}` → `\a`），循环到稳定为止
    loop {
        let without_commands = COMMAND.replace_all(&text, "");
        let stripped = BRACES.replace_all(&without_commands, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    let collapsed = WHITESPACE.replace_all(&text, " ");
    let title = collapsed.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_braces() {
        assert_eq!(
            normalize_title("Deep {Learning}").as_deref(),
            Some("Deep Learning")
        );
    }

    #[test]
    fn strips_commands_but_keeps_their_argument() {
        assert_eq!(
            normalize_title(r"\textit{Attention} Is All You {\bf Need}").as_deref(),
            Some("Attention Is All You Need")
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            normalize_title("  A\n   survey\tof   {GANs}  ").as_deref(),
            Some("A survey of GANs")
        );
    }

    #[test]
    fn markup_only_title_is_absent() {
        assert_eq!(normalize_title(r"{\relax}"), None);
        assert_eq!(normalize_title("   "), None);
    }

    #[test]
    fn missing_title_field_is_absent() {
        let record = BibRecord::new("misc", "k").with_field("author", "Someone");
        assert_eq!(extract_title(&record), None);
    }

    #[test]
    fn output_has_no_markup_or_double_spaces() {
        let samples = [
            r"{{Nested}} \LaTeX{} macros",
            r"\\ab{c} tricky",
            r"Mixed \emph{case}   and {\em  spacing}",
            r"Trailing \command",
            "plain title",
        ];
        for sample in samples {
            if let Some(title) = normalize_title(sample) {
                assert!(!title.contains('{') && !title.contains('}'), "{title}");
                assert!(!COMMAND.is_match(&title), "{title}");
                assert!(!title.contains("  "), "{title}");
                assert_eq!(title, title.trim());
            }
        }
    }
}
