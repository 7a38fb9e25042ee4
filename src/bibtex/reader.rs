//! BibTeX 解析
//!
//! 语法交给 `biblatex`：`@string` 宏、`#` 拼接、引号与花括号取值都由它处理。
//! 这里只做两件事：先把条目之外的文字（注释、导出工具的说明、邮箱里的 `@`）
//! 替换成空白，再把解析结果转成 [`BibRecord`]。

use biblatex::{Bibliography, ChunksExt};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::BibError;
use crate::models::{BibDatabase, BibRecord};

/// `@type{` 或 `@type(`，只有这样的 `@` 才算条目开头
static ENTRY_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@\s*([A-Za-z][A-Za-z0-9_:.+-]*)\s*([{(])").expect("valid regex")
});

/// 解析 BibTeX 文本
pub fn parse(input: &str) -> Result<BibDatabase, BibError> {
    let text = blank_outside_entries(input);
    let bibliography = Bibliography::parse(&text)
        .map_err(|e| BibError::parse(line_at(&text, e.span.start), e.to_string()))?;

    let db: BibDatabase = bibliography
        .iter()
        .map(|entry| {
            let mut record = BibRecord::new(entry.entry_type.to_string(), entry.key.clone());
            for (name, chunks) in &entry.fields {
                record.set(name, chunks.format_verbatim());
            }
            record
        })
        .collect();

    debug!("解析得到 {} 条记录", db.len());
    Ok(db)
}

/// 条目之外的字符一律换成空格，换行保留，错误行号因此与原文一致。
/// `@comment` 整块也一并清掉。
fn blank_outside_entries(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if c == '@' {
            if let Some(caps) = ENTRY_START.captures(rest) {
                let header = caps[0].len();
                let close = if &caps[2] == "{" { '}' } else { ')' };
                let end = header + entry_len(&rest[header..], close);
                let (entry, tail) = rest.split_at(end);
                if caps[1].eq_ignore_ascii_case("comment") {
                    blank(entry, &mut out);
                } else {
                    out.push_str(entry);
                }
                rest = tail;
                continue;
            }
            debug!("忽略条目之外的 '@'");
        }
        out.push(if c == '\n' { '\n' } else { ' ' });
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// 条目体的字节长度（含结束符）；未结束时返回剩余全部，由解析器报错
fn entry_len(body: &str, close: char) -> usize {
    let mut depth = 0usize;
    let mut quoted = false;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            '"' if depth == 0 => quoted = !quoted,
            _ if c == close && depth == 0 && !quoted => return i + c.len_utf8(),
            _ => {}
        }
    }
    body.len()
}

fn blank(text: &str, out: &mut String) {
    out.extend(text.chars().map(|c| if c == '\n' { '\n' } else { ' ' }));
}

fn line_at(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
