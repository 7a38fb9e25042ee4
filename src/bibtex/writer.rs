//! BibTeX 输出
//!
//! 每条记录转成 `biblatex::Entry` 后序列化，花括号等特殊字符由它转义；
//! 记录之间空一行，空库输出为空字符串。

use biblatex::{Chunk, Entry, EntryType, Spanned};

use crate::error::BibError;
use crate::models::{BibDatabase, BibRecord};

/// 把整个库序列化为 BibTeX 文本
pub fn to_string(db: &BibDatabase) -> Result<String, BibError> {
    let records = db
        .iter()
        .map(format_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records.join("\n"))
}

/// 序列化单条记录
pub fn format_record(record: &BibRecord) -> Result<String, BibError> {
    let mut text = to_entry(record)
        .to_bibtex_string()
        .map_err(|e| BibError::Format {
            key: record.key.clone(),
            message: e.to_string(),
        })?;
    text.push('\n');
    Ok(text)
}

fn to_entry(record: &BibRecord) -> Entry {
    let mut entry = Entry::new(record.key.clone(), EntryType::new(&record.entry_type));
    for (name, value) in record.fields() {
        let chunk = Spanned::new(Chunk::Normal(value.to_string()), 0..0);
        entry.fields.insert(name.to_string(), vec![chunk]);
    }
    entry
}
