/// 一条 BibTeX 记录
///
/// 字段名不区分大小写，统一以小写保存；同名字段只保留最后一次赋值，
/// 其余字段保持插入顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibRecord {
    pub entry_type: String,
    pub key: String,
    fields: Vec<(String, String)>,
}

impl BibRecord {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into().to_lowercase(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// 设置字段，已存在时覆盖原值
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with_field(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// 有序的记录列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibDatabase {
    records: Vec<BibRecord>,
}

impl BibDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: BibRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&BibRecord> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BibRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[BibRecord] {
        &self.records
    }

    pub fn into_first(self) -> Option<BibRecord> {
        self.records.into_iter().next()
    }
}

impl From<Vec<BibRecord>> for BibDatabase {
    fn from(records: Vec<BibRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<BibRecord> for BibDatabase {
    fn from_iter<I: IntoIterator<Item = BibRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BibDatabase {
    type Item = &'a BibRecord;
    type IntoIter = std::slice::Iter<'a, BibRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_case_insensitive() {
        let mut record = BibRecord::new("Article", "lecun2015");
        record.set("Title", "Deep learning");
        record.set("TITLE", "Deep Learning");

        assert_eq!(record.entry_type, "article");
        assert_eq!(record.field_count(), 1);
        assert_eq!(record.title(), Some("Deep Learning"));
        assert_eq!(record.get("tItLe"), Some("Deep Learning"));
    }

    #[test]
    fn fields_keep_insertion_order() {
        let record = BibRecord::new("book", "k")
            .with_field("title", "T")
            .with_field("author", "A")
            .with_field("year", "2020")
            .with_field("author", "B");

        let names: Vec<_> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(names, ["title", "author", "year"]);
        assert_eq!(record.get("author"), Some("B"));
    }
}
