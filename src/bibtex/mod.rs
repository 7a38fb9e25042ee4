//! BibTeX 文件读写

pub mod reader;
pub mod writer;

use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::error::BibError;
use crate::models::BibDatabase;

pub use reader::parse;
pub use writer::{format_record, to_string};

/// 从文件读取 BibTeX 库
pub async fn read_file(path: &Path) -> Result<BibDatabase, BibError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| BibError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let db = parse(&content)?;
    info!("从 {} 读取到 {} 条记录", path.display(), db.len());
    Ok(db)
}

/// 把 BibTeX 库写入文件（覆盖已有内容）
pub async fn write_file(path: &Path, db: &BibDatabase) -> Result<(), BibError> {
    fs::write(path, to_string(db)?)
        .await
        .map_err(|source| BibError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!("已写入 {} 条记录到 {}", db.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BibRecord;

    #[tokio::test]
    async fn empty_database_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("google.bib");

        write_file(&path, &BibDatabase::new()).await.unwrap();
        let db = read_file(&path).await.unwrap();

        assert!(db.is_empty());
    }

    #[tokio::test]
    async fn records_round_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bib");
        let db: BibDatabase = vec![BibRecord::new("article", "k")
            .with_field("author", "LeCun, Yann")
            .with_field("title", "Deep Learning")]
        .into();

        write_file(&path, &db).await.unwrap();
        assert_eq!(read_file(&path).await.unwrap(), db);
    }

    #[tokio::test]
    async fn missing_input_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(&dir.path().join("nope.bib")).await.unwrap_err();
        assert!(matches!(err, BibError::Read { .. }));
    }
}
