use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::error::{AppError, AppResult};

/// File name used in caller-facing messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read the bulk-import source: a JSON array of product-shaped objects.
///
/// The elements are returned as raw JSON; field constraints are checked per
/// record by the importer. A well-formed document that is not an array is an
/// `InvalidFormat`, not an empty batch.
pub async fn load_source(path: &Path) -> AppResult<Vec<Value>> {
    let name = display_name(path);

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("{} file not found", name)));
        }
        Err(err) => {
            return Err(AppError::Internal(
                anyhow::Error::new(err).context(format!("failed to read {}", path.display())),
            ));
        }
    };

    let document: Value = serde_json::from_slice(&bytes)
        .map_err(|_| AppError::InvalidFormat(format!("Invalid JSON format in {}", name)))?;

    match document {
        Value::Array(records) => Ok(records),
        _ => Err(AppError::InvalidFormat(format!(
            "{} must contain a JSON array of products",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("products.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_source(&dir.path().join("products.json")).await.unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "products.json file not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn garbage_is_invalid_format() {
        let dir = TempDir::new().unwrap();
        let err = load_source(&write(&dir, "[{\"product_name\": ")).await.unwrap_err();
        match err {
            AppError::InvalidFormat(msg) => assert_eq!(msg, "Invalid JSON format in products.json"),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn object_document_is_invalid_format() {
        let dir = TempDir::new().unwrap();
        let err = load_source(&write(&dir, "{}")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn empty_array_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_source(&write(&dir, "[]")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn preserves_order_and_raw_shape() {
        let dir = TempDir::new().unwrap();
        let records = load_source(&write(
            &dir,
            r#"[{"product_name": "A"}, 42, {"product_name": "C"}]"#,
        ))
        .await
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["product_name"], "A");
        assert_eq!(records[1], 42);
        assert_eq!(records[2]["product_name"], "C");
    }

    #[test]
    fn display_name_uses_file_name() {
        assert_eq!(display_name(Path::new("/srv/data/catalog.json")), "catalog.json");
    }
}
