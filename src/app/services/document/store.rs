//! Document files on disk

use crate::app::models::WraDocument;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Load a WRA document from a JSON file
pub async fn load_document(path: &Path) -> Result<WraDocument> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read document {}", path.display()), e))?;

    let document = WraDocument::from_json_str(&content).map_err(|e| match e {
        Error::Document { source, .. } => Error::document(
            format!("Failed to parse WRA document {}", path.display()),
            source,
        ),
        other => other,
    })?;

    debug!(
        "Loaded {} with {} location(s) and {} point(s)",
        path.display(),
        document.measurement_location.len(),
        document.point_count()
    );
    Ok(document)
}

/// Write a WRA document as pretty-printed JSON, creating parent directories
pub async fn save_document(path: &Path, document: &WraDocument) -> Result<()> {
    let content = document.to_json_pretty()?;
    write_json_file(path, &content).await?;
    info!("Saved document to {}", path.display());
    Ok(())
}

/// Write JSON text to a file, creating parent directories as needed
pub async fn write_json_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            Error::io(
                format!("Failed to create output directory: {}", parent.display()),
                e,
            )
        })?;
    }

    let mut content = content.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }

    tokio::fs::write(path, content)
        .await
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))
}
