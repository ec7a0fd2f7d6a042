// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::ExtractionResult;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Saves the structured record for `source` as `<stem>_extracted.json`.
    pub fn save_result(&self, result: &ExtractionResult, source: &Path) -> Result<PathBuf, StorageError> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());

        let file_path = self.base_dir.join(format!("{}_extracted.json", stem));

        let record = serde_json::json!({
            "source_file": source.display().to_string(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
            "result": result,
        });

        let record_str = serde_json::to_string_pretty(&record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, record_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved extraction record to {}", file_path.display());

        Ok(file_path)
    }
}
