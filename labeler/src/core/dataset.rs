//! Dataset loading
//!
//! A dataset is one CSV file fetched through the remote store, or from a
//! local directory when the store does not have it. Header names are
//! trimmed and the `Id.` column is mandatory.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use shared::RowId;
use crate::error::{LabelerError, LabelerResult};
use crate::services::local_store::resolve_blob_path;
use crate::traits::RemoteStore;

/// Name of the required identifier column
pub const ID_COLUMN: &str = "Id.";

/// One row: ordered `(column, value)` pairs plus its identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Cells in file column order
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }
}

/// Ordered table of rows loaded from one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Parse CSV bytes into a dataset named `name`
    pub fn parse(name: &str, bytes: &[u8]) -> LabelerResult<Self> {
        let malformed = |e: csv::Error| LabelerError::DatasetMalformed {
            name: name.to_string(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);

        let columns: Vec<String> = reader
            .headers()
            .map_err(malformed)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let id_index = columns
            .iter()
            .position(|c| c == ID_COLUMN)
            .ok_or_else(|| LabelerError::SchemaInvalid {
                dataset: name.to_string(),
                column: ID_COLUMN.to_string(),
                columns: columns.clone(),
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(malformed)?;
            let id = RowId::new(record.get(id_index).unwrap_or_default());
            let cells = columns
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();
            rows.push(Row { id, cells });
        }

        Ok(Self {
            columns,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
}

/// Fetches datasets from the store with a local-directory fallback
#[derive(Clone)]
pub struct DatasetLoader {
    store: Arc<dyn RemoteStore>,
    local_dir: Option<PathBuf>,
}

impl DatasetLoader {
    pub fn new(store: Arc<dyn RemoteStore>, local_dir: Option<PathBuf>) -> Self {
        Self { store, local_dir }
    }

    /// Load `name`, trying the remote store first and the local directory second.
    ///
    /// Store failures other than not-found are returned as-is; only a
    /// missing blob triggers the fallback.
    pub async fn load(&self, name: &str) -> LabelerResult<Dataset> {
        if let Some(bytes) = self.store.download(name).await? {
            tracing::debug!("📄 Loaded dataset {} from {}", name, self.store.backend_name());
            return Dataset::parse(name, &bytes);
        }

        if let Some(bytes) = self.read_local(name).await? {
            tracing::debug!("📄 Loaded dataset {} from local fallback", name);
            return Dataset::parse(name, &bytes);
        }

        Err(LabelerError::SourceUnavailable {
            name: name.to_string(),
        })
    }

    async fn read_local(&self, name: &str) -> LabelerResult<Option<Vec<u8>>> {
        let Some(dir) = &self.local_dir else {
            return Ok(None);
        };
        let path = resolve_blob_path(dir, name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
