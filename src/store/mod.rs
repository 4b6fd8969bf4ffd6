// JSON-file persistence for multi-unit records.
// The store owns ids and rows; the multi-unit hooks run before a row is written.

use crate::error::{Error, Result};
use crate::record::{Attributes, MultiUnitRecord, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const ID_COLUMN: &str = "id";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct StoreFile {
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    rows: BTreeMap<u64, Map<String, Value>>,
}

fn first_id() -> u64 {
    1
}

pub struct JsonStore {
    path: Option<PathBuf>,
    data: StoreFile,
}

impl JsonStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreFile {
                next_id: first_id(),
                rows: BTreeMap::new(),
            },
        }
    }

    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            StoreFile {
                next_id: first_id(),
                rows: BTreeMap::new(),
            }
        };
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    fn flush(&self) -> Result<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&self.data)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Insert a new row. Returns the assigned id.
    pub fn create(&mut self, record: &mut MultiUnitRecord<'_, Record>) -> Result<u64> {
        record.before_create()?;

        let id = self.data.next_id;
        record
            .record_mut()
            .set_attribute(ID_COLUMN, Value::from(id));
        self.data
            .rows
            .insert(id, record.record().attributes().clone());
        self.data.next_id = id + 1;
        self.flush()?;

        record.record_mut().mark_persisted();
        log::info!("created {} row {}", record.record_type().name(), id);
        Ok(id)
    }

    /// Write back an existing row. Returns false when nothing was left to write.
    pub fn update(&mut self, record: &mut MultiUnitRecord<'_, Record>) -> Result<bool> {
        let id = row_id(record.record())?;
        if !self.data.rows.contains_key(&id) {
            return Err(Error::RowNotFound(id));
        }

        if record.record().dirty_keys().is_empty() {
            return Ok(false);
        }
        record.before_update()?;
        if record.record().dirty_keys().is_empty() {
            log::debug!("row {} unchanged after change detection", id);
            return Ok(false);
        }

        self.data
            .rows
            .insert(id, record.record().attributes().clone());
        self.flush()?;

        record.record_mut().mark_persisted();
        log::info!("updated {} row {}", record.record_type().name(), id);
        Ok(true)
    }

    pub fn find(&self, id: u64) -> Result<Record> {
        self.data
            .rows
            .get(&id)
            .cloned()
            .map(Record::from_row)
            .ok_or(Error::RowNotFound(id))
    }

    /// Raw persisted row, exactly as stored.
    pub fn row(&self, id: u64) -> Option<&Map<String, Value>> {
        self.data.rows.get(&id)
    }

    pub fn ids(&self) -> Vec<u64> {
        self.data.rows.keys().copied().collect()
    }
}

fn row_id(record: &Record) -> Result<u64> {
    record
        .attribute(ID_COLUMN)
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::InvalidConfig("record has not been persisted yet".to_string()))
}
