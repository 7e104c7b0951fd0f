//! Contingency-list records and their persistence.

use crate::assembler::IdentifierGroup;
use chrono::{DateTime, Utc};
use ctg_core::loader::parse_document;
use ctg_core::{CtgError, CtgResult};
use ctg_filter::EquipmentFilterSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;
use uuid::Uuid;

/// What a list contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContingencyListContent {
    /// Declarative filter, one contingency per matched element
    Form { spec: EquipmentFilterSpec },
    /// Explicit identifiers, one contingency per group
    IdentifierList { groups: Vec<IdentifierGroup> },
    /// Filters stored in the external filter service
    FilterBased { filters: Vec<Uuid> },
    /// Legacy script, kept verbatim
    Script { script: String },
}

impl ContingencyListContent {
    pub fn kind(&self) -> ContingencyListKind {
        match self {
            ContingencyListContent::Form { .. } => ContingencyListKind::Form,
            ContingencyListContent::IdentifierList { .. } => ContingencyListKind::IdentifierList,
            ContingencyListContent::FilterBased { .. } => ContingencyListKind::FilterBased,
            ContingencyListContent::Script { .. } => ContingencyListKind::Script,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContingencyListKind {
    Form,
    IdentifierList,
    FilterBased,
    Script,
}

impl std::fmt::Display for ContingencyListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContingencyListKind::Form => "FORM",
            ContingencyListKind::IdentifierList => "IDENTIFIER_LIST",
            ContingencyListKind::FilterBased => "FILTER_BASED",
            ContingencyListKind::Script => "SCRIPT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContingencyListRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub modification_date: DateTime<Utc>,
    #[serde(flatten)]
    pub content: ContingencyListContent,
}

impl ContingencyListRecord {
    pub fn new(name: impl Into<String>, content: ContingencyListContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            modification_date: Utc::now(),
            content,
        }
    }

    pub fn kind(&self) -> ContingencyListKind {
        self.content.kind()
    }
}

/// Persistence keyed by list UUID. Absence is `None`, not an error.
pub trait ContingencyListStore: Send + Sync {
    fn get(&self, id: Uuid) -> CtgResult<Option<ContingencyListRecord>>;
    fn insert(&self, record: ContingencyListRecord) -> CtgResult<()>;
    /// Replace an existing record; returns the previous one if there was one.
    fn replace(&self, record: ContingencyListRecord) -> CtgResult<Option<ContingencyListRecord>>;
    fn delete(&self, id: Uuid) -> CtgResult<Option<ContingencyListRecord>>;
    /// Records ordered by name.
    fn list(&self) -> CtgResult<Vec<ContingencyListRecord>>;

    /// Copy a record under a fresh id.
    fn duplicate(&self, id: Uuid) -> CtgResult<Option<ContingencyListRecord>> {
        let Some(source) = self.get(id)? else {
            return Ok(None);
        };
        let copy = ContingencyListRecord::new(source.name, source.content);
        self.insert(copy.clone())?;
        Ok(Some(copy))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryContingencyListStore {
    records: RwLock<HashMap<Uuid, ContingencyListRecord>>,
}

impl InMemoryContingencyListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = ContingencyListRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
        }
    }

    fn poisoned() -> CtgError {
        CtgError::Other("contingency list store lock poisoned".into())
    }
}

impl ContingencyListStore for InMemoryContingencyListStore {
    fn get(&self, id: Uuid) -> CtgResult<Option<ContingencyListRecord>> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.get(&id).cloned())
    }

    fn insert(&self, record: ContingencyListRecord) -> CtgResult<()> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        if records.contains_key(&record.id) {
            return Err(CtgError::Configuration(format!(
                "contingency list {} already exists",
                record.id
            )));
        }
        records.insert(record.id, record);
        Ok(())
    }

    fn replace(&self, record: ContingencyListRecord) -> CtgResult<Option<ContingencyListRecord>> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        if !records.contains_key(&record.id) {
            return Ok(None);
        }
        Ok(records.insert(record.id, record))
    }

    fn delete(&self, id: Uuid) -> CtgResult<Option<ContingencyListRecord>> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        Ok(records.remove(&id))
    }

    fn list(&self) -> CtgResult<Vec<ContingencyListRecord>> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        let mut all: Vec<ContingencyListRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }
}

pub fn load_list_record_from_path(path: &Path) -> CtgResult<ContingencyListRecord> {
    let data = fs::read_to_string(path)?;
    parse_document(path, &data)
        .map_err(|err| CtgError::Configuration(format!("{}: {err:#}", path.display())))
}

/// Load every `.json`/`.yaml`/`.yml` record in a directory, in file-name order.
pub fn load_list_records_from_dir(dir: &Path) -> CtgResult<Vec<ContingencyListRecord>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_record = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                matches!(
                    ext.to_ascii_lowercase().as_str(),
                    "json" | "yaml" | "yml"
                )
            });
        if path.is_file() && is_record {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(|p| load_list_record_from_path(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctg_core::EquipmentType;

    fn form(name: &str) -> ContingencyListRecord {
        ContingencyListRecord::new(
            name,
            ContingencyListContent::Form {
                spec: EquipmentFilterSpec::new(EquipmentType::Line),
            },
        )
    }

    #[test]
    fn test_crud() {
        let store = InMemoryContingencyListStore::new();
        let record = form("lines");
        let id = record.id;
        store.insert(record.clone()).unwrap();
        assert!(store.insert(record).is_err());
        assert_eq!(store.get(id).unwrap().unwrap().name, "lines");

        let mut renamed = store.get(id).unwrap().unwrap();
        renamed.name = "all lines".into();
        assert!(store.replace(renamed).unwrap().is_some());
        assert!(store.replace(form("ghost")).unwrap().is_none());

        assert!(store.delete(id).unwrap().is_some());
        assert!(store.get(id).unwrap().is_none());
        assert!(store.delete(id).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let original = form("lines");
        let store = InMemoryContingencyListStore::with_records([original.clone()]);
        let copy = store.duplicate(original.id).unwrap().unwrap();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.content, original.content);
        assert_eq!(store.list().unwrap().len(), 2);
        assert!(store.duplicate(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_record_json_shape() {
        let json = r#"{
            "id": "6f1f3c1e-8a4b-4c38-9d0e-2f5b8f0a1c11",
            "name": "French generators",
            "modificationDate": "2024-03-01T10:00:00Z",
            "type": "FORM",
            "spec": {"equipmentType": "GENERATOR", "countries1": ["FR"]}
        }"#;
        let record: ContingencyListRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind(), ContingencyListKind::Form);
        assert_eq!(record.name, "French generators");
    }

    #[test]
    fn test_identifier_list_from_yaml() {
        let yaml = "name: n-2\ntype: IDENTIFIER_LIST\ngroups:\n  - id: pair\n    identifiers: [L1, L2]\n";
        let record: ContingencyListRecord = serde_yaml::from_str(yaml).unwrap();
        match record.content {
            ContingencyListContent::IdentifierList { groups } => {
                assert_eq!(groups[0].identifiers, vec!["L1", "L2"]);
            }
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_load_records_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.yaml"),
            "name: scripted\ntype: SCRIPT\nscript: \"for (equipment in network.lines) {}\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"name": "loads", "type": "FORM", "spec": {"equipmentType": "LOAD"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let records = load_list_records_from_dir(dir.path()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["loads", "scripted"]);
    }
}
