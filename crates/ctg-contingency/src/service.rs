use crate::assembler::{ContingencyAssembler, ContingencyInfos};
use crate::evaluator::{FilterEvaluator, FilterExport};
use crate::store::{ContingencyListContent, ContingencyListRecord, ContingencyListStore};
use chrono::Utc;
use ctg_core::{CtgError, CtgResult};
use ctg_filter::FilterCompiler;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Contingencies produced from one list against one network snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedContingencies {
    pub list_id: Uuid,
    pub name: String,
    pub contingencies: Vec<ContingencyInfos>,
}

impl ExportedContingencies {
    pub fn count(&self) -> ContingencyCount {
        ContingencyCount {
            contingencies: self.contingencies.len(),
            not_found_elements: self
                .contingencies
                .iter()
                .map(|c| c.not_found_elements.len())
                .sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContingencyCount {
    pub contingencies: usize,
    pub not_found_elements: usize,
}

/// List management and export on top of a store and evaluation collaborators.
pub struct ContingencyListService {
    store: Arc<dyn ContingencyListStore>,
    filter_export: Option<Arc<dyn FilterExport>>,
}

impl ContingencyListService {
    pub fn new(store: Arc<dyn ContingencyListStore>) -> Self {
        Self {
            store,
            filter_export: None,
        }
    }

    /// Needed to export filter-based lists.
    pub fn with_filter_export(mut self, filter_export: Arc<dyn FilterExport>) -> Self {
        self.filter_export = Some(filter_export);
        self
    }

    pub fn create(
        &self,
        name: &str,
        content: ContingencyListContent,
    ) -> CtgResult<ContingencyListRecord> {
        validate_content(&content)?;
        let record = ContingencyListRecord::new(name, content);
        self.store.insert(record.clone())?;
        info!(list = %record.id, kind = %record.kind(), "created contingency list");
        Ok(record)
    }

    pub fn get(&self, id: Uuid) -> CtgResult<ContingencyListRecord> {
        self.store
            .get(id)?
            .ok_or_else(|| CtgError::NotFound(format!("contingency list {id}")))
    }

    pub fn list(&self) -> CtgResult<Vec<ContingencyListRecord>> {
        self.store.list()
    }

    /// Rebuild a record in place; the modification date is refreshed.
    pub fn update(
        &self,
        id: Uuid,
        name: &str,
        content: ContingencyListContent,
    ) -> CtgResult<ContingencyListRecord> {
        validate_content(&content)?;
        let record = ContingencyListRecord {
            id,
            name: name.to_string(),
            modification_date: Utc::now(),
            content,
        };
        match self.store.replace(record.clone())? {
            Some(_) => Ok(record),
            None => Err(CtgError::NotFound(format!("contingency list {id}"))),
        }
    }

    pub fn delete(&self, id: Uuid) -> CtgResult<()> {
        match self.store.delete(id)? {
            Some(_) => Ok(()),
            None => Err(CtgError::NotFound(format!("contingency list {id}"))),
        }
    }

    pub fn duplicate(&self, id: Uuid) -> CtgResult<ContingencyListRecord> {
        self.store
            .duplicate(id)?
            .ok_or_else(|| CtgError::NotFound(format!("contingency list {id}")))
    }

    /// Legacy script of a form or script list.
    pub fn script_of(&self, id: Uuid) -> CtgResult<String> {
        let record = self.get(id)?;
        match record.content {
            ContingencyListContent::Form { spec } => FilterCompiler::to_script(&spec),
            ContingencyListContent::Script { script } => Ok(script),
            other => Err(CtgError::Configuration(format!(
                "{} list {id} has no script form",
                other.kind()
            ))),
        }
    }

    /// Store the script of a form list as a new script list.
    pub fn new_script_from_form(&self, id: Uuid, name: &str) -> CtgResult<ContingencyListRecord> {
        let script = self.form_script(id)?;
        self.create(name, ContingencyListContent::Script { script })
    }

    /// Turn a form list into a script list, keeping its id and name.
    pub fn replace_form_with_script(&self, id: Uuid) -> CtgResult<ContingencyListRecord> {
        let script = self.form_script(id)?;
        let name = self.get(id)?.name;
        self.update(id, &name, ContingencyListContent::Script { script })
    }

    fn form_script(&self, id: Uuid) -> CtgResult<String> {
        match self.get(id)?.content {
            ContingencyListContent::Form { spec } => FilterCompiler::to_script(&spec),
            other => Err(CtgError::Configuration(format!(
                "only form lists convert to scripts, {id} is {}",
                other.kind()
            ))),
        }
    }

    /// Evaluate one list against the evaluator's network.
    pub fn export(
        &self,
        id: Uuid,
        evaluator: &dyn FilterEvaluator,
    ) -> CtgResult<ExportedContingencies> {
        let record = self.get(id)?;
        let contingencies = match &record.content {
            ContingencyListContent::Form { spec } => {
                let compiled = FilterCompiler::compile(spec)?;
                ContingencyAssembler::per_element(&evaluator.evaluate(&compiled)?)?
            }
            ContingencyListContent::IdentifierList { groups } => {
                ContingencyAssembler::per_group(groups, |id| evaluator.resolve(id))?
            }
            ContingencyListContent::FilterBased { filters } => {
                let export = self.filter_export.as_ref().ok_or_else(|| {
                    CtgError::Configuration(format!(
                        "list {id} is filter based but no filter service is configured"
                    ))
                })?;
                ContingencyAssembler::per_element(&export.export(filters)?)?
            }
            ContingencyListContent::Script { .. } => {
                return Err(CtgError::Configuration(format!(
                    "script list {id} is executed by the legacy engine and cannot be exported"
                )))
            }
        };
        let exported = ExportedContingencies {
            list_id: record.id,
            name: record.name,
            contingencies,
        };
        let count = exported.count();
        info!(
            list = %id,
            contingencies = count.contingencies,
            not_found = count.not_found_elements,
            "exported contingency list"
        );
        Ok(exported)
    }

    pub fn count(&self, id: Uuid, evaluator: &dyn FilterEvaluator) -> CtgResult<ContingencyCount> {
        Ok(self.export(id, evaluator)?.count())
    }

    /// Export several lists in parallel. Results keep the order of `ids`;
    /// one failing list does not affect the others.
    pub fn export_all(
        &self,
        ids: &[Uuid],
        evaluator: &dyn FilterEvaluator,
        threads: usize,
    ) -> CtgResult<Vec<CtgResult<ExportedContingencies>>> {
        let thread_count = if threads == 0 { num_cpus::get() } else { threads };
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build()
            .map_err(|err| CtgError::Other(format!("building export thread pool: {err}")))?;
        Ok(pool.install(|| {
            ids.par_iter()
                .map(|id| self.export(*id, evaluator))
                .collect()
        }))
    }
}

fn validate_content(content: &ContingencyListContent) -> CtgResult<()> {
    match content {
        ContingencyListContent::Form { spec } => FilterCompiler::compile(spec).map(|_| ()),
        ContingencyListContent::IdentifierList { groups } => {
            match groups.iter().find(|g| g.id.trim().is_empty()) {
                Some(_) => Err(CtgError::Configuration(
                    "identifier groups need a non-empty id".into(),
                )),
                None => Ok(()),
            }
        }
        ContingencyListContent::FilterBased { filters } if filters.is_empty() => Err(
            CtgError::Configuration("filter-based list references no filter".into()),
        ),
        ContingencyListContent::FilterBased { .. } => Ok(()),
        ContingencyListContent::Script { script } if script.trim().is_empty() => {
            Err(CtgError::Configuration("script list is empty".into()))
        }
        ContingencyListContent::Script { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::IdentifierGroup;
    use crate::store::InMemoryContingencyListStore;
    use ctg_core::{EquipmentKind, EquipmentType, IdentifiableAttributes};
    use ctg_filter::{CompiledFilter, EquipmentFilterSpec};

    /// Every line named L1..L3 exists.
    struct FixedLines;

    impl FilterEvaluator for FixedLines {
        fn evaluate(&self, filter: &CompiledFilter) -> CtgResult<Vec<IdentifiableAttributes>> {
            if filter.equipment_type() != EquipmentType::Line {
                return Ok(Vec::new());
            }
            Ok(["L1", "L2", "L3"]
                .iter()
                .map(|id| IdentifiableAttributes::new(*id, EquipmentKind::Line))
                .collect())
        }

        fn resolve(&self, id: &str) -> Option<IdentifiableAttributes> {
            matches!(id, "L1" | "L2" | "L3")
                .then(|| IdentifiableAttributes::new(id, EquipmentKind::Line))
        }
    }

    struct StaticExport(Vec<IdentifiableAttributes>);

    impl FilterExport for StaticExport {
        fn export(&self, _filters: &[Uuid]) -> CtgResult<Vec<IdentifiableAttributes>> {
            Ok(self.0.clone())
        }
    }

    fn service() -> ContingencyListService {
        ContingencyListService::new(Arc::new(InMemoryContingencyListStore::new()))
    }

    fn line_form() -> ContingencyListContent {
        ContingencyListContent::Form {
            spec: EquipmentFilterSpec::new(EquipmentType::Line),
        }
    }

    #[test]
    fn test_form_export_one_contingency_per_element() {
        let service = service();
        let record = service.create("lines", line_form()).unwrap();
        let exported = service.export(record.id, &FixedLines).unwrap();
        assert_eq!(exported.contingencies.len(), 3);
        assert_eq!(exported.contingencies[0].id.as_deref(), Some("L1"));
        assert_eq!(
            service.count(record.id, &FixedLines).unwrap(),
            ContingencyCount {
                contingencies: 3,
                not_found_elements: 0
            }
        );
    }

    #[test]
    fn test_identifier_list_reports_missing() {
        let service = service();
        let record = service
            .create(
                "pairs",
                ContingencyListContent::IdentifierList {
                    groups: vec![IdentifierGroup {
                        id: "pair".into(),
                        identifiers: vec!["L1".into(), "L9".into()],
                    }],
                },
            )
            .unwrap();
        let count = service.count(record.id, &FixedLines).unwrap();
        assert_eq!(count.contingencies, 1);
        assert_eq!(count.not_found_elements, 1);
    }

    #[test]
    fn test_script_lists_are_not_exported() {
        let service = service();
        let record = service
            .create(
                "legacy",
                ContingencyListContent::Script {
                    script: "for (equipment in network.lines) {}".into(),
                },
            )
            .unwrap();
        assert!(matches!(
            service.export(record.id, &FixedLines),
            Err(CtgError::Configuration(_))
        ));
        assert_eq!(service.script_of(record.id).unwrap(), "for (equipment in network.lines) {}");
    }

    #[test]
    fn test_filter_based_requires_export_collaborator() {
        let content = ContingencyListContent::FilterBased {
            filters: vec![Uuid::new_v4()],
        };
        let plain = service();
        let record = plain.create("remote", content.clone()).unwrap();
        assert!(plain.export(record.id, &FixedLines).is_err());

        let remote = service().with_filter_export(Arc::new(StaticExport(vec![
            IdentifiableAttributes::new("G1", EquipmentKind::Generator),
        ])));
        let record = remote.create("remote", content).unwrap();
        let exported = remote.export(record.id, &FixedLines).unwrap();
        assert_eq!(exported.contingencies[0].id.as_deref(), Some("G1"));
    }

    #[test]
    fn test_missing_list_is_not_found() {
        let service = service();
        let err = service.export(Uuid::new_v4(), &FixedLines).unwrap_err();
        assert!(err.is_not_found());
        assert!(service.delete(Uuid::new_v4()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_replace_form_with_script_keeps_identity() {
        let service = service();
        let record = service.create("lines", line_form()).unwrap();
        let converted = service.replace_form_with_script(record.id).unwrap();
        assert_eq!(converted.id, record.id);
        assert_eq!(converted.name, "lines");
        match converted.content {
            ContingencyListContent::Script { script } => {
                assert!(script.starts_with("for (equipment in network.lines) {"))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(service.replace_form_with_script(record.id).is_err());
    }

    #[test]
    fn test_new_script_from_form() {
        let service = service();
        let record = service.create("lines", line_form()).unwrap();
        let script = service.new_script_from_form(record.id, "lines (script)").unwrap();
        assert_ne!(script.id, record.id);
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_export_all_keeps_order() {
        let service = service();
        let first = service.create("a", line_form()).unwrap();
        let second = service
            .create(
                "b",
                ContingencyListContent::Script {
                    script: "x".into(),
                },
            )
            .unwrap();
        let results = service
            .export_all(&[first.id, second.id], &FixedLines, 2)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_invalid_content_rejected_on_create() {
        let service = service();
        let empty = ContingencyListContent::FilterBased { filters: vec![] };
        assert!(service.create("empty", empty).is_err());
        let blank = ContingencyListContent::Script {
            script: "  ".into(),
        };
        assert!(service.create("blank", blank).is_err());
    }
}
