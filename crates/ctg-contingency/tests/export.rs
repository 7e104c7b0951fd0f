use ctg_contingency::{
    load_list_records_from_dir, ContingencyElement, ContingencyListKind, ContingencyListService,
    InMemoryContingencyListStore, NetworkFilterEvaluator,
};
use ctg_core::{load_network_from_path, CtgError};
use std::path::PathBuf;
use std::sync::Arc;

fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join(relative)
}

fn service() -> ContingencyListService {
    let records = load_list_records_from_dir(&repo_path("test_data/lists")).unwrap();
    ContingencyListService::new(Arc::new(InMemoryContingencyListStore::with_records(records)))
}

#[test]
fn stored_lists_load_in_file_order() {
    let records = load_list_records_from_dir(&repo_path("test_data/lists")).unwrap();
    let kinds: Vec<ContingencyListKind> = records.iter().map(|r| r.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ContingencyListKind::Form,
            ContingencyListKind::IdentifierList,
            ContingencyListKind::Script
        ]
    );
}

#[test]
fn form_list_exports_matching_generators() {
    let network =
        load_network_from_path(&repo_path("test_data/networks/two_country_grid.yaml")).unwrap();
    let service = service();
    let id = "3c8b7f52-61d4-4f7e-9a0c-5d2e1b9f4a01".parse().unwrap();
    let exported = service
        .export(id, &NetworkFilterEvaluator::new(&network))
        .unwrap();
    let ids: Vec<Option<&str>> = exported
        .contingencies
        .iter()
        .map(|c| c.id.as_deref())
        .collect();
    assert_eq!(ids, vec![Some("GEN_BLAYAIS_1"), Some("GEN_AVELGEM")]);
    assert_eq!(
        exported.contingencies[0].elements,
        vec![ContingencyElement::Generator {
            id: "GEN_BLAYAIS_1".into()
        }]
    );
}

#[test]
fn identifier_list_keeps_unknown_ids_aside() {
    let network =
        load_network_from_path(&repo_path("test_data/networks/two_country_grid.yaml")).unwrap();
    let service = service();
    let id = "9e41d0aa-2b37-4c55-8f61-0c7a3e5d2b02".parse().unwrap();
    let exported = service
        .export(id, &NetworkFilterEvaluator::new(&network))
        .unwrap();
    assert_eq!(exported.contingencies.len(), 2);
    let first = &exported.contingencies[0];
    assert_eq!(first.elements.len(), 2);
    assert!(first.not_found_elements.is_empty());
    let second = &exported.contingencies[1];
    assert_eq!(second.elements.len(), 1);
    assert!(second.not_found_elements.contains("BRESS_AVELGEM_2"));
    assert_eq!(exported.count().not_found_elements, 1);
}

#[test]
fn parallel_export_reports_per_list_results() {
    let network =
        load_network_from_path(&repo_path("test_data/networks/two_country_grid.yaml")).unwrap();
    let service = service();
    let ids: Vec<_> = service.list().unwrap().iter().map(|r| r.id).collect();
    let results = service
        .export_all(&ids, &NetworkFilterEvaluator::new(&network), 0)
        .unwrap();
    assert_eq!(results.len(), 3);
    let failures: Vec<&CtgError> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], CtgError::Configuration(_)));
}

#[test]
fn legacy_script_is_returned_verbatim() {
    let service = service();
    let id = "51f0e7c3-84a9-4d1b-b6e2-7a9c0d3f8e03".parse().unwrap();
    let script = service.script_of(id).unwrap();
    assert!(script.starts_with("for (equipment in network.lines) {\n"));
}
