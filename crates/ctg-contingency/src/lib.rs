//! # ctg-contingency: Contingency Lists
//!
//! Stores contingency lists and turns them into contingencies for a network
//! snapshot.
//!
//! | List kind | Evaluation | Contingencies |
//! |-----------|------------|---------------|
//! | `FORM` | compiled filter on the [`FilterEvaluator`] | one per matched element |
//! | `IDENTIFIER_LIST` | identifiers resolved on the [`FilterEvaluator`] | one per group |
//! | `FILTER_BASED` | remote [`FilterExport`] | one per matched element |
//! | `SCRIPT` | legacy engine only | not exported |
//!
//! Unknown identifiers never fail an export; they are reported in each
//! contingency's `notFoundElements`.

pub mod assembler;
pub mod config;
pub mod element;
pub mod evaluator;
pub mod service;
pub mod store;

pub use assembler::{ContingencyAssembler, ContingencyInfos, IdentifierGroup};
pub use config::{
    load_service_config, FilterServiceConfig, LoggingConfig, ServiceConfig, WorkerConfig,
};
pub use element::ContingencyElement;
pub use evaluator::{FilterEvaluator, FilterExport, FilterServiceClient, NetworkFilterEvaluator};
pub use service::{ContingencyCount, ContingencyListService, ExportedContingencies};
pub use store::{
    load_list_record_from_path, load_list_records_from_dir, ContingencyListContent,
    ContingencyListKind, ContingencyListRecord, ContingencyListStore, InMemoryContingencyListStore,
};
