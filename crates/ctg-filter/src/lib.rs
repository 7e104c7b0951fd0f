//! # ctg-filter: Equipment Filters as Predicates and Scripts
//!
//! Turns a declarative [`EquipmentFilterSpec`] into a [`CompiledFilter`] that
//! can be evaluated directly against a [`ctg_core::Network`] or rendered as a
//! legacy contingency script.
//!
//! ## Pipeline
//!
//! | Stage | Type | Output |
//! |-------|------|--------|
//! | Routing | [`EquipmentClassRouter`] | shape, script collection, country helper |
//! | Voltage | [`NumericRangeCompiler`] | nominal-voltage condition |
//! | Identity / country | [`TopologyPredicateCompiler`] | glob and location conditions |
//! | Orchestration | [`FilterCompiler`] | [`CompiledFilter`] |
//!
//! Each stage returns `Option<Condition>`; `None` means "no constraint" and
//! is dropped, never rendered as `true`.
//!
//! ### Dual-terminal equipment
//!
//! Lines, transformers and HVDC lines are not symmetric in their data model
//! but are symmetric for filtering: a filter pair `(f1, f2)` holds when either
//! `f1` on side 1 and `f2` on side 2, or the other way round.
//!
//! ## Example
//!
//! ```rust
//! use ctg_core::{country_set, EquipmentType};
//! use ctg_filter::{Comparison, EquipmentFilterSpec, FilterCompiler, NumericFilter};
//!
//! let spec = EquipmentFilterSpec::new(EquipmentType::Generator)
//!     .with_voltage_filter1(NumericFilter::compare(Comparison::Equal, 90.0).unwrap())
//!     .with_countries1(country_set(["FR", "BE"]).unwrap());
//!
//! let script = FilterCompiler::to_script(&spec).unwrap();
//! assert!(script.contains("isLocatedIn(['FR','BE'], equipment)"));
//! ```

pub mod compiler;
pub mod condition;
pub mod numeric;
pub mod router;
pub mod script;
pub mod spec;
pub mod topology;

pub use compiler::{CompiledFilter, FilterCompiler};
pub use condition::{Condition, ElementContext, MeasurePoint};
pub use numeric::NumericRangeCompiler;
pub use router::{EquipmentClassRouter, EquipmentRoute, TopologyRole, TopologyShape};
pub use script::render_script;
pub use spec::{
    load_filter_spec_from_path, Comparison, EquipmentFilterSpec, LegacyVoltageFilter,
    NumericFilter, NumericOperator,
};
pub use topology::{match_id, match_name, GlobPattern, TopologyPredicateCompiler};
