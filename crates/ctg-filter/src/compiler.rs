//! Filter description → compiled predicate.

use crate::condition::{Condition, ElementContext};
use crate::numeric::NumericRangeCompiler;
use crate::router::{EquipmentClassRouter, EquipmentRoute, TopologyRole};
use crate::script::render_script;
use crate::spec::EquipmentFilterSpec;
use crate::topology::TopologyPredicateCompiler;
use ctg_core::{
    CtgResult, Equipment, EquipmentKind, EquipmentType, IdentifiableAttributes, Network, NodeIndex,
};
use tracing::{debug, warn};

/// Predicate over one equipment class.
///
/// Holds at most one condition per category. A missing condition is
/// universally true, so a filter with only an equipment type selects every
/// element of that type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    route: &'static EquipmentRoute,
    numeric: Option<Condition>,
    identity: Option<Condition>,
    country: Option<Condition>,
}

impl CompiledFilter {
    pub fn equipment_type(&self) -> EquipmentType {
        self.route.equipment_type
    }

    pub fn route(&self) -> &'static EquipmentRoute {
        self.route
    }

    /// Non-universal conditions, in numeric, identity, country order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> + '_ {
        [&self.numeric, &self.identity, &self.country]
            .into_iter()
            .flatten()
    }

    pub fn is_universal(&self) -> bool {
        self.conditions().next().is_none()
    }

    /// Test one network element. Elements of another class never match.
    pub fn matches(&self, network: &Network, node: NodeIndex) -> bool {
        let Some(equipment) = network.equipment_at(node) else {
            return false;
        };
        if equipment.kind != EquipmentKind::from(self.equipment_type()) {
            return false;
        }
        let ctx = ElementContext {
            network,
            node,
            equipment,
        };
        self.conditions().all(|c| c.matches(&ctx))
    }

    /// Matching elements in network order.
    pub fn matching_elements<'n>(&self, network: &'n Network) -> Vec<&'n Equipment> {
        network
            .equipments_of_kind(self.equipment_type().into())
            .filter(|(idx, _)| self.matches(network, *idx))
            .map(|(_, e)| e)
            .collect()
    }

    pub fn matching_attributes(&self, network: &Network) -> Vec<IdentifiableAttributes> {
        self.matching_elements(network)
            .into_iter()
            .map(Equipment::attributes)
            .collect()
    }

    /// Legacy script equivalent of this filter.
    pub fn to_script(&self) -> String {
        render_script(self.route.collection, self.conditions())
    }
}

pub struct FilterCompiler;

impl FilterCompiler {
    pub fn compile(spec: &EquipmentFilterSpec) -> CtgResult<CompiledFilter> {
        spec.validate()?;
        let route = EquipmentClassRouter::route(spec.equipment_type);

        if route.role() == TopologyRole::SingleTerminal
            && (spec.voltage_filter2.is_some() || !spec.countries2.is_empty())
        {
            warn!(
                equipment_type = %spec.equipment_type,
                "second-side constraints are ignored for single-terminal equipment"
            );
        }

        let numeric = NumericRangeCompiler::compile(
            route.shape,
            spec.voltage_filter1.as_ref(),
            spec.voltage_filter2.as_ref(),
        );
        let identity = TopologyPredicateCompiler::compile_identity(
            spec.id_pattern.as_deref(),
            spec.name_pattern.as_deref(),
        );
        let country =
            TopologyPredicateCompiler::compile_country(route, &spec.countries1, &spec.countries2);

        let compiled = CompiledFilter {
            route,
            numeric,
            identity,
            country,
        };
        debug!(
            equipment_type = %spec.equipment_type,
            conditions = compiled.conditions().count(),
            "compiled equipment filter"
        );
        Ok(compiled)
    }

    /// Compile and render in one step.
    pub fn to_script(spec: &EquipmentFilterSpec) -> CtgResult<String> {
        Ok(Self::compile(spec)?.to_script())
    }
}
