//! # ctg-core: Grid Topology Model for Contingency Lists
//!
//! Provides the data structures the contingency-list compiler queries:
//! substations, voltage levels and equipment, wired together in a directed
//! petgraph graph.
//!
//! ## Graph Shape
//!
//! ```text
//! Equipment ──Terminal(side)──▶ VoltageLevel ──LocatedIn──▶ Substation (country)
//! HvdcLine ──ConverterStation(side)──▶ Equipment(HVDC_CONVERTER_STATION)
//! ```
//!
//! Country and nominal voltage are never stored on equipment: they are reached
//! by walking terminal → voltage level → substation, which is exactly what the
//! filter predicates do.
//!
//! ## Quick Start
//!
//! ```rust
//! use ctg_core::*;
//!
//! let mut network = Network::new();
//! network
//!     .add_substation(Substation::new("S1").with_country(Country::new("FR").unwrap()))
//!     .unwrap();
//! network
//!     .add_voltage_level("S1", VoltageLevel::new("VL1", Kilovolts(225.0)))
//!     .unwrap();
//! network
//!     .add_equipment(Equipment::new("GEN1", EquipmentKind::Generator), &["VL1"])
//!     .unwrap();
//!
//! let terminals = network.terminals_of("GEN1").unwrap();
//! assert_eq!(network.nominal_voltage_of(&terminals[0]), Some(Kilovolts(225.0)));
//! assert_eq!(network.country_of(&terminals[0]).map(Country::code), Some("FR"));
//! ```
//!
//! ## Modules
//!
//! - [`country`] - Country codes and ordered country sets
//! - [`equipment`] - Equipment types/kinds and matched-element attributes
//! - [`loader`] - JSON/YAML network documents
//! - [`units`] - Voltage newtype

use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

pub mod country;
pub mod equipment;
pub mod error;
pub mod loader;
pub mod units;

pub use country::{country_set, Country, CountrySet};
pub use equipment::{EquipmentKind, EquipmentType, IdentifiableAttributes, Side};
pub use error::{CtgError, CtgResult};
pub use loader::{load_network_from_path, NetworkDocument};
pub use petgraph::graph::NodeIndex;
pub use units::Kilovolts;

#[derive(Debug, Clone)]
pub struct Substation {
    pub id: String,
    pub name: Option<String>,
    /// Country of the substation, when known
    pub country: Option<Country>,
}

impl Substation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            country: None,
        }
    }

    pub fn with_country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }
}

#[derive(Debug, Clone)]
pub struct VoltageLevel {
    pub id: String,
    pub name: Option<String>,
    pub nominal_v: Kilovolts,
}

impl VoltageLevel {
    pub fn new(id: impl Into<String>, nominal_v: Kilovolts) -> Self {
        Self {
            id: id.into(),
            name: None,
            nominal_v,
        }
    }
}

/// Any element that can appear in a contingency or carry a terminal.
#[derive(Debug, Clone)]
pub struct Equipment {
    pub id: String,
    pub name: Option<String>,
    pub kind: EquipmentKind,
}

impl Equipment {
    pub fn new(id: impl Into<String>, kind: EquipmentKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn attributes(&self) -> IdentifiableAttributes {
        IdentifiableAttributes::new(self.id.clone(), self.kind)
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Substation(Substation),
    VoltageLevel(VoltageLevel),
    Equipment(Equipment),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Substation(s) => &s.id,
            Node::VoltageLevel(vl) => &vl.id,
            Node::Equipment(e) => &e.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Voltage level → owning substation
    LocatedIn,
    /// Equipment → voltage level it connects to
    Terminal(Side),
    /// HVDC line → converter station
    ConverterStation(Side),
}

/// One connection point of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    pub side: Side,
    pub voltage_level: NodeIndex,
}

/// The topology graph of one network variant.
#[derive(Debug, Default)]
pub struct Network {
    pub graph: DiGraph<Node, Edge>,
    index: HashMap<String, NodeIndex>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, node: Node) -> CtgResult<NodeIndex> {
        let id = node.id().to_string();
        if id.trim().is_empty() {
            return Err(CtgError::Network("identifier cannot be empty".into()));
        }
        if self.index.contains_key(&id) {
            return Err(CtgError::Network(format!("duplicate identifier '{id}'")));
        }
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Ok(idx)
    }

    pub fn add_substation(&mut self, substation: Substation) -> CtgResult<NodeIndex> {
        self.register(Node::Substation(substation))
    }

    pub fn add_voltage_level(
        &mut self,
        substation_id: &str,
        voltage_level: VoltageLevel,
    ) -> CtgResult<NodeIndex> {
        let substation = self.expect_node(substation_id, |n| matches!(n, Node::Substation(_)))?;
        if !voltage_level.nominal_v.is_finite() {
            return Err(CtgError::Network(format!(
                "voltage level '{}' has a non-finite nominal voltage",
                voltage_level.id
            )));
        }
        let idx = self.register(Node::VoltageLevel(voltage_level))?;
        self.graph.add_edge(idx, substation, Edge::LocatedIn);
        Ok(idx)
    }

    /// Add an element connected to the given voltage levels, in side order.
    pub fn add_equipment(
        &mut self,
        equipment: Equipment,
        voltage_levels: &[&str],
    ) -> CtgResult<NodeIndex> {
        if equipment.kind == EquipmentKind::HvdcLine {
            return Err(CtgError::Network(format!(
                "HVDC line '{}' connects through converter stations; use add_hvdc_line",
                equipment.id
            )));
        }
        let expected = equipment.kind.terminal_count();
        if voltage_levels.len() != expected {
            return Err(CtgError::Network(format!(
                "'{}' needs {expected} terminal(s), got {}",
                equipment.id,
                voltage_levels.len()
            )));
        }
        let targets = voltage_levels
            .iter()
            .map(|vl| self.expect_node(vl, |n| matches!(n, Node::VoltageLevel(_))))
            .collect::<CtgResult<Vec<_>>>()?;
        let idx = self.register(Node::Equipment(equipment))?;
        for (side, vl) in Side::ALL.into_iter().zip(targets) {
            self.graph.add_edge(idx, vl, Edge::Terminal(side));
        }
        Ok(idx)
    }

    /// Add an HVDC line between two existing converter stations.
    pub fn add_hvdc_line(
        &mut self,
        line: Equipment,
        station1: &str,
        station2: &str,
    ) -> CtgResult<NodeIndex> {
        if line.kind != EquipmentKind::HvdcLine {
            return Err(CtgError::Network(format!(
                "'{}' is a {:?}, not an HVDC line",
                line.id, line.kind
            )));
        }
        let is_station = |n: &Node| {
            matches!(n, Node::Equipment(e) if e.kind == EquipmentKind::HvdcConverterStation)
        };
        let cs1 = self.expect_node(station1, is_station)?;
        let cs2 = self.expect_node(station2, is_station)?;
        let idx = self.register(Node::Equipment(line))?;
        self.graph.add_edge(idx, cs1, Edge::ConverterStation(Side::One));
        self.graph.add_edge(idx, cs2, Edge::ConverterStation(Side::Two));
        Ok(idx)
    }

    fn expect_node(&self, id: &str, accept: impl Fn(&Node) -> bool) -> CtgResult<NodeIndex> {
        match self.index.get(id) {
            Some(&idx) if accept(&self.graph[idx]) => Ok(idx),
            Some(_) => Err(CtgError::Network(format!(
                "'{id}' exists but has the wrong element kind"
            ))),
            None => Err(CtgError::Network(format!("unknown element '{id}'"))),
        }
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn equipment_at(&self, idx: NodeIndex) -> Option<&Equipment> {
        match self.graph.node_weight(idx) {
            Some(Node::Equipment(e)) => Some(e),
            _ => None,
        }
    }

    pub fn equipment(&self, id: &str) -> Option<(NodeIndex, &Equipment)> {
        let idx = self.node_index(id)?;
        self.equipment_at(idx).map(|e| (idx, e))
    }

    /// All equipment in insertion order.
    pub fn equipments(&self) -> impl Iterator<Item = (NodeIndex, &Equipment)> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.equipment_at(idx).map(|e| (idx, e)))
    }

    pub fn equipments_of_kind(
        &self,
        kind: EquipmentKind,
    ) -> impl Iterator<Item = (NodeIndex, &Equipment)> + '_ {
        self.equipments().filter(move |(_, e)| e.kind == kind)
    }

    /// Terminals of an element, ordered by side.
    pub fn terminals(&self, idx: NodeIndex) -> Vec<Terminal> {
        let mut terminals: Vec<Terminal> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|edge| match edge.weight() {
                Edge::Terminal(side) => Some(Terminal {
                    side: *side,
                    voltage_level: edge.target(),
                }),
                _ => None,
            })
            .collect();
        terminals.sort_by_key(|t| t.side);
        terminals
    }

    pub fn terminals_of(&self, id: &str) -> Option<Vec<Terminal>> {
        self.node_index(id).map(|idx| self.terminals(idx))
    }

    pub fn terminal(&self, idx: NodeIndex, side: Side) -> Option<Terminal> {
        self.terminals(idx).into_iter().find(|t| t.side == side)
    }

    pub fn converter_station(&self, hvdc_line: NodeIndex, side: Side) -> Option<NodeIndex> {
        self.graph
            .edges_directed(hvdc_line, Direction::Outgoing)
            .find(|edge| *edge.weight() == Edge::ConverterStation(side))
            .map(|edge| edge.target())
    }

    pub fn voltage_level(&self, terminal: &Terminal) -> Option<&VoltageLevel> {
        match self.graph.node_weight(terminal.voltage_level) {
            Some(Node::VoltageLevel(vl)) => Some(vl),
            _ => None,
        }
    }

    pub fn substation_of(&self, voltage_level: NodeIndex) -> Option<&Substation> {
        self.graph
            .edges_directed(voltage_level, Direction::Outgoing)
            .filter(|edge| *edge.weight() == Edge::LocatedIn)
            .find_map(|edge| match &self.graph[edge.target()] {
                Node::Substation(s) => Some(s),
                _ => None,
            })
    }

    pub fn nominal_voltage_of(&self, terminal: &Terminal) -> Option<Kilovolts> {
        self.voltage_level(terminal).map(|vl| vl.nominal_v)
    }

    pub fn country_of(&self, terminal: &Terminal) -> Option<&Country> {
        self.substation_of(terminal.voltage_level)?
            .country
            .as_ref()
    }

    pub fn has_name(&self, id: &str) -> bool {
        self.node_index(id)
            .and_then(|idx| self.equipment_at(idx))
            .is_some_and(|e| e.name.is_some())
    }

    /// Compute basic statistics about the network
    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats::default();
        for node in self.graph.node_weights() {
            match node {
                Node::Substation(_) => stats.num_substations += 1,
                Node::VoltageLevel(_) => stats.num_voltage_levels += 1,
                Node::Equipment(_) => stats.num_equipments += 1,
            }
        }
        stats
    }
}

/// Statistics about a network's size
#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub num_substations: usize,
    pub num_voltage_levels: usize,
    pub num_equipments: usize,
}

impl std::fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} substations, {} voltage levels, {} equipments",
            self.num_substations, self.num_voltage_levels, self.num_equipments
        )
    }
}
