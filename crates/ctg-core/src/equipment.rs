//! Equipment classification.
//!
//! Two closed enums describe network elements:
//!
//! - [`EquipmentType`]: the types a contingency filter may target.
//! - [`EquipmentKind`]: every kind of element the network model or a filter
//!   service can report. It is a superset of `EquipmentType`; the extra kinds
//!   (converter stations, buses) are topology-only and can never be tripped
//!   on their own.

use crate::error::CtgError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Equipment types accepted by a contingency filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentType {
    Generator,
    Load,
    Battery,
    ShuntCompensator,
    StaticVarCompensator,
    BusbarSection,
    DanglingLine,
    HvdcLine,
    Line,
    TwoWindingsTransformer,
    ThreeWindingsTransformer,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 11] = [
        EquipmentType::Generator,
        EquipmentType::Load,
        EquipmentType::Battery,
        EquipmentType::ShuntCompensator,
        EquipmentType::StaticVarCompensator,
        EquipmentType::BusbarSection,
        EquipmentType::DanglingLine,
        EquipmentType::HvdcLine,
        EquipmentType::Line,
        EquipmentType::TwoWindingsTransformer,
        EquipmentType::ThreeWindingsTransformer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Generator => "GENERATOR",
            EquipmentType::Load => "LOAD",
            EquipmentType::Battery => "BATTERY",
            EquipmentType::ShuntCompensator => "SHUNT_COMPENSATOR",
            EquipmentType::StaticVarCompensator => "STATIC_VAR_COMPENSATOR",
            EquipmentType::BusbarSection => "BUSBAR_SECTION",
            EquipmentType::DanglingLine => "DANGLING_LINE",
            EquipmentType::HvdcLine => "HVDC_LINE",
            EquipmentType::Line => "LINE",
            EquipmentType::TwoWindingsTransformer => "TWO_WINDINGS_TRANSFORMER",
            EquipmentType::ThreeWindingsTransformer => "THREE_WINDINGS_TRANSFORMER",
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentType {
    type Err = CtgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EquipmentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CtgError::Configuration(format!("unknown equipment type '{s}'")))
    }
}

/// Every kind of element known to the topology model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentKind {
    Generator,
    Load,
    Battery,
    ShuntCompensator,
    StaticVarCompensator,
    BusbarSection,
    DanglingLine,
    HvdcLine,
    Line,
    TwoWindingsTransformer,
    ThreeWindingsTransformer,
    HvdcConverterStation,
    Bus,
}

impl EquipmentKind {
    /// Filterable type for this kind, `None` for topology-only kinds.
    pub fn equipment_type(&self) -> Option<EquipmentType> {
        match self {
            EquipmentKind::Generator => Some(EquipmentType::Generator),
            EquipmentKind::Load => Some(EquipmentType::Load),
            EquipmentKind::Battery => Some(EquipmentType::Battery),
            EquipmentKind::ShuntCompensator => Some(EquipmentType::ShuntCompensator),
            EquipmentKind::StaticVarCompensator => Some(EquipmentType::StaticVarCompensator),
            EquipmentKind::BusbarSection => Some(EquipmentType::BusbarSection),
            EquipmentKind::DanglingLine => Some(EquipmentType::DanglingLine),
            EquipmentKind::HvdcLine => Some(EquipmentType::HvdcLine),
            EquipmentKind::Line => Some(EquipmentType::Line),
            EquipmentKind::TwoWindingsTransformer => Some(EquipmentType::TwoWindingsTransformer),
            EquipmentKind::ThreeWindingsTransformer => {
                Some(EquipmentType::ThreeWindingsTransformer)
            }
            EquipmentKind::HvdcConverterStation | EquipmentKind::Bus => None,
        }
    }

    /// Number of electrical terminals an element of this kind owns directly.
    ///
    /// HVDC lines own none: they reach the grid through their two converter
    /// stations.
    pub fn terminal_count(&self) -> usize {
        match self {
            EquipmentKind::HvdcLine => 0,
            EquipmentKind::Line | EquipmentKind::TwoWindingsTransformer => 2,
            EquipmentKind::ThreeWindingsTransformer => 3,
            EquipmentKind::Generator
            | EquipmentKind::Load
            | EquipmentKind::Battery
            | EquipmentKind::ShuntCompensator
            | EquipmentKind::StaticVarCompensator
            | EquipmentKind::BusbarSection
            | EquipmentKind::DanglingLine
            | EquipmentKind::HvdcConverterStation
            | EquipmentKind::Bus => 1,
        }
    }
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentKind::HvdcConverterStation => f.write_str("HVDC_CONVERTER_STATION"),
            EquipmentKind::Bus => f.write_str("BUS"),
            other => match other.equipment_type() {
                Some(t) => f.write_str(t.as_str()),
                None => write!(f, "{other:?}"),
            },
        }
    }
}

impl From<EquipmentType> for EquipmentKind {
    fn from(value: EquipmentType) -> Self {
        match value {
            EquipmentType::Generator => EquipmentKind::Generator,
            EquipmentType::Load => EquipmentKind::Load,
            EquipmentType::Battery => EquipmentKind::Battery,
            EquipmentType::ShuntCompensator => EquipmentKind::ShuntCompensator,
            EquipmentType::StaticVarCompensator => EquipmentKind::StaticVarCompensator,
            EquipmentType::BusbarSection => EquipmentKind::BusbarSection,
            EquipmentType::DanglingLine => EquipmentKind::DanglingLine,
            EquipmentType::HvdcLine => EquipmentKind::HvdcLine,
            EquipmentType::Line => EquipmentKind::Line,
            EquipmentType::TwoWindingsTransformer => EquipmentKind::TwoWindingsTransformer,
            EquipmentType::ThreeWindingsTransformer => EquipmentKind::ThreeWindingsTransformer,
        }
    }
}

/// Terminal (or converter station) side of a multi-ended element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    One,
    Two,
    Three,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::One, Side::Two, Side::Three];
}

/// Minimal description of one element matched by a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiableAttributes {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EquipmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_key: Option<f64>,
}

impl IdentifiableAttributes {
    pub fn new(id: impl Into<String>, kind: EquipmentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            distribution_key: None,
        }
    }
}
