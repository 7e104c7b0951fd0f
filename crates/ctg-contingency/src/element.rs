//! Typed contingency elements.

use ctg_core::{CtgError, EquipmentType, IdentifiableAttributes};
use serde::{Deserialize, Serialize};

/// One outage inside a contingency, tagged by equipment class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContingencyElement {
    Generator { id: String },
    Load { id: String },
    Battery { id: String },
    ShuntCompensator { id: String },
    StaticVarCompensator { id: String },
    BusbarSection { id: String },
    DanglingLine { id: String },
    HvdcLine { id: String },
    Line { id: String },
    TwoWindingsTransformer { id: String },
    ThreeWindingsTransformer { id: String },
}

impl ContingencyElement {
    pub fn new(equipment_type: EquipmentType, id: impl Into<String>) -> Self {
        let id = id.into();
        match equipment_type {
            EquipmentType::Generator => ContingencyElement::Generator { id },
            EquipmentType::Load => ContingencyElement::Load { id },
            EquipmentType::Battery => ContingencyElement::Battery { id },
            EquipmentType::ShuntCompensator => ContingencyElement::ShuntCompensator { id },
            EquipmentType::StaticVarCompensator => ContingencyElement::StaticVarCompensator { id },
            EquipmentType::BusbarSection => ContingencyElement::BusbarSection { id },
            EquipmentType::DanglingLine => ContingencyElement::DanglingLine { id },
            EquipmentType::HvdcLine => ContingencyElement::HvdcLine { id },
            EquipmentType::Line => ContingencyElement::Line { id },
            EquipmentType::TwoWindingsTransformer => {
                ContingencyElement::TwoWindingsTransformer { id }
            }
            EquipmentType::ThreeWindingsTransformer => {
                ContingencyElement::ThreeWindingsTransformer { id }
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ContingencyElement::Generator { id }
            | ContingencyElement::Load { id }
            | ContingencyElement::Battery { id }
            | ContingencyElement::ShuntCompensator { id }
            | ContingencyElement::StaticVarCompensator { id }
            | ContingencyElement::BusbarSection { id }
            | ContingencyElement::DanglingLine { id }
            | ContingencyElement::HvdcLine { id }
            | ContingencyElement::Line { id }
            | ContingencyElement::TwoWindingsTransformer { id }
            | ContingencyElement::ThreeWindingsTransformer { id } => id,
        }
    }

    pub fn equipment_type(&self) -> EquipmentType {
        match self {
            ContingencyElement::Generator { .. } => EquipmentType::Generator,
            ContingencyElement::Load { .. } => EquipmentType::Load,
            ContingencyElement::Battery { .. } => EquipmentType::Battery,
            ContingencyElement::ShuntCompensator { .. } => EquipmentType::ShuntCompensator,
            ContingencyElement::StaticVarCompensator { .. } => EquipmentType::StaticVarCompensator,
            ContingencyElement::BusbarSection { .. } => EquipmentType::BusbarSection,
            ContingencyElement::DanglingLine { .. } => EquipmentType::DanglingLine,
            ContingencyElement::HvdcLine { .. } => EquipmentType::HvdcLine,
            ContingencyElement::Line { .. } => EquipmentType::Line,
            ContingencyElement::TwoWindingsTransformer { .. } => {
                EquipmentType::TwoWindingsTransformer
            }
            ContingencyElement::ThreeWindingsTransformer { .. } => {
                EquipmentType::ThreeWindingsTransformer
            }
        }
    }
}

impl TryFrom<&IdentifiableAttributes> for ContingencyElement {
    type Error = CtgError;

    /// Kinds outside the filterable set (converter stations, buses) have no
    /// contingency element.
    fn try_from(attributes: &IdentifiableAttributes) -> Result<Self, Self::Error> {
        match attributes.kind.equipment_type() {
            Some(equipment_type) => Ok(ContingencyElement::new(
                equipment_type,
                attributes.id.clone(),
            )),
            None => Err(CtgError::Configuration(format!(
                "'{}' has kind {} which cannot be part of a contingency",
                attributes.id, attributes.kind
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctg_core::EquipmentKind;

    #[test]
    fn test_every_type_dispatches_to_its_variant() {
        for t in EquipmentType::ALL {
            let attrs = IdentifiableAttributes::new("X", t.into());
            let element = ContingencyElement::try_from(&attrs).unwrap();
            assert_eq!(element.equipment_type(), t);
            assert_eq!(element.id(), "X");
        }
    }

    #[test]
    fn test_converter_station_has_no_element() {
        let attrs = IdentifiableAttributes::new("CS1", EquipmentKind::HvdcConverterStation);
        let err = ContingencyElement::try_from(&attrs).unwrap_err();
        assert!(matches!(err, CtgError::Configuration(_)));
        assert!(err.to_string().contains("HVDC_CONVERTER_STATION"));
    }

    #[test]
    fn test_json_shape() {
        let element = ContingencyElement::new(EquipmentType::TwoWindingsTransformer, "T1");
        assert_eq!(
            serde_json::to_string(&element).unwrap(),
            r#"{"type":"TWO_WINDINGS_TRANSFORMER","id":"T1"}"#
        );
    }
}
