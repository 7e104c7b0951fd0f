//! JSON/YAML network documents.
//!
//! A document lists substations (with their voltage levels) and equipment.
//! Equipment references voltage levels by id, in side order; HVDC lines
//! reference their two converter stations instead.
//!
//! ```yaml
//! substations:
//!   - id: S1
//!     country: FR
//!     voltage_levels:
//!       - { id: VL1, nominal_v: 400.0 }
//! equipment:
//!   - { id: GEN1, kind: GENERATOR, terminals: [VL1] }
//! ```

use crate::{
    Country, CtgError, CtgResult, Equipment, EquipmentKind, Kilovolts, Network, Substation,
    VoltageLevel,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub substations: Vec<SubstationDocument>,
    #[serde(default)]
    pub equipment: Vec<EquipmentDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstationDocument {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub voltage_levels: Vec<VoltageLevelDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoltageLevelDocument {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub nominal_v: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentDocument {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: EquipmentKind,
    #[serde(default)]
    pub terminals: Vec<String>,
    #[serde(default)]
    pub converter_stations: Vec<String>,
}

impl NetworkDocument {
    /// Build the topology graph. HVDC lines are wired last so converter
    /// stations may appear anywhere in the document.
    pub fn into_network(self) -> CtgResult<Network> {
        let mut network = Network::new();
        for substation in self.substations {
            network.add_substation(Substation {
                id: substation.id.clone(),
                name: substation.name,
                country: substation.country,
            })?;
            for vl in substation.voltage_levels {
                network.add_voltage_level(
                    &substation.id,
                    VoltageLevel {
                        id: vl.id,
                        name: vl.name,
                        nominal_v: Kilovolts(vl.nominal_v),
                    },
                )?;
            }
        }

        let (hvdc_lines, others): (Vec<_>, Vec<_>) = self
            .equipment
            .into_iter()
            .partition(|e| e.kind == EquipmentKind::HvdcLine);

        for doc in others {
            let terminals: Vec<&str> = doc.terminals.iter().map(String::as_str).collect();
            network.add_equipment(
                Equipment {
                    id: doc.id.clone(),
                    name: doc.name.clone(),
                    kind: doc.kind,
                },
                &terminals,
            )?;
        }

        for doc in hvdc_lines {
            let [station1, station2] = doc.converter_stations.as_slice() else {
                return Err(CtgError::Network(format!(
                    "HVDC line '{}' must reference exactly two converter stations",
                    doc.id
                )));
            };
            network.add_hvdc_line(
                Equipment {
                    id: doc.id.clone(),
                    name: doc.name.clone(),
                    kind: doc.kind,
                },
                station1,
                station2,
            )?;
        }
        Ok(network)
    }
}

/// Parse a document, choosing YAML or JSON by extension and falling back to
/// trying both.
pub fn parse_document<T: serde::de::DeserializeOwned>(
    path: &Path,
    data: &str,
) -> anyhow::Result<T> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(data).context("parsing yaml document")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(data).context("parsing json document")
        }
        _ => serde_yaml::from_str(data)
            .or_else(|_| serde_json::from_str(data))
            .context("parsing document"),
    }
}

pub fn load_network_from_path(path: &Path) -> CtgResult<Network> {
    let data = fs::read_to_string(path)?;
    let doc: NetworkDocument = parse_document(path, &data)
        .with_context(|| format!("reading network '{}'", path.display()))
        .map_err(|err| CtgError::Parse(format!("{err:#}")))?;
    doc.into_network()
}
