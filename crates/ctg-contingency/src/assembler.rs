//! Matched elements → contingencies.
//!
//! Form and filter-based lists yield one contingency per matched element.
//! Identifier lists yield one contingency per named group, with identifiers
//! that do not resolve collected in `notFoundElements` instead of failing.

use crate::element::ContingencyElement;
use ctg_core::{CtgResult, IdentifiableAttributes};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::warn;

/// One contingency as exported to the simulation side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContingencyInfos {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub elements: Vec<ContingencyElement>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub not_found_elements: BTreeSet<String>,
}

impl ContingencyInfos {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Named group of identifiers inside an identifier list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierGroup {
    pub id: String,
    pub identifiers: Vec<String>,
}

pub struct ContingencyAssembler;

impl ContingencyAssembler {
    /// Build one contingency from the upstream matches.
    ///
    /// Elements keep the upstream order; every requested identifier that was
    /// not matched lands in `not_found_elements`. A contingency with no
    /// element is still returned.
    pub fn assemble(
        id: Option<String>,
        matched: &[IdentifiableAttributes],
        requested: &[String],
    ) -> CtgResult<ContingencyInfos> {
        let elements = matched
            .iter()
            .map(ContingencyElement::try_from)
            .collect::<CtgResult<Vec<_>>>()?;
        let matched_ids: HashSet<&str> = matched.iter().map(|a| a.id.as_str()).collect();
        let not_found_elements: BTreeSet<String> = requested
            .iter()
            .filter(|id| !matched_ids.contains(id.as_str()))
            .cloned()
            .collect();
        if !not_found_elements.is_empty() {
            warn!(
                contingency = id.as_deref().unwrap_or("<unnamed>"),
                missing = not_found_elements.len(),
                "contingency references unknown elements"
            );
        }
        Ok(ContingencyInfos {
            id,
            elements,
            not_found_elements,
        })
    }

    /// One contingency per matched element, named after it.
    pub fn per_element(matched: &[IdentifiableAttributes]) -> CtgResult<Vec<ContingencyInfos>> {
        matched
            .iter()
            .map(|attributes| {
                Self::assemble(
                    Some(attributes.id.clone()),
                    std::slice::from_ref(attributes),
                    &[],
                )
            })
            .collect()
    }

    /// One contingency per group; `resolve` looks identifiers up in the
    /// current network.
    pub fn per_group(
        groups: &[IdentifierGroup],
        resolve: impl Fn(&str) -> Option<IdentifiableAttributes>,
    ) -> CtgResult<Vec<ContingencyInfos>> {
        groups
            .iter()
            .map(|group| {
                let matched: Vec<IdentifiableAttributes> = group
                    .identifiers
                    .iter()
                    .filter_map(|id| resolve(id))
                    .collect();
                Self::assemble(Some(group.id.clone()), &matched, &group.identifiers)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctg_core::{CtgError, EquipmentKind};

    fn line(id: &str) -> IdentifiableAttributes {
        IdentifiableAttributes::new(id, EquipmentKind::Line)
    }

    #[test]
    fn test_not_found_is_requested_minus_matched() {
        let requested: Vec<String> = ["A", "B", "C"].map(String::from).to_vec();
        let infos =
            ContingencyAssembler::assemble(None, &[line("A"), line("C")], &requested).unwrap();
        let ids: Vec<&str> = infos.elements.iter().map(ContingencyElement::id).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(infos.not_found_elements, BTreeSet::from(["B".to_string()]));
    }

    #[test]
    fn test_empty_contingency_is_kept() {
        let requested = vec!["X".to_string()];
        let infos = ContingencyAssembler::assemble(Some("g".into()), &[], &requested).unwrap();
        assert!(infos.is_empty());
        assert_eq!(infos.not_found_elements.len(), 1);
    }

    #[test]
    fn test_per_element_names_contingencies() {
        let all = ContingencyAssembler::per_element(&[line("L1"), line("L2")]).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].id.as_deref(), Some("L2"));
        assert_eq!(all[1].elements, vec![ContingencyElement::Line { id: "L2".into() }]);
    }

    #[test]
    fn test_per_group_resolves_identifiers() {
        let groups = vec![IdentifierGroup {
            id: "N-2".into(),
            identifiers: vec!["L1".into(), "GHOST".into(), "L2".into()],
        }];
        let all = ContingencyAssembler::per_group(&groups, |id| {
            id.starts_with('L').then(|| line(id))
        })
        .unwrap();
        assert_eq!(all[0].elements.len(), 2);
        assert!(all[0].not_found_elements.contains("GHOST"));
    }

    #[test]
    fn test_unsupported_kind_fails() {
        let bus = IdentifiableAttributes::new("B1", EquipmentKind::Bus);
        assert!(matches!(
            ContingencyAssembler::per_element(&[bus]),
            Err(CtgError::Configuration(_))
        ));
    }
}
