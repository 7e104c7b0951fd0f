//! Collaborators that turn filters into matched elements.
//!
//! [`NetworkFilterEvaluator`] runs compiled predicates against an in-process
//! [`Network`]. [`FilterServiceClient`] asks the external filter service to
//! evaluate filters it stores, over HTTP.

use crate::config::FilterServiceConfig;
use ctg_core::{CtgError, CtgResult, IdentifiableAttributes, Network};
use ctg_filter::CompiledFilter;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Topology view used to evaluate form and identifier lists.
pub trait FilterEvaluator: Send + Sync {
    /// Elements matching a compiled filter, in network order.
    fn evaluate(&self, filter: &CompiledFilter) -> CtgResult<Vec<IdentifiableAttributes>>;

    /// Attributes of one element, `None` when the id is unknown.
    fn resolve(&self, id: &str) -> Option<IdentifiableAttributes>;
}

pub struct NetworkFilterEvaluator<'n> {
    network: &'n Network,
}

impl<'n> NetworkFilterEvaluator<'n> {
    pub fn new(network: &'n Network) -> Self {
        Self { network }
    }
}

impl FilterEvaluator for NetworkFilterEvaluator<'_> {
    fn evaluate(&self, filter: &CompiledFilter) -> CtgResult<Vec<IdentifiableAttributes>> {
        Ok(filter.matching_attributes(self.network))
    }

    fn resolve(&self, id: &str) -> Option<IdentifiableAttributes> {
        self.network.equipment(id).map(|(_, e)| e.attributes())
    }
}

/// Evaluation of filters stored elsewhere, referenced by UUID.
pub trait FilterExport: Send + Sync {
    fn export(&self, filters: &[Uuid]) -> CtgResult<Vec<IdentifiableAttributes>>;
}

/// Blocking client for `GET {base}/v1/filters/export`.
pub struct FilterServiceClient {
    agent: ureq::Agent,
    base_url: String,
    network_uuid: Uuid,
    variant_id: Option<String>,
}

impl FilterServiceClient {
    pub fn new(
        config: &FilterServiceConfig,
        network_uuid: Uuid,
        variant_id: Option<String>,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            network_uuid,
            variant_id,
        }
    }

    fn export_url(&self) -> String {
        format!("{}/v1/filters/export", self.base_url)
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> CtgError {
        warn!(error = %err, "filter service unreachable");
        CtgError::UpstreamUnavailable(format!("filter service at {}: {err}", self.base_url))
    }

    /// A body that cannot be read in full is an upstream failure; only a
    /// complete body that fails to decode is a parse error.
    fn read_attributes(
        &self,
        response: ureq::Response,
    ) -> CtgResult<Vec<IdentifiableAttributes>> {
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|err| self.unavailable(err))?;
        serde_json::from_slice(&body)
            .map_err(|err| CtgError::Parse(format!("filter service response: {err}")))
    }
}

impl FilterExport for FilterServiceClient {
    fn export(&self, filters: &[Uuid]) -> CtgResult<Vec<IdentifiableAttributes>> {
        let url = self.export_url();
        let mut request = self
            .agent
            .get(&url)
            .query("networkUuid", &self.network_uuid.to_string());
        if let Some(variant) = &self.variant_id {
            request = request.query("variantId", variant);
        }
        for id in filters {
            request = request.query("ids", &id.to_string());
        }
        debug!(url = %url, filters = filters.len(), "exporting filters");

        match request.call() {
            Ok(response) => self.read_attributes(response),
            Err(ureq::Error::Status(404, _)) => Err(CtgError::NotFound(format!(
                "filters {filters:?} on network {}",
                self.network_uuid
            ))),
            Err(ureq::Error::Status(code, _)) => {
                warn!(status = code, "filter service rejected export");
                Err(CtgError::UpstreamUnavailable(format!(
                    "filter service returned status {code}"
                )))
            }
            Err(err) => Err(self.unavailable(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctg_core::{
        Country, Equipment, EquipmentKind, EquipmentType, Kilovolts, Substation, VoltageLevel,
    };
    use ctg_filter::{EquipmentFilterSpec, FilterCompiler};

    #[test]
    fn test_network_evaluator() {
        let mut network = Network::new();
        network
            .add_substation(Substation::new("S1").with_country(Country::new("FR").unwrap()))
            .unwrap();
        network
            .add_voltage_level("S1", VoltageLevel::new("VL1", Kilovolts(225.0)))
            .unwrap();
        network
            .add_equipment(Equipment::new("LOAD1", EquipmentKind::Load), &["VL1"])
            .unwrap();
        let evaluator = NetworkFilterEvaluator::new(&network);
        let compiled =
            FilterCompiler::compile(&EquipmentFilterSpec::new(EquipmentType::Load)).unwrap();
        let matched = evaluator.evaluate(&compiled).unwrap();
        assert_eq!(matched, vec![IdentifiableAttributes::new("LOAD1", EquipmentKind::Load)]);
        assert!(evaluator.resolve("LOAD1").is_some());
        assert!(evaluator.resolve("VL1").is_none());
        assert!(evaluator.resolve("nope").is_none());
    }

    #[test]
    fn test_unreachable_service_is_retryable() {
        let config = FilterServiceConfig {
            base_url: "http://127.0.0.1:1/".into(),
            timeout_seconds: 1,
        };
        let client = FilterServiceClient::new(&config, Uuid::new_v4(), None);
        assert_eq!(client.export_url(), "http://127.0.0.1:1/v1/filters/export");
        let err = client.export(&[Uuid::new_v4()]).unwrap_err();
        assert!(err.is_retryable(), "{err}");
    }
}
