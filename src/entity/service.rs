//! Services: endpoints a DID subject advertises, independent of signing authority.

use serde_json::{Map, Value};

use super::full_id;
use crate::error::ClientError;
use crate::validators::{validate_alias, validate_service_endpoint};

/// A service endpoint advertised by a DID.
#[derive(Clone)]
pub struct Service {
    /// Unique alias identifying this service on its DID.
    pub alias: String,
    /// Application-defined service type string.
    pub service_type: String,
    /// The endpoint URL.
    pub endpoint: String,
    /// Minimum management-key priority required to revoke this service.
    pub priority_requirement: Option<u32>,
    /// Additional application-defined fields, flattened into the entry's JSON object.
    pub custom_fields: Map<String, Value>,
}

impl Service {
    /// Builds a new service, validating `alias` and `endpoint`.
    pub fn new(
        alias: impl Into<String>,
        service_type: impl Into<String>,
        endpoint: impl Into<String>,
        priority_requirement: Option<u32>,
        custom_fields: Map<String, Value>,
    ) -> Result<Self, ClientError> {
        let alias = alias.into();
        let service_type = service_type.into();
        let endpoint = endpoint.into();
        validate_alias(&alias)?;
        if service_type.is_empty() {
            return Err(ClientError::InvalidField {
                field: "service type",
                reason: "must not be empty".into(),
            });
        }
        validate_service_endpoint(&endpoint)?;
        Ok(Self { alias, service_type, endpoint, priority_requirement, custom_fields })
    }

    /// Full on-chain identifier of this service (`did#alias`).
    #[must_use]
    pub fn full_id(&self, did: &str) -> String {
        full_id(did, &self.alias)
    }

    /// Serializes this service to the JSON object shape used in entry content.
    #[must_use]
    pub fn to_entry_value(&self, did: &str) -> Value {
        let mut map = Map::new();
        map.insert("id".into(), Value::String(self.full_id(did)));
        map.insert("type".into(), Value::String(self.service_type.clone()));
        map.insert("serviceEndpoint".into(), Value::String(self.endpoint.clone()));
        if let Some(requirement) = self.priority_requirement {
            map.insert("priorityRequirement".into(), Value::from(requirement));
        }
        for (key, value) in &self.custom_fields {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(map)
    }

    /// A hashable identity for set-diff based update tracking.
    #[must_use]
    pub fn identity(&self) -> (String, String, String) {
        (self.alias.clone(), self.service_type.clone(), self.endpoint.clone())
    }
}
