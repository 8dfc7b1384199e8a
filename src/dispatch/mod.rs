//! Routes operation names to upstream calls.
//!
//! Both shells hold a [`Dispatcher`] and never talk to the upstream client
//! directly, so validation and error mapping live in one place.

mod envelope;
mod handlers;
mod registry;

#[cfg(test)]
mod dispatcher_test;
#[cfg(test)]
mod handlers_test;

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::schema::RawInput;
use crate::upstream::{GatewayError, GatewayResult, UpstreamClient};

pub use envelope::Envelope;
pub use handlers::{Handler, take_id};
pub use registry::{Operation, OperationInfo, OperationRegistry};

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<UpstreamClient>,
    registry: Arc<OperationRegistry>,
}

impl Dispatcher {
    /// Dispatcher over every standard operation.
    pub fn new(client: UpstreamClient) -> Self {
        Self::with_registry(client, OperationRegistry::standard())
    }

    pub fn with_registry(client: UpstreamClient, registry: OperationRegistry) -> Self {
        Self {
            client: Arc::new(client),
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> Vec<OperationInfo> {
        self.registry.catalog()
    }

    /// Run `name` with `params`. `null` params count as no parameters.
    #[instrument(skip(self, params))]
    pub async fn dispatch(&self, name: &str, params: Value) -> GatewayResult<Value> {
        let Some(operation) = self.registry.get(name) else {
            warn!(operation = name, "unknown operation");
            return Err(GatewayError::UnknownOperation {
                name: name.to_string(),
            });
        };

        let params = match params {
            Value::Null => RawInput::new(),
            Value::Object(map) => map,
            _ => {
                return Err(GatewayError::InvalidRequest {
                    message: "Parameters must be a JSON object".to_string(),
                });
            }
        };

        info!(operation = name, "dispatching");
        let result = (operation.handler)(&self.client, params).await;
        if let Err(e) = &result {
            warn!(operation = name, error = %e, "operation failed");
        }
        result
    }

    pub async fn health(&self) -> GatewayResult<Value> {
        self.client.health_check().await
    }
}
