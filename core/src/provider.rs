//! One handle for all four entity reconcilers.
//!
//! The client is built once from configuration and cloned into each
//! reconciler, so every entity type talks to the same endpoint through the
//! same transport.

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::reconcile::{DevOpsReconciler, DevReconciler, EngineerReconciler, OpsReconciler};

#[derive(Debug, Clone)]
pub struct Provider {
    pub engineers: EngineerReconciler,
    pub devs: DevReconciler,
    pub ops: OpsReconciler,
    pub devops: DevOpsReconciler,
}

impl Provider {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(ApiClient::new(config))
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self {
            engineers: EngineerReconciler::new(client.clone()),
            devs: DevReconciler::new(client.clone()),
            ops: OpsReconciler::new(client.clone()),
            devops: DevOpsReconciler::new(client),
        }
    }

    pub fn from_env() -> Self {
        Self::new(&ClientConfig::from_env())
    }
}
