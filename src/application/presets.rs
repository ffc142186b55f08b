//! Ready-made orchestrators for the two search use-cases.
//!
//! Both work on raw JSON records; identity and request fields come from the
//! endpoint configuration.

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::orchestrator::{GenerationOrchestrator, SessionLimits};
use crate::domain::models::{Config, EndpointConfig, GenerationConfig};
use crate::domain::ports::{GenerationClient, TokenProvider};
use crate::infrastructure::http::{HttpClientConfig, HttpGenerationClient};
use crate::services::{
    ClassificationPolicy, JsonRequestBuilder, OrganizationIdentity, ProfileIdentity,
};

/// Session limits from the `generation` config section
pub fn session_limits(generation: &GenerationConfig) -> SessionLimits {
    SessionLimits {
        max_attempts: generation.max_attempts,
        time_budget: generation.time_budget_secs.map(Duration::from_secs),
    }
}

/// Bulk organization search over HTTP
pub fn organization_orchestrator(
    config: &Config,
    tokens: Arc<dyn TokenProvider>,
) -> Result<GenerationOrchestrator<Value>> {
    let client = http_client(config, &config.organization, tokens)?;
    Ok(organization_with_client(config, client))
}

/// Social profile search over HTTP
pub fn profile_orchestrator(
    config: &Config,
    tokens: Arc<dyn TokenProvider>,
) -> Result<GenerationOrchestrator<Value>> {
    let client = http_client(config, &config.profile, tokens)?;
    Ok(profile_with_client(config, client))
}

/// Bulk organization search over any client
pub fn organization_with_client(
    config: &Config,
    client: Arc<dyn GenerationClient<Value>>,
) -> GenerationOrchestrator<Value> {
    let endpoint = &config.organization;
    GenerationOrchestrator::new(
        client,
        Arc::new(OrganizationIdentity::from_endpoint(endpoint)),
        Arc::new(JsonRequestBuilder::from_endpoint(endpoint)),
        ClassificationPolicy::named(endpoint.policy),
    )
    .with_limits(session_limits(&config.generation))
}

/// Social profile search over any client
pub fn profile_with_client(
    config: &Config,
    client: Arc<dyn GenerationClient<Value>>,
) -> GenerationOrchestrator<Value> {
    let endpoint = &config.profile;
    GenerationOrchestrator::new(
        client,
        Arc::new(ProfileIdentity::from_endpoint(endpoint)),
        Arc::new(JsonRequestBuilder::from_endpoint(endpoint)),
        ClassificationPolicy::named(endpoint.policy),
    )
    .with_limits(session_limits(&config.generation))
}

fn http_client(
    config: &Config,
    endpoint: &EndpointConfig,
    tokens: Arc<dyn TokenProvider>,
) -> Result<Arc<dyn GenerationClient<Value>>> {
    let client = HttpGenerationClient::new(HttpClientConfig::new(&config.api, endpoint), tokens)?;
    Ok(Arc::new(client))
}
