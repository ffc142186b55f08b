//! Common test utilities for integration tests
//!
//! Record builders and orchestrator fixtures shared across test files.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;

use leadgen::application::{organization_with_client, profile_with_client};
use leadgen::domain::models::Config;
use leadgen::infrastructure::{ScriptedGenerationClient, ScriptedReply};
use leadgen::GenerationOrchestrator;

/// Setup test logging
///
/// Initializes a tracing subscriber writing to the test harness.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Organization record with a registry id
pub fn org(name: &str, registry_id: &str) -> Value {
    json!({ "company_name": name, "registry_id": registry_id })
}

/// Organization record known only by name
pub fn org_named(name: &str) -> Value {
    json!({ "company_name": name })
}

/// Social profile record
pub fn profile(handle: &str) -> Value {
    json!({ "username": handle, "followers": 100 })
}

/// `count` distinct organizations, numbered from `start`
pub fn orgs(start: usize, count: usize) -> Vec<Value> {
    (start..start + count)
        .map(|n| org(&format!("Company {n}"), &format!("REG{n:04}")))
        .collect()
}

pub fn organization_fixture(
    replies: Vec<ScriptedReply<Value>>,
) -> (GenerationOrchestrator<Value>, Arc<ScriptedGenerationClient<Value>>) {
    organization_fixture_with(Config::default(), replies)
}

pub fn organization_fixture_with(
    config: Config,
    replies: Vec<ScriptedReply<Value>>,
) -> (GenerationOrchestrator<Value>, Arc<ScriptedGenerationClient<Value>>) {
    let client = Arc::new(ScriptedGenerationClient::new(replies));
    (organization_with_client(&config, client.clone()), client)
}

pub fn profile_fixture(
    replies: Vec<ScriptedReply<Value>>,
) -> (GenerationOrchestrator<Value>, Arc<ScriptedGenerationClient<Value>>) {
    let client = Arc::new(ScriptedGenerationClient::new(replies));
    (profile_with_client(&Config::default(), client.clone()), client)
}
