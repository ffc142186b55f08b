//! Session orchestration: the generation loop and its presets

pub mod orchestrator;
pub mod presets;
pub mod session;

pub use orchestrator::{GenerationOrchestrator, SessionHandle, SessionLimits, DEFAULT_MAX_ATTEMPTS};
pub use presets::{
    organization_orchestrator, organization_with_client, profile_orchestrator, profile_with_client,
    session_limits,
};
pub use session::GenerationSession;
