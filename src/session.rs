use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, error};

use crate::gemini::{GeminiClient, GeminiError};
use crate::models::{BrandStrategy, SessionSnapshot, UserInput, ViewState};

/// The single message surfaced for any generation failure. Transport, schema
/// and no-image failures are indistinguishable to the client.
pub const GENERATION_FAILED_MESSAGE: &str =
    "An error occurred while building your brand identity. Please try again later.";

#[derive(Debug, Error)]
#[error("a generation cycle is already in flight")]
pub struct CycleInFlight;

/// The one mutable value in the system. Handlers mutate it through the
/// transition methods below; the snapshot endpoint only reads.
pub struct Session {
    state: ViewState,
    strategy: Option<BrandStrategy>,
    image: Option<String>,
    error: Option<String>,
    updated_at: DateTime<Utc>,
}

pub type SharedSession = Arc<RwLock<Session>>;

impl Session {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
            strategy: None,
            image: None,
            error: None,
            updated_at: Utc::now(),
        }
    }

    pub fn shared() -> SharedSession {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            strategy: self.strategy.clone(),
            image: self.image.clone(),
            error: self.error.clone(),
            updated_at: self.updated_at,
        }
    }

    /// Start a fresh cycle: allowed from Idle, Completed or Error, never
    /// while either generation call is pending. Clears all prior results.
    fn begin_cycle(&mut self) -> Result<(), CycleInFlight> {
        if self.state.is_generating() {
            return Err(CycleInFlight);
        }
        self.strategy = None;
        self.image = None;
        self.error = None;
        self.transition(ViewState::GeneratingText);
        Ok(())
    }

    fn strategy_ready(&mut self, strategy: BrandStrategy) {
        self.strategy = Some(strategy);
        self.transition(ViewState::GeneratingImage);
    }

    fn complete(&mut self, image: String) {
        self.image = Some(image);
        self.transition(ViewState::Completed);
    }

    /// Terminal failure. A strategy stored before the failure stays in
    /// place: text-only partial success remains visible under the banner.
    fn fail(&mut self) {
        self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
        self.transition(ViewState::Error);
    }

    fn transition(&mut self, next: ViewState) {
        info!("🔀 View state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Seam between orchestration and the Gemini client so the cycle can be
/// driven by stubs in tests.
#[async_trait]
pub trait BrandEngine: Send + Sync {
    async fn generate_strategy(&self, input: &UserInput) -> Result<BrandStrategy, GeminiError>;
    async fn generate_image(&self, visual_prompt: &str) -> Result<String, GeminiError>;
}

#[async_trait]
impl BrandEngine for GeminiClient {
    async fn generate_strategy(&self, input: &UserInput) -> Result<BrandStrategy, GeminiError> {
        GeminiClient::generate_strategy(self, input).await
    }

    async fn generate_image(&self, visual_prompt: &str) -> Result<String, GeminiError> {
        GeminiClient::generate_image(self, visual_prompt).await
    }
}

/// Run one full generation cycle against the session: text first, then the
/// image from the strategy's visual prompt. The two calls are strictly
/// sequential and neither is retried. Returns the final snapshot; a failure
/// inside the cycle lands in the snapshot as the Error state, not in the
/// Result, which only rejects submissions racing an in-flight cycle.
pub async fn run_generation_cycle(
    engine: &dyn BrandEngine,
    session: &SharedSession,
    input: UserInput,
) -> Result<SessionSnapshot, CycleInFlight> {
    session.write().begin_cycle()?;
    info!("🚀 Generating brand strategy for {}", input.name);

    let strategy = match engine.generate_strategy(&input).await {
        Ok(strategy) => {
            session.write().strategy_ready(strategy.clone());
            strategy
        }
        Err(e) => {
            error!("❌ Strategy generation failed: {}", e);
            session.write().fail();
            return Ok(session.read().snapshot());
        }
    };

    match engine.generate_image(&strategy.visual_prompt).await {
        Ok(image) => {
            info!("✅ Brand identity completed");
            session.write().complete(image);
        }
        Err(e) => {
            error!("❌ Image generation failed: {}", e);
            session.write().fail();
        }
    }

    Ok(session.read().snapshot())
}
