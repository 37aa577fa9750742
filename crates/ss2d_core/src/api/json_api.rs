//! JSON entry point for one-shot decisions
//!
//! A request carries optional parameter overrides plus one snapshot and is
//! answered inside the standard response envelope. Used by the replay tool
//! and by transports that prefer a stateless call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::engine::action_queue::{fallback_actions, Action};
use crate::engine::config::TacticsConfig;
use crate::engine::decision::{run_cycle, AgentMemory, TacticFamily};
use crate::engine::reach::InterceptTable;
use crate::engine::strategy::StarterStrategy;
use crate::error::{DecisionError, Result};
use crate::models::player_type::{PlayerType, PlayerTypeTable};
use crate::models::server_param::ServerParam;
use crate::models::world::WorldSnapshot;

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string() }
    }
}

impl From<&DecisionError> for ApiError {
    fn from(e: &DecisionError) -> Self {
        let code = match e {
            DecisionError::UnknownAgent { .. } => "UNKNOWN_AGENT",
            DecisionError::NotAPlayer { .. } => "NOT_A_PLAYER",
            DecisionError::InvalidRequest(_) => "INVALID_JSON",
            DecisionError::InvalidSnapshot { .. } => "INVALID_SNAPSHOT",
            DecisionError::Panicked { .. } => "DECISION_PANICKED",
        };
        ApiError::new(code, &e.to_string())
    }
}

/// One stateless decision request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub server_param: Option<ServerParam>,
    #[serde(default)]
    pub player_types: Vec<PlayerType>,
    #[serde(default)]
    pub config: Option<TacticsConfig>,
    /// Flags carried over from the previous cycle.
    #[serde(default)]
    pub memory: Option<AgentMemory>,
    pub snapshot: WorldSnapshot,
}

impl DecisionRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn server_param(&self) -> ServerParam {
        self.server_param.clone().unwrap_or_default()
    }

    pub fn player_type_table(&self, sp: &ServerParam) -> PlayerTypeTable {
        let mut table = PlayerTypeTable::new(sp);
        for pt in &self.player_types {
            table.insert(pt.clone(), sp);
        }
        table
    }

    pub fn tactics_config(&self) -> TacticsConfig {
        self.config.clone().unwrap_or_else(TacticsConfig::from_env_or_default)
    }

    /// Reach cycles for the request's snapshot.
    pub fn intercept_table(&self) -> Result<InterceptTable> {
        self.snapshot.validate()?;
        let sp = self.server_param();
        let types = self.player_type_table(&sp);
        Ok(InterceptTable::build(&self.snapshot, &sp, &types, &self.tactics_config().reach))
    }
}

/// Result of a stateless decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    /// `None` when the fallback set was sent instead.
    pub family: Option<TacticFamily>,
    pub actions: Vec<Action>,
    /// Flags to send back with the next request.
    pub memory: AgentMemory,
}

/// Run one pass for `request`.
pub fn decide_request(request: &DecisionRequest) -> Result<DecisionResponse> {
    request.snapshot.validate()?;
    let sp = request.server_param();
    let types = request.player_type_table(&sp);
    let config = request.tactics_config();
    let mut strategy = StarterStrategy::new();
    let mut memory = request.memory.clone().unwrap_or_default();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run_cycle(&request.snapshot, &sp, &types, &config, &mut strategy, &mut memory)
    }));
    let decision = result.map_err(|_| DecisionError::Panicked {
        cycle: request.snapshot.cycle,
        message: "decision pass panicked".to_string(),
    })?;
    debug!(cycle = request.snapshot.cycle, family = decision.family.label(), "decided");
    Ok(DecisionResponse { family: Some(decision.family), actions: decision.actions, memory })
}

/// JSON in, enveloped JSON out. Snapshot problems still answer with the
/// fallback set; malformed requests answer with an error envelope.
pub fn decide_json(request_json: &str) -> String {
    let request = match DecisionRequest::from_json(request_json) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to parse DecisionRequest: {}", e);
            let response: ApiResponse<DecisionResponse> = ApiResponse::error(ApiError::from(&e));
            return serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string());
        }
    };

    let response = match decide_request(&request) {
        Ok(data) => ApiResponse::success(data),
        Err(e) if e.is_recoverable() => {
            warn!(cycle = request.snapshot.cycle, error = %e, "sending fallback actions");
            ApiResponse::success(DecisionResponse {
                family: None,
                actions: fallback_actions(),
                memory: request.memory.clone().unwrap_or_default(),
            })
        }
        Err(e) => ApiResponse::error(ApiError::from(&e)),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}
