//! # ss2d_core - Tactical layer of a 2D soccer simulation agent
//!
//! Turns one world snapshot per cycle into an ordered list of body and neck
//! actions for a single player or goalkeeper.
//!
//! ## Features
//! - Ball and player kinematics with reach (intercept) estimation
//! - Open-play evaluators: tackle, intercept, block, shoot, pass, dribble,
//!   hold, clear and goalkeeping
//! - Dead-ball restarts and the penalty shoot-out
//! - Per-agent service with queued parameter updates and a JSON entry point

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Geometry helpers take many scalar parameters
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{decide_json, AgentRole, AgentService, ApiResponse, DecisionRequest, DecisionResponse};
pub use engine::{
    fallback_actions, run_cycle, Action, ActionQueue, AgentMemory, Decision, DecisionMaker, InterceptTable,
    PositionStrategy, StarterStrategy, TacticFamily, TacticsConfig,
};
pub use error::{DecisionError, Result};
pub use models::{GameModeType, PlayerType, PlayerTypeTable, ServerParam, WorldSnapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_end_to_end_json_shoot() {
        let request = json!({
            "snapshot": {
                "self": { "unum": 9, "position": { "x": 44.5, "y": 0.0 }, "is_kickable": true },
                "ball": { "position": { "x": 45.0, "y": 0.0 } }
            }
        });
        let parsed: serde_json::Value = serde_json::from_str(&decide_json(&request.to_string())).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["data"]["family"], "open_play_with_ball");
        let first = &parsed["data"]["actions"][0];
        assert_eq!(first["type"], "smart_kick");
        assert!(first["target"]["x"].as_f64().unwrap() > 52.0);
    }

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
