//! Agent boundary: registration, queued parameter updates and JSON calls

pub mod json_api;
pub mod service;

pub use json_api::{
    decide_json, decide_request, ApiError, ApiResponse, DecisionRequest, DecisionResponse, API_VERSION,
};
pub use service::{AgentRole, AgentService, ParamUpdate};
