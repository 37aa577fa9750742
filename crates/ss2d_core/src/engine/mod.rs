//! Tactical core
//!
//! One decision pass per cycle: build the intercept table, refresh the
//! formation, route to a tactic family and collect its actions.

pub mod action_queue;
pub mod behaviors;
pub mod config;
pub mod context;
pub mod decision;
pub mod geom;
pub mod kinematics;
pub mod penalty;
pub mod reach;
pub mod setplay;
pub mod strategy;

#[cfg(test)]
pub mod test_fixtures;

pub use action_queue::{fallback_actions, Action, ActionQueue};
pub use config::TacticsConfig;
pub use context::DecisionContext;
pub use decision::{run_cycle, AgentMemory, Decision, DecisionMaker, TacticFamily};
pub use reach::{ActorId, InterceptTable};
pub use strategy::{PositionStrategy, StarterStrategy};
