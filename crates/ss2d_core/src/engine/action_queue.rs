//! Action vocabulary and the per-cycle ActionQueue
//!
//! Behaviors emit [`Action`]s; the decision pass collects them in an
//! [`ActionQueue`] that is handed to the transport at cycle end. Order is
//! significant: the transport applies commands in sequence.
//!
//! ## Slots
//! - **Body**: moves or kicks. The body actions form a fallback chain and
//!   the transport executes the first one that yields a command this cycle.
//!   A `GoToPoint` already at its target yields nothing, so a following
//!   `TurnToBall` or `TurnToAngle` runs instead. At most one kick is ever
//!   queued per cycle.
//! - **Neck**: attention commands, appended after the body command

use super::geom::Vec2;
use serde::{Deserialize, Serialize};

/// Primitive or composite command understood by the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    // === Primitive body commands ===
    Dash {
        power: f64,
        relative_direction: f64,
    },
    Turn {
        relative_direction: f64,
    },
    Kick {
        power: f64,
        relative_direction: f64,
    },
    /// Positive power for a forward tackle, negative for a back tackle.
    Tackle {
        power_or_dir: f64,
        foul: bool,
    },
    Catch,
    /// Teleport, legal only before kickoff.
    Move {
        target: Vec2,
    },

    // === Composite body behaviors ===
    GoToPoint {
        target: Vec2,
        distance_threshold: f64,
        max_dash_power: f64,
    },
    TurnToPoint {
        target: Vec2,
        cycle: u32,
    },
    TurnToBall {
        cycle: u32,
    },
    TurnToAngle {
        angle: f64,
    },
    SmartKick {
        target: Vec2,
        first_speed: f64,
        first_speed_threshold: f64,
        max_steps: u32,
    },
    KickOneStep {
        target: Vec2,
        first_speed: f64,
    },
    HoldBall,
    Intercept {
        save_recovery: bool,
    },
    StopDash {
        save_recovery: bool,
    },

    // === Attention ===
    NeckTurnToBall,
    NeckTurnToBallOrScan {
        count_threshold: u32,
    },
    NeckTurnToPoint {
        target: Vec2,
    },
    NeckOffensiveIntercept,
}

impl Action {
    /// Whether the command drives the body (as opposed to the neck).
    pub fn is_body(&self) -> bool {
        !matches!(
            self,
            Action::NeckTurnToBall
                | Action::NeckTurnToBallOrScan { .. }
                | Action::NeckTurnToPoint { .. }
                | Action::NeckOffensiveIntercept
        )
    }

    pub fn is_kick(&self) -> bool {
        matches!(
            self,
            Action::Kick { .. } | Action::SmartKick { .. } | Action::KickOneStep { .. } | Action::HoldBall
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Dash { .. } => "dash",
            Action::Turn { .. } => "turn",
            Action::Kick { .. } => "kick",
            Action::Tackle { .. } => "tackle",
            Action::Catch => "catch",
            Action::Move { .. } => "move",
            Action::GoToPoint { .. } => "go_to_point",
            Action::TurnToPoint { .. } => "turn_to_point",
            Action::TurnToBall { .. } => "turn_to_ball",
            Action::TurnToAngle { .. } => "turn_to_angle",
            Action::SmartKick { .. } => "smart_kick",
            Action::KickOneStep { .. } => "kick_one_step",
            Action::HoldBall => "hold_ball",
            Action::Intercept { .. } => "intercept",
            Action::StopDash { .. } => "stop_dash",
            Action::NeckTurnToBall => "neck_turn_to_ball",
            Action::NeckTurnToBallOrScan { .. } => "neck_turn_to_ball_or_scan",
            Action::NeckTurnToPoint { .. } => "neck_turn_to_point",
            Action::NeckOffensiveIntercept => "neck_offensive_intercept",
        }
    }
}

/// Ordered, append-only buffer for one decision pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionQueue {
    actions: Vec<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn extend(&mut self, actions: impl IntoIterator<Item = Action>) {
        self.actions.extend(actions);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn has_body_action(&self) -> bool {
        self.actions.iter().any(Action::is_body)
    }

    pub fn has_neck_action(&self) -> bool {
        self.actions.iter().any(|a| !a.is_body())
    }

    /// Position of the first action of `kind`, if any.
    pub fn position_of(&self, kind: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.kind() == kind)
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_vec(self) -> Vec<Action> {
        self.actions
    }
}

impl From<Vec<Action>> for ActionQueue {
    fn from(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

/// Minimal set sent when a cycle produced nothing or failed.
pub fn fallback_actions() -> Vec<Action> {
    vec![
        Action::TurnToBall { cycle: 1 },
        Action::NeckTurnToBallOrScan { count_threshold: 0 },
    ]
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_order() {
        let mut queue = ActionQueue::new();
        queue.push(Action::Intercept { save_recovery: true });
        queue.push(Action::NeckOffensiveIntercept);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.position_of("intercept"), Some(0));
        assert_eq!(queue.position_of("neck_offensive_intercept"), Some(1));
        assert!(queue.has_body_action());
        assert!(queue.has_neck_action());
    }

    #[test]
    fn test_action_json_tagging() {
        let json = serde_json::to_value(Action::SmartKick {
            target: Vec2::new(52.5, 6.81),
            first_speed: 3.0,
            first_speed_threshold: 0.1,
            max_steps: 3,
        })
        .unwrap();
        assert_eq!(json["type"], "smart_kick");
        assert_eq!(json["max_steps"], 3);
    }

    #[test]
    fn test_fallback_has_body_and_neck() {
        let queue = ActionQueue::from(fallback_actions());
        assert!(queue.has_body_action() && queue.has_neck_action());
    }

    #[test]
    fn test_kick_classification() {
        assert!(Action::HoldBall.is_kick());
        assert!(!Action::Catch.is_kick());
        assert!(!Action::NeckTurnToBall.is_body());
    }
}
