//! Tactical evaluators
//!
//! Each evaluator looks at the [`DecisionContext`] and either declines
//! (`None`) or proposes the actions that carry it out. Evaluators are pure:
//! they never touch the queue themselves, so cascades can be composed as
//! ordered lists and tested one evaluator at a time.

pub mod block;
pub mod clear;
pub mod dribble;
pub mod goalie;
pub mod hold;
pub mod intercept;
pub mod kick_planner;
pub mod pass;
pub mod shoot;
pub mod tackle;

pub use block::{plan_block, BlockBehavior, BlockOutcome};
pub use clear::{clear_target, ClearBehavior};
pub use dribble::DribbleBehavior;
pub use goalie::{goalie_move_position, GoalieBehavior};
pub use hold::HoldBehavior;
pub use intercept::InterceptBehavior;
pub use kick_planner::KickPlanner;
pub use pass::{pass_candidates, PassBehavior};
pub use shoot::ShootBehavior;
pub use tackle::TackleBehavior;

use super::action_queue::Action;
use super::context::DecisionContext;

/// One tactical evaluator.
pub trait Behavior: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Actions to commit this cycle, or `None` when not applicable.
    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>>;
}

/// Run `behaviors` in order and return the first proposal.
pub fn first_applicable(
    behaviors: &[&dyn Behavior],
    ctx: &DecisionContext,
) -> Option<(&'static str, Vec<Action>)> {
    behaviors.iter().find_map(|b| {
        let actions = b.evaluate(ctx)?;
        log::debug!("cycle {}: {} applies", ctx.wm.cycle, b.name());
        Some((b.name(), actions))
    })
}
