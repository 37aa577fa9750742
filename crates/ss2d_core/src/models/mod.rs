//! Data model: parameters, player types and the per-cycle world snapshot

pub mod player_type;
pub mod server_param;
pub mod world;

pub use player_type::{PlayerType, PlayerTypeEntry, PlayerTypeTable};
pub use server_param::{ServerParam, STOCK_SERVER_PARAM};
pub use world::{
    BallState, CardType, GameMode, GameModeType, PenaltyKickState, PlayerObject, SelfState, Side,
    WorldSnapshot,
};
