//! Outbound ポート: アプリが外界（名簿・生成器・履歴・配信・乱数）を使うための trait

pub mod delivery_channel;
pub mod history_store;
pub mod random_source;
pub mod roster_source;
pub mod wish_generator;

pub use delivery_channel::DeliveryChannel;
pub use history_store::HistoryStore;
pub use random_source::RandomSource;
pub use roster_source::RosterSource;
pub use wish_generator::{GenerationFailure, WishGenerator};
