//! アダプター（wisher 固有の Outbound ポート実装）
//!
//! 名簿・送信履歴・生成器・配信・乱数・設定の読み込み。

pub mod config;
pub mod delivery;
pub mod json_history_store;
pub mod json_roster;
pub mod llm_wish_generator;
pub mod memory_history_store;
pub mod roster_columns;
pub mod std_random;
pub mod xlsx_roster;

pub use config::{load_settings, DeliverySettings, Settings};
pub use delivery::{CommandDelivery, ConsoleDelivery};
pub use json_history_store::JsonHistoryStore;
pub use json_roster::JsonRosterSource;
pub use llm_wish_generator::LlmWishGenerator;
pub use memory_history_store::MemoryHistoryStore;
pub use roster_columns::RosterColumns;
pub use std_random::StdRandom;
pub use xlsx_roster::XlsxRosterSource;
