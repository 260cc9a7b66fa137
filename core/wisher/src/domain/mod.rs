//! wisher 固有のドメイン型（型と不変条件）

pub mod command;
pub mod event_date;
pub mod history;
pub mod matcher;
pub mod person;
pub mod tone;
pub mod wish;

pub use command::WisherCommand;
pub use event_date::{NormalizedDate, RawDate};
pub use history::WishHistory;
pub use matcher::match_today;
pub use person::PersonRecord;
pub use tone::{ToneDirective, STYLE_HINTS};
pub use wish::{GeneratedWish, WishRun, WishSource};
