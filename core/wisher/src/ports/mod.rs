//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（名簿・生成器・履歴・配信・乱数）を使うための trait

pub mod inbound;
pub mod outbound;
