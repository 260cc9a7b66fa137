//! wisher 共通ライブラリ
//!
//! エラー型・Outbound ポートと標準アダプタ・LLM プロバイダを提供する。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Ports & Adapters のポート定義
pub mod ports;

/// 標準アダプタ
pub mod adapter;

/// LLMプロバイダ
pub mod llm;
