//! 配信チャネルの Outbound ポート
//!
//! 結合済みの本文 1 件と宛先（グループ名など）を渡すだけ。受領確認は前提にしない。

use common::error::Error;

pub trait DeliveryChannel: Send + Sync {
    /// ログ用のチャネル名
    fn name(&self) -> &str;

    fn deliver(&self, destination: &str, payload: &str) -> Result<(), Error>;
}
