//! 名簿の読み込み Outbound ポート

use crate::domain::PersonRecord;
use common::error::Error;

pub trait RosterSource: Send + Sync {
    /// 名簿を行順で読み込む。読めなければ `Error::InputUnavailable`。
    fn load(&self) -> Result<Vec<PersonRecord>, Error>;

    /// ログ・メッセージ用の読み込み元表示
    fn location(&self) -> String;
}
