//! 生成したメッセージと 1 回の実行結果

/// メッセージの出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishSource {
    /// 生成器が返した（attempts 回目で履歴と重複しなかった）
    Generated { attempts: usize },
    /// 生成器の失敗によりテンプレートから選んだ
    Fallback,
}

impl WishSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated { .. } => "generated",
            Self::Fallback => "fallback",
        }
    }
}

/// 1 人分のメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedWish {
    pub person_name: String,
    pub text: String,
    pub source: WishSource,
}

/// オーケストレーターの実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishRun {
    /// 今日の記念日はない（配信しない）
    NothingToday,
    /// 配信する本文（名簿順に改行で結合）と内訳
    Ready {
        payload: String,
        wishes: Vec<GeneratedWish>,
    },
}

impl WishRun {
    /// 名簿順のメッセージを改行で結合する（末尾に区切りは付けない）
    pub fn from_wishes(wishes: Vec<GeneratedWish>) -> Self {
        if wishes.is_empty() {
            return Self::NothingToday;
        }
        let payload = wishes
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self::Ready { payload, wishes }
    }
}
