//! 文面の口調（tone）と文体指示（style hint）
//!
//! 口調は role / gender から固定の優先順位で決まる。role = staff は常に gender より優先。

/// 口調の指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneDirective {
    /// 職員向け: 丁寧で敬意のある口調
    Respectful,
    /// 温かく明るい口調
    Warm,
    /// 元気でエネルギッシュな口調
    Energetic,
    /// 中立的で親しみやすい口調
    Friendly,
}

const FEMALE_TERMS: &[&str] = &["female", "f", "woman", "girl", "lady"];
const MALE_TERMS: &[&str] = &["male", "m", "man", "boy", "gentleman"];

impl ToneDirective {
    /// role / gender から口調を決める
    pub fn derive(role: Option<&str>, gender: Option<&str>) -> Self {
        let role = role.map(|r| r.trim().to_lowercase());
        if role.as_deref() == Some("staff") {
            return Self::Respectful;
        }
        match gender.map(|g| g.trim().to_lowercase()) {
            Some(g) if FEMALE_TERMS.contains(&g.as_str()) => Self::Warm,
            Some(g) if MALE_TERMS.contains(&g.as_str()) => Self::Energetic,
            _ => Self::Friendly,
        }
    }

    /// プロンプトに埋め込む指示文
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Respectful => {
                "Use a respectful, appreciative tone suitable for a staff member, acknowledging their work."
            }
            Self::Warm => "Use a warm, cheerful and affectionate tone.",
            Self::Energetic => "Use an energetic, upbeat and enthusiastic tone.",
            Self::Friendly => "Use a friendly, positive and neutral tone.",
        }
    }
}

/// 文体指示のプール（毎回この中から一様に 1 つ選ぶ）
pub const STYLE_HINTS: &[&str] = &[
    "Mention a positive quality of the person.",
    "Include a short blessing for the year ahead.",
    "Add a light, gentle touch of humour.",
    "Wish them success in their goals and studies or work.",
    "Express gratitude for having them in the group.",
    "Encourage them to enjoy the day with the people they love.",
    "Keep it simple and heartfelt.",
];
