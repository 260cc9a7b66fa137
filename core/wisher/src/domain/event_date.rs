//! 記念日の日付キー（DD-MM）と正規化
//!
//! 年を持たない「毎年繰り返す日」として照合する。正規化は全域関数で、
//! 解析できない入力は前後の空白を除いた文字列をそのまま返す（どの日とも一致しない）。

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// 名簿セルの生の日付値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    /// 文字列として読んだ値（"25-12-2024", "03/04", "Dec 25" など）
    Text(String),
    /// スプレッドシートの日付型セル
    Date(NaiveDate),
}

impl RawDate {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

impl From<NaiveDate> for RawDate {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

/// 正規化済みの日付キー（日・月のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizedDate {
    day: u32,
    month: u32,
}

impl NormalizedDate {
    /// 閏年に存在する日・月の組なら Some（29-02 は有効）
    pub fn new(day: u32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { day, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
        }
    }

    /// 厳密な `DD-MM` 形式のみ受け付ける
    pub fn parse_canonical(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() != 5 || b[2] != b'-' {
            return None;
        }
        if !(b[0..2].iter().chain(&b[3..5]).all(u8::is_ascii_digit)) {
            return None;
        }
        let day = s[0..2].parse().ok()?;
        let month = s[3..5].parse().ok()?;
        Self::new(day, month)
    }
}

impl fmt::Display for NormalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.day, self.month)
    }
}

/// 生の日付値を `DD-MM` 文字列へ正規化する（失敗しない）
///
/// 数値のみの日付は日が先（`03/04` は 4 月 3 日）。日が先だと存在しない日付で、
/// 月が先なら存在する場合（`12/25/2024`）は月が先として読む。
pub fn normalize(raw: &RawDate) -> String {
    match raw {
        RawDate::Date(d) => NormalizedDate::from_date(*d).to_string(),
        RawDate::Text(s) => {
            let trimmed = s.trim();
            match parse_text(trimmed) {
                Some(nd) => nd.to_string(),
                None => trimmed.to_string(),
            }
        }
    }
}

/// 正規化して照合に使えるキーを得る。`DD-MM` として有効でなければ None。
pub fn match_key(raw: &RawDate) -> Option<NormalizedDate> {
    NormalizedDate::parse_canonical(&normalize(raw))
}

fn iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:[ t].*)?$").expect("valid regex")
    })
}

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[-/.](\d{1,2})(?:[-/.](\d{4}|\d{2}))?(?:[ t].*)?$")
            .expect("valid regex")
    })
}

fn day_month_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?[\s\-/.,]+([a-z]+)\.?(?:[\s\-/.,]+(\d{4}|\d{2}))?$")
            .expect("valid regex")
    })
}

fn month_name_day_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-z]+)\.?[\s\-/.,]+(\d{1,2})(?:st|nd|rd|th)?(?:[\s,]+(\d{4}|\d{2}))?$")
            .expect("valid regex")
    })
}

fn parse_text(s: &str) -> Option<NormalizedDate> {
    let lower = s.to_lowercase();

    if let Some(c) = iso_re().captures(&lower) {
        let year = c[1].parse().ok()?;
        return build(c[3].parse().ok()?, c[2].parse().ok()?, Some(year));
    }

    if let Some(c) = numeric_re().captures(&lower) {
        let first: u32 = c[1].parse().ok()?;
        let second: u32 = c[2].parse().ok()?;
        let year = match c.get(3) {
            Some(y) => Some(expand_year(y.as_str())?),
            None => None,
        };
        return build(first, second, year).or_else(|| build(second, first, year));
    }

    if let Some(c) = day_month_name_re().captures(&lower) {
        let month = month_from_name(&c[2])?;
        let year = match c.get(3) {
            Some(y) => Some(expand_year(y.as_str())?),
            None => None,
        };
        return build(c[1].parse().ok()?, month, year);
    }

    if let Some(c) = month_name_day_re().captures(&lower) {
        let month = month_from_name(&c[1])?;
        let year = match c.get(3) {
            Some(y) => Some(expand_year(y.as_str())?),
            None => None,
        };
        return build(c[2].parse().ok()?, month, year);
    }

    None
}

fn build(day: u32, month: u32, year: Option<i32>) -> Option<NormalizedDate> {
    match year {
        Some(y) => NaiveDate::from_ymd_opt(y, month, day).map(NormalizedDate::from_date),
        None => NormalizedDate::new(day, month),
    }
}

/// 2 桁の年は 69-99 を 19xx、それ以外を 20xx とみなす
fn expand_year(s: &str) -> Option<i32> {
    let y: i32 = s.parse().ok()?;
    Some(match (s.len(), y) {
        (2, y) if y >= 69 => 1900 + y,
        (2, y) => 2000 + y,
        _ => y,
    })
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// 3 文字以上の前方一致で月名を解決する（"sept" も可）
fn month_from_name(s: &str) -> Option<u32> {
    if s.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(s))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> String {
        normalize(&RawDate::text(s))
    }

    #[test]
    fn test_day_first_with_year() {
        assert_eq!(n("25-12-2024"), "25-12");
        assert_eq!(n("25/12/2024"), "25-12");
        assert_eq!(n("25.12.24"), "25-12");
    }

    #[test]
    fn test_canonical_is_unchanged() {
        assert_eq!(n("13-02"), "13-02");
        assert_eq!(n(" 01-01 "), "01-01");
    }

    #[test]
    fn test_ambiguous_numeric_is_day_first() {
        assert_eq!(n("03/04"), "03-04");
        assert_eq!(n("3/4/2023"), "03-04");
    }

    #[test]
    fn test_month_first_when_day_first_impossible() {
        assert_eq!(n("12/25/2024"), "25-12");
    }

    #[test]
    fn test_iso_and_spreadsheet_strings() {
        assert_eq!(n("2024-12-25"), "25-12");
        assert_eq!(n("2024-12-25 00:00:00"), "25-12");
        assert_eq!(n("2024/02/29T08:00:00"), "29-02");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(n("25 Dec 2024"), "25-12");
        assert_eq!(n("25 December"), "25-12");
        assert_eq!(n("Dec 25, 2024"), "25-12");
        assert_eq!(n("September 5th"), "05-09");
        assert_eq!(n("1-Jan-2000"), "01-01");
    }

    #[test]
    fn test_typed_date() {
        let d = NaiveDate::from_ymd_opt(1999, 7, 4).unwrap();
        assert_eq!(normalize(&RawDate::Date(d)), "04-07");
    }

    #[test]
    fn test_leap_day_without_year_is_valid() {
        assert_eq!(n("29-02"), "29-02");
        assert!(match_key(&RawDate::text("29/02")).is_some());
    }

    #[test]
    fn test_leap_day_in_non_leap_year_falls_back() {
        assert_eq!(n("29-02-2023"), "29-02-2023");
        assert!(match_key(&RawDate::text("29-02-2023")).is_none());
    }

    #[test]
    fn test_unparseable_returns_trimmed_input() {
        assert_eq!(n("  someday "), "someday");
        assert_eq!(n(""), "");
        assert_eq!(n("32-13"), "32-13");
        assert!(match_key(&RawDate::text("32-13")).is_none());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["25-12-2024", "03/04", "Dec 25", "2024-01-31", "13-02", "xx", "12/25/2024"] {
            let once = n(s);
            assert_eq!(n(&once), once, "input {:?}", s);
        }
    }

    #[test]
    fn test_parse_canonical_strict() {
        assert_eq!(
            NormalizedDate::parse_canonical("14-02"),
            NormalizedDate::new(14, 2)
        );
        assert!(NormalizedDate::parse_canonical("14-2").is_none());
        assert!(NormalizedDate::parse_canonical("14/02").is_none());
        assert!(NormalizedDate::parse_canonical("31-04").is_none());
        assert!(NormalizedDate::parse_canonical("+1-02").is_none());
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(NormalizedDate::new(1, 1).unwrap().to_string(), "01-01");
    }
}
