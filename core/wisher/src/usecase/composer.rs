//! 1 人分の祝いメッセージを組み立てる
//!
//! 口調と文体指示からプロンプトを作って生成器に渡し、送信履歴と重複した文面は
//! 文体指示を選び直して作り直す（上限 max_attempts 回）。生成器が失敗した場合は
//! 再試行せず、定型文から 1 つ選ぶ（定型文は履歴と照合しない）。
//! 履歴への記録は呼び出し側（オーケストレーター）が行う。

use crate::domain::{GeneratedWish, PersonRecord, ToneDirective, WishHistory, WishSource, STYLE_HINTS};
use crate::ports::outbound::{GenerationFailure, RandomSource, WishGenerator};
use chrono::NaiveDate;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

/// 生成器が使えないときの定型文。`{name}` と `{event}` を置き換える。
const FALLBACK_TEMPLATES: &[&str] = &[
    "Happy {event}, {name}! Wishing you a wonderful day filled with joy and laughter.",
    "Warmest wishes on your {event}, {name}. May the year ahead bring you success and happiness.",
    "Dear {name}, happy {event}! We are grateful to have you with us and hope your day is as special as you are.",
    "Happy {event}, {name}! May this day bring you peace, good health and many reasons to smile.",
    "Cheers to you on your {event}, {name}. Enjoy every moment of your special day.",
];

pub struct MessageComposer {
    generator: Arc<dyn WishGenerator>,
    random: Arc<dyn RandomSource>,
    log: Arc<dyn Log>,
    temperature: f64,
    max_attempts: usize,
}

impl MessageComposer {
    pub fn new(
        generator: Arc<dyn WishGenerator>,
        random: Arc<dyn RandomSource>,
        log: Arc<dyn Log>,
        temperature: f64,
        max_attempts: usize,
    ) -> Self {
        Self {
            generator,
            random,
            log,
            temperature,
            max_attempts: max_attempts.max(1),
        }
    }

    /// 生成器を使える状態にする（記念日の一致があったときだけ呼ぶ）
    pub fn prepare(&self) -> Result<(), Error> {
        self.generator.prepare()
    }

    /// 履歴に無い文面を 1 つ作る
    ///
    /// * 生成器の失敗 → 定型文（`WishSource::Fallback`）
    /// * max_attempts 回続けて履歴と重複 → `Error::DuplicateExhausted`
    pub fn compose(
        &self,
        person: &PersonRecord,
        history: &WishHistory,
        today: NaiveDate,
    ) -> Result<GeneratedWish, Error> {
        let tone = ToneDirective::derive(person.role.as_deref(), person.gender.as_deref());

        for attempt in 1..=self.max_attempts {
            let hint = STYLE_HINTS[self.random.pick(STYLE_HINTS.len())];
            let prompt = build_prompt(person, tone, hint, today);

            let text = match self.generator.generate(&prompt, self.temperature) {
                Ok(text) => text.trim().to_string(),
                Err(failure) => return Ok(self.fallback(person, &failure)),
            };
            if text.is_empty() {
                let failure = GenerationFailure::Malformed("empty reply".to_string());
                return Ok(self.fallback(person, &failure));
            }

            if history.contains(&person.name, &text) {
                self.log(
                    LogRecord::new(LogLevel::Info, "duplicate wish, regenerating")
                        .field("name", person.name.as_str())
                        .field("attempt", attempt),
                );
                continue;
            }

            return Ok(GeneratedWish {
                person_name: person.name.clone(),
                text,
                source: WishSource::Generated { attempts: attempt },
            });
        }

        self.log(
            LogRecord::new(LogLevel::Error, "no unique wish within attempt limit")
                .field("name", person.name.as_str())
                .field("attempts", self.max_attempts),
        );
        Err(Error::DuplicateExhausted {
            name: person.name.clone(),
            attempts: self.max_attempts,
        })
    }

    fn fallback(&self, person: &PersonRecord, failure: &GenerationFailure) -> GeneratedWish {
        self.log(
            LogRecord::new(LogLevel::Warn, "generator failed, using fallback template")
                .field("name", person.name.as_str())
                .field("failure", failure.kind())
                .field("reason", failure.reason()),
        );
        let template = FALLBACK_TEMPLATES[self.random.pick(FALLBACK_TEMPLATES.len())];
        GeneratedWish {
            person_name: person.name.clone(),
            text: render_template(template, person),
            source: WishSource::Fallback,
        }
    }

    fn log(&self, record: LogRecord) {
        let _ = self.log.log(&record.layer("usecase").kind("generator"));
    }
}

/// 生成器へのプロンプト
///
/// 先頭行に依頼と文体指示をまとめる（echo 生成器は先頭行だけを返す）。
pub fn build_prompt(
    person: &PersonRecord,
    tone: ToneDirective,
    style_hint: &str,
    today: NaiveDate,
) -> String {
    format!(
        "Write a short {event} message for {name}. {hint}\n\
         {tone}\n\
         Today is {weekday}, in the month of {month}; you may refer to the day or month naturally.\n\
         Write two to three sentences in plain text.\n\
         Do not use emojis, hashtags, asterisks or other symbolic decoration.\n\
         Reply with the message only.",
        event = person.event_type,
        name = person.name,
        hint = style_hint,
        tone = tone.instruction(),
        weekday = today.format("%A"),
        month = today.format("%B"),
    )
}

fn render_template(template: &str, person: &PersonRecord) -> String {
    template
        .replace("{name}", &person.name)
        .replace("{event}", &person.event_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawDate;

    fn jan1() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_prompt_contains_all_parts() {
        let p = PersonRecord::new("Asha", RawDate::text("01-01"))
            .with_role(Some("staff".to_string()))
            .with_gender(Some("female".to_string()));
        let prompt = build_prompt(
            &p,
            ToneDirective::derive(p.role.as_deref(), p.gender.as_deref()),
            STYLE_HINTS[0],
            jan1(),
        );
        assert!(prompt.contains("Asha"));
        assert!(prompt.contains("birthday"));
        assert!(prompt.contains(STYLE_HINTS[0]));
        assert!(prompt.contains(ToneDirective::Respectful.instruction()));
        assert!(prompt.contains("Wednesday"));
        assert!(prompt.contains("January"));
        assert!(prompt.contains("two to three sentences"));
        assert!(prompt.contains("emojis"));
    }

    #[test]
    fn test_prompt_first_line_varies_with_hint() {
        let p = PersonRecord::new("Asha", RawDate::text("01-01"));
        let a = build_prompt(&p, ToneDirective::Friendly, STYLE_HINTS[0], jan1());
        let b = build_prompt(&p, ToneDirective::Friendly, STYLE_HINTS[1], jan1());
        assert_ne!(a.lines().next(), b.lines().next());
    }

    #[test]
    fn test_render_template() {
        let p = PersonRecord::new("Ravi", RawDate::text("01-01")).with_event_type("anniversary");
        let text = render_template(FALLBACK_TEMPLATES[0], &p);
        assert!(text.contains("Ravi"));
        assert!(text.contains("anniversary"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_fallback_templates_mention_name_and_event() {
        for t in FALLBACK_TEMPLATES {
            assert!(t.contains("{name}"), "{}", t);
            assert!(t.contains("{event}"), "{}", t);
        }
    }
}
