//! 今日の記念日を照合し、1 人ずつ文面を作って履歴に記録する
//!
//! 一致が無ければ生成器にも履歴にも触れずに NothingToday を返す。
//! 途中で文面を作れなかった場合はその時点で全体を中断する（記録済みの分は残る）。

use crate::domain::{match_today, NormalizedDate, PersonRecord, WishRun, WishSource};
use crate::ports::outbound::HistoryStore;
use crate::usecase::composer::MessageComposer;
use crate::usecase::history_ledger::HistoryLedger;
use chrono::NaiveDate;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct WishOrchestrator {
    composer: MessageComposer,
    store: Arc<dyn HistoryStore>,
    log: Arc<dyn Log>,
}

impl WishOrchestrator {
    pub fn new(composer: MessageComposer, store: Arc<dyn HistoryStore>, log: Arc<dyn Log>) -> Self {
        Self { composer, store, log }
    }

    pub fn run(&self, roster: &[PersonRecord], today: NaiveDate) -> Result<WishRun, Error> {
        let key = NormalizedDate::from_date(today);
        let matched = match_today(roster, key);
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "roster matched")
                .layer("usecase")
                .kind("roster")
                .field("today", key.to_string())
                .field("roster", roster.len())
                .field("matched", matched.len()),
        );
        if matched.is_empty() {
            return Ok(WishRun::NothingToday);
        }

        self.composer.prepare()?;
        let mut ledger = HistoryLedger::open(Arc::clone(&self.store))?;
        let mut wishes = Vec::with_capacity(matched.len());
        for person in matched {
            let wish = self.composer.compose(person, ledger.history(), today)?;
            ledger.record(&person.name, &wish.text)?;
            let mut rec = LogRecord::new(LogLevel::Info, "wish recorded")
                .layer("usecase")
                .kind("history")
                .field("name", person.name.as_str())
                .field("event", person.event_type.as_str())
                .field("source", wish.source.as_str());
            if let WishSource::Generated { attempts } = wish.source {
                rec = rec.field("attempts", attempts);
            }
            let _ = self.log.log(&rec);
            wishes.push(wish);
        }
        Ok(WishRun::from_wishes(wishes))
    }
}
