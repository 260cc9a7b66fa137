//! wisher のユースケース: 名簿を読み、今日の分を作って配信する
//!
//! 表示は CLI の責務のため、結果（RunReport）だけを返す。

use crate::domain::{WishRun, WishSource};
use crate::ports::outbound::{DeliveryChannel, RosterSource};
use crate::usecase::orchestrator::WishOrchestrator;
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use std::sync::Arc;

/// 1 回の実行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// 今日の記念日はなかった（配信していない）
    NothingToday,
    Delivered {
        destination: String,
        channel: String,
        count: usize,
        fallbacks: usize,
    },
}

pub struct WisherDeps {
    pub roster: Arc<dyn RosterSource>,
    pub clock: Arc<dyn Clock>,
    pub orchestrator: WishOrchestrator,
    pub delivery: Arc<dyn DeliveryChannel>,
    pub destination: String,
    pub log: Arc<dyn Log>,
}

pub struct WisherUseCase {
    deps: WisherDeps,
}

impl WisherUseCase {
    pub fn new(deps: WisherDeps) -> Self {
        Self { deps }
    }

    pub fn run(&self) -> Result<RunReport, Error> {
        let roster = self.deps.roster.load()?;
        self.log(
            LogRecord::new(LogLevel::Info, "roster loaded")
                .kind("roster")
                .field("source", self.deps.roster.location())
                .field("records", roster.len()),
        );

        let today = self.deps.clock.today();
        let (payload, wishes) = match self.deps.orchestrator.run(&roster, today)? {
            WishRun::NothingToday => return Ok(RunReport::NothingToday),
            WishRun::Ready { payload, wishes } => (payload, wishes),
        };

        let destination = self.deps.destination.as_str();
        self.deps.delivery.deliver(destination, &payload)?;
        let fallbacks = wishes
            .iter()
            .filter(|w| w.source == WishSource::Fallback)
            .count();
        self.log(
            LogRecord::new(LogLevel::Info, "wishes delivered")
                .kind("delivery")
                .field("channel", self.deps.delivery.name())
                .field("destination", destination)
                .field("count", wishes.len())
                .field("fallbacks", fallbacks)
                .field("payload", payload.as_str()),
        );
        Ok(RunReport::Delivered {
            destination: destination.to_string(),
            channel: self.deps.delivery.name().to_string(),
            count: wishes.len(),
            fallbacks,
        })
    }

    fn log(&self, record: LogRecord) {
        let _ = self.deps.log.log(&record.layer("usecase"));
    }
}
