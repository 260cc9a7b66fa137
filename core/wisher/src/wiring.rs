//! 配線: 標準アダプタで App と WisherUseCase を組み立てる

use std::path::Path;
use std::sync::Arc;

use common::adapter::{
    Clock, EnvResolver, FileJsonLog, FileSystem, FixedClock, Log, NoopLog, Process, StdClock,
    StdEnvResolver, StdFileSystem, StdProcess, StderrLog, TeeLog,
};
use common::domain::HomeDir;
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};

use crate::adapter::{
    load_settings, CommandDelivery, ConsoleDelivery, DeliverySettings, JsonHistoryStore,
    JsonRosterSource, LlmWishGenerator, MemoryHistoryStore, RosterColumns, Settings, StdRandom,
    XlsxRosterSource,
};
use crate::cli::Config;
use crate::ports::outbound::{DeliveryChannel, HistoryStore, RosterSource};
use crate::usecase::app::{WisherDeps, WisherUseCase};
use crate::usecase::composer::MessageComposer;
use crate::usecase::orchestrator::WishOrchestrator;

/// 実行に共通の標準アダプタ（main の Runner が保持する）
pub struct App {
    pub fs: Arc<dyn FileSystem>,
    pub env_resolver: Arc<dyn EnvResolver>,
    pub process: Arc<dyn Process>,
    pub clock: Arc<dyn Clock>,
    pub logger: Arc<dyn Log>,
}

/// 配線: 標準アダプタで App を組み立てる
///
/// ホームが解決できない場合はファイルログを出さない（エラーは build_use_case で返る）。
pub fn wire_wisher(verbose: bool) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let file_log: Arc<dyn Log> = match env_resolver.resolve_home_dir() {
        Ok(home) => Arc::new(FileJsonLog::new(Arc::clone(&fs), home.log_path())),
        Err(_) => Arc::new(NoopLog),
    };
    let logger: Arc<dyn Log> = if verbose {
        let stderr_log: Arc<dyn Log> = Arc::new(StderrLog);
        Arc::new(TeeLog::new(vec![file_log, stderr_log]))
    } else {
        file_log
    };
    App {
        fs,
        env_resolver,
        process: Arc::new(StdProcess),
        clock: Arc::new(StdClock),
        logger,
    }
}

/// 名簿の拡張子で読み込みアダプタを選ぶ
pub fn open_roster(fs: &Arc<dyn FileSystem>, path: &Path, date_column: &str) -> Result<Arc<dyn RosterSource>, Error> {
    let columns = RosterColumns::new(date_column);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => {
            Ok(Arc::new(XlsxRosterSource::new(Arc::clone(fs), path, columns)))
        }
        "json" => Ok(Arc::new(JsonRosterSource::new(Arc::clone(fs), path, columns))),
        _ => Err(Error::invalid_argument(format!(
            "Unsupported roster format: '{}' (expected .xlsx, .xls, .xlsm, .ods or .json)",
            path.display()
        ))),
    }
}

fn open_delivery(app: &App, settings: &DeliverySettings) -> Arc<dyn DeliveryChannel> {
    match settings {
        DeliverySettings::Console => Arc::new(ConsoleDelivery::stdout()),
        DeliverySettings::Command { program, args } => Arc::new(CommandDelivery::new(
            Arc::clone(&app.process),
            program.as_str(),
            args.clone(),
        )),
    }
}

/// dry-run では実ファイルの履歴を初回 load で読み、以降はメモリ上だけで更新する
fn open_history(app: &App, settings: &Settings) -> Arc<dyn HistoryStore> {
    let file_store = Arc::new(JsonHistoryStore::new(
        Arc::clone(&app.fs),
        &settings.history,
        Arc::clone(&app.logger),
    ));
    if settings.dry_run {
        return Arc::new(MemoryHistoryStore::seeded_from(file_store));
    }
    file_store
}

/// 設定を解決して WisherUseCase を組み立てる
pub fn build_use_case(app: &App, config: &Config) -> Result<WisherUseCase, Error> {
    let home: HomeDir = app.env_resolver.resolve_home_dir()?;
    let settings = load_settings(app.fs.as_ref(), app.env_resolver.as_ref(), &home, config)?;
    build_use_case_with(app, &settings)
}

/// 解決済みの Settings から組み立てる
pub fn build_use_case_with(app: &App, settings: &Settings) -> Result<WisherUseCase, Error> {
    let roster = open_roster(&app.fs, &settings.roster, &settings.date_column)?;
    let generator = Arc::new(LlmWishGenerator::from_profile(
        settings.generator.clone(),
        Arc::clone(&app.env_resolver),
    ));
    let history = open_history(app, settings);
    let delivery = open_delivery(app, &settings.delivery);
    let clock: Arc<dyn Clock> = match settings.today {
        Some(date) => Arc::new(FixedClock::new(date)),
        None => Arc::clone(&app.clock),
    };

    let _ = app.logger.log(
        &LogRecord::new(LogLevel::Info, "use case wired")
            .layer("wiring")
            .kind("lifecycle")
            .field("roster", settings.roster.display().to_string())
            .field("history", history.location())
            .field("generator", settings.generator.type_.as_str())
            .field("model", settings.generator.model())
            .field("delivery", delivery.name())
            .field("max_attempts", settings.max_attempts)
            .field("dry_run", settings.dry_run),
    );

    let composer = MessageComposer::new(
        generator,
        Arc::new(StdRandom::new(settings.seed)),
        Arc::clone(&app.logger),
        settings.generator.temperature(),
        settings.max_attempts,
    );
    let orchestrator = WishOrchestrator::new(composer, history, Arc::clone(&app.logger));
    Ok(WisherUseCase::new(WisherDeps {
        roster,
        clock,
        orchestrator,
        delivery,
        destination: settings.destination.clone(),
        log: Arc::clone(&app.logger),
    }))
}
