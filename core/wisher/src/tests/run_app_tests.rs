use crate::adapter::{
    DeliverySettings, JsonHistoryStore, JsonRosterSource, RosterColumns, Settings,
};
use crate::cli::Config;
use crate::ports::inbound::UseCaseRunner;
use crate::tests::stubs::{RecordingDelivery, SeqRandom, StubGenerator};
use crate::usecase::app::{RunReport, WisherDeps, WisherUseCase};
use crate::usecase::composer::MessageComposer;
use crate::usecase::orchestrator::WishOrchestrator;
use crate::wiring::{self, App};
use chrono::NaiveDate;
use common::adapter::{
    EnvResolver, FileSystem, FixedClock, NoopLog, StdFileSystem, StdProcess,
};
use common::domain::HomeDir;
use common::error::Error;
use common::llm::GeneratorProfile;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

const ROSTER: &str = r#"[
    {"Name": "Asha", "Date": "01-01", "Event": "birthday", "Gender": "female"},
    {"Name": "Ravi", "Date": "25/12/1990"},
    {"Name": "Mr Rao", "Date": "2024-01-01", "Role": "Staff"}
]"#;

fn jan1() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn use_case(
    dir: &Path,
    generator: Arc<StubGenerator>,
    delivery: Arc<RecordingDelivery>,
    today: NaiveDate,
) -> WisherUseCase {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let roster = Arc::new(JsonRosterSource::new(
        Arc::clone(&fs),
        dir.join("roster.json"),
        RosterColumns::new("Date"),
    ));
    let history = Arc::new(JsonHistoryStore::new(
        Arc::clone(&fs),
        dir.join("wish_history.json"),
        Arc::new(NoopLog),
    ));
    let composer = MessageComposer::new(
        generator,
        Arc::new(SeqRandom::new(&[0, 1, 2])),
        Arc::new(NoopLog),
        0.9,
        10,
    );
    WisherUseCase::new(WisherDeps {
        roster,
        clock: Arc::new(FixedClock::new(today)),
        orchestrator: WishOrchestrator::new(composer, history, Arc::new(NoopLog)),
        delivery,
        destination: "wishes grp".to_string(),
        log: Arc::new(NoopLog),
    })
}

fn read_history(dir: &Path) -> serde_json::Value {
    let content = fs::read_to_string(dir.join("wish_history.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_run_delivers_and_persists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    let generator = Arc::new(StubGenerator::replying(&["For Asha", "For Mr Rao"]));
    let delivery = Arc::new(RecordingDelivery::new());

    let report = use_case(dir.path(), generator, delivery.clone(), jan1()).run().unwrap();
    assert_eq!(
        report,
        RunReport::Delivered {
            destination: "wishes grp".to_string(),
            channel: "recording".to_string(),
            count: 2,
            fallbacks: 0,
        }
    );
    assert_eq!(
        delivery.sent(),
        vec![("wishes grp".to_string(), "For Asha\nFor Mr Rao".to_string())]
    );
    let history = read_history(dir.path());
    assert_eq!(history["Asha"], serde_json::json!(["For Asha"]));
    assert_eq!(history["Mr Rao"], serde_json::json!(["For Mr Rao"]));
    assert!(history.get("Ravi").is_none());
}

#[test]
fn test_second_run_same_day_gets_new_messages() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), r#"[{"Name": "Asha", "Date": "01-01"}]"#).unwrap();
    let delivery = Arc::new(RecordingDelivery::new());

    let first = Arc::new(StubGenerator::replying(&["Happy birthday, Asha!"]));
    use_case(dir.path(), first, delivery.clone(), jan1()).run().unwrap();
    let second = Arc::new(StubGenerator::replying(&["Happy birthday, Asha!", "Many happy returns!"]));
    use_case(dir.path(), second, delivery.clone(), jan1()).run().unwrap();

    let sent = delivery.sent();
    assert_eq!(sent[1].1, "Many happy returns!");
    assert_eq!(
        read_history(dir.path())["Asha"],
        serde_json::json!(["Happy birthday, Asha!", "Many happy returns!"])
    );
}

#[test]
fn test_nothing_today_skips_delivery_and_history() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    let delivery = Arc::new(RecordingDelivery::new());
    let today = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();

    let report = use_case(dir.path(), Arc::new(StubGenerator::always("x")), delivery.clone(), today)
        .run()
        .unwrap();
    assert_eq!(report, RunReport::NothingToday);
    assert!(delivery.sent().is_empty());
    assert!(!dir.path().join("wish_history.json").exists());
}

#[test]
fn test_missing_roster_is_input_unavailable() {
    let dir = tempdir().unwrap();
    let delivery = Arc::new(RecordingDelivery::new());
    let err = use_case(dir.path(), Arc::new(StubGenerator::always("x")), delivery, jan1())
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::InputUnavailable(_)));
    assert_eq!(err.exit_code(), 66);
}

#[test]
fn test_corrupt_history_aborts_before_delivery() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    fs::write(dir.path().join("wish_history.json"), "").unwrap();
    let delivery = Arc::new(RecordingDelivery::new());

    let err = use_case(dir.path(), Arc::new(StubGenerator::always("x")), delivery.clone(), jan1())
        .run()
        .unwrap_err();
    assert_eq!(err.exit_code(), 65);
    assert!(err.to_string().contains("wish_history.json"));
    assert!(delivery.sent().is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("wish_history.json")).unwrap(), "");
}

#[test]
fn test_delivery_failure_surfaces_after_recording() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), r#"[{"Name": "Asha", "Date": "01-01"}]"#).unwrap();
    let delivery = Arc::new(RecordingDelivery::failing());

    let err = use_case(dir.path(), Arc::new(StubGenerator::always("For Asha")), delivery, jan1())
        .run()
        .unwrap_err();
    assert_eq!(err.exit_code(), 69);
    assert_eq!(read_history(dir.path())["Asha"], serde_json::json!(["For Asha"]));
}

// --- wiring 経由（標準アダプタ + echo 生成器）

struct DirEnv {
    home: PathBuf,
    cwd: PathBuf,
}

impl EnvResolver for DirEnv {
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        Ok(HomeDir::new(self.home.clone()))
    }
    fn current_dir(&self) -> Result<PathBuf, Error> {
        Ok(self.cwd.clone())
    }
    fn var(&self, _name: &str) -> Option<String> {
        None
    }
}

fn test_app(dir: &Path) -> App {
    App {
        fs: Arc::new(StdFileSystem),
        env_resolver: Arc::new(DirEnv {
            home: dir.join("home"),
            cwd: dir.to_path_buf(),
        }),
        process: Arc::new(StdProcess),
        clock: Arc::new(FixedClock::new(jan1())),
        logger: Arc::new(NoopLog),
    }
}

fn run_app(dir: &Path, config: Config) -> Result<i32, Error> {
    let runner = crate::Runner { app: test_app(dir) };
    runner.run(config)
}

#[test]
fn test_run_app_with_help() {
    let dir = tempdir().unwrap();
    assert_eq!(
        run_app(
            dir.path(),
            Config {
                help: true,
                ..Default::default()
            }
        )
        .unwrap(),
        0
    );
}

#[test]
fn test_run_app_missing_default_roster() {
    let dir = tempdir().unwrap();
    let config = Config {
        generator: Some("echo".to_string()),
        ..Default::default()
    };
    let err = run_app(dir.path(), config).unwrap_err();
    assert_eq!(err.exit_code(), 66);
    assert!(err.to_string().contains("Students.xlsx"));
}

#[test]
fn test_run_app_openai_without_key_is_usage_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    let config = Config {
        roster: Some(PathBuf::from("roster.json")),
        ..Default::default()
    };
    let err = run_app(dir.path(), config).unwrap_err();
    assert!(err.is_usage());
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}

#[test]
fn test_run_app_unsupported_roster_extension() {
    let dir = tempdir().unwrap();
    let config = Config {
        roster: Some(PathBuf::from("roster.csv")),
        generator: Some("echo".to_string()),
        ..Default::default()
    };
    let err = run_app(dir.path(), config).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn test_run_app_nothing_today_exits_zero() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    let config = Config {
        roster: Some(PathBuf::from("roster.json")),
        generator: Some("echo".to_string()),
        today: NaiveDate::from_ymd_opt(2025, 7, 4),
        ..Default::default()
    };
    assert_eq!(run_app(dir.path(), config).unwrap(), 0);
    assert!(!dir.path().join("home/wish_history.json").exists());
}

#[test]
fn test_run_app_echo_generator_writes_history() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    let config = Config {
        roster: Some(PathBuf::from("roster.json")),
        generator: Some("echo".to_string()),
        seed: Some(1),
        ..Default::default()
    };
    assert_eq!(run_app(dir.path(), config).unwrap(), 0);

    let content = fs::read_to_string(dir.path().join("home/wish_history.json")).unwrap();
    let history: serde_json::Value = serde_json::from_str(&content).unwrap();
    let asha = history["Asha"].as_array().unwrap();
    assert_eq!(asha.len(), 1);
    assert!(asha[0].as_str().unwrap().starts_with("[echo] "));
    assert!(history.get("Mr Rao").is_some());
}

#[test]
fn test_dry_run_leaves_history_file_untouched() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    fs::create_dir_all(dir.path().join("home")).unwrap();
    let existing = "{\n  \"Asha\": [\n    \"Last year's wish\"\n  ]\n}";
    fs::write(dir.path().join("home/wish_history.json"), existing).unwrap();

    let settings = Settings {
        roster: dir.path().join("roster.json"),
        date_column: "Date".to_string(),
        destination: "wishes grp".to_string(),
        history: dir.path().join("home/wish_history.json"),
        max_attempts: 10,
        delivery: DeliverySettings::Console,
        generator: GeneratorProfile::echo(),
        today: Some(jan1()),
        seed: Some(7),
        dry_run: true,
    };
    let report = wiring::build_use_case_with(&test_app(dir.path()), &settings)
        .unwrap()
        .run()
        .unwrap();
    assert!(matches!(report, RunReport::Delivered { count: 2, .. }));
    assert_eq!(
        fs::read_to_string(dir.path().join("home/wish_history.json")).unwrap(),
        existing
    );
}

#[test]
fn test_run_app_nothing_today_needs_no_api_key() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    let config = Config {
        roster: Some(PathBuf::from("roster.json")),
        today: NaiveDate::from_ymd_opt(2025, 7, 4),
        ..Default::default()
    };
    assert_eq!(run_app(dir.path(), config).unwrap(), 0);
}

#[test]
fn test_run_app_missing_roster_reported_before_api_key() {
    let dir = tempdir().unwrap();
    let err = run_app(dir.path(), Config::default()).unwrap_err();
    assert_eq!(err.exit_code(), 66);
}

#[test]
fn test_dry_run_nothing_today_ignores_corrupt_history() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    fs::create_dir_all(dir.path().join("home")).unwrap();
    fs::write(dir.path().join("home/wish_history.json"), "").unwrap();
    let config = Config {
        roster: Some(PathBuf::from("roster.json")),
        today: NaiveDate::from_ymd_opt(2025, 7, 4),
        dry_run: true,
        ..Default::default()
    };
    assert_eq!(run_app(dir.path(), config).unwrap(), 0);
    assert_eq!(fs::read_to_string(dir.path().join("home/wish_history.json")).unwrap(), "");
}

#[test]
fn test_dry_run_with_events_still_rejects_corrupt_history() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("roster.json"), ROSTER).unwrap();
    fs::create_dir_all(dir.path().join("home")).unwrap();
    fs::write(dir.path().join("home/wish_history.json"), "").unwrap();
    let config = Config {
        roster: Some(PathBuf::from("roster.json")),
        dry_run: true,
        ..Default::default()
    };
    let err = run_app(dir.path(), config).unwrap_err();
    assert_eq!(err.exit_code(), 65);
}
