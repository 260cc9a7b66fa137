//! 設定の読み込み（adapter 層）
//!
//! `<home>/config.json`（任意）を読み、CLI の指定で上書きして Settings を作る。
//! ファイルが無ければ既定値。JSON として読めなければ InvalidArgument。

use crate::cli::Config;
use chrono::NaiveDate;
use common::domain::HomeDir;
use common::error::Error;
use common::llm::config::GeneratorProfileRaw;
use common::llm::{GeneratorProfile, ProviderTypeKind};
use common::ports::outbound::{EnvResolver, FileSystem};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROSTER: &str = "Students.xlsx";
pub const DEFAULT_DATE_COLUMN: &str = "Date";
pub const DEFAULT_DESTINATION: &str = "wishes grp";
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// 配信チャネルの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliverySettings {
    Console,
    /// 外部プログラム（引数の末尾に宛先、標準入力に本文）
    Command { program: String, args: Vec<String> },
}

/// 1 回の実行に必要な設定（ファイル + CLI を解決済み）
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub roster: PathBuf,
    pub date_column: String,
    pub destination: String,
    pub history: PathBuf,
    pub max_attempts: usize,
    pub delivery: DeliverySettings,
    pub generator: GeneratorProfile,
    /// 照合に使う日付の上書き（`--today`）
    pub today: Option<NaiveDate>,
    pub seed: Option<u64>,
    /// 履歴を書き戻さず、echo 生成器とコンソール配信を使う
    pub dry_run: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFileRaw {
    roster: Option<PathBuf>,
    #[serde(alias = "dob_column")]
    date_column: Option<String>,
    #[serde(alias = "group")]
    destination: Option<String>,
    history: Option<PathBuf>,
    max_attempts: Option<usize>,
    delivery: Option<DeliveryRaw>,
    generator: Option<GeneratorProfileRaw>,
}

#[derive(Debug, Deserialize)]
struct DeliveryRaw {
    #[serde(rename = "type", default)]
    type_: Option<String>,
    program: Option<String>,
    #[serde(default)]
    args: Vec<String>,
}

impl DeliveryRaw {
    fn into_settings(self) -> Result<DeliverySettings, Error> {
        match self.type_.as_deref().map(str::trim) {
            None | Some("console") => Ok(DeliverySettings::Console),
            Some("command") => {
                let program = self
                    .program
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| Error::invalid_argument("delivery.program is required for type \"command\""))?;
                Ok(DeliverySettings::Command {
                    program,
                    args: self.args,
                })
            }
            Some(other) => Err(Error::invalid_argument(format!(
                "Unknown delivery type: {} (expected console or command)",
                other
            ))),
        }
    }
}

fn read_config_file(fs: &dyn FileSystem, path: &Path) -> Result<ConfigFileRaw, Error> {
    if !fs.exists(path) {
        return Ok(ConfigFileRaw::default());
    }
    let content = fs.read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::invalid_argument(format!("Invalid {}: {}", path.display(), e)))
}

/// `--deliver-cmd "prog arg1 arg2"` を空白で分割する
fn split_command_line(s: &str) -> Result<DeliverySettings, Error> {
    let mut parts = s.split_whitespace().map(str::to_string);
    let program = parts
        .next()
        .ok_or_else(|| Error::invalid_argument("--deliver-cmd must not be empty"))?;
    Ok(DeliverySettings::Command {
        program,
        args: parts.collect(),
    })
}

/// 設定ファイルと CLI 指定から Settings を作る
///
/// 相対パスは roster がカレントディレクトリ基準、history がホーム基準。
pub fn load_settings(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
    home: &HomeDir,
    config: &Config,
) -> Result<Settings, Error> {
    let file = read_config_file(fs, &home.config_path())?;
    let cwd = env.current_dir()?;

    let roster = config
        .roster
        .clone()
        .or(file.roster)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER));
    let roster = cwd.join(roster);

    let history = match config.history.clone() {
        Some(p) => cwd.join(p),
        None => file
            .history
            .map(|p| home.join(p))
            .unwrap_or_else(|| home.history_path()),
    };

    let date_column = config
        .date_column
        .clone()
        .or(file.date_column)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_DATE_COLUMN.to_string());

    let destination = config
        .group
        .clone()
        .or(file.destination)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DESTINATION.to_string());

    let max_attempts = config
        .max_attempts
        .or(file.max_attempts)
        .unwrap_or(DEFAULT_MAX_ATTEMPTS);
    if max_attempts == 0 {
        return Err(Error::invalid_argument("max_attempts must be at least 1"));
    }

    let mut generator: GeneratorProfile = file.generator.map(Into::into).unwrap_or_default();
    if let Some(ref name) = config.generator {
        generator.type_ = ProviderTypeKind::parse(name).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Unknown generator: {} (expected openai, openai_compat or echo)",
                name
            ))
        })?;
    }
    if let Some(ref model) = config.model {
        generator.model = Some(model.clone());
    }

    let mut delivery = match file.delivery {
        Some(raw) => raw.into_settings()?,
        None => DeliverySettings::Console,
    };
    if let Some(ref cmd) = config.deliver_cmd {
        delivery = split_command_line(cmd)?;
    }

    if config.dry_run {
        generator = GeneratorProfile {
            model: generator.model.clone(),
            ..GeneratorProfile::echo()
        };
        delivery = DeliverySettings::Console;
    }

    Ok(Settings {
        roster,
        date_column,
        destination,
        history,
        max_attempts,
        delivery,
        generator,
        today: config.today,
        seed: config.seed,
        dry_run: config.dry_run,
    })
}
