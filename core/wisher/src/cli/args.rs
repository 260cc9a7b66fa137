use crate::domain::WisherCommand;
use chrono::NaiveDate;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

/// コマンドライン指定（未指定は None。既定値は設定ファイルと合わせて adapter::config で決める）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: 構造化ログを stderr にも出す
    pub verbose: bool,
    /// --dry-run: echo 生成器・コンソール配信・履歴はメモリ上のみ
    pub dry_run: bool,
    pub roster: Option<PathBuf>,
    pub date_column: Option<String>,
    /// -g / --group: 配信先
    pub group: Option<String>,
    pub history: Option<PathBuf>,
    /// -p / --generator: openai | openai_compat | echo
    pub generator: Option<String>,
    pub model: Option<String>,
    pub max_attempts: Option<usize>,
    /// --today: 照合する日付の上書き
    pub today: Option<NaiveDate>,
    pub seed: Option<u64>,
    pub deliver_cmd: Option<String>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD ({})", e))
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("wisher")
        .about("Send today's birthday and event wishes to a group")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also write structured log records to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("dry-run")
                .long("dry-run")
                .help("Use the echo generator and console delivery; do not write history")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("roster")
                .short('r')
                .long("roster")
                .value_name("file")
                .help("Roster file (.xlsx, .xls, .xlsm, .ods or .json)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("date-column")
                .long("date-column")
                .value_name("column")
                .help("Roster column holding the event date (e.g. Date, DOB)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("group")
                .short('g')
                .long("group")
                .value_name("name")
                .help("Destination group or chat name")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("history")
                .long("history")
                .value_name("file")
                .help("Sent-message history file")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generator")
                .short('p')
                .long("generator")
                .value_name("type")
                .help("Message generator (openai, openai_compat, echo)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Model name for the generator (e.g. gpt-4o-mini)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-attempts")
                .long("max-attempts")
                .value_name("n")
                .help("Regenerations allowed per person before giving up on duplicates")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("today")
                .long("today")
                .value_name("YYYY-MM-DD")
                .help("Match events for this date instead of the current date")
                .value_parser(parse_date)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("seed")
                .long("seed")
                .value_name("n")
                .help("Seed for style and fallback selection")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("deliver-cmd")
                .long("deliver-cmd")
                .value_name("command")
                .help("Deliver by running this command (destination appended as argument, payload on stdin)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        dry_run: matches.get_flag("dry-run"),
        roster: matches.get_one::<PathBuf>("roster").cloned(),
        date_column: matches.get_one::<String>("date-column").cloned(),
        group: matches.get_one::<String>("group").cloned(),
        history: matches.get_one::<PathBuf>("history").cloned(),
        generator: matches.get_one::<String>("generator").cloned(),
        model: matches.get_one::<String>("model").cloned(),
        max_attempts: matches.get_one::<usize>("max-attempts").copied(),
        today: matches.get_one::<NaiveDate>("today").copied(),
        seed: matches.get_one::<u64>("seed").copied(),
        deliver_cmd: matches.get_one::<String>("deliver-cmd").cloned(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "wisher", &mut std::io::stdout());
}

/// Config を WisherCommand に変換する
pub fn config_to_command(config: &Config) -> WisherCommand {
    if config.help {
        return WisherCommand::Help;
    }
    WisherCommand::Run
}
