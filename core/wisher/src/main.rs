mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::WisherCommand;
use ports::inbound::UseCaseRunner;
use std::process;
use usecase::app::RunReport;
use wiring::{build_use_case, wire_wisher, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(&config);
        let command_name = cmd_name_for_log(&cmd);
        self.log(
            LogRecord::new(LogLevel::Info, "command started")
                .kind("lifecycle")
                .field("command", command_name)
                .field("dry_run", config.dry_run),
        );

        let result = match cmd {
            WisherCommand::Help => {
                print_help();
                Ok(0)
            }
            WisherCommand::Run => build_use_case(&self.app, &config)
                .and_then(|use_case| use_case.run())
                .map(|report| {
                    print_report(&report, config.dry_run);
                    0
                }),
        };

        let code = match &result {
            Ok(code) => *code,
            Err(e) => e.exit_code(),
        };
        self.log(
            LogRecord::new(LogLevel::Info, "command finished")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            self.log(LogRecord::new(LogLevel::Error, e.to_string()).kind("error"));
        }
        result
    }
}

impl Runner {
    fn log(&self, record: LogRecord) {
        let _ = self.app.logger.log(&record.layer("cli"));
    }
}

fn cmd_name_for_log(cmd: &WisherCommand) -> &'static str {
    match cmd {
        WisherCommand::Help => "help",
        WisherCommand::Run => "run",
    }
}

fn print_report(report: &RunReport, dry_run: bool) {
    match report {
        RunReport::NothingToday => println!("No events today. Exiting..."),
        RunReport::Delivered {
            destination,
            channel,
            count,
            fallbacks,
        } => {
            let noun = if *count == 1 { "wish" } else { "wishes" };
            eprintln!("Sent {} {} to '{}' via {}.", count, noun, destination, channel);
            if *fallbacks > 0 {
                eprintln!("{} of them used a fallback template (generator unavailable).", fallbacks);
            }
            if dry_run {
                eprintln!("Dry run: history file was not modified.");
            }
        }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("wisher: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_wisher(config.verbose);
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: wisher [options]");
}

fn print_help() {
    println!("Usage: wisher [options]");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -r, --roster <file>           Roster file (.xlsx, .xls, .xlsm, .ods or .json). Default: Students.xlsx in the current directory");
    println!("  --date-column <column>        Roster column holding the event date. Default: Date (DOB is also recognised)");
    println!("  -g, --group <name>            Destination group or chat name. Default: wishes grp");
    println!("  --history <file>              Sent-message history file. Default: $WISHER_HOME/wish_history.json");
    println!("  -p, --generator <type>        Message generator: openai, openai_compat, echo. Default: openai");
    println!("  -m, --model <model>           Model name for the generator. Default: gpt-4o-mini");
    println!("  --max-attempts <n>            Regenerations per person when a message repeats. Default: 10");
    println!("  --today <YYYY-MM-DD>          Match events for this date instead of today");
    println!("  --seed <n>                    Seed for style and fallback selection (reproducible runs)");
    println!("  --deliver-cmd <command>       Deliver by running a command: destination as last argument, payload on stdin");
    println!("  --dry-run                     Echo generator and console delivery; history is read but not written");
    println!("  -v, --verbose                 Also write structured log records to stderr");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish, ...)");
    println!();
    println!("Environment:");
    println!("  WISHER_HOME      Home directory (config.json, wish_history.json, logs/wisher.jsonl).");
    println!("                   If unset, $XDG_CONFIG_HOME/wisher (e.g. ~/.config/wisher) is used.");
    println!("  OPENAI_API_KEY   API key for the openai generator (name configurable via generator.api_key_env).");
    println!();
    println!("Description:");
    println!("  Finds roster entries whose event date (day and month) is today, writes a personal");
    println!("  message for each that has not been sent to that person before, records it in the");
    println!("  history and delivers all messages to the group in one payload.");
    println!();
    println!("Examples:");
    println!("  wisher");
    println!("  wisher -r staff.json --date-column DOB -g \"staff room\"");
    println!("  wisher --dry-run --today 2025-01-01");
}
