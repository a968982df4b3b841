use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressDrawTarget, ProgressStyle};
use log::LevelFilter;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::args::CliArgs;
use crate::cli::interactive::{self, InputCommand};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, table, OutputFormat, PageExport};
use crate::pager::{CountStatus, Event, Navigation};
use crate::session::retry::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_DELAY_MS,
};
use crate::session::{RetryPolicy, Session, SessionOptions};
use crate::source::{HttpRecordSource, HttpSourceOptions, RecordSource, DEFAULT_BASE_URL};
use crate::window::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug)]
struct RunConfig {
    base_url: String,
    page_size: u64,
    initial_page: u64,
    query: String,
    interactive: bool,
    timeout: u64,
    proxy: Option<String>,
    header: Option<String>,
    retry: RetryPolicy,
    no_color: bool,
    output: Option<String>,
    output_format: Option<OutputFormat>,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let base_url = args
        .base_url
        .or(cfg.base_url)
        .map(|u| u.trim().to_string())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    reqwest::Url::parse(&base_url).map_err(|e| format!("invalid base URL '{base_url}': {e}"))?;

    let page_size = args.page_size.or(cfg.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err("invalid page_size, expected positive integer".to_string());
    }
    let initial_page = args.page.unwrap_or(1);
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);

    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let header = args.header.or(cfg.header).filter(|h| !h.trim().is_empty());

    let attempts = args
        .retry_attempts
        .or(cfg.retry_attempts)
        .unwrap_or(DEFAULT_RETRY_ATTEMPTS);
    let base_delay_ms = args
        .retry_base_delay_ms
        .or(cfg.retry_base_delay_ms)
        .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS);
    let max_delay_ms = args
        .retry_max_delay_ms
        .or(cfg.retry_max_delay_ms)
        .unwrap_or(DEFAULT_RETRY_MAX_DELAY_MS);
    if attempts == 0 || attempts > validation::MAX_RETRY_ATTEMPTS {
        return Err(format!(
            "invalid retry_attempts, expected 1 to {}",
            validation::MAX_RETRY_ATTEMPTS
        ));
    }
    if base_delay_ms > max_delay_ms {
        return Err("retry base delay must not exceed retry max delay".to_string());
    }
    let retry = RetryPolicy {
        attempts,
        base_delay: Duration::from_millis(base_delay_ms),
        max_delay: Duration::from_millis(max_delay_ms),
    };

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or xml"))?,
        ),
        None => None,
    };

    Ok(RunConfig {
        base_url,
        page_size,
        initial_page,
        query: args.query.unwrap_or_default(),
        interactive: args.interactive,
        timeout,
        proxy,
        header,
        retry,
        no_color,
        output,
        output_format,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    // RUST_LOG is parsed last so it wins over -v
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn page_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} loading records {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn render_view<S>(session: &Session<S>, color: bool) -> String
where
    S: RecordSource + 'static,
{
    let state = session.state();
    let filtered = session.filtered_page();
    let mut out = String::new();
    out.push_str(&table::render_menu(state.menu(), color));
    out.push('\n');
    out.push_str(&table::render_table(&filtered, color));
    out.push('\n');
    out.push_str(&table::render_controls(state, filtered.len(), color));
    out
}

fn warn_if_countless<S>(session: &Session<S>)
where
    S: RecordSource + 'static,
{
    if session.state().count_status() == CountStatus::Failed {
        eprintln!(
            "{} could not load the record count, no pages are available",
            "warning:".bold().yellow()
        );
    }
}

async fn write_output<S>(session: &Session<S>, run: &RunConfig) -> Result<(), String>
where
    S: RecordSource + 'static,
{
    let outfile_path = match run.output.as_ref() {
        Some(path) => path,
        None => return Ok(()),
    };
    let format = run
        .output_format
        .or_else(|| output::infer_format_from_path(outfile_path))
        .unwrap_or(OutputFormat::Text);

    let state = session.state();
    let export = PageExport {
        page: state.current_page(),
        page_size: state.page_size(),
        total_count: state.total_count(),
        query: state.query(),
        addresses: session.filtered_page(),
    };
    let rendered = output::render(format, &export);

    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(outfile_path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|e| format!("failed to write output file: {e}"))?;
    Ok(())
}

enum Step {
    Input(std::io::Result<Option<String>>),
    Loaded(Event),
}

async fn run_interactive<S>(mut session: Session<S>, color: bool) -> Result<(), String>
where
    S: RecordSource + 'static,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{}", render_view(&session, color));
    println!("type 'h' for help");

    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Input(line),
            Some(event) = session.next_event() => Step::Loaded(event),
        };
        match step {
            Step::Input(Ok(Some(line))) => match interactive::parse_line(&line) {
                InputCommand::Next => session.dispatch(Event::Navigate(Navigation::Next)),
                InputCommand::Previous => {
                    session.dispatch(Event::Navigate(Navigation::Previous))
                }
                InputCommand::GoTo(page) => {
                    session.dispatch(Event::Navigate(Navigation::GoTo(page)))
                }
                InputCommand::Search(query) => session.set_filter_query(query),
                InputCommand::Redraw => {}
                InputCommand::Help => {
                    print!("{}", interactive::HELP);
                    continue;
                }
                InputCommand::Quit => break,
                InputCommand::Invalid(message) => {
                    eprintln!("{} {message}", "error:".bold().red());
                    continue;
                }
            },
            Step::Input(Ok(None)) => break,
            Step::Input(Err(e)) => return Err(format!("failed to read stdin: {e}")),
            Step::Loaded(event) => session.dispatch(event),
        }
        println!();
        print!("{}", render_view(&session, color));
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let color = !run.no_color;

    let source = HttpRecordSource::new(&HttpSourceOptions {
        base_url: run.base_url.clone(),
        timeout_seconds: run.timeout,
        proxy: run.proxy.clone(),
        header: run.header.clone(),
    })
    .map_err(|e| e.to_string())?;

    let options = SessionOptions {
        page_size: run.page_size,
        initial_page: run.initial_page,
        retry: run.retry,
    };
    let mut session = Session::new(source, options);
    if run.interactive {
        session = session.with_progress(
            MultiProgress::with_draw_target(ProgressDrawTarget::stderr()),
            page_progress_style(),
        );
    }
    session.start().await;
    warn_if_countless(&session);
    if !run.query.is_empty() {
        session.set_filter_query(run.query.clone());
    }

    if run.interactive {
        return run_interactive(session, color).await;
    }

    print!("{}", render_view(&session, color));
    write_output(&session, &run).await
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine config path".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote default config to {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use crate::tests::support::StubSource;

    fn export_path(ext: &str) -> String {
        std::env::temp_dir()
            .join(format!("addrbook-export-{}.{ext}", std::process::id()))
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn defaults_without_config() {
        let args = CliArgs::parse_from(["addrbook"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.base_url, DEFAULT_BASE_URL);
        assert_eq!(run.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(run.initial_page, 1);
        assert_eq!(run.retry, RetryPolicy::default());
        assert!(!run.interactive);
        assert!(run.query.is_empty());
    }

    #[test]
    fn flags_override_config() {
        let cfg = ConfigFile {
            base_url: Some("http://config.local/v1".to_string()),
            page_size: Some(20),
            retry_attempts: Some(5),
            ..Default::default()
        };
        let args = CliArgs::parse_from([
            "addrbook",
            "--base-url",
            "http://flag.local/v1",
            "--retry-attempts",
            "2",
        ]);
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.base_url, "http://flag.local/v1");
        assert_eq!(run.page_size, 20);
        assert_eq!(run.retry.attempts, 2);
    }

    #[test]
    fn color_flag_beats_config_no_color() {
        let cfg = ConfigFile {
            no_color: Some(true),
            ..Default::default()
        };
        let run = build_run_config(CliArgs::parse_from(["addrbook"]), cfg.clone()).unwrap();
        assert!(run.no_color);
        let run = build_run_config(CliArgs::parse_from(["addrbook", "--color"]), cfg).unwrap();
        assert!(!run.no_color);
    }

    #[test]
    fn config_delays_are_checked() {
        let cfg = ConfigFile {
            retry_base_delay_ms: Some(5_000),
            retry_max_delay_ms: Some(100),
            ..Default::default()
        };
        assert!(build_run_config(CliArgs::parse_from(["addrbook"]), cfg).is_err());
    }

    #[test]
    fn output_path_is_tilde_expanded_and_format_parsed() {
        let cfg = ConfigFile {
            output_format: Some("xml".to_string()),
            ..Default::default()
        };
        let args = CliArgs::parse_from(["addrbook", "-o", "/tmp/page.xml", "-q", "main"]);
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.output.as_deref(), Some("/tmp/page.xml"));
        assert_eq!(run.output_format, Some(OutputFormat::Xml));
        assert_eq!(run.query, "main");
    }

    #[test]
    fn config_retry_attempts_share_cli_limit() {
        let cfg = ConfigFile {
            retry_attempts: Some(11),
            ..Default::default()
        };
        let err = build_run_config(CliArgs::parse_from(["addrbook"]), cfg).unwrap_err();
        assert!(err.contains("retry_attempts"));

        let cfg = ConfigFile {
            retry_attempts: Some(10),
            ..Default::default()
        };
        let run = build_run_config(CliArgs::parse_from(["addrbook"]), cfg).unwrap();
        assert_eq!(run.retry.attempts, 10);
    }

    #[tokio::test]
    async fn output_file_uses_format_from_extension() {
        let path = export_path("json");
        let args = CliArgs::parse_from(["addrbook", "-o", path.as_str(), "-q", "main"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.output_format, None);

        let source = StubSource::with_total(25).failing([3]);
        let mut session = Session::new(source, SessionOptions::default());
        session.start().await;
        session.set_filter_query(run.query.clone());
        write_output(&session, &run).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["page"], 1);
        assert_eq!(value["total_count"], 25);
        assert_eq!(value["query"], "main");
        let ids: Vec<u64> = value["addresses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[tokio::test]
    async fn explicit_output_format_beats_extension() {
        let path = export_path("out");
        let args = CliArgs::parse_from(["addrbook", "-o", path.as_str(), "--of", "xml"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();

        let mut session = Session::new(StubSource::with_total(4), SessionOptions::default());
        session.start().await;
        write_output(&session, &run).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(written.starts_with("<?xml"));
        assert!(written.contains("total=\"4\""));
    }
}
