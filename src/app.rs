use std::io::Write;
use std::time::Duration;

use chrono::Local;
use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::model::{self, OfferDraft};
use crate::output::{self, OutputFormat};
use crate::query::{Filters, InsuranceSelector};
use crate::session::{DeleteOutcome, Session};
use crate::store::{StoreClient, StoreConfig};
use crate::utils;

fn print_banner() {
    const BANNER: &str = r#"
         ____               __           __
   ___  / __/ _____  ______/ /__  ___   / /__
  / _ \/ /_/ /_/ _ \/ ___/ _  / / _ \ / / __/
 / ___/ __/ __/  __/ /  / /_/ //  __//  <
 \___/_/ /_/  \___/_/   \__,_/ \___/_/|_|
       v0.3.1 - offers desk client
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

const HELP: &str = "\
commands:
  show                       re-render the current table and totals
  filter <field> [value]     set one filter field; no value clears it
                             fields: vertical settle title rate-min rate-max
                                     volume-min volume-max date-from date-to
                                     insurance (any|yes|no)
  reset                      clear every filter
  add k=v, k=v, ...          insert an offer
                             fields: title vertical settle rate volume
                                     date (YYYY-MM-DD) insurance (yes|no)
  del <id>                   delete an offer (asks for confirmation)
  export <file> [format]     write the result set (text, json, or csv)
  help                       this text
  quit                       leave";

#[derive(Clone, Debug, PartialEq)]
enum ShellCommand {
    Help,
    Quit,
    Show,
    Reset,
    Filter { field: String, value: String },
    Add { raw: String },
    Delete { id: i64 },
    Export { path: String, format: Option<String> },
}

fn split_word(input: &str) -> (&str, &str) {
    let trimmed = input.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (trimmed, ""),
    }
}

fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let (word, rest) = split_word(trimmed);
    let command = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "show" | "list" | "ls" => ShellCommand::Show,
        "reset" => ShellCommand::Reset,
        "filter" | "f" => {
            let (field, value) = split_word(rest);
            if field.is_empty() {
                return Err("filter requires a field name, try 'help'".to_string());
            }
            ShellCommand::Filter {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "add" | "a" => ShellCommand::Add {
            raw: rest.to_string(),
        },
        "del" | "delete" | "rm" => {
            let raw = rest.trim().trim_start_matches('#');
            let id = raw
                .parse::<i64>()
                .map_err(|_| format!("invalid offer id '{raw}'"))?;
            ShellCommand::Delete { id }
        }
        "export" => {
            let (path, format) = split_word(rest);
            if path.is_empty() {
                return Err("export requires a file path".to_string());
            }
            ShellCommand::Export {
                path: path.to_string(),
                format: if format.is_empty() {
                    None
                } else {
                    Some(format.to_string())
                },
            }
        }
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

fn apply_filter_field(filters: &mut Filters, field: &str, value: &str) -> Result<(), String> {
    let value = value.trim();
    let text = || {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };
    match field.to_ascii_lowercase().as_str() {
        "vertical" => filters.vertical = text(),
        "settle" => filters.settle = text(),
        "title" => filters.title = text(),
        "rate-min" => {
            filters.rate_min = if value.is_empty() {
                None
            } else {
                Some(utils::parse_f64(value)?)
            }
        }
        "rate-max" => {
            filters.rate_max = if value.is_empty() {
                None
            } else {
                Some(utils::parse_f64(value)?)
            }
        }
        "volume-min" => {
            filters.volume_min = if value.is_empty() {
                None
            } else {
                Some(utils::parse_i64(value)?)
            }
        }
        "volume-max" => {
            filters.volume_max = if value.is_empty() {
                None
            } else {
                Some(utils::parse_i64(value)?)
            }
        }
        "date-from" => {
            filters.date_from = if value.is_empty() {
                None
            } else {
                Some(model::parse_date(value).map_err(|e| e.to_string())?)
            }
        }
        "date-to" => {
            filters.date_to = if value.is_empty() {
                None
            } else {
                Some(model::parse_date(value).map_err(|e| e.to_string())?)
            }
        }
        "insurance" => {
            filters.insurance = InsuranceSelector::parse(value)
                .ok_or_else(|| format!("invalid insurance '{value}', expected any, yes, or no"))?
        }
        other => return Err(format!("unknown filter field '{other}', try 'help'")),
    }
    Ok(())
}

fn parse_draft(input: &str) -> Result<OfferDraft, String> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err("add requires key=value pairs, e.g. add title=Acme push, rate=250".to_string());
    }
    let mut draft = OfferDraft::default();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let (key, value) = item
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{item}'"))?;
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "title" => draft.title = value.to_string(),
            "vertical" => draft.vertical = value.to_string(),
            "settle" => draft.settle = value.to_string(),
            "rate" => draft.rate = value.to_string(),
            "volume" => draft.volume = value.to_string(),
            "date" => draft.date = value.to_string(),
            "insurance" => {
                draft.insurance = match InsuranceSelector::parse(value) {
                    Some(InsuranceSelector::Yes) => true,
                    Some(InsuranceSelector::No) => false,
                    _ => return Err(format!("invalid insurance '{value}', expected yes or no")),
                }
            }
            other => return Err(format!("unknown field '{other}'")),
        }
    }
    Ok(draft)
}

#[derive(Clone, Debug)]
struct RunConfig {
    endpoint: String,
    api_key: String,
    table: String,
    timeout_seconds: u64,
    proxy: Option<String>,
    filters: Filters,
    once: bool,
    output: Option<String>,
    output_format: Option<String>,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let endpoint = args
        .endpoint
        .or(cfg.endpoint)
        .ok_or_else(|| "endpoint is required (--ep or config endpoint)".to_string())?;

    let env_key = std::env::var("OFFERDESK_API_KEY")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let api_key = args
        .api_key
        .or(env_key)
        .or(cfg.api_key)
        .ok_or_else(|| {
            "API key is required (--key, OFFERDESK_API_KEY, or config api_key)".to_string()
        })?;

    let table = args.table.or(cfg.table).unwrap_or_else(|| "offers".to_string());
    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = args.output_format.or(cfg.output_format);

    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let mut filters = Filters {
        vertical: non_empty(args.vertical),
        settle: non_empty(args.settle),
        title: non_empty(args.title),
        rate_min: args.rate_min,
        rate_max: args.rate_max,
        volume_min: args.volume_min,
        volume_max: args.volume_max,
        ..Filters::default()
    };
    if let Some(raw) = args.date_from.as_deref() {
        filters.date_from = Some(model::parse_date(raw).map_err(|e| e.to_string())?);
    }
    if let Some(raw) = args.date_to.as_deref() {
        filters.date_to = Some(model::parse_date(raw).map_err(|e| e.to_string())?);
    }
    if let Some(raw) = args.insurance.as_deref() {
        filters.insurance = InsuranceSelector::parse(raw).unwrap_or_default();
    }

    Ok(RunConfig {
        endpoint,
        api_key,
        table,
        timeout_seconds,
        proxy,
        filters,
        once: args.once,
        output,
        output_format,
        no_color,
    })
}

fn render_view(session: &Session) {
    if let Some(err) = session.read_error() {
        println!("{}", format!("read failed: {err}").red());
    }
    print!(
        "{}",
        output::render_table(&output::build_rows(session.offers()))
    );
    format_kv_line("Totals", &output::totals_line(&session.totals()));
    if let Some(summary) = session.filters().summary() {
        format_kv_line("Filters", &summary);
    }
}

async fn apply_filters_with_spinner(session: &mut Session, filters: Filters) {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_message("querying offers...");
    pb.enable_steady_tick(Duration::from_millis(120));
    session.apply_filters(filters).await;
    pb.finish_and_clear();
}

async fn export_rows(
    session: &Session,
    path: &str,
    format: Option<&str>,
) -> Result<(), String> {
    let explicit = match format {
        Some(raw) => Some(
            OutputFormat::parse(raw)
                .ok_or_else(|| format!("invalid format '{raw}', expected text, json, or csv"))?,
        ),
        None => None,
    };
    let format = explicit
        .or_else(|| output::infer_format_from_path(path))
        .unwrap_or(OutputFormat::Text);

    let rows = output::build_rows(session.offers());
    let rendered = match format {
        OutputFormat::Text => output::render_text(&rows),
        OutputFormat::Json => output::render_json(&rows),
        OutputFormat::Csv => output::render_csv(&rows),
    };
    tokio::fs::write(path, rendered)
        .await
        .map_err(|e| format!("failed to write output file '{path}': {e}"))
}

fn prompt(text: &str) -> Result<(), String> {
    print!("{text}");
    std::io::stdout()
        .flush()
        .map_err(|e| format!("failed to flush stdout: {e}"))
}

async fn next_input_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>, String> {
    lines
        .next_line()
        .await
        .map_err(|e| format!("failed to read input: {e}"))
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();

    format_kv_line(
        "Store",
        &format!("endpoint={} table={}", run.endpoint, run.table),
    );
    format_kv_line(
        "HTTP",
        &format!(
            "timeout={}s proxy={}",
            run.timeout_seconds,
            if run.proxy.is_some() { "on" } else { "off" }
        ),
    );
    format_kv_line(
        "Filters",
        run.filters.summary().as_deref().unwrap_or("none"),
    );
    format_kv_line("Mode", if run.once { "one-shot" } else { "interactive" });
    println!();

    let client = StoreClient::new(&StoreConfig {
        endpoint: run.endpoint.clone(),
        api_key: run.api_key.clone(),
        table: run.table.clone(),
        timeout_seconds: run.timeout_seconds,
        proxy: run.proxy.clone(),
    })
    .map_err(|e| e.to_string())?;

    let mut session = Session::new(client);
    // one read per filter state, including the initial one
    apply_filters_with_spinner(&mut session, run.filters.clone()).await;
    render_view(&session);

    if run.once {
        if let Some(path) = run.output.as_deref() {
            export_rows(&session, path, run.output_format.as_deref()).await?;
            println!("wrote {path}");
        }
        return Ok(());
    }

    println!("type 'help' for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ")?;
        let Some(line) = next_input_line(&mut lines).await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", msg.red());
                continue;
            }
        };
        match command {
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
            ShellCommand::Show => render_view(&session),
            ShellCommand::Reset => {
                apply_filters_with_spinner(&mut session, Filters::default()).await;
                render_view(&session);
            }
            ShellCommand::Filter { field, value } => {
                let mut filters = session.filters().clone();
                if let Err(msg) = apply_filter_field(&mut filters, &field, &value) {
                    println!("{}", msg.red());
                    continue;
                }
                apply_filters_with_spinner(&mut session, filters).await;
                render_view(&session);
            }
            ShellCommand::Add { raw } => {
                let offer = parse_draft(&raw).and_then(|draft| {
                    draft
                        .parse(Local::now().date_naive())
                        .map_err(|e| e.to_string())
                });
                match offer {
                    Ok(offer) => match session.create(&offer).await {
                        Ok(()) => {
                            println!("{}", "offer added".green());
                            render_view(&session);
                        }
                        Err(e) => println!("{}", format!("create failed: {e}").red()),
                    },
                    Err(msg) => println!("{}", msg.red()),
                }
            }
            ShellCommand::Delete { id } => {
                prompt(&format!("delete offer #{id}? [y/N] "))?;
                let answer = next_input_line(&mut lines).await?.unwrap_or_default();
                let confirmed = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
                match session.delete(id, confirmed).await {
                    Ok(DeleteOutcome::Deleted) => {
                        println!("{}", format!("offer #{id} deleted").green());
                        render_view(&session);
                    }
                    Ok(DeleteOutcome::Cancelled) => println!("cancelled"),
                    Err(e) => println!("{}", format!("delete failed: {e}").red()),
                }
            }
            ShellCommand::Export { path, format } => {
                match export_rows(&session, &path, format.as_deref()).await {
                    Ok(()) => println!("wrote {path}"),
                    Err(msg) => println!("{}", msg.red()),
                }
            }
        }
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let cfg = match args.config.as_deref() {
        Some(path) => {
            let path = config::expand_tilde(path);
            config::load_config(&path, false)?
        }
        None => match config::default_config_path() {
            Some(path) => {
                let _ = config::ensure_default_config_file(&path);
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
