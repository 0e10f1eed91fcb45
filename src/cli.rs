use crate::catalog::Catalog;
use crate::config::{ResolvedConfig, ResolvedConfigFile};
use crate::engine::SearchParams;
use crate::errors::{AppError, AppResult};
use crate::manager::{FilterManager, ListOutcome, SearchManager, SearchSession};
use crate::models::{Program, SearchOutcome};
use crate::render::{outcome_to_html, outcome_to_text, program_deadline, EMPTY_LIST_MESSAGE};
use crate::search::{CorpusSource, MergedCorpus, PageSource};
use crate::utils::{parse_now, plural_suffix};
use chrono::{DateTime, Utc};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(value: &str) -> Self {
        match value {
            "html" => Self::Html,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn format_arg() -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .help("Output format")
        .value_parser(["text", "html", "json"])
        .default_value("text")
        .action(ArgAction::Set)
}

fn catalog_arg() -> Arg {
    Arg::new("catalog")
        .long("catalog")
        .help("TOML catalog to use instead of the built-in one")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn now_arg() -> Arg {
    Arg::new("now")
        .long("now")
        .help("Reference time for deadline badges (YYYY-MM-DD or RFC 3339)")
        .action(ArgAction::Set)
}

/// Filter flags shared by `list` and `cards`.
fn with_filter_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("query")
            .short('q')
            .long("query")
            .help("Substring of the program name")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("status")
            .short('s')
            .long("status")
            .help("Program status: open, upcoming or closed")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("benef")
            .short('b')
            .long("benef")
            .help("Beneficiary group: municipalities, organizations, publicServices, companies or individuals")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("region")
            .long("region")
            .help("Region name; 'regional' matches every program")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("order")
            .short('o')
            .long("order")
            .help("Sort order: relevance, openfirst, date or alpha")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("url_params")
            .long("url-params")
            .help("Portal query string, e.g. 'estado=open&orden=date'; explicit flags take precedence")
            .action(ArgAction::Set),
    )
    .arg(now_arg())
    .arg(catalog_arg())
}

/// Builds the command-line definition.
pub fn build_command() -> Command {
    Command::new("grants-cli")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            with_filter_args(
                Command::new("list")
                    .about("Filter and sort the program catalog")
                    .after_help("Example:\n  grants-cli list -s closed -b municipalities -o alpha"),
            )
            .arg(format_arg()),
        )
        .subcommand(
            with_filter_args(
                Command::new("cards").about("Render program cards as an HTML grid"),
            ),
        )
        .subcommand(
            Command::new("search")
                .about("Rank programs and page cards against a free-text query")
                .after_help("Example:\n  grants-cli search \"fndr 8%\" --limit 5")
                .arg(
                    Arg::new("query")
                        .help("Search text")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .help("HTML page whose program cards are searched before the catalog")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("base_url")
                        .long("base-url")
                        .help("Base URL for resolving links found on --page")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("limit")
                        .short('l')
                        .long("limit")
                        .help("Show only the top N results")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("realtime")
                        .long("realtime")
                        .help("Apply the search-as-you-type rules (debounce, minimum length, capped results)")
                        .conflicts_with("limit")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("TOML file with search settings (catalog, base URL, snippet and realtime limits)")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(format_arg())
                .arg(catalog_arg()),
        )
        .subcommand(
            Command::new("toml")
                .about("Run a saved list from a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(format_arg()),
        )
}

/// Parses command-line arguments and writes the result to stdout.
///
/// Subcommands:
/// - `list`: filter + sort the catalog, printed as text, HTML cards or JSON
/// - `cards`: same filters, always rendered as an HTML card grid
/// - `search`: score and rank a free-text query, optionally with settings from
///   a TOML file
/// - `toml`: a `list` run whose criteria and settings come from a TOML file
pub fn cli() -> AppResult<()> {
    let mut cmd_for_help = build_command();
    let matches = build_command().get_matches();

    if matches.subcommand().is_none() {
        return cmd_for_help
            .print_help()
            .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&matches, &mut out)
}

/// Executes already-parsed arguments, writing to `out`.
pub fn run(matches: &ArgMatches, out: &mut impl Write) -> AppResult<()> {
    match matches.subcommand() {
        Some(("list", sub)) => {
            let config = ResolvedConfig::default();
            let catalog = load_catalog(sub.get_one::<PathBuf>("catalog"), &config)?;
            let now = resolve_now(sub.get_one::<String>("now").map(String::as_str))?;
            let outcome = FilterManager::new(&catalog).apply_params(&params_from(sub));
            write_list(out, &outcome, now, format_of(sub))
        }
        Some(("cards", sub)) => {
            let config = ResolvedConfig::default();
            let catalog = load_catalog(sub.get_one::<PathBuf>("catalog"), &config)?;
            let now = resolve_now(sub.get_one::<String>("now").map(String::as_str))?;
            let outcome = FilterManager::new(&catalog).apply_params(&params_from(sub));
            write_list(out, &outcome, now, OutputFormat::Html)
        }
        Some(("search", sub)) => {
            let config = match sub.get_one::<PathBuf>("config") {
                Some(path) => ResolvedConfigFile::from_toml_file(path)?.resolved,
                None => ResolvedConfig::default(),
            };
            let catalog = load_catalog(sub.get_one::<PathBuf>("catalog"), &config)?;
            let query = sub
                .get_one::<String>("query")
                .map(String::as_str)
                .unwrap_or_default();
            let page = sub.get_one::<PathBuf>("page").map(|path| {
                let base = sub
                    .get_one::<String>("base_url")
                    .unwrap_or(&config.site_base_url);
                PageSource::from_file(path, base)
            });
            let corpus = MergedCorpus {
                page: page.as_ref().map(|p| p as &dyn CorpusSource),
                catalog: &catalog,
            };
            let manager = SearchManager::new(&corpus).with_config(&config);
            let outcome = if sub.get_flag("realtime") {
                typed_search(manager, query, config.debounce_ms)
            } else {
                manager.run(query, sub.get_one::<usize>("limit").copied())
            };
            info!(query, results = outcome.total(), "Search finished");

            match format_of(sub) {
                OutputFormat::Text => writeln!(out, "{}", outcome_to_text(&outcome))?,
                OutputFormat::Html => writeln!(out, "{}", outcome_to_html(&outcome))?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?,
            }
            Ok(())
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .ok_or_else(|| AppError::InvalidInput("config path is required".into()))?;
            let file_config = ResolvedConfigFile::from_toml_file(config_path)?;
            let catalog = load_catalog(None, &file_config.resolved)?;
            let now = resolve_now(file_config.now.as_deref())?;
            let outcome = FilterManager::new(&catalog).apply_params(&file_config.search_params());
            write_list(out, &outcome, now, format_of(sub))
        }
        _ => Err(AppError::InvalidInput("no subcommand given".into())),
    }
}

fn format_of(sub: &ArgMatches) -> OutputFormat {
    sub.get_one::<String>("format")
        .map(|f| OutputFormat::from(f.as_str()))
        .unwrap_or(OutputFormat::Text)
}

/// Combines `--url-params` with explicit flags; flags win.
fn params_from(sub: &ArgMatches) -> SearchParams {
    let mut params = sub
        .get_one::<String>("url_params")
        .map(|qs| SearchParams::from_query_string(qs))
        .unwrap_or_default();
    let flag = |id: &str| sub.get_one::<String>(id).cloned();
    if let Some(q) = flag("query") {
        params.q = q;
    }
    if let Some(status) = flag("status") {
        params.estado = status;
    }
    if let Some(benef) = flag("benef") {
        params.benef = benef;
    }
    if let Some(region) = flag("region") {
        params.region = region;
    }
    if let Some(order) = flag("order") {
        params.orden = order;
    }
    params
}

/// A command-line catalog path wins over the configured one.
fn load_catalog(cli_path: Option<&PathBuf>, config: &ResolvedConfig) -> AppResult<Catalog> {
    let path = cli_path.or(config.catalog_path.as_ref());
    let catalog = Catalog::load(path.map(PathBuf::as_path))?;
    info!(
        programs = catalog.len(),
        source = %path.map_or("built-in".to_string(), |p| p.display().to_string()),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Feeds `query` through a debounced session as one burst of typing and
/// returns what the search box shows once the quiet window has passed.
fn typed_search(manager: SearchManager<'_>, query: &str, debounce_ms: u64) -> SearchOutcome {
    let mut session = SearchSession::new(manager, debounce_ms);
    let typed_at = Instant::now();
    session.on_input(query, typed_at);
    session
        .tick(typed_at + Duration::from_millis(debounce_ms))
        .cloned()
        .unwrap_or(SearchOutcome::EmptyQuery)
}

fn resolve_now(raw: Option<&str>) -> AppResult<DateTime<Utc>> {
    match raw {
        Some(raw) => parse_now(raw).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Invalid time '{raw}': expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        }),
        None => Ok(Utc::now()),
    }
}

fn program_line(program: &Program, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{:<9} {}  [{}]",
        program.status.as_str(),
        program.name,
        program.benef_group.display_name()
    );
    let deadline = program_deadline(program, now);
    if deadline.visible {
        line.push_str(&format!("  ({})", deadline.label));
    }
    line
}

fn write_list(
    out: &mut impl Write,
    outcome: &ListOutcome,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> AppResult<()> {
    match format {
        OutputFormat::Html => writeln!(out, "{}", outcome.to_html(now))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(outcome)?)?,
        OutputFormat::Text => {
            let counts = &outcome.counts;
            writeln!(
                out,
                "{} program{} ({} open, {} upcoming, {} closed)",
                counts.total,
                plural_suffix(counts.total),
                counts.open,
                counts.upcoming,
                counts.closed
            )?;
            if outcome.is_empty() {
                writeln!(out, "{EMPTY_LIST_MESSAGE}")?;
            }
            for program in &outcome.programs {
                writeln!(out, "{}", program_line(program, now))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> AppResult<String> {
        let matches = build_command()
            .try_get_matches_from(args)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        let mut out = Vec::new();
        run(&matches, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn list_text_shows_counts_and_deadlines() {
        let out = run_args(&["grants-cli", "list", "--now", "2025-11-25", "-s", "open"]).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("2 programs (2 open, 0 upcoming, 0 closed)"));
        assert!(out.contains("PROYECTOS MENORES A 5.000 UTM"));
        assert!(out.contains("(closes in 5 days)"));
    }

    #[test]
    fn explicit_flags_override_url_params() {
        let out = run_args(&[
            "grants-cli",
            "list",
            "--now",
            "2025-11-25",
            "--url-params",
            "estado=open&benef=municipalities",
            "--status",
            "closed",
        ])
        .unwrap();
        assert!(out.starts_with("3 programs (0 open, 0 upcoming, 3 closed)"));
    }

    #[test]
    fn list_json_is_valid() {
        let out = run_args(&["grants-cli", "list", "-f", "json", "--now", "2025-11-25"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["counts"]["total"], 7);
        assert_eq!(value["order"], "relevance");
    }

    #[test]
    fn cards_are_html() {
        let out = run_args(&["grants-cli", "cards", "-q", "circular", "--now", "2025-11-25"]).unwrap();
        assert!(out.starts_with("<div id=\"grid\""));
        assert_eq!(out.matches("<article").count(), 1);
    }

    #[test]
    fn search_limit_reports_remaining() {
        let out = run_args(&["grants-cli", "search", "fondo", "--limit", "1"]).unwrap();
        assert!(out.starts_with("Found 2 results"));
        assert!(out.contains("And 1 more result."));
    }

    #[test]
    fn unreadable_page_shows_failed_state() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.html");
        let out = run_args(&[
            "grants-cli",
            "search",
            "fondo",
            "--page",
            missing.to_str().unwrap(),
        ])
        .unwrap();
        assert!(out.contains("An error occurred while searching"));
        assert!(!out.contains("Found"));
    }

    #[test]
    fn bad_base_url_shows_failed_state() {
        let dir = tempfile::TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        std::fs::write(&page, "<div data-program data-name=\"FRIL\"></div>").unwrap();
        let out = run_args(&[
            "grants-cli",
            "search",
            "fril",
            "--page",
            page.to_str().unwrap(),
            "--base-url",
            "not a url",
            "-f",
            "html",
        ])
        .unwrap();
        assert!(out.contains("error-state"));
    }

    #[test]
    fn search_config_caps_realtime_results() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("search.toml");
        std::fs::write(&config, "realtime_max_results = 1\ndebounce_ms = 5\n").unwrap();
        let out = run_args(&[
            "grants-cli",
            "search",
            "fondo",
            "--realtime",
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        assert!(out.starts_with("Found 2 results"));
        assert!(out.contains("And 1 more result."));
    }

    #[test]
    fn search_config_raises_realtime_minimum_length() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("search.toml");
        std::fs::write(&config, "realtime_min_query_len = 10\n").unwrap();
        let out = run_args(&[
            "grants-cli",
            "search",
            "fondo",
            "--realtime",
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        assert!(out.contains("Please enter a search term."));
    }

    #[test]
    fn realtime_conflicts_with_limit() {
        assert!(build_command()
            .try_get_matches_from(["grants-cli", "search", "fondo", "--realtime", "--limit", "2"])
            .is_err());
    }

    #[test]
    fn empty_list_shows_empty_state() {
        let text = run_args(&["grants-cli", "list", "-q", "zzzz", "--now", "2025-11-25"]).unwrap();
        assert!(text.starts_with("0 programs (0 open, 0 upcoming, 0 closed)"));
        assert!(text.contains(EMPTY_LIST_MESSAGE));

        let html = run_args(&["grants-cli", "cards", "-q", "zzzz", "--now", "2025-11-25"]).unwrap();
        assert!(html.contains("empty-state"));
        assert!(html.contains(EMPTY_LIST_MESSAGE));
    }

    #[test]
    fn invalid_now_is_rejected() {
        let err = run_args(&["grants-cli", "list", "--now", "tomorrow"]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn search_requires_query() {
        assert!(build_command()
            .try_get_matches_from(["grants-cli", "search"])
            .is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(build_command()
            .try_get_matches_from(["grants-cli", "list", "--format", "xml"])
            .is_err());
    }
}
