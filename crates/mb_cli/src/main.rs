// crates/mb_cli/src/main.rs
//
// basket-report: load summary.json + rules.json, build the dashboard, and
// emit the requested renderings. A document that fails to load is reported
// inline in the report and is not a failed run.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad flags, unreadable/invalid config, out-of-range assumptions.
    pub const USAGE: i32 = 2;
    /// Writing report artifacts failed.
    pub const IO: i32 = 4;
}

use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, resolve_config, Args, CliError, RenderKind};
use log::{info, warn};
use mb_io::config::{ReportConfig, DEFAULT_CTA};
use mb_io::output::{write_atomic, write_json};
use mb_io::prelude::*;
use mb_report::{
    render_html, render_json, render_text, Command, CtaBlock, Dashboard, DashboardState, DocIntent, ReportError,
    ReportModel, UiEvent,
};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Usage(String),
    Io(String),
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Usage(m) | MainError::Io(m) | MainError::Render(m) => f.write_str(m),
        }
    }
}

impl From<CliError> for MainError {
    fn from(e: CliError) -> Self {
        MainError::Usage(e.to_string())
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("basket-report: error: {e}");
            return ExitCode::from(exitcodes::USAGE as u8);
        }
    };
    init_logging(&args);

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("basket-report: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn init_logging(args: &Args) {
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn map_error(e: &MainError) -> i32 {
    match e {
        MainError::Usage(_) => exitcodes::USAGE,
        MainError::Io(_) | MainError::Render(_) => exitcodes::IO,
    }
}

fn map_load_err(e: LoadError) -> MainError {
    match e {
        LoadError::Config(m) => MainError::Usage(m),
        other => MainError::Io(other.to_string()),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let cfg = resolve_config(args)?;
    info!(
        "summary={} rules={} capture_rate={} avg_basket={} margin_per_unit={}",
        cfg.summary, cfg.rules, cfg.assumptions.capture_rate, cfg.assumptions.avg_basket, cfg.assumptions.margin_per_unit
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| MainError::Io(format!("runtime: {e}")))?;
    let model = rt.block_on(build_report(args, &cfg));

    write_artifacts(args, &model)
}

async fn build_report(args: &Args, cfg: &ReportConfig) -> ReportModel {
    let fetcher = Fetcher::new();
    let summary_src = Source::parse(&cfg.summary);
    let rules_src = Source::parse(&cfg.rules);

    let load = load_dashboard(&fetcher, &summary_src, &rules_src).await;
    let state = DashboardState::from_load(load, &summary_src, &rules_src);
    let mut dash = Dashboard::new(state, cfg.assumptions, cfg.currency_symbol.clone(), cfg.doc.clone());

    if args.open_doc {
        let cmds = dash.dispatch(UiEvent::DocToggle(DocIntent::Open));
        run_commands(&fetcher, &mut dash, cmds).await;
    }

    let targets: Vec<Source> = cfg.cta.iter().map(|s| relative_to_report(&args.out, Source::parse(s))).collect();
    let reachable = probe_any(&fetcher, &targets).await;
    if !reachable {
        info!("no CTA target reachable; link disabled");
    }
    let href = cfg.cta.first().map(String::as_str).unwrap_or(DEFAULT_CTA);
    dash.model(CtaBlock::new(href, reachable))
}

/// The CTA href is followed from the written report, so local targets are
/// checked relative to the output directory rather than the working directory.
fn relative_to_report(out: &Path, src: Source) -> Source {
    match src {
        Source::Local(p) => Source::Local(out.join(p)),
        url => url,
    }
}

/// Execute the side effects the dashboard asked for, feeding results back in.
async fn run_commands(fetcher: &Fetcher, dash: &mut Dashboard, mut queue: Vec<Command>) {
    while let Some(Command::FetchDoc(path)) = queue.pop() {
        let outcome = load_text(fetcher, &Source::parse(&path))
            .await
            .map(|doc| doc.value)
            .map_err(|e| e.to_string());
        if let Err(cause) = &outcome {
            warn!("document unavailable: {cause}");
        }
        queue.extend(dash.dispatch(UiEvent::DocFetched(outcome)));
    }
}

fn write_artifacts(args: &Args, model: &ReportModel) -> Result<(), MainError> {
    for kind in &args.render {
        match kind {
            RenderKind::Html => {
                let path = args.out.join("report.html");
                write_atomic(&path, render_html(model).as_bytes()).map_err(map_load_err)?;
                status(args, &path);
            }
            RenderKind::Json => {
                let path = args.out.join("report.json");
                let v = render_json(model).map_err(map_report_err)?;
                write_json(&path, &v).map_err(map_load_err)?;
                status(args, &path);
            }
            RenderKind::Text => print!("{}", render_text(model)),
        }
    }
    Ok(())
}

fn status(args: &Args, path: &Path) {
    if !args.quiet {
        eprintln!("basket-report: wrote {}", path.display());
    }
}
