use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use lessond::client::{LessonManager, LocalApi};
use lessond::{db, http, ipc};

#[derive(Debug, Parser)]
#[command(name = "lessond", version, about = "Lesson planning backend")]
struct Cli {
    /// Workspace directory holding the lesson database.
    #[arg(long, global = true, env = "LESSOND_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `lessond=debug`.
    #[arg(long, global = true, env = "LESSOND_LOG", default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Line-delimited JSON requests on stdin, responses on stdout (default).
    Stdio,
    /// Serve the REST API.
    Serve {
        #[arg(long, env = "LESSOND_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Export one lesson without starting a server.
    Export {
        #[arg(long)]
        lesson: String,
        #[arg(long, value_enum, default_value_t = ExportFormat::Html)]
        format: ExportFormat,
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Html,
    Email,
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let result = match cli.command.unwrap_or(Command::Stdio) {
        Command::Stdio => run_stdio(cli.workspace.as_deref()),
        Command::Serve { addr } => run_serve(cli.workspace.as_deref(), addr),
        Command::Export {
            lesson,
            format,
            out,
        } => run_export(cli.workspace.as_deref(), &lesson, format, out.as_deref()),
    };
    if let Err(e) = result {
        tracing::error!("lessond failed: {:#}", e);
        std::process::exit(1);
    }
}

fn require_workspace(workspace: Option<&Path>) -> anyhow::Result<&Path> {
    workspace.ok_or_else(|| anyhow!("--workspace (or LESSOND_WORKSPACE) is required"))
}

fn run_stdio(workspace: Option<&Path>) -> anyhow::Result<()> {
    let mut state = ipc::AppState::default();
    if let Some(path) = workspace {
        state.open_workspace(path)?;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request line");
                // No id to echo back.
                let resp = json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    Ok(())
}

fn run_serve(workspace: Option<&Path>, addr: SocketAddr) -> anyhow::Result<()> {
    let conn = db::open_db(require_workspace(workspace)?)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(http::serve(conn, addr))
}

fn run_export(
    workspace: Option<&Path>,
    lesson_id: &str,
    format: ExportFormat,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let api = LocalApi::open(require_workspace(workspace)?)?;
    let mut manager = LessonManager::new(api);
    manager.load_lessons();
    if manager.lessons().iter().all(|l| l.id != lesson_id) {
        return Err(anyhow!("lesson not found: {}", lesson_id));
    }
    manager.select(lesson_id);

    let rendered = match format {
        ExportFormat::Html => manager
            .download_html()
            .map(|d| d.html)
            .ok_or_else(|| anyhow!("no lesson selected"))?,
        ExportFormat::Email => {
            let payload = manager
                .email_payload()
                .ok_or_else(|| anyhow!("no lesson selected"))?;
            serde_json::to_string_pretty(&payload).context("failed to serialize email payload")?
        }
    };

    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.to_string_lossy()))?;
            tracing::info!(lesson_id, out = %path.display(), "lesson exported");
        }
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(rendered.as_bytes())
                .context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }
    Ok(())
}
