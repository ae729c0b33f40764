//! Command line client for the Pagemark backend.

use clap::{Parser, Subcommand};
use pagemark_app::{AppConfig, ConfigError, HttpBackend, PromptResponse, ShortcutRegistry, ViewerSession};
use pagemark_core::document::DocumentUpload;
use pagemark_core::engine::{MemoryEngine, MemoryPage};
use pagemark_core::mode::ViewerMode;
use pagemark_core::store::{AnnotationBackend, BackendError};
use pagemark_render::RecordingSurface;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pagemark", about = "Pagemark document and annotation client")]
struct Cli {
    /// Backend base URL (overrides PAGEMARK_BACKEND_URL).
    #[arg(long)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List documents with their annotation counts.
    Documents,
    /// Show one document.
    Document { id: i64 },
    /// Upload a PDF.
    Upload {
        path: PathBuf,
        #[arg(long)]
        document_type: Option<i64>,
    },
    /// List document types.
    Types,
    /// List the data elements of a document type.
    Elements { document_type: i64 },
    /// List the annotations of a document.
    Annotations { document_id: i64 },
    /// Print the viewer's keyboard shortcuts.
    Shortcuts,
    /// Open a document in a headless viewer, replay shortcut keys and
    /// report where the viewer ended up.
    View {
        document_id: i64,
        /// Number of letter-sized pages to simulate.
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Keys such as `ArrowRight`, `Ctrl+=` or `R`.
        keys: Vec<String>,
    },
}

#[derive(Serialize)]
struct ViewReport {
    file_path: Option<String>,
    page: u32,
    page_count: u32,
    scale: f64,
    rotation: u16,
    mode: ViewerMode,
    annotations_on_page: usize,
    overlay_commands: usize,
    notifications: Vec<String>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Splits `Ctrl+Shift+K` into the key and its modifiers.
fn parse_combo(combo: &str) -> (&str, bool, bool) {
    let (mut ctrl, mut shift) = (false, false);
    let mut key = combo;
    loop {
        if let Some(rest) = key.strip_prefix("Ctrl+").filter(|r| !r.is_empty()) {
            ctrl = true;
            key = rest;
        } else if let Some(rest) = key.strip_prefix("Shift+").filter(|r| !r.is_empty()) {
            shift = true;
            key = rest;
        } else {
            return (key, ctrl, shift);
        }
    }
}

fn view(
    config: AppConfig,
    backend: HttpBackend,
    document_id: i64,
    pages: u32,
    keys: &[String],
) -> Result<ViewReport, CliError> {
    let descriptor = pollster::block_on(backend.document(document_id))?;
    let url = config.document_url(&descriptor.file_path)?;
    let engine = MemoryEngine::new()
        .with_document(url.as_str(), vec![MemoryPage::letter(); pages.max(1) as usize])
        .auto_complete(true);
    let prompt = Box::new(|_: &[String]| PromptResponse::Discard);
    let mut session = ViewerSession::new(
        config,
        Arc::new(backend),
        Box::new(engine),
        RecordingSurface::new(),
        prompt,
    );

    pollster::block_on(session.load_document(descriptor));
    session.tick(Instant::now());
    for key in keys {
        let (name, ctrl, shift) = parse_combo(key);
        match ShortcutRegistry::lookup(name, ctrl, shift) {
            Some(event) => {
                pollster::block_on(session.handle_input(event, Instant::now()));
                session.tick(Instant::now());
            }
            None => log::warn!("No shortcut bound to {key}"),
        }
    }

    let viewport = session.viewport();
    let page = viewport.current_page;
    Ok(ViewReport {
        file_path: session.document().map(|d| d.file_path.clone()),
        page,
        page_count: viewport.page_count,
        scale: viewport.scale,
        rotation: viewport.rotation.degrees(),
        mode: session.mode(),
        annotations_on_page: session.annotations().iter().filter(|a| a.page == page).count(),
        overlay_commands: session.overlay_surface().commands().len(),
        notifications: session
            .notifications()
            .all()
            .iter()
            .map(|n| n.message.clone())
            .collect(),
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    let backend = HttpBackend::new(config.backend_base()?);
    log::debug!("Using backend {}", backend.base_url());

    match cli.command {
        Command::Documents => print_json(&pollster::block_on(backend.documents_with_annotations())?),
        Command::Document { id } => print_json(&pollster::block_on(backend.document(id))?),
        Command::Upload { path, document_type } => {
            let bytes = std::fs::read(&path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            let upload = DocumentUpload {
                file_name: path.to_string_lossy().into_owned(),
                bytes,
                document_type_id: document_type,
            };
            print_json(&pollster::block_on(backend.upload_document(upload))?)
        }
        Command::Types => print_json(&pollster::block_on(backend.document_types())?),
        Command::Elements { document_type } => {
            print_json(&pollster::block_on(backend.data_elements(document_type))?)
        }
        Command::Annotations { document_id } => {
            print_json(&pollster::block_on(backend.annotations(document_id))?)
        }
        Command::Shortcuts => {
            ShortcutRegistry::print_all();
            Ok(())
        }
        Command::View {
            document_id,
            pages,
            keys,
        } => print_json(&view(config, backend, document_id, pages, &keys)?),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
