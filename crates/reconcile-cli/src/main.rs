//! redline-cli entrypoint: runs the reconciliation engine over three input
//! files and writes the resulting OOXML to stdout or `--out`.
use anyhow::{Context, Result};
use clap::Parser;
use reconcile_engine::{apply_redline_to_oxml, apply_redline_to_oxml_with_list_fallback, load_from, RedlineOptions};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "redline-cli", version, about = "OOXML redline reconciliation engine")]
struct Args {
    /// Path to the OOXML fragment (or package) to reconcile.
    oxml_file: PathBuf,
    /// Path to a file containing the original accepted text.
    original_text_file: PathBuf,
    /// Path to a file containing the modified text.
    modified_text_file: PathBuf,

    /// Revision author attributed to any `w:ins`/`w:del`/`w:rPrChange` emitted.
    #[arg(long)]
    author: Option<String>,
    /// Emit plain accepted text without track-change wrappers.
    #[arg(long)]
    no_track: bool,
    /// Font family applied to runs generated by list conversion.
    #[arg(long)]
    font: Option<String>,
    /// Configuration file path (overrides discovery of `redline.toml`).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Retry as a forced list conversion when the first pass reports no change.
    #[arg(long)]
    list_fallback: bool,
    /// Write the output OOXML here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Write an allocated numbering-part fragment here, if one was produced.
    #[arg(long)]
    numbering_out: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        AppStartup { log_guard: None }
    }

    fn run(&mut self) -> Result<()> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let args = Args::parse();
        let mut options = load_from(args.config.clone()).context("loading redline configuration")?;
        apply_overrides(&mut options, &args);

        let oxml = std::fs::read_to_string(&args.oxml_file)
            .with_context(|| format!("reading {}", args.oxml_file.display()))?;
        let original_text = std::fs::read_to_string(&args.original_text_file)
            .with_context(|| format!("reading {}", args.original_text_file.display()))?;
        let modified_text = std::fs::read_to_string(&args.modified_text_file)
            .with_context(|| format!("reading {}", args.modified_text_file.display()))?;

        let result = if args.list_fallback {
            apply_redline_to_oxml_with_list_fallback(&oxml, &original_text, &modified_text, &options)
        } else {
            apply_redline_to_oxml(&oxml, &original_text, &modified_text, &options)
        };

        info!(
            target: "runtime.result",
            has_changes = result.has_changes,
            warning_count = result.warnings.len(),
            "reconciliation_complete"
        );
        for warning in &result.warnings {
            tracing::warn!(target: "runtime.result", %warning, "warning");
        }

        match args.out {
            Some(path) => std::fs::write(&path, &result.oxml)
                .with_context(|| format!("writing {}", path.display()))?,
            None => println!("{}", result.oxml),
        }

        if let (Some(fragment), Some(path)) = (&result.numbering_fragment, &args.numbering_out) {
            std::fs::write(path, fragment).with_context(|| format!("writing {}", path.display()))?;
        }

        Ok(())
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("redline-cli.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "redline-cli.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => self.log_guard = Some(guard),
            Err(_err) => {
                // Global subscriber already installed (e.g. under a test harness).
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn apply_overrides(options: &mut RedlineOptions, args: &Args) {
    if let Some(author) = &args.author {
        options.author = author.clone();
    }
    if args.no_track {
        options.generate_redlines = false;
    }
    if let Some(font) = &args.font {
        options.font = Some(font.clone());
    }
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.run()
}
