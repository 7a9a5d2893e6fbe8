use std::path::{Component, Path, PathBuf};
use std::sync::Once;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pyrite_core::{
    VmConfig,
    vm::{Program, RunOutcome, Vm},
};
use pyrite_stdlib::register_stdlib_globals;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "pyrite::vm=debug,pyrite::stdlib=info,pyrite_cli=info";
const DISPATCH_TRACE_FILTER: &str = "pyrite::vm=debug,pyrite::vm::dispatch=trace";


#[derive(Debug, Parser)]
#[command(
    name = "pyrite",
    author,
    version,
    about = "Run and inspect Pyrite instruction streams",
    long_about = None,
    after_help = "Program files may be JSON, YAML, TOML or a text listing (any other extension)."
)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Execute a program and print the value it returns.
    Run {
        #[arg(value_name = "FILE", value_parser = program_path)]
        file: PathBuf,

        /// TOML file with `[arena]` sizing and `trace`.
        #[arg(long, value_name = "FILE", value_parser = program_path)]
        config: Option<PathBuf>,

        /// Cap the arena at this many bytes (overrides the config file).
        #[arg(long, value_name = "BYTES")]
        arena_limit: Option<usize>,

        /// Emit a trace event per instruction (overrides the config file).
        #[arg(long)]
        trace: bool,

        /// Print the returned value as JSON instead of its repr.
        #[arg(long)]
        json: bool,
    },
    /// Print a program as a text listing.
    Disasm {
        #[arg(value_name = "FILE", value_parser = program_path)]
        file: PathBuf,
    },
}

/// clap value parser for file arguments: any path without a `..` component.
fn program_path(raw: &str) -> Result<PathBuf, String> {
    let path = Path::new(raw);
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(format!("'{raw}' escapes the working tree: '..' components are not allowed"));
    }
    Ok(path.to_path_buf())
}

/// What the `PYRITE_TRACE` variable asks for.
#[derive(Debug, PartialEq, Eq)]
enum TraceRequest {
    Off,
    /// `1`, `true` or `on`: use `RUST_LOG` or the built-in filter.
    On,
    /// Any other value is taken as an `EnvFilter` directive.
    Filter(String),
}

impl TraceRequest {
    fn from_env_value(raw: &str) -> Self {
        let value = raw.trim();
        let is = |word: &str| value.eq_ignore_ascii_case(word);
        if value.is_empty() || is("0") || is("false") || is("off") {
            TraceRequest::Off
        } else if is("1") || is("true") || is("on") {
            TraceRequest::On
        } else {
            TraceRequest::Filter(value.to_string())
        }
    }
}

/// Install a stderr subscriber when `PYRITE_TRACE` is set, or when `dispatch` asks for
/// per-instruction events.
fn maybe_init_tracing(dispatch: bool) {
    let request = std::env::var("PYRITE_TRACE")
        .map(|raw| TraceRequest::from_env_value(&raw))
        .unwrap_or(TraceRequest::Off);
    if request == TraceRequest::Off && !dispatch {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let fallback = if dispatch { DISPATCH_TRACE_FILTER } else { DEFAULT_TRACE_FILTER };
        let directives = match request {
            TraceRequest::Filter(expr) => Some(expr),
            TraceRequest::On | TraceRequest::Off => std::env::var("RUST_LOG").ok(),
        };
        let filter = directives
            .and_then(|expr| EnvFilter::try_new(expr).ok())
            .unwrap_or_else(|| EnvFilter::new(fallback));

        let _ = fmt().with_writer(std::io::stderr).with_env_filter(filter).try_init();
    });
}

/// Merge the optional config file with command-line overrides.
fn resolve_config(config: Option<&Path>, arena_limit: Option<usize>, trace: bool) -> anyhow::Result<VmConfig> {
    let mut resolved = match config {
        Some(path) => VmConfig::load(path)?,
        None => VmConfig::default(),
    };
    if arena_limit.is_some() {
        resolved.arena.limit = arena_limit;
    }
    if trace {
        resolved.trace = true;
    }
    Ok(resolved)
}

fn render_outcome(outcome: &RunOutcome, json: bool) -> anyhow::Result<String> {
    let rendered = match (outcome.return_value(), json) {
        (Some(value), true) => serde_json::to_string(value).context("Failed to encode result as JSON")?,
        (None, true) => "null".to_string(),
        (Some(value), false) => value.to_string(),
        (None, false) => "None".to_string(),
    };
    Ok(rendered)
}

fn run_file(file: &Path, config: VmConfig, json: bool) -> anyhow::Result<()> {
    let program = Program::load(file)?;
    let mut vm = Vm::with_config(config);
    register_stdlib_globals(vm.primitives_mut());
    tracing::debug!(
        target: "pyrite_cli",
        file = %file.display(),
        instructions = program.len(),
        "run"
    );

    let outcome = vm
        .run(&program.instructions)
        .with_context(|| format!("Execution of '{}' failed", file.display()))?;
    println!("{}", render_outcome(&outcome, json)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let CliArgs { command } = CliArgs::parse();

    match command {
        Commands::Run {
            file,
            config,
            arena_limit,
            trace,
            json,
        } => {
            let config = resolve_config(config.as_deref(), arena_limit, trace)?;
            maybe_init_tracing(config.trace);
            run_file(&file, config, json)
        }
        Commands::Disasm { file } => {
            maybe_init_tracing(false);
            let program = Program::load(&file)?;
            print!("{}", pyrite_core::vm::disassemble(&program.instructions));
            Ok(())
        }
    }
}
