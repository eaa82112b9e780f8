use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use refmerge::{
    dump, find_config_file, generate_init_file, load_config, merge_settings, print_content,
    print_created, print_error, print_written, should_use_colors, tree, write, CliSettings,
    Colors, ListMerge, OutputMode, Processor, RefmergeToml, Settings,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "refmerge")]
#[command(
    version,
    about = "Resolve $ref and $merge directives into one self-contained config file"
)]
struct Cli {
    /// Config file to resolve
    file: Option<PathBuf>,

    /// The path for the output file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only emit the value under this key (dotted paths allowed)
    #[arg(short, long, value_name = "KEY")]
    key: Option<String>,

    /// Emit the canonical JSON form instead of the input's own format
    #[arg(long)]
    json: bool,

    /// How `$merge` combines lists
    #[arg(long, value_enum, value_name = "POLICY")]
    list_merge: Option<ListMerge>,

    /// Format for files whose extension is not recognised
    #[arg(long, value_name = "NAME")]
    format: Option<String>,

    /// Specify config file path (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Generate a template refmerge.toml configuration file
    #[arg(long)]
    init: bool,

    /// Log each file as it is loaded
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let use_colors = should_use_colors(cli.no_color);
    init_tracing(cli.verbose, use_colors);
    let colors = Colors::new(use_colors);

    // Handle --init command
    if cli.init {
        return handle_init(&colors);
    }

    let Some(file) = cli.file.as_deref() else {
        return print_help();
    };

    let toml_config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e, &colors);
            return ExitCode::from(1);
        }
    };
    let settings = merge_settings(&build_cli_settings(&cli), toml_config.as_ref());

    match run(&cli, file, &settings, &colors) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e, &colors);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool, ansi: bool) {
    let default_filter = if verbose { "refmerge=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .without_time()
        .init();
}

fn print_help() -> ExitCode {
    match Cli::command().print_help() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn handle_init(colors: &Colors) -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            print_created(&path, colors);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&e, colors);
            ExitCode::from(1)
        }
    }
}

/// An explicit `--config` must load; a discovered one only warns on failure.
fn load_configuration(explicit_path: &Option<PathBuf>) -> refmerge::Result<Option<RefmergeToml>> {
    if let Some(path) = explicit_path {
        let config = load_config(path)?;
        debug!(path = %path.display(), "using config");
        return Ok(Some(config));
    }

    let discovered = std::env::current_dir()
        .ok()
        .and_then(|d| find_config_file(&d));

    Ok(discovered.and_then(|p| match load_config(&p) {
        Ok(config) => {
            debug!(path = %p.display(), "using config");
            Some(config)
        }
        Err(e) => {
            warn!(path = %p.display(), error = %e, "failed to load config, using defaults");
            None
        }
    }))
}

fn build_cli_settings(cli: &Cli) -> CliSettings {
    // Boolean flags are always present (default false), so false is
    // treated as "not set" for proper merging with the config file.
    CliSettings {
        list_merge: cli.list_merge,
        default_format: cli.format.clone(),
        json: cli.json.then_some(true),
    }
}

fn run(cli: &Cli, file: &Path, settings: &Settings, colors: &Colors) -> refmerge::Result<()> {
    let processor = Processor::from_settings(settings)?;
    let mode = OutputMode::from_json_flag(settings.json);

    let Some(output) = cli.output.as_deref() else {
        let content = match mode {
            OutputMode::Json => processor.process(Some(file), cli.key.as_deref())?.content,
            OutputMode::Native => {
                let adapter = processor.adapter_for(file)?;
                let tree = narrow(processor.resolve(file)?, cli.key.as_deref())?;
                dump(adapter, &tree)?.content
            }
        };
        print_content(&content);
        return Ok(());
    };

    let tree = narrow(processor.resolve(file)?, cli.key.as_deref())?;
    let registry = processor.registry();
    let adapter = match mode {
        OutputMode::Json => registry.by_name("json"),
        // An unrecognised output extension keeps the input's format rather
        // than the configured default format.
        OutputMode::Native => output
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| registry.for_extension(ext)),
    };
    let adapter = match adapter {
        Some(adapter) => adapter,
        None => processor.adapter_for(file)?,
    };
    let result = write(adapter, output, &tree)?;
    print_written(&result.output_file, colors);
    Ok(())
}

fn narrow(tree: refmerge::Tree, key: Option<&str>) -> refmerge::Result<refmerge::Tree> {
    match key {
        Some(key) => tree::select(tree, key),
        None => Ok(tree),
    }
}
