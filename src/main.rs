//! Command-line entry point: compile PO files, inspect catalogs, hash messages.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use natural_i18n::compiler::{
    CompileError,
    CompileReport,
    compile_workspace,
};
use natural_i18n::config::{
    ConfigError,
    ConfigManager,
};
use natural_i18n::formats::binary::{
    FLAG_COMPRESSED,
    read_catalog_file,
};
use natural_i18n::formats::{
    CatalogError,
    CatalogFormat,
};
use natural_i18n::hash::{
    DEFAULT_HASH_LENGTH,
    HashGenerator,
    MAX_HASH_LENGTH,
    Sha256HashGenerator,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "natural-i18n", version, about = "Hash-keyed translation catalogs")]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile PO files into runtime catalogs
    Compile(CompileArgs),

    /// Describe a compiled catalog
    Inspect {
        file: PathBuf,

        /// Also list every entry
        #[arg(long)]
        entries: bool,
    },

    /// Print the lookup hash of a message
    Hash {
        text: String,

        #[arg(long)]
        context: Option<String>,

        #[arg(long, default_value_t = DEFAULT_HASH_LENGTH)]
        length: usize,
    },
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Project root holding `.natural-i18n.json` and the PO files
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file to use instead of `<root>/.natural-i18n.json`
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overrides `outputDirectory`
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Overrides `outputFormats`; repeatable
    #[arg(long = "format", value_name = "FORMAT")]
    formats: Vec<CatalogFormat>,

    /// Gzip binary catalogs
    #[arg(long)]
    compress: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Unrecognised catalog file {}: expected .json, .properties or .bin", .0.display())]
    UnknownCatalog(PathBuf),

    #[error("Hash length must be between 1 and {max}, got {0}", max = MAX_HASH_LENGTH)]
    HashLength(usize),
}

impl CliError {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Compile(CompileError::Config(_)) => 2,
            Self::Io(_) => 3,
            _ => 1,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Keep the returned guard alive until exit so buffered file logs are flushed.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(path) = &cli.log_file {
        let directory =
            path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let file_name = path.file_name().unwrap_or(path.as_os_str());
        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        None
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Compile(args) => compile(args).await,
        Command::Inspect { file, entries } => inspect(&file, entries),
        Command::Hash { text, context, length } => hash(&text, context.as_deref(), length),
    }
}

async fn compile(args: CompileArgs) -> Result<(), CliError> {
    let root = std::path::absolute(&args.root)?;
    let mut manager = ConfigManager::new();
    match &args.config {
        Some(config) => manager.load_settings_from_file(config, root.clone())?,
        None => manager.load_settings(Some(root.clone()))?,
    }

    let mut settings = manager.get_settings().clone();
    if let Some(output) = &args.output {
        settings.output_directory = std::path::absolute(output)?;
    }
    if !args.formats.is_empty() {
        settings.output_formats =
            args.formats.iter().map(|format| format.as_str().to_string()).collect();
    }
    settings.compress_binary |= args.compress;

    let report = compile_workspace(&root, &settings).await?;
    print_report(&report, &root)?;
    Ok(())
}

fn print_report(report: &CompileReport, root: &Path) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    if report.locales.is_empty() {
        writeln!(out, "No PO files found under {}", root.display())?;
        return Ok(());
    }
    for locale in &report.locales {
        let files = locale
            .files
            .iter()
            .map(|file| file.strip_prefix(root).unwrap_or(file).display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "{:<8} {:>5} entries, {:>5} translated -> {files}",
            locale.locale, locale.entries, locale.translated
        )?;
    }
    writeln!(out, "{} files written", report.files_written())?;
    Ok(())
}

fn inspect(file: &Path, list_entries: bool) -> Result<(), CliError> {
    let format = CatalogFormat::from_path(file)
        .ok_or_else(|| CliError::UnknownCatalog(file.to_path_buf()))?;
    let mut out = std::io::stdout().lock();

    let entries = if format == CatalogFormat::Binary {
        let catalog = read_catalog_file(file)?;
        writeln!(out, "format:      binary v{}", catalog.version)?;
        writeln!(out, "locale:      {}", catalog.locale)?;
        writeln!(
            out,
            "compressed:  {} (flag {})",
            catalog.compressed,
            catalog.flags & FLAG_COMPRESSED != 0
        )?;
        match catalog.fixed_hash_length {
            Some(length) => writeln!(out, "hash length: {length} (fixed)")?,
            None => writeln!(out, "hash length: variable")?,
        }
        writeln!(
            out,
            "entries:     {} of {} declared",
            catalog.entry_count(),
            catalog.declared_entries
        )?;
        if !catalog.complete {
            writeln!(out, "warning:     catalog is truncated or corrupt")?;
        }
        catalog.entries
    } else {
        let entries = format.decode(&std::fs::read(file)?)?;
        writeln!(out, "format:      {format}")?;
        writeln!(out, "entries:     {}", entries.len())?;
        entries
    };

    if list_entries {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        sorted.sort();
        for (hash, translation) in sorted {
            writeln!(out, "{hash}\t{}", translation.escape_debug())?;
        }
    }
    Ok(())
}

fn hash(text: &str, context: Option<&str>, length: usize) -> Result<(), CliError> {
    if !(1..=MAX_HASH_LENGTH).contains(&length) {
        return Err(CliError::HashLength(length));
    }
    let generator = Sha256HashGenerator::with_length(length);
    writeln!(std::io::stdout().lock(), "{}", generator.generate_hash_with_context(text, context))?;
    Ok(())
}
