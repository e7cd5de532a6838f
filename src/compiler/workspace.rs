//! Project-wide compilation.

use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    Arc,
    LazyLock,
};

use futures::StreamExt;
use ignore::WalkBuilder;
use regex::Regex;

use super::{
    CompileError,
    TranslationCompiler,
};
use crate::config::{
    ConfigError,
    FileMatcher,
    I18nSettings,
};
use crate::formats::{
    FILE_PREFIX,
    normalize_locale,
};
use crate::hash::Sha256HashGenerator;
use crate::po::PoParser;
use crate::types::TranslationData;

/// `fr`, `pt_BR`, `zh-Hant-TW`
#[allow(clippy::expect_used)]
static LOCALE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:[_-][A-Za-z0-9]{2,8})*$").expect("valid locale regex")
});

/// Outcome of compiling one PO file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    pub locale: String,
    pub source: PathBuf,
    pub entries: usize,
    pub translated: usize,
    pub files: Vec<PathBuf>,
}

/// Outcome of [`compile_workspace`], sorted by locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub locales: Vec<LocaleReport>,
}

impl CompileReport {
    #[must_use]
    pub fn files_written(&self) -> usize {
        self.locales.iter().map(|report| report.files.len()).sum()
    }

    #[must_use]
    pub fn locale(&self, locale: &str) -> Option<&LocaleReport> {
        self.locales.iter().find(|report| report.locale == locale)
    }
}

/// A parsed PO file waiting to be written.
#[derive(Debug)]
struct ParsedPo {
    locale: String,
    source: PathBuf,
    data: TranslationData,
}

/// Compiles every PO file under `workspace_root` selected by `poFiles`.
///
/// Runs in two phases on the blocking pool, at most `compile.concurrency`
/// files at a time: every file is parsed first, then catalogs are written.
/// Nothing is written unless every file parses and no two files map to the
/// same locale.
///
/// # Errors
/// - Invalid settings
/// - One or more PO files fail to parse or write ([`CompileError::Failed`])
/// - Two PO files map to one locale ([`CompileError::DuplicateLocale`])
pub async fn compile_workspace(
    workspace_root: &Path,
    settings: &I18nSettings,
) -> Result<CompileReport, CompileError> {
    settings.validate().map_err(ConfigError::ValidationErrors)?;

    let matcher = FileMatcher::new(workspace_root.to_path_buf(), settings)?;
    let files = find_po_files(&matcher);
    if files.is_empty() {
        tracing::warn!(root = %workspace_root.display(), "No PO files found");
        return Ok(CompileReport::default());
    }

    let output_dir = if settings.output_directory.is_absolute() {
        settings.output_directory.clone()
    } else {
        workspace_root.join(&settings.output_directory)
    };
    let compiler = Arc::new(TranslationCompiler::from_settings(settings, output_dir)?);
    let hasher = settings.hash_generator();
    let concurrency = settings.compile.effective_concurrency();
    let total = files.len();

    tracing::debug!(files = total, concurrency, "Compiling PO files");

    let parsed = run_blocking(files, concurrency, move |path: &PathBuf| {
        parse_po_file(&hasher, path)
    })
    .await;
    let mut parsed = collect_successes(parsed, total)?;

    parsed.sort_by(|a, b| a.locale.cmp(&b.locale).then_with(|| a.source.cmp(&b.source)));
    if let Some([first, second]) =
        parsed.windows(2).find(|pair| matches!(pair, [a, b] if a.locale == b.locale))
    {
        return Err(CompileError::DuplicateLocale {
            locale: first.locale.clone(),
            first: first.source.clone(),
            second: second.source.clone(),
        });
    }

    let written = run_blocking(parsed, concurrency, move |po: &ParsedPo| {
        let files = compiler.compile(&po.data, &po.locale)?;
        Ok(LocaleReport {
            locale: po.locale.clone(),
            source: po.source.clone(),
            entries: po.data.entry_count(),
            translated: po.data.translated_count(),
            files,
        })
    })
    .await;
    let mut locales = collect_successes(written, total)?;
    locales.sort_by(|a, b| a.locale.cmp(&b.locale));

    Ok(CompileReport { locales })
}

/// Runs `task` for every item on the blocking pool, `concurrency` at a time.
///
/// Results come back in completion order, each paired with the source file.
async fn run_blocking<I, T, F>(
    items: Vec<I>,
    concurrency: usize,
    task: F,
) -> Vec<(PathBuf, Result<T, CompileError>)>
where
    I: SourceFile + Send + 'static,
    T: Send + 'static,
    F: Fn(&I) -> Result<T, CompileError> + Send + Sync + 'static,
{
    let task = Arc::new(task);
    futures::stream::iter(items)
        .map(|item| {
            let task = Arc::clone(&task);
            async move {
                let path = item.source_file().to_path_buf();
                let result = tokio::task::spawn_blocking(move || (*task)(&item))
                    .await
                    .map_err(CompileError::from)
                    .and_then(std::convert::identity);
                (path, result)
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await
}

/// Logs every failure and returns the successes, or [`CompileError::Failed`].
fn collect_successes<T>(
    results: Vec<(PathBuf, Result<T, CompileError>)>,
    total: usize,
) -> Result<Vec<T>, CompileError> {
    let mut successes = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(value) => successes.push(value),
            Err(e) => {
                tracing::error!(path = %path.display(), "Failed to compile: {e}");
                failed += 1;
            }
        }
    }
    if failed > 0 { Err(CompileError::Failed { failed, total }) } else { Ok(successes) }
}

/// Work item that came from one PO file.
trait SourceFile {
    fn source_file(&self) -> &Path;
}

impl SourceFile for PathBuf {
    fn source_file(&self) -> &Path {
        self
    }
}

impl SourceFile for ParsedPo {
    fn source_file(&self) -> &Path {
        &self.source
    }
}

fn parse_po_file(hasher: &Sha256HashGenerator, path: &Path) -> Result<ParsedPo, CompileError> {
    let data = PoParser::new(hasher).parse_file(path)?;

    let locale = locale_from_path(path)
        .or_else(|| {
            let language = data.metadata.language.as_deref()?.trim();
            (!language.is_empty()).then(|| language.to_string())
        })
        .ok_or_else(|| CompileError::UnknownLocale { path: path.to_path_buf() })?;

    Ok(ParsedPo { locale: normalize_locale(&locale), source: path.to_path_buf(), data })
}

/// Locale encoded in a PO file name: `messages_fr.po` or `fr.po`.
#[must_use]
pub fn locale_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let candidate = stem.strip_prefix(FILE_PREFIX).unwrap_or(stem);
    LOCALE_PATTERN.is_match(candidate).then(|| candidate.to_string())
}

/// Walks the workspace, honouring `.gitignore`, and returns the PO files the
/// matcher selects, sorted.
#[must_use]
pub fn find_po_files(matcher: &FileMatcher) -> Vec<PathBuf> {
    let workspace_path = matcher.workspace_root();
    let mut found_files = Vec::new();

    for result in WalkBuilder::new(workspace_path)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(workspace_path) else {
            continue;
        };
        if matcher.is_po_file_relative(relative_path) {
            found_files.push(path.to_path_buf());
        }
    }

    found_files.sort();
    found_files
}
