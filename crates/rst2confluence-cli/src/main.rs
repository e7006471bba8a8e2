//! rst2confluence: CLI tool to convert reStructuredText doctrees to Confluence Wiki markup

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

use config::{CONFIG_FILE_NAME, Config, DEFAULT_EXTENSION};
use rst2confluence_core::{Document, TranslatorOptions, doctree_to_confluence};

#[derive(Parser, Debug)]
#[command(name = "rst2confluence")]
#[command(about = "Convert reStructuredText doctrees (JSON) to Confluence Wiki markup")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "Examples:
  rst2confluence page.json                 # Convert single file to page.wiki
  rst2confluence page.json -o out.wiki     # Convert to specific output file
  rst2confluence trees/ -o wiki/ -r        # Convert directory recursively
  rst2confluence trees/ --dry-run          # Check every tree translates
  rst2confluence init                      # Create _rst2confluence.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a configuration file with default settings
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Print the JSON schema for the configuration file instead
        #[arg(long)]
        schema: bool,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Input doctree JSON file or directory
    input: Option<PathBuf>,

    /// Output file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Extension for converted files (default: wiki)
    #[arg(short, long)]
    extension: Option<String>,

    /// Translate without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Configuration file (defaults to ./_rst2confluence.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output (enables debug diagnostics)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Settings resolved from CLI flags, config file and defaults
#[derive(Debug, Clone)]
struct Settings {
    extension: String,
    recursive: bool,
    dry_run: bool,
    verbose: bool,
    quiet: bool,
}

impl Settings {
    /// CLI flags take precedence over the config file
    fn resolve(args: &ConvertArgs, config: &Config) -> Self {
        Self {
            extension: args
                .extension
                .clone()
                .or_else(|| config.output.extension.clone())
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            recursive: args.recursive || config.input.recursive.unwrap_or(false),
            dry_run: args.dry_run || config.output.dry_run.unwrap_or(false),
            verbose: args.verbose,
            quiet: args.quiet,
        }
    }

    fn translator_options(&self) -> TranslatorOptions {
        TranslatorOptions {
            suppress_output: self.dry_run,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.convert.verbose);

    match cli.command {
        Some(Commands::Init {
            output,
            schema,
            force,
        }) => run_init(&output, schema, force),
        None => run_convert(&cli.convert),
    }
}

/// `-v` enables debug diagnostics, otherwise use RUST_LOG or default to warn
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_init(output: &Path, schema: bool, force: bool) -> Result<()> {
    if schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }

    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    let content = Config::sample().to_toml_with_header()?;
    fs::write(output, content)
        .with_context(|| format!("Failed to write: {}", output.display()))?;
    println!("{}", output.display());

    Ok(())
}

fn run_convert(args: &ConvertArgs) -> Result<()> {
    let Some(input) = args.input.as_deref() else {
        anyhow::bail!("No input given (see --help)");
    };

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(Path::new("."))?.unwrap_or_default(),
    };
    let settings = Settings::resolve(args, &config);
    tracing::debug!(?settings, "resolved settings");

    if input.is_file() {
        convert_file(input, args.output.as_deref(), &settings)
    } else if input.is_dir() {
        convert_directory(input, args.output.as_deref(), args.jobs, &settings)
    } else {
        anyhow::bail!("Input path does not exist: {}", input.display())
    }
}

/// Convert a single doctree file
fn convert_file(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<()> {
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension(&settings.extension),
    };

    if settings.verbose {
        eprintln!(
            "Converting: {} -> {}",
            input.display(),
            output_path.display()
        );
    }

    convert_file_inner(input, &output_path, settings)?;

    if !settings.quiet {
        report_written(&output_path, settings);
    }

    Ok(())
}

/// Convert a directory of doctree files
fn convert_directory(
    input: &Path,
    output: Option<&Path>,
    jobs: Option<usize>,
    settings: &Settings,
) -> Result<()> {
    let output_dir = output.unwrap_or(input);

    let files = collect_doctree_files(input, settings.recursive)?;

    if files.is_empty() {
        if !settings.quiet {
            eprintln!("No .json files found in {}", input.display());
        }
        return Ok(());
    }

    if settings.verbose {
        eprintln!("Found {} .json files", files.len());
    }

    // Configure thread pool if jobs specified
    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let errors: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let output_file = output_dir.join(relative).with_extension(&settings.extension);

            match convert_file_inner(file, &output_file, settings) {
                Ok(()) => {
                    success.fetch_add(1, Ordering::Relaxed);
                    if !settings.quiet {
                        report_written(&output_file, settings);
                    }
                    None
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    Some((file.clone(), e))
                }
            }
        })
        .collect();

    for (file, e) in &errors {
        eprintln!("Error converting {}: {:#}", file.display(), e);
    }

    let success_count = success.load(Ordering::Relaxed);
    let failed_count = failed.load(Ordering::Relaxed);

    if !settings.quiet {
        eprintln!("Converted {} files, {} failed", success_count, failed_count);
    }

    if failed_count > 0 {
        anyhow::bail!("{} files failed to convert", failed_count);
    }

    Ok(())
}

fn report_written(path: &Path, settings: &Settings) {
    if settings.dry_run {
        println!("would write {}", path.display());
    } else {
        println!("{}", path.display());
    }
}

/// Inner conversion function that doesn't print (for parallel use)
fn convert_file_inner(input: &Path, output: &Path, settings: &Settings) -> Result<()> {
    if output == input {
        anyhow::bail!(
            "Output would overwrite the input: {} (choose another extension or -o)",
            input.display()
        );
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    let wiki = convert_doctree_to_wiki(&content, settings)
        .with_context(|| format!("Failed to convert: {}", input.display()))?;

    if settings.dry_run {
        return Ok(());
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(output, &wiki).with_context(|| format!("Failed to write: {}", output.display()))?;

    Ok(())
}

/// Collect all .json files in a directory
fn collect_doctree_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                if ext.eq_ignore_ascii_case("json") {
                    files.push(path);
                }
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_doctree_files(&path, recursive)?);
        }
    }

    files.sort();
    Ok(files)
}

/// Core conversion function
fn convert_doctree_to_wiki(json: &str, settings: &Settings) -> Result<String> {
    let doc = Document::from_json(json)?;
    let wiki = doctree_to_confluence(&doc, &settings.translator_options())?;
    Ok(wiki)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> ConvertArgs {
        let mut argv = vec!["rst2confluence"];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv).convert
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::resolve(&args(&["in.json"]), &Config::default());
        assert_eq!(settings.extension, "wiki");
        assert!(!settings.recursive);
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_settings_from_config() {
        let config: Config = toml::from_str(
            r#"
            [input]
            recursive = true
            [output]
            extension = "txt"
            dry_run = true
            "#,
        )
        .unwrap();
        let settings = Settings::resolve(&args(&["in.json"]), &config);
        assert_eq!(settings.extension, "txt");
        assert!(settings.recursive);
        assert!(settings.dry_run);
        assert!(settings.translator_options().suppress_output);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config: Config = toml::from_str("[output]\nextension = \"txt\"\n").unwrap();
        let settings = Settings::resolve(&args(&["in.json", "-e", "confluence"]), &config);
        assert_eq!(settings.extension, "confluence");
    }

    #[test]
    fn test_convert_doctree_to_wiki() {
        let settings = Settings::resolve(&args(&["in.json"]), &Config::default());
        let wiki = convert_doctree_to_wiki(
            r#"{"type": "document", "children": [
                {"type": "paragraph", "children": [{"type": "text", "value": "Hello"}]}
            ]}"#,
            &settings,
        )
        .unwrap();
        assert_eq!(wiki, "Hello\n");
    }

    #[test]
    fn test_convert_reports_unknown_kind() {
        let settings = Settings::resolve(&args(&["in.json"]), &Config::default());
        let err = convert_doctree_to_wiki(
            r#"{"type": "document", "children": [{"type": "comment", "line": 4}]}"#,
            &settings,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unrecognized node kind `comment` on enter at line 4"
        );
    }

    #[test]
    fn test_refuses_to_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.json");
        let tree = r#"{"type": "document", "children": []}"#;
        fs::write(&input, tree).unwrap();

        let settings = Settings::resolve(&args(&["page.json", "-e", "json"]), &Config::default());
        let output = input.with_extension(&settings.extension);
        let err = convert_file_inner(&input, &output, &settings).unwrap_err();

        assert!(err.to_string().contains("overwrite the input"));
        assert_eq!(fs::read_to_string(&input).unwrap(), tree);
    }

    #[test]
    fn test_collect_doctree_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.JSON"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(nested.join("c.json"), "{}").unwrap();

        let flat = collect_doctree_files(dir.path(), false).unwrap();
        assert_eq!(flat.len(), 2);

        let all = collect_doctree_files(dir.path(), true).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&nested.join("c.json")));
    }
}
