//! gml CLI - generate label mappers and ordered lists for typed Rust constants.
//!
//! Typical use from a build step:
//!
//! ```text
//! gml --type=Example --file=src/status.rs --package=super
//! GML_FILE=src/status.rs GML_PACKAGE=crate::status gml --type=Example --file-name=codes.rs
//! ```
//!
//! Flags and environment are resolved here, once, into a `GmlConfig`; the
//! library never reads process state.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;

use gml_core::{
    generate, init_structured_logging, load_config, load_config_file, log_failure, print_json,
    summary, FileConfig, GmlConfig, GmlError, DEFAULT_SUFFIX,
};

#[derive(Parser, Debug)]
#[command(
    name = "gml",
    author,
    version,
    about = "Generate label mappers and ordered lists for typed Rust constants"
)]
pub struct Cli {
    /// Type whose commented constants are collected; must be set
    #[arg(long = "type", env = "GML_TYPE", value_name = "TYPE")]
    type_name: Option<String>,

    /// Source file declaring the constants
    #[arg(long, env = "GML_FILE", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Module path the generated file imports from (e.g. `super`, `crate::status`)
    #[arg(long, env = "GML_PACKAGE", value_name = "PATH")]
    package: Option<String>,

    /// Generated file name; defaults to `<type>_gml.rs` next to the input
    #[arg(long, value_name = "NAME")]
    file_name: Option<String>,

    /// Defaults file; `./gml.toml` is used when present
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the generated file to stdout instead of writing it
    #[arg(long, conflicts_with = "json")]
    stdout: bool,

    /// Print the extracted declarations as JSON instead of writing
    #[arg(long)]
    json: bool,

    /// Report the written path on stderr
    #[arg(long, short)]
    verbose: bool,
}

/// Parses arguments. Usage errors become a single diagnostic line.
fn parse_cli() -> std::result::Result<Cli, String> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let rendered = e.to_string();
            let first = rendered.lines().next().unwrap_or("invalid arguments");
            Err(first.trim_start_matches("error: ").to_string())
        }
    }
}

/// Loads the explicit `--config` file, or `gml.toml` from `cwd` if present.
fn file_config(cli: &Cli, cwd: &Path) -> Result<FileConfig, GmlError> {
    match &cli.config {
        Some(path) => load_config_file(path),
        None => Ok(load_config(cwd)?.unwrap_or_default()),
    }
}

/// Merges flags/environment with `gml.toml` defaults. Flags win.
fn resolve_config(cli: &Cli, defaults: &FileConfig) -> Result<GmlConfig, GmlError> {
    let type_name = cli
        .type_name
        .clone()
        .ok_or_else(|| GmlError::config("--type must be set"))?;
    let input = cli
        .file
        .clone()
        .ok_or_else(|| GmlError::config("--file (or GML_FILE) must be set"))?;
    let package = cli
        .package
        .clone()
        .or_else(|| defaults.package().map(str::to_string))
        .ok_or_else(|| GmlError::config("--package (or GML_PACKAGE) must be set"))?;

    let config = GmlConfig {
        type_name,
        input,
        package,
        file_name: cli.file_name.clone(),
        suffix: defaults.suffix().unwrap_or(DEFAULT_SUFFIX).to_string(),
    };
    config.validate()?;
    Ok(config)
}

/// Single diagnostic line for a failed run.
///
/// `GmlError` messages already carry their cause; other errors print their
/// context chain.
fn diagnostic(err: &anyhow::Error) -> String {
    match err.downcast_ref::<GmlError>() {
        Some(gml_err) => format!("gml: {}", gml_err),
        None => format!("gml: {:#}", err),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let defaults = file_config(cli, &cwd)?;
    let config = resolve_config(cli, &defaults)?;

    let generation = generate(&config)?;

    if cli.json {
        print_json(&generation.result);
        return Ok(());
    }
    if cli.stdout {
        print!("{}", generation.source);
        return Ok(());
    }

    let result = generation.result.clone();
    let written = generation.write()?;
    if cli.verbose {
        eprintln!("gml: {}", summary(&result, &written));
    }
    Ok(())
}

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("gml: internal error: {}", info.to_string().replace('\n', " "));
        std::process::exit(2);
    }));

    init_structured_logging();

    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("gml: configuration error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(gml_err) = err.downcast_ref::<GmlError>() {
                log_failure(gml_err);
            }
            eprintln!("{}", diagnostic(&err));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["gml"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn manifest() -> String {
        format!("{}/Cargo.toml", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn test_flags_resolve() {
        let file = manifest();
        let cli = cli(&["--type=Example", "--file", &file, "--package", "super"]);
        let config = resolve_config(&cli, &FileConfig::default()).unwrap();
        assert_eq!(config.type_name, "Example");
        assert_eq!(config.package, "super");
        assert_eq!(config.suffix, DEFAULT_SUFFIX);
        assert_eq!(config.file_name, None);
    }

    #[test]
    fn test_package_falls_back_to_config_file() {
        let file = manifest();
        let cli = cli(&["--type=Example", "--file", &file]);
        let defaults: FileConfig =
            toml_defaults("[generate]\npackage = \"crate::codes\"\nsuffix = \"labels.rs\"\n");
        let config = resolve_config(&cli, &defaults).unwrap();
        assert_eq!(config.package, "crate::codes");
        assert_eq!(config.output_file_name(), "example_labels.rs");
    }

    #[test]
    fn test_flag_beats_config_file() {
        let file = manifest();
        let cli = cli(&["--type=Example", "--file", &file, "--package=super"]);
        let defaults = toml_defaults("[generate]\npackage = \"crate::codes\"\n");
        assert_eq!(resolve_config(&cli, &defaults).unwrap().package, "super");
    }

    #[test]
    fn test_missing_type_is_configuration_error() {
        let file = manifest();
        let cli = cli(&["--file", &file, "--package=super"]);
        let err = resolve_config(&cli, &FileConfig::default()).unwrap_err();
        assert!(matches!(err, GmlError::Configuration { .. }));
    }

    #[test]
    fn test_stdout_conflicts_with_json() {
        let err = Cli::try_parse_from(["gml", "--stdout", "--json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_io_diagnostic_names_cause_once() {
        let err = anyhow::Error::from(GmlError::output_write(
            "src/code_gml.rs",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied"),
        ));
        let line = diagnostic(&err);
        assert_eq!(line, "gml: failed to write src/code_gml.rs: Permission denied");
        assert_eq!(line.matches("Permission denied").count(), 1);
    }

    #[test]
    fn test_context_diagnostic_keeps_chain() {
        let err = anyhow::anyhow!("denied").context("cannot determine working directory");
        assert_eq!(diagnostic(&err), "gml: cannot determine working directory: denied");
    }

    #[test]
    fn test_missing_config_flag_file() {
        let file = manifest();
        let cli = cli(&["--type=Example", "--file", &file, "--config", "/definitely/not/here/gml.toml"]);
        let err = file_config(&cli, Path::new(".")).unwrap_err();
        assert!(matches!(err, GmlError::Configuration { .. }));
    }

    fn toml_defaults(content: &str) -> FileConfig {
        let dir = std::env::temp_dir().join(format!(
            "gml_cli_{}_{}",
            std::process::id(),
            content.len()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("gml.toml");
        std::fs::write(&path, content).unwrap();
        let loaded = load_config_file(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        loaded
    }
}
