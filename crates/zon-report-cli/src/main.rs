mod args;
mod browse;

use anyhow::{Context, Result};
use args::{Cli, Command};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{env, fs, process};
use zon_report_config::Config;
use zon_report_engine::io::{self, Corpus};
use zon_report_engine::{
    Layout, RenderError, RenderMode, RenderOptions, Renderer, SupportedVersions, Theme,
    VersionPolicy, render_diagnostic_page,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = match args::parse(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", args::USAGE);
            process::exit(2);
        }
    };

    let config = match Config::load_or_default(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let options = render_options(&config, &cli);
    let renderer = Renderer::with_builtins(options);

    let ok = match cli.command {
        Command::Render { input, output } => render(&renderer, &input, output.as_deref())?,
        Command::Check { input } => check(&renderer, &input)?,
        Command::Build { input_dir, out_dir } => {
            let out_dir = out_dir
                .or(config.output_dir)
                .unwrap_or_else(|| PathBuf::from("site"));
            build(&renderer, &input_dir, &out_dir)?
        }
        Command::Browse { input_dir } => {
            browse::run(&renderer, &input_dir)?;
            true
        }
    };

    if !ok {
        process::exit(1);
    }
    Ok(())
}

/// Engine options from the config file, with command-line flags on top.
fn render_options(config: &Config, cli: &Cli) -> RenderOptions {
    let mode = match config.mode {
        _ if cli.strict => RenderMode::Strict,
        zon_report_config::Mode::Strict => RenderMode::Strict,
        zon_report_config::Mode::BestEffort => RenderMode::BestEffort,
    };
    let version_policy = match config.version_policy {
        _ if cli.degrade => VersionPolicy::Degrade,
        zon_report_config::VersionPolicy::Degrade => VersionPolicy::Degrade,
        zon_report_config::VersionPolicy::Reject => VersionPolicy::Reject,
    };

    let default_layout = Layout::from_name(&config.default_layout).unwrap_or_else(|| {
        log::warn!("unknown default_layout `{}` in config", config.default_layout);
        Layout::default()
    });
    let default_theme = Theme::from_name(&config.default_theme).unwrap_or_else(|| {
        log::warn!("unknown default_theme `{}` in config", config.default_theme);
        Theme::default()
    });

    RenderOptions {
        mode,
        version_policy,
        supported_versions: SupportedVersions::new(&config.supported_versions),
        default_layout,
        default_theme,
        stylesheet: config.stylesheet.clone(),
        lang: config.lang.clone(),
    }
}

fn render(renderer: &Renderer, input: &Path, output: Option<&Path>) -> Result<bool> {
    let raw = io::load_document(input)?;
    let (ok, html) = render_page(renderer, input, &raw);
    if let Some(html) = html {
        write_output(output, &html)?;
        if !ok && let Some(output) = output {
            eprintln!("Diagnostic page written to {}", output.display());
        }
    }
    Ok(ok)
}

/// Html to emit for one document, and whether it rendered. A failed render
/// still yields a diagnostic page in best-effort mode.
fn render_page(renderer: &Renderer, input: &Path, raw: &Value) -> (bool, Option<String>) {
    match renderer.render(raw) {
        Ok(page) => {
            for warning in &page.warnings {
                log::warn!("{}: {warning}", input.display());
            }
            (true, Some(page.html))
        }
        Err(e) => {
            report_failure(input, &e);
            let diagnostic = match renderer.options().mode {
                RenderMode::BestEffort => {
                    Some(render_diagnostic_page(&e, &renderer.options().lang))
                }
                RenderMode::Strict => None,
            };
            (false, diagnostic)
        }
    }
}

fn check(renderer: &Renderer, input: &Path) -> Result<bool> {
    let raw = io::load_document(input)?;
    match renderer.render(&raw) {
        Ok(page) => {
            for warning in &page.warnings {
                println!("warning: {warning}");
            }
            println!(
                "{}: ok ({} navigation entries, {} warnings)",
                input.display(),
                page.navigation.len(),
                page.warnings.len()
            );
            Ok(true)
        }
        Err(e) => {
            report_failure(input, &e);
            Ok(false)
        }
    }
}

fn build(renderer: &Renderer, input_dir: &Path, out_dir: &Path) -> Result<bool> {
    let corpus = Corpus::load(input_dir)
        .with_context(|| format!("Failed to load documents from {}", input_dir.display()))?;
    let report = io::build_corpus(&corpus, renderer, out_dir)?;

    for duplicate in &report.duplicate_ids {
        let paths: Vec<_> = duplicate.paths.iter().map(|p| p.as_str()).collect();
        log::warn!("document id `{}` is used by {}", duplicate.id, paths.join(", "));
    }
    for page in &report.pages {
        for warning in &page.warnings {
            log::warn!("{}: {warning}", page.source);
        }
    }
    for failed in &report.failed {
        eprintln!("{}: {}", failed.source, failed.reason);
    }

    println!(
        "{} pages written to {} ({} failed)",
        report.pages.len(),
        out_dir.display(),
        report.failed.len()
    );
    Ok(report.failed.is_empty())
}

fn report_failure(input: &Path, error: &RenderError) {
    eprintln!("{}: {error}", input.display());
    if let RenderError::Schema(schema) = error {
        for violation in &schema.violations {
            eprintln!("  {violation}");
        }
    }
}

fn write_output(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => std::io::stdout().write_all(html.as_bytes())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cli(strict: bool, degrade: bool) -> Cli {
        Cli {
            strict,
            degrade,
            config: None,
            command: Command::Check {
                input: PathBuf::from("x.json"),
            },
        }
    }

    #[test]
    fn defaults_follow_config() {
        let options = render_options(&Config::default(), &cli(false, false));
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn flags_override_config() {
        let options = render_options(&Config::default(), &cli(true, true));
        assert_eq!(options.mode, RenderMode::Strict);
        assert_eq!(options.version_policy, VersionPolicy::Degrade);
    }

    #[test]
    fn config_values_are_mapped() {
        let config = Config {
            mode: zon_report_config::Mode::Strict,
            supported_versions: vec!["zon-report@v1".to_string(), "zon-report@v2".to_string()],
            default_layout: "dashboard".to_string(),
            default_theme: "nope".to_string(),
            lang: "en".to_string(),
            ..Config::default()
        };
        let options = render_options(&config, &cli(false, false));
        assert_eq!(options.mode, RenderMode::Strict);
        assert!(options.supported_versions.supports("zon-report@v2"));
        assert_eq!(options.default_layout, Layout::Dashboard);
        assert_eq!(options.default_theme, Theme::Light);
        assert_eq!(options.lang, "en");
    }

    #[test]
    fn failed_render_yields_diagnostic_only_in_best_effort() {
        let raw = json!({ "version": "zon-report@v1", "meta": {}, "blocks": [] });
        let input = Path::new("broken.json");

        let best_effort = Renderer::with_builtins(RenderOptions::default());
        let (ok, html) = render_page(&best_effort, input, &raw);
        assert!(!ok);
        assert!(html.unwrap().contains("Document could not be rendered"));

        let strict = Renderer::with_builtins(RenderOptions {
            mode: RenderMode::Strict,
            ..RenderOptions::default()
        });
        assert_eq!(render_page(&strict, input, &raw), (false, None));
    }
}
