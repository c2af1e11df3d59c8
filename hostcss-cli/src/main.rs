//! hostcss CLI
//!
//! Rewrites a component stylesheet for use inside custom elements' shadow
//! roots, writing one `spectrum-<name>.css` per component.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use hostcss_common::warning::{clear_warnings, warn_once_with_detail};
use hostcss_css::{
    Component, PackageConfig, ProcessOptions, Warning, process_stylesheet, rewrite_selector,
};
use owo_colors::OwoColorize;

/// hostcss — shadow-scoped stylesheet rewriter
#[derive(Parser, Debug)]
#[command(name = "hostcss")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Rewrite every component in a package
    hostcss --config search.json --input index-vars.css --out-dir src/

    # Only one component, keeping the source selector as a comment
    hostcss -c search.json -i index-vars.css -o src/ --component search --source-comments

    # Try a single selector
    hostcss -c search.json --selector '.spectrum-Search--quiet .spectrum-Search-input'
"#)]
struct Cli {
    /// Package config (JSON) with one descriptor per component
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Source stylesheet to rewrite
    #[arg(short, long, value_name = "FILE", required_unless_present = "selector")]
    input: Option<PathBuf>,

    /// Directory receiving the rewritten stylesheets
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Only process the component with this name
    #[arg(long, value_name = "NAME")]
    component: Option<String>,

    /// Rewrite one selector and print it instead of processing a stylesheet
    #[arg(long, value_name = "SELECTOR", conflicts_with = "input")]
    selector: Option<String>,

    /// Prefix each rewritten rule with a comment holding its source selector
    #[arg(long)]
    source_comments: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let package = PackageConfig::load(&cli.config)?;
    let components = package
        .compile()
        .with_context(|| format!("compiling {}", cli.config.display()))?;
    let selected = select_components(&components, cli.component.as_deref(), &cli.config)?;

    // Single selector mode
    if let Some(ref selector) = cli.selector {
        for component in selected {
            let rewritten = rewrite_selector(selector, component)?;
            forward_warnings(&rewritten.warnings);
            println!("{} {}", component.name.bold(), rewritten.selector);
        }
        return Ok(());
    }

    let Some(ref input) = cli.input else {
        bail!("--input is required unless --selector is given");
    };
    let css = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    let options = ProcessOptions {
        source_comments: cli.source_comments,
    };
    for component in selected {
        process_component(component, &css, &cli.out_dir, &options)?;
    }

    Ok(())
}

/// Pick the components to run, honouring `--component`.
fn select_components<'a>(
    components: &'a [Component],
    name: Option<&str>,
    config: &Path,
) -> Result<Vec<&'a Component>> {
    let Some(name) = name else {
        return Ok(components.iter().collect());
    };
    let found: Vec<_> = components.iter().filter(|c| c.name == name).collect();
    if found.is_empty() {
        bail!("no component named `{name}` in {}", config.display());
    }
    Ok(found)
}

/// Rewrite the stylesheet for one component and write it out.
fn process_component(
    component: &Component,
    css: &str,
    out_dir: &Path,
    options: &ProcessOptions,
) -> Result<()> {
    clear_warnings();

    let processed = process_stylesheet(css, component, options)
        .with_context(|| format!("processing component {}", component.name))?;
    forward_warnings(&processed.warnings);

    let path = out_dir.join(format!("spectrum-{}.css", component.name));
    fs::write(&path, &processed.css).with_context(|| format!("writing {}", path.display()))?;

    println!(
        "{} {} {}",
        "✓".green().bold(),
        component.name.bold(),
        format!("→ {} ({} rules dropped)", path.display(), processed.dropped).dimmed()
    );
    Ok(())
}

fn forward_warnings(warnings: &[Warning]) {
    for warning in warnings {
        warn_once_with_detail(&warning.component, &warning.message, &warning.selector);
    }
}
