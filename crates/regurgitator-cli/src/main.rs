//! Command-line interface for regurgitator
//!
//! Usage:
//!   regurgitator py2xml `<file|->` [-o `<out>`]   - Render Python source as markup
//!   regurgitator xml2py `<file|->` [-o `<out>`]   - Strip markup back to the source
//!   regurgitator check `<file>`                  - Verify that a file round-trips

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use regurgitator_config::Config;
use regurgitator_engine::{Placement, RenderOptions, SeparatorTable, py2xml, xml2py};

#[derive(Parser)]
#[command(name = "regurgitator", version)]
#[command(about = "Render Python source as AST-shaped markup that detags back to the exact source")]
struct Cli {
    /// Config file (default: ~/.config/regurgitator/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render Python source as markup
    Py2xml {
        #[command(flatten)]
        paths: InputOutput,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Strip markup back to the source text
    Xml2py {
        #[command(flatten)]
        paths: InputOutput,
    },
    /// Render, detag and compare with the original
    Check {
        file: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args)]
struct InputOutput {
    /// Input file, or `-` for stdin
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    /// Place every operator and separator the same way, `wrap` or `gap`
    #[arg(long, value_name = "PLACEMENT")]
    separators: Option<Placement>,

    /// Leave out the root `<Module>` element
    #[arg(long)]
    no_module: bool,

    /// Prefix the XML declaration
    #[arg(long)]
    declaration: bool,
}

impl RenderArgs {
    fn apply(&self, mut options: RenderOptions) -> RenderOptions {
        if let Some(placement) = self.separators {
            options.separators = SeparatorTable::uniform(placement);
        }
        if self.no_module {
            options.module_element = false;
        }
        if self.declaration {
            options.declaration = true;
        }
        options
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::resolve(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Command::Py2xml { paths, render } => {
            let options = render.apply(RenderOptions::from(&config));
            let source = read_input(&paths.input)?;
            let markup = py2xml(&source, &options)
                .with_context(|| format!("Failed to render {}", paths.input.display()))?;
            write_output(paths.output.as_deref(), &markup)?;
        }
        Command::Xml2py { paths } => {
            let markup = read_input(&paths.input)?;
            let source = xml2py(&markup)
                .with_context(|| format!("Failed to detag {}", paths.input.display()))?;
            write_output(paths.output.as_deref(), &source)?;
        }
        Command::Check { file, render } => {
            let options = render.apply(RenderOptions::from(&config));
            let source = read_input(&file)?;
            let markup = py2xml(&source, &options)
                .with_context(|| format!("Failed to render {}", file.display()))?;
            let detagged = xml2py(&markup).context("Failed to detag rendered markup")?;

            if let Some(offset) = first_difference(&source, &detagged) {
                eprintln!("{}: round trip differs at byte {offset}", file.display());
                return Ok(ExitCode::FAILURE);
            }
            println!("{}: ok ({} bytes)", file.display(), source.len());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let common = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    Some(common)
}
