//! CLI tool for mathview - converts worksheets between formats
//!
//! Usage:
//!   mathview_cli <input.xml|input.zip> [-f format] [-w width] [-c config.json] [-o output]
//!
//! Formats: text (default), matlab, tex, mathml, omml, rtf, xml, html, archive.
//! html and archive need `-o`. Logging is controlled by `RUST_LOG`.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mathview::export::{self, HtmlImages};
use mathview::render::PixelSurface;
use mathview::{Configuration, Format, MathviewError, WorksheetView};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: mathview_cli <input.xml|input.zip> [-f format] [-w width] [-c config.json] [-o output]";

enum Target {
    Text(Format),
    Html,
    Archive,
}

struct Args {
    input: PathBuf,
    target: Target,
    width: i32,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut iter = args.iter().skip(1);
    let mut input = None;
    let mut target = Target::Text(Format::Text);
    let mut width = 800;
    let mut config = None;
    let mut output = None;
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-f" | "--format" => {
                let value = iter.next().ok_or("missing format")?;
                target = match value.as_str() {
                    "html" => Target::Html,
                    "archive" => Target::Archive,
                    other => Target::Text(other.parse().map_err(|e: MathviewError| e.to_string())?),
                };
            }
            "-w" | "--width" => {
                let value = iter.next().ok_or("missing width")?;
                width = value.parse().map_err(|_| format!("bad width: {value}"))?;
            }
            "-c" | "--config" => config = Some(PathBuf::from(iter.next().ok_or("missing config path")?)),
            "-o" | "--output" => output = Some(PathBuf::from(iter.next().ok_or("missing output path")?)),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument: {arg}")),
        }
    }
    Ok(Args {
        input: input.ok_or("missing input file")?,
        target,
        width,
        config,
        output,
    })
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip") || ext.eq_ignore_ascii_case("wxmx"))
}

fn run(args: &Args) -> mathview::Result<()> {
    let config = match &args.config {
        Some(path) => Configuration::from_json(&fs::read_to_string(path)?)?,
        None => Configuration::default(),
    };

    let dc = PixelSurface::new(1, 1);
    let mut view = WorksheetView::new(args.width, 600, config);
    if is_archive(&args.input) {
        view.set_worksheet(export::archive::load_archive(&args.input)?, &dc);
    } else {
        view.load_xml(&fs::read_to_string(&args.input)?, &dc)?;
    }
    tracing::info!(
        cells = view.worksheet().len(),
        input = %args.input.display(),
        "loaded worksheet"
    );

    match (&args.target, &args.output) {
        (Target::Text(format), Some(path)) => fs::write(path, view.export(*format))?,
        (Target::Text(format), None) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(view.export(*format).as_bytes())?;
            stdout.write_all(b"\n")?;
        }
        (Target::Html, Some(path)) => {
            export::html::write_html(view.worksheet(), view.config(), path, HtmlImages::Files)?;
        }
        (Target::Archive, Some(path)) => {
            fs::write(path, export::write_archive(view.worksheet(), view.config())?)?;
        }
        (Target::Html | Target::Archive, None) => {
            return Err(MathviewError::Other("this format needs -o <output>".to_string()));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let argv: Vec<String> = env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
