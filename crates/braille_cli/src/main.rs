mod config;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use braille_render::{
    inspect_image, profile_catalogue, AsciiRenderer, RenderMetadata, RenderOutput,
};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Settings;

/// Extensions picked up by `batch`.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert images to adaptive Unicode Braille art")]
struct Cli {
    /// Settings file (defaults to <config dir>/braille-ascii/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render art to stdout for a quick preview
    Preview(PreviewArgs),
    /// Convert an image and write the result to disk
    Convert(ConvertArgs),
    /// Convert every image in a directory tree
    Batch(BatchArgs),
    /// Print the width profiles as JSON
    Profiles,
    /// Print format and dimensions of an image as JSON
    Info(InfoArgs),
}

#[derive(Args, Debug, Clone)]
struct RenderSettings {
    /// Output width in characters (defaults to the configured width)
    #[arg(long)]
    width: Option<u32>,
    /// Include conversion metadata
    #[arg(long, default_value_t = false)]
    metadata: bool,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input image path
    input: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input image path
    input: PathBuf,
    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
    /// Write a JSON document with `ascii_art` and `metadata` fields instead of plain text
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory searched recursively for images
    input: PathBuf,
    /// Output directory for text files
    #[arg(short, long)]
    out_dir: PathBuf,
    /// Output width in characters (defaults to the configured width)
    #[arg(long)]
    width: Option<u32>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input image path
    input: PathBuf,
}

#[derive(Serialize)]
struct ConvertResponse<'a> {
    ascii_art: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a RenderMetadata>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    match cli.command {
        Commands::Preview(args) => preview(args, &settings),
        Commands::Convert(args) => convert(args, &settings),
        Commands::Batch(args) => batch(args, &settings),
        Commands::Profiles => profiles(),
        Commands::Info(args) => info(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn render(path: &Path, settings: &Settings, args: &RenderSettings) -> Result<RenderOutput> {
    let width = settings.width(args.width)?;
    let include_metadata = args.metadata || settings.include_metadata;
    AsciiRenderer
        .render_path(path, &settings.decode_limits(), width, include_metadata)
        .with_context(|| format!("failed to render {:?}", path))
}

fn preview(args: PreviewArgs, settings: &Settings) -> Result<()> {
    let output = render(&args.input, settings, &args.settings)?;

    println!("{}", output.text);
    if let Some(metadata) = &output.metadata {
        println!("{}", serde_json::to_string_pretty(metadata)?);
    }

    Ok(())
}

fn convert(args: ConvertArgs, settings: &Settings) -> Result<()> {
    let output = render(&args.input, settings, &args.settings)?;

    let mut file = File::create(&args.output)
        .with_context(|| format!("failed to create {:?}", args.output))?;
    if args.json {
        let response =
            ConvertResponse { ascii_art: &output.text, metadata: output.metadata.as_ref() };
        serde_json::to_writer_pretty(&mut file, &response)?;
        writeln!(file)?;
    } else {
        writeln!(file, "{}", output.text)?;
    }

    log::info!(
        "wrote {}x{} characters to {:?}",
        output.grid.width,
        output.grid.height,
        args.output
    );
    Ok(())
}

fn batch(args: BatchArgs, settings: &Settings) -> Result<()> {
    let width = settings.width(args.width)?;
    let limits = settings.decode_limits();
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let inputs = collect_images(&args.input)?;
    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )?
        .progress_chars("=> "),
    );

    let failures = AtomicUsize::new(0);
    inputs.par_iter().for_each(|input| {
        let result = AsciiRenderer
            .render_path(input, &limits, width, false)
            .with_context(|| format!("failed to render {:?}", input))
            .and_then(|output| {
                let relative = input.strip_prefix(&args.input).unwrap_or(input);
                let target = args.out_dir.join(relative).with_extension("txt");
                write_text(&target, &output.text)
            });
        if let Err(err) = result {
            log::warn!("{err:#}");
            failures.fetch_add(1, Ordering::Relaxed);
        }
        progress.inc(1);
    });

    let failed = failures.into_inner();
    progress.finish_with_message(format!(
        "{} of {} images written to {:?}",
        inputs.len() - failed,
        inputs.len(),
        args.out_dir
    ));
    if failed > 0 {
        log::warn!("{failed} of {} images failed to convert", inputs.len());
    }
    Ok(())
}

fn collect_images(path: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| is_image(path))
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", path);
    }
    Ok(entries)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn write_text(target: &Path, text: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {:?}", parent))?;
    }
    let mut file =
        File::create(target).with_context(|| format!("failed to create {:?}", target))?;
    writeln!(file, "{}", text)?;
    Ok(())
}

fn profiles() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&profile_catalogue())?);
    Ok(())
}

fn info(args: InfoArgs) -> Result<()> {
    let bytes =
        fs::read(&args.input).with_context(|| format!("failed to read {:?}", args.input))?;
    let info =
        inspect_image(&bytes).with_context(|| format!("failed to inspect {:?}", args.input))?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("photos/cat.PNG")));
        assert!(is_image(Path::new("a.jpeg")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("no_extension")));
    }

    #[test]
    fn test_collect_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        for name in ["b.png", "a.jpg", "readme.md", "nested/c.webp"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let found = collect_images(dir.path()).unwrap();
        let names: Vec<_> =
            found.iter().map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf()).collect();
        assert_eq!(
            names,
            vec![PathBuf::from("a.jpg"), PathBuf::from("b.png"), PathBuf::from("nested/c.webp")]
        );
    }

    #[test]
    fn test_collect_images_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_images(dir.path()).is_err());
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "braille-ascii",
            "convert",
            "in.png",
            "-o",
            "out.json",
            "--width",
            "60",
            "--json",
            "--metadata",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.settings.width, Some(60));
                assert!(args.json && args.settings.metadata);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_negative_width() {
        let result =
            Cli::try_parse_from(["braille-ascii", "preview", "in.png", "--width", "-5"]);
        assert!(result.is_err());
    }
}
