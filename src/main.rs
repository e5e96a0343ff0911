//! # proxyprint CLI
//!
//! Usage:
//!   proxyprint decklist.txt
//!   proxyprint decklist.txt -c -p letter -o out/
//!   proxyprint --help

use proxyprint::page::PageOptions;
use proxyprint::{generate, PageFormat, RunConfig, SizeClass};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", HELP);
        return;
    }

    let (decklist_path, config, output_dir) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        }
    };

    let decklist = match fs::read_to_string(&decklist_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!(
                "The decklist file {} cannot be read: {}",
                decklist_path.display(),
                e
            );
            process::exit(1);
        }
    };

    let output_dir = output_dir.unwrap_or_else(|| {
        let stem = decklist_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string());
        PathBuf::from("output").join(stem)
    });

    match generate(&decklist, &config) {
        Ok(output) => {
            for diagnostic in &output.diagnostics {
                eprintln!("{}", diagnostic);
            }
            match proxyprint::page::save_pages(&output.pages, &output_dir) {
                Ok(paths) => {
                    eprintln!(
                        "✓ {} cards on {} pages in {}",
                        output.cards_placed,
                        paths.len(),
                        output_dir.display()
                    );
                }
                Err(e) => {
                    eprintln!("✗ {}", e);
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> Result<(PathBuf, RunConfig, Option<PathBuf>), String> {
    let mut config = RunConfig::default();
    let mut decklist = None;
    let mut output = None;
    let mut page = PageOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", name))
        };
        match arg.as_str() {
            "-i" | "--icon-path" => config.icon_source = Some(value(arg)?),
            "-p" | "--page-format" => page.format = value(arg)?.parse::<PageFormat>()?,
            "-c" | "--color" => config.render.color = true,
            "--no-text-symbols" => config.render.symbols = false,
            "-s" | "--small" => page.size_class = SizeClass::Small,
            "--playtest" => page.size_class = SizeClass::Playtest,
            "--no-card-space" => page.spacing = false,
            "--full-art-lands" => config.render.full_art_lands = true,
            "--ignore-basic-lands" | "--ignore-basics" => {
                config.resolve.ignore_basic_lands = true
            }
            "--alternative-frames" => config.resolve.alternative_frames = true,
            "--no-acorn-stamp" => config.render.acorn_stamp = false,
            "-o" | "--output" => output = Some(PathBuf::from(value(arg)?)),
            "--cache-dir" => config.cache_dir = PathBuf::from(value(arg)?),
            "--title-font" => config.title_font = PathBuf::from(value(arg)?),
            "--rules-font" => config.rules_font = PathBuf::from(value(arg)?),
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{}' (try --help)", other));
            }
            _ => {
                if decklist.replace(PathBuf::from(arg)).is_some() {
                    return Err("only one decklist path is accepted".to_string());
                }
            }
        }
    }

    config.page = page;
    let decklist = decklist.ok_or("missing decklist path (try --help)")?;
    Ok((decklist, config, output))
}

const HELP: &str = "\
proxyprint: generate printable proxy pages from a decklist

USAGE:
    proxyprint <decklist> [options]

OPTIONS:
    -i, --icon-path <file>     set icon image (PNG/JPEG or data: URI)
    -p, --page-format <fmt>    a4 (default) or letter
    -c, --color                color the card frames
        --no-text-symbols      keep {W}-style escapes as literal text
    -s, --small                print cards at 75% size (4x4 per page)
        --playtest             print narrow playtest-size cards
        --no-card-space        no blank margin between cards
        --full-art-lands       no big mana symbol on basic lands
        --ignore-basic-lands   skip basic lands entirely
        --alternative-frames   flip as double-faced, aftermath as split
        --no-acorn-stamp       no acorn mark on non tournament-legal cards
    -o, --output <dir>         output directory (default output/<deck>/)
        --cache-dir <dir>      card cache location (default cardcache/)
        --title-font <file>    title/symbol font (default fonts/title.ttf)
        --rules-font <file>    rules text font (default fonts/rules.ttf)
    -h, --help                 show this help
";
