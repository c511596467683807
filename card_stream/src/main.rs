//! card_stream — interactive entry point.

use std::io::{self, Write};
use std::path::PathBuf;

use card_stream::app::{run, AppConfig};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    init_logging();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Card Stream — image / pseudo-code scanner line        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let cfg = if args.iter().any(|a| a == "--quick") {
        println!("  Quick-start: 12 cards, placeholder art, entropy seed\n");
        let mut cfg = AppConfig::default();
        apply_flags(&args, &mut cfg);
        cfg
    } else {
        configure_interactively()
    };

    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `--seed N`, `--cards N`, `--images DIR`; usable with or without
/// `--quick`.
fn apply_flags(args: &[String], cfg: &mut AppConfig) {
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seed" => {
                cfg.seed = it.next().and_then(|v| v.parse().ok());
            }
            "--cards" => {
                if let Some(n) = it.next().and_then(|v| v.parse::<usize>().ok()) {
                    cfg.card_count = n.clamp(1, 64);
                }
            }
            "--images" => {
                if let Some(dir) = it.next() {
                    cfg.images = collect_images(dir);
                }
            }
            _ => {}
        }
    }
}

fn configure_interactively() -> AppConfig {
    let mut cfg = AppConfig::default();

    let cards: usize = read_line("  Card count (default 12): ")
        .trim()
        .parse()
        .unwrap_or(12);
    cfg.card_count = cards.clamp(1, 64);

    let dir = read_line("  Image directory (blank = placeholder art): ");
    let dir = dir.trim();
    if !dir.is_empty() {
        cfg.images = collect_images(dir);
        if cfg.images.is_empty() {
            println!("  ⚠  no usable images in '{}', using placeholder art", dir);
        }
    }

    let seed = read_line("  Seed for the code filler (blank = entropy): ");
    cfg.seed = seed.trim().parse().ok();

    let args: Vec<String> = std::env::args().collect();
    apply_flags(&args, &mut cfg);
    cfg
}

/// All png/jpeg files in `dir`, sorted by name so the pool order is stable.
fn collect_images(dir: &str) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()),
                    Some(ref ext) if ext == "png" || ext == "jpg" || ext == "jpeg"
                )
            })
            .collect(),
        Err(e) => {
            tracing::warn!(dir, error = %e, "image directory unreadable");
            Vec::new()
        }
    };
    images.sort();
    images
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
