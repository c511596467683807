//! Interactive menu for eyeballing generated filler blocks.

use pseudocode::CodeSource;
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            Pseudo-code Filler Explorer               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    loop {
        let choice = read_line("Generate a block? (Enter to continue, q to quit): ");
        if choice.trim().eq_ignore_ascii_case("q") {
            println!("\nGoodbye!\n");
            break;
        }

        let width: usize = read_line("  Width in chars (default 66): ")
            .trim().parse().unwrap_or(66);
        let width = width.clamp(1, 400);

        let height: usize = read_line("  Height in lines (default 25): ")
            .trim().parse().unwrap_or(25);
        let height = height.clamp(1, 200);

        let seed = read_line("  Seed (blank = entropy): ");
        let mut source = match seed.trim().parse::<u64>() {
            Ok(s) => CodeSource::with_seed(s),
            Err(_) => CodeSource::new(),
        };

        println!();
        println!("  ┌─ {} × {} ─", width, height);
        for line in source.fill(width, height).lines() {
            println!("  │ {}", line);
        }
        println!("  └─ ({} lines emitted)", height);
        println!();
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
