use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Driver crates to document, and the feature set that shows all of `i2s`
/// (host mocks plus the tracing backend).
const DOC_CRATES: [&str; 2] = ["platform", "i2s"];
const DOC_FEATURES: &str = "i2s/std,i2s/tracing";

fn doc_args(open: bool) -> Vec<&'static str> {
    let mut args = vec!["doc", "--no-deps", "--features", DOC_FEATURES];
    for krate in DOC_CRATES {
        args.extend(["-p", krate]);
    }
    if open {
        args.push("--open");
    }
    args
}

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Documenting platform + i2s...".cyan().bold());
    println!();

    let start = Instant::now();
    let output = Command::new("cargo")
        .args(doc_args(open))
        .output()
        .context("Failed to run cargo doc")?;

    if !output.status.success() {
        eprintln!("{}", "✗ cargo doc failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("cargo doc failed");
    }

    println!(
        "{}",
        format!(
            "✓ Driver docs ready in {:.2}s",
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    if !open {
        println!(
            "   {}",
            "Entry point: target/doc/i2s/index.html (xtask doc --open)".dimmed()
        );
    }
    println!();

    Ok(())
}
