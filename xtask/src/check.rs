use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

struct CheckStep {
    label: &'static str,
    args: &'static [&'static str],
}

const STEPS: &[CheckStep] = &[
    CheckStep {
        label: "core (host, default features)",
        args: &["check", "-p", "blackbox"],
    },
    CheckStep {
        label: "core (host, std + os + frame-pointers)",
        args: &[
            "check",
            "-p",
            "blackbox",
            "--features",
            "std,os,frame-pointers",
        ],
    },
    CheckStep {
        label: "firmware (host glue, default features)",
        args: &["check", "-p", "firmware"],
    },
    CheckStep {
        label: "firmware (STM32H7 target)",
        args: &[
            "check",
            "-p",
            "firmware",
            "--target",
            "thumbv7em-none-eabihf",
            "--features",
            "hardware,os",
        ],
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "Checking blackbox builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in STEPS {
        println!("{}", format!("  Checking {}...", step.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(step.args)
            .output()
            .with_context(|| format!("Failed to run cargo for {}", step.label))?;

        if !output.status.success() {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("check failed: {}", step.label);
        }

        println!(
            "{}",
            format!(
                "  ✓ {} passed in {:.2}s",
                step.label,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
    }

    println!();
    println!(
        "{}",
        format!(
            "All checks passed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    Ok(())
}
