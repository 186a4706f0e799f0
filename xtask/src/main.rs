use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(about = "Build tasks for the sentra workspace")]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Cross-compile the eBPF object the sentra binary embeds
    BuildEbpf {
        #[arg(long, default_value = "bpfel-unknown-none")]
        target: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Cmd::BuildEbpf { target } => build_ebpf(&target),
    }
}

fn build_ebpf(target: &str) -> Result<()> {
    // Release only: debug builds pull in formatting machinery the BPF
    // verifier rejects, and the loader embeds the release artifact path.
    let status = Command::new("cargo")
        .args(["+nightly", "build", "--package", "sentra-ebpf", "--release"])
        .args(["--target", target])
        .args(["-Z", "build-std=core"])
        .status()
        .context("failed to run cargo for the eBPF build")?;

    if !status.success() {
        bail!("eBPF build failed for target {target}");
    }

    println!("eBPF object ready: target/{target}/release/sentra");
    Ok(())
}
