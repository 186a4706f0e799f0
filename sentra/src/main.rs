//! # sentra - Main Entry Point
//!
//! Loads the eBPF object, attaches the exec probe and the selected connect
//! strategy, then drains both per-CPU transports until Ctrl-C, the
//! `--duration` limit, or the event channel closing.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use sentra::capture::{
    attach_connect_probe, attach_exec_probe, display_record, display_statistics,
    init_ebpf_logger, load_ebpf_program, print_publish_diagnostics, spawn_event_readers,
    TransportStats,
};
use sentra::cli::Args;
use sentra::preflight::run_preflight_checks;
use sentra::records::CapturedRecord;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = err.to_string().to_lowercase();
    if msg.contains("permission denied") || msg.contains("requires root") {
        EXIT_NOPERM
    } else {
        EXIT_ERROR
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let args = Args::parse();

    // Fatal-to-load conditions surface here, before any capture starts.
    run_preflight_checks()?;

    if !args.quiet {
        println!("sentra v{}", env!("CARGO_PKG_VERSION"));
        println!("connect strategy: {}", args.strategy.describe());
    }

    // ── Load eBPF and attach probes ─────────────────────────────────────
    let mut bpf = load_ebpf_program()?;
    init_ebpf_logger(&mut bpf);

    attach_exec_probe(&mut bpf)?;
    attach_connect_probe(&mut bpf, args.strategy)?;

    // ── Per-CPU readers feed the output loop over one channel ───────────
    let stats = Arc::new(TransportStats::default());
    let (tx, mut rx) = mpsc::channel::<CapturedRecord>(1024);
    spawn_event_readers(&mut bpf, &tx, &stats)?;
    // Readers hold their own clones; dropping ours lets the loop end when
    // they all stop.
    drop(tx);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let duration_limit =
        if args.duration > 0 { Some(Duration::from_secs(args.duration)) } else { None };
    let deadline = async move {
        match duration_limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let stats_period = Duration::from_secs(10);
    let mut stats_interval =
        tokio::time::interval_at(tokio::time::Instant::now() + stats_period, stats_period);

    let started = Instant::now();
    let mut exit_reason = "event channel closed";

    // Main output loop
    loop {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some(record) => {
                    if args.json {
                        println!("{}", serde_json::to_string(&record)?);
                    } else {
                        display_record(&record);
                    }
                }
                None => break,
            },
            _ = &mut ctrl_c => {
                exit_reason = "interrupted";
                break;
            }
            () = &mut deadline => {
                exit_reason = "duration limit reached";
                break;
            }
            _ = stats_interval.tick() => {
                if !args.quiet {
                    display_statistics(&stats.snapshot());
                }
            }
        }
    }

    // Final summary and transport balance
    let snapshot = stats.snapshot();
    if !args.quiet {
        eprintln!(
            "\n{exit_reason}: {:.1}s, {} exec + {} net records ({} lost, {} undecodable)",
            started.elapsed().as_secs_f64(),
            snapshot.exec_received,
            snapshot.net_received,
            snapshot.total_lost(),
            snapshot.decode_failures,
        );
        print_publish_diagnostics(&bpf, &snapshot)?;
    }

    Ok(())
}
