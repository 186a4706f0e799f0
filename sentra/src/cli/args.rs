//! CLI argument definitions

use clap::Parser;

use crate::capture::ConnectStrategy;

#[derive(Parser)]
#[command(
    name = "sentra",
    about = "Capture process exec and outbound TCP connect events via eBPF",
    after_help = "\
EXAMPLES:
    sudo sentra                              Capture with the syscall connect strategy
    sudo sentra --strategy socket            Capture local endpoints via tcp_v4_connect
    sudo sentra --json --duration 60         JSON lines, stop after a minute"
)]
pub struct Args {
    /// Connect capture strategy: where outbound TCP connects are observed
    #[arg(long, value_enum, default_value_t = ConnectStrategy::Syscall)]
    pub strategy: ConnectStrategy,

    /// Emit records as JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Stop after N seconds (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub duration: u64,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}
