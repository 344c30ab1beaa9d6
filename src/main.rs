//! buswatch — live tail of control-plane bus traffic for one app
//!
//! Attaches to a bus feed delivering every message as newline-delimited
//! JSON, keeps only the ones concerning the watched app GUID, and prints a
//! chronological, color-annotated view with request/reply nesting.

use buswatch::classify::MessageKind;
use buswatch::watch::{Line, WatchSession};
use buswatch::{render, source};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "buswatch", about = "Live tail of control-plane bus traffic for a single app")]
struct Cli {
    /// GUID of the app instance to watch
    guid: String,

    /// Unix socket delivering bus frames as newline-delimited JSON
    /// (reads stdin when omitted)
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("BUSWATCH_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn colorize(line: &Line, text: String) -> String {
    match line {
        Line::Diagnostic { .. } => text.red().to_string(),
        Line::Reply { .. } => text.yellow().to_string(),
        Line::Message { kind, .. } => match kind {
            MessageKind::DropletQuery | MessageKind::HealthQuery => text.cyan().to_string(),
            MessageKind::InstanceExited | MessageKind::InstanceStop => text.yellow().to_string(),
            MessageKind::RouteRegistered | MessageKind::RouteUnregistered => {
                text.green().to_string()
            }
            _ => text,
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut frames = match cli.socket {
        Some(path) => source::spawn_socket(path),
        None => source::spawn_stdin(),
    };

    let mut session = WatchSession::new(cli.guid);
    while let Some(frame) = frames.recv().await {
        for line in session.handle(&frame) {
            let text = render::render(&line, Local::now());
            println!("{}", colorize(&line, text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_guid_only() {
        let cli = Cli::try_parse_from(["buswatch", "abc-123"]).unwrap();
        assert_eq!(cli.guid, "abc-123");
        assert!(cli.socket.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_socket_and_verbosity() {
        let cli = Cli::try_parse_from(["buswatch", "abc-123", "--socket", "/tmp/bus.sock", "-vv"])
            .unwrap();
        assert_eq!(cli.socket, Some(PathBuf::from("/tmp/bus.sock")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_requires_a_guid() {
        assert!(Cli::try_parse_from(["buswatch"]).is_err());
    }
}
