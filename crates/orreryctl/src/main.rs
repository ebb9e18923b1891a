use clap::{Parser, Subcommand};
use orrery_core::Direction;
use std::io::Write;
use std::os::unix::net::UnixStream;

const SOCKET_PATH: &str = "/tmp/orrery.sock";

#[derive(Parser, Debug)]
#[command(name = "orreryctl", version, about = "Remote control for a running orrery", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Commands {
    /// Show the orrery window
    Show,
    /// Hide the orrery window
    Hide,
    /// Move the selection one node counterclockwise
    Left,
    /// Move the selection one node clockwise
    Right,
    /// Rotate the given node to the front
    Select {
        /// Zero-based node index, in config order
        index: usize,
    },
    /// Re-read the config file and rebuild the ring
    Reload,
}

impl Commands {
    fn line(&self) -> String {
        match self {
            Commands::Show => "show".to_string(),
            Commands::Hide => "hide".to_string(),
            Commands::Left => Direction::Left.to_string(),
            Commands::Right => Direction::Right.to_string(),
            Commands::Select { index } => format!("select {}", index),
            Commands::Reload => "reload".to_string(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let line = cli.command.line();
    log::debug!("Sending {:?} to {}", line, SOCKET_PATH);
    send_command(&line)
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to orrery at {}: {}. Is orrery running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
