use crate::events::AppEvent;
use async_channel::Sender;
use orrery_core::Direction;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/orrery.sock";

/// One command per line: `show`, `hide`, `left`, `right`, `select <index>`, `reload`.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let mut words = line.split_whitespace();
    let event = match words.next()?.to_ascii_lowercase().as_str() {
        "show" => AppEvent::Show,
        "hide" => AppEvent::Hide,
        "reload" => AppEvent::ConfigReload,
        "select" => AppEvent::Select(words.next()?.parse().ok()?),
        other => AppEvent::Cycle(other.parse::<Direction>().ok()?),
    };
    words.next().is_none().then_some(event)
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening for commands on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut lines = BufReader::new(&mut stream).lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            None => log::warn!("Unknown command: {:?}", line.trim()),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let cases = vec![
            ("show", Some(AppEvent::Show)),
            ("  HIDE \n", Some(AppEvent::Hide)),
            ("left", Some(AppEvent::Cycle(Direction::Left))),
            ("Right", Some(AppEvent::Cycle(Direction::Right))),
            ("select 3", Some(AppEvent::Select(3))),
            ("reload", Some(AppEvent::ConfigReload)),
            ("select", None),
            ("select -1", None),
            ("select 2 3", None),
            ("spin", None),
            ("", None),
        ];

        for (line, expected) in cases {
            assert_eq!(parse_command(line), expected, "line {:?}", line);
        }
    }
}
