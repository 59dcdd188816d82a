//! Line-oriented stdin/stdout channel for driving the funnel locally.
//!
//! ## Commands
//!
//! - `/start` - The start command
//! - `!TOKEN` - Press a menu button (e.g. `!NET_SOL`, `!PKG_24H`)
//! - `/as <id>` - Act as another user (e.g. the admin)
//! - `/state` - Show the current user's funnel step
//! - `/quit` - Exit
//! - anything else - Free text for the current step

use std::io::{self, BufWriter};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::funnel::Funnel;
use crate::input::Inbound;
use crate::output::write_reply;
use crate::session::UserId;

/// A parsed console line.
#[derive(Debug, PartialEq)]
pub enum ConsoleLine {
    Event(Inbound),
    SwitchUser(UserId),
    ShowState,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_line(line: &str) -> ConsoleLine {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleLine::Empty;
    }
    match line {
        "/start" => return ConsoleLine::Event(Inbound::Start),
        "/quit" | "/exit" => return ConsoleLine::Quit,
        "/state" => return ConsoleLine::ShowState,
        _ => {}
    }
    if let Some(id) = line.strip_prefix("/as ") {
        return match id.trim().parse() {
            Ok(id) => ConsoleLine::SwitchUser(id),
            Err(e) => ConsoleLine::Invalid(format!("bad user id: {e}")),
        };
    }
    if let Some(token) = line.strip_prefix('!') {
        return match token.parse() {
            Ok(action) => ConsoleLine::Event(Inbound::Action(action)),
            Err(e) => ConsoleLine::Invalid(e.to_string()),
        };
    }
    ConsoleLine::Event(Inbound::Text(line.to_string()))
}

/// Read events from stdin until EOF, `/quit` or cancellation.
pub async fn run_console(
    funnel: &Funnel,
    mut user: UserId,
    json_mode: bool,
    cancel: CancellationToken,
) -> io::Result<()> {
    info!(user_id = user, "console channel ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut writer = BufWriter::new(io::stdout());
    let mut buf = String::with_capacity(512);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = cancel.cancelled() => {
                info!("shutdown requested, closing console");
                return Ok(());
            }
        };
        let Some(line) = line else {
            debug!("stdin closed");
            return Ok(());
        };

        match parse_line(&line) {
            ConsoleLine::Event(event) => {
                for reply in funnel.handle(user, event).await {
                    write_reply(&reply, json_mode, &mut buf, &mut writer)?;
                }
            }
            ConsoleLine::SwitchUser(id) => {
                user = id;
                info!(user_id = user, "acting as user");
            }
            ConsoleLine::ShowState => match funnel.sessions().snapshot(user) {
                Some(s) => info!(user_id = user, step = %s.step, network = %s.network, "session"),
                None => info!(user_id = user, "no session"),
            },
            ConsoleLine::Quit => return Ok(()),
            ConsoleLine::Empty => {}
            ConsoleLine::Invalid(reason) => warn!(%reason, "ignored console line"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;
    use upstream::Network;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("/start"), ConsoleLine::Event(Inbound::Start));
        assert_eq!(
            parse_line("!NET_SUI"),
            ConsoleLine::Event(Inbound::Action(Action::SelectNetwork(Network::Sui)))
        );
        assert_eq!(parse_line("/as 1001"), ConsoleLine::SwitchUser(1001));
        assert_eq!(parse_line("  "), ConsoleLine::Empty);
        assert_eq!(parse_line("/quit"), ConsoleLine::Quit);
        assert_eq!(parse_line("/state"), ConsoleLine::ShowState);
        assert_eq!(
            parse_line(" abc123 "),
            ConsoleLine::Event(Inbound::Text("abc123".into()))
        );
        assert!(matches!(parse_line("!NOPE"), ConsoleLine::Invalid(_)));
        assert!(matches!(parse_line("/as admin"), ConsoleLine::Invalid(_)));
    }
}
