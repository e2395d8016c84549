//! In-band slash-commands
//!
//! A line starting with `/` is a command. The first token, prefix stripped
//! and lowercased, selects one of a closed set of handlers; the remaining
//! tokens are passed along as arguments.

use tracing::info;

use crate::error::ChatError;
use crate::message::ServerMessage;
use crate::session::Session;

/// Prefix that marks a line as a command
pub const COMMAND_PREFIX: char = '/';

/// Known commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the nicknames in the current room
    List,
    /// Disconnect from the server
    Quit,
    /// Show the usage summary
    Help,
}

/// What the read loop should do after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    /// Every command, in the order the help text lists them
    pub const ALL: [Command; 3] = [Command::List, Command::Quit, Command::Help];

    /// Keyword without the prefix
    pub fn keyword(self) -> &'static str {
        match self {
            Command::List => "list",
            Command::Quit => "quit",
            Command::Help => "help",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::List => "Show a list of users in the current room.",
            Command::Quit => "Disconnect from the chat server.",
            Command::Help => "Show this help message.",
        }
    }

    /// Find the command for a keyword (case-insensitive, prefix already stripped)
    pub fn lookup(keyword: &str) -> Option<Command> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Split a command line into its command and arguments
    ///
    /// The caller has already checked that `line` starts with the prefix.
    pub fn parse(line: &str) -> Result<(Command, Vec<&str>), ChatError> {
        let mut tokens = line.split_whitespace();
        let first = tokens.next().unwrap_or_default();
        let keyword = first
            .strip_prefix(COMMAND_PREFIX)
            .unwrap_or(first)
            .to_lowercase();

        match Self::lookup(&keyword) {
            Some(cmd) => Ok((cmd, tokens.collect())),
            None => Err(ChatError::UnknownCommand(keyword)),
        }
    }

    /// Run the handler for this command on behalf of `session`
    ///
    /// Output goes to the invoker's own queue only.
    pub fn execute(self, session: &Session, _args: &[&str]) -> Flow {
        match self {
            Command::List => {
                session.client().enqueue(ServerMessage::UserList {
                    room: session.room().name().to_string(),
                    nicks: session.room().nicknames(),
                });
                Flow::Continue
            }
            Command::Help => {
                session.client().enqueue(ServerMessage::Help);
                Flow::Continue
            }
            Command::Quit => {
                info!(
                    "Client {} ({}) is quitting",
                    session.client().nick,
                    session.peer()
                );
                Flow::Quit
            }
        }
    }
}

/// Parse and run one command line
///
/// Unknown commands are reported to the invoker and the session goes on.
pub fn dispatch(session: &Session, line: &str) -> Flow {
    match Command::parse(line) {
        Ok((cmd, args)) => cmd.execute(session, &args),
        Err(err) => {
            session.client().enqueue(ServerMessage::from(&err));
            Flow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use crate::client::Client;
    use crate::registry::Registry;
    use crate::types::SessionId;

    fn joined(
        registry: &Registry,
        nick: &str,
    ) -> (Session, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(16);
        let client = Arc::new(Client::new(SessionId::new(), nick.to_string(), tx));
        let room = registry.get_or_create_room("general");
        let session = Session::join(client, room, "127.0.0.1:1".to_string());
        (session, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Command::lookup("list"), Some(Command::List));
        assert_eq!(Command::lookup("QUIT"), Some(Command::Quit));
        assert_eq!(Command::lookup("Help"), Some(Command::Help));
        assert_eq!(Command::lookup("dance"), None);
    }

    #[test]
    fn test_parse_splits_arguments() {
        let (cmd, args) = Command::parse("/LIST  now please").unwrap();
        assert_eq!(cmd, Command::List);
        assert_eq!(args, vec!["now", "please"]);
    }

    #[test]
    fn test_parse_unknown_reports_keyword() {
        match Command::parse("/UnknownCmd arg") {
            Err(ChatError::UnknownCommand(keyword)) => assert_eq!(keyword, "unknowncmd"),
            other => panic!("unexpected parse result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_strips_one_prefix_only() {
        match Command::parse("//list") {
            Err(ChatError::UnknownCommand(keyword)) => assert_eq!(keyword, "/list"),
            other => panic!("unexpected parse result: {:?}", other),
        }
    }

    #[test]
    fn test_list_goes_to_invoker_only() {
        let registry = Registry::new();
        let (alice, mut alice_rx) = joined(&registry, "alice");
        let (_bob, mut bob_rx) = joined(&registry, "bob");
        let (_carol, mut carol_rx) = joined(&registry, "carol");
        drain(&mut alice_rx);
        drain(&mut bob_rx);
        drain(&mut carol_rx);

        assert_eq!(dispatch(&alice, "/list"), Flow::Continue);

        assert_eq!(
            drain(&mut alice_rx),
            vec![ServerMessage::UserList {
                room: "general".to_string(),
                nicks: vec!["alice".to_string(), "bob".to_string(), "carol".to_string()],
            }]
        );
        assert!(drain(&mut bob_rx).is_empty());
        assert!(drain(&mut carol_rx).is_empty());
    }

    #[test]
    fn test_unknown_command_is_reported_not_broadcast() {
        let registry = Registry::new();
        let (alice, mut alice_rx) = joined(&registry, "alice");
        let (_bob, mut bob_rx) = joined(&registry, "bob");
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        assert_eq!(dispatch(&alice, "/unknowncmd"), Flow::Continue);

        let replies = drain(&mut alice_rx);
        assert_eq!(replies.len(), 1);
        assert!(replies[0].to_string().starts_with("ERR: "));
        assert!(replies[0].to_string().contains("unknowncmd"));
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[test]
    fn test_help_and_quit() {
        let registry = Registry::new();
        let (alice, mut alice_rx) = joined(&registry, "alice");
        drain(&mut alice_rx);

        assert_eq!(dispatch(&alice, "/help"), Flow::Continue);
        assert_eq!(drain(&mut alice_rx), vec![ServerMessage::Help]);

        assert_eq!(dispatch(&alice, "/quit"), Flow::Quit);
        // quit itself does not leave; teardown does
        assert!(alice.room().contains(alice.client().id));
    }
}
