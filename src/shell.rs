//! Operator command surface. Parses a line into a [`Command`], asks for any
//! missing arguments through a caller-supplied prompt, and runs it against
//! the [`Blockchain`]. The core modules never see any of this.

use std::fmt;

use log::debug;

use crate::blockchain::Block;
use crate::config::Config;
use crate::error::{Result, SimError};
use crate::fork::Resolution;
use crate::simulation::Blockchain;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Mine,
    Fork,
    ExtendFork,
    Resolve,
    Validate,
    Show,
    Status,
    Dump,
    Help,
    Exit,
}

struct MenuEntry {
    key: &'static str,
    names: &'static [&'static str],
    about: &'static str,
    verb: Verb,
}

/// Every accepted spelling of every command.
const MENU: &[MenuEntry] = &[
    MenuEntry {
        key: "1",
        names: &["mine"],
        about: "Mine a new block",
        verb: Verb::Mine,
    },
    MenuEntry {
        key: "2",
        names: &["fork"],
        about: "Create a fork",
        verb: Verb::Fork,
    },
    MenuEntry {
        key: "3",
        names: &["extend", "extend-fork"],
        about: "Extend a fork",
        verb: Verb::ExtendFork,
    },
    MenuEntry {
        key: "4",
        names: &["resolve"],
        about: "Resolve forks (longest chain rule)",
        verb: Verb::Resolve,
    },
    MenuEntry {
        key: "5",
        names: &["validate"],
        about: "Validate blockchain",
        verb: Verb::Validate,
    },
    MenuEntry {
        key: "6",
        names: &["exit", "quit"],
        about: "Exit",
        verb: Verb::Exit,
    },
    MenuEntry {
        key: "7",
        names: &["show", "chain"],
        about: "Show the main chain",
        verb: Verb::Show,
    },
    MenuEntry {
        key: "8",
        names: &["status"],
        about: "Show chain and fork summary",
        verb: Verb::Status,
    },
    MenuEntry {
        key: "9",
        names: &["dump", "json"],
        about: "Dump state as JSON",
        verb: Verb::Dump,
    },
    MenuEntry {
        key: "?",
        names: &["help", "menu"],
        about: "Show this menu",
        verb: Verb::Help,
    },
];

pub fn menu() -> String {
    let mut out = String::from("Menu:");
    for entry in MENU {
        out.push_str(&format!("\n{}. {} [{}]", entry.key, entry.about, entry.names.join("|")));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mine { data: Option<String> },
    Fork,
    ExtendFork { fork_id: Option<usize>, data: Option<String> },
    Resolve,
    Validate,
    Show,
    Status,
    Dump,
    Help,
    Exit,
}

impl Command {
    /// Parse `<verb> [args]`. `mine <data>` and `extend <id> <data>` accept
    /// their arguments inline; anything omitted is prompted for later.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        if head.is_empty() {
            return Err(SimError::InvalidCommand("empty input".into()));
        }

        let token = head.to_ascii_lowercase();
        let verb = MENU
            .iter()
            .find(|e| e.key == token || e.names.iter().any(|n| *n == token))
            .map(|e| e.verb)
            .ok_or_else(|| SimError::InvalidCommand(head.to_string()))?;

        Ok(match verb {
            Verb::Mine => Command::Mine {
                data: non_empty(rest),
            },
            Verb::ExtendFork => {
                let (id, data) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::ExtendFork {
                    fork_id: non_empty(id).map(|id| parse_fork_id(&id)).transpose()?,
                    data: non_empty(data),
                }
            }
            Verb::Fork => Command::Fork,
            Verb::Resolve => Command::Resolve,
            Verb::Validate => Command::Validate,
            Verb::Show => Command::Show,
            Verb::Status => Command::Status,
            Verb::Dump => Command::Dump,
            Verb::Help => Command::Help,
            Verb::Exit => Command::Exit,
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_fork_id(s: &str) -> Result<usize> {
    s.trim()
        .parse()
        .map_err(|_| SimError::InvalidCommand(format!("fork id must be a number, got '{s}'")))
}

/// What a command did, rendered for the operator by `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Mined(Block),
    ForkCreated(usize),
    ForkExtended { fork_id: usize, block: Block },
    Resolved(Resolution),
    Validated(bool),
    Chain(Vec<Block>),
    Status {
        length: usize,
        difficulty: u32,
        valid: bool,
        fork_lengths: Vec<usize>,
    },
    Dump(String),
    Help(String),
    Exit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Mined(block) => write!(f, "Block mined: {block}"),
            Outcome::ForkCreated(id) => write!(f, "Fork {id} created."),
            Outcome::ForkExtended { fork_id, block } => {
                write!(f, "Block added to Fork {fork_id}: {block}")
            }
            Outcome::Resolved(Resolution::NoForks) => {
                write!(f, "No forks available for resolution.")
            }
            Outcome::Resolved(Resolution::KeptMain { length }) => write!(
                f,
                "Forks resolved using the longest chain rule: main chain kept (length {length})."
            ),
            Outcome::Resolved(Resolution::Adopted { fork_id, length }) => write!(
                f,
                "Forks resolved using the longest chain rule: fork {fork_id} adopted (length {length})."
            ),
            Outcome::Validated(valid) => write!(
                f,
                "The blockchain is {}.",
                if *valid { "valid" } else { "invalid" }
            ),
            Outcome::Chain(blocks) => {
                write!(f, "Current Blockchain:")?;
                for block in blocks {
                    write!(f, "\n{block}")?;
                }
                Ok(())
            }
            Outcome::Status {
                length,
                difficulty,
                valid,
                fork_lengths,
            } => {
                write!(
                    f,
                    "length={length} difficulty={difficulty} valid={valid} forks={}",
                    fork_lengths.len()
                )?;
                for (i, len) in fork_lengths.iter().enumerate() {
                    write!(f, "\n  fork {}: length {}", i + 1, len)?;
                }
                Ok(())
            }
            Outcome::Dump(json) => f.write_str(json),
            Outcome::Help(text) => f.write_str(text),
            Outcome::Exit => write!(f, "Exiting the simulation."),
        }
    }
}

/// One operator session over one [`Blockchain`].
pub struct Shell {
    blockchain: Blockchain,
    config: Config,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Self {
            blockchain: Blockchain::new(&config),
            config,
        }
    }

    pub fn blockchain(&self) -> &Blockchain {
        &self.blockchain
    }

    /// Run `command`, calling `prompt` for any argument it lacks.
    pub fn execute<P>(&mut self, command: Command, mut prompt: P) -> Result<Outcome>
    where
        P: FnMut(&str) -> Result<String>,
    {
        debug!("SHELL - {:?}", command);
        let bc = &mut self.blockchain;
        let outcome = match command {
            Command::Mine { data } => {
                let data = match data {
                    Some(d) => d,
                    None => prompt("Enter block data: ")?,
                };
                let data = non_empty(&data).unwrap_or_else(|| self.config.default_block_data.clone());
                Outcome::Mined(bc.mine(data).clone())
            }
            Command::Fork => Outcome::ForkCreated(bc.create_fork()),
            Command::ExtendFork { fork_id, data } => {
                let count = bc.forks().len();
                let fork_id = match fork_id {
                    Some(id) => id,
                    None if count == 0 => return Err(SimError::InvalidForkId { id: 0, count }),
                    None => parse_fork_id(&prompt(&format!(
                        "Available forks: 1 to {count}\nChoose a fork to extend: "
                    ))?)?,
                };
                if bc.forks().get(fork_id).is_none() {
                    return Err(SimError::InvalidForkId { id: fork_id, count });
                }
                let data = match data {
                    Some(d) => d,
                    None => prompt("Enter data for the new block: ")?,
                };
                let data = non_empty(&data).unwrap_or_else(|| self.config.default_block_data.clone());
                let block = bc.extend_fork(fork_id, data)?.clone();
                Outcome::ForkExtended { fork_id, block }
            }
            Command::Resolve => Outcome::Resolved(bc.resolve()),
            Command::Validate => Outcome::Validated(bc.validate()),
            Command::Show => Outcome::Chain(bc.chain().blocks().to_vec()),
            Command::Status => Outcome::Status {
                length: bc.chain().len(),
                difficulty: bc.chain().difficulty(),
                valid: bc.validate(),
                fork_lengths: bc.forks().lengths(),
            },
            Command::Dump => Outcome::Dump(serde_json::to_string_pretty(&bc.snapshot())?),
            Command::Help => Outcome::Help(menu()),
            Command::Exit => Outcome::Exit,
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_prompt(q: &str) -> Result<String> {
        panic!("unexpected prompt: {q}")
    }

    fn answers(list: &[&str]) -> impl FnMut(&str) -> Result<String> {
        let mut queue: Vec<String> = list.iter().rev().map(|s| s.to_string()).collect();
        move |_: &str| Ok(queue.pop().expect("ran out of answers"))
    }

    #[test]
    fn parses_numeric_and_named_commands() {
        assert_eq!(Command::parse("1").unwrap(), Command::Mine { data: None });
        assert_eq!(
            Command::parse("mine  hello world ").unwrap(),
            Command::Mine { data: Some("hello world".into()) }
        );
        assert_eq!(Command::parse("2").unwrap(), Command::Fork);
        assert_eq!(
            Command::parse("extend 2 some data").unwrap(),
            Command::ExtendFork { fork_id: Some(2), data: Some("some data".into()) }
        );
        assert_eq!(
            Command::parse("3").unwrap(),
            Command::ExtendFork { fork_id: None, data: None }
        );
        assert_eq!(Command::parse("RESOLVE").unwrap(), Command::Resolve);
        assert_eq!(Command::parse("5").unwrap(), Command::Validate);
        assert_eq!(Command::parse("quit").unwrap(), Command::Exit);
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(matches!(Command::parse("   "), Err(SimError::InvalidCommand(_))));
        assert!(matches!(Command::parse("stake"), Err(SimError::InvalidCommand(_))));
        assert!(matches!(Command::parse("extend one"), Err(SimError::InvalidCommand(_))));
    }

    #[test]
    fn menu_lists_every_entry() {
        let text = menu();
        for entry in MENU {
            assert!(text.contains(entry.about));
        }
    }

    #[test]
    fn session_scenario() {
        let mut shell = Shell::new(Config::default());

        let out = shell.execute(Command::parse("1").unwrap(), answers(&["A"])).unwrap();
        assert!(matches!(&out, Outcome::Mined(b) if b.data == "A" && b.index == 2));

        let out = shell.execute(Command::Fork, no_prompt).unwrap();
        assert_eq!(out, Outcome::ForkCreated(1));

        let out = shell.execute(Command::parse("3").unwrap(), answers(&["1", "B"])).unwrap();
        assert!(matches!(&out, Outcome::ForkExtended { fork_id: 1, block } if block.index == 3));

        let out = shell.execute(Command::Resolve, no_prompt).unwrap();
        assert_eq!(out, Outcome::Resolved(Resolution::Adopted { fork_id: 1, length: 3 }));

        let out = shell.execute(Command::Validate, no_prompt).unwrap();
        assert_eq!(out, Outcome::Validated(true));
        assert_eq!(out.to_string(), "The blockchain is valid.");

        let out = shell.execute(Command::Resolve, no_prompt).unwrap();
        assert_eq!(out.to_string(), "No forks available for resolution.");
    }

    #[test]
    fn empty_data_uses_default() {
        let mut shell = Shell::new(Config::default());
        let out = shell.execute(Command::Mine { data: None }, answers(&[""])).unwrap();
        assert!(matches!(out, Outcome::Mined(b) if b.data == "Block Data"));
    }

    #[test]
    fn extend_errors_leave_state_alone() {
        let mut shell = Shell::new(Config::default());
        let err = shell.execute(Command::parse("3").unwrap(), no_prompt).unwrap_err();
        assert!(matches!(err, SimError::InvalidForkId { count: 0, .. }));

        shell.execute(Command::Fork, no_prompt).unwrap();
        let err = shell
            .execute(Command::parse("extend 5 x").unwrap(), no_prompt)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidForkId { id: 5, count: 1 }));
        assert_eq!(shell.blockchain().forks().lengths(), vec![1]);
    }

    #[test]
    fn status_and_dump() {
        let mut shell = Shell::new(Config::default());
        shell.execute(Command::Fork, no_prompt).unwrap();

        let out = shell.execute(Command::Status, no_prompt).unwrap();
        assert_eq!(
            out.to_string(),
            "length=1 difficulty=2 valid=true forks=1\n  fork 1: length 1"
        );

        let Outcome::Dump(json) = shell.execute(Command::Dump, no_prompt).unwrap() else {
            panic!("expected dump");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["fork_lengths"], serde_json::json!([1]));
    }

    #[test]
    fn show_lists_blocks() {
        let mut shell = Shell::new(Config::default());
        let out = shell.execute(Command::Show, no_prompt).unwrap();
        let text = out.to_string();
        assert!(text.starts_with("Current Blockchain:"));
        assert!(text.contains("data='Genesis Block'"));
    }
}
