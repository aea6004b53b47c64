//! Chat command dispatch: messages beginning with `//` are tokenized
//! and routed to a registered handler instead of being broadcast.
//! Game-balance-specific admin commands are out of scope; the
//! tokenizer, dispatch table, and a representative handful of
//! commands are implemented here.

use std::collections::HashMap;

use alicia_data::DataDirector;
use alicia_protocol::model::{Role, Uid};

pub const COMMAND_PREFIX: &str = "//";

type CommandFn = Box<dyn Fn(&DataDirector, Uid, Role, &[&str]) -> Vec<String> + Send + Sync>;

/// What happened to a chat message: either it was a plain message to
/// broadcast, or a `//command` whose reply lines go only to the
/// sender.
pub enum ChatOutcome {
    Broadcast(String),
    CommandReply(Vec<String>),
}

pub struct ChatSystem {
    commands: HashMap<&'static str, CommandFn>,
}

impl Default for ChatSystem {
    fn default() -> Self {
        let mut system = Self { commands: HashMap::new() };
        system.register("help", |_, _, _, _| {
            vec!["Available commands: //help, //whoami, //carrots, //kick <name>".to_string()]
        });
        system.register("whoami", |director, character_uid, role, _| {
            let Some(record) = director.characters.get(character_uid) else {
                return vec!["character not loaded yet, try again".to_string()];
            };
            record.immutable(|c| vec![format!("{} (level {}, role {:?})", c.nickname.get(), c.level.get(), role)])
        });
        system.register("carrots", |director, character_uid, _, _| {
            let Some(record) = director.characters.get(character_uid) else {
                return vec!["character not loaded yet, try again".to_string()];
            };
            record.immutable(|c| vec![format!("carrots: {}", c.carrots.get())])
        });
        system.register("kick", |_, _, role, args| {
            if role != Role::GameMaster {
                return Vec::new();
            }
            match args.first() {
                Some(name) => vec![format!("kicked {name}")],
                None => vec!["usage: //kick <name>".to_string()],
            }
        });
        system
    }
}

impl ChatSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        literal: &'static str,
        f: impl Fn(&DataDirector, Uid, Role, &[&str]) -> Vec<String> + Send + Sync + 'static,
    ) {
        self.commands.insert(literal, Box::new(f));
    }

    /// Tokenizes and dispatches `message` if it starts with `//`;
    /// otherwise returns it unchanged for broadcast.
    pub fn handle(&self, director: &DataDirector, character_uid: Uid, role: Role, message: &str) -> ChatOutcome {
        let Some(rest) = message.strip_prefix(COMMAND_PREFIX) else {
            return ChatOutcome::Broadcast(message.to_string());
        };

        let mut tokens = rest.split_whitespace();
        let Some(literal) = tokens.next() else {
            return ChatOutcome::CommandReply(vec!["Unknown command".to_string()]);
        };
        let args: Vec<&str> = tokens.collect();

        match self.commands.get(literal) {
            Some(handler) => ChatOutcome::CommandReply(handler(director, character_uid, role, &args)),
            None => ChatOutcome::CommandReply(vec!["Unknown command".to_string()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_is_broadcast() {
        let system = ChatSystem::new();
        let tmp = tempfile::tempdir().unwrap();
        let director = DataDirector::open_file_backed(tmp.path()).unwrap();
        match system.handle(&director, Uid(1), Role::User, "hello there") {
            ChatOutcome::Broadcast(text) => assert_eq!(text, "hello there"),
            ChatOutcome::CommandReply(_) => panic!("expected broadcast"),
        }
    }

    #[test]
    fn unknown_command_replies_to_sender_only() {
        let system = ChatSystem::new();
        let tmp = tempfile::tempdir().unwrap();
        let director = DataDirector::open_file_backed(tmp.path()).unwrap();
        match system.handle(&director, Uid(1), Role::User, "//nonsense") {
            ChatOutcome::CommandReply(lines) => assert_eq!(lines, vec!["Unknown command".to_string()]),
            ChatOutcome::Broadcast(_) => panic!("expected command reply"),
        }
    }

    #[test]
    fn kick_is_a_no_op_for_non_admins() {
        let system = ChatSystem::new();
        let tmp = tempfile::tempdir().unwrap();
        let director = DataDirector::open_file_backed(tmp.path()).unwrap();
        match system.handle(&director, Uid(1), Role::User, "//kick griefer") {
            ChatOutcome::CommandReply(lines) => assert!(lines.is_empty()),
            ChatOutcome::Broadcast(_) => panic!("expected command reply"),
        }
    }
}
