// Command-line parsing for the `lineup` binary.

use lineup_core::Position;
use thiserror::Error;

pub const USAGE: &str = "\
usage: lineup <command> [args]

commands:
  players [POSITION] [--available] [--search TEXT]
                            list players, optionally one position, only
                            unplaced ones, or names containing TEXT
  formations                list built-in formations
  show                      working roster, power score and strategies
  formation NAME            switch formation (clears the roster)
  assign SLOT PLAYER_ID     put a player in a slot
  remove SLOT               clear a slot
  move FROM TO              move a player, swapping if TO is occupied
  autofill                  fill every slot with the best available player
  reset                     clear every slot
  save [NAME] [NOTES...]    save the working roster
  teams                     list saved teams
  load TEAM_ID              load a saved team into the working roster
  rename TEAM_ID NAME       rename a saved team
  delete TEAM_ID            delete a saved team
  compare [TEAM_ID...]      compare the working roster with saved teams";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("no command given")]
    Missing,

    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{value}` is not a valid {what}")]
    InvalidValue { what: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Players {
        position: Option<Position>,
        available_only: bool,
        search: Option<String>,
    },
    Formations,
    Show,
    Formation { name: String },
    Assign { slot_id: String, player_id: u32 },
    Remove { slot_id: String },
    Move { from: String, to: String },
    AutoFill,
    Reset,
    Save { name: Option<String>, notes: String },
    Teams,
    Load { team_id: i64 },
    Rename { team_id: i64, name: String },
    Delete { team_id: i64 },
    Compare { team_ids: Vec<i64> },
}

impl Command {
    /// Parse the arguments following the program name.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Command, CommandError> {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        let Some((&name, rest)) = args.split_first() else {
            return Err(CommandError::Missing);
        };

        let command = match name {
            "players" => players(rest)?,
            "formations" => no_args("formations", rest, Command::Formations)?,
            "show" => no_args("show", rest, Command::Show)?,
            "formation" => match rest {
                [name] => Command::Formation {
                    name: name.to_string(),
                },
                _ => return Err(arity("formation", "a formation NAME")),
            },
            "assign" => match rest {
                [slot, id] => Command::Assign {
                    slot_id: slot_id(slot),
                    player_id: number(id, "player id")?,
                },
                _ => return Err(arity("assign", "SLOT and PLAYER_ID")),
            },
            "remove" => match rest {
                [slot] => Command::Remove {
                    slot_id: slot_id(slot),
                },
                _ => return Err(arity("remove", "a SLOT")),
            },
            "move" => match rest {
                [from, to] => Command::Move {
                    from: slot_id(from),
                    to: slot_id(to),
                },
                _ => return Err(arity("move", "FROM and TO slots")),
            },
            "autofill" => no_args("autofill", rest, Command::AutoFill)?,
            "reset" => no_args("reset", rest, Command::Reset)?,
            "save" => match rest {
                [] => Command::Save {
                    name: None,
                    notes: String::new(),
                },
                [name, notes @ ..] => Command::Save {
                    name: Some(name.to_string()),
                    notes: notes.join(" "),
                },
            },
            "teams" => no_args("teams", rest, Command::Teams)?,
            "load" => match rest {
                [id] => Command::Load {
                    team_id: number(id, "team id")?,
                },
                _ => return Err(arity("load", "a TEAM_ID")),
            },
            "rename" => match rest {
                [id, name @ ..] if !name.is_empty() => Command::Rename {
                    team_id: number(id, "team id")?,
                    name: name.join(" "),
                },
                _ => return Err(arity("rename", "TEAM_ID and NAME")),
            },
            "delete" => match rest {
                [id] => Command::Delete {
                    team_id: number(id, "team id")?,
                },
                _ => return Err(arity("delete", "a TEAM_ID")),
            },
            "compare" => Command::Compare {
                team_ids: rest
                    .iter()
                    .map(|id| number::<i64>(id, "team id"))
                    .collect::<Result<_, _>>()?,
            },
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }

    /// Whether this command changes the working roster.
    pub fn mutates_roster(&self) -> bool {
        matches!(
            self,
            Command::Formation { .. }
                | Command::Assign { .. }
                | Command::Remove { .. }
                | Command::Move { .. }
                | Command::AutoFill
                | Command::Reset
                | Command::Load { .. }
        )
    }
}

/// `players [POSITION] [--available] [--search TEXT]`, flags in any order.
fn players(rest: &[&str]) -> Result<Command, CommandError> {
    const EXPECTED: &str = "[POSITION] [--available] [--search TEXT]";
    let mut position = None;
    let mut available_only = false;
    let mut search = None;

    let mut args = rest.iter();
    while let Some(&arg) = args.next() {
        match arg {
            "--available" => available_only = true,
            "--search" => match args.next() {
                Some(&text) => search = Some(text.to_string()),
                None => return Err(arity("players", EXPECTED)),
            },
            flag if flag.starts_with("--") => return Err(arity("players", EXPECTED)),
            _ if position.is_some() => return Err(arity("players", EXPECTED)),
            pos => {
                position = Some(Position::from_str_pos(pos).ok_or_else(|| {
                    CommandError::InvalidValue {
                        what: "position",
                        value: pos.to_string(),
                    }
                })?);
            }
        }
    }

    Ok(Command::Players {
        position,
        available_only,
        search,
    })
}

fn arity(command: &'static str, expected: &'static str) -> CommandError {
    CommandError::Arguments { command, expected }
}

fn no_args(name: &'static str, rest: &[&str], command: Command) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(arity(name, "no arguments"))
    }
}

/// Slot ids are stored upper-case ("CB1", "LM").
fn slot_id(arg: &str) -> String {
    arg.trim().to_ascii_uppercase()
}

fn number<T: std::str::FromStr>(arg: &str, what: &'static str) -> Result<T, CommandError> {
    arg.trim().parse().map_err(|_| CommandError::InvalidValue {
        what,
        value: arg.to_string(),
    })
}
