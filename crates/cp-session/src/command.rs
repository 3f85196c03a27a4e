//! Command parsing for chat input.

use cp_mechanics::dice::looks_like_die;
use cp_mechanics::{Die, parse_dice, parse_single_die};

use crate::error::{SessionError, SessionResult};
use crate::game::{GENERAL_STRESS, ResourceKind, TraitKind};

/// What to do with a complication or asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitAction {
    /// Add the trait, raising it if it exists.
    Add {
        /// Trait name.
        name: String,
        /// Its die.
        die: Die,
    },
    /// Remove the trait.
    Remove {
        /// Trait name.
        name: String,
    },
    /// Step the trait up.
    StepUp {
        /// Trait name.
        name: String,
    },
    /// Step the trait down.
    StepDown {
        /// Trait name.
        name: String,
    },
}

/// What to do with a character's stress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StressAction {
    /// Give stress, raising it if the character has that kind already.
    Add {
        /// Character.
        character: String,
        /// Stress kind.
        name: String,
        /// Its die.
        die: Die,
    },
    /// Remove one kind of stress.
    Remove {
        /// Character.
        character: String,
        /// Stress kind.
        name: String,
    },
    /// Step a kind of stress up.
    StepUp {
        /// Character.
        character: String,
        /// Stress kind.
        name: String,
    },
    /// Step a kind of stress down.
    StepDown {
        /// Character.
        character: String,
        /// Stress kind.
        name: String,
    },
    /// Remove all of a character's stress.
    Clear {
        /// Character.
        character: String,
    },
}

/// What to do with a dice pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolAction {
    /// Add dice, creating the pool if needed.
    Add {
        /// Pool name.
        pool: String,
        /// Dice to add.
        dice: Vec<Die>,
    },
    /// Remove dice.
    Remove {
        /// Pool name.
        pool: String,
        /// Dice to remove.
        dice: Vec<Die>,
    },
    /// Delete the pool.
    Clear {
        /// Pool name.
        pool: String,
    },
    /// Roll the pool with optional extra dice.
    Roll {
        /// Pool name.
        pool: String,
        /// Dice rolled along with the pool but not added to it.
        extra: Vec<Die>,
    },
}

/// What to do with a counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAction {
    /// Add to the counter.
    Add {
        /// Holder.
        name: String,
        /// Amount.
        quantity: u32,
    },
    /// Take from the counter.
    Remove {
        /// Holder.
        name: String,
        /// Amount.
        quantity: u32,
    },
    /// Drop the counter.
    Clear {
        /// Holder.
        name: String,
    },
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the game summary.
    Info,
    /// Show the summary and keep it refreshed.
    Pin,
    /// Change complications or assets.
    Trait {
        /// Which collection.
        kind: TraitKind,
        /// What to do.
        action: TraitAction,
    },
    /// Change stress.
    Stress(StressAction),
    /// Change or roll a dice pool.
    Pool(PoolAction),
    /// Change plot points or experience.
    Resource {
        /// Which counters.
        kind: ResourceKind,
        /// What to do.
        action: ResourceAction,
    },
    /// Roll loose dice.
    Roll {
        /// Dice to roll.
        dice: Vec<Die>,
    },
    /// Show or set game options.
    Option {
        /// Option name; every option when `None`.
        key: Option<String>,
        /// New value; show the current value when `None`.
        value: Option<String>,
    },
    /// Reset the game.
    Clean,
    /// Show roller statistics.
    Report,
    /// Show help.
    Help {
        /// Optional command to explain.
        topic: Option<String>,
    },
}

const INFO_COMMANDS: &[&str] = &["info", "summary"];
const PIN_COMMANDS: &[&str] = &["pin"];
const COMP_COMMANDS: &[&str] = &["comp", "complication"];
const ASSET_COMMANDS: &[&str] = &["asset"];
const STRESS_COMMANDS: &[&str] = &["stress"];
const POOL_COMMANDS: &[&str] = &["pool"];
const PP_COMMANDS: &[&str] = &["pp", "plot"];
const XP_COMMANDS: &[&str] = &["xp"];
const ROLL_COMMANDS: &[&str] = &["roll", "r"];
const OPTION_COMMANDS: &[&str] = &["option", "options"];
const CLEAN_COMMANDS: &[&str] = &["clean"];
const REPORT_COMMANDS: &[&str] = &["report"];
const HELP_COMMANDS: &[&str] = &["help", "?"];

/// Instruction synonyms shared by every command.
const ADD_VERBS: &[&str] = &["add", "give", "new"];
const REMOVE_VERBS: &[&str] = &["remove", "spend", "delete", "del"];
const UP_VERBS: &[&str] = &["up", "stepup"];
const DOWN_VERBS: &[&str] = &["down", "stepdown", "stepback"];
const CLEAR_VERBS: &[&str] = &["clear"];
const ROLL_VERBS: &[&str] = &["roll"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Add,
    Remove,
    Up,
    Down,
    Clear,
    Roll,
}

impl Verb {
    fn parse(word: &str) -> Option<Self> {
        let word = word.to_lowercase();
        let table = [
            (ADD_VERBS, Self::Add),
            (REMOVE_VERBS, Self::Remove),
            (UP_VERBS, Self::Up),
            (DOWN_VERBS, Self::Down),
            (CLEAR_VERBS, Self::Clear),
            (ROLL_VERBS, Self::Roll),
        ];
        table
            .iter()
            .find(|(verbs, _)| verbs.contains(&word.as_str()))
            .map(|(_, verb)| *verb)
    }
}

/// Parse one line of input, already stripped of its prefix.
pub fn parse_command(input: &str) -> SessionResult<Command> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let Some(first) = words.first() else {
        return Err(usage("Type a command, or `help` for a list."));
    };
    let command = first.to_lowercase();
    let command = command.as_str();
    let rest = &words[1..];

    if INFO_COMMANDS.contains(&command) {
        return Ok(Command::Info);
    }
    if PIN_COMMANDS.contains(&command) {
        return Ok(Command::Pin);
    }
    if COMP_COMMANDS.contains(&command) {
        return parse_trait(TraitKind::Complication, "comp", rest);
    }
    if ASSET_COMMANDS.contains(&command) {
        return parse_trait(TraitKind::Asset, "asset", rest);
    }
    if STRESS_COMMANDS.contains(&command) {
        return parse_stress(rest);
    }
    if POOL_COMMANDS.contains(&command) {
        return parse_pool(rest);
    }
    if PP_COMMANDS.contains(&command) {
        return parse_resource(ResourceKind::PlotPoints, "pp", rest);
    }
    if XP_COMMANDS.contains(&command) {
        return parse_resource(ResourceKind::Xp, "xp", rest);
    }
    if ROLL_COMMANDS.contains(&command) {
        return parse_roll(rest);
    }
    if OPTION_COMMANDS.contains(&command) {
        return Ok(parse_option(rest));
    }
    if CLEAN_COMMANDS.contains(&command) {
        return Ok(Command::Clean);
    }
    if REPORT_COMMANDS.contains(&command) {
        return Ok(Command::Report);
    }
    if HELP_COMMANDS.contains(&command) {
        let topic = (!rest.is_empty()).then(|| rest.join(" ").to_lowercase());
        return Ok(Command::Help { topic });
    }

    Err(SessionError::UnknownCommand(first.to_string()))
}

fn parse_trait(kind: TraitKind, command: &str, rest: &[&str]) -> SessionResult<Command> {
    let (verb, args) = split_verb(command, rest)?;
    let action = match verb {
        Verb::Add => {
            let (die, name) = die_at_either_end(args).ok_or_else(|| {
                usage(format!(
                    "Give a die and a name, e.g. `{command} add 6 Broken Arm`."
                ))
            })?;
            TraitAction::Add {
                name: required_name(name, command)?,
                die: parse_single_die(die)?,
            }
        }
        Verb::Remove => TraitAction::Remove {
            name: required_name(args, command)?,
        },
        Verb::Up => TraitAction::StepUp {
            name: required_name(args, command)?,
        },
        Verb::Down => TraitAction::StepDown {
            name: required_name(args, command)?,
        },
        Verb::Clear | Verb::Roll => return Err(unknown_instruction(command, rest)),
    };
    Ok(Command::Trait { kind, action })
}

fn parse_stress(rest: &[&str]) -> SessionResult<Command> {
    const COMMAND: &str = "stress";
    let (verb, args) = split_verb(COMMAND, rest)?;
    let Some((character, args)) = args.split_first() else {
        return Err(usage("Name the character, e.g. `stress add Amy Mental 8`."));
    };
    let character = character.to_string();
    let action = match verb {
        Verb::Add => {
            let Some((die, name)) = args.split_last() else {
                return Err(usage("Give the stress a die, e.g. `stress add Amy Mental 8`."));
            };
            StressAction::Add {
                character,
                name: stress_name(name),
                die: parse_single_die(die)?,
            }
        }
        Verb::Remove => StressAction::Remove {
            character,
            name: stress_name(args),
        },
        Verb::Up => StressAction::StepUp {
            character,
            name: stress_name(args),
        },
        Verb::Down => StressAction::StepDown {
            character,
            name: stress_name(args),
        },
        Verb::Clear => StressAction::Clear { character },
        Verb::Roll => return Err(unknown_instruction(COMMAND, rest)),
    };
    Ok(Command::Stress(action))
}

fn parse_pool(rest: &[&str]) -> SessionResult<Command> {
    const COMMAND: &str = "pool";
    let (verb, args) = split_verb(COMMAND, rest)?;
    let Some((pool, dice)) = args.split_first() else {
        return Err(usage("Name the pool, e.g. `pool add doom 6 8`."));
    };
    let pool = pool.to_string();
    let action = match verb {
        Verb::Add => PoolAction::Add {
            pool,
            dice: required_dice(dice)?,
        },
        Verb::Remove => PoolAction::Remove {
            pool,
            dice: required_dice(dice)?,
        },
        Verb::Clear => PoolAction::Clear { pool },
        Verb::Roll => PoolAction::Roll {
            pool,
            extra: parse_dice(dice)?,
        },
        Verb::Up | Verb::Down => return Err(unknown_instruction(COMMAND, rest)),
    };
    Ok(Command::Pool(action))
}

fn parse_resource(kind: ResourceKind, command: &str, rest: &[&str]) -> SessionResult<Command> {
    let (verb, args) = split_verb(command, rest)?;
    let (name, quantity) = match args.split_last() {
        Some((last, name)) if !name.is_empty() => match last.parse::<u32>() {
            Ok(quantity) => (name, quantity),
            Err(_) => (args, 1),
        },
        _ => (args, 1),
    };
    let name = required_name(name, command)?;
    let action = match verb {
        Verb::Add => ResourceAction::Add { name, quantity },
        Verb::Remove => ResourceAction::Remove { name, quantity },
        Verb::Clear => ResourceAction::Clear { name },
        Verb::Up | Verb::Down | Verb::Roll => return Err(unknown_instruction(command, rest)),
    };
    Ok(Command::Resource { kind, action })
}

fn parse_roll(rest: &[&str]) -> SessionResult<Command> {
    Ok(Command::Roll {
        dice: required_dice(rest)?,
    })
}

fn parse_option(rest: &[&str]) -> Command {
    match rest {
        [] => Command::Option {
            key: None,
            value: None,
        },
        [key] => Command::Option {
            key: Some(key.to_lowercase()),
            value: None,
        },
        [key, value @ ..] => Command::Option {
            key: Some(key.to_lowercase()),
            value: Some(value.join(" ")),
        },
    }
}

fn split_verb<'a>(command: &str, rest: &'a [&'a str]) -> SessionResult<(Verb, &'a [&'a str])> {
    let Some((word, args)) = rest.split_first() else {
        return Err(usage(format!(
            "Tell {command} what to do, e.g. `{command} add`. See `help {command}`."
        )));
    };
    match Verb::parse(word) {
        Some(verb) => Ok((verb, args)),
        None => Err(unknown_instruction(command, rest)),
    }
}

/// Split `6 Broken Arm` or `Broken Arm 6` into the die and the name.
fn die_at_either_end<'a>(args: &'a [&'a str]) -> Option<(&'a str, &'a [&'a str])> {
    let (first, tail) = args.split_first()?;
    if looks_like_die(first) {
        return Some((*first, tail));
    }
    let (last, head) = args.split_last()?;
    looks_like_die(last).then_some((*last, head))
}

fn required_name(words: &[&str], command: &str) -> SessionResult<String> {
    if words.is_empty() {
        return Err(usage(format!("{command} needs a name.")));
    }
    Ok(words.join(" "))
}

fn required_dice(words: &[&str]) -> SessionResult<Vec<Die>> {
    if words.is_empty() {
        return Err(usage("Give at least one die, e.g. `6 8 2d10`."));
    }
    Ok(parse_dice(words)?)
}

fn stress_name(words: &[&str]) -> String {
    if words.is_empty() {
        GENERAL_STRESS.to_string()
    } else {
        words.join(" ")
    }
}

fn usage(message: impl Into<String>) -> SessionError {
    SessionError::Usage(message.into())
}

fn unknown_instruction(command: &str, rest: &[&str]) -> SessionError {
    SessionError::UnknownInstruction {
        command: command.to_string(),
        instruction: rest.first().copied().unwrap_or_default().to_string(),
    }
}
