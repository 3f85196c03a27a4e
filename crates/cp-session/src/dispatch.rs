//! Running parsed commands against a game.

use chrono::{DateTime, Utc};
use cp_core::Store;
use cp_mechanics::Roller;

use crate::command::{Command, PoolAction, ResourceAction, StressAction, TraitAction};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::game::{GameState, Outcome};
use crate::help::help_text;

/// Option holding the command prefix.
pub const PREFIX_OPTION: &str = "prefix";
/// Option turning best total / best effect suggestions on or off.
pub const BEST_OPTION: &str = "best";

/// Everything a command may need besides the game itself.
pub struct Context<'a> {
    /// Where changes are written.
    pub store: &'a mut dyn Store,
    /// The shared roller.
    pub roller: &'a mut Roller,
    /// Host configuration.
    pub config: &'a SessionConfig,
    /// Time the command arrived.
    pub now: DateTime<Utc>,
}

/// The command prefix for a game.
pub fn prefix<'a>(game: &'a GameState, config: &'a SessionConfig) -> &'a str {
    game.option(PREFIX_OPTION)
        .unwrap_or(config.default_prefix.as_str())
}

/// Whether rolls in a game get best total / best effect suggestions.
pub fn suggest_best(game: &GameState, config: &SessionConfig) -> bool {
    match game.option(BEST_OPTION) {
        Some("on") => true,
        Some("off") => false,
        _ => config.suggest_best,
    }
}

/// Run a command against a game.
pub fn execute(
    game: &mut GameState,
    ctx: &mut Context<'_>,
    command: Command,
) -> SessionResult<Outcome> {
    match command {
        Command::Info => Ok(Outcome::unchanged(game.render())),
        Command::Pin => {
            game.pin(format!("pin-{}", ctx.now.timestamp()));
            Ok(Outcome::unchanged(game.render()))
        }
        Command::Trait { kind, action } => match action {
            TraitAction::Add { name, die } => game.add_trait(ctx.store, kind, &name, die),
            TraitAction::Remove { name } => game.remove_trait(ctx.store, kind, &name),
            TraitAction::StepUp { name } => game.step_up_trait(ctx.store, kind, &name),
            TraitAction::StepDown { name } => game.step_down_trait(ctx.store, kind, &name),
        },
        Command::Stress(action) => match action {
            StressAction::Add {
                character,
                name,
                die,
            } => game.add_stress(ctx.store, &character, &name, die),
            StressAction::Remove { character, name } => {
                game.remove_stress(ctx.store, &character, &name)
            }
            StressAction::StepUp { character, name } => {
                game.step_up_stress(ctx.store, &character, &name)
            }
            StressAction::StepDown { character, name } => {
                game.step_down_stress(ctx.store, &character, &name)
            }
            StressAction::Clear { character } => game.clear_stress(ctx.store, &character),
        },
        Command::Pool(action) => match action {
            PoolAction::Add { pool, dice } => game.add_to_pool(ctx.store, &pool, &dice),
            PoolAction::Remove { pool, dice } => game.remove_from_pool(ctx.store, &pool, &dice),
            PoolAction::Clear { pool } => game.clear_pool(ctx.store, &pool),
            PoolAction::Roll { pool, extra } => {
                let best = suggest_best(game, ctx.config);
                let roll = game.roll_pool(ctx.roller, &pool, &extra, best)?;
                Ok(Outcome::unchanged(roll.to_string()))
            }
        },
        Command::Resource { kind, action } => match action {
            ResourceAction::Add { name, quantity } => {
                game.add_resource(ctx.store, kind, &name, quantity)
            }
            ResourceAction::Remove { name, quantity } => {
                game.remove_resource(ctx.store, kind, &name, quantity)
            }
            ResourceAction::Clear { name } => game.clear_resource(ctx.store, kind, &name),
        },
        Command::Roll { dice } => {
            let best = suggest_best(game, ctx.config);
            let roll = game.roll_dice(ctx.roller, &dice, best)?;
            Ok(Outcome::unchanged(roll.to_string()))
        }
        Command::Option { key, value } => option(game, ctx, key, value),
        Command::Clean => game.clean(ctx.store),
        Command::Report => Ok(Outcome::unchanged(ctx.roller.report())),
        Command::Help { topic } => Ok(Outcome::unchanged(help_text(topic.as_deref()))),
    }
}

fn option(
    game: &mut GameState,
    ctx: &mut Context<'_>,
    key: Option<String>,
    value: Option<String>,
) -> SessionResult<Outcome> {
    let Some(key) = key else {
        let lines = [PREFIX_OPTION, BEST_OPTION]
            .iter()
            .map(|key| format!("{key}: {}", show_option(game, ctx.config, key)))
            .collect::<Vec<_>>();
        return Ok(Outcome::unchanged(lines.join("\n")));
    };
    if key != PREFIX_OPTION && key != BEST_OPTION {
        return Err(SessionError::UnknownInstruction {
            command: "option".to_string(),
            instruction: key,
        });
    }
    let Some(value) = value else {
        let shown = show_option(game, ctx.config, &key);
        return Ok(Outcome::unchanged(format!("{key}: {shown}")));
    };

    let value = if key == BEST_OPTION {
        match value.to_lowercase().as_str() {
            "on" | "true" | "yes" => "on".to_string(),
            "off" | "false" | "no" => "off".to_string(),
            _ => return Err(SessionError::Usage("best must be on or off.".to_string())),
        }
    } else {
        if value.split_whitespace().count() != 1 {
            return Err(SessionError::Usage(
                "prefix must be a single word without spaces.".to_string(),
            ));
        }
        value
    };
    game.set_option(ctx.store, &key, &value)
}

fn show_option(game: &GameState, config: &SessionConfig, key: &str) -> String {
    if key == PREFIX_OPTION {
        return prefix(game, config).to_string();
    }
    let shown = if suggest_best(game, config) { "on" } else { "off" };
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_command;
    use cp_core::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        roller: Roller,
        config: SessionConfig,
        game: GameState,
    }

    impl Fixture {
        fn new(faces: Vec<u32>) -> Self {
            let mut store = MemoryStore::new();
            let game = GameState::load_or_create(&mut store, 1, 1, Utc::now()).unwrap();
            Self {
                store,
                roller: Roller::scripted(faces),
                config: SessionConfig::default(),
                game,
            }
        }

        fn run(&mut self, input: &str) -> SessionResult<Outcome> {
            let command = parse_command(input)?;
            let mut ctx = Context {
                store: &mut self.store,
                roller: &mut self.roller,
                config: &self.config,
                now: Utc::now(),
            };
            execute(&mut self.game, &mut ctx, command)
        }
    }

    #[test]
    fn roll_with_suggestions() {
        let mut fx = Fixture::new(vec![4, 7, 2]);
        let out = fx.run("roll 6 8 10").unwrap();
        assert!(!out.summary_changed);
        assert_eq!(
            out.message,
            "D6 : 4\nD8 : 7\nD10 : 2\nBest Total: 11 (7 + 4) with Effect: D10"
        );
    }

    #[test]
    fn best_option_turns_suggestions_off() {
        let mut fx = Fixture::new(vec![4, 7]);
        fx.run("option best off").unwrap();
        let out = fx.run("roll 6 8").unwrap();
        assert_eq!(out.message, "D6 : 4\nD8 : 7");
    }

    #[test]
    fn botch_reported_without_suggestions() {
        let mut fx = Fixture::new(vec![1, 1]);
        fx.run("option best off").unwrap();
        let out = fx.run("roll 6 8").unwrap();
        assert!(out.message.ends_with("Botch"), "{}", out.message);
    }

    #[test]
    fn option_listing_and_validation() {
        let mut fx = Fixture::new(vec![1]);
        assert_eq!(fx.run("option").unwrap().message, "prefix: $\nbest: on");
        fx.run("option prefix !").unwrap();
        assert_eq!(fx.run("option prefix").unwrap().message, "prefix: !");
        assert!(matches!(fx.run("option best maybe"), Err(SessionError::Usage(_))));
        assert!(matches!(
            fx.run("option colour red"),
            Err(SessionError::UnknownInstruction { .. })
        ));
    }

    #[test]
    fn pin_remembers_handle() {
        let mut fx = Fixture::new(vec![1]);
        assert!(fx.game.pinned().is_none());
        fx.run("pin").unwrap();
        assert!(fx.game.pinned().is_some());
    }

    #[test]
    fn report_counts_rolls() {
        let mut fx = Fixture::new(vec![3]);
        fx.run("roll 4").unwrap();
        let out = fx.run("report").unwrap();
        assert!(out.message.starts_with("Dice rolled: 1"), "{}", out.message);
    }
}
