//! Help text for each command.

const OVERVIEW: &str = "\
Commands:
  info                       show the game summary
  pin                        show the summary and keep it refreshed
  comp add|remove|up|down    complications, e.g. `comp add 6 Broken Arm`
  asset add|remove|up|down   assets, e.g. `asset add Rope 8`
  stress add|remove|up|down|clear   stress, e.g. `stress add Amy Mental 8`
  pool add|remove|clear|roll dice pools, e.g. `pool add doom 6 2d8`
  pp add|remove|clear        plot points, e.g. `pp add Amy 2`
  xp add|remove|clear        experience, e.g. `xp add Amy`
  roll                       roll dice, e.g. `roll 8 10 2d6`
  option                     show or set options (prefix, best)
  clean                      reset everything but options
  report                     dice statistics
Use `help <command>` for details.";

const TRAITS: &str = "\
comp and asset track named traits with a single die.
  add <die> <name>   new trait, or raise an existing one
  remove <name>      delete the trait
  up <name>          step up one size
  down <name>        step down one size; a d4 is removed
Synonyms: give/new for add, spend/delete for remove, stepup for up, stepdown/stepback for down.";

const STRESS: &str = "\
stress tracks named stress dice per character.
  add <character> [name] <die>   new stress, or raise existing stress
  remove <character> [name]      delete one kind of stress
  up <character> [name]          step up
  down <character> [name]        step down; a d4 is removed
  clear <character>              delete all of the character's stress
Without a name, stress is called General.";

const POOL: &str = "\
pool keeps named dice pools such as doom or crisis.
  add <pool> <dice>          add dice, creating the pool
  remove <pool> <dice>       take dice out
  clear <pool>               delete the pool
  roll <pool> [dice]         roll the pool plus any extra dice, which are not kept";

const RESOURCES: &str = "\
pp and xp count plot points and experience per character.
  add <name> [amount]        default amount is 1
  remove <name> [amount]     fails if the character has too few
  clear <name>               forget the character";

const ROLL: &str = "\
roll <dice> rolls loose dice, e.g. `roll 8 10 2d6`.
Ones are hitches. If every die is a hitch the roll is a botch.
Otherwise the best total and best effect are suggested unless `option best off`.";

const OPTION: &str = "\
option                 list options
option <key>           show one option
option <key> <value>   set an option
  prefix <text>        command prefix for this channel
  best on|off          suggest best total and effect when rolling";

const CLEAN: &str = "clean removes every trait, stress, pool and counter. Options are kept.";

/// Help for one command, or the overview.
pub fn help_text(topic: Option<&str>) -> &'static str {
    match topic {
        Some("comp" | "complication" | "asset") => TRAITS,
        Some("stress") => STRESS,
        Some("pool") => POOL,
        Some("pp" | "plot" | "xp") => RESOURCES,
        Some("roll" | "r") => ROLL,
        Some("option" | "options") => OPTION,
        Some("clean") => CLEAN,
        _ => OVERVIEW,
    }
}
