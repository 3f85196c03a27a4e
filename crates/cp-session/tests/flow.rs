//! Full command flows against an in-memory store.

use chrono::{Duration, Utc};
use cp_core::{MemoryStore, Store};
use cp_mechanics::{ErrorKind, Roller};
use cp_session::{Reply, Session, SessionConfig, SessionResult};

fn session(faces: Vec<u32>) -> Session<MemoryStore> {
    Session::with_roller(
        MemoryStore::new(),
        SessionConfig::default(),
        Roller::scripted(faces),
    )
}

fn say(s: &mut Session<MemoryStore>, input: &str) -> String {
    match s.handle(7, 42, input, Utc::now()) {
        Ok(reply) => reply.text,
        Err(e) => e.to_string(),
    }
}

#[test]
fn pool_roll_reports_both_candidates() {
    let mut s = session(vec![5, 7, 2]);
    say(&mut s, "pool add doom 6 2d8");
    let out = say(&mut s, "pool roll doom");
    assert_eq!(
        out,
        "D6 : 5\nD8 : 7, 2\n\
         Best Total: 12 (7 + 5) with Effect: D8 | Best Effect: D8 with Total: 7 (5 + 2)"
    );
}

#[test]
fn all_hitches_is_a_botch() {
    let mut s = session(vec![1]);
    say(&mut s, "pool add crisis 6 8");
    let out = say(&mut s, "pool roll crisis");
    assert_eq!(out, "D6 : **(1)**\nD8 : **(1)**\nBotch");
}

#[test]
fn pool_roll_extras_are_not_kept() {
    let mut s = session(vec![3, 4, 5]);
    say(&mut s, "pool add doom 6");
    say(&mut s, "pool roll doom 8 10");
    let info = say(&mut s, "info");
    assert_eq!(info, "**Dice Pools**\ndoom: D6");
}

#[test]
fn pool_remove_errors() {
    let mut s = session(vec![1]);
    say(&mut s, "pool add doom 2d6");
    assert_eq!(say(&mut s, "pool remove doom 8"), "the doom pool has no D8 dice");
    assert_eq!(say(&mut s, "pool remove doom 3d6"), "the doom pool only has 2 D6");
    assert_eq!(say(&mut s, "pool remove doom 2d6"), "doom pool: empty");
    assert_eq!(say(&mut s, "pool roll nowhere"), "there is no pool named nowhere");
}

#[test]
fn traits_combine_and_step() {
    let mut s = session(vec![1]);
    assert_eq!(say(&mut s, "comp add 6 Hurt"), "New complication: D6 Hurt");
    assert_eq!(say(&mut s, "comp add 6 Hurt"), "Raised complication: D8 Hurt");
    assert_eq!(say(&mut s, "comp add 10 Hurt"), "Raised complication: D10 Hurt");
    assert_eq!(say(&mut s, "comp stepback Hurt"), "Stepped down complication: D8 Hurt");
    assert_eq!(say(&mut s, "comp add d4 hurt"), "New complication: D4 hurt");
    assert_eq!(
        say(&mut s, "comp down hurt"),
        "Stepped down and removed complication: hurt"
    );
    assert_eq!(say(&mut s, "info"), "**Complications**\nD8 Hurt");
}

#[test]
fn stress_flow() {
    let mut s = session(vec![1]);
    assert_eq!(say(&mut s, "stress add Amy 8"), "New stress for Amy: D8 General");
    assert_eq!(say(&mut s, "info"), "**Stress**\nAmy: D8");
    say(&mut s, "stress add Amy Mental 6");
    assert_eq!(say(&mut s, "info"), "**Stress**\nAmy: General D8, Mental D6");
    assert_eq!(say(&mut s, "stress up Ben"), "Ben has no stress");
    assert_eq!(say(&mut s, "stress clear Amy"), "Cleared all stress for Amy.");
    assert_eq!(say(&mut s, "info"), "There's nothing here yet.");
}

#[test]
fn resources_flow() {
    let mut s = session(vec![1]);
    assert_eq!(say(&mut s, "pp add Amy 2"), "Amy now has 2 plot points");
    assert_eq!(say(&mut s, "pp spend Amy 3"), "Amy only has 2 plot points");
    assert_eq!(say(&mut s, "xp add Amy"), "Amy now has 1 xp");
    assert_eq!(say(&mut s, "xp clear Ben"), "Ben has no xp");
    assert_eq!(
        say(&mut s, "info"),
        "**Plot Points**\nAmy: 2\n\n**Experience**\nAmy: 1"
    );
}

fn kind(result: SessionResult<Reply>) -> ErrorKind {
    result.unwrap_err().kind()
}

#[test]
fn error_kinds_at_the_boundary() {
    let mut s = session(vec![1]);
    let now = Utc::now();
    assert_eq!(kind(s.handle(1, 1, "roll 7", now)), ErrorKind::Validation);
    assert_eq!(
        kind(s.handle(1, 1, "roll 4000000000d4", now)),
        ErrorKind::Validation
    );
    assert_eq!(
        kind(s.handle(1, 1, "pool add doom 4294967295d6", now)),
        ErrorKind::Validation
    );
    assert_eq!(kind(s.handle(1, 1, "asset up Rope", now)), ErrorKind::NotFound);
    assert_eq!(
        kind(s.handle(1, 1, "pool fly doom", now)),
        ErrorKind::UnknownInstruction
    );
    s.handle(1, 1, "xp add Amy", now).unwrap();
    assert_eq!(
        kind(s.handle(1, 1, "xp remove Amy 5", now)),
        ErrorKind::InsufficientQuantity
    );
}

#[test]
fn clean_twice_keeps_game_row() {
    let mut s = session(vec![1]);
    say(&mut s, "asset add 8 Rope");
    say(&mut s, "pool add doom 6");
    say(&mut s, "stress add Amy 6");
    assert_eq!(say(&mut s, "clean"), "Game information has been cleaned.");
    assert_eq!(say(&mut s, "clean"), "Game information has been cleaned.");
    assert_eq!(say(&mut s, "info"), "There's nothing here yet.");

    let game = s.store().game_by_channel(7, 42).unwrap().unwrap();
    assert!(s.store().collections_of(game.id).unwrap().is_empty());
}

#[test]
fn report_after_rolls() {
    let mut s = session(vec![2, 4]);
    say(&mut s, "roll 4 4");
    let out = say(&mut s, "report");
    assert_eq!(out, "Dice rolled: 2\nD4 (2): 1: 0.0%, 2: 50.0%, 3: 0.0%, 4: 50.0%");
}

#[test]
fn purge_after_retention_window() {
    let mut s = session(vec![1]);
    let start = Utc::now();
    s.handle(1, 1, "asset add 6 Rope", start).unwrap();
    s.handle(1, 2, "asset add 6 Rope", start + Duration::days(100)).unwrap();
    s.handle(1, 3, "info", start + Duration::days(200)).unwrap();

    assert!(s.store().game_by_channel(1, 1).unwrap().is_none());
    assert!(s.store().game_by_channel(1, 2).unwrap().is_some());
    let reply = s.handle(1, 1, "info", start + Duration::days(200)).unwrap();
    assert_eq!(reply.text, "There's nothing here yet.");
}
