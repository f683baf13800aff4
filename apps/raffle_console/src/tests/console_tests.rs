use std::time::Duration;

use super::*;
use raffle_core::{ManualClock, RaffleEngine, RosterStore, Timings, DEFAULT_STORAGE_KEY};
use storage::MemoryStore;

fn session() -> (RaffleSession<MemoryStore, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let mut session = RaffleSession::with_parts(
        RosterStore::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "[]")),
        RaffleEngine::seeded(1),
        clock.clone(),
        Timings::default(),
    );
    session.initialize();
    (session, clock)
}

fn run(session: &mut RaffleSession<MemoryStore, ManualClock>, line: &str) -> Vec<String> {
    let command = parse_command(line)
        .expect("parses")
        .expect("not blank");
    match execute(session, command) {
        Outcome::Continue(lines) => lines,
        Outcome::Quit => panic!("unexpected quit"),
    }
}

fn first_id(session: &RaffleSession<MemoryStore, ManualClock>) -> String {
    session.list_roster()[0].id.to_string()
}

#[test]
fn blank_lines_are_skipped() {
    assert_eq!(parse_command("   "), Ok(None));
}

#[test]
fn add_joins_multi_word_names() {
    assert_eq!(
        parse_command("add --leadership Mary Ann  Lee"),
        Ok(Some(ConsoleCommand::Add {
            leadership: true,
            name: vec!["Mary".into(), "Ann".into(), "Lee".into()],
        }))
    );
}

#[test]
fn unknown_commands_and_help_render_usage() {
    assert!(parse_command("shuffle").is_err());
    let help = parse_command("help").expect_err("help is rendered text");
    assert!(help.contains("restore-defaults"));
}

#[test]
fn quit_stops_the_loop() {
    let (mut session, _) = session();
    assert_eq!(execute(&mut session, ConsoleCommand::Quit), Outcome::Quit);
}

#[test]
fn add_and_list_show_the_new_employee() {
    let (mut session, _) = session();
    let added = run(&mut session, "add Alice Smith");
    assert_eq!(
        added,
        vec!["[ok] Employee Created: Alice Smith has been added to the system.".to_string()]
    );

    let listed = run(&mut session, "list");
    assert_eq!(listed.len(), 1);
    assert!(listed[0].ends_with("Alice Smith"));

    let duplicate = run(&mut session, "add alice smith");
    assert!(duplicate[0].starts_with("[!!] Employee Exists"), "{duplicate:?}");
    assert!(duplicate[0].ends_with("(conflict)"), "{duplicate:?}");
}

#[test]
fn pool_reports_participant_count() {
    let (mut session, _) = session();
    run(&mut session, "add Alice");
    let id = first_id(&session);
    run(&mut session, &format!("enter {id}"));

    let pool = run(&mut session, "pool");
    assert_eq!(pool[0], "Raffle Pool (1 participant)");
    assert_eq!(
        run(&mut session, "available"),
        vec!["All employees added or none available.".to_string()]
    );
}

#[test]
fn delete_waits_for_confirm() {
    let (mut session, _) = session();
    run(&mut session, "add Alice");
    let id = first_id(&session);

    let prompt = run(&mut session, &format!("delete {id}"));
    assert!(prompt[0].starts_with("Confirm Deletion"));
    assert_eq!(session.list_roster().len(), 1);

    let done = run(&mut session, "confirm");
    assert!(done[0].starts_with("[!!] Employee Removed"));
    assert!(session.list_roster().is_empty());
    assert_eq!(run(&mut session, "cancel"), vec!["Nothing to cancel.".to_string()]);
}

#[test]
fn confirm_without_pending_action_shows_its_code() {
    let (mut session, _) = session();
    assert_eq!(
        run(&mut session, "confirm"),
        vec!["[info] Nothing To Confirm: There is no pending action. (nothing_pending)".to_string()]
    );
}

#[test]
fn prize_without_text_clears_it() {
    let (mut session, _) = session();
    run(&mut session, "prize Gift Card");
    assert_eq!(session.prize_name(), "Gift Card");

    assert_eq!(run(&mut session, "prize"), vec!["Prize cleared.".to_string()]);
    assert_eq!(session.prize_name(), "");
}

#[test]
fn draw_on_empty_pool_prints_the_error() {
    let (mut session, _) = session();
    let lines = run(&mut session, "draw");
    assert_eq!(
        lines,
        vec!["[!!] Raffle Pool Empty: Please add employees to the raffle pool before drawing a winner. (empty_pool)".to_string()]
    );
}

#[test]
fn ticks_announce_then_show_winner_card() {
    let (mut session, clock) = session();
    run(&mut session, "add Alice");
    let id = first_id(&session);
    run(&mut session, &format!("enter {id}"));
    run(&mut session, "prize Mug");

    let started = run(&mut session, "draw");
    assert_eq!(started.last().map(String::as_str), Some("Picking a winner... Good luck!"));

    clock.advance(Duration::from_millis(2_500));
    let revealed = on_tick(&mut session);
    assert!(revealed.contains(&"*** Alice ***".to_string()), "{revealed:?}");
    assert!(revealed.contains(&"Congratulations! You've won: Mug!".to_string()));

    clock.advance(Duration::from_millis(7_000));
    let closed = on_tick(&mut session);
    assert_eq!(
        closed,
        vec![
            "The last raffle winner was... Alice".to_string(),
            "They won: Mug".to_string(),
        ]
    );
}

#[tokio::test]
async fn past_deadline_resolves_at_once() {
    let deadline = Instant::now();
    tokio::time::timeout(Duration::from_secs(1), wait_for_deadline(Some(deadline)))
        .await
        .expect("deadline already passed");
}

#[tokio::test]
async fn no_deadline_never_resolves() {
    let waited =
        tokio::time::timeout(Duration::from_millis(20), wait_for_deadline(None)).await;
    assert!(waited.is_err());
}
