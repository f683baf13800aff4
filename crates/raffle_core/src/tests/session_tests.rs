use std::time::Duration;

use super::*;
use crate::clock::ManualClock;
use storage::MemoryStore;

struct Harness {
    session: RaffleSession<MemoryStore, ManualClock>,
    clock: ManualClock,
    store: MemoryStore,
}

fn harness_with(timings: Timings) -> Harness {
    let store = MemoryStore::with_entry(crate::DEFAULT_STORAGE_KEY, "[]");
    let clock = ManualClock::new();
    let mut session = RaffleSession::with_parts(
        RosterStore::new(store.clone()),
        RaffleEngine::seeded(7),
        clock.clone(),
        timings,
    );
    session.initialize();
    Harness {
        session,
        clock,
        store,
    }
}

fn harness() -> Harness {
    harness_with(Timings::default())
}

fn add(h: &mut Harness, name: &str) -> EmployeeId {
    h.session.add_employee(name, None).expect("add");
    h.session
        .list_roster()
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.id.clone())
        .expect("added employee")
}

#[test]
fn add_employee_returns_success_notice() {
    let mut h = harness();
    let notice = h.session.add_employee("Alice", None).expect("add");

    assert_eq!(notice.title, "Employee Created");
    assert_eq!(notice.severity, Severity::Success);
    assert_eq!(h.session.list_roster().len(), 1);
}

#[test]
fn enter_and_withdraw_pool_produce_notices() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");

    let entered = h.session.enter_pool(&alice).expect("enter");
    assert_eq!(entered.title, "Employee Added");
    let again = h.session.enter_pool(&alice).expect("enter again");
    assert_eq!(again.title, "Employee Not Available");
    assert!(h.session.list_available_for_pool().is_empty());

    let withdrawn = h.session.withdraw_from_pool(&alice).expect("withdraw");
    assert_eq!(withdrawn.title, "Employee Removed from Pool");
    assert!(withdrawn.message.contains("Alice"));
    assert_eq!(h.session.list_available_for_pool().len(), 1);
}

#[test]
fn deleting_unknown_employee_is_a_warning() {
    let mut h = harness();
    let notice = h.session.delete_employee(&EmployeeId::from("ghost"));

    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.title, "Employee Not Found or Already Removed");
}

#[test]
fn draw_reveals_after_delay_and_consumes_pool() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");

    let started = h.session.draw().expect("draw");
    assert_eq!(started.title, "Drawing Winner...");
    assert!(h.session.is_draw_in_progress());
    assert!(h.session.current_winner().is_none());

    h.clock.advance(Duration::from_millis(2_000));
    assert!(h.session.tick().is_empty());
    assert!(h.session.is_draw_in_progress());

    h.clock.advance(Duration::from_millis(500));
    let notices = h.session.tick();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Winner Selected!");
    assert_eq!(h.session.current_winner().map(|e| &e.id), Some(&alice));
    assert!(h.session.list_pool().is_empty());
    assert!(!h.session.is_draw_in_progress());
    assert!(h.session.is_winner_announcement_visible());
    assert!(h.session.is_confetti_active());
    assert!(h.session.last_winner_card().is_none());
}

#[test]
fn announcement_and_confetti_close_on_schedule() {
    let mut h = harness();
    h.session.set_prize_name("  Gift Card ");
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");
    h.session.draw().expect("draw");

    h.clock.advance(Duration::from_millis(2_500));
    let notices = h.session.tick();
    assert!(notices[0].message.contains("They won: Gift Card."));

    h.clock.advance(Duration::from_millis(6_000));
    h.session.tick();
    assert!(!h.session.is_confetti_active());
    assert!(h.session.is_winner_announcement_visible());

    h.clock.advance(Duration::from_millis(1_000));
    h.session.tick();
    assert!(!h.session.is_winner_announcement_visible());

    let card = h.session.last_winner_card().expect("card");
    assert_eq!(card.winner.id, alice);
    assert_eq!(card.prize.as_deref(), Some("Gift Card"));
    assert_eq!(h.session.next_deadline(), None);
}

#[test]
fn second_draw_while_drawing_is_rejected() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");
    h.session.draw().expect("draw");

    assert_eq!(h.session.draw(), Err(RaffleError::DrawInProgress));
    assert_eq!(
        h.session.withdraw_from_pool(&alice),
        Err(RaffleError::DrawInProgress)
    );
}

#[test]
fn new_draw_cancels_stale_announcement_timer() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");
    let bob = add(&mut h, "Bob");

    h.session.enter_pool(&alice).expect("enter");
    h.session.draw().expect("first draw");
    h.clock.advance(Duration::from_millis(2_500));
    h.session.tick();
    assert!(h.session.is_winner_announcement_visible());

    h.session.enter_pool(&bob).expect("enter bob");
    h.clock.advance(Duration::from_millis(1_000));
    h.session.draw().expect("second draw");
    assert!(!h.session.is_winner_announcement_visible());

    // The first draw's hide timer would have fired at 9.5s.
    h.clock.advance(Duration::from_millis(2_500));
    h.session.tick();
    assert_eq!(h.session.current_winner().map(|e| &e.id), Some(&bob));
    h.clock.advance(Duration::from_millis(6_000));
    h.session.tick();
    assert!(
        h.session.is_winner_announcement_visible(),
        "stale hide timer must not close the newer announcement"
    );
}

#[test]
fn deleting_the_only_candidate_mid_draw_cancels_it() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");
    h.session.draw().expect("draw");

    h.session.delete_employee(&alice);
    h.clock.advance(Duration::from_millis(2_500));
    let notices = h.session.tick();

    assert_eq!(notices[0].title, "Draw Cancelled");
    assert!(!h.session.is_draw_in_progress());
    assert!(h.session.current_winner().is_none());
}

#[test]
fn winner_survives_deletion_from_roster() {
    let mut h = harness_with(Timings::immediate());
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");
    h.session.draw().expect("draw");

    h.session.delete_employee(&alice);

    assert_eq!(h.session.current_winner().map(|e| &e.id), Some(&alice));
}

#[test]
fn zero_delay_draw_resolves_immediately() {
    let mut h = harness_with(Timings::immediate());
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");

    let notice = h.session.draw().expect("draw");

    assert_eq!(notice.title, "Winner Selected!");
    assert!(!h.session.is_draw_in_progress());
    assert!(h.session.last_winner_card().is_some());
}

#[test]
fn shutdown_cancels_timers_and_abandons_draw() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");
    h.session.draw().expect("draw");

    h.session.shutdown();
    h.clock.advance(Duration::from_secs(30));

    assert!(h.session.tick().is_empty());
    assert!(!h.session.is_draw_in_progress());
    assert!(h.session.current_winner().is_none());
    assert_eq!(h.session.list_pool().len(), 1);
}

#[test]
fn confirm_delete_single_runs_staged_action() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");

    let Prompt::Confirm(pending) = h.session.request_delete(&alice) else {
        panic!("expected confirmation prompt");
    };
    assert_eq!(pending.title, "Confirm Deletion");
    assert!(pending.message.contains("Alice"));
    assert_eq!(h.session.list_roster().len(), 1);

    let notice = h.session.confirm().expect("confirm");
    assert_eq!(notice.title, "Employee Removed");
    assert!(h.session.list_roster().is_empty());
    assert!(h.session.list_pool().is_empty());
    assert!(h.session.pending_confirmation().is_none());
}

#[test]
fn request_delete_for_unknown_id_reports_immediately() {
    let mut h = harness();
    let prompt = h.session.request_delete(&EmployeeId::from("ghost"));

    assert!(matches!(prompt, Prompt::Notice(ref n) if n.severity == Severity::Warning));
    assert!(h.session.pending_confirmation().is_none());
}

#[test]
fn cancel_discards_staged_action() {
    let mut h = harness();
    add(&mut h, "Alice");
    h.session.request_delete_all();

    assert!(h.session.cancel());
    assert!(!h.session.cancel());
    assert_eq!(h.session.confirm(), Err(RaffleError::NothingToConfirm));
    assert_eq!(h.session.list_roster().len(), 1);
}

#[test]
fn delete_all_on_empty_roster_is_a_notice() {
    let mut h = harness();
    let prompt = h.session.request_delete_all();

    assert!(matches!(prompt, Prompt::Notice(ref n) if n.title == "No Employees"));
    assert!(h.session.pending_confirmation().is_none());
}

#[test]
fn confirmed_restore_defaults_clears_pool() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");
    h.session.enter_pool(&alice).expect("enter");

    assert!(matches!(
        h.session.request_restore_defaults(),
        Prompt::Confirm(_)
    ));
    let notice = h.session.confirm().expect("confirm");

    assert_eq!(notice.title, "Defaults Restored");
    assert!(h.session.list_pool().is_empty());
    assert_eq!(h.session.list_roster(), crate::defaults::default_roster().as_slice());
    assert_eq!(
        h.store.value(crate::DEFAULT_STORAGE_KEY),
        Some(h.session.roster().serialize().expect("serialize"))
    );
}

#[test]
fn confirmed_delete_all_empties_roster_and_pool() {
    let mut h = harness();
    let alice = add(&mut h, "Alice");
    add(&mut h, "Bob");
    h.session.enter_pool(&alice).expect("enter");

    h.session.request_delete_all();
    h.session.confirm().expect("confirm");

    assert!(h.session.list_roster().is_empty());
    assert!(h.session.list_pool().is_empty());
    assert_eq!(h.store.value(crate::DEFAULT_STORAGE_KEY).as_deref(), Some("[]"));
}

#[test]
fn prize_name_is_never_persisted() {
    let mut h = harness();
    h.session.set_prize_name("Extra Day Off");
    add(&mut h, "Alice");

    assert!(h
        .store
        .writes()
        .iter()
        .all(|(_, value)| !value.contains("Extra Day Off")));
    h.session.clear_prize_name();
    assert_eq!(h.session.prize_name(), "");
}
