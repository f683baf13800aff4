//! Collaborator surface for a rendering layer: queries, mutations that
//! produce notices, staged confirmations and the reveal timeline.

use std::time::Instant;

use shared::{
    domain::{Category, Employee, EmployeeId},
    error::RaffleError,
    notice::{Notice, Severity},
};
use storage::KeyValueStore;
use tracing::{debug, info};

use crate::{
    clock::{Clock, SystemClock},
    defaults::default_roster,
    engine::RaffleEngine,
    roster::{RemoveOutcome, RosterStore},
    timeline::{RevealTimeline, Timings, Transition},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationAction {
    DeleteSingle { id: EmployeeId, name: String },
    DeleteAll,
    RestoreDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub action: ConfirmationAction,
    pub title: String,
    pub message: String,
}

/// Result of staging a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Confirm(PendingConfirmation),
    Notice(Notice),
}

/// The last winner as displayed once the announcement has closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerCard {
    pub winner: Employee,
    pub prize: Option<String>,
}

pub struct RaffleSession<S, C = SystemClock> {
    roster: RosterStore<S>,
    engine: RaffleEngine,
    timeline: RevealTimeline,
    clock: C,
    prize_name: String,
    pending: Option<PendingConfirmation>,
}

impl<S: KeyValueStore> RaffleSession<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_parts(
            RosterStore::new(store),
            RaffleEngine::new(),
            SystemClock,
            Timings::default(),
        )
    }
}

impl<S: KeyValueStore, C: Clock> RaffleSession<S, C> {
    pub fn with_parts(
        roster: RosterStore<S>,
        engine: RaffleEngine,
        clock: C,
        timings: Timings,
    ) -> Self {
        Self {
            roster,
            engine,
            timeline: RevealTimeline::new(timings),
            clock,
            prize_name: String::new(),
            pending: None,
        }
    }

    pub fn initialize(&mut self) -> usize {
        self.roster.initialize().len()
    }

    pub fn is_loaded(&self) -> bool {
        self.roster.is_loaded()
    }

    pub fn roster(&self) -> &RosterStore<S> {
        &self.roster
    }

    pub fn engine(&self) -> &RaffleEngine {
        &self.engine
    }

    pub fn list_roster(&self) -> &[Employee] {
        self.roster.employees()
    }

    pub fn list_available_for_pool(&self) -> Vec<Employee> {
        self.engine.available_for_pool(self.roster.employees())
    }

    pub fn list_pool(&self) -> &[Employee] {
        self.engine.pool()
    }

    pub fn current_winner(&self) -> Option<&Employee> {
        self.engine.winner()
    }

    pub fn is_draw_in_progress(&self) -> bool {
        self.engine.is_drawing()
    }

    pub fn is_winner_announcement_visible(&self) -> bool {
        self.timeline.is_announcement_visible()
    }

    pub fn is_confetti_active(&self) -> bool {
        self.timeline.is_confetti_active()
    }

    /// The winner shown inline: only once the draw has finished and the
    /// announcement has closed.
    pub fn last_winner_card(&self) -> Option<WinnerCard> {
        if self.engine.is_drawing() || self.timeline.is_announcement_visible() {
            return None;
        }
        self.engine.winner().map(|winner| WinnerCard {
            winner: winner.clone(),
            prize: self.prize(),
        })
    }

    pub fn prize_name(&self) -> &str {
        &self.prize_name
    }

    pub fn set_prize_name(&mut self, prize: impl Into<String>) {
        self.prize_name = prize.into();
    }

    pub fn clear_prize_name(&mut self) {
        self.prize_name.clear();
    }

    fn prize(&self) -> Option<String> {
        let prize = self.prize_name.trim();
        (!prize.is_empty()).then(|| prize.to_string())
    }

    pub fn add_employee(
        &mut self,
        name: &str,
        category: Option<Category>,
    ) -> Result<Notice, RaffleError> {
        let employee = self.roster.add(name, category)?;
        Ok(Notice::new(
            "Employee Created",
            format!("{} has been added to the system.", employee.name),
            Severity::Success,
        ))
    }

    pub fn enter_pool(&mut self, id: &EmployeeId) -> Result<Notice, RaffleError> {
        match self.engine.add_to_pool(self.roster.employees(), id)? {
            Some(employee) => Ok(Notice::info(
                "Employee Added",
                format!("{} has been added to the raffle.", employee.name),
            )),
            None => Ok(Notice::info(
                "Employee Not Available",
                format!("Employee with ID {id} is unknown or already in the raffle pool."),
            )),
        }
    }

    pub fn withdraw_from_pool(&mut self, id: &EmployeeId) -> Result<Notice, RaffleError> {
        match self.engine.remove_from_pool(id)? {
            Some(employee) => Ok(Notice::info(
                "Employee Removed from Pool",
                format!("{} has been removed from the raffle pool.", employee.name),
            )),
            None => Ok(Notice::info(
                "Not In Pool",
                format!("Employee with ID {id} is not in the raffle pool."),
            )),
        }
    }

    /// Deletes an employee system-wide, pulling it out of the pool too.
    pub fn delete_employee(&mut self, id: &EmployeeId) -> Notice {
        match self.roster.remove(id) {
            RemoveOutcome::Removed(employee) => {
                self.engine.on_roster_entry_deleted(&employee.id);
                Notice::new(
                    "Employee Removed",
                    format!(
                        "{} has been removed from the system and the raffle pool.",
                        employee.name
                    ),
                    Severity::Destructive,
                )
            }
            RemoveOutcome::NotFound(id) => Notice::new(
                "Employee Not Found or Already Removed",
                format!("Employee with ID {id} could not be removed or was already gone."),
                Severity::Warning,
            ),
        }
    }

    pub fn delete_all(&mut self) -> Notice {
        self.roster.remove_all();
        self.engine.clear_pool();
        Notice::new(
            "All Employees Removed",
            "All employees have been removed from the system and the raffle pool.",
            Severity::Destructive,
        )
    }

    pub fn restore_defaults(&mut self) -> Notice {
        self.roster.restore_defaults();
        self.engine.clear_pool();
        Notice::info(
            "Defaults Restored",
            "The employee list has been restored to the default set. The raffle pool has been cleared.",
        )
    }

    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn request_delete(&mut self, id: &EmployeeId) -> Prompt {
        let Some(name) = self.roster.get(id).map(|employee| employee.name.clone()) else {
            return Prompt::Notice(self.delete_employee(id));
        };
        self.stage(PendingConfirmation {
            title: "Confirm Deletion".to_string(),
            message: format!(
                "Are you sure you want to permanently remove {name} from the system? This action cannot be undone."
            ),
            action: ConfirmationAction::DeleteSingle {
                id: id.clone(),
                name,
            },
        })
    }

    pub fn request_delete_all(&mut self) -> Prompt {
        if self.roster.is_empty() {
            return Prompt::Notice(Notice::info(
                "No Employees",
                "There are no employees in the system to delete.",
            ));
        }
        self.stage(PendingConfirmation {
            action: ConfirmationAction::DeleteAll,
            title: "Confirm Delete All".to_string(),
            message: "Are you sure you want to permanently remove ALL employees from the system? This action cannot be undone.".to_string(),
        })
    }

    pub fn request_restore_defaults(&mut self) -> Prompt {
        if default_roster().is_empty() {
            return Prompt::Notice(Notice::info(
                "No Default Employees",
                "There is no default employee list configured.",
            ));
        }
        self.stage(PendingConfirmation {
            action: ConfirmationAction::RestoreDefaults,
            title: "Confirm Restore Defaults".to_string(),
            message: "Are you sure you want to replace all current employees with the default list? This action cannot be undone and will also clear the current raffle pool.".to_string(),
        })
    }

    fn stage(&mut self, pending: PendingConfirmation) -> Prompt {
        debug!(action = ?pending.action, "confirmation staged");
        self.pending = Some(pending.clone());
        Prompt::Confirm(pending)
    }

    pub fn confirm(&mut self) -> Result<Notice, RaffleError> {
        let pending = self.pending.take().ok_or(RaffleError::NothingToConfirm)?;
        info!(action = ?pending.action, "confirmed");
        Ok(match pending.action {
            ConfirmationAction::DeleteSingle { id, .. } => self.delete_employee(&id),
            ConfirmationAction::DeleteAll => self.delete_all(),
            ConfirmationAction::RestoreDefaults => self.restore_defaults(),
        })
    }

    /// Discards the staged action; returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Starts a draw. The winner is revealed by a later `tick` once the
    /// configured delay has elapsed, or immediately when the delay is zero.
    pub fn draw(&mut self) -> Result<Notice, RaffleError> {
        self.engine.begin_draw()?;
        self.timeline.start_draw(self.clock.now());
        let started = Notice::info(
            "Drawing Winner...",
            "Get ready to find out who the lucky employee is!",
        );

        if self.timeline.timings().draw_delay.is_zero() {
            if let Some(revealed) = self.tick().into_iter().next() {
                return Ok(revealed);
            }
        }
        Ok(started)
    }

    /// Applies every transition that is due, returning the notices they
    /// produce. Call on each frame or when `next_deadline` passes.
    pub fn tick(&mut self) -> Vec<Notice> {
        let now = self.clock.now();
        let mut notices = Vec::new();
        while let Some((at, transition)) = self.timeline.next_due(now) {
            if transition != Transition::Reveal {
                debug!(?transition, "display transition");
                continue;
            }
            match self.engine.complete_draw() {
                Some(winner) => {
                    self.timeline.reveal(at);
                    notices.push(self.winner_notice(&winner));
                }
                None => notices.push(Notice::new(
                    "Draw Cancelled",
                    "The raffle pool was emptied before a winner could be drawn.",
                    Severity::Warning,
                )),
            }
        }
        notices
    }

    fn winner_notice(&self, winner: &Employee) -> Notice {
        let prize = self
            .prize()
            .map(|prize| format!(" They won: {prize}."))
            .unwrap_or_default();
        Notice::new(
            "Winner Selected!",
            format!(
                "Congratulations to {}!{prize} The raffle pool has been cleared.",
                winner.name
            ),
            Severity::Success,
        )
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timeline.next_deadline()
    }

    /// Tears down pending timers. A draw still waiting for its reveal is
    /// abandoned with its pool intact rather than completed by a stale timer.
    pub fn shutdown(&mut self) {
        if self.timeline.has_pending() {
            info!("cancelling pending reveal timers");
        }
        self.timeline.cancel_all();
        self.engine.abort_draw();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
