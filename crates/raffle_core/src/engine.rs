//! Raffle pool, draw algorithm and last-winner state.

use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{
    domain::{Employee, EmployeeId},
    error::RaffleError,
};
use tracing::{debug, info};

pub struct RaffleEngine {
    pool: Vec<Employee>,
    winner: Option<Employee>,
    drawing: bool,
    rng: StdRng,
}

impl Default for RaffleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RaffleEngine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            pool: Vec::new(),
            winner: None,
            drawing: false,
            rng,
        }
    }

    /// Pool entries in the order they were added.
    pub fn pool(&self) -> &[Employee] {
        &self.pool
    }

    pub fn winner(&self) -> Option<&Employee> {
        self.winner.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.pool.iter().any(|employee| &employee.id == id)
    }

    /// Roster entries not yet in the pool, in roster order.
    pub fn available_for_pool(&self, roster: &[Employee]) -> Vec<Employee> {
        roster
            .iter()
            .filter(|employee| !self.contains(&employee.id))
            .cloned()
            .collect()
    }

    /// Appends the roster entry with `id`. Returns `None` when the id is not
    /// in the roster or is already pooled.
    pub fn add_to_pool(
        &mut self,
        roster: &[Employee],
        id: &EmployeeId,
    ) -> Result<Option<Employee>, RaffleError> {
        if self.drawing {
            return Err(RaffleError::DrawInProgress);
        }
        if self.contains(id) {
            debug!(employee_id = %id, "employee already in pool");
            return Ok(None);
        }
        let Some(employee) = roster.iter().find(|employee| &employee.id == id) else {
            debug!(employee_id = %id, "employee not in roster; not pooled");
            return Ok(None);
        };

        self.pool.push(employee.clone());
        debug!(employee_id = %id, pool = self.pool.len(), "employee entered pool");
        Ok(Some(employee.clone()))
    }

    pub fn remove_from_pool(&mut self, id: &EmployeeId) -> Result<Option<Employee>, RaffleError> {
        if self.drawing {
            return Err(RaffleError::DrawInProgress);
        }
        Ok(self.take(id))
    }

    /// Keeps the pool consistent with the roster. Applies even mid-draw.
    pub fn on_roster_entry_deleted(&mut self, id: &EmployeeId) -> bool {
        self.take(id).is_some()
    }

    pub fn clear_pool(&mut self) {
        self.pool.clear();
    }

    fn take(&mut self, id: &EmployeeId) -> Option<Employee> {
        let position = self.pool.iter().position(|employee| &employee.id == id)?;
        Some(self.pool.remove(position))
    }

    /// Enters the drawing state and clears the previous winner. Returns the
    /// number of candidates. Rejected without any state change when the pool
    /// is empty or another draw is in flight.
    pub fn begin_draw(&mut self) -> Result<usize, RaffleError> {
        if self.drawing {
            return Err(RaffleError::DrawInProgress);
        }
        if self.pool.is_empty() {
            return Err(RaffleError::EmptyPool);
        }

        self.drawing = true;
        self.winner = None;
        info!(candidates = self.pool.len(), "draw started");
        Ok(self.pool.len())
    }

    /// Picks the winner uniformly from the pool and consumes the pool.
    /// Returns `None` when no draw is in flight or the pool was emptied by
    /// roster deletions in the meantime; the drawing state is left either way.
    pub fn complete_draw(&mut self) -> Option<Employee> {
        if !self.drawing {
            return None;
        }
        self.drawing = false;

        if self.pool.is_empty() {
            info!("draw abandoned; pool emptied while drawing");
            return None;
        }

        let index = self.rng.random_range(0..self.pool.len());
        let winner = self.pool.swap_remove(index);
        self.pool.clear();
        info!(employee_id = %winner.id, name = %winner.name, "winner drawn");
        self.winner = Some(winner.clone());
        Some(winner)
    }

    /// Leaves the drawing state without picking anyone. The pool is kept.
    pub fn abort_draw(&mut self) -> bool {
        let was_drawing = self.drawing;
        self.drawing = false;
        if was_drawing {
            info!(candidates = self.pool.len(), "draw aborted");
        }
        was_drawing
    }

    /// Synchronous draw with no display delay.
    pub fn draw(&mut self) -> Result<Employee, RaffleError> {
        self.begin_draw()?;
        self.complete_draw().ok_or(RaffleError::EmptyPool)
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
