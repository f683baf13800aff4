//! Line commands and text rendering for the terminal front-end.

use clap::{Parser, Subcommand};
use raffle_core::{Clock, Prompt, RaffleSession};
use shared::{
    domain::{Category, Employee, EmployeeId},
    error::RaffleError,
    notice::{Notice, Severity},
};
use storage::KeyValueStore;
use tokio::time::{sleep_until, Instant};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Show every employee, sorted by name
    List,
    /// Show employees that can still enter the pool
    Available,
    /// Show the raffle pool in entry order
    Pool,
    /// Create an employee
    Add {
        #[arg(long)]
        leadership: bool,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Put an employee into the raffle pool
    Enter { id: String },
    /// Take an employee out of the raffle pool
    Withdraw { id: String },
    /// Delete an employee from the system (asks for confirmation)
    Delete { id: String },
    /// Delete every employee (asks for confirmation)
    DeleteAll,
    /// Replace the roster with the default list (asks for confirmation)
    RestoreDefaults,
    /// Run the pending destructive action
    Confirm,
    /// Drop the pending destructive action
    Cancel,
    /// Set the prize label; no text clears it
    Prize { text: Vec<String> },
    /// Draw a winner from the pool
    Draw,
    /// Show draw and winner state
    Status,
    /// Leave the console
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(Vec<String>),
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`; parse failures and
/// `help` come back as rendered text in `Err`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    Line::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|err| err.render().to_string())
}

pub fn execute<S: KeyValueStore, C: Clock>(
    session: &mut RaffleSession<S, C>,
    command: ConsoleCommand,
) -> Outcome {
    let lines = match command {
        ConsoleCommand::List => render_employees(session.list_roster(), "No employees."),
        ConsoleCommand::Available => render_employees(
            &session.list_available_for_pool(),
            "All employees added or none available.",
        ),
        ConsoleCommand::Pool => {
            let pool = session.list_pool();
            let mut lines = vec![format!(
                "Raffle Pool ({} participant{})",
                pool.len(),
                if pool.len() == 1 { "" } else { "s" }
            )];
            lines.extend(render_employees(pool, "No employees in the raffle pool yet."));
            lines
        }
        ConsoleCommand::Add { leadership, name } => {
            let category = leadership.then_some(Category::Leadership);
            vec![render_result(session.add_employee(&name.join(" "), category))]
        }
        ConsoleCommand::Enter { id } => vec![render_result(session.enter_pool(&EmployeeId(id)))],
        ConsoleCommand::Withdraw { id } => {
            vec![render_result(session.withdraw_from_pool(&EmployeeId(id)))]
        }
        ConsoleCommand::Delete { id } => render_prompt(session.request_delete(&EmployeeId(id))),
        ConsoleCommand::DeleteAll => render_prompt(session.request_delete_all()),
        ConsoleCommand::RestoreDefaults => render_prompt(session.request_restore_defaults()),
        ConsoleCommand::Confirm => vec![render_result(session.confirm())],
        ConsoleCommand::Cancel => {
            if session.cancel() {
                vec!["Cancelled.".to_string()]
            } else {
                vec!["Nothing to cancel.".to_string()]
            }
        }
        ConsoleCommand::Prize { text } => {
            let text = text.join(" ");
            if text.trim().is_empty() {
                session.clear_prize_name();
                vec!["Prize cleared.".to_string()]
            } else {
                session.set_prize_name(text);
                vec![format!("Prize set: {}", session.prize_name())]
            }
        }
        ConsoleCommand::Draw => match session.draw() {
            Ok(notice) => {
                let mut lines = vec![render_notice(&notice)];
                if session.is_draw_in_progress() {
                    lines.push("Picking a winner... Good luck!".to_string());
                }
                lines
            }
            Err(err) => vec![render_error(&err)],
        },
        ConsoleCommand::Status => render_status(session),
        ConsoleCommand::Quit => return Outcome::Quit,
    };
    Outcome::Continue(lines)
}

/// Advances the session's timeline and renders what changed.
pub fn on_tick<S: KeyValueStore, C: Clock>(session: &mut RaffleSession<S, C>) -> Vec<String> {
    let announcement_was_visible = session.is_winner_announcement_visible();
    let mut lines: Vec<String> = session.tick().iter().map(render_notice).collect();

    if session.is_winner_announcement_visible() && !announcement_was_visible {
        if let Some(winner) = session.current_winner() {
            lines.push(format!("*** {} ***", winner.name));
            lines.push(match session.prize_name().trim() {
                "" => "Congratulations!".to_string(),
                prize => format!("Congratulations! You've won: {prize}!"),
            });
        }
    }
    if announcement_was_visible && !session.is_winner_announcement_visible() {
        lines.extend(render_winner_card(session));
    }
    lines
}

/// Resolves at `deadline`, or never when there is nothing scheduled.
pub async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn render_status<S: KeyValueStore, C: Clock>(session: &RaffleSession<S, C>) -> Vec<String> {
    let mut lines = vec![
        format!("Employees: {}", session.list_roster().len()),
        format!("Pool: {}", session.list_pool().len()),
        format!(
            "Prize: {}",
            match session.prize_name().trim() {
                "" => "(none)",
                prize => prize,
            }
        ),
    ];
    if session.is_draw_in_progress() {
        lines.push("Drawing...".to_string());
    }
    if let Some(pending) = session.pending_confirmation() {
        lines.push(format!("Pending: {} (confirm or cancel)", pending.title));
    }
    lines.extend(render_winner_card(session));
    lines
}

fn render_winner_card<S: KeyValueStore, C: Clock>(session: &RaffleSession<S, C>) -> Vec<String> {
    let Some(card) = session.last_winner_card() else {
        return Vec::new();
    };
    let mut lines = vec![format!("The last raffle winner was... {}", card.winner.name)];
    if let Some(prize) = card.prize {
        lines.push(format!("They won: {prize}"));
    }
    lines
}

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Destructive => "!!",
    };
    format!("[{tag}] {}: {}", notice.title, notice.message)
}

fn render_result(result: Result<Notice, RaffleError>) -> String {
    match result {
        Ok(notice) => render_notice(&notice),
        Err(err) => render_error(&err),
    }
}

/// Error notices carry their machine code so scripted input can match on it.
pub fn render_error(err: &RaffleError) -> String {
    let code = err.code().as_str();
    tracing::debug!(code, "command rejected: {err}");
    format!("{} ({code})", render_notice(&err.notice()))
}

fn render_prompt(prompt: Prompt) -> Vec<String> {
    match prompt {
        Prompt::Confirm(pending) => vec![
            format!("{}: {}", pending.title, pending.message),
            "Type 'confirm' to proceed or 'cancel' to keep everything.".to_string(),
        ],
        Prompt::Notice(notice) => vec![render_notice(&notice)],
    }
}

fn render_employees(employees: &[Employee], empty: &str) -> Vec<String> {
    if employees.is_empty() {
        return vec![empty.to_string()];
    }
    employees
        .iter()
        .map(|employee| {
            let marker = match employee.category {
                Category::Leadership => " (leadership)",
                Category::Employee => "",
            };
            format!("  {}  {}{marker}", employee.id, employee.name)
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
