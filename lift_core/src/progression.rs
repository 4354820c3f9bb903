//! Progression through the days of a routine.
//!
//! The next day is recomputed on every call from the most recent completion:
//! - No history, or an ad-hoc last workout → day 1
//! - Otherwise the day after the last completed one
//! - Past the final day → wrap around to day 1
//!
//! Nothing is persisted here, so calling it repeatedly is safe.

use crate::{CompletionHistory, CompletionRecord, Error, Result, RoutineDay, RoutinePersistence};

/// Pick the day to perform next
///
/// `routine_days` must carry contiguous day orders starting at 1. The
/// returned reference always points into `routine_days`.
///
/// # Errors
/// - [`Error::NoActiveRoutineDays`] if `routine_days` is empty
/// - [`Error::MalformedRoutine`] if day 1 is needed but missing
pub fn next_day<'a>(
    routine_days: &'a [RoutineDay],
    last_completion: Option<&CompletionRecord>,
) -> Result<&'a RoutineDay> {
    if routine_days.is_empty() {
        return Err(Error::NoActiveRoutineDays);
    }

    let last_order = match last_completion.and_then(|c| c.day_order) {
        Some(order) => order,
        None => {
            tracing::debug!("No structured completion on record, starting at day 1");
            return first_day(routine_days);
        }
    };

    let candidate = last_order.saturating_add(1);
    if let Some(day) = find_day(routine_days, candidate) {
        tracing::info!("Continuing routine: day {} follows day {}", candidate, last_order);
        return Ok(day);
    }

    tracing::info!(
        "Day {} completed the cycle of {} days, wrapping to day 1",
        last_order,
        routine_days.len()
    );
    first_day(routine_days)
}

/// Resolve the next day for the active routine through the storage collaborators
///
/// Returns an owned copy so the routine can be dropped by the caller.
pub fn next_for_active_routine<R, H>(routines: &R, history: &H) -> Result<RoutineDay>
where
    R: RoutinePersistence + ?Sized,
    H: CompletionHistory + ?Sized,
{
    let routine = routines.active_routine()?.ok_or(Error::NoActiveRoutineDays)?;
    let last = history.last_completion(routine.id)?;
    next_day(&routine.days, last.as_ref()).cloned()
}

fn find_day(routine_days: &[RoutineDay], day_order: u32) -> Option<&RoutineDay> {
    routine_days.iter().find(|d| d.day_order == day_order)
}

fn first_day(routine_days: &[RoutineDay]) -> Result<&RoutineDay> {
    find_day(routine_days, 1).ok_or_else(|| {
        let orders: Vec<String> = routine_days.iter().map(|d| d.day_order.to_string()).collect();
        Error::MalformedRoutine(format!(
            "no day 1 among day orders [{}]",
            orders.join(", ")
        ))
    })
}
