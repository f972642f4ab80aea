use crate::error::AppError;
use crate::scheduler::merge_date_and_time;
use time::{Date, PrimitiveDateTime, Time};

/// Observable state of the two-step due-date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Idle,
    AwaitingDate,
    AwaitingTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    AwaitingDate,
    AwaitingTime(Date),
}

/// The two-step date-then-time interaction flow, as an explicit state
/// machine independent of any particular input surface.
///
/// `Idle -> AwaitingDate -> AwaitingTime -> Idle`; dismissal at either step
/// returns to `Idle` with no value. Events that do not match the current
/// state are ignored.
#[derive(Debug)]
pub struct DueDatePicker {
    state: State,
}

impl DueDatePicker {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    pub fn state(&self) -> PickerState {
        match self.state {
            State::Idle => PickerState::Idle,
            State::AwaitingDate => PickerState::AwaitingDate,
            State::AwaitingTime(_) => PickerState::AwaitingTime,
        }
    }

    pub fn start(&mut self) {
        if self.state == State::Idle {
            self.state = State::AwaitingDate;
        }
    }

    pub fn dismiss(&mut self) {
        self.state = State::Idle;
    }

    pub fn select_date(&mut self, date: Date) {
        if self.state == State::AwaitingDate {
            self.state = State::AwaitingTime(date);
        }
    }

    /// Complete the flow. Returns the merged due timestamp when a date was
    /// selected first, `None` when the event arrives out of state.
    pub fn select_time(&mut self, time: Time) -> Result<Option<PrimitiveDateTime>, AppError> {
        match self.state {
            State::AwaitingTime(date) => {
                let merged = merge_date_and_time(date, time)?;
                self.state = State::Idle;
                Ok(Some(merged))
            }
            _ => Ok(None),
        }
    }
}

impl Default for DueDatePicker {
    fn default() -> Self {
        Self::new()
    }
}
