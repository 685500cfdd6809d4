//! Presentation state for the application windows
//!
//! ViewModels own what a window displays and hand out `Send` jobs that call
//! the backend. Windows run those jobs through [`crate::task`] and feed the
//! outcome back with the matching `finish_*` method on the UI thread.

mod dashboard;
mod login;

pub use dashboard::{DashboardSnapshot, DashboardViewModel};
pub use login::{LoginState, LoginViewModel};

use crate::error::VpnResult;
use crate::task::TaskOutcome;

/// Collapses a task outcome wrapping a backend result into a displayable error
fn flatten<T>(outcome: TaskOutcome<VpnResult<T>>) -> Result<T, String> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}
