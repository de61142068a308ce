use serde::{Deserialize, Serialize};

use super::report::RunReport;

/// When a finished run should be emailed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyPolicy {
    /// Send every report, even when nothing fired
    pub email_always: bool,
    /// Send when any query failed
    pub email_on_errors: bool,
}

impl NotifyPolicy {
    pub fn new(email_always: bool, email_on_errors: bool) -> Self {
        Self {
            email_always,
            email_on_errors,
        }
    }

    /// A fired trigger always notifies; errors notify only when opted in.
    pub fn should_notify(&self, any_trigger_true: bool, any_query_failed: bool) -> bool {
        (any_query_failed && self.email_on_errors) || self.email_always || any_trigger_true
    }

    pub fn decide(&self, report: &RunReport) -> bool {
        self.should_notify(
            report.any_trigger_true_overall(),
            report.any_query_failed_overall(),
        )
    }
}
