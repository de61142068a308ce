//! External collaborators: the analytics service and report delivery.

pub mod analytics;
pub mod notifier;

pub use analytics::{
    AnalyticsClient, GatsivaRestClient, IndicatorStatus, TriggerStatus, DEFAULT_RETRY_DELAY,
};
pub use notifier::{Notifier, ReportEmail, SmtpNotifier};
