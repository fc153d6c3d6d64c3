//! Foundry Alert Dispatch
//!
//! Turns qualifying anomalies (severity high or critical) into alerts and
//! delivers them: priority stream first, then metrics and per-tenant
//! notification channels under a hard latency budget.
//!
//! The priority stream is the authoritative durable sink; every other
//! channel is best-effort and failure-isolated.

mod actions;
mod alert;
mod dispatcher;
mod error;
mod observe;
mod sinks;

pub use actions::recommended_actions;
pub use alert::{Alert, AlertNotification, AlertOutcome, ChannelOutcome, SensorDetails};
pub use dispatcher::{AlertDispatcher, DISPATCH_BUDGET, HIGH_PUBLISH_BUDGET};
pub use error::{AlertError, Result};
pub use observe::{Dimensions, ObservabilitySink, TracingSink, emit_alert_metrics};
pub use sinks::{LogSink, NotificationSink, TopicSink, WebhookSink};
