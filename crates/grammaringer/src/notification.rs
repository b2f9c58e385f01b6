use notify_rust::Notification;
use tracing::warn;

const APP_NAME: &str = "Grammaringer";

/// Show a desktop notification, logging instead if the platform refuses.
pub(crate) fn notify(summary: &str, body: &str) {
    if let Err(e) = Notification::new()
        .appname(APP_NAME)
        .summary(summary)
        .body(body)
        .show()
    {
        warn!(error = ?e, summary, "Failed to show desktop notification");
    }
}
