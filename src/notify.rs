use crate::domain::errors::DomainError;
use crate::domain::ports::NotificationSink;

/// Default sink: writes the notification to the log. A real transport (mail,
/// push) plugs in behind the same trait.
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(
        &self,
        email: &str,
        name: &str,
        order_id: i32,
        status: &str,
    ) -> Result<(), DomainError> {
        log::info!(
            "notifying {} <{}>: order {} is now {}",
            name,
            email,
            order_id,
            status
        );
        Ok(())
    }
}
