pub mod pushover;

use async_trait::async_trait;

use crate::error::NotifyError;

pub use pushover::PushoverNotifier;

/// A push channel. `Ok` means the channel accepted the message.
#[async_trait]
pub trait Notifier {
    async fn send(&self, message: &str, title: &str) -> Result<(), NotifyError>;
}
