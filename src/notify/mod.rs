//! Push notification delivery.
//!
//! [`Notifier`] is the seam between the watch pipeline and a transport.
//! [`ApnsNotifier`] delivers through Apple Push Notification service.

pub mod apns;
pub mod jwt;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Notification;

pub use apns::{ApnsConfig, ApnsNotifier};
pub use jwt::TokenSigner;

/// A transport that delivers one alert to one preconfigured device.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single alert. A single attempt; failures are
    /// [`AppError::Delivery`](crate::error::AppError::Delivery).
    async fn send(&self, notification: &Notification) -> Result<()>;
}
