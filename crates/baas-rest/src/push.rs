//! Push notification dispatch.

use baas_client::{RequestSpec, Service};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct PushResult {
    installations: i64,
}

/// Sends push notifications.
#[derive(Debug, Clone, Copy)]
pub struct PushSender;

impl PushSender {
    /// Send a notification. Returns the number of target installations.
    ///
    /// `request` is the notification object, e.g.
    /// `{"query": {"channels": ["ch1"]}, "message": "hello"}`.
    #[instrument(skip(service, request))]
    pub async fn send<T: Serialize + ?Sized>(service: &Service, request: &T) -> Result<i64> {
        let spec = RequestSpec::post("push/notifications").json(request)?;
        let result: PushResult = service.execute_json(spec).await?;
        info!(installations = result.installations, "Push notification sent");
        Ok(result.installations)
    }
}
