//! Notification manager (C5): subscription registry, inbound notification
//! dispatch, and resubscribe-on-reconnect.
//!
//! Dispatch is driven by the `mpsc` channel C3 feeds every
//! `AdsDeviceNotification` frame into; resubscription is triggered by a
//! `Connected` event that follows a `ConnectionLost` one, and its outcome is
//! reported back via `Event::Reconnected`.

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::events::Event;
use crate::multiplexer::AdsResponse;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as SyncMutex};
use tcads_core::ads::{AdsCommand, AdsTransMode, IndexGroup, IndexOffset, NotificationHandle};
use tcads_core::ams::AmsAddr;
use tcads_core::protocol::{
    AdsAddDeviceNotificationRequest, AdsAddDeviceNotificationResponse,
    AdsDeleteDeviceNotificationRequest, AdsDeviceNotificationStream,
};
use tokio::sync::{Mutex as AsyncMutex, broadcast, mpsc};
use tokio::time::Duration;
use tracing::warn;

/// Opaque handle returned from [`NotificationManager::subscribe`]. Stable
/// across reconnects even though the underlying PLC-assigned
/// [`NotificationHandle`] is replaced every time the subscription is renewed.
pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionSettings {
    pub target: AmsAddr,
    pub index_group: IndexGroup,
    pub index_offset: IndexOffset,
    pub size: u32,
    pub send_on_change: bool,
    pub cycle_time: Duration,
    pub max_delay: Duration,
}

/// One decoded sample delivered to a subscriber's callback.
#[derive(Debug, Clone)]
pub struct NotificationSample {
    pub subscription: SubscriptionId,
    pub timestamp: DateTime<Utc>,
    pub value: Vec<u8>,
}

pub type NotificationCallback = Box<dyn Fn(NotificationSample) + Send + Sync>;

struct Subscription {
    settings: SubscriptionSettings,
    handle: SyncMutex<NotificationHandle>,
    callback: NotificationCallback,
    last_value: SyncMutex<Option<Vec<u8>>>,
}

/// Owns every active subscription and the background tasks that dispatch
/// inbound samples and re-arm subscriptions after a reconnect.
pub struct NotificationManager {
    connection: Connection,
    subscriptions: SyncMutex<HashMap<SubscriptionId, Arc<Subscription>>>,
    by_handle: SyncMutex<HashMap<(AmsAddr, NotificationHandle), SubscriptionId>>,
    next_id: AtomicU64,
    unsubscribe_all_lock: AsyncMutex<()>,
}

impl NotificationManager {
    /// Builds the manager and spawns its dispatch and reconnect-listener tasks.
    pub fn spawn(connection: Connection, notify_rx: mpsc::UnboundedReceiver<AdsResponse>) -> Arc<Self> {
        let events = connection.events();
        let manager = Arc::new(Self {
            connection,
            subscriptions: SyncMutex::new(HashMap::new()),
            by_handle: SyncMutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            unsubscribe_all_lock: AsyncMutex::new(()),
        });
        tokio::spawn(manager.clone().dispatch_loop(notify_rx));
        tokio::spawn(manager.clone().reconnect_listener(events));
        manager
    }

    /// Registers an `AddNotification` subscription and stores a callback that
    /// fires on every inbound sample.
    pub async fn subscribe(
        &self,
        settings: SubscriptionSettings,
        callback: NotificationCallback,
    ) -> Result<SubscriptionId> {
        let handle = self.add_notification(&settings).await?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let subscription = Arc::new(Subscription {
            settings,
            handle: SyncMutex::new(handle),
            callback,
            last_value: SyncMutex::new(None),
        });
        self.subscriptions.lock().unwrap().insert(id, subscription);
        self.by_handle.lock().unwrap().insert((settings.target, handle), id);
        Ok(id)
    }

    /// The last value dispatched to this subscription, if any sample has arrived yet.
    pub fn last_value(&self, id: SubscriptionId) -> Option<Vec<u8>> {
        let subscriptions = self.subscriptions.lock().unwrap();
        subscriptions.get(&id).and_then(|s| s.last_value.lock().unwrap().clone())
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    /// Sends `DeleteNotification` and drops the subscription regardless of
    /// whether the device accepted the delete.
    pub async fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        let subscription = self.subscriptions.lock().unwrap().remove(&id);
        let Some(subscription) = subscription else {
            return Ok(());
        };
        let handle = *subscription.handle.lock().unwrap();
        self.by_handle.lock().unwrap().remove(&(subscription.settings.target, handle));
        let _ = self.delete_notification(subscription.settings.target, handle).await;
        Ok(())
    }

    /// Unsubscribes every active subscription. Concurrent callers serialize on
    /// the same lock, so a racing second call simply finds nothing left to do.
    pub async fn unsubscribe_all(&self) -> Result<()> {
        let _guard = self.unsubscribe_all_lock.lock().await;
        let ids: Vec<SubscriptionId> = self.subscriptions.lock().unwrap().keys().copied().collect();
        for id in ids {
            let _ = self.unsubscribe(id).await;
        }
        Ok(())
    }

    async fn add_notification(&self, settings: &SubscriptionSettings) -> Result<NotificationHandle> {
        let trans_mode = if settings.send_on_change {
            AdsTransMode::ClientOnChange
        } else {
            AdsTransMode::ClientCycle
        };
        let request = AdsAddDeviceNotificationRequest::new(
            settings.index_group,
            settings.index_offset,
            settings.size,
            trans_mode,
            duration_to_100ns(settings.max_delay),
            duration_to_100ns(settings.cycle_time),
        );
        let mut payload = Vec::new();
        request.write_to(&mut payload)?;
        let response = self
            .connection
            .send(AdsCommand::AdsAddDeviceNotification, settings.target, payload)
            .await?;
        let parsed = AdsAddDeviceNotificationResponse::read_from(&mut &response.payload[..])?;
        if !parsed.result().is_success() {
            return Err(ClientError::ads(parsed.result()));
        }
        Ok(parsed.handle())
    }

    async fn delete_notification(&self, target: AmsAddr, handle: NotificationHandle) -> Result<()> {
        let request = AdsDeleteDeviceNotificationRequest::new(handle.as_u32());
        let mut payload = Vec::new();
        request.write_to(&mut payload)?;
        self.connection
            .send(AdsCommand::AdsDeleteDeviceNotification, target, payload)
            .await?;
        Ok(())
    }

    async fn dispatch_loop(self: Arc<Self>, mut notify_rx: mpsc::UnboundedReceiver<AdsResponse>) {
        while let Some(response) = notify_rx.recv().await {
            self.handle_notification(response);
        }
    }

    fn handle_notification(&self, response: AdsResponse) {
        let stream = match AdsDeviceNotificationStream::parse(&response.payload) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "malformed notification stream");
                return;
            }
        };
        let source = *response.header.source();
        for (timestamp, samples) in stream.stamps {
            for sample in samples {
                self.dispatch_sample(source, timestamp.to_datetime(), sample.handle(), sample.data());
            }
        }
    }

    fn dispatch_sample(&self, source: AmsAddr, timestamp: DateTime<Utc>, handle: NotificationHandle, data: &[u8]) {
        let id = self.by_handle.lock().unwrap().get(&(source, handle)).copied();
        let Some(id) = id else {
            warn!(?handle, "notification sample for unknown subscription");
            if self.connection.settings().delete_unknown_subscriptions {
                let manager = self.connection.clone();
                let handle = handle;
                tokio::spawn(async move {
                    let mut payload = Vec::new();
                    if AdsDeleteDeviceNotificationRequest::new(handle.as_u32())
                        .write_to(&mut payload)
                        .is_ok()
                    {
                        let _ = manager.send(AdsCommand::AdsDeleteDeviceNotification, source, payload).await;
                    }
                });
            }
            return;
        };
        let subscription = self.subscriptions.lock().unwrap().get(&id).cloned();
        if let Some(subscription) = subscription {
            let value = data.to_vec();
            *subscription.last_value.lock().unwrap() = Some(value.clone());
            (subscription.callback)(NotificationSample { subscription: id, timestamp, value });
        }
    }

    /// Tracks connection loss so a `Connected` event is only treated as a
    /// reconnect (triggering resubscription) when it follows one.
    async fn reconnect_listener(self: Arc<Self>, mut events: broadcast::Receiver<Event>) {
        let mut is_reconnect = false;
        loop {
            match events.recv().await {
                Ok(Event::ConnectionLost) => is_reconnect = true,
                Ok(Event::Connected { .. }) if is_reconnect => {
                    is_reconnect = false;
                    self.resubscribe_all().await;
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }

    /// Re-arms every subscription after a reconnect, then emits
    /// `Event::Reconnected` with which (if any) failed to restore (§4.3.6).
    async fn resubscribe_all(&self) {
        let subscriptions: Vec<(SubscriptionId, Arc<Subscription>)> = {
            self.subscriptions
                .lock()
                .unwrap()
                .iter()
                .map(|(id, s)| (*id, s.clone()))
                .collect()
        };
        let mut unrestored = Vec::new();
        for (id, subscription) in subscriptions {
            match self.add_notification(&subscription.settings).await {
                Ok(new_handle) => {
                    let old_handle = {
                        let mut guard = subscription.handle.lock().unwrap();
                        let old = *guard;
                        *guard = new_handle;
                        old
                    };
                    let mut by_handle = self.by_handle.lock().unwrap();
                    by_handle.remove(&(subscription.settings.target, old_handle));
                    by_handle.insert((subscription.settings.target, new_handle), id);
                }
                Err(e) => {
                    warn!(subscription = id, error = %e, "resubscribe failed");
                    unrestored.push(id);
                }
            }
        }
        let all_restored = unrestored.is_empty();
        self.connection.emit_event(Event::Reconnected { all_restored, unrestored });
    }
}

fn duration_to_100ns(d: Duration) -> u32 {
    (d.as_nanos() / 100).min(u32::MAX as u128) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_to_100ns_converts_milliseconds() {
        assert_eq!(duration_to_100ns(Duration::from_millis(100)), 1_000_000);
    }

    #[test]
    fn duration_to_100ns_saturates_at_u32_max() {
        assert_eq!(duration_to_100ns(Duration::from_secs(10_000)), u32::MAX);
    }
}
