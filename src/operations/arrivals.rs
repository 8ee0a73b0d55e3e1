// Deferred arrival notifications for navigating ships
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, oneshot};
use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::graph::WaypointRef;

const EVENT_CAPACITY: usize = 64;

/// Emitted once a ship's scheduled arrival time has passed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalEvent {
    #[serde(rename = "shipSymbol")]
    pub ship_symbol: String,
    pub destination: WaypointRef,
    pub arrival: DateTime<Utc>,
}

/// A pending arrival: what fires, and when
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalTicket {
    pub id: u64,
    #[serde(rename = "shipSymbol")]
    pub ship_symbol: String,
    pub destination: WaypointRef,
    #[serde(rename = "fireAt")]
    pub fire_at: DateTime<Utc>,
}

struct PendingArrival {
    ticket: ArrivalTicket,
    handle: AbortHandle,
}

/// One timer task per ship. Scheduling again for the same ship aborts the
/// earlier task, so a re-routed ship only ever reports its latest destination.
#[derive(Clone)]
pub struct ArrivalScheduler {
    events: broadcast::Sender<ArrivalEvent>,
    pending: Arc<DashMap<String, PendingArrival>>,
    next_id: Arc<AtomicU64>,
}

impl Default for ArrivalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrivalScheduler {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            events,
            pending: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ArrivalEvent> {
        self.events.subscribe()
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, ship_symbol: &str, destination: WaypointRef, arrival: DateTime<Utc>) -> ArrivalTicket {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let ticket = ArrivalTicket {
            id,
            ship_symbol: ship_symbol.to_string(),
            destination: destination.clone(),
            fire_at: arrival,
        };
        let delay = (arrival - Utc::now()).to_std().unwrap_or_default();

        let events = self.events.clone();
        let pending = Arc::clone(&self.pending);
        let ship = ship_symbol.to_string();
        // The task waits until its entry is registered, so a zero delay cannot
        // fire before the ticket exists.
        let (registered_tx, registered_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _ = registered_rx.await;
            sleep(delay).await;
            pending.remove_if(&ship, |_, p| p.ticket.id == id);
            info!("{} arrived at {}", ship, destination.symbol);
            // No subscribers is fine; the event is simply dropped.
            let _ = events.send(ArrivalEvent {
                ship_symbol: ship,
                destination,
                arrival,
            });
        });

        let previous = self.pending.insert(
            ship_symbol.to_string(),
            PendingArrival {
                ticket: ticket.clone(),
                handle: task.abort_handle(),
            },
        );
        if let Some(previous) = previous {
            debug!("Replacing pending arrival {} for {}", previous.ticket.id, ship_symbol);
            previous.handle.abort();
        }
        let _ = registered_tx.send(());

        debug!("Arrival of {} at {} scheduled for {}", ship_symbol, ticket.destination.symbol, arrival);
        ticket
    }

    /// Abort the ship's pending arrival, if any
    pub fn cancel(&self, ship_symbol: &str) -> bool {
        match self.pending.remove(ship_symbol) {
            Some((_, pending)) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn pending(&self, ship_symbol: &str) -> Option<ArrivalTicket> {
        self.pending.get(ship_symbol).map(|p| p.ticket.clone())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
