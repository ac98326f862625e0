//! Change notifications published by the controller.
//!
//! Views subscribe to a broadcast channel instead of polling state; every
//! repository or profile mutation publishes one or more `AppEvent`s.

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::profile::Badge;

/// Something observable changed.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    TaskCreated(Uuid),
    TaskUpdated(Uuid),
    TaskCompleted { id: Uuid, xp: u32 },
    TaskDeleted(Uuid),
    XpGained { amount: u32, level: u32, xp: u32 },
    LevelUp { level: u32 },
    StreakChanged { streak: u32 },
    BadgeUnlocked(Badge),
}

pub type EventTx = broadcast::Sender<AppEvent>;
pub type EventRx = broadcast::Receiver<AppEvent>;

const CAPACITY: usize = 64;

pub fn event_bus() -> (EventTx, EventRx) {
    broadcast::channel(CAPACITY)
}

/// Drain every event currently queued on `rx` without blocking.
pub fn drain(rx: &mut EventRx) -> Vec<AppEvent> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(ev) => out.push(ev),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_collects_in_order() {
        let (tx, mut rx) = event_bus();
        tx.send(AppEvent::LevelUp { level: 2 }).unwrap();
        tx.send(AppEvent::StreakChanged { streak: 3 }).unwrap();
        assert_eq!(
            drain(&mut rx),
            vec![AppEvent::LevelUp { level: 2 }, AppEvent::StreakChanged { streak: 3 }]
        );
        assert!(drain(&mut rx).is_empty());
    }
}
