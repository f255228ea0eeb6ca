use crate::error::BridgeError;
use crate::messages::OutboundMessage;
use crate::storage::{PersistedState, StorageWrite};
use tracing::debug;

/// Messaging and storage host. Every call may fail when the host is gone;
/// the controller logs the failure and keeps working locally.
pub trait StatsBridge {
    fn publish(&mut self, message: &OutboundMessage) -> Result<(), BridgeError>;

    fn load(&mut self) -> Result<PersistedState, BridgeError>;

    fn store(&mut self, write: StorageWrite) -> Result<(), BridgeError>;
}

/// Keeps everything in memory and remembers what was published.
#[derive(Debug, Default, Clone)]
pub struct MemoryBridge {
    pub state: PersistedState,
    pub published: Vec<OutboundMessage>,
    pub writes: usize,
    available: bool,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::with_state(PersistedState::default())
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state,
            published: Vec::new(),
            writes: 0,
            available: true,
        }
    }

    /// Simulates the host context being torn down (or coming back).
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn last_published(&self) -> Option<&OutboundMessage> {
        self.published.last()
    }

    fn check(&self) -> Result<(), BridgeError> {
        if self.available {
            Ok(())
        } else {
            Err(BridgeError::Unavailable)
        }
    }
}

impl StatsBridge for MemoryBridge {
    fn publish(&mut self, message: &OutboundMessage) -> Result<(), BridgeError> {
        self.check()?;
        self.published.push(message.clone());
        Ok(())
    }

    fn load(&mut self) -> Result<PersistedState, BridgeError> {
        self.check()?;
        Ok(self.state.clone())
    }

    fn store(&mut self, write: StorageWrite) -> Result<(), BridgeError> {
        self.check()?;
        debug!("Storing {:?}", write.keys());
        write.apply_to(&mut self.state);
        self.writes += 1;
        Ok(())
    }
}

/// A host with nowhere to send anything. Loads return defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBridge;

impl StatsBridge for NullBridge {
    fn publish(&mut self, _message: &OutboundMessage) -> Result<(), BridgeError> {
        Ok(())
    }

    fn load(&mut self) -> Result<PersistedState, BridgeError> {
        Ok(PersistedState::default())
    }

    fn store(&mut self, _write: StorageWrite) -> Result<(), BridgeError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SessionStats;

    #[test]
    fn test_unavailable_bridge_rejects_everything() {
        let mut bridge = MemoryBridge::new();
        bridge.set_available(false);
        let msg = OutboundMessage::StatsUpdate {
            stats: SessionStats::default(),
        };
        assert_eq!(bridge.publish(&msg), Err(BridgeError::Unavailable));
        assert_eq!(bridge.load(), Err(BridgeError::Unavailable));
        assert_eq!(
            bridge.store(StorageWrite::Stats(SessionStats::default())),
            Err(BridgeError::Unavailable)
        );
        assert!(bridge.published.is_empty());

        bridge.set_available(true);
        assert!(bridge.publish(&msg).is_ok());
        assert_eq!(bridge.last_published(), Some(&msg));
    }

    #[test]
    fn test_store_round_trips_through_load() {
        let mut bridge = MemoryBridge::new();
        let stats = SessionStats {
            assist_count: 2,
            ..Default::default()
        };
        bridge.store(StorageWrite::Stats(stats.clone())).unwrap();
        assert_eq!(bridge.load().unwrap().stats, stats);
        assert_eq!(bridge.writes, 1);
    }

    #[test]
    fn test_null_bridge_accepts_and_forgets() {
        let mut bridge = NullBridge;
        let stats = SessionStats {
            click_count: 4,
            ..Default::default()
        };
        assert!(bridge.store(StorageWrite::Stats(stats)).is_ok());
        assert_eq!(bridge.load().unwrap(), PersistedState::default());
    }
}
