//! Concurrent battle store: one live battle per player, looked up by
//! player id. The outer map lock is held only for lookup; turn resolution
//! runs under the per-battle mutex.

use crate::battle::engine::{resolve_turn, PlayerAction, TurnReport};
use crate::battle::state::{BattleState, TurnRng};
use crate::errors::StoreError;
use crate::metadata::MetadataProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

pub type PlayerId = String;

/// One player's live battle.
#[derive(Debug)]
pub struct BattleSession {
    pub state: BattleState,
}

/// Shared battle registry. Wrap in an `Arc` to share across threads; the
/// per-battle mutex keeps turn resolution serialized per player.
pub struct BattleStore<M: MetadataProvider> {
    metadata: Arc<M>,
    battles: RwLock<HashMap<PlayerId, Arc<Mutex<BattleSession>>>>,
}

impl<M: MetadataProvider> BattleStore<M> {
    pub fn new(metadata: Arc<M>) -> Self {
        Self {
            metadata,
            battles: RwLock::new(HashMap::new()),
        }
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// Register a new battle for a player. Rejected while the player
    /// already has one in progress.
    pub fn start_battle(
        &self,
        player: PlayerId,
        state: BattleState,
    ) -> Result<(), StoreError> {
        let mut battles = self.battles.write().unwrap_or_else(|e| e.into_inner());
        if battles.contains_key(&player) {
            return Err(StoreError::BattleInProgress { player });
        }
        tracing::info!(player = %player, battle_id = %state.battle_id, "battle started");
        battles.insert(player, Arc::new(Mutex::new(BattleSession { state })));
        Ok(())
    }

    /// Resolve one turn of the player's battle with fresh randomness.
    pub fn submit_action(
        &self,
        player: &str,
        action: PlayerAction,
    ) -> Result<TurnReport, StoreError> {
        let session = self.session(player)?;
        let mut session = session.lock().unwrap_or_else(|e| e.into_inner());
        let mut rng = TurnRng::new_random();
        let report = resolve_turn(&mut session.state, self.metadata.as_ref(), action, &mut rng)?;
        if let Some(outcome) = report.outcome {
            tracing::info!(player = %player, ?outcome, "battle finished");
        }
        Ok(report)
    }

    /// A snapshot of the player's battle state.
    pub fn snapshot(&self, player: &str) -> Result<BattleState, StoreError> {
        let session = self.session(player)?;
        let session = session.lock().unwrap_or_else(|e| e.into_inner());
        Ok(session.state.clone())
    }

    /// Drop the player's battle. All of its state is discarded; there is no
    /// resuming a terminated battle.
    pub fn terminate(&self, player: &str) -> Result<(), StoreError> {
        let mut battles = self.battles.write().unwrap_or_else(|e| e.into_inner());
        battles
            .remove(player)
            .map(|_| {
                tracing::info!(player = %player, "battle terminated");
            })
            .ok_or(StoreError::NoBattle {
                player: player.to_string(),
            })
    }

    pub fn has_battle(&self, player: &str) -> bool {
        self.battles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(player)
    }

    fn session(&self, player: &str) -> Result<Arc<Mutex<BattleSession>>, StoreError> {
        self.battles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(player)
            .cloned()
            .ok_or(StoreError::NoBattle {
                player: player.to_string(),
            })
    }
}
