use crate::errors::GameResult;
use crate::game::{GameController, QuoteSheet, UserState};
use crate::models::OptionKind;
use crate::save::SaveStore;
use rand::Rng;

/// Owns a controller and a save store, and persists the four-field snapshot
/// after every state-mutating operation. A failed write is logged and never
/// rolls back the in-memory change or propagates to the caller.
///
/// This is the only place storage and game state meet; the ledger and pricer
/// below know nothing about persistence.
pub struct GameSession<R: Rng, S: SaveStore> {
    controller: GameController<R>,
    store: S,
}

impl<R: Rng, S: SaveStore> GameSession<R, S> {
    /// Restore a prior save if one exists, otherwise start from defaults.
    /// An unreadable store is treated as no save.
    pub fn start(mut controller: GameController<R>, mut store: S) -> Self {
        match store.load() {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    cash = snapshot.cash,
                    level = snapshot.level,
                    "restored saved game"
                );
                controller.restore(&snapshot);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("save load failed, starting fresh: {e}"),
        }
        Self { controller, store }
    }

    /// Advance one tick, then persist.
    pub fn tick(&mut self) -> GameResult<()> {
        self.controller.tick()?;
        self.persist();
        Ok(())
    }

    /// Buy at the current spot, then persist (even on a rejected buy, to
    /// match the original game's save cadence).
    pub fn buy(&mut self, strike: f64, expiry_seconds: f64, kind: OptionKind) -> GameResult<bool> {
        let filled = self.controller.buy(strike, expiry_seconds, kind)?;
        self.persist();
        Ok(filled)
    }

    /// Wipe the save and restart from the configured defaults.
    pub fn reset(&mut self) {
        self.controller.reset();
        if let Err(e) = self.store.clear() {
            tracing::warn!("save clear failed: {e}");
        }
    }

    pub fn user_state(&self) -> UserState {
        self.controller.user_state()
    }

    pub fn generate_quotes(&mut self) -> GameResult<QuoteSheet> {
        self.controller.generate_quotes()
    }

    pub fn quote_price(
        &self,
        strike: f64,
        expiry_seconds: f64,
        kind: OptionKind,
    ) -> GameResult<f64> {
        self.controller.quote_price(strike, expiry_seconds, kind)
    }

    pub fn available_strikes(&self) -> [f64; 5] {
        self.controller.available_strikes()
    }

    pub fn controller(&self) -> &GameController<R> {
        &self.controller
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.controller.snapshot()) {
            tracing::warn!("save failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::errors::GameError;
    use crate::save::{MemoryStore, SaveSnapshot};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn controller(seed: u64) -> GameController<StdRng> {
        GameController::new(GameConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_start_restores_existing_save() {
        let mut store = MemoryStore::default();
        store
            .save(&SaveSnapshot {
                cash: 55.0,
                level: 4,
                xp: 10,
                stock_price: 120.0,
            })
            .unwrap();

        let session = GameSession::start(controller(1), store);
        let state = session.user_state();
        assert_eq!(state.cash, 55.0);
        assert_eq!(state.level, 4);
        assert_eq!(state.stock_price, 120.0);
    }

    #[test]
    fn test_start_without_save_uses_defaults() {
        let session = GameSession::start(controller(2), MemoryStore::default());
        let state = session.user_state();
        assert_eq!(state.cash, 10.0);
        assert_eq!(state.level, 1);
        assert_eq!(state.stock_price, 100.0);
    }

    #[test]
    fn test_tick_persists_snapshot() {
        let mut session = GameSession::start(controller(3), MemoryStore::default());
        session.tick().unwrap();

        let saved = session.store.load().unwrap().expect("tick should persist");
        assert_eq!(saved.stock_price, session.user_state().stock_price);
    }

    #[test]
    fn test_buy_persists_even_when_rejected() {
        let mut session = GameSession::start(controller(4), MemoryStore::default());
        // Starting cash is 10; a deep ITM call costs far more.
        let filled = session.buy(50.0, 3600.0, OptionKind::Call).unwrap();
        assert!(!filled);

        let saved = session.store.load().unwrap().expect("buy should persist");
        assert_eq!(saved.cash, 10.0);
    }

    #[test]
    fn test_reset_wipes_save_and_state() {
        let mut session = GameSession::start(controller(5), MemoryStore::default());
        session.tick().unwrap();
        assert!(session.store.load().unwrap().is_some());

        session.reset();
        assert!(session.store.load().unwrap().is_none());
        let state = session.user_state();
        assert_eq!(state.cash, 10.0);
        assert_eq!(state.stock_price, 100.0);
    }

    /// Store whose writes always fail; loads succeed empty.
    struct BrokenStore;

    impl SaveStore for BrokenStore {
        fn save(&mut self, _snapshot: &SaveSnapshot) -> GameResult<()> {
            Err(GameError::Storage("disk on fire".into()))
        }
        fn load(&mut self) -> GameResult<Option<SaveSnapshot>> {
            Ok(None)
        }
        fn clear(&mut self) -> GameResult<()> {
            Err(GameError::Storage("disk on fire".into()))
        }
    }

    #[test]
    fn test_failed_persist_is_non_fatal() {
        let mut session = GameSession::start(controller(6), BrokenStore);
        // The tick itself must succeed and mutate in-memory state.
        session.tick().unwrap();
        assert!(session.user_state().stock_price > 0.0);
        session.reset();
        assert_eq!(session.user_state().cash, 10.0);
    }
}
