use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::clock::{Clock, ManualClock};
use crate::config::IntroConfig;
use crate::constants::SESSION_FLAG_VALUE;
use crate::overlay::IntroOverlay;
use crate::session::SessionStore;
use crate::state::OverlayState;
use crate::surface::Surface;

/// Whether a document with this `readyState` is past `DOMContentLoaded`.
pub fn is_document_ready(ready_state: &str) -> bool {
    ready_state != "loading"
}

/// Everything the intro needs from the page: where to render, where the
/// session flag lives and what time it is.
pub struct IntroHost<S, St, C> {
    config: IntroConfig,
    pub surface: S,
    pub store: St,
    pub clock: C,
    rng: SmallRng,
}

impl<S: Surface, St: SessionStore, C: Clock> IntroHost<S, St, C> {
    pub fn new(config: IntroConfig, surface: S, store: St, clock: C, seed: u64) -> Self {
        Self {
            config,
            surface,
            store,
            clock,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &IntroConfig {
        &self.config
    }

    /// Automatic trigger, run once the page is ready.
    ///
    /// Shows the intro unless this session already saw it, then marks the
    /// session. An unreadable flag skips the intro; an unwritable one does not.
    pub fn page_ready(&mut self) -> Option<IntroOverlay<S>> {
        let key = self.config.session_key.as_str();
        match self.store.get(key) {
            Ok(Some(flag)) if !flag.is_empty() => {
                debug!(key, "intro already shown this session");
                return None;
            }
            Ok(_) => {}
            Err(err) => {
                warn!(key, "cannot read session flag, skipping intro: {err}");
                return None;
            }
        }

        let overlay = self.show_intro();

        if let Err(err) = self.store.set(&self.config.session_key, SESSION_FLAG_VALUE) {
            warn!(key = %self.config.session_key, "cannot persist session flag: {err}");
        }
        info!("intro shown");
        Some(overlay)
    }

    /// Manual trigger: a fresh overlay, already shown.
    pub fn show_intro(&mut self) -> IntroOverlay<S> {
        let mut overlay = IntroOverlay::new(self.config.clone(), self.rng.random());
        overlay.show(&mut self.surface, self.clock.now());
        overlay
    }

    pub fn poll(&mut self, overlay: &mut IntroOverlay<S>) -> OverlayState {
        overlay.poll(&mut self.surface, self.clock.now())
    }

    pub fn hide_manual(&mut self, overlay: &mut IntroOverlay<S>) {
        overlay.hide_manual(&mut self.surface, self.clock.now());
    }
}

impl<S: Surface, St: SessionStore> IntroHost<S, St, ManualClock> {
    /// Jumps the clock from deadline to deadline until the overlay has nothing left to do.
    pub fn run_to_end(&mut self, overlay: &mut IntroOverlay<S>) -> OverlayState {
        while let Some(deadline) = overlay.next_deadline() {
            self.clock.set(deadline);
            overlay.poll(&mut self.surface, self.clock.now());
        }
        overlay.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::memory::MemoryDocument;
    use crate::session::{MemorySessionStore, StoreError};
    use rstest::rstest;
    use std::time::Duration;

    type TestHost = IntroHost<MemoryDocument, MemorySessionStore, ManualClock>;
    type BrokenHost = IntroHost<MemoryDocument, BrokenStore, ManualClock>;

    fn host() -> TestHost {
        IntroHost::new(
            IntroConfig::default(),
            MemoryDocument::new(),
            MemorySessionStore::new(),
            ManualClock::new(),
            9,
        )
    }

    struct BrokenStore {
        readable: bool,
    }

    impl SessionStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            if self.readable {
                Ok(None)
            } else {
                Err(StoreError::Unavailable("disabled".into()))
            }
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Rejected {
                key: key.into(),
                reason: "quota".into(),
            })
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn page_ready_shows_once_and_sets_flag() {
        let mut host = host();

        let overlay = host.page_ready().expect("first load shows the intro");
        assert_eq!(overlay.state(), OverlayState::Showing);
        assert_eq!(host.store.get(SESSION_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(host.surface.count_by_id(ROOT_ID), 1);

        assert!(host.page_ready().is_none());
        assert_eq!(host.surface.count_by_id(ROOT_ID), 1);
    }

    #[test]
    fn empty_flag_counts_as_unset() {
        let mut host = host();
        host.store.set(SESSION_KEY, "").unwrap();
        assert!(host.page_ready().is_some());
    }

    #[test]
    fn custom_session_key() {
        let config = IntroConfig {
            session_key: "demo".into(),
            ..Default::default()
        };
        let mut host = IntroHost::new(config, MemoryDocument::new(), MemorySessionStore::new(), ManualClock::new(), 0);

        host.page_ready();
        assert_eq!(host.store.get("demo").unwrap().as_deref(), Some("true"));
        assert_eq!(host.store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn unreadable_store_skips_intro() {
        let mut host: BrokenHost = IntroHost::new(
            IntroConfig::default(),
            MemoryDocument::new(),
            BrokenStore { readable: false },
            ManualClock::new(),
            0,
        );
        assert!(host.page_ready().is_none());
        assert_eq!(host.surface.count_by_id(ROOT_ID), 0);
    }

    #[test]
    fn unwritable_store_still_shows() {
        let mut host: BrokenHost = IntroHost::new(
            IntroConfig::default(),
            MemoryDocument::new(),
            BrokenStore { readable: true },
            ManualClock::new(),
            0,
        );
        assert!(host.page_ready().is_some());
    }

    #[test]
    fn show_intro_ignores_session_flag() {
        let mut host = host();
        host.page_ready();

        let manual = host.show_intro();
        assert_eq!(manual.state(), OverlayState::Showing);
        assert_eq!(host.surface.count_by_id(ROOT_ID), 2);
    }

    #[test]
    fn poll_follows_clock() {
        let mut host = host();
        let mut overlay = host.show_intro();

        host.clock.advance(Duration::from_millis(500));
        assert_eq!(host.poll(&mut overlay), OverlayState::ParticlesActive);

        host.hide_manual(&mut overlay);
        assert_eq!(overlay.next_deadline(), Some(Duration::from_millis(1500)));

        host.clock.advance(Duration::from_millis(1000));
        assert_eq!(host.poll(&mut overlay), OverlayState::Removed);
        assert!(!overlay.is_visible());

        // The auto-hide armed by show() is still pending and runs as a no-op
        assert_eq!(overlay.next_deadline(), Some(DISPLAY_DURATION));
        assert_eq!(host.run_to_end(&mut overlay), OverlayState::Removed);
        assert_eq!(host.clock.now(), DISPLAY_DURATION);
    }

    #[test]
    fn run_to_end_takes_six_seconds() {
        let mut host = host();
        let mut overlay = host.page_ready().unwrap();

        assert_eq!(host.run_to_end(&mut overlay), OverlayState::Removed);
        assert_eq!(host.clock.now(), DISPLAY_DURATION + FADE_OUT_DURATION);
        assert_eq!(host.surface.count_by_id(ROOT_ID), 0);
    }

    #[rstest]
    #[case("loading", false)]
    #[case("interactive", true)]
    #[case("complete", true)]
    fn document_ready_states(#[case] ready_state: &str, #[case] ready: bool) {
        assert_eq!(is_document_ready(ready_state), ready);
    }
}
