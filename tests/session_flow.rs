use std::time::Duration;

use nexus_intro::constants::*;
use nexus_intro::{
    Clock, IntroConfig, IntroHost, ManualClock, MemoryDocument, MemorySessionStore, OverlayState,
    SessionStore,
};

type Host = IntroHost<MemoryDocument, MemorySessionStore, ManualClock>;

fn new_session() -> Host {
    IntroHost::new(
        IntroConfig::default(),
        MemoryDocument::new(),
        MemorySessionStore::new(),
        ManualClock::new(),
        2024,
    )
}

fn reload(host: &mut Host) {
    host.surface = MemoryDocument::new();
}

#[test]
fn intro_plays_once_per_session() {
    let mut host = new_session();

    // Fresh session: the intro appears and runs its full course
    let mut overlay = host.page_ready().expect("intro on first load");
    let body = host.surface.body().unwrap();
    assert_eq!(host.surface.find_by_id(ROOT_ID), Some(host.surface.children(body)[0]));

    host.clock.advance(PARTICLE_DELAY);
    host.poll(&mut overlay);
    let container = host.surface.find_by_id(PARTICLES_ID).unwrap();
    assert_eq!(host.surface.children(container).len(), PARTICLE_COUNT);

    host.clock.set(DISPLAY_DURATION);
    assert_eq!(host.poll(&mut overlay), OverlayState::Hiding);
    let root = host.surface.find_by_id(ROOT_ID).unwrap();
    assert!(host.surface.has_class(root, HIDING_CLASS));

    host.clock.advance(FADE_OUT_DURATION);
    assert_eq!(host.poll(&mut overlay), OverlayState::Removed);
    assert_eq!(host.surface.find_by_id(ROOT_ID), None);
    assert!(!overlay.is_visible());

    // Same session: nothing on reload
    reload(&mut host);
    assert!(host.page_ready().is_none());
    assert_eq!(host.surface.count_by_id(ROOT_ID), 0);

    // Flag cleared: shown again
    host.store.remove(SESSION_KEY).unwrap();
    reload(&mut host);
    let mut again = host.page_ready().expect("intro after clearing the flag");
    assert_eq!(host.surface.count_by_id(ROOT_ID), 1);

    assert_eq!(host.run_to_end(&mut again), OverlayState::Removed);
    assert_eq!(host.clock.now(), Duration::from_secs(12));
}

#[test]
fn new_session_shows_again() {
    let mut host = new_session();
    assert!(host.page_ready().is_some());

    host.store.clear();
    reload(&mut host);
    assert!(host.page_ready().is_some());
}

#[test]
fn manual_trigger_can_be_dismissed() {
    let mut host = new_session();
    let mut overlay = host.show_intro();
    assert!(overlay.is_visible());

    host.clock.advance(Duration::from_millis(2500));
    host.poll(&mut overlay);
    host.hide_manual(&mut overlay);
    assert!(overlay.is_visible());

    host.clock.advance(FADE_OUT_DURATION);
    host.poll(&mut overlay);
    assert!(!overlay.is_visible());
    assert_eq!(host.surface.count_by_id(ROOT_ID), 0);

    // The manual trigger does not touch the session flag
    assert_eq!(host.store.get(SESSION_KEY).unwrap(), None);
}
