use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use nexus_intro::constants::*;
use nexus_intro::{
    Clock, IntroConfig, IntroHost, IntroOverlay, ManualClock, MemoryDocument, MemorySessionStore,
    OverlayState,
};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

type PreviewHost = IntroHost<MemoryDocument, MemorySessionStore, ManualClock>;

/// Plays the intro lifecycle headlessly on a simulated clock.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML file with intro settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for particle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Page loads to simulate within one browser session
    #[arg(long, default_value_t = 2)]
    page_loads: u32,

    /// Dismiss the intro after this many seconds, like a skip button
    #[arg(long, value_parser = parse_seconds)]
    dismiss_after: Option<Duration>,

    /// Print the document HTML on every state change
    #[arg(long)]
    html: bool,

    /// Sleep between steps instead of running as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Check that a bundled logo exists under this directory
    #[arg(long)]
    asset_root: Option<PathBuf>,
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f32 = value.parse().map_err(|err| format!("not a number of seconds: {err}"))?;
    Duration::try_from_secs_f32(secs).map_err(|_| format!("{value} is not a usable number of seconds"))
}

pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => IntroConfig::load(path).with_context(|| format!("loading intro config from {}", path.display()))?,
        None => IntroConfig::default(),
    };

    if let Some(root) = &args.asset_root {
        match config.logo.bundled_path(root) {
            Some(path) if !path.is_file() => bail!("logo asset {} not found", path.display()),
            Some(path) => info!(path = %path.display(), "logo asset found"),
            None => info!(logo = %config.logo, "remote logo, availability not checked"),
        }
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, page_loads = args.page_loads, "starting preview session");

    let mut host: PreviewHost = IntroHost::new(
        config,
        MemoryDocument::new(),
        MemorySessionStore::new(),
        ManualClock::new(),
        seed,
    );

    info!(session_key = %host.config().session_key, title = %host.config().title, "intro configured");

    for load in 1..=args.page_loads {
        // Every navigation starts from a fresh document, the session store survives
        host.surface = MemoryDocument::new();

        let Some(mut overlay) = host.page_ready() else {
            info!(load, "intro already shown in this session");
            continue;
        };
        info!(load, "page ready, intro shown");
        play(&mut host, &mut overlay, &args);
    }

    Ok(())
}

fn play(host: &mut PreviewHost, overlay: &mut IntroOverlay<MemoryDocument>, args: &Args) {
    let dt = Duration::from_secs_f32(FRAME_TIME);
    let started = host.clock.now();
    let dismiss_at = args.dismiss_after.and_then(|after| started.checked_add(after));

    let mut last_state = overlay.state();
    report(host, last_state, started, args.html);

    // --- Main Loop ---
    loop {
        if overlay.next_deadline().is_none() {
            // Nothing scheduled anymore: removed, or never mounted
            break;
        }

        host.clock.advance(dt);

        if let Some(at) = dismiss_at {
            if host.clock.now() >= at && matches!(last_state, OverlayState::Showing | OverlayState::ParticlesActive) {
                info!("dismissed");
                host.hide_manual(overlay);
            }
        }

        let state = host.poll(overlay);
        if state != last_state {
            report(host, state, started, args.html);
            last_state = state;
        }

        if args.realtime {
            std::thread::sleep(dt);
        }
    }

    info!(visible = overlay.is_visible(), "intro finished");
}

fn report(host: &PreviewHost, state: OverlayState, started: Duration, html: bool) {
    let elapsed_ms = host.clock.now().saturating_sub(started).as_millis() as u64;
    let particles = host
        .surface
        .find_by_id(PARTICLES_ID)
        .map(|container| host.surface.children(container).len())
        .unwrap_or(0);
    let hiding = host
        .surface
        .find_by_id(ROOT_ID)
        .is_some_and(|root| host.surface.has_class(root, HIDING_CLASS));

    info!(elapsed_ms, %state, particles, hiding, "state");
    if html {
        println!("{}", host.surface.to_html());
    }
}
