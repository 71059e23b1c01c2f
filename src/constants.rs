use std::time::Duration;

pub const PARTICLE_DELAY: Duration = Duration::from_millis(500);     // show() -> particles appended
pub const DISPLAY_DURATION: Duration = Duration::from_millis(5000);  // show() -> hide sequence starts
pub const FADE_OUT_DURATION: Duration = Duration::from_millis(1000); // hide() -> root detached

pub const PARTICLE_COUNT: usize = 50;
pub const PARTICLE_LEFT_RANGE: std::ops::Range<f32> = 0.0..100.0;    // percent of container width
pub const PARTICLE_DELAY_RANGE: std::ops::Range<f32> = 0.0..6.0;     // seconds
pub const PARTICLE_DURATION_RANGE: std::ops::Range<f32> = 3.0..6.0;  // seconds

// Markup contract shared with the external stylesheet
pub const ROOT_ID: &str = "ultraman-intro";
pub const ROOT_CLASS: &str = "ultraman-intro";
pub const PARTICLES_ID: &str = "particles";
pub const PARTICLE_CLASS: &str = "particle";
pub const HIDING_CLASS: &str = "hide-intro";

pub const SESSION_KEY: &str = "ultraman-intro-shown";
pub const SESSION_FLAG_VALUE: &str = "true";

pub const FPS: u32 = 60;                      // Preview steps per simulated second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per step (seconds)
