#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OverlayState {
    Idle,            // Constructed, nothing mounted yet
    Showing,         // Root mounted, waiting for particles
    ParticlesActive, // Particles spawned, waiting for auto-hide
    Hiding,          // Fade-out class applied, waiting for removal
    Removed,         // Root detached, instance is done
}

impl OverlayState {
    /// Whether the overlay currently owns a root node in the document.
    pub fn is_mounted(self) -> bool {
        matches!(self, Self::Showing | Self::ParticlesActive | Self::Hiding)
    }
}

impl std::fmt::Display for OverlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Showing => "showing",
            Self::ParticlesActive => "particles-active",
            Self::Hiding => "hiding",
            Self::Removed => "removed",
        };
        f.write_str(name)
    }
}
