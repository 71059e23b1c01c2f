#[cfg(not(target_arch = "wasm32"))]
mod preview;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    preview::run()
}

// The browser build runs from the library's wasm start function
#[cfg(target_arch = "wasm32")]
fn main() {}
