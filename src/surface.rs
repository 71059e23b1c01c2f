use crate::markup::Element;

/// Node handles returned by [`Surface::mount`]. The overlay owns both for the
/// rest of its lifecycle instead of looking them up by id again.
#[derive(Debug, Clone, PartialEq)]
pub struct Mounted<H> {
    pub root: H,
    pub particles: Option<H>,
}

/// The document the overlay renders into.
pub trait Surface {
    type Handle: Clone;

    /// Inserts `root` as the first child of the document body. `None` when there is no body.
    fn mount(&mut self, root: &Element, particles_id: &str) -> Option<Mounted<Self::Handle>>;
    fn append(&mut self, parent: &Self::Handle, child: &Element);
    fn add_class(&mut self, node: &Self::Handle, class: &str);
    /// Removes `node` from its parent. Returns false if it was already detached.
    fn detach(&mut self, node: &Self::Handle) -> bool;
    fn is_attached(&self, node: &Self::Handle) -> bool;
}
