use thiserror::Error;

/// Failure inside the rendering collaborator, typically while decoding
/// fetched bytes into a displayable image.
#[derive(Debug, Clone, Error)]
#[error("rendering surface error: {0}")]
pub struct SurfaceError(pub String);

/// The external image-rendering collaborator.
///
/// Everything pixel-related lives behind this trait: codec work, canvas/GPU
/// rendering and window/level math are the collaborator's business. The
/// session consumes these operations and exposes nothing back.
pub trait RenderingSurface {
    type Image;

    /// Prepare the surface for display. Called once per viewing session.
    fn enable(&mut self);

    /// Decode fetched bytes into a displayable image.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, SurfaceError>;

    /// Show a decoded image on the surface.
    fn display(&mut self, image: Self::Image);

    /// Reset pan/zoom state, e.g. after the stack order changes.
    fn reset_view(&mut self);

    /// Update the on-screen "current / total" position indicator.
    fn set_position_indicator(&mut self, current: usize, total: usize);
}
