//! Render target
//!
//! The core never paints. It tells the rendering side which regions went
//! stale and leaves scheduling of the actual paint to the renderer.

use crate::core::Point;

/// Sink for paint invalidations
///
/// Calls are fire-and-forget and happen while the terminal's write lock is
/// held, so implementations must not block or call back into the terminal.
pub trait RenderTarget: Send + Sync {
    /// Everything on screen is stale (the viewport moved or rows were evicted)
    fn trigger_redraw_all(&self);

    /// The cursor moved to `position`
    fn trigger_redraw_cursor(&self, position: Point);
}

/// A render target that discards every invalidation
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderTarget;

impl RenderTarget for NullRenderTarget {
    fn trigger_redraw_all(&self) {}

    fn trigger_redraw_cursor(&self, _position: Point) {}
}
