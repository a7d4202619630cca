#![forbid(unsafe_code)]

//! Measurement seam between the drag controller and the host layout.

use std::cell::Cell;

use tabdeck_core::{Rect, Size};

/// One measurement of a collection surface, in viewport CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Bounds of the element that lays out the items.
    pub container: Rect,
    /// Bounds of the enclosing content panel, when drag-out is measured
    /// against something larger than the item container (the picker dialog).
    pub content: Option<Rect>,
    /// Viewport (`innerWidth` x `innerHeight`).
    pub viewport: Size,
    /// Transfer target bounds (the dock's switcher button).
    pub drop_zone: Option<Rect>,
}

impl SurfaceGeometry {
    /// Geometry with only a container and viewport.
    #[must_use]
    pub const fn new(container: Rect, viewport: Size) -> Self {
        Self {
            container,
            content: None,
            viewport,
            drop_zone: None,
        }
    }

    #[must_use]
    pub const fn with_content(mut self, content: Rect) -> Self {
        self.content = Some(content);
        self
    }

    #[must_use]
    pub const fn with_drop_zone(mut self, zone: Rect) -> Self {
        self.drop_zone = Some(zone);
        self
    }
}

/// Supplies live surface measurements.
///
/// Returning `None` means the surface is not laid out yet (detached, hidden,
/// or zero-sized); callers skip the update.
pub trait GeometryProvider {
    fn measure(&self) -> Option<SurfaceGeometry>;
}

/// Adapts a measuring closure into a [`GeometryProvider`].
pub struct FnGeometry<F>(pub F);

impl<F> GeometryProvider for FnGeometry<F>
where
    F: Fn() -> Option<SurfaceGeometry>,
{
    fn measure(&self) -> Option<SurfaceGeometry> {
        (self.0)()
    }
}

/// A provider whose geometry is set explicitly, for hosts that push
/// measurements and for tests.
#[derive(Debug, Default)]
pub struct StaticGeometry {
    current: Cell<Option<SurfaceGeometry>>,
}

impl StaticGeometry {
    #[must_use]
    pub fn new(geometry: SurfaceGeometry) -> Self {
        Self {
            current: Cell::new(Some(geometry)),
        }
    }

    /// A provider that reports no layout.
    #[must_use]
    pub fn unmeasured() -> Self {
        Self::default()
    }

    /// Replace the reported geometry.
    pub fn set(&self, geometry: Option<SurfaceGeometry>) {
        self.current.set(geometry);
    }
}

impl GeometryProvider for StaticGeometry {
    fn measure(&self) -> Option<SurfaceGeometry> {
        self.current.get()
    }
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for std::rc::Rc<G> {
    fn measure(&self) -> Option<SurfaceGeometry> {
        (**self).measure()
    }
}
