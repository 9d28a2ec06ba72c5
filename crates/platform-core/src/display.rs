//! Display enumeration and the read-only topology snapshot.

use std::fmt;

use cursorhome_common::error::CursorHomeResult;
use cursorhome_model::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Stable identifier of a display within one topology snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisplayId(pub u32);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display-{}", self.0)
    }
}

/// Information about a connected display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub id: DisplayId,
    /// Connector or monitor name, for logs.
    pub name: String,
    /// Position and size in the virtual desktop (pixels).
    pub bounds: Rect,
    /// Scale factor (for example 1.0, 1.25, 2.0).
    pub scale_factor: f64,
    /// Whether this display is primary.
    pub primary: bool,
}

impl DisplaySnapshot {
    pub fn new(id: u32, name: impl Into<String>, bounds: Rect, primary: bool) -> Self {
        Self {
            id: DisplayId(id),
            name: name.into(),
            bounds,
            scale_factor: 1.0,
            primary,
        }
    }

    /// The center point of this display.
    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Check if a point is within this display.
    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }
}

/// Source of display information.
pub trait DisplayProvider {
    /// Enumerate the currently connected displays.
    fn enumerate_displays(&self) -> CursorHomeResult<Vec<DisplaySnapshot>>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// A fixed display layout, for tests, simulations, and platforms that
/// cannot enumerate monitors.
#[derive(Debug, Clone)]
pub struct StaticDisplays {
    displays: Vec<DisplaySnapshot>,
}

impl StaticDisplays {
    pub fn new(displays: Vec<DisplaySnapshot>) -> Self {
        Self { displays }
    }

    /// A single 1920x1080 primary display at the origin.
    pub fn single_1080p() -> Self {
        Self::new(vec![DisplaySnapshot::new(
            0,
            "default",
            Rect::new(0.0, 0.0, 1920.0, 1080.0),
            true,
        )])
    }
}

impl DisplayProvider for StaticDisplays {
    fn enumerate_displays(&self) -> CursorHomeResult<Vec<DisplaySnapshot>> {
        Ok(self.displays.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Read-only snapshot of the display layout.
///
/// Replaced wholesale when the display configuration changes; never
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayTopology {
    displays: Vec<DisplaySnapshot>,
}

impl DisplayTopology {
    pub fn new(displays: Vec<DisplaySnapshot>) -> Self {
        Self { displays }
    }

    /// Build a topology from a provider, logging the layout.
    pub fn from_provider(provider: &dyn DisplayProvider) -> CursorHomeResult<Self> {
        let displays = provider.enumerate_displays()?;
        tracing::info!(
            backend = provider.name(),
            count = displays.len(),
            "Found displays"
        );
        for snapshot in &displays {
            tracing::debug!(
                id = %snapshot.id,
                name = %snapshot.name,
                x = snapshot.bounds.x,
                y = snapshot.bounds.y,
                width = snapshot.bounds.width,
                height = snapshot.bounds.height,
                primary = snapshot.primary,
                "Display"
            );
        }
        Ok(Self::new(displays))
    }

    /// Get all displays.
    pub fn displays(&self) -> &[DisplaySnapshot] {
        &self.displays
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    /// Get a display by id.
    pub fn get(&self, id: DisplayId) -> Option<&DisplaySnapshot> {
        self.displays.iter().find(|d| d.id == id)
    }

    /// The primary display, or the first one if none is flagged.
    pub fn primary(&self) -> Option<&DisplaySnapshot> {
        self.displays
            .iter()
            .find(|d| d.primary)
            .or(self.displays.first())
    }

    /// Find which display contains a point.
    pub fn display_containing(&self, point: Point) -> Option<DisplayId> {
        self.displays
            .iter()
            .find(|d| d.contains(point))
            .map(|d| d.id)
    }

    /// Bounds of every display, for edge tests.
    pub fn bounds(&self) -> Vec<Rect> {
        self.displays.iter().map(|d| d.bounds).collect()
    }

    /// Bounds that include all connected displays.
    pub fn virtual_desktop_bounds(&self) -> Rect {
        self.displays
            .iter()
            .map(|d| d.bounds)
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or(Rect::new(0.0, 0.0, 1920.0, 1080.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dual_layout() -> DisplayTopology {
        DisplayTopology::new(vec![
            DisplaySnapshot::new(1, "left", Rect::new(-1920.0, 0.0, 1920.0, 1080.0), false),
            DisplaySnapshot::new(0, "main", Rect::new(0.0, 0.0, 2560.0, 1440.0), true),
        ])
    }

    #[test]
    fn display_containing_resolves_each_side_of_the_seam() {
        let topology = dual_layout();
        assert_eq!(
            topology.display_containing(Point::new(-1.0, 10.0)),
            Some(DisplayId(1))
        );
        assert_eq!(
            topology.display_containing(Point::new(0.0, 10.0)),
            Some(DisplayId(0))
        );
        assert_eq!(topology.display_containing(Point::new(-10.0, 1200.0)), None);
    }

    #[test]
    fn primary_prefers_flag_then_first() {
        let topology = dual_layout();
        assert_eq!(topology.primary().map(|d| d.id), Some(DisplayId(0)));

        let unflagged = DisplayTopology::new(vec![DisplaySnapshot::new(
            7,
            "only",
            Rect::new(0.0, 0.0, 800.0, 600.0),
            false,
        )]);
        assert_eq!(unflagged.primary().map(|d| d.id), Some(DisplayId(7)));
        assert!(DisplayTopology::default().primary().is_none());
    }

    #[test]
    fn virtual_bounds_cover_negative_origin_layout() {
        let bounds = dual_layout().virtual_desktop_bounds();
        assert_eq!(bounds, Rect::new(-1920.0, 0.0, 4480.0, 1440.0));
    }

    #[test]
    fn from_provider_logs_every_display() {
        cursorhome_common::logging::init_test_logging();
        let provider = StaticDisplays::new(dual_layout().displays().to_vec());
        let topology = DisplayTopology::from_provider(&provider).unwrap();
        assert_eq!(topology, dual_layout());
    }

    #[test]
    fn static_provider_feeds_topology() {
        let topology = DisplayTopology::from_provider(&StaticDisplays::single_1080p()).unwrap();
        assert_eq!(topology.displays().len(), 1);
        assert_eq!(
            topology.primary().map(|d| d.center()),
            Some(Point::new(960.0, 540.0))
        );
    }
}
