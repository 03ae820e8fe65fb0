use tracing::debug;

use crate::drawing::{
    CircleDrawer, DrawNotice, Drawer, MapEvent, MarkerDrawer, PolygonDrawer, Preview,
    RectangleDrawer, Step,
};
use crate::region::Region;

/// Drawing tool chosen by the user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    None,
    Marker,
    Circle,
    Rectangle,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum ActiveDrawer {
    #[default]
    None,
    Marker(MarkerDrawer),
    Circle(CircleDrawer),
    Rectangle(RectangleDrawer),
    Polygon(PolygonDrawer),
}

impl ActiveDrawer {
    fn fresh(tool: Tool) -> Self {
        match tool {
            Tool::None => Self::None,
            Tool::Marker => Self::Marker(MarkerDrawer),
            Tool::Circle => Self::Circle(CircleDrawer::default()),
            Tool::Rectangle => Self::Rectangle(RectangleDrawer::default()),
            Tool::Polygon => Self::Polygon(PolygonDrawer::default()),
        }
    }

    fn step(self, event: MapEvent) -> Step<Self> {
        fn lift<D>(step: Step<D>, wrap: fn(D) -> ActiveDrawer) -> Step<ActiveDrawer> {
            Step {
                state: wrap(step.state),
                region: step.region,
                notice: step.notice,
            }
        }

        match self {
            Self::None => Step::stay(Self::None),
            Self::Marker(d) => lift(d.step(event), Self::Marker),
            Self::Circle(d) => lift(d.step(event), Self::Circle),
            Self::Rectangle(d) => lift(d.step(event), Self::Rectangle),
            Self::Polygon(d) => lift(d.step(event), Self::Polygon),
        }
    }

    fn preview(&self) -> Preview {
        match self {
            Self::None => Preview::None,
            Self::Marker(d) => d.preview(),
            Self::Circle(d) => d.preview(),
            Self::Rectangle(d) => d.preview(),
            Self::Polygon(d) => d.preview(),
        }
    }
}

/// What a single map event produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionOutcome {
    pub region: Option<Region>,
    pub notice: Option<DrawNotice>,
}

type RegionListener = Box<dyn FnMut(&Region)>;

/// Owns the active tool and its drawer, forwards map events, and keeps the
/// last finalized region.
///
/// Switching tools always discards in-progress drawing state. The last
/// finalized region survives tool switches and is dropped only by
/// [`SelectionController::reset`] or replaced by a newer region.
#[derive(Default)]
pub struct SelectionController {
    tool: Tool,
    drawer: ActiveDrawer,
    region: Option<Region>,
    listeners: Vec<RegionListener>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Activates `tool` with a fresh drawer, even if it is already active.
    pub fn set_tool(&mut self, tool: Tool) {
        debug!(from = ?self.tool, to = ?tool, "drawing tool changed");
        self.tool = tool;
        self.drawer = ActiveDrawer::fresh(tool);
    }

    /// Registers a callback invoked with every finalized region.
    pub fn on_region_finalized(&mut self, listener: impl FnMut(&Region) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn handle(&mut self, event: MapEvent) -> SelectionOutcome {
        let step = std::mem::take(&mut self.drawer).step(event);
        self.drawer = step.state;

        if let Some(notice) = step.notice {
            debug!(tool = ?self.tool, %notice, "drawing notice");
        }
        if let Some(region) = &step.region {
            let center = region.center();
            debug!(
                kind = region.kind().as_str(),
                lat = center.lat,
                lon = center.lon,
                area_km2 = region.area_km2(),
                "region finalized"
            );
            for listener in &mut self.listeners {
                listener(region);
            }
            self.region = Some(region.clone());
        }

        SelectionOutcome {
            region: step.region,
            notice: step.notice,
        }
    }

    pub fn preview(&self) -> Preview {
        self.drawer.preview()
    }

    /// Last finalized region, if any.
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Clears both the in-progress drawing and the last finalized region.
    pub fn reset(&mut self) {
        self.drawer = ActiveDrawer::fresh(self.tool);
        self.region = None;
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("tool", &self.tool)
            .field("drawer", &self.drawer)
            .field("region", &self.region)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionController, Tool};
    use crate::drawing::{MapEvent, Preview};
    use crate::region::ShapeKind;
    use foundation::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn no_tool_ignores_events() {
        let mut c = SelectionController::new();
        let out = c.handle(MapEvent::Click(Point::new(1.0, 1.0)));
        assert!(out.region.is_none());
        assert!(c.region().is_none());
    }

    #[test]
    fn finalized_region_is_kept_and_broadcast() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut c = SelectionController::new();
        let sink = Rc::clone(&seen);
        c.on_region_finalized(move |r| sink.borrow_mut().push(r.kind()));

        c.set_tool(Tool::Rectangle);
        c.handle(MapEvent::Click(Point::new(0.0, 0.0)));
        let out = c.handle(MapEvent::Click(Point::new(1.0, 1.0)));

        assert_eq!(out.region.as_ref().map(|r| r.kind()), Some(ShapeKind::Rectangle));
        assert_eq!(c.region().map(|r| r.kind()), Some(ShapeKind::Rectangle));
        assert_eq!(*seen.borrow(), vec![ShapeKind::Rectangle]);
    }

    #[test]
    fn switching_tools_discards_in_progress_state() {
        let mut c = SelectionController::new();
        c.set_tool(Tool::Polygon);
        c.handle(MapEvent::Click(Point::new(0.0, 0.0)));
        c.handle(MapEvent::Click(Point::new(1.0, 0.0)));
        assert!(matches!(c.preview(), Preview::Polygon(_)));

        c.set_tool(Tool::Circle);
        assert_eq!(c.preview(), Preview::None);

        c.set_tool(Tool::Polygon);
        assert_eq!(c.preview(), Preview::None);
        c.handle(MapEvent::Click(Point::new(5.0, 5.0)));
        assert_eq!(c.preview(), Preview::Polygon(vec![Point::new(5.0, 5.0)]));
    }

    #[test]
    fn region_survives_tool_switch_until_reset() {
        let mut c = SelectionController::new();
        c.set_tool(Tool::Marker);
        c.handle(MapEvent::Click(Point::new(41.0, 29.0)));
        c.set_tool(Tool::Circle);
        assert_eq!(c.region().map(|r| r.center()), Some(Point::new(41.0, 29.0)));
        c.reset();
        assert!(c.region().is_none());
        assert_eq!(c.tool(), Tool::Circle);
    }

    #[test]
    fn newer_region_replaces_older() {
        let mut c = SelectionController::new();
        c.set_tool(Tool::Marker);
        c.handle(MapEvent::Click(Point::new(1.0, 1.0)));
        c.handle(MapEvent::Click(Point::new(2.0, 2.0)));
        assert_eq!(c.region().map(|r| r.center()), Some(Point::new(2.0, 2.0)));
    }
}
