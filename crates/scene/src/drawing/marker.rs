use super::{Drawer, MapEvent, Preview, Step};
use crate::region::Region;

/// Single-click marker placement. Every click finalizes a new marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MarkerDrawer;

impl Drawer for MarkerDrawer {
    fn step(self, event: MapEvent) -> Step<Self> {
        match event {
            MapEvent::Click(p) => Step::finalize(self, Region::marker(p)),
            _ => Step::stay(self),
        }
    }

    fn preview(&self) -> Preview {
        Preview::None
    }
}

#[cfg(test)]
mod tests {
    use super::MarkerDrawer;
    use crate::drawing::{Drawer, MapEvent};
    use foundation::Point;

    #[test]
    fn each_click_replaces_marker() {
        let d = MarkerDrawer;
        let s1 = d.step(MapEvent::Click(Point::new(1.0, 2.0)));
        assert_eq!(s1.region.unwrap().center(), Point::new(1.0, 2.0));
        let s2 = s1.state.step(MapEvent::Click(Point::new(3.0, 4.0)));
        assert_eq!(s2.region.unwrap().center(), Point::new(3.0, 4.0));
    }

    #[test]
    fn other_events_do_nothing() {
        let d = MarkerDrawer;
        assert!(d.step(MapEvent::ContextMenu).region.is_none());
        assert!(
            d.step(MapEvent::PointerMove(Point::new(0.0, 0.0)))
                .region
                .is_none()
        );
    }
}
