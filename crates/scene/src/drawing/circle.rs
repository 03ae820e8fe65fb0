use foundation::Point;
use foundation::math::distance_meters;

use super::{Drawer, MapEvent, Preview, Step};
use crate::region::Region;

/// Center-then-radius circle gesture.
///
/// Transition contract:
/// - `Idle` / `Finalized` + click: new center, enter `Centered`.
/// - `Centered` + move: radius preview follows the pointer.
/// - `Centered` + click: radius is the distance to the click; finalize.
///   A click on the center itself (zero radius) is ignored.
/// - Right-click from any state: back to `Idle`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CircleDrawer {
    #[default]
    Idle,
    Centered {
        center: Point,
        pointer: Option<Point>,
    },
    Finalized,
}

impl Drawer for CircleDrawer {
    fn step(self, event: MapEvent) -> Step<Self> {
        match (self, event) {
            (_, MapEvent::ContextMenu) => Step::stay(Self::Idle),
            (Self::Idle | Self::Finalized, MapEvent::Click(center)) => Step::stay(Self::Centered {
                center,
                pointer: None,
            }),
            (Self::Centered { center, .. }, MapEvent::PointerMove(p)) => {
                Step::stay(Self::Centered {
                    center,
                    pointer: Some(p),
                })
            }
            (Self::Centered { center, pointer }, MapEvent::Click(edge)) => {
                match Region::circle(center, distance_meters(center, edge)) {
                    Ok(region) => Step::finalize(Self::Finalized, region),
                    Err(_) => Step::stay(Self::Centered { center, pointer }),
                }
            }
            (state, _) => Step::stay(state),
        }
    }

    fn preview(&self) -> Preview {
        match self {
            Self::Centered { center, pointer } => Preview::Circle {
                center: *center,
                radius_m: pointer.map_or(0.0, |p| distance_meters(*center, p)),
            },
            _ => Preview::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CircleDrawer;
    use crate::drawing::{Drawer, MapEvent, Preview};
    use crate::region::Shape;
    use foundation::Point;
    use foundation::math::{distance_meters, offset_north};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn second_click_sets_radius() {
        let center = Point::new(0.0, 0.0);
        let edge = offset_north(center, 1000.0);

        let s = CircleDrawer::Idle.step(MapEvent::Click(center));
        assert!(s.region.is_none());
        let s = s.state.step(MapEvent::Click(edge));
        assert_eq!(s.state, CircleDrawer::Finalized);

        let region = s.region.unwrap();
        let Shape::Circle { center: c, radius_m } = region.shape() else {
            panic!("expected circle");
        };
        assert_eq!(*c, center);
        assert_close(*radius_m, distance_meters(center, edge), 1e-9);
        assert_close(*radius_m, 1000.0, 1e-6);
    }

    #[test]
    fn pointer_move_previews_radius() {
        let center = Point::new(10.0, 10.0);
        let p = Point::new(10.0, 10.5);
        let s = CircleDrawer::Idle.step(MapEvent::Click(center));
        assert_eq!(
            s.state.preview(),
            Preview::Circle {
                center,
                radius_m: 0.0
            }
        );
        let s = s.state.step(MapEvent::PointerMove(p));
        let Preview::Circle { radius_m, .. } = s.state.preview() else {
            panic!("expected circle preview");
        };
        assert_close(radius_m, distance_meters(center, p), 1e-9);
        assert!(s.region.is_none());
    }

    #[test]
    fn right_click_resets() {
        let s = CircleDrawer::Idle.step(MapEvent::Click(Point::new(1.0, 1.0)));
        let s = s.state.step(MapEvent::ContextMenu);
        assert_eq!(s.state, CircleDrawer::Idle);
        assert_eq!(s.state.preview(), Preview::None);
    }

    #[test]
    fn click_on_center_is_ignored() {
        let c = Point::new(1.0, 1.0);
        let s = CircleDrawer::Idle.step(MapEvent::Click(c));
        let s = s.state.step(MapEvent::Click(c));
        assert!(s.region.is_none());
        assert!(matches!(s.state, CircleDrawer::Centered { .. }));
    }

    #[test]
    fn click_after_finalize_starts_new_circle() {
        let s = CircleDrawer::Finalized.step(MapEvent::Click(Point::new(5.0, 5.0)));
        assert_eq!(
            s.state,
            CircleDrawer::Centered {
                center: Point::new(5.0, 5.0),
                pointer: None
            }
        );
    }
}
