use foundation::{GeoBounds, Point};

use super::{Drawer, MapEvent, Preview, Step};
use crate::region::Region;

/// Two-corner rectangle gesture. Click order does not affect the result.
///
/// A second click that would produce a zero-area box is ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RectangleDrawer {
    #[default]
    Idle,
    Anchored {
        anchor: Point,
        pointer: Option<Point>,
    },
    Finalized,
}

impl Drawer for RectangleDrawer {
    fn step(self, event: MapEvent) -> Step<Self> {
        match (self, event) {
            (_, MapEvent::ContextMenu) => Step::stay(Self::Idle),
            (Self::Idle | Self::Finalized, MapEvent::Click(anchor)) => {
                Step::stay(Self::Anchored {
                    anchor,
                    pointer: None,
                })
            }
            (Self::Anchored { anchor, .. }, MapEvent::PointerMove(p)) => {
                Step::stay(Self::Anchored {
                    anchor,
                    pointer: Some(p),
                })
            }
            (Self::Anchored { anchor, pointer }, MapEvent::Click(opposite)) => {
                match Region::rectangle(anchor, opposite) {
                    Ok(region) => Step::finalize(Self::Finalized, region),
                    Err(_) => Step::stay(Self::Anchored { anchor, pointer }),
                }
            }
            (state, _) => Step::stay(state),
        }
    }

    fn preview(&self) -> Preview {
        match self {
            Self::Anchored { anchor, pointer } => {
                Preview::Rectangle(GeoBounds::from_corners(*anchor, pointer.unwrap_or(*anchor)))
            }
            _ => Preview::None,
        }
    }
}
