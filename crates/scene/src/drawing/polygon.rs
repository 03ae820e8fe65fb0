use foundation::Point;
use foundation::math::convex_hull;

use super::{DrawNotice, Drawer, MapEvent, Preview, Step};
use crate::region::Region;

/// Maximum number of clicks a polygon gesture accepts.
pub const MAX_POLYGON_POINTS: usize = 8;

/// Click-to-add polygon gesture that always keeps a convex working shape.
///
/// Transition contract:
/// - Click appends to `clicks` while fewer than [`MAX_POLYGON_POINTS`] exist;
///   once 3+ clicks exist `vertices` is the hull recomputed from all clicks.
///   A click at the cap emits [`DrawNotice::PointLimitReached`] and changes
///   nothing.
/// - Right-click finalizes when the working hull has 3+ vertices, otherwise
///   discards everything and returns to `Idle`.
/// - Double-click finalizes when 2+ clicks exist and the hull is closable.
///   Its own coordinate is never added.
/// - Pointer moves only touch the preview.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PolygonDrawer {
    #[default]
    Idle,
    Collecting {
        clicks: Vec<Point>,
        vertices: Vec<Point>,
        pointer: Option<Point>,
    },
    Finalized,
}

impl PolygonDrawer {
    fn collecting(clicks: Vec<Point>, pointer: Option<Point>) -> Self {
        let vertices = if clicks.len() >= 3 {
            convex_hull(&clicks)
        } else {
            clicks.clone()
        };
        Self::Collecting {
            clicks,
            vertices,
            pointer,
        }
    }

    /// Number of committed clicks.
    pub fn point_count(&self) -> usize {
        match self {
            Self::Collecting { clicks, .. } => clicks.len(),
            _ => 0,
        }
    }

    /// Current working vertex set (convex once 3+ clicks exist).
    pub fn vertices(&self) -> &[Point] {
        match self {
            Self::Collecting { vertices, .. } => vertices,
            _ => &[],
        }
    }
}

impl Drawer for PolygonDrawer {
    fn step(self, event: MapEvent) -> Step<Self> {
        match (self, event) {
            (Self::Idle | Self::Finalized, MapEvent::Click(p)) => {
                Step::stay(Self::collecting(vec![p], None))
            }
            (Self::Idle | Self::Finalized, MapEvent::ContextMenu) => Step::stay(Self::Idle),
            (
                Self::Collecting {
                    mut clicks,
                    vertices,
                    pointer,
                },
                MapEvent::Click(p),
            ) => {
                if clicks.len() >= MAX_POLYGON_POINTS {
                    let state = Self::Collecting {
                        clicks,
                        vertices,
                        pointer,
                    };
                    return Step::notice(
                        state,
                        DrawNotice::PointLimitReached {
                            max: MAX_POLYGON_POINTS,
                        },
                    );
                }
                clicks.push(p);
                Step::stay(Self::collecting(clicks, pointer))
            }
            (Self::Collecting { clicks, vertices, .. }, MapEvent::PointerMove(p)) => {
                Step::stay(Self::Collecting {
                    clicks,
                    vertices,
                    pointer: Some(p),
                })
            }
            (Self::Collecting { clicks, vertices, .. }, MapEvent::ContextMenu) => {
                if clicks.len() < 3 {
                    return Step::stay(Self::Idle);
                }
                match Region::polygon(&vertices) {
                    Ok(region) => Step::finalize(Self::Finalized, region),
                    Err(_) => Step::stay(Self::Idle),
                }
            }
            (
                Self::Collecting {
                    clicks,
                    vertices,
                    pointer,
                },
                MapEvent::DoubleClick(_),
            ) => {
                if clicks.len() >= 2 {
                    if let Ok(region) = Region::polygon(&vertices) {
                        return Step::finalize(Self::Finalized, region);
                    }
                }
                Step::stay(Self::Collecting {
                    clicks,
                    vertices,
                    pointer,
                })
            }
            (state, _) => Step::stay(state),
        }
    }

    fn preview(&self) -> Preview {
        match self {
            Self::Collecting { vertices, pointer, .. } => {
                let mut tentative = vertices.clone();
                tentative.extend(pointer.iter().copied());
                Preview::Polygon(tentative)
            }
            _ => Preview::None,
        }
    }
}
