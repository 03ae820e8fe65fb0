//! Pointer-gesture state machines that turn map input into a [`Region`].
//!
//! Each drawer is a plain value transitioned by [`Drawer::step`], a pure
//! reducer `(state, event) -> (state, finalized region, notice)`. Live
//! rendering state is read separately through [`Drawer::preview`].

pub mod circle;
pub mod marker;
pub mod polygon;
pub mod rectangle;

pub use circle::*;
pub use marker::*;
pub use polygon::*;
pub use rectangle::*;

use foundation::{GeoBounds, Point};

use crate::region::Region;

/// Pointer input forwarded from the map surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MapEvent {
    Click(Point),
    PointerMove(Point),
    /// Right-click.
    ContextMenu,
    DoubleClick(Point),
}

/// User-visible feedback that does not change drawer state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawNotice {
    PointLimitReached { max: usize },
}

impl std::fmt::Display for DrawNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PointLimitReached { max } => write!(f, "maximum of {max} points reached"),
        }
    }
}

/// Transient in-progress geometry for live rendering. Never a final input.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Preview {
    #[default]
    None,
    Circle { center: Point, radius_m: f64 },
    Rectangle(GeoBounds),
    /// Committed working vertices followed by the live pointer, if any.
    Polygon(Vec<Point>),
}

/// Result of one reducer step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    pub state: S,
    pub region: Option<Region>,
    pub notice: Option<DrawNotice>,
}

impl<S> Step<S> {
    pub fn stay(state: S) -> Self {
        Self {
            state,
            region: None,
            notice: None,
        }
    }

    pub fn finalize(state: S, region: Region) -> Self {
        Self {
            state,
            region: Some(region),
            notice: None,
        }
    }

    pub fn notice(state: S, notice: DrawNotice) -> Self {
        Self {
            state,
            region: None,
            notice: Some(notice),
        }
    }
}

/// A per-shape gesture state machine.
pub trait Drawer: Sized + Default {
    fn step(self, event: MapEvent) -> Step<Self>;

    fn preview(&self) -> Preview;
}
