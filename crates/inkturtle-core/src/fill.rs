//! Fill outline accumulation.
//!
//! BEGIN_FILL opens exactly one builder per canvas; pen-down lines and
//! arcs drawn while it is open extend the outline, and END_FILL closes it
//! into a single filled region.

use crate::color::Rgba;
use kurbo::{Arc, BezPath, PathEl, Point, SvgArc, Vec2};

/// An in-progress fill outline.
#[derive(Debug, Clone, PartialEq)]
pub struct FillBuilder {
    path: BezPath,
    color: Rgba,
    /// Outline segments appended so far (excluding the seed move).
    segments: usize,
}

impl FillBuilder {
    /// Open an outline seeded at `start`, filled with `color`.
    pub fn open(start: Point, color: Rgba) -> Self {
        let mut path = BezPath::new();
        path.move_to(start);
        Self {
            path,
            color,
            segments: 0,
        }
    }

    /// Append a straight segment.
    pub fn line_to(&mut self, to: Point) {
        self.path.line_to(to);
        self.segments += 1;
    }

    /// Append an arc segment.
    pub fn arc_to(&mut self, from: Point, to: Point, radius: f64, large_arc: bool, sweep: bool) {
        self.path.extend(arc_between(from, to, radius, large_arc, sweep));
        self.segments += 1;
    }

    /// Number of outline segments appended so far.
    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Close the outline and hand back the finished path.
    pub fn close(mut self) -> (BezPath, Rgba) {
        self.path.close_path();
        (self.path, self.color)
    }
}

/// Path elements for a two-endpoint arc, SVG `A`-segment semantics.
///
/// Degenerate inputs (coincident endpoints, zero radius) fall back to a
/// straight segment, matching how an SVG renderer treats them.
pub fn arc_between(from: Point, to: Point, radius: f64, large_arc: bool, sweep: bool) -> BezPath {
    let svg_arc = SvgArc {
        from,
        to,
        radii: Vec2::new(radius, radius),
        x_rotation: 0.0,
        large_arc,
        sweep,
    };
    let mut path = BezPath::new();
    match Arc::from_svg_arc(&svg_arc) {
        Some(arc) => path.extend(arc.append_iter(0.1)),
        // `BezPath::line_to` debug-asserts on a path with no seed MoveTo;
        // these elements are spliced into a caller path that has one.
        None => path.extend([PathEl::LineTo(to)]),
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{PathEl, Shape};

    #[test]
    fn test_outline_accumulates_and_closes() {
        let mut fill = FillBuilder::open(Point::new(0.0, 0.0), Rgba::black());
        fill.line_to(Point::new(100.0, 0.0));
        fill.line_to(Point::new(100.0, 100.0));
        assert_eq!(fill.segments(), 2);

        let (path, color) = fill.close();
        assert_eq!(color, Rgba::black());
        let els: Vec<PathEl> = path.elements().to_vec();
        assert!(matches!(els.first(), Some(PathEl::MoveTo(_))));
        assert!(matches!(els.last(), Some(PathEl::ClosePath)));
        // seed move + two lines + close
        assert_eq!(els.len(), 4);
    }

    #[test]
    fn test_arc_between_endpoints() {
        let from = Point::new(0.0, 0.0);
        let mut path = BezPath::new();
        path.move_to(from);
        path.extend(arc_between(from, Point::new(10.0, 0.0), 5.0, false, true));
        assert!(path.elements().len() > 1);
        // A half-circle of radius 5 bulges about 5 units off the chord.
        let bbox = path.bounding_box();
        assert!(bbox.height() > 3.0);
    }

    #[test]
    fn test_degenerate_arc_is_a_segment() {
        let path = arc_between(Point::new(5.0, 5.0), Point::new(5.0, 5.0), 3.0, false, true);
        assert_eq!(path.elements().len(), 1);
        assert!(matches!(path.elements()[0], PathEl::LineTo(_)));
    }
}
