//! Live per-turtle visual state.

use crate::action::TurtleAction;
use crate::color::Rgba;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Latest full visual state for one turtle, used for live-sprite and stamp
/// rendering. Rebuilt from the action stream; never authoritative for
/// movement (the interpreter's position map is).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurtleVisual {
    /// Sprite center on the canvas.
    pub position: Point,
    /// Heading in degrees, turtle convention (0 = east).
    pub heading: f64,
    /// Whether the live sprite is drawn at all.
    pub show: bool,
    /// Shape name or resource key; empty string is the default turtle.
    pub shape: String,
    /// Fill color.
    pub color: Rgba,
    /// Outline color.
    pub pencolor: Rgba,
    /// Outline width.
    pub penoutlinewidth: f64,
    /// Stretch factors `[sx, sy]`.
    pub penstretchfactor: [f64; 2],
}

impl TurtleVisual {
    /// Initial state for a turtle first seen at `home` (canvas center).
    pub fn at_home(home: Point) -> Self {
        Self {
            position: home,
            heading: 0.0,
            show: true,
            shape: String::new(),
            color: Rgba::black(),
            pencolor: Rgba::black(),
            penoutlinewidth: 1.0,
            penstretchfactor: [1.0, 1.0],
        }
    }

    /// Absorb the visual fields carried by an action.
    pub fn update_from(&mut self, action: &TurtleAction) {
        if let Some(point) = action.point() {
            self.position = point;
        }
        self.heading = action.heading;
        self.show = action.show;
        self.shape = action.shape.clone();
        self.color = Rgba::parse(&action.color);
        self.pencolor = Rgba::parse(&action.pencolor);
        self.penoutlinewidth = action.penoutlinewidth;
        self.penstretchfactor = action.penstretchfactor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;

    #[test]
    fn test_home_defaults() {
        let visual = TurtleVisual::at_home(Point::new(400.0, 250.0));
        assert_eq!(visual.position, Point::new(400.0, 250.0));
        assert_eq!(visual.heading, 0.0);
        assert!(visual.show);
        assert_eq!(visual.shape, "");
    }

    #[test]
    fn test_update_absorbs_action_fields() {
        let mut visual = TurtleVisual::at_home(Point::ZERO);
        let action = TurtleAction::new("t1", ActionKind::UpdateState)
            .at(10.0, 20.0)
            .with_shape("square")
            .with_pencolor("red");
        let action = TurtleAction {
            heading: 45.0,
            penstretchfactor: [2.0, 2.0],
            show: false,
            ..action
        };
        visual.update_from(&action);
        assert_eq!(visual.position, Point::new(10.0, 20.0));
        assert_eq!(visual.heading, 45.0);
        assert_eq!(visual.shape, "square");
        assert_eq!(visual.pencolor, Rgba::new(255, 0, 0, 255));
        assert_eq!(visual.penstretchfactor, [2.0, 2.0]);
        assert!(!visual.show);
    }

    #[test]
    fn test_update_without_position_keeps_position() {
        let mut visual = TurtleVisual::at_home(Point::new(5.0, 5.0));
        let action = TurtleAction::new("t1", ActionKind::UpdateState);
        visual.update_from(&action);
        assert_eq!(visual.position, Point::new(5.0, 5.0));
    }
}
