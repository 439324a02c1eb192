//! Turtle action wire model.
//!
//! One `TurtleAction` per emitted instruction, immutable once emitted. The
//! wire tags follow the SVG-path-flavored protocol of the host widget
//! (`"M"`, `"L"`, `"C"`, ...); unknown tags deserialize to
//! [`ActionKind::Unknown`] so a newer collaborator never breaks an older
//! renderer.

use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Discriminant of a turtle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Move the cursor without drawing. Wire tag `M`.
    MoveAbsolute,
    /// Relative move; deliberately an identity transform for now. Tag `m`.
    MoveRelative,
    /// Straight segment to an absolute point. Tag `L`.
    LineAbsolute,
    /// Filled dot at an absolute point. Tag `D`.
    DrawDot,
    /// Text run. Tag `W`.
    WriteText,
    /// Arc between the current cursor and an absolute point. Tag `C`.
    Circle,
    /// Audio playback. Tag `S`.
    Sound,
    /// Remove this turtle's marks. Tag `CLR`.
    Clear,
    /// Refresh the live visual state snapshot; no visual output. Tag `U`.
    UpdateState,
    /// Leave a persistent copy of the sprite on the canvas. Tag `T`.
    Stamp,
    /// Open a fill outline. Tag `F`.
    BeginFill,
    /// Close and commit the fill outline. Tag `f`.
    EndFill,
    /// End of batch; renders the live sprite like a stamp. Tag `DONE`.
    Done,
    /// Forward-compatible catch-all; dropped silently on dispatch.
    Unknown,
}

impl ActionKind {
    /// Wire tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            ActionKind::MoveAbsolute => "M",
            ActionKind::MoveRelative => "m",
            ActionKind::LineAbsolute => "L",
            ActionKind::DrawDot => "D",
            ActionKind::WriteText => "W",
            ActionKind::Circle => "C",
            ActionKind::Sound => "S",
            ActionKind::Clear => "CLR",
            ActionKind::UpdateState => "U",
            ActionKind::Stamp => "T",
            ActionKind::BeginFill => "F",
            ActionKind::EndFill => "f",
            ActionKind::Done => "DONE",
            ActionKind::Unknown => "?",
        }
    }

    /// Parse a wire tag; anything unrecognized maps to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "M" => ActionKind::MoveAbsolute,
            "m" => ActionKind::MoveRelative,
            "L" => ActionKind::LineAbsolute,
            "D" => ActionKind::DrawDot,
            "W" => ActionKind::WriteText,
            "C" => ActionKind::Circle,
            "S" => ActionKind::Sound,
            "CLR" => ActionKind::Clear,
            "U" => ActionKind::UpdateState,
            "T" => ActionKind::Stamp,
            "F" => ActionKind::BeginFill,
            "f" => ActionKind::EndFill,
            "DONE" => ActionKind::Done,
            _ => ActionKind::Unknown,
        }
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ActionKind::from_tag(&tag))
    }
}

/// Horizontal anchor for written text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Any unrecognized value; anchors at the origin by contract.
    Other,
}

impl Serialize for TextAlign {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Other => "other",
        })
    }
}

impl<'de> Deserialize<'de> for TextAlign {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "left" => TextAlign::Left,
            "center" => TextAlign::Center,
            "right" => TextAlign::Right,
            _ => TextAlign::Other,
        })
    }
}

/// Font parameters for WRITE_TEXT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 12.0,
            weight: "normal".to_string(),
        }
    }
}

fn default_pen() -> u8 {
    1
}

fn default_color() -> String {
    "black".to_string()
}

fn default_pensize() -> f64 {
    1.0
}

fn default_stretch() -> [f64; 2] {
    [1.0, 1.0]
}

fn default_outline() -> f64 {
    1.0
}

fn default_show() -> bool {
    true
}

/// One discrete instruction in a turtle's drawing/control stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurtleAction {
    /// Turtle this action applies to.
    pub id: String,
    /// Action discriminant (wire field `type`).
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Absolute coordinate; meaning depends on `kind`.
    #[serde(default)]
    pub position: Option<[f64; 2]>,
    /// Pen-down flag gating whether movement leaves a mark.
    #[serde(default = "default_pen")]
    pub pen: u8,
    /// Fill color for marks and fills produced by this action.
    #[serde(default = "default_color")]
    pub color: String,
    /// Stroke color for marks produced by this action.
    #[serde(default = "default_color")]
    pub pencolor: String,
    /// Stroke width for marks produced by this action.
    #[serde(default = "default_pensize")]
    pub pensize: f64,
    /// Arc or dot radius.
    #[serde(default)]
    pub radius: f64,
    /// Arc sweep direction.
    #[serde(default)]
    pub clockwise: bool,
    /// Arc large-arc flag.
    #[serde(default)]
    pub large_arc: bool,
    /// Text content for WRITE_TEXT.
    #[serde(default)]
    pub text: Option<String>,
    /// Font for WRITE_TEXT.
    #[serde(default)]
    pub font: Option<FontSpec>,
    /// Text anchor for WRITE_TEXT.
    #[serde(default)]
    pub align: TextAlign,
    /// Resource key or URL for SOUND.
    #[serde(default)]
    pub media: Option<String>,
    /// Sprite heading in degrees.
    #[serde(default)]
    pub heading: f64,
    /// Sprite shape name or resource key.
    #[serde(default)]
    pub shape: String,
    /// Sprite stretch factors `[sx, sy]`.
    #[serde(default = "default_stretch")]
    pub penstretchfactor: [f64; 2],
    /// Sprite outline width.
    #[serde(default = "default_outline")]
    pub penoutlinewidth: f64,
    /// Sprite visibility.
    #[serde(default = "default_show")]
    pub show: bool,
    /// Identity of a specific stamp instance for update-in-place.
    #[serde(default)]
    pub stampid: Option<i64>,
    /// Emitter's fill flag, carried for wire compatibility only. The
    /// interpreter decides fill membership from its own open-fill state
    /// plus the pen, which the emitter keeps in lockstep with this flag.
    #[serde(default)]
    pub fill_mode: bool,
    /// Seed point of the fill outline being built.
    #[serde(default)]
    pub fill_start_position: Option<[f64; 2]>,
    /// Last pressed key, round-tripped back to the collaborator.
    #[serde(default)]
    pub key: Option<String>,
}

impl TurtleAction {
    /// Minimal action of the given kind; everything else at wire defaults.
    pub fn new(id: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: None,
            pen: default_pen(),
            color: default_color(),
            pencolor: default_color(),
            pensize: default_pensize(),
            radius: 0.0,
            clockwise: false,
            large_arc: false,
            text: None,
            font: None,
            align: TextAlign::default(),
            media: None,
            heading: 0.0,
            shape: String::new(),
            penstretchfactor: default_stretch(),
            penoutlinewidth: default_outline(),
            show: true,
            stampid: None,
            fill_mode: false,
            fill_start_position: None,
            key: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some([x, y]);
        self
    }

    pub fn with_pen(mut self, pen: bool) -> Self {
        self.pen = pen as u8;
        self
    }

    pub fn with_pencolor(mut self, color: impl Into<String>) -> Self {
        self.pencolor = color.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>, font: FontSpec, align: TextAlign) -> Self {
        self.text = Some(text.into());
        self.font = Some(font);
        self.align = align;
        self
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = shape.into();
        self
    }

    pub fn with_stampid(mut self, stampid: i64) -> Self {
        self.stampid = Some(stampid);
        self
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    /// Target position as a point, if the action stated one.
    pub fn point(&self) -> Option<Point> {
        self.position.map(|[x, y]| Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags_round_trip() {
        let action = TurtleAction::new("t1", ActionKind::LineAbsolute).at(10.0, 20.0);
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"type\":\"L\""));
        let back: TurtleAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let json = r#"{"id":"t1","type":"GLOW","position":[1.0,2.0]}"#;
        let action: TurtleAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.kind, ActionKind::Unknown);
    }

    #[test]
    fn test_partial_wire_object_fills_defaults() {
        let json = r#"{"id":"t1","type":"M"}"#;
        let action: TurtleAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.pen, 1);
        assert_eq!(action.pencolor, "black");
        assert_eq!(action.penstretchfactor, [1.0, 1.0]);
        assert!(action.show);
        assert!(action.position.is_none());
    }

    #[test]
    fn test_unrecognized_align_parses_as_other() {
        let json = r#"{"id":"t1","type":"W","text":"hi","align":"justify"}"#;
        let action: TurtleAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.align, TextAlign::Other);
    }

    #[test]
    fn test_clear_tag() {
        let json = r#"{"id":"t1","type":"CLR"}"#;
        let action: TurtleAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.kind, ActionKind::Clear);
    }
}
