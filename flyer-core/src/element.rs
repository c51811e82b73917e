//! Flyer elements - the building blocks of a design.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The flyer slot an element fills.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// Event title headline.
    Title,
    /// Venue line.
    Location,
    /// Date and time line.
    Time,
    /// Speaker name.
    Speaker,
    /// Talk topic.
    Topic,
    /// Catering note.
    Food,
    /// An uploaded organization logo.
    Logo {
        /// Image source URI or base64 data.
        src: String,
    },
}

impl ElementKind {
    /// The text slots in their standard top-to-bottom order.
    pub const TEXT_KINDS: [Self; 6] = [
        Self::Title,
        Self::Topic,
        Self::Speaker,
        Self::Time,
        Self::Location,
        Self::Food,
    ];

    /// Whether this kind renders as text.
    #[must_use]
    pub fn is_text(&self) -> bool {
        !matches!(self, Self::Logo { .. })
    }

    /// Whether this kind is a logo image.
    #[must_use]
    pub fn is_logo(&self) -> bool {
        matches!(self, Self::Logo { .. })
    }
}

/// A point on the flyer canvas, in CSS pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X offset from the left edge.
    pub x: f32,
    /// Y offset from the top edge.
    pub y: f32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset by a delta on both axes.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The untransformed screen rectangle an element occupies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Default footprint for a freshly created element of the given kind.
    #[must_use]
    pub fn for_kind(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Title => Self::new(400.0, 48.0),
            ElementKind::Logo { .. } => Self::new(100.0, 100.0),
            _ => Self::new(320.0, 40.0),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(320.0, 40.0)
    }
}

/// Rotation and scale applied to an element.
///
/// This record is authoritative: transforms are never derived back from
/// any rendered representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Rotation in degrees, clockwise.
    pub rotation_degrees: f32,
    /// Uniform scale factor (1.0 = natural size).
    pub scale: f32,
}

impl Transform {
    /// Create a transform.
    #[must_use]
    pub fn new(rotation_degrees: f32, scale: f32) -> Self {
        Self {
            rotation_degrees,
            scale,
        }
    }

    /// Whether this is the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.rotation_degrees.abs() < f32::EPSILON && (self.scale - 1.0).abs() < f32::EPSILON
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation_degrees: 0.0,
            scale: 1.0,
        }
    }
}

/// Font weight for text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Font slant for text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic glyphs.
    Italic,
}

/// Visual style snapshot for an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Font slant.
    pub style: FontStyle,
    /// Text color as hex.
    pub color: String,
    /// Optional background color as hex.
    pub background: Option<String>,
    /// Opacity from 0.0 to 1.0.
    pub opacity: f32,
}

impl ElementStyle {
    /// The standard style for a freshly created element of the given kind.
    #[must_use]
    pub fn for_kind(kind: &ElementKind) -> Self {
        let base = Self::default();
        match kind {
            ElementKind::Title => Self {
                font_size: 24.0,
                weight: FontWeight::Bold,
                ..base
            },
            ElementKind::Speaker => Self {
                font_size: 20.0,
                style: FontStyle::Italic,
                ..base
            },
            ElementKind::Topic => Self {
                font_size: 20.0,
                ..base
            },
            ElementKind::Location | ElementKind::Time | ElementKind::Food => Self {
                font_size: 18.0,
                ..base
            },
            ElementKind::Logo { .. } => base,
        }
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
            color: "#000000".to_string(),
            background: None,
            opacity: 1.0,
        }
    }
}

/// A flyer element with geometry and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// The slot this element fills.
    pub kind: ElementKind,
    /// Top-left anchor on the canvas.
    pub position: Position,
    /// Untransformed footprint.
    pub size: Size,
    /// Rotation and scale.
    pub transform: Transform,
    /// Visual style snapshot.
    pub style: ElementStyle,
    /// Whether this element is selected.
    pub selected: bool,
}

impl Element {
    /// Create a new element of the given kind with its standard style
    /// and footprint.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        let size = Size::for_kind(&kind);
        let style = ElementStyle::for_kind(&kind);
        Self {
            id: ElementId::new(),
            kind,
            position: Position::default(),
            size,
            transform: Transform::default(),
            style,
            selected: false,
        }
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the footprint.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// The element's visual center. Scaling is centered, so this does
    /// not depend on the current scale factor.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Check if a point (in canvas coordinates) falls within this
    /// element's axis-aligned screen rectangle at its current scale.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let center = self.center();
        let half_w = self.size.width * self.transform.scale / 2.0;
        let half_h = self.size.height * self.transform.scale / 2.0;
        x >= center.x - half_w
            && x <= center.x + half_w
            && y >= center.y - half_h
            && y <= center.y + half_h
    }
}
