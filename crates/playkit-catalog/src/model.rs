//! Catalog part model.
//!
//! Parts are created and edited only by the external catalog-management
//! system; the engine treats everything in this module as read-only
//! reference data. Placed instances store a part id, never a copy of
//! these fields.

use playkit_core::{Dimensions, Position, Unit};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed attachment kind of a connection point.
///
/// A closed set so the validation engine can match exhaustively instead
/// of duck-typing on field presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    BeamHanger,
    DeckEdge,
    PostSocket,
    GroundAnchor,
    ClimberMount,
    SlideMount,
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BeamHanger => write!(f, "beam hanger"),
            Self::DeckEdge => write!(f, "deck edge"),
            Self::PostSocket => write!(f, "post socket"),
            Self::GroundAnchor => write!(f, "ground anchor"),
            Self::ClimberMount => write!(f, "climber mount"),
            Self::SlideMount => write!(f, "slide mount"),
        }
    }
}

/// A declared attachment location on a part.
///
/// `offset` is relative to the part's placement origin, in the part's
/// published unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    pub id: String,
    pub offset: Position,
    pub kind: AttachmentKind,
    /// Attachment kinds this point may mate with.
    #[serde(default)]
    pub mates_with: Vec<AttachmentKind>,
}

impl ConnectionPoint {
    /// Whether this point accepts the other kind.
    pub fn accepts(&self, other: AttachmentKind) -> bool {
        self.mates_with.contains(&other)
    }
}

/// Declarative compatibility rule attached to a catalog part.
///
/// A closed, tagged set evaluated generically against the whole design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompatibilityRule {
    /// This part needs a mate for `attachment` somewhere in the design.
    Requires { attachment: AttachmentKind },
    /// This part may not coexist with any part of `category`.
    Excludes { category: String },
    /// At most `max` instances of `category` may coexist.
    MaxCount { category: String, max: usize },
    /// Nearest other instance must be at least `distance` feet away.
    MinClearance { distance: f64 },
}

/// Recommended age range in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min_years: u8,
    pub max_years: u8,
}

impl AgeRange {
    pub fn new(min_years: u8, max_years: u8) -> Self {
        Self {
            min_years,
            max_years,
        }
    }

    /// Envelope of two ranges.
    pub fn envelope(&self, other: &AgeRange) -> AgeRange {
        AgeRange::new(
            self.min_years.min(other.min_years),
            self.max_years.max(other.max_years),
        )
    }
}

/// Free-form safety/usage metadata on a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PartMetadata {
    /// Recommended age range, if published.
    pub age_range: Option<AgeRange>,
    /// How many children this part adds to total capacity.
    pub capacity: u32,
    /// Other parts may rest directly on top of this one.
    pub stackable: bool,
    /// Must sit at ground level or directly atop a supporting part.
    pub requires_ground_support: bool,
}

/// A purchasable modular piece from the published catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogPart {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    /// Price per unit, in the store currency.
    pub unit_price: f64,
    /// Physical extents in `unit`.
    pub dimensions: Dimensions,
    pub unit: Unit,
    /// Weight in kilograms.
    pub weight_kg: f64,
    pub connection_points: Vec<ConnectionPoint>,
    pub rules: Vec<CompatibilityRule>,
    pub metadata: PartMetadata,
    pub published: bool,
}

impl Default for CatalogPart {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            category: String::new(),
            subcategory: String::new(),
            unit_price: 0.0,
            dimensions: Dimensions::default(),
            unit: Unit::default(),
            weight_kg: 0.0,
            connection_points: Vec::new(),
            rules: Vec::new(),
            metadata: PartMetadata::default(),
            published: true,
        }
    }
}

impl CatalogPart {
    /// Dimensions normalized to feet.
    pub fn dimensions_ft(&self) -> Dimensions {
        Dimensions::new(
            self.unit.to_feet(self.dimensions.width),
            self.unit.to_feet(self.dimensions.depth),
            self.unit.to_feet(self.dimensions.height),
        )
    }

    /// Connection point offset normalized to feet.
    pub fn offset_ft(&self, point: &ConnectionPoint) -> Position {
        Position::new(
            self.unit.to_feet(point.offset.x),
            self.unit.to_feet(point.offset.y),
            self.unit.to_feet(point.offset.z),
        )
    }
}
