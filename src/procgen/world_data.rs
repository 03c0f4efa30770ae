/// Data structures for generated scenery
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a background object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneryKind {
    Mountain,
    Tree,
    House,
    Bush,
    /// Reserved for renderers; the generator never places grass
    Grass,
    Sea,
}

impl SceneryKind {
    /// Every kind, in declaration order
    pub const ALL: [SceneryKind; 6] = [
        SceneryKind::Mountain,
        SceneryKind::Tree,
        SceneryKind::House,
        SceneryKind::Bush,
        SceneryKind::Grass,
        SceneryKind::Sea,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneryKind::Mountain => "mountain",
            SceneryKind::Tree => "tree",
            SceneryKind::House => "house",
            SceneryKind::Bush => "bush",
            SceneryKind::Grass => "grass",
            SceneryKind::Sea => "sea",
        }
    }

    /// Look up a kind by name (case-insensitive)
    ///
    /// Returns None if the name is not recognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "mountain" => Some(SceneryKind::Mountain),
            "tree" => Some(SceneryKind::Tree),
            "house" => Some(SceneryKind::House),
            "bush" => Some(SceneryKind::Bush),
            "grass" => Some(SceneryKind::Grass),
            "sea" => Some(SceneryKind::Sea),
            _ => None,
        }
    }
}

impl fmt::Display for SceneryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// World-space position of a scenery object
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Lateral offset from the road centre (negative = left)
    pub x: f64,
    /// Height above the road plane
    pub y: f64,
    /// Distance along the track
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane
    pub fn ground(x: f64, z: f64) -> Self {
        Self { x, y: 0.0, z }
    }
}

/// Opaque reference to a renderable asset, resolved by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteHandle(pub String);

impl SpriteHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single placeable background object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub kind: SceneryKind,
    pub position: Position,
    /// Always None when produced by the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteHandle>,
    /// Rendered size multiplier
    pub scale: f64,
}

impl WorldObject {
    pub fn new(kind: SceneryKind, position: Position, scale: f64) -> Self {
        Self {
            kind,
            position,
            sprite: None,
            scale,
        }
    }
}

/// Per-kind object counts for one generated scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneSummary {
    pub mountains: usize,
    pub trees: usize,
    pub houses: usize,
    pub bushes: usize,
    pub grass: usize,
    pub sea: usize,
}

impl SceneSummary {
    pub fn from_objects(objects: &[WorldObject]) -> Self {
        let mut summary = Self::default();
        for object in objects {
            summary.record(object.kind);
        }
        summary
    }

    pub fn record(&mut self, kind: SceneryKind) {
        match kind {
            SceneryKind::Mountain => self.mountains += 1,
            SceneryKind::Tree => self.trees += 1,
            SceneryKind::House => self.houses += 1,
            SceneryKind::Bush => self.bushes += 1,
            SceneryKind::Grass => self.grass += 1,
            SceneryKind::Sea => self.sea += 1,
        }
    }

    pub fn count(&self, kind: SceneryKind) -> usize {
        match kind {
            SceneryKind::Mountain => self.mountains,
            SceneryKind::Tree => self.trees,
            SceneryKind::House => self.houses,
            SceneryKind::Bush => self.bushes,
            SceneryKind::Grass => self.grass,
            SceneryKind::Sea => self.sea,
        }
    }

    pub fn total(&self) -> usize {
        self.mountains + self.trees + self.houses + self.bushes + self.grass + self.sea
    }

    /// Accumulate another summary into this one
    pub fn merge(&mut self, other: &SceneSummary) {
        self.mountains += other.mountains;
        self.trees += other.trees;
        self.houses += other.houses;
        self.bushes += other.bushes;
        self.grass += other.grass;
        self.sea += other.sea;
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} objects (mountains: {}, trees: {}, houses: {}, bushes: {}, sea: {})",
            self.total(),
            self.mountains,
            self.trees,
            self.houses,
            self.bushes,
            self.sea
        )
    }
}

/// Generated scene packaged for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Distance the scene was requested at
    pub distance: f64,
    /// Segment anchor all placements were computed from
    pub base_distance: f64,
    pub objects: Vec<WorldObject>,
}

impl SceneSnapshot {
    pub fn summary(&self) -> SceneSummary {
        SceneSummary::from_objects(&self.objects)
    }
}
