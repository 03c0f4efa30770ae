/// Sprite lookup for scenery kinds, owned by the rendering side
use super::world_data::{SceneryKind, SpriteHandle, WorldObject};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Default asset name for a kind
fn builtin_sprite(kind: SceneryKind) -> SpriteHandle {
    SpriteHandle::new(format!("sprites/{}.png", kind.as_str()))
}

/// Maps scenery kinds to renderable assets
///
/// The generator never fills in `WorldObject::sprite`; renderers resolve
/// handles through this table instead.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTable {
    sprites: BTreeMap<SceneryKind, SpriteHandle>,
}

impl SpriteTable {
    /// Table with the built-in asset for every kind
    pub fn builtin() -> Self {
        let sprites = SceneryKind::ALL
            .iter()
            .map(|&kind| (kind, builtin_sprite(kind)))
            .collect();
        Self { sprites }
    }

    /// Built-in table with entries replaced from a name → asset map
    ///
    /// Kind names are case-insensitive. Unknown names are skipped with a warning.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut table = Self::builtin();

        for (name, asset) in overrides {
            match SceneryKind::from_name(name) {
                Some(kind) => table.set(kind, SpriteHandle::new(asset.clone())),
                None => warn!("Ignoring sprite for unknown scenery kind '{}'", name),
            }
        }

        table
    }

    pub fn set(&mut self, kind: SceneryKind, sprite: SpriteHandle) {
        self.sprites.insert(kind, sprite);
    }

    pub fn get(&self, kind: SceneryKind) -> Option<&SpriteHandle> {
        self.sprites.get(&kind)
    }

    /// Sprite for a generated object: its own handle if set, else the table entry
    pub fn resolve<'a>(&'a self, object: &'a WorldObject) -> Option<&'a SpriteHandle> {
        object.sprite.as_ref().or_else(|| self.get(object.kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SceneryKind, &SpriteHandle)> {
        self.sprites.iter().map(|(kind, sprite)| (*kind, sprite))
    }
}

impl Default for SpriteTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procgen::world_data::Position;

    #[test]
    fn test_builtin_covers_all_kinds() {
        let table = SpriteTable::builtin();

        assert_eq!(table.iter().count(), SceneryKind::ALL.len());
        assert_eq!(
            table.get(SceneryKind::Mountain).map(SpriteHandle::as_str),
            Some("sprites/mountain.png")
        );
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("Tree".to_string(), "pine_01.png".to_string());
        overrides.insert("volcano".to_string(), "lava.png".to_string());

        let table = SpriteTable::with_overrides(&overrides);

        assert_eq!(table.get(SceneryKind::Tree).map(SpriteHandle::as_str), Some("pine_01.png"));
        assert_eq!(
            table.get(SceneryKind::Sea).map(SpriteHandle::as_str),
            Some("sprites/sea.png")
        );
        assert_eq!(table.iter().count(), SceneryKind::ALL.len());
    }

    #[test]
    fn test_resolve_prefers_object_sprite() {
        let table = SpriteTable::builtin();

        let plain = WorldObject::new(SceneryKind::House, Position::ground(100.0, 0.0), 1.0);
        assert_eq!(table.resolve(&plain).map(SpriteHandle::as_str), Some("sprites/house.png"));

        let mut tagged = plain.clone();
        tagged.sprite = Some(SpriteHandle::new("barn.png"));
        assert_eq!(table.resolve(&tagged).map(SpriteHandle::as_str), Some("barn.png"));
    }
}
