/// Roadside scenery placement
use super::noise::NoiseField;
use super::world_data::{Position, SceneSummary, SceneryKind, WorldObject};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::debug;

/// Track length covered by one generation segment
pub const SEGMENT_LENGTH: f64 = 100.0;

// Near mountain range
const NEAR_MOUNTAIN_COUNT: usize = 25;
const NEAR_MOUNTAIN_SPACING_X: f64 = 180.0;
const NEAR_MOUNTAIN_STAGGER: f64 = 50.0;
const NEAR_MOUNTAIN_STEP_Z: f64 = 250.0;

// Far mountain range
const FAR_MOUNTAIN_COUNT: usize = 15;
const FAR_MOUNTAIN_SPACING_X: f64 = 300.0;
const FAR_MOUNTAIN_JITTER_X: f64 = 100.0;
const FAR_MOUNTAIN_STEP_Z: f64 = 400.0;
const FAR_MOUNTAIN_DEPTH: f64 = 2000.0;

// Roadside trees
const ROADSIDE_TREE_SLOTS: usize = 60;
const ROADSIDE_TREE_DENSITY: f64 = 0.25;
const ROADSIDE_CLUSTER_CHANCE: f64 = 0.3;
const ROADSIDE_CLUSTER_SIZE: usize = 3;

// Forest
const FOREST_SLOTS: usize = 40;
const FOREST_WINDOW: f64 = 2000.0;
const FOREST_DENSITY: f64 = 0.3;

// Towns
const TOWN_SPACING_Z: f64 = 1500.0;
const TOWN_WINDOW: f64 = 2000.0;
const HOUSE_BUSHES: usize = 3;

// Roadside bushes
const ROADSIDE_BUSH_COUNT: usize = 60;
const ROADSIDE_BUSH_STEP_Z: f64 = 80.0;

// Coastline
const COAST_CHANCE: f64 = 0.3;
const COAST_TILES: usize = 15;
const COAST_OFFSET_X: f64 = 800.0;
const COAST_STEP_Z: f64 = 200.0;

/// Round a track distance down to the start of its segment
pub fn base_distance(distance: f64) -> f64 {
    (distance / SEGMENT_LENGTH).floor() * SEGMENT_LENGTH
}

/// Procedural generator for the background objects around a track distance
///
/// Terrain shape (mountain heights and tree density) comes from the noise
/// table and is stable for a given table. Every jitter, cluster decision and
/// probability gate draws fresh from the owned RNG, so calling `generate`
/// twice at the same distance yields two different scenes. Callers that need
/// stable scenery should keep the returned objects, or go through
/// [`SceneCache`](super::scene_cache::SceneCache).
pub struct SceneGenerator<R = ChaCha8Rng> {
    noise: Arc<NoiseField>,
    rng: R,
}

impl SceneGenerator<ChaCha8Rng> {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Create a generator whose noise table and placements follow `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// New generator sharing this noise table with an independent RNG
    ///
    /// Use one fork per thread when generating several windows in parallel.
    pub fn fork(&self, seed: u64) -> Self {
        Self::from_parts(Arc::clone(&self.noise), ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for SceneGenerator<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SceneGenerator<R> {
    /// Build the noise table from `rng` and keep it for placements
    pub fn with_rng(mut rng: R) -> Self {
        let noise = Arc::new(NoiseField::new(&mut rng));
        Self { noise, rng }
    }

    /// Assemble a generator from an existing (possibly shared) table and an RNG
    pub fn from_parts(noise: Arc<NoiseField>, rng: R) -> Self {
        Self { noise, rng }
    }

    /// Noise table used for terrain shape, shareable with other generators
    pub fn noise(&self) -> &Arc<NoiseField> {
        &self.noise
    }

    /// Generate every background object due around `distance`
    ///
    /// Categories are emitted in a fixed order (near mountains, far
    /// mountains, roadside trees, forest, towns, roadside bushes, coast).
    /// The order carries no depth meaning; renderers sort by `z` themselves.
    pub fn generate(&mut self, distance: f64) -> Vec<WorldObject> {
        let base = base_distance(distance);
        let mut scene = Vec::with_capacity(512);

        self.place_near_mountains(base, &mut scene);
        self.place_far_mountains(base, &mut scene);
        self.place_roadside_trees(base, &mut scene);
        self.place_forest(base, &mut scene);
        self.place_towns(base, &mut scene);
        self.place_roadside_bushes(base, &mut scene);
        self.place_coastline(base, &mut scene);

        debug!(
            distance,
            base,
            summary = %SceneSummary::from_objects(&scene),
            "Generated scenery"
        );

        scene
    }

    fn place_near_mountains(&mut self, base: f64, scene: &mut Vec<WorldObject>) {
        for i in 0..NEAR_MOUNTAIN_COUNT {
            let stagger = if i % 2 == 0 {
                NEAR_MOUNTAIN_STAGGER
            } else {
                -NEAR_MOUNTAIN_STAGGER
            };
            let x = (i as f64 - 12.0) * NEAR_MOUNTAIN_SPACING_X + stagger;
            let z = base + i as f64 * NEAR_MOUNTAIN_STEP_Z;
            let height = self.noise.fractal_noise(z * 0.0015, 0.6, 4) * 350.0 + 200.0;
            let scale = 1.0 + self.noise.fractal_noise(z * 0.0025, 0.4, 2) * 0.6;

            scene.push(WorldObject::new(
                SceneryKind::Mountain,
                Position::new(x, height, z),
                scale,
            ));
        }
    }

    fn place_far_mountains(&mut self, base: f64, scene: &mut Vec<WorldObject>) {
        for i in 0..FAR_MOUNTAIN_COUNT {
            let x = (i as f64 - 7.0) * FAR_MOUNTAIN_SPACING_X + self.unit() * FAR_MOUNTAIN_JITTER_X;
            let z = base + i as f64 * FAR_MOUNTAIN_STEP_Z + FAR_MOUNTAIN_DEPTH;
            let height = self.noise.fractal_noise(z * 0.001, 0.5, 3) * 250.0 + 150.0;
            let scale = 0.8 + self.noise.fractal_noise(z * 0.002, 0.3, 2) * 0.4;

            scene.push(WorldObject::new(
                SceneryKind::Mountain,
                Position::new(x, height, z),
                scale,
            ));
        }
    }

    fn place_roadside_trees(&mut self, base: f64, scene: &mut Vec<WorldObject>) {
        for i in 0..ROADSIDE_TREE_SLOTS {
            let side = self.side();
            let x = side * (300.0 + self.unit() * 200.0);
            let z = base + i as f64 * 100.0 + self.unit() * 500.0;

            if self.noise.fractal_noise(z * 0.012, 0.6, 3) <= ROADSIDE_TREE_DENSITY {
                continue;
            }

            let scale = 0.5 + self.unit() * 0.6;
            scene.push(WorldObject::new(SceneryKind::Tree, Position::ground(x, z), scale));

            // Small copse around the tree
            if self.rng.gen_bool(ROADSIDE_CLUSTER_CHANCE) {
                for _ in 0..ROADSIDE_CLUSTER_SIZE {
                    let cx = x + self.jitter(100.0);
                    let cz = z + self.jitter(100.0);
                    let scale = 0.3 + self.unit() * 0.4;
                    scene.push(WorldObject::new(SceneryKind::Tree, Position::ground(cx, cz), scale));
                }
            }
        }
    }

    fn place_forest(&mut self, base: f64, scene: &mut Vec<WorldObject>) {
        for _ in 0..FOREST_SLOTS {
            let side = self.side();
            let x = side * (500.0 + self.unit() * 400.0);
            let z = base + self.unit() * FOREST_WINDOW;

            if self.noise.fractal_noise(z * 0.01, 0.6, 3) <= FOREST_DENSITY {
                continue;
            }

            let cluster_size: usize = self.rng.gen_range(2..=6);
            for _ in 0..cluster_size {
                let tx = x + self.jitter(150.0);
                let tz = z + self.jitter(150.0);
                let scale = 0.4 + self.unit() * 0.5;
                scene.push(WorldObject::new(SceneryKind::Tree, Position::ground(tx, tz), scale));
            }
        }
    }

    fn place_towns(&mut self, base: f64, scene: &mut Vec<WorldObject>) {
        let town_count: usize = self.rng.gen_range(1..=3);

        for town in 0..town_count {
            let town_x = self.jitter(1000.0);
            let town_z = base + town as f64 * TOWN_SPACING_Z + self.unit() * TOWN_WINDOW;
            let house_count: usize = self.rng.gen_range(3..=8);

            // Houses zig-zag across the town centre, spreading out as they go
            for i in 0..house_count {
                let offset = 100.0 + i as f64 * 80.0;
                let side = if i % 2 == 0 { 1.0 } else { -1.0 };
                let x = town_x + side * offset + self.jitter(50.0);
                let z = town_z + i as f64 * 40.0 + self.jitter(80.0);
                let scale = 0.7 + self.unit() * 0.5;

                scene.push(WorldObject::new(SceneryKind::House, Position::ground(x, z), scale));

                for _ in 0..HOUSE_BUSHES {
                    let bx = x + self.jitter(40.0);
                    let bz = z + self.jitter(40.0);
                    let scale = 0.2 + self.unit() * 0.3;
                    scene.push(WorldObject::new(SceneryKind::Bush, Position::ground(bx, bz), scale));
                }
            }
        }
    }

    fn place_roadside_bushes(&mut self, base: f64, scene: &mut Vec<WorldObject>) {
        for i in 0..ROADSIDE_BUSH_COUNT {
            let side = self.side();
            let x = side * (200.0 + self.unit() * 100.0);
            let z = base + i as f64 * ROADSIDE_BUSH_STEP_Z + self.unit() * 2000.0;
            let scale = 0.2 + self.unit() * 0.3;

            scene.push(WorldObject::new(SceneryKind::Bush, Position::ground(x, z), scale));
        }
    }

    fn place_coastline(&mut self, base: f64, scene: &mut Vec<WorldObject>) {
        if !self.rng.gen_bool(COAST_CHANCE) {
            return;
        }

        let side = self.side();
        let start = base + self.unit() * 1000.0;

        for i in 0..COAST_TILES {
            let x = side * COAST_OFFSET_X + self.jitter(200.0);
            let z = start + i as f64 * COAST_STEP_Z + self.jitter(100.0);
            let scale = 1.5 + self.unit() * 0.5;

            scene.push(WorldObject::new(SceneryKind::Sea, Position::ground(x, z), scale));
        }
    }

    /// Uniform draw in [0, 1)
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// +1.0 or -1.0 with equal probability
    fn side(&mut self) -> f64 {
        if self.rng.gen_bool(0.5) {
            1.0
        } else {
            -1.0
        }
    }

    /// Uniform offset in [-span/2, span/2)
    fn jitter(&mut self, span: f64) -> f64 {
        (self.unit() - 0.5) * span
    }
}
