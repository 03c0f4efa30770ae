/// Opt-in per-segment memoization of generated scenery
use super::scenery::{SceneGenerator, SEGMENT_LENGTH};
use super::world_data::WorldObject;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Scenes kept by default, enough for a few kilometres of look-ahead
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Stores one generated scene per track segment
///
/// Wrapping a [`SceneGenerator`] in a cache changes its contract: repeated
/// requests inside the same segment return the stored scene instead of a
/// freshly randomized one. Nothing in the generator uses this implicitly.
/// When full, the oldest segment is evicted first.
pub struct SceneCache<R = ChaCha8Rng> {
    generator: SceneGenerator<R>,
    capacity: usize,
    scenes: HashMap<i64, Vec<WorldObject>>,
    order: VecDeque<i64>,
    hits: u64,
    misses: u64,
}

impl<R: Rng> SceneCache<R> {
    pub fn new(generator: SceneGenerator<R>) -> Self {
        Self::with_capacity(generator, DEFAULT_CACHE_CAPACITY)
    }

    /// Cache holding at most `capacity` segments (minimum 1)
    pub fn with_capacity(generator: SceneGenerator<R>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            generator,
            capacity,
            scenes: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Scene for the segment containing `distance`, generating it on first use
    pub fn scene_at(&mut self, distance: f64) -> &[WorldObject] {
        let key = segment_index(distance);

        if self.scenes.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            if self.order.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.scenes.remove(&oldest);
                    debug!(segment = oldest, "Evicted cached scenery");
                }
            }
            self.order.push_back(key);
        }

        let generator = &mut self.generator;
        self.scenes
            .entry(key)
            .or_insert_with(|| generator.generate(distance))
    }

    pub fn contains(&self, distance: f64) -> bool {
        self.scenes.contains_key(&segment_index(distance))
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.scenes.clear();
        self.order.clear();
    }

    pub fn into_generator(self) -> SceneGenerator<R> {
        self.generator
    }
}

/// Segment number containing `distance`
fn segment_index(distance: f64) -> i64 {
    (distance / SEGMENT_LENGTH).floor() as i64
}
