//! Obstacle blobs on the track
//!
//! A blob is a contiguous run of nodes a player can hide on during red. Each
//! node breathes on its own once someone has stood on it long enough, and is
//! removed after breathing for the configured duration.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::track::Track;
use crate::config::GameConfig;

/// Rejection sampler attempt cap per generation
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// One node of an obstacle blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleNode {
    /// Track node index
    pub index: u32,
    pub breathing: bool,
    /// Seconds spent breathing (drives removal and the visual pulse)
    pub breathing_timer: f32,
}

impl ObstacleNode {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            breathing: false,
            breathing_timer: 0.0,
        }
    }

    /// Stop breathing (someone stepped off before it expired)
    pub fn calm(&mut self) {
        self.breathing = false;
        self.breathing_timer = 0.0;
    }

    /// Renderer scale hint: pulses while breathing
    pub fn pulse_scale(&self) -> f32 {
        pulse_scale(self.breathing, self.breathing_timer)
    }
}

/// Shared breathing pulse: 1.0 at rest, oscillating ±30% at 2 Hz while breathing
pub fn pulse_scale(breathing: bool, timer: f32) -> f32 {
    if breathing {
        1.0 + 0.3 * (timer * std::f32::consts::PI * 4.0).sin()
    } else {
        1.0
    }
}

/// A contiguous blob of obstacle nodes (ordered along the ring)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub nodes: Vec<ObstacleNode>,
}

impl Obstacle {
    pub fn contains(&self, index: u32) -> bool {
        self.nodes.iter().any(|n| n.index == index)
    }

    pub fn node(&self, index: u32) -> Option<&ObstacleNode> {
        self.nodes.iter().find(|n| n.index == index)
    }

    pub fn node_mut(&mut self, index: u32) -> Option<&mut ObstacleNode> {
        self.nodes.iter_mut().find(|n| n.index == index)
    }
}

/// A node removed after breathing too long
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiredNode {
    pub obstacle_id: u32,
    pub node: u32,
}

/// All obstacles on the track plus the shrinking pixel budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    /// Live blobs (sorted by id)
    pub blobs: Vec<Obstacle>,
    /// Total pixels the next generation aims for
    pub budget: u32,
    /// Next blob ID; keeps increasing across regenerations
    next_id: u32,
}

impl ObstacleField {
    pub fn new(budget: u32) -> Self {
        Self {
            blobs: Vec::new(),
            budget,
            next_id: 1,
        }
    }

    /// Total live obstacle nodes
    pub fn pixel_count(&self) -> usize {
        self.blobs.iter().map(|b| b.nodes.len()).sum()
    }

    /// Whether any live blob covers `node`
    pub fn covers(&self, node: u32) -> bool {
        self.blobs.iter().any(|b| b.contains(node))
    }

    /// Blob ID and node record at `node`, if any
    pub fn locate(&self, node: u32) -> Option<(u32, &ObstacleNode)> {
        self.blobs
            .iter()
            .find_map(|b| b.node(node).map(|n| (b.id, n)))
    }

    pub fn node_mut(&mut self, obstacle_id: u32, node: u32) -> Option<&mut ObstacleNode> {
        self.blobs
            .iter_mut()
            .find(|b| b.id == obstacle_id)
            .and_then(|b| b.node_mut(node))
    }

    /// Reduce the budget by `decrement`, never below one pixel
    pub fn shrink_budget(&mut self, decrement: u32) {
        self.budget = self.budget.saturating_sub(decrement).max(1);
    }

    /// Throw away every blob and place a fresh set against the current budget.
    ///
    /// Bounded rejection sampling: a candidate blob is rejected when it
    /// touches a forbidden node or lands closer than `obstacle_min_sep` to a
    /// forbidden node or an already placed blob. Falling short of the budget
    /// is accepted.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        track: &Track,
        forbidden: &[u32],
        config: &GameConfig,
        rng: &mut R,
    ) {
        self.blobs.clear();

        // Separation of zero would let blobs overlap
        let min_sep = config.obstacle_min_sep.max(1);
        let mut placed: Vec<u32> = Vec::new();
        let mut remaining = self.budget;

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            if remaining == 0 {
                break;
            }

            let size = rng
                .random_range(config.obstacle_min_size..=config.obstacle_max_size)
                .min(remaining);
            let start = rng.random_range(0..track.len);
            // A blob this long would wrap onto a forbidden node
            if size as usize + forbidden.len() > track.len as usize {
                continue;
            }
            let candidate: Vec<u32> = (0..size)
                .map(|i| track.wrap(start as i64 + i as i64))
                .collect();

            if candidate.iter().any(|n| forbidden.contains(n)) {
                continue;
            }
            let too_close = candidate.iter().any(|&n| {
                forbidden
                    .iter()
                    .chain(placed.iter())
                    .any(|&other| track.circular_distance(n, other) < min_sep)
            });
            if too_close {
                continue;
            }

            let id = self.next_id;
            self.next_id += 1;
            placed.extend_from_slice(&candidate);
            remaining -= size;
            self.blobs.push(Obstacle {
                id,
                nodes: candidate.into_iter().map(ObstacleNode::new).collect(),
            });
        }

        if remaining > 0 {
            log::debug!(
                "Obstacle placement fell short: {} of {} pixels placed",
                self.budget - remaining,
                self.budget
            );
        }
        log::info!(
            "Generated {} obstacles ({} pixels, budget {})",
            self.blobs.len(),
            self.pixel_count(),
            self.budget
        );
    }

    /// Advance breathing timers and remove nodes that breathed too long.
    ///
    /// Blobs left without nodes are dropped. Returns the removed nodes.
    pub fn decay(&mut self, dt: f32, breathing_duration: f32) -> Vec<ExpiredNode> {
        let mut expired = Vec::new();
        for blob in &mut self.blobs {
            let id = blob.id;
            blob.nodes.retain_mut(|node| {
                if !node.breathing {
                    return true;
                }
                node.breathing_timer += dt;
                if node.breathing_timer >= breathing_duration {
                    expired.push(ExpiredNode {
                        obstacle_id: id,
                        node: node.index,
                    });
                    false
                } else {
                    true
                }
            });
        }
        self.blobs.retain(|b| !b.nodes.is_empty());

        for e in &expired {
            log::debug!("Obstacle {} lost node {}", e.obstacle_id, e.node);
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field_with(blobs: Vec<Vec<u32>>) -> ObstacleField {
        let mut field = ObstacleField::new(30);
        for nodes in blobs {
            let id = field.next_id;
            field.next_id += 1;
            field.blobs.push(Obstacle {
                id,
                nodes: nodes.into_iter().map(ObstacleNode::new).collect(),
            });
        }
        field
    }

    #[test]
    fn test_generation_respects_budget_and_sizes() {
        let config = GameConfig::default();
        let track = Track::new(config.track_len);
        let mut rng = Pcg32::seed_from_u64(42);
        let mut field = ObstacleField::new(config.obstacle_starting_pixels);
        field.regenerate(&track, &[0, 1, 79], &config, &mut rng);

        assert!(!field.blobs.is_empty());
        assert!(field.pixel_count() <= 30);
        for blob in &field.blobs {
            assert!(blob.nodes.len() as u32 <= config.obstacle_max_size);
            // Contiguous along the ring
            for pair in blob.nodes.windows(2) {
                assert_eq!(track.wrap(pair[0].index as i64 + 1), pair[1].index);
            }
        }
    }

    #[test]
    fn test_ids_keep_increasing() {
        let config = GameConfig::default();
        let track = Track::new(config.track_len);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = ObstacleField::new(12);

        field.regenerate(&track, &[0, 1, 79], &config, &mut rng);
        let first_max = field.blobs.iter().map(|b| b.id).max().unwrap();
        field.regenerate(&track, &[0, 1, 79], &config, &mut rng);
        assert!(field.blobs.iter().all(|b| b.id > first_max));
        assert!(field.blobs.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_tiny_budget_clamps_blob_size() {
        let config = GameConfig::default();
        let track = Track::new(config.track_len);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut field = ObstacleField::new(1);
        field.regenerate(&track, &[0, 1, 79], &config, &mut rng);

        assert_eq!(field.pixel_count(), 1);
        assert_eq!(field.blobs.len(), 1);
    }

    #[test]
    fn test_crowded_track_falls_short_silently() {
        let config = GameConfig {
            track_len: 12,
            ..Default::default()
        };
        let track = Track::new(config.track_len);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut field = ObstacleField::new(30);
        field.regenerate(&track, &[0, 1, 11], &config, &mut rng);

        assert!(field.pixel_count() < 30);
    }

    #[test]
    fn test_oversized_blobs_are_never_built() {
        // Bypasses validation on purpose
        let config = GameConfig {
            obstacle_min_size: 2_000_000,
            obstacle_max_size: 2_000_000,
            ..Default::default()
        };
        let track = Track::new(config.track_len);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = ObstacleField::new(2_000_000);
        field.regenerate(&track, &[0, 1, 79], &config, &mut rng);

        assert!(field.blobs.is_empty());
        assert_eq!(field.budget, 2_000_000);
    }

    #[test]
    fn test_shrink_budget_floors_at_one() {
        let mut field = ObstacleField::new(5);
        field.shrink_budget(3);
        assert_eq!(field.budget, 2);
        field.shrink_budget(3);
        assert_eq!(field.budget, 1);
        field.shrink_budget(3);
        assert_eq!(field.budget, 1);
    }

    #[test]
    fn test_decay_removes_expired_nodes() {
        let mut field = field_with(vec![vec![10, 11], vec![30]]);
        field.blobs[0].nodes[0].breathing = true;
        field.blobs[1].nodes[0].breathing = true;

        assert!(field.decay(2.0, 3.0).is_empty());
        let expired = field.decay(1.0, 3.0);
        assert_eq!(
            expired,
            vec![
                ExpiredNode { obstacle_id: 1, node: 10 },
                ExpiredNode { obstacle_id: 2, node: 30 },
            ]
        );
        // Blob 2 had a single node and is gone entirely
        assert_eq!(field.blobs.len(), 1);
        assert!(!field.covers(10));
        assert!(field.covers(11));
    }

    #[test]
    fn test_calm_resets_breathing() {
        let mut field = field_with(vec![vec![20, 21, 22]]);
        let node = field.node_mut(1, 21).unwrap();
        node.breathing = true;
        node.breathing_timer = 1.5;
        node.calm();

        assert_eq!(field.locate(21).map(|(id, n)| (id, n.breathing)), Some((1, false)));
        assert_eq!(field.decay(10.0, 3.0), vec![]);
    }

    #[test]
    fn test_pulse_scale_at_rest() {
        assert_eq!(pulse_scale(false, 0.3), 1.0);
        let scale = pulse_scale(true, 0.125);
        assert!((scale - 1.3).abs() < 1e-5);
    }
}
