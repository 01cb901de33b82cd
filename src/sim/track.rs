//! Circular track geometry
//!
//! The track is a ring of `len` discrete nodes. Node 0 holds the traffic light
//! and acts as a wall: players can never step onto it.

use serde::{Deserialize, Serialize};

/// Node index of the traffic light
pub const LIGHT_NODE: u32 = 0;

/// A ring of discrete nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Number of nodes on the ring
    pub len: u32,
}

impl Track {
    pub fn new(len: u32) -> Self {
        Self { len }
    }

    /// Map any integer index onto the ring (floored modulo)
    #[inline]
    pub fn wrap(&self, index: i64) -> u32 {
        index.rem_euclid(self.len as i64) as u32
    }

    /// Shortest distance between two nodes, going either way around
    #[inline]
    pub fn circular_distance(&self, a: u32, b: u32) -> u32 {
        let diff = a.abs_diff(b) % self.len;
        diff.min(self.len - diff)
    }

    /// Node a continuous position sits on (rounds half up, like the HUD does)
    #[inline]
    pub fn node_at(&self, position: f32) -> u32 {
        self.wrap(Self::unwrapped_node(position))
    }

    /// Check whether moving from `from` to `to` enters or passes over `node`.
    ///
    /// Walks every discrete node between the two positions, so a long step
    /// cannot tunnel through the wall.
    pub fn path_crosses(&self, from: f32, to: f32, node: u32) -> bool {
        let start = Self::unwrapped_node(from);
        let end = Self::unwrapped_node(to);
        if start == end {
            return false;
        }
        let step = if end > start { 1 } else { -1 };
        let mut current = start;
        while current != end {
            current += step;
            if self.wrap(current) == node {
                return true;
            }
        }
        false
    }

    /// Clockwise neighbour of the traffic light
    #[inline]
    pub fn clockwise_start(&self) -> u32 {
        self.wrap(LIGHT_NODE as i64 + 1)
    }

    /// Counterclockwise neighbour of the traffic light
    #[inline]
    pub fn counterclockwise_start(&self) -> u32 {
        self.wrap(LIGHT_NODE as i64 - 1)
    }

    #[inline]
    fn unwrapped_node(position: f32) -> i64 {
        (position + 0.5).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_negative() {
        let track = Track::new(80);
        assert_eq!(track.wrap(-1), 79);
        assert_eq!(track.wrap(-80), 0);
        assert_eq!(track.wrap(-81), 79);
        assert_eq!(track.wrap(160), 0);
        assert_eq!(track.wrap(83), 3);
    }

    #[test]
    fn test_circular_distance_wraps() {
        let track = Track::new(80);
        assert_eq!(track.circular_distance(1, 79), 2);
        assert_eq!(track.circular_distance(79, 1), 2);
        assert_eq!(track.circular_distance(0, 40), 40);
        assert_eq!(track.circular_distance(12, 12), 0);
    }

    #[test]
    fn test_node_at_rounds_half_up() {
        let track = Track::new(80);
        assert_eq!(track.node_at(1.49), 1);
        assert_eq!(track.node_at(1.5), 2);
        assert_eq!(track.node_at(0.5), 1);
        assert_eq!(track.node_at(79.5), 0);
        assert_eq!(track.node_at(-0.4), 0);
    }

    #[test]
    fn test_path_crosses_wall() {
        let track = Track::new(80);
        // Straddles node 0 going clockwise
        assert!(track.path_crosses(79.4, 79.6, LIGHT_NODE));
        // Tunnels over node 0 in a single step
        assert!(track.path_crosses(79.4, 80.6, LIGHT_NODE));
        // Going counterclockwise from node 1
        assert!(track.path_crosses(0.6, 0.4, LIGHT_NODE));
        // Stays within node 1
        assert!(!track.path_crosses(1.2, 1.4, LIGHT_NODE));
        assert!(!track.path_crosses(5.0, 9.0, LIGHT_NODE));
    }

    #[test]
    fn test_start_nodes_flank_light() {
        let track = Track::new(80);
        assert_eq!(track.clockwise_start(), 1);
        assert_eq!(track.counterclockwise_start(), 79);
    }
}
