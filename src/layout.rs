//! Ring layout for renderers
//!
//! Maps track nodes to screen space. Node 0 (the light) sits at the top of the
//! ring and indices increase clockwise. Screen y grows downward.

use glam::Vec2;

use crate::config::GameConfig;
use crate::{cartesian_to_polar, normalize_angle, polar_to_cartesian};

/// Where one node's square is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacement {
    pub center: Vec2,
    /// Square rotation so one edge faces the ring centre (radians)
    pub rotation: f32,
    /// Side length in pixels
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub center: Vec2,
    pub radius: f32,
    pub pixel_size: f32,
    pub track_len: u32,
}

impl RingLayout {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            center: Vec2::new(config.canvas_width / 2.0, config.canvas_height / 2.0),
            radius: config.ring_radius,
            pixel_size: config.pixel_size,
            track_len: config.track_len,
        }
    }

    /// Angle of a node around the centre (screen space, node 0 at the top)
    pub fn node_angle(&self, node: u32) -> f32 {
        let frac = node as f32 / self.track_len as f32;
        normalize_angle(frac * std::f32::consts::TAU - std::f32::consts::FRAC_PI_2)
    }

    pub fn node_center(&self, node: u32) -> Vec2 {
        self.center + polar_to_cartesian(self.radius, self.node_angle(node))
    }

    /// Placement of a node square, scaled by a breathing hint
    pub fn place(&self, node: u32, scale: f32) -> NodePlacement {
        let angle = self.node_angle(node);
        NodePlacement {
            center: self.center + polar_to_cartesian(self.radius, angle),
            rotation: normalize_angle(angle + std::f32::consts::FRAC_PI_2),
            size: self.pixel_size * scale,
        }
    }

    /// Node drawn under a screen point, if the point is on the ring band
    pub fn node_at_point(&self, point: Vec2) -> Option<u32> {
        let (r, theta) = cartesian_to_polar(point - self.center);
        if (r - self.radius).abs() > self.pixel_size / 2.0 {
            return None;
        }
        let turns = (theta + std::f32::consts::FRAC_PI_2).rem_euclid(std::f32::consts::TAU)
            / std::f32::consts::TAU;
        let node = (turns * self.track_len as f32).round() as u32 % self.track_len;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> RingLayout {
        RingLayout::from_config(&GameConfig::default())
    }

    #[test]
    fn test_light_node_at_top() {
        let pos = layout().node_center(0);
        assert!((pos.x - 400.0).abs() < 1e-3);
        assert!((pos.y - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_quarter_turn_is_right_side() {
        let pos = layout().node_center(20);
        assert!((pos.x - 650.0).abs() < 1e-3);
        assert!((pos.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_place_scales_square() {
        let placement = layout().place(10, 1.3);
        assert!((placement.size - 14.0 * 1.3).abs() < 1e-4);
    }

    #[test]
    fn test_node_at_point_inverts_center() {
        let layout = layout();
        for node in [0, 1, 20, 41, 79] {
            assert_eq!(layout.node_at_point(layout.node_center(node)), Some(node));
        }
        assert_eq!(layout.node_at_point(layout.center), None);
    }
}
