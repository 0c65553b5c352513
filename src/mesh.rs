//! Subdivided water plane mesh.

use bytemuck::{Pod, Zeroable};

use crate::noise::GradientNoise;
use crate::params::{RenderConfig, WaterParams};
use crate::waves;

/// Vertex data for the water mesh (position + precomputed elevation)
///
/// `elevation` is only meaningful when displacement runs on the CPU; the
/// vertex shader otherwise computes it itself.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub elevation: f32,
}

/// Flat square plane in XZ, centered on the origin, +Y up
pub struct WaterPlane {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    segments: usize,
}

impl WaterPlane {
    /// Build a `size` x `size` plane with `segments` subdivisions per side
    pub fn new(size: f32, segments: usize) -> Self {
        let segments = segments.max(1);
        let spacing = size / segments as f32;
        let half_size = size / 2.0;

        let mut vertices = Vec::with_capacity((segments + 1).pow(2));
        let mut indices = Vec::with_capacity(segments.pow(2) * 6);

        for z in 0..=segments {
            for x in 0..=segments {
                vertices.push(Vertex {
                    position: [
                        x as f32 * spacing - half_size,
                        0.0,
                        z as f32 * spacing - half_size,
                    ],
                    elevation: 0.0,
                });
            }
        }

        // Counter-clockwise seen from +Y
        for z in 0..segments {
            for x in 0..segments {
                let top_left = (z * (segments + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (segments + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            segments,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.plane_size, config.plane_segments)
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Evaluate the wave function at every vertex for the current parameters
    pub fn displace<N: GradientNoise + ?Sized>(&mut self, params: &WaterParams, noise: &N) {
        for vertex in &mut self.vertices {
            let [x, _, z] = vertex.position;
            let (moved, elevation) = waves::displace([x, 0.0, z], params, noise);
            vertex.position = moved;
            vertex.elevation = elevation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WaveNoise;

    #[test]
    fn test_plane_creation() {
        let plane = WaterPlane::new(100.0, 128);

        // (segments + 1)^2 vertices, segments^2 * 2 triangles * 3 indices
        assert_eq!(plane.vertices.len(), 129 * 129);
        assert_eq!(plane.indices.len(), 128 * 128 * 6);

        let first = plane.vertices[0].position;
        let last = plane.vertices[plane.vertices.len() - 1].position;
        assert_eq!(first, [-50.0, 0.0, -50.0]);
        assert_eq!(last, [50.0, 0.0, 50.0]);
    }

    #[test]
    fn test_indices_in_bounds() {
        let plane = WaterPlane::new(2.0, 4);
        let n = plane.vertices.len() as u32;
        assert!(plane.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_displace_is_repeatable() {
        let mut plane = WaterPlane::new(10.0, 8);
        let params = WaterParams {
            elapsed_time_s: 1.7,
            ..WaterParams::default()
        };
        let noise = WaveNoise::default();

        plane.displace(&params, &noise);
        let once: Vec<[f32; 3]> = plane.vertices.iter().map(|v| v.position).collect();
        plane.displace(&params, &noise);
        let twice: Vec<[f32; 3]> = plane.vertices.iter().map(|v| v.position).collect();
        assert_eq!(once, twice);

        for v in &plane.vertices {
            assert_eq!(v.position[1], v.elevation);
        }
    }
}
