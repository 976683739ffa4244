//! Tunable constants recognized by the decimator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use meshcore::MeshError;

/// Configuration recognized by the decimator (spec: "Configuration
/// recognized by the decimator" constants, made tunable per field rather
/// than hardwired).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecimateConfig {
    /// Target number of triangles; clamped implicitly by the achievable
    /// minimum (a run never fails for aiming too low).
    pub target_face_count: u32,
    /// Weight applied to boundary-crease quadrics.
    pub boundary_penalty: f32,
    /// Below this determinant magnitude, a quadric's optimum solve is
    /// considered singular and the midpoint/endpoint fallback is used.
    pub singularity_threshold: f32,
    /// Iteration guard on vertex-fan walks, catching topology corruption
    /// before it becomes an infinite loop.
    pub max_fan_iterations: u32,
}

impl DecimateConfig {
    pub fn new(target_face_count: u32) -> Self {
        Self {
            target_face_count,
            ..Self::default()
        }
    }
}

impl Default for DecimateConfig {
    fn default() -> Self {
        Self {
            target_face_count: 0,
            boundary_penalty: meshcore::BOUNDARY_PENALTY,
            singularity_threshold: meshcore::SINGULARITY_THRESHOLD,
            max_fan_iterations: 1000,
        }
    }
}

/// Errors surfaced at the decimator's outer boundary.
///
/// Per the propagation policy: non-contractable pairs, numeric
/// singularities, and user aborts are all expected outcomes handled
/// internally and never reach this type. Only mesh-layer faults
/// (topology corruption) are wrapped here.
#[derive(Debug, Error)]
pub enum DecimateError {
    #[error("mesh topology error during decimation: {0}")]
    Mesh(#[from] MeshError),
}
