//! Shared mesh fixtures for unit tests across this crate.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::{HalfEdgeMesh, MeshIndex, TriangleSoup};

/// A single CCW triangle with three boundary edges.
pub fn single_triangle() -> HalfEdgeMesh {
    let soup = TriangleSoup {
        name: "triangle".into(),
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 1.0, 0.0),
        ],
        normals: vec![Vec3::Z; 3],
        indices: vec![0, 1, 2],
    };
    HalfEdgeMesh::from_triangle_soup(soup).expect("fixture builds")
}

pub fn single_triangle_vertices(_mesh: &HalfEdgeMesh) -> (MeshIndex, MeshIndex, MeshIndex) {
    (MeshIndex(0), MeshIndex(1), MeshIndex(2))
}

/// A closed, 4-vertex, 4-face regular tetrahedron. Every vertex is
/// interior with valence 3.
pub fn tetrahedron() -> HalfEdgeMesh {
    let positions = vec![
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ];
    let normals: Vec<Vec3> = positions.iter().map(|p| p.normalize()).collect();
    let soup = TriangleSoup {
        name: "tetrahedron".into(),
        positions,
        normals,
        indices: vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2],
    };
    HalfEdgeMesh::from_triangle_soup(soup).expect("fixture builds")
}

pub fn tetrahedron_vertices(_mesh: &HalfEdgeMesh) -> (MeshIndex, MeshIndex, MeshIndex, MeshIndex) {
    (MeshIndex(0), MeshIndex(1), MeshIndex(2), MeshIndex(3))
}

/// Two triangles sharing only a single vertex, pre-split. Construction
/// splits the shared apex, so the returned mesh has 6 vertices / 2 faces.
pub fn bowtie() -> HalfEdgeMesh {
    let soup = TriangleSoup {
        name: "bowtie".into(),
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        ],
        normals: vec![Vec3::Z; 5],
        indices: vec![0, 1, 2, 0, 3, 4],
    };
    HalfEdgeMesh::from_triangle_soup(soup).expect("fixture builds")
}

/// A flat `w x h` vertex grid in the XY plane, triangulated two triangles
/// per cell. Returns `(mesh, a_corner, an_interior_vertex)`.
pub fn planar_grid(w: u32, h: u32) -> (HalfEdgeMesh, MeshIndex, MeshIndex) {
    assert!(w >= 2 && h >= 2);
    let idx = |i: u32, j: u32| j * w + i;

    let mut positions = Vec::with_capacity((w * h) as usize);
    for j in 0..h {
        for i in 0..w {
            positions.push(Vec3::new(i as f32, j as f32, 0.0));
        }
    }
    let normals = vec![Vec3::Z; positions.len()];

    let mut indices = Vec::new();
    for j in 0..h - 1 {
        for i in 0..w - 1 {
            let a = idx(i, j);
            let b = idx(i + 1, j);
            let c = idx(i, j + 1);
            let d = idx(i + 1, j + 1);
            indices.extend_from_slice(&[a, b, d]);
            indices.extend_from_slice(&[a, d, c]);
        }
    }

    let soup = TriangleSoup {
        name: "grid".into(),
        positions,
        normals,
        indices,
    };
    let mesh = HalfEdgeMesh::from_triangle_soup(soup).expect("fixture builds");
    let corner = MeshIndex(idx(0, 0));
    let center = MeshIndex(idx(w / 2, h / 2));
    (mesh, corner, center)
}

/// An open disk: `n` boundary vertices around a single interior center
/// vertex (index 0).
pub fn triangle_fan(n: u32) -> HalfEdgeMesh {
    assert!(n >= 3);
    let mut positions = vec![Vec3::ZERO];
    for k in 0..n {
        let theta = TAU * (k as f32) / (n as f32);
        positions.push(Vec3::new(theta.cos(), theta.sin(), 0.0));
    }
    let normals = vec![Vec3::Z; positions.len()];

    let mut indices = Vec::new();
    for k in 0..n {
        let rim_k = 1 + k;
        let rim_next = 1 + (k + 1) % n;
        indices.extend_from_slice(&[0, rim_k, rim_next]);
    }

    let soup = TriangleSoup {
        name: "disk".into(),
        positions,
        normals,
        indices,
    };
    HalfEdgeMesh::from_triangle_soup(soup).expect("fixture builds")
}

pub fn triangle_fan_center(_mesh: &HalfEdgeMesh) -> MeshIndex {
    MeshIndex(0)
}
