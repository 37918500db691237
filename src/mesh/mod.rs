//! Host-side procedural geometry.
//!
//! Every generator here is a pure function returning a [`Mesh`]: parallel
//! position/normal/texcoord arrays plus an index list. Nothing in this module
//! touches the GPU; uploading is done by [`crate::renderer::geometry`].
//!
//! Winding convention: every primitive is counter-clockwise when viewed from
//! the side its normals point to.

pub mod plane;
pub mod sphere;
pub mod teapot;
mod teapot_data;
pub mod torus;

pub use plane::plane;
pub use sphere::sphere;
pub use teapot::teapot;
pub use torus::torus;

use glam::{Vec2, Vec3};

/// Relative area below which a triangle is treated as collapsed.
const DEGENERATE_TOLERANCE: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    /// Four indices per primitive, wound like a triangle fan `a b c d`.
    QuadList,
    TriangleList,
}

impl Topology {
    pub const fn indices_per_primitive(self) -> usize {
        match self {
            Topology::QuadList => 4,
            Topology::TriangleList => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error(
        "vertex attributes are not parallel: {positions} positions, {normals} normals, {texcoords} texcoords"
    )]
    AttributeMismatch {
        positions: usize,
        normals: usize,
        texcoords: usize,
    },
    #[error("index {value} at slot {slot} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        slot: usize,
        value: u32,
        vertex_count: usize,
    },
    #[error("{count} indices do not form whole {topology:?} primitives")]
    IncompletePrimitive { count: usize, topology: Topology },
}

/// Immutable generated geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    indices: Vec<u32>,
    topology: Topology,
}

impl Mesh {
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        indices: Vec<u32>,
        topology: Topology,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            positions,
            normals,
            texcoords,
            indices,
            topology,
        };
        mesh.check()?;
        Ok(mesh)
    }

    /// Constructor for the generators in this module, whose output is valid
    /// by construction.
    fn generated(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        indices: Vec<u32>,
        topology: Topology,
    ) -> Self {
        let mesh = Self {
            positions,
            normals,
            texcoords,
            indices,
            topology,
        };
        debug_assert_eq!(mesh.check(), Ok(()));
        mesh
    }

    fn check(&self) -> Result<(), MeshError> {
        let positions = &self.positions;
        if positions.len() != self.normals.len() || positions.len() != self.texcoords.len() {
            return Err(MeshError::AttributeMismatch {
                positions: positions.len(),
                normals: self.normals.len(),
                texcoords: self.texcoords.len(),
            });
        }

        if self.indices.len() % self.topology.indices_per_primitive() != 0 {
            return Err(MeshError::IncompletePrimitive {
                count: self.indices.len(),
                topology: self.topology,
            });
        }

        if let Some((slot, &value)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= positions.len())
        {
            return Err(MeshError::IndexOutOfRange {
                slot,
                value,
                vertex_count: positions.len(),
            });
        }

        Ok(())
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn primitive_count(&self) -> usize {
        self.indices.len() / self.topology.indices_per_primitive()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns a triangle-list copy of this mesh.
    ///
    /// Quads `a b c d` split into `a b c` and `a c d`. Triangles whose
    /// corners collapse onto a line or a point (the pole rows of a UV
    /// sphere) are dropped. Triangle lists are returned unchanged.
    pub fn triangulated(&self) -> Mesh {
        if self.topology == Topology::TriangleList {
            return self.clone();
        }

        let mut indices = Vec::with_capacity(self.primitive_count() * 6);
        for quad in self.indices.chunks_exact(4) {
            for triangle in [[quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]]] {
                if !self.is_degenerate(triangle) {
                    indices.extend_from_slice(&triangle);
                }
            }
        }

        Mesh {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            texcoords: self.texcoords.clone(),
            indices,
            topology: Topology::TriangleList,
        }
    }

    fn is_degenerate(&self, [a, b, c]: [u32; 3]) -> bool {
        let a = self.positions[a as usize];
        let b = self.positions[b as usize];
        let c = self.positions[c as usize];
        let longest = (b - a)
            .length_squared()
            .max((c - a).length_squared())
            .max((c - b).length_squared());
        if longest == 0.0 {
            return true;
        }
        (b - a).cross(c - a).length() <= DEGENERATE_TOLERANCE * longest
    }
}

/// Iterates the corner indices of every triangle in a triangle list.
pub fn triangles(indices: &[u32]) -> impl Iterator<Item = [u32; 3]> + '_ {
    indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
}
