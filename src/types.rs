//! Vertex data uploaded to the GPU.

use bytemuck::{Pod, Zeroable};

/// A 2D vertex in normalized device coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// `x`, `y` in the range `[-1, 1]`.
    pub position: [f32; 2],
}

/// The triangle drawn every frame.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex {
        position: [-0.5, -0.5],
    },
    Vertex {
        position: [0.0, 0.5],
    },
    Vertex {
        position: [0.5, -0.5],
    },
];

/// Attribute location of `position` in [`VERTEX_SRC`](crate::shaders::VERTEX_SRC).
pub const POSITION_ATTRIBUTE: u32 = 0;

/// Floats per vertex in the `position` attribute.
pub const POSITION_COMPONENTS: i32 = 2;

/// Byte distance between consecutive vertices.
// Vertex is 8 bytes, well within i32 range.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const VERTEX_STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;

/// Number of vertices handed to `glDrawArrays` each frame.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const TRIANGLE_VERTEX_COUNT: i32 = TRIANGLE.len() as i32;
