//! The renderer: owns the triangle's GL objects and issues the per-frame
//! clear and draw.

use std::sync::Arc;

use glow::HasContext;

use crate::{
    error::{Error, Result},
    shaders,
    types::{
        Vertex, POSITION_ATTRIBUTE, POSITION_COMPONENTS, TRIANGLE, TRIANGLE_VERTEX_COUNT,
        VERTEX_STRIDE,
    },
};

/// The two commands a frame is made of.
///
/// [`GlTarget`] forwards them to OpenGL; tests record them.
pub trait DrawTarget {
    /// Clear the color buffer.
    fn clear(&mut self);
    /// Draw `count` vertices starting at `first` as a triangle list, using
    /// whatever buffer, attribute and program state is bound.
    fn draw_triangles(&mut self, first: i32, count: i32);
}

/// Issue one frame: a clear, then one triangle draw of `vertex_count`
/// vertices.
pub fn draw_frame<T: DrawTarget + ?Sized>(target: &mut T, vertex_count: i32) {
    target.clear();
    target.draw_triangles(0, vertex_count);
}

/// [`DrawTarget`] backed by a glow context.
pub struct GlTarget<'a, C: HasContext> {
    gl: &'a C,
}

impl<'a, C: HasContext> GlTarget<'a, C> {
    /// Wrap a context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for as long as the target
    /// is used.
    pub unsafe fn new(gl: &'a C) -> Self {
        Self { gl }
    }
}

impl<C: HasContext> DrawTarget for GlTarget<'_, C> {
    fn clear(&mut self) {
        // SAFETY: the context is current per `GlTarget::new`.
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) };
    }

    fn draw_triangles(&mut self, first: i32, count: i32) {
        // SAFETY: the context is current per `GlTarget::new`.
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) };
    }
}

/// Owns the triangle's shader program, vertex array and vertex buffer.
///
/// # Example
///
/// ```no_run
/// # use glow_triangle::TriangleRenderer;
/// # use std::sync::Arc;
/// # fn example(gl: Arc<glow::Context>) {
/// // During setup (with a current GL context):
/// let renderer = unsafe { TriangleRenderer::new(gl) }.unwrap();
///
/// // Each frame:
/// unsafe { renderer.render() };
///
/// // Before the context goes away:
/// unsafe { renderer.destroy() };
/// # }
/// ```
pub struct TriangleRenderer {
    /// The OpenGL context, shared with the window that created it.
    gl: Arc<glow::Context>,
    /// Linked program built from [`shaders::VERTEX_SRC`] and
    /// [`shaders::FRAGMENT_SRC`].
    program: glow::Program,
    /// Vertex array object recording the attribute layout. Core-profile
    /// contexts reject draws without one.
    vao: glow::VertexArray,
    /// Static vertex buffer holding [`TRIANGLE`].
    vbo: glow::Buffer,
}

impl TriangleRenderer {
    /// Upload the triangle, build the shader program and bind both.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current and valid. The caller must ensure
    /// that [`destroy`](Self::destroy) is called before the context is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shader`] if either stage fails to compile or the
    /// program fails to link, and [`Error::Gl`] if a buffer or vertex array
    /// cannot be allocated. Nothing is left allocated on error.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Result<Self> {
        let (vao, vbo) = unsafe {
            let vao = gl.create_vertex_array().map_err(Error::Gl)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(Error::Gl(e));
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&TRIANGLE),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(
                POSITION_ATTRIBUTE,
                POSITION_COMPONENTS,
                glow::FLOAT,
                false,
                VERTEX_STRIDE,
                0,
            );
            gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE);

            (vao, vbo)
        };

        let program = match unsafe {
            shaders::compile_program(&*gl, shaders::VERTEX_SRC, shaders::FRAGMENT_SRC)
        } {
            Ok(program) => program,
            Err(e) => {
                unsafe {
                    gl.bind_vertex_array(None);
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                }
                return Err(e.into());
            }
        };

        unsafe { gl.use_program(Some(program)) };
        log::debug!("triangle uploaded, program linked");

        Ok(Self {
            gl,
            program,
            vao,
            vbo,
        })
    }

    /// Draw one frame into the current framebuffer.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn render(&self) {
        let mut target = unsafe { self.target() };
        draw_frame(&mut target, TRIANGLE_VERTEX_COUNT);
    }

    /// A [`DrawTarget`] over this renderer's context, with the triangle's
    /// vertex array and program bound.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn target(&self) -> GlTarget<'_, glow::Context> {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.use_program(Some(self.program));
            GlTarget::new(&*self.gl)
        }
    }

    /// Read the vertex buffer back from the GPU.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn read_back_vertices(&self) -> [Vertex; 3] {
        let mut vertices = [Vertex { position: [0.0; 2] }; 3];
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            self.gl.get_buffer_sub_data(
                glow::ARRAY_BUFFER,
                0,
                bytemuck::cast_slice_mut(&mut vertices),
            );
        }
        vertices
    }

    /// The linked program handle.
    #[must_use]
    pub fn program(&self) -> glow::Program {
        self.program
    }

    /// Clean up all GL resources owned by this renderer.
    ///
    /// # Safety
    ///
    /// Must be called with the same GL context that was used to create the
    /// renderer, and must be called exactly once.
    pub unsafe fn destroy(&self) {
        let gl = &self.gl;
        unsafe {
            gl.use_program(None);
            gl.bind_vertex_array(None);
            gl.delete_program(self.program);
            gl.delete_buffer(self.vbo);
            gl.delete_vertex_array(self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear,
        Draw { first: i32, count: i32 },
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl DrawTarget for Recorder {
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn draw_triangles(&mut self, first: i32, count: i32) {
            self.calls.push(Call::Draw { first, count });
        }
    }

    #[test]
    fn frame_is_one_clear_then_one_three_vertex_draw() {
        let mut recorder = Recorder::default();
        draw_frame(&mut recorder, TRIANGLE_VERTEX_COUNT);
        assert_eq!(
            recorder.calls,
            vec![Call::Clear, Call::Draw { first: 0, count: 3 }]
        );
    }

    #[test]
    fn frames_do_not_accumulate_state() {
        let mut recorder = Recorder::default();
        draw_frame(&mut recorder, 3);
        draw_frame(&mut recorder, 3);
        assert_eq!(recorder.calls.len(), 4);
        assert_eq!(recorder.calls[2], Call::Clear);
    }
}
