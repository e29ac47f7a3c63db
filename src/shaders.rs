//! GLSL shader sources and compilation helpers.
//!
//! Both shaders target GLSL 3.30 core, matching the 3.3 core-profile context
//! requested by [`WindowConfig`](crate::window::WindowConfig).

use std::fmt;

use glow::HasContext;

use crate::error::ShaderError;

/// Pass-through vertex shader: the attribute at location 0 is the clip-space
/// position. Only `x` and `y` are supplied; GL fills `z = 0`, `w = 1`.
pub const VERTEX_SRC: &str = r"#version 330 core

layout(location = 0) in vec4 position;

void main() {
    gl_Position = position;
}
";

/// Fragment shader writing solid red.
pub const FRAGMENT_SRC: &str = r"#version 330 core

layout(location = 0) out vec4 color;

void main() {
    color = vec4(1.0, 0.0, 0.0, 1.0);
}
";

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Per-vertex position stage.
    Vertex,
    /// Per-pixel color stage.
    Fragment,
}

impl ShaderStage {
    /// The `GL_*_SHADER` enum passed to `glCreateShader`.
    #[must_use]
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Compile a shader program from vertex and fragment source strings.
///
/// The compiled shader objects are detached and deleted after successful
/// linking, so only the program handle needs to be cleaned up by the caller.
/// On any failure every object created so far is deleted.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns [`ShaderError::Compile`] naming the failing stage, or
/// [`ShaderError::Link`] with the driver's link log.
pub unsafe fn compile_program<C: HasContext>(
    gl: &C,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<C::Program, ShaderError> {
    let vs = unsafe { compile_shader(gl, ShaderStage::Vertex, vertex_src) }?;
    let fs = match unsafe { compile_shader(gl, ShaderStage::Fragment, fragment_src) } {
        Ok(fs) => fs,
        Err(e) => {
            unsafe { gl.delete_shader(vs) };
            return Err(e);
        }
    };

    unsafe { link_program(gl, vs, fs) }
}

/// Link two compiled stages into a program, validate it, and delete both
/// shader objects.
///
/// `vs` and `fs` are deleted whether or not linking succeeds. A failed
/// validation is logged but does not fail the call: validity depends on
/// state bound at draw time.
///
/// # Safety
///
/// Requires a valid, current OpenGL context. `vs` and `fs` must be live,
/// compiled shader objects of that context.
///
/// # Errors
///
/// Returns [`ShaderError::Link`] with the driver's link log.
pub unsafe fn link_program<C: HasContext>(
    gl: &C,
    vs: C::Shader,
    fs: C::Shader,
) -> Result<C::Program, ShaderError> {
    unsafe {
        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vs);
                gl.delete_shader(fs);
                return Err(ShaderError::Create(e));
            }
        };

        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(ShaderError::Link { log });
        }

        gl.validate_program(program);
        if !gl.get_program_validate_status(program) {
            let log = gl.get_program_info_log(program);
            log::warn!("program failed validation: {}", log.trim_end());
        }

        // Shaders can be detached and deleted after successful linking.
        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        Ok(program)
    }
}

/// The stdout report for a failed stage: a header naming the stage, then the
/// driver's info log.
#[must_use]
pub fn compile_failure_report(stage: ShaderStage, log: &str) -> String {
    format!("Failed to compile {stage} shader!\n{}", log.trim_end())
}

/// Compile a single shader stage from source.
///
/// A failed compile is reported on stdout with the driver's info log.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// On a failed compile the shader object is deleted and the info log is
/// returned inside [`ShaderError::Compile`].
pub unsafe fn compile_shader<C: HasContext>(
    gl: &C,
    stage: ShaderStage,
    source: &str,
) -> Result<C::Shader, ShaderError> {
    unsafe {
        let shader = gl.create_shader(stage.gl_enum()).map_err(ShaderError::Create)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            println!("{}", compile_failure_report(stage, &log));
            log::debug!("{stage} shader object deleted after failed compile");
            return Err(ShaderError::Compile { stage, log });
        }

        Ok(shader)
    }
}
