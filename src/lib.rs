//! A minimal OpenGL bootstrap: one GLFW window drawing one red triangle
//! through [glow].
//!
//! The program runs four phases in order:
//!
//! 1. [`Platform::init`] and [`Platform::create_window`] open a 640×480
//!    window and make its 3.3 core context current.
//! 2. [`AppWindow::load_gl`] resolves GL entry points into a
//!    [`glow::Context`].
//! 3. [`TriangleRenderer::new`] uploads the static triangle and links the
//!    shader program.
//! 4. [`run_loop`] clears, draws, presents and polls events until the window
//!    is closed or Escape is pressed.
//!
//! [`run`] wires all of them together.
//!
//! # Safety
//!
//! Creating and using a [`TriangleRenderer`] requires a valid, current OpenGL
//! context. Its methods are `unsafe` because they issue raw GL calls.
//!
//! [glow]: https://docs.rs/glow

mod app;
mod error;
mod input;
mod logging;
mod render;
mod shaders;
mod types;
mod window;

pub use app::{run, run_loop, LoopState, Surface};
pub use error::{Error, Result, ShaderError};
pub use input::{EscapeToClose, Flow, InputSink};
pub use logging::{init_logging, LoggingConfig};
pub use render::{draw_frame, DrawTarget, GlTarget, TriangleRenderer};
pub use shaders::{
    compile_failure_report, compile_program, compile_shader, link_program, ShaderStage,
    FRAGMENT_SRC, VERTEX_SRC,
};
pub use types::{Vertex, TRIANGLE};
pub use window::{AppWindow, Platform, WindowConfig};
