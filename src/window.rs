//! Windowing bootstrap on GLFW.
//!
//! [`Platform`] owns the library's process-wide state. GLFW is terminated
//! when the last handle to it (the platform or any window created from it)
//! is dropped, so early returns clean up without explicit calls.

use glfw::{Context as _, GlfwReceiver, PWindow, WindowEvent};
use glow::HasContext;

use crate::{
    app::Surface,
    error::{Error, Result},
    input::{Flow, InputSink},
};

/// Window and context parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Client-area width in screen coordinates.
    pub width: u32,
    /// Client-area height in screen coordinates.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Requested core-profile OpenGL version.
    pub gl_version: (u32, u32),
    /// Swap on vertical blank.
    pub vsync: bool,
    /// Show the window. Hidden windows still get a usable context.
    pub visible: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "Simple example".to_string(),
            gl_version: (3, 3),
            vsync: true,
            visible: true,
        }
    }
}

fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {error:?}: {description}");
}

/// Initialized windowing library.
pub struct Platform {
    glfw: glfw::Glfw,
}

impl Platform {
    /// Initialize GLFW and route its errors to the log.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Init`] if the library cannot be initialized.
    pub fn init() -> Result<Self> {
        let glfw = glfw::init(log_glfw_error)?;
        log::debug!("GLFW {} initialized", glfw::get_version_string());
        Ok(Self { glfw })
    }

    /// Create a window and make its OpenGL context current on this thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WindowCreation`] if GLFW cannot create the window,
    /// typically because the requested GL version is unavailable.
    pub fn create_window(&mut self, config: &WindowConfig) -> Result<AppWindow> {
        let (major, minor) = config.gl_version;
        self.glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        self.glfw
            .window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        self.glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        self.glfw.window_hint(glfw::WindowHint::Visible(config.visible));
        self.glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = self
            .glfw
            .create_window(
                config.width,
                config.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(Error::WindowCreation {
                width: config.width,
                height: config.height,
            })?;

        window.make_current();
        window.set_key_polling(true);
        window.set_close_polling(true);
        self.glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        log::info!(
            "created {}x{} window {:?}",
            config.width,
            config.height,
            config.title
        );
        Ok(AppWindow { window, events })
    }
}

/// A window with a current OpenGL context.
pub struct AppWindow {
    window: PWindow,
    events: GlfwReceiver<(f64, WindowEvent)>,
}

/// Entry point glow calls while building its context; without it no GL
/// call can work.
const GET_STRING: &str = "glGetString";

/// Check that `name` resolved to a usable address.
///
/// A failure is logged as a warning before it is returned, so the message
/// reaches stderr even if the caller chooses to carry on.
fn require_entry_point(name: &str, address: *const std::ffi::c_void) -> Result<()> {
    if address.is_null() {
        log::warn!("OpenGL loader could not resolve `{name}`");
        return Err(Error::Loader(name.to_string()));
    }
    Ok(())
}

impl AppWindow {
    /// Resolve GL entry points through the window's context.
    ///
    /// A version below the requested one is logged as a warning and
    /// execution continues.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Loader`] if `glGetString` cannot be resolved. glow
    /// reads `GL_VERSION` while building its context, so there is nothing to
    /// continue with in that case.
    pub fn load_gl(&mut self, config: &WindowConfig) -> Result<glow::Context> {
        require_entry_point(GET_STRING, self.window.get_proc_address(GET_STRING) as *const _)?;

        let gl = unsafe {
            glow::Context::from_loader_function(|name| {
                self.window.get_proc_address(name) as *const _
            })
        };

        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        println!("{version}");
        log::info!("OpenGL version: {version}");

        let reported = gl.version();
        let (major, minor) = config.gl_version;
        if (reported.major, reported.minor) < (major, minor) {
            log::warn!(
                "OpenGL {major}.{minor} requested but the loader reports {}.{}; continuing",
                reported.major,
                reported.minor
            );
        }
        Ok(gl)
    }
}

impl Surface for AppWindow {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn request_close(&mut self) {
        self.window.set_should_close(true);
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn poll_events(&mut self, sink: &mut dyn InputSink) {
        self.window.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                WindowEvent::Key(key, _, action, _) => {
                    if sink.on_key(key, action) == Flow::Close {
                        self.window.set_should_close(true);
                    }
                }
                WindowEvent::Close => log::debug!("close requested by the window system"),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_classic_example_window() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.title, "Simple example");
        assert_eq!(config.gl_version, (3, 3));
        assert!(config.visible);
    }

    #[test]
    fn unresolved_entry_point_is_a_loader_error() {
        let err = require_entry_point(GET_STRING, std::ptr::null()).unwrap_err();
        assert!(matches!(&err, Error::Loader(name) if name == "glGetString"));
        assert_eq!(
            err.to_string(),
            "failed to load OpenGL entry point `glGetString`"
        );
    }

    #[test]
    fn resolved_entry_point_passes() {
        let marker = 0u8;
        let address = std::ptr::from_ref(&marker).cast::<std::ffi::c_void>();
        assert!(require_entry_point(GET_STRING, address).is_ok());
    }
}
