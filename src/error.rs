//! Error types for window bootstrap, GL resource creation and shader builds.

use std::fmt::{self, Display};

use crate::shaders::ShaderStage;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to build the triangle's shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The driver refused to allocate a shader or program object.
    Create(String),
    /// A stage failed to compile. `log` is the driver's info log.
    Compile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Driver diagnostic.
        log: String,
    },
    /// Both stages compiled but the program did not link.
    Link {
        /// Driver diagnostic.
        log: String,
    },
}

impl Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Create(msg) => write!(f, "failed to create GL shader object: {msg}"),
            ShaderError::Compile { stage, log } => {
                write!(f, "failed to compile {stage} shader: {}", log.trim_end())
            }
            ShaderError::Link { log } => write!(f, "program link error: {}", log.trim_end()),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Top-level error.
#[derive(Debug)]
pub enum Error {
    /// The windowing library could not be initialized.
    Init(glfw::InitError),
    /// The window (and its GL context) could not be created.
    WindowCreation {
        /// Requested size.
        width: u32,
        /// Requested size.
        height: u32,
    },
    /// The named GL entry point could not be resolved for the current
    /// context.
    Loader(String),
    /// A GL object could not be allocated.
    Gl(String),
    /// The shader program could not be built.
    Shader(ShaderError),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Init(e) => write!(f, "failed to initialize GLFW: {e}"),
            Error::WindowCreation { width, height } => {
                write!(f, "failed to create a {width}x{height} window with an OpenGL context")
            }
            Error::Loader(name) => write!(f, "failed to load OpenGL entry point `{name}`"),
            Error::Gl(msg) => write!(f, "GL resource creation failed: {msg}"),
            Error::Shader(e) => e.fmt(f),
        }
    }
}

impl Error {
    /// Whether the failure was already reported on stdout where it happened.
    /// Stage compile failures are; the binary does not log them again.
    #[must_use]
    pub fn is_reported(&self) -> bool {
        matches!(self, Error::Shader(ShaderError::Compile { .. }))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Init(e) => Some(e),
            Error::Shader(e) => Some(e),
            Error::WindowCreation { .. } | Error::Loader(_) | Error::Gl(_) => None,
        }
    }
}

impl From<ShaderError> for Error {
    fn from(value: ShaderError) -> Self {
        Error::Shader(value)
    }
}

impl From<glfw::InitError> for Error {
    fn from(value: glfw::InitError) -> Self {
        Error::Init(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn compile_error_names_the_stage_and_log() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:3(1): error: syntax error\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to compile fragment shader: 0:3(1): error: syntax error"
        );
    }

    #[test]
    fn shader_error_is_the_source_of_the_top_level_error() {
        let err = Error::from(ShaderError::Link {
            log: "no main".to_string(),
        });
        assert_eq!(err.to_string(), "program link error: no main");
        assert!(err.source().is_some());
        assert!(Error::Gl("out of memory".into()).source().is_none());
    }

    #[test]
    fn only_compile_failures_count_as_reported() {
        let compile = Error::from(ShaderError::Compile {
            stage: ShaderStage::Vertex,
            log: "error".to_string(),
        });
        assert!(compile.is_reported());
        assert!(!Error::from(ShaderError::Link { log: String::new() }).is_reported());
        assert!(!Error::Loader("glGetString".into()).is_reported());
    }

    #[test]
    fn window_creation_reports_requested_size() {
        let err = Error::WindowCreation {
            width: 640,
            height: 480,
        };
        assert!(err.to_string().contains("640x480"));
    }
}
