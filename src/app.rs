//! The render loop and the program it drives.

use std::sync::Arc;

use crate::{
    error::Result,
    input::{EscapeToClose, InputSink},
    render::{draw_frame, DrawTarget, TriangleRenderer},
    types::TRIANGLE_VERTEX_COUNT,
    window::{Platform, WindowConfig},
};

/// Render loop state. The only transition is `Running -> Closing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Frames are being drawn.
    Running,
    /// A close was requested; the loop exits before drawing again.
    Closing,
}

/// A presentable window as seen by the render loop.
pub trait Surface {
    /// Whether a close has been requested by the OS or by input.
    fn should_close(&self) -> bool;
    /// Set the close flag.
    fn request_close(&mut self);
    /// Present the frame just drawn.
    fn swap_buffers(&mut self);
    /// Process queued events without blocking, handing key events to `sink`.
    /// A [`Flow::Close`](crate::input::Flow::Close) from the sink must end in
    /// [`request_close`](Self::request_close).
    fn poll_events(&mut self, sink: &mut dyn InputSink);

    /// Current loop state, derived from the close flag.
    fn state(&self) -> LoopState {
        if self.should_close() {
            LoopState::Closing
        } else {
            LoopState::Running
        }
    }
}

/// Run frames until the surface is closing.
///
/// Each iteration is clear, draw, present, poll, in that order. The close
/// flag is checked before every frame, so nothing is drawn once it is set.
/// Returns the number of frames drawn.
pub fn run_loop<S, T>(surface: &mut S, target: &mut T, sink: &mut dyn InputSink) -> u64
where
    S: Surface + ?Sized,
    T: DrawTarget + ?Sized,
{
    let mut frames = 0;
    while surface.state() == LoopState::Running {
        draw_frame(target, TRIANGLE_VERTEX_COUNT);
        surface.swap_buffers();
        surface.poll_events(sink);
        frames += 1;
    }
    log::debug!("render loop closing after {frames} frames");
    frames
}

/// Open the window, draw the triangle until closed, then tear down.
///
/// # Errors
///
/// Fails if the windowing library cannot be initialized, the window cannot
/// be created, GL entry points cannot be resolved, or the shader program
/// cannot be built. No frame is drawn in any of those cases.
pub fn run(config: &WindowConfig) -> Result<()> {
    let mut platform = Platform::init()?;
    let mut window = platform.create_window(config)?;
    let gl = Arc::new(window.load_gl(config)?);

    let renderer = unsafe { TriangleRenderer::new(Arc::clone(&gl)) }?;

    let frames = {
        let mut target = unsafe { renderer.target() };
        run_loop(&mut window, &mut target, &mut EscapeToClose)
    };
    log::info!("window closed after {frames} frames");

    unsafe { renderer.destroy() };
    drop(renderer);
    drop(gl);
    drop(window);
    drop(platform);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Flow;
    use glfw::{Action, Key};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Draw(i32, i32),
        Swap,
        Poll,
    }

    /// Records every call and replays a scripted key event per poll.
    #[derive(Default)]
    struct FakeSurface {
        calls: Vec<Call>,
        close: bool,
        /// Key events delivered on the n-th poll.
        script: Vec<Vec<(Key, Action)>>,
        /// Poll after which the OS asks for closure.
        os_close_after: Option<usize>,
        polls: usize,
    }

    impl Surface for FakeSurface {
        fn should_close(&self) -> bool {
            self.close
        }

        fn request_close(&mut self) {
            self.close = true;
        }

        fn swap_buffers(&mut self) {
            self.calls.push(Call::Swap);
        }

        fn poll_events(&mut self, sink: &mut dyn InputSink) {
            self.calls.push(Call::Poll);
            let events = self.script.get(self.polls).cloned().unwrap_or_default();
            for (key, action) in events {
                if sink.on_key(key, action) == Flow::Close {
                    self.request_close();
                }
            }
            self.polls += 1;
            if self.os_close_after == Some(self.polls) {
                self.request_close();
            }
        }
    }

    /// Shares the surface's log so ordering across both is visible.
    struct SharedTarget<'a>(&'a std::cell::RefCell<Vec<Call>>);

    impl DrawTarget for SharedTarget<'_> {
        fn clear(&mut self) {
            self.0.borrow_mut().push(Call::Clear);
        }

        fn draw_triangles(&mut self, first: i32, count: i32) {
            self.0.borrow_mut().push(Call::Draw(first, count));
        }
    }

    /// Merges draw calls recorded on the side into the surface log.
    struct Interleaved<'a> {
        surface: FakeSurface,
        draws: &'a std::cell::RefCell<Vec<Call>>,
    }

    impl Interleaved<'_> {
        fn flush(&mut self) {
            let draws = std::mem::take(&mut *self.draws.borrow_mut());
            self.surface.calls.extend(draws);
        }
    }

    impl Surface for Interleaved<'_> {
        fn should_close(&self) -> bool {
            self.surface.should_close()
        }

        fn request_close(&mut self) {
            self.surface.request_close();
        }

        fn swap_buffers(&mut self) {
            self.flush();
            self.surface.swap_buffers();
        }

        fn poll_events(&mut self, sink: &mut dyn InputSink) {
            self.surface.poll_events(sink);
        }
    }

    fn run_scripted(surface: FakeSurface) -> (u64, Vec<Call>) {
        let draws = std::cell::RefCell::new(Vec::new());
        let mut interleaved = Interleaved {
            surface,
            draws: &draws,
        };
        let mut target = SharedTarget(&draws);
        let frames = run_loop(&mut interleaved, &mut target, &mut EscapeToClose);
        interleaved.flush();
        (frames, interleaved.surface.calls)
    }

    #[test]
    fn one_iteration_is_clear_draw_swap_poll() {
        let (frames, calls) = run_scripted(FakeSurface {
            os_close_after: Some(1),
            ..FakeSurface::default()
        });
        assert_eq!(frames, 1);
        assert_eq!(
            calls,
            vec![Call::Clear, Call::Draw(0, 3), Call::Swap, Call::Poll]
        );
    }

    #[test]
    fn escape_press_stops_before_the_next_draw() {
        let (frames, calls) = run_scripted(FakeSurface {
            script: vec![vec![], vec![(Key::Escape, Action::Press)]],
            ..FakeSurface::default()
        });
        assert_eq!(frames, 2);
        assert_eq!(calls.last(), Some(&Call::Poll));
        let draws = calls.iter().filter(|c| matches!(c, Call::Draw(..))).count();
        assert_eq!(draws, 2);
    }

    #[test]
    fn escape_repeat_keeps_running() {
        let (frames, _) = run_scripted(FakeSurface {
            script: vec![vec![(Key::Escape, Action::Repeat)]],
            os_close_after: Some(3),
            ..FakeSurface::default()
        });
        assert_eq!(frames, 3);
    }

    #[test]
    fn already_closing_surface_draws_nothing() {
        let (frames, calls) = run_scripted(FakeSurface {
            close: true,
            ..FakeSurface::default()
        });
        assert_eq!(frames, 0);
        assert!(calls.is_empty());
    }

    #[test]
    fn state_follows_close_flag() {
        let mut surface = FakeSurface::default();
        assert_eq!(surface.state(), LoopState::Running);
        surface.request_close();
        assert_eq!(surface.state(), LoopState::Closing);
    }
}
