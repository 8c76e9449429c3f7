//! Glue between the event loop, the output driver and the window manager.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::window::WindowManager;

/// Drive `wm` until it asks to quit.
///
/// Input is routed as it arrives. Idle calls advance the timers and draw at
/// most one frame, and only when something changed since the last one.
pub fn run_card<O, D>(
    output: &mut O,
    driver: &mut D,
    wm: &mut WindowManager,
    poll_interval: Duration,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    event_loop.run(|_driver, event| {
        if let Some(evt) = event {
            if let Event::Resize(..) = evt {
                tracing::debug!(event = ?evt, "terminal resized");
            }
            wm.handle_event(&evt);
            return Ok(flow(wm));
        }
        wm.tick(Instant::now());
        if wm.should_quit() {
            return Ok(ControlFlow::Quit);
        }
        if wm.take_frame_request() {
            output.draw(|mut frame| wm.render(&mut frame))?;
        }
        Ok(ControlFlow::Continue)
    })
}

fn flow(wm: &WindowManager) -> ControlFlow {
    if wm.should_quit() {
        ControlFlow::Quit
    } else {
        ControlFlow::Continue
    }
}
