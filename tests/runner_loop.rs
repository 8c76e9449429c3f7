use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use term_card::clock::FixedClock;
use term_card::components::DebugLogHandle;
use term_card::config::{Config, Metrics};
use term_card::drivers::{InputDriver, OutputDriver};
use term_card::layout::Size;
use term_card::runner::run_card;
use term_card::state::OverlayId;
use term_card::ui::UiFrame;
use term_card::window::WindowManager;

/// `None` entries make one poll come back empty.
struct ScriptedInput {
    steps: VecDeque<Option<Event>>,
    mouse_capture: bool,
}

impl ScriptedInput {
    fn new(steps: impl IntoIterator<Item = Option<Event>>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            mouse_capture: false,
        }
    }
}

impl InputDriver for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        match self.steps.front() {
            Some(Some(_)) => Ok(true),
            Some(None) => {
                self.steps.pop_front();
                Ok(false)
            }
            None => Err(io::Error::other("script exhausted")),
        }
    }

    fn read(&mut self) -> io::Result<Event> {
        self.steps
            .pop_front()
            .flatten()
            .ok_or_else(|| io::Error::other("no scripted event"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.mouse_capture = enabled;
        Ok(())
    }
}

struct BufferOutput {
    terminal: Terminal<TestBackend>,
    frames: usize,
}

impl OutputDriver for BufferOutput {
    type Backend = TestBackend;

    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(|frame| f(UiFrame::new(frame)))
            .map_err(|err| io::Error::other(err.to_string()))?;
        self.frames += 1;
        Ok(())
    }
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<Event> {
    Some(Event::Key(KeyEvent::new(code, modifiers)))
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn draws_changes_and_stops_on_quit() {
    let mut config = Config::new(Metrics::cells());
    config.lock_on_start = false;
    config.show_boot = false;
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 10, 1, 6, 0, 0).unwrap()));
    let mut wm = WindowManager::with_debug_log(
        config,
        Size::new(120, 40),
        clock,
        Instant::now(),
        DebugLogHandle::default(),
    );
    let mut output = BufferOutput {
        terminal: Terminal::new(TestBackend::new(120, 40)).unwrap(),
        frames: 0,
    };
    let mut input = ScriptedInput::new([
        key(KeyCode::Char('s'), KeyModifiers::NONE),
        None,
        None,
        key(KeyCode::Char('q'), KeyModifiers::CONTROL),
    ]);

    run_card(&mut output, &mut input, &mut wm, Duration::from_millis(1)).unwrap();

    assert!(wm.should_quit());
    assert!(input.mouse_capture);
    assert!(wm.overlays().is_open(OverlayId::StartMenu));
    // first frame, then one for the opened menu; the idle poll after it draws nothing
    assert_eq!(output.frames, 2);
    let text = screen_text(&output.terminal);
    assert!(text.contains("Start"));
    assert!(text.contains("Switch view"));
}
