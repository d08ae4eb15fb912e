pub mod app;
mod error;
mod event;
mod form;
mod renderer;

pub use error::UiError;

use std::io::{Stdout, stdout};
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste,
    Event, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::Config;
use crate::perfume::Catalog;
use app::App;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(config: &Config, catalog: Catalog) -> Result<(), UiError> {
    terminal::enable_raw_mode()?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste)?;

    let keyboard_enhancement_enabled = terminal::supports_keyboard_enhancement()
        .unwrap_or(false);

    if keyboard_enhancement_enabled {
        crossterm::execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;

    let mut app = App::new(config, catalog);
    // 루프가 실패해도 터미널은 원래 상태로 되돌린다.
    let result = run_loop(&mut terminal, &mut app);

    if keyboard_enhancement_enabled {
        crossterm::execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }

    crossterm::execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<(), UiError> {
    loop {
        app.tick();

        let size = terminal.size()?;
        app.terminal_width = size.width;
        app.terminal_height = size.height;
        terminal.draw(|frame| renderer::render(frame, app))?;

        if let Some(event) = event::poll_event(EVENT_POLL_INTERVAL)? {
            match event {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    app.handle_key_event(key_event);
                }
                Event::Paste(text) => {
                    app.handle_paste(text);
                }
                Event::Resize(width, height) => {
                    terminal.autoresize()?;
                    app.terminal_width = width;
                    app.terminal_height = height;
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
