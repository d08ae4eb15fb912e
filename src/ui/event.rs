use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};

/// `timeout` 동안 기다려서 이벤트가 없으면 `None`을 돌려준다.
pub fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
