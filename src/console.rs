use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyModifiers},
    execute, queue, terminal,
};
use polylife::{Coord, GridStore, engine::glyph};
use std::io::{self, Write};
use tracing::warn;

pub enum ConsoleCommand {
    Exit,
    Pause,
    Step,
    Handled,
}

pub struct ConsoleRender {
    tl: Coord,
    report: String,
}
impl ConsoleRender {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), cursor::Hide)?;
        Ok(Self {
            tl: Coord::default(),
            report: String::new(),
        })
    }

    pub fn render(&self, store: &GridStore) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let br = self.tl
            + Coord {
                col: cols as i32,
                row: rows.saturating_sub(1) as i32,
            };
        let shape = store.config().shape;
        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        let mut buf = [0u8; 4];
        for (cell, state) in store.window(self.tl, br).iter() {
            let at = cell - self.tl;
            queue!(stdout, cursor::MoveTo(at.col as u16, at.row as u16))?;
            stdout.write_all(glyph(shape, cell, state).encode_utf8(&mut buf).as_bytes())?;
        }

        // write footer
        queue!(stdout, cursor::MoveTo(0, rows.saturating_sub(1)))?;
        stdout.write_all(self.report.as_bytes())?;

        stdout.flush()
    }

    pub fn poll_events(&mut self) -> io::Result<Option<ConsoleCommand>> {
        // make sure event is preset for us to take
        if !event::poll(std::time::Duration::from_secs(0))? {
            return Ok(None);
        }

        let mut outp = Ok(Some(ConsoleCommand::Handled));
        match event::read()? {
            // CTRL+C
            event::Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
            | event::Event::Key(KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }) => {
                outp = Ok(Some(ConsoleCommand::Exit));
            }
            event::Event::Key(KeyEvent {
                code: KeyCode::Char(' '),
                ..
            }) => {
                outp = Ok(Some(ConsoleCommand::Pause));
            }
            event::Event::Key(KeyEvent {
                code: KeyCode::Char('n'),
                ..
            }) => {
                outp = Ok(Some(ConsoleCommand::Step));
            }
            // arrows to move grid
            event::Event::Key(
                ev @ KeyEvent {
                    code: KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right,
                    ..
                },
            ) => match ev.code {
                KeyCode::Up => self.tl.row -= 1,
                KeyCode::Down => self.tl.row += 1,
                KeyCode::Left => self.tl.col -= 1,
                KeyCode::Right => self.tl.col += 1,
                _ => {}
            },
            _ => {}
        }
        outp
    }

    pub fn set_report(&mut self, report: String) {
        self.report = report;
    }
}
impl Drop for ConsoleRender {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            warn!(%err, "failed to leave raw mode");
        }
        if let Err(err) = execute!(io::stdout(), cursor::Show) {
            warn!(%err, "failed to restore the cursor");
        }
    }
}
