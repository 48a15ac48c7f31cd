use crossterm::{
    cursor, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use std::collections::HashMap;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use tracing::debug;

use super::{StatusRecord, StatusSink, StatusUpdate};

#[derive(Debug, Default)]
struct Screen {
    order: Vec<String>,
    records: HashMap<String, StatusRecord>,
    drawn_lines: u16,
}

/// Terminal rows taken by `line` once wrapped at `columns`
fn wrapped_rows(line: &str, columns: Option<u16>) -> u16 {
    let chars = line.chars().count();
    let rows = match columns {
        Some(columns) if columns > 0 => chars.div_ceil(usize::from(columns)).max(1),
        _ => 1,
    };
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Live status block on the terminal.
///
/// Active keys are redrawn in place below the scrollback; a removed key has its last
/// text printed once above the live block so it stays in history.
pub struct TerminalStatus<W: Write + Send = Stdout> {
    screen: Mutex<Screen>,
    out: Mutex<W>,
    columns: Option<u16>,
}

impl TerminalStatus<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalStatus<W> {
    pub fn new(out: W) -> Self {
        Self {
            screen: Mutex::new(Screen::default()),
            out: Mutex::new(out),
            columns: None,
        }
    }

    /// Fixed width instead of querying the terminal on each redraw
    pub fn with_columns(mut self, columns: u16) -> Self {
        self.columns = Some(columns);
        self
    }

    fn columns(&self) -> Option<u16> {
        self.columns
            .or_else(|| terminal::size().ok().map(|(columns, _)| columns))
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|p| p.into_inner())
    }

    fn apply(&self, key: &str, record: Option<StatusRecord>) {
        let mut screen = self.screen.lock().unwrap_or_else(|p| p.into_inner());
        let mut finished = None;

        match record {
            Some(record) if record.removed => {
                screen.order.retain(|k| k != key);
                screen.records.remove(key);
                finished = Some(record);
            }
            Some(record) => {
                if !screen.records.contains_key(key) {
                    screen.order.push(key.to_string());
                }
                screen.records.insert(key.to_string(), record);
            }
            None => {
                screen.order.retain(|k| k != key);
                screen.records.remove(key);
            }
        }

        let columns = self.columns();
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = render(&mut screen, &mut *out, finished.as_ref(), columns) {
            debug!("Status render failed: {}", e);
        }
    }
}

fn render<W: Write>(
    screen: &mut Screen,
    out: &mut W,
    finished: Option<&StatusRecord>,
    columns: Option<u16>,
) -> io::Result<()> {
    if screen.drawn_lines > 0 {
        queue!(out, cursor::MoveUp(screen.drawn_lines))?;
    }
    queue!(
        out,
        cursor::MoveToColumn(0),
        Clear(ClearType::FromCursorDown)
    )?;

    if let Some(record) = finished {
        for line in record.text.lines() {
            queue!(out, Print(line), Print('\n'))?;
        }
    }

    let mut lines: u16 = 0;
    for key in &screen.order {
        if let Some(record) = screen.records.get(key) {
            for line in record.text.lines() {
                queue!(out, Print(line), Print('\n'))?;
                lines = lines.saturating_add(wrapped_rows(line, columns));
            }
        }
    }
    screen.drawn_lines = lines;
    out.flush()
}

impl<W: Write + Send> StatusSink for TerminalStatus<W> {
    fn put(&self, key: &str, update: StatusUpdate) {
        self.apply(key, Some(update.into_record(key)));
    }

    fn remove(&self, key: &str) {
        self.apply(key, None);
    }
}
