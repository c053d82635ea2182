use crate::result;
use crate::structs::{DisplayLine, DisplayState, Rgb};

pub const LOADING_TEXT: &str = "Updating...";

/// A character grid with an RGB backlight. Writing past the end of a row
/// carries on at the start of the next one.
pub trait CharacterDisplay {
    fn clear(&mut self) -> result::BusDashResult<()>;
    fn set_cursor(&mut self, column: usize, row: usize) -> result::BusDashResult<()>;
    fn write(&mut self, text: &str) -> result::BusDashResult<()>;
    fn set_backlight(&mut self, color: Rgb) -> result::BusDashResult<()>;
}

impl<'a, D: CharacterDisplay> CharacterDisplay for &'a mut D {
    fn clear(&mut self) -> result::BusDashResult<()> {
        return (**self).clear();
    }

    fn set_cursor(&mut self, column: usize, row: usize) -> result::BusDashResult<()> {
        return (**self).set_cursor(column, row);
    }

    fn write(&mut self, text: &str) -> result::BusDashResult<()> {
        return (**self).write(text);
    }

    fn set_backlight(&mut self, color: Rgb) -> result::BusDashResult<()> {
        return (**self).set_backlight(color);
    }
}

/// In-memory display, used when there's no LCD attached.
pub struct VirtualDisplay {
    grid: Vec<Vec<char>>,
    columns: usize,
    cursor: (usize, usize),
    backlight_history: Vec<Rgb>,
}

impl VirtualDisplay {
    pub fn new(columns: usize, rows: usize) -> VirtualDisplay {
        return VirtualDisplay{
            grid: vec![vec![' '; columns]; rows],
            columns: columns,
            cursor: (0, 0),
            backlight_history: vec![],
        };
    }

    /// Contents of each row, trailing blanks removed.
    pub fn rows(&self) -> Vec<String> {
        return self.grid.iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect();
    }

    pub fn backlight(&self) -> Option<Rgb> {
        return self.backlight_history.last().cloned();
    }

    pub fn backlight_history(&self) -> &[Rgb] {
        return &self.backlight_history;
    }
}

impl CharacterDisplay for VirtualDisplay {
    fn clear(&mut self) -> result::BusDashResult<()> {
        for row in self.grid.iter_mut() {
            for cell in row.iter_mut() {
                *cell = ' ';
            }
        }
        self.cursor = (0, 0);
        return Ok(());
    }

    fn set_cursor(&mut self, column: usize, row: usize) -> result::BusDashResult<()> {
        self.cursor = (column, row);
        return Ok(());
    }

    fn write(&mut self, text: &str) -> result::BusDashResult<()> {
        for c in text.chars() {
            let (mut column, mut row) = self.cursor;
            if column >= self.columns {
                column = 0;
                row += 1;
            }
            if row >= self.grid.len() {
                // Off the bottom of the screen.
                break;
            }
            self.grid[row][column] = c;
            self.cursor = (column + 1, row);
        }
        return Ok(());
    }

    fn set_backlight(&mut self, color: Rgb) -> result::BusDashResult<()> {
        self.backlight_history.push(color);
        return Ok(());
    }
}

/// Owns the display and tracks what it is currently showing. Every
/// transition starts from a cleared screen so a failure part way through a
/// poll never leaves stale rows behind.
pub struct DisplayController<D: CharacterDisplay> {
    device: D,
    rows: usize,
    state: DisplayState,
}

impl<D: CharacterDisplay> DisplayController<D> {
    pub fn new(device: D, rows: usize) -> DisplayController<D> {
        return DisplayController{
            device: device,
            rows: rows,
            state: DisplayState::Loading,
        };
    }

    pub fn state(&self) -> &DisplayState {
        return &self.state;
    }

    pub fn device(&self) -> &D {
        return &self.device;
    }

    fn reset(&mut self) -> result::BusDashResult<()> {
        self.device.clear()?;
        self.device.set_backlight(Rgb::NEUTRAL)?;
        self.device.set_cursor(0, 0)?;
        return Ok(());
    }

    pub fn begin(&mut self) -> result::BusDashResult<()> {
        self.reset()?;
        self.device.write(LOADING_TEXT)?;
        self.state = DisplayState::Loading;
        return Ok(());
    }

    // Leaves the backlight as begin() set it.
    pub fn render(&mut self, mut lines: Vec<DisplayLine>) -> result::BusDashResult<()> {
        lines.truncate(self.rows);

        self.device.clear()?;
        for (row, line) in lines.iter().enumerate() {
            self.device.set_cursor(0, row)?;
            self.device.write(line.text())?;
        }
        self.state = DisplayState::Normal(lines);
        return Ok(());
    }

    pub fn show_error(&mut self, message: &str) -> result::BusDashResult<()> {
        self.reset()?;
        self.device.set_backlight(Rgb::ERROR)?;
        self.device.write(message)?;
        self.state = DisplayState::Error(message.to_string());
        return Ok(());
    }
}

/// Runs `f`; if it fails the error goes up on the display and is then
/// handed back to the caller.
pub fn with_display_error_reporting<D, T, F>(controller: &mut DisplayController<D>, f: F) -> result::BusDashResult<T>
where D: CharacterDisplay,
      F: FnOnce() -> result::BusDashResult<T> {
    match f() {
        Ok(value) => return Ok(value),
        Err(err) => {
            error!("{}", err);
            controller.show_error(&err.to_string())?;
            return Err(err);
        }
    }
}
