// the game never draws directly: every frame is a list of draw commands
// that a renderer applies to its surface
// the terminal renderer keeps its cells between frames so overlays can be
// drawn on top of the last game frame
use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use crate::config::GameConfig;
use crate::snake::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}

pub const SNAKE_COLOR: Color = Color::rgb(37, 66, 82);
pub const FOOD_COLOR: Color = Color::rgb(240, 67, 82);
pub const BACKGROUND_COLOR: Color = Color::rgb(245, 212, 169);
pub const CRITICAL_MSG_COLOR: Color = Color::rgb(234, 28, 62);
pub const ORDINARY_MSG_COLOR: Color = Color::rgb(50, 50, 60);
pub const SCORE_COLOR: Color = Color::rgb(0, 0, 0);

/// Where a text command is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft(Coordinates),
    /// Text is centred on this point.
    Centered(Coordinates),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),
    Rect {
        position: Coordinates,
        size: i32,
        color: Color,
    },
    Text {
        text: String,
        size: u32,
        color: Color,
        anchor: Anchor,
    },
}

pub trait Renderer {
    fn render(&mut self, commands: &[DrawCommand]) -> io::Result<()>;
}

// text at or above this size is drawn bold
const HEADLINE_SIZE: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: char,
    fg: Color,
    bg: Color,
    bold: bool,
}

impl Cell {
    fn blank(bg: Color) -> Cell {
        Cell {
            glyph: ' ',
            fg: bg,
            bg,
            bold: false,
        }
    }

    fn same_style(&self, other: &Cell) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.bold == other.bold
    }
}

/// A grid of terminal columns, two per game cell so blocks look square.
pub struct TerminalCanvas<W: Write> {
    out: W,
    block: i32,
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, config: &GameConfig) -> Self {
        let (cells_x, rows) = config.cells();
        let columns = cells_x * 2;
        TerminalCanvas {
            out,
            block: config.block,
            columns,
            rows,
            cells: vec![Cell::blank(BACKGROUND_COLOR); columns * rows],
        }
    }

    fn cell_mut(&mut self, column: i64, row: i64) -> Option<&mut Cell> {
        if column < 0 || row < 0 || column >= self.columns as i64 || row >= self.rows as i64 {
            return None;
        }
        let index = row as usize * self.columns + column as usize;
        self.cells.get_mut(index)
    }

    fn fill_rect(&mut self, position: Coordinates, size: i32, color: Color) {
        // a rect covers every game cell it overlaps
        let first_x = position.x.div_euclid(self.block) as i64;
        let first_y = position.y.div_euclid(self.block) as i64;
        let last_x = (position.x + size - 1).div_euclid(self.block) as i64;
        let last_y = (position.y + size - 1).div_euclid(self.block) as i64;
        for row in first_y..=last_y {
            for cell_x in first_x..=last_x {
                for column in [cell_x * 2, cell_x * 2 + 1] {
                    if let Some(cell) = self.cell_mut(column, row) {
                        *cell = Cell::blank(color);
                    }
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, size: u32, color: Color, anchor: Anchor) {
        let width = text.chars().count() as i64;
        let (start, row) = match anchor {
            Anchor::TopLeft(position) => (
                (position.x.div_euclid(self.block) * 2) as i64,
                position.y.div_euclid(self.block) as i64,
            ),
            Anchor::Centered(position) => (
                (position.x.div_euclid(self.block) * 2) as i64 - width / 2,
                position.y.div_euclid(self.block) as i64,
            ),
        };
        for (offset, glyph) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(start + offset as i64, row) {
                cell.glyph = glyph;
                cell.fg = color;
                cell.bold = size >= HEADLINE_SIZE;
            }
        }
    }

    fn apply(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear(color) => {
                self.cells.iter_mut().for_each(|cell| *cell = Cell::blank(*color));
            }
            DrawCommand::Rect {
                position,
                size,
                color,
            } => self.fill_rect(*position, *size, *color),
            DrawCommand::Text {
                text,
                size,
                color,
                anchor,
            } => self.draw_text(text, *size, *color, *anchor),
        }
    }

    fn styled(run: &str, style: &Cell) -> ColoredString {
        let span = run
            .truecolor(style.fg.r, style.fg.g, style.fg.b)
            .on_truecolor(style.bg.r, style.bg.g, style.bg.b);
        if style.bold {
            span.bold()
        } else {
            span
        }
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        // move cursor home instead of clearing to avoid flicker
        let mut frame = String::from("\x1b[H");
        for row in self.cells.chunks(self.columns) {
            // group consecutive cells with the same style into one span
            let mut run = String::new();
            let mut style = row[0];
            for cell in row {
                if !cell.same_style(&style) {
                    frame.push_str(&Self::styled(&run, &style).to_string());
                    run.clear();
                    style = *cell;
                }
                run.push(cell.glyph);
            }
            frame.push_str(&Self::styled(&run, &style).to_string());
            frame.push_str("\r\n");
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }

    #[cfg(test)]
    fn row_text(&self, row: usize) -> String {
        self.cells[row * self.columns..(row + 1) * self.columns]
            .iter()
            .map(|cell| cell.glyph)
            .collect()
    }

    #[cfg(test)]
    fn background_at(&self, column: usize, row: usize) -> Color {
        self.cells[row * self.columns + column].bg
    }
}

impl<W: Write> Renderer for TerminalCanvas<W> {
    fn render(&mut self, commands: &[DrawCommand]) -> io::Result<()> {
        for command in commands {
            self.apply(command);
        }
        self.flush_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_canvas() -> TerminalCanvas<Vec<u8>> {
        let config = GameConfig {
            width: 100,
            height: 50,
            ..GameConfig::default()
        };
        TerminalCanvas::new(Vec::new(), &config)
    }

    #[test]
    fn test_rect_fills_two_columns_per_cell() {
        let mut canvas = small_canvas();
        canvas
            .render(&[
                DrawCommand::Clear(BACKGROUND_COLOR),
                DrawCommand::Rect {
                    position: Coordinates::new(30, 20),
                    size: 10,
                    color: SNAKE_COLOR,
                },
            ])
            .unwrap();
        assert_eq!(canvas.background_at(6, 2), SNAKE_COLOR);
        assert_eq!(canvas.background_at(7, 2), SNAKE_COLOR);
        assert_eq!(canvas.background_at(5, 2), BACKGROUND_COLOR);
        assert_eq!(canvas.background_at(8, 2), BACKGROUND_COLOR);
        assert_eq!(canvas.background_at(6, 1), BACKGROUND_COLOR);
    }

    #[test]
    fn test_rect_outside_surface_is_clipped() {
        let mut canvas = small_canvas();
        canvas
            .render(&[
                DrawCommand::Rect {
                    position: Coordinates::new(-10, 0),
                    size: 10,
                    color: SNAKE_COLOR,
                },
                DrawCommand::Rect {
                    position: Coordinates::new(100, 50),
                    size: 10,
                    color: SNAKE_COLOR,
                },
            ])
            .unwrap();
        assert!(canvas.cells.iter().all(|cell| cell.bg == BACKGROUND_COLOR));
    }

    #[test]
    fn test_centered_text_and_top_left_text() {
        let mut canvas = small_canvas();
        canvas
            .render(&[DrawCommand::Text {
                text: "Score: 0".to_string(),
                size: 25,
                color: SCORE_COLOR,
                anchor: Anchor::TopLeft(Coordinates::new(10, 10)),
            }])
            .unwrap();
        assert_eq!(&canvas.row_text(1)[2..10], "Score: 0");
        assert!(canvas.row_text(1)[10..].trim().is_empty());
        assert!(!canvas.cells[20 + 2].bold);

        // 20 columns, centre column 10, five glyphs start at 8
        let mut centred = small_canvas();
        centred
            .render(&[DrawCommand::Text {
                text: "SNAKE".to_string(),
                size: 50,
                color: CRITICAL_MSG_COLOR,
                anchor: Anchor::Centered(Coordinates::new(50, 20)),
            }])
            .unwrap();
        assert_eq!(&centred.row_text(2)[8..13], "SNAKE");
        assert!(centred.cells[2 * 20 + 8].bold);
    }

    #[test]
    fn test_text_keeps_background_of_last_frame() {
        let mut canvas = small_canvas();
        canvas
            .render(&[DrawCommand::Rect {
                position: Coordinates::new(0, 0),
                size: 10,
                color: FOOD_COLOR,
            }])
            .unwrap();
        canvas
            .render(&[DrawCommand::Text {
                text: "ab".to_string(),
                size: 30,
                color: ORDINARY_MSG_COLOR,
                anchor: Anchor::TopLeft(Coordinates::new(0, 0)),
            }])
            .unwrap();
        assert_eq!(canvas.background_at(0, 0), FOOD_COLOR);
        assert_eq!(canvas.cells[0].glyph, 'a');
        assert_eq!(canvas.cells[0].fg, ORDINARY_MSG_COLOR);
    }

    #[test]
    fn test_flush_writes_every_row() {
        let mut canvas = small_canvas();
        canvas.render(&[DrawCommand::Clear(BACKGROUND_COLOR)]).unwrap();
        let written = String::from_utf8(canvas.out.clone()).unwrap();
        assert!(written.starts_with("\x1b[H"));
        assert_eq!(written.matches("\r\n").count(), 5);
    }
}
