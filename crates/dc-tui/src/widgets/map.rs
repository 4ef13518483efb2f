//! Map display widget

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

use dc_core::MapGrid;

use crate::theme::Theme;

/// Widget drawing a rendered maze map, centred in its area
pub struct MapWidget<'a> {
    grid: &'a MapGrid,
    title: &'a str,
    theme: Theme,
}

impl<'a> MapWidget<'a> {
    pub fn new(grid: &'a MapGrid, title: &'a str, theme: Theme) -> Self {
        Self { grid, title, theme }
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.frame)
            .title(Span::styled(self.title.to_string(), self.theme.title));

        let inner = block.inner(area);
        block.render(area, buf);

        let side = self.grid.side();
        let rows = side.min(inner.height as usize);
        let cols = side.min(inner.width as usize);
        let top = inner.y + (inner.height - rows as u16) / 2;
        let left = inner.x + (inner.width - cols as u16) / 2;

        // Crop around the centre when the grid is larger than the area
        let row_skip = (side - rows) / 2;
        let col_skip = (side - cols) / 2;

        for (y, row) in self.grid.rows().skip(row_skip).take(rows).enumerate() {
            for (x, &glyph) in row.iter().skip(col_skip).take(cols).enumerate() {
                if let Some(cell) = buf.cell_mut(Position::new(left + x as u16, top + y as u16)) {
                    cell.set_char(glyph.to_char());
                    cell.set_style(self.theme.glyph_style(glyph));
                }
            }
        }
    }
}
