//! Full-screen map view

use std::io;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Line;

use dc_core::MapGrid;

use crate::theme::Theme;
use crate::widgets::MapWidget;

/// Show `grid` on the alternate screen until a key is pressed
pub fn show_map(grid: &MapGrid, title: &str, theme: Theme) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = draw_until_key(&mut terminal, grid, title, theme);

    // Restore terminal even when drawing failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn draw_until_key<B: Backend>(
    terminal: &mut Terminal<B>,
    grid: &MapGrid,
    title: &str,
    theme: Theme,
) -> io::Result<()> {
    loop {
        draw(terminal, grid, title, theme)?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(()),
            // Redraw on resize and anything else
            _ => {}
        }
    }
}

fn draw<B: Backend>(
    terminal: &mut Terminal<B>,
    grid: &MapGrid,
    title: &str,
    theme: Theme,
) -> io::Result<()> {
    terminal.draw(|frame| {
        let [map_area, footer_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(MapWidget::new(grid, title, theme), map_area);
        frame.render_widget(
            Line::styled("Press any key to exit", theme.hint),
            footer_area,
        );
    })?;
    Ok(())
}
