//! Colours for the map view
//!
//! Two palettes, one per terminal background. `DCRAWL_LIGHT_BG=1` forces the
//! light one; otherwise the background index in `COLORFGBG` decides.

use ratatui::style::{Color, Modifier, Style};

use dc_core::Glyph;

/// Environment variable forcing the light palette
pub const LIGHT_BG_ENV: &str = "DCRAWL_LIGHT_BG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Dark,
    Light,
}

impl Background {
    pub fn detect() -> Self {
        Self::from_env_values(
            std::env::var(LIGHT_BG_ENV).ok().as_deref(),
            std::env::var("COLORFGBG").ok().as_deref(),
        )
    }

    /// `light_bg` wins when set; `colorfgbg` is "fg;bg" (or "fg;default;bg")
    /// with ANSI indices, where 7 and 9-15 are light
    fn from_env_values(light_bg: Option<&str>, colorfgbg: Option<&str>) -> Self {
        if let Some(flag) = light_bg {
            return if flag == "1" || flag.eq_ignore_ascii_case("true") {
                Background::Light
            } else {
                Background::Dark
            };
        }

        match colorfgbg
            .and_then(|value| value.rsplit(';').next())
            .and_then(|bg| bg.parse::<u8>().ok())
        {
            Some(7 | 9..=15) => Background::Light,
            _ => Background::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Background,
    /// Map border
    pub frame: Style,
    /// Maze name in the border
    pub title: Style,
    /// Footer hints
    pub hint: Style,
    // Room glyph colours
    player: Color,
    boss: Color,
    enemy: Color,
    loot: Color,
    entry: Color,
    room: Color,
    corridor: Color,
}

impl Theme {
    pub fn for_background(background: Background) -> Self {
        match background {
            Background::Dark => Self {
                background,
                frame: Style::default().fg(Color::Gray),
                title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                hint: Style::default().fg(Color::DarkGray),
                player: Color::White,
                boss: Color::LightRed,
                enemy: Color::Red,
                loot: Color::Yellow,
                entry: Color::Green,
                room: Color::Gray,
                corridor: Color::DarkGray,
            },
            Background::Light => Self {
                background,
                frame: Style::default().fg(Color::DarkGray),
                title: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                hint: Style::default().fg(Color::Gray),
                player: Color::Black,
                boss: Color::Red,
                enemy: Color::Magenta,
                loot: Color::Rgb(160, 110, 0),
                entry: Color::Green,
                room: Color::DarkGray,
                corridor: Color::Gray,
            },
        }
    }

    pub fn detect() -> Self {
        Self::for_background(Background::detect())
    }

    pub fn glyph_style(&self, glyph: Glyph) -> Style {
        let fg = |color| Style::default().fg(color);
        match glyph {
            Glyph::Blank => Style::default(),
            Glyph::Player => fg(self.player).add_modifier(Modifier::BOLD),
            Glyph::Boss => fg(self.boss).add_modifier(Modifier::BOLD),
            Glyph::Enemy => fg(self.enemy),
            Glyph::Loot => fg(self.loot),
            Glyph::Entry => fg(self.entry),
            Glyph::Room => fg(self.room),
            Glyph::Horizontal | Glyph::Vertical => fg(self.corridor),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}
