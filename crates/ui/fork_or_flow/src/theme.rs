use std::env;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

pub const COLOR_MODE_ENV: &str = "FORK_OR_FLOW_COLOR_MODE";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    TrueColor,
    Ansi256,
    Ansi16,
}

impl ColorMode {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "24bit" | "truecolor" | "rgb" => Some(ColorMode::TrueColor),
            "256" | "ansi256" => Some(ColorMode::Ansi256),
            "16" | "ansi16" | "ansi" => Some(ColorMode::Ansi16),
            "auto" => Some(ColorMode::Auto),
            _ => None,
        }
    }

    /// Guess the terminal's capabilities from `COLORTERM` / `TERM`.
    pub fn detect() -> Self {
        if let Ok(v) = env::var("COLORTERM") {
            let l = v.to_ascii_lowercase();
            if l.contains("truecolor") || l.contains("24bit") {
                return ColorMode::TrueColor;
            }
        }
        if let Ok(v) = env::var("TERM") {
            if v.to_ascii_lowercase().contains("256color") {
                return ColorMode::Ansi256;
            }
        }
        ColorMode::Ansi16
    }

    /// Settle on a concrete mode: env override first, then the configured
    /// value, then detection for `Auto`.
    pub fn resolve(configured: ColorMode) -> Self {
        let chosen = env::var(COLOR_MODE_ENV)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or(configured);
        match chosen {
            ColorMode::Auto => Self::detect(),
            other => other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorMode::Auto => "auto",
            ColorMode::TrueColor => "24-bit",
            ColorMode::Ansi256 => "256",
            ColorMode::Ansi16 => "16",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiGroup {
    Border,
    /// Border of the focused block or the selected card.
    Focus,
    Dimmed,
    Statusline,
    Title,
    Accent,
    Selected,
    Badge,
    Success,
    Error,
    Warn,
}

#[derive(Clone, Copy, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Clone, Debug)]
pub struct Palette {
    pub fg: Rgb,
    pub dim: Rgb,
    pub border: Rgb,
    pub accent: Rgb,
    pub secondary: Rgb,
    pub success: Rgb,
    pub error: Rgb,
    pub warn: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        // warm purple/pink, close to the app's brand gradient
        Self {
            fg: Rgb(235, 230, 245),
            dim: Rgb(130, 124, 150),
            border: Rgb(72, 64, 92),
            accent: Rgb(168, 85, 247),
            secondary: Rgb(236, 72, 153),
            success: Rgb(74, 222, 128),
            error: Rgb(248, 113, 113),
            warn: Rgb(251, 191, 36),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub mode: ColorMode,
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ColorMode::Ansi16)
    }
}

impl Theme {
    /// `mode` should already be resolved (see `ColorMode::resolve`); `Auto`
    /// falls back to the 16-colour palette.
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            palette: Palette::default(),
        }
    }

    pub fn mode_label(&self) -> &'static str {
        self.mode.label()
    }

    pub fn style(&self, group: UiGroup) -> Style {
        let p = &self.palette;
        match group {
            UiGroup::Border => Style::default().fg(self.color(p.border)),
            UiGroup::Focus => Style::default().fg(self.color(p.accent)),
            UiGroup::Dimmed => Style::default().fg(self.color(p.dim)),
            UiGroup::Statusline => Style::default().fg(self.color(p.fg)),
            UiGroup::Title => Style::default()
                .fg(self.color(p.fg))
                .add_modifier(Modifier::BOLD),
            UiGroup::Accent => Style::default()
                .fg(self.color(p.accent))
                .add_modifier(Modifier::BOLD),
            UiGroup::Selected => Style::default()
                .fg(Color::Black)
                .bg(self.color(p.accent))
                .add_modifier(Modifier::BOLD),
            UiGroup::Badge => Style::default()
                .fg(Color::Black)
                .bg(self.color(p.secondary)),
            UiGroup::Success => Style::default()
                .fg(self.color(p.success))
                .add_modifier(Modifier::BOLD),
            UiGroup::Error => Style::default()
                .fg(self.color(p.error))
                .add_modifier(Modifier::BOLD),
            UiGroup::Warn => Style::default().fg(self.color(p.warn)),
        }
    }

    pub fn color(&self, rgb: Rgb) -> Color {
        match self.mode {
            ColorMode::TrueColor => Color::Rgb(rgb.0, rgb.1, rgb.2),
            ColorMode::Ansi256 => Color::Indexed(rgb_to_ansi256(rgb.0, rgb.1, rgb.2)),
            ColorMode::Ansi16 | ColorMode::Auto => ansi16_from_rgb(rgb.0, rgb.1, rgb.2),
        }
    }
}

/// Map to the 6x6x6 cube or the grayscale ramp, whichever is closer.
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    fn cube(v: u8) -> u8 {
        if v < 48 {
            0
        } else if v < 115 {
            1
        } else {
            (v - 35) / 40
        }
    }
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let (cr, cg, cb) = (cube(r), cube(g), cube(b));
    let cube_idx = 16 + 36 * cr + 6 * cg + cb;
    let cube_rgb = (LEVELS[cr as usize], LEVELS[cg as usize], LEVELS[cb as usize]);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_step = if avg > 238 { 23 } else { avg.saturating_sub(3) / 10 };
    let gray_val = 8 + gray_step * 10;
    let gray_idx = 232 + gray_step;

    let dist = |(x, y, z): (u8, u8, u8)| {
        let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2);
        d(x, r) + d(y, g) + d(z, b)
    };
    if dist((gray_val, gray_val, gray_val)) < dist(cube_rgb) {
        gray_idx
    } else {
        cube_idx
    }
}

pub fn ansi16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let bright = max > 170;

    // low saturation: grayscale
    if max - min < 30 {
        return match max {
            0..=60 => Color::Black,
            61..=150 => Color::DarkGray,
            151..=220 => Color::Gray,
            _ => Color::White,
        };
    }

    let (rr, gg, bb) = (r > max / 2, g > max / 2, b > max / 2);
    match (rr, gg, bb, bright) {
        (true, false, false, false) => Color::Red,
        (true, false, false, true) => Color::LightRed,
        (false, true, false, false) => Color::Green,
        (false, true, false, true) => Color::LightGreen,
        (false, false, true, false) => Color::Blue,
        (false, false, true, true) => Color::LightBlue,
        (true, true, false, false) => Color::Yellow,
        (true, true, false, true) => Color::LightYellow,
        (true, false, true, false) => Color::Magenta,
        (true, false, true, true) => Color::LightMagenta,
        (false, true, true, false) => Color::Cyan,
        (false, true, true, true) => Color::LightCyan,
        _ if bright => Color::White,
        _ => Color::Gray,
    }
}
