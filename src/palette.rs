// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::{Intensity, Tier};
use crate::error::Error;
use crate::runtime::ColorMode;

/// Color and weight of one palette tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierStyle {
    pub fg: Color,
    pub bold: bool,
}

const fn plain(fg: Color) -> TierStyle {
    TierStyle { fg, bold: false }
}

const fn bold(fg: Color) -> TierStyle {
    TierStyle { fg, bold: true }
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub head: TierStyle,
    pub bright: TierStyle,
    pub medium: TierStyle,
    pub dim: TierStyle,
}

impl Palette {
    pub fn tier(&self, tier: Tier) -> TierStyle {
        match tier {
            Tier::Head => self.head,
            Tier::Bright => self.bright,
            Tier::Medium => self.medium,
            Tier::Dim => self.dim,
        }
    }
}

const fn palette(
    name: &'static str,
    head: TierStyle,
    bright: TierStyle,
    medium: TierStyle,
    dim: TierStyle,
) -> Palette {
    Palette {
        name,
        head,
        bright,
        medium,
        dim,
    }
}

/// Cycling order for the arrow keys.
pub const PALETTES: [Palette; 19] = [
    palette(
        "green",
        bold(Color::Grey),
        bold(Color::DarkGreen),
        plain(Color::DarkGreen),
        plain(rgb(0, 100, 0)),
    ),
    palette(
        "blue",
        bold(Color::Grey),
        bold(Color::DarkBlue),
        plain(Color::DarkBlue),
        plain(rgb(0, 0, 100)),
    ),
    palette(
        "purple",
        bold(Color::Grey),
        bold(Color::DarkMagenta),
        plain(Color::DarkMagenta),
        plain(rgb(100, 0, 100)),
    ),
    palette(
        "pink",
        bold(Color::Grey),
        bold(rgb(0xff, 0x00, 0xff)),
        plain(rgb(0xff, 0x77, 0xff)),
        plain(rgb(0xff, 0xdd, 0xff)),
    ),
    palette(
        "yellow",
        bold(Color::Black),
        bold(Color::DarkYellow),
        plain(Color::DarkYellow),
        plain(rgb(100, 100, 0)),
    ),
    palette(
        "cyan",
        bold(Color::Grey),
        bold(Color::DarkCyan),
        plain(Color::DarkCyan),
        plain(rgb(0, 100, 100)),
    ),
    palette(
        "red",
        bold(Color::Grey),
        bold(Color::DarkRed),
        plain(Color::DarkRed),
        plain(rgb(100, 0, 0)),
    ),
    palette(
        "white",
        bold(Color::Black),
        bold(Color::Grey),
        plain(Color::Grey),
        plain(rgb(100, 100, 100)),
    ),
    palette(
        "sunset",
        bold(Color::Grey),
        bold(rgb(0xff, 0x00, 0x00)),
        plain(rgb(0xff, 0x77, 0x00)),
        plain(rgb(0xff, 0xdd, 0x00)),
    ),
    palette(
        "alien",
        bold(Color::Grey),
        bold(rgb(0x00, 0xff, 0x00)),
        plain(Color::DarkGreen),
        plain(rgb(0x77, 0x00, 0xff)),
    ),
    palette(
        "ocean",
        bold(Color::Grey),
        bold(rgb(0x00, 0xff, 0xff)),
        plain(Color::DarkCyan),
        plain(rgb(0x00, 0x77, 0xff)),
    ),
    palette(
        "forest",
        bold(Color::Grey),
        bold(rgb(0x22, 0x8b, 0x22)),
        plain(rgb(0x2e, 0x8b, 0x57)),
        plain(rgb(0x55, 0x6b, 0x2f)),
    ),
    palette(
        "fire",
        bold(Color::Grey),
        bold(rgb(0xff, 0x45, 0x00)),
        plain(rgb(0xff, 0x63, 0x47)),
        plain(rgb(0xcd, 0x5c, 0x5c)),
    ),
    palette(
        "galaxy",
        bold(Color::Grey),
        bold(rgb(0x94, 0x00, 0xd3)),
        plain(rgb(0x4b, 0x00, 0x82)),
        plain(rgb(0x2f, 0x4f, 0x4f)),
    ),
    palette(
        "pastel",
        bold(Color::Black),
        bold(rgb(0xff, 0xd1, 0xdc)),
        plain(rgb(0xae, 0xc6, 0xcf)),
        plain(rgb(0xff, 0xb3, 0x47)),
    ),
    palette(
        "neon",
        bold(Color::Grey),
        bold(rgb(0x39, 0xff, 0x14)),
        plain(rgb(0xff, 0x14, 0x93)),
        plain(rgb(0x1e, 0x90, 0xff)),
    ),
    palette(
        "lava",
        bold(Color::Grey),
        bold(rgb(0xff, 0x8c, 0x00)),
        plain(rgb(0xff, 0x45, 0x00)),
        plain(rgb(0x8b, 0x00, 0x00)),
    ),
    palette(
        "ice",
        bold(Color::Grey),
        bold(rgb(0x00, 0xff, 0xff)),
        plain(rgb(0xad, 0xd8, 0xe6)),
        plain(rgb(0xe0, 0xff, 0xff)),
    ),
    palette(
        "earthy",
        bold(Color::Grey),
        bold(rgb(0x8b, 0x45, 0x13)),
        plain(rgb(0xa0, 0x52, 0x2d)),
        plain(rgb(0xde, 0xb8, 0x87)),
    ),
];

pub fn palette_index(name: &str) -> Result<usize, Error> {
    let name = name.trim().to_ascii_lowercase();
    PALETTES
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| Error::InvalidValue {
            flag: "--color",
            value: name,
            expected: "see --list-colors".to_string(),
        })
}

/// Next palette index in cycling order, wrapping both ways.
pub fn cycle(index: usize, forward: bool) -> usize {
    let n = PALETTES.len();
    let index = index % n;
    if forward {
        (index + 1) % n
    } else {
        (index + n - 1) % n
    }
}

/// Fully resolved terminal style of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bold: bool,
}

pub fn resolve(palette: &Palette, tier: Tier, intensity: Intensity, mode: ColorMode) -> Style {
    if mode == ColorMode::Mono {
        return Style {
            fg: None,
            bold: intensity == Intensity::Full,
        };
    }
    let ts = palette.tier(tier);
    Style {
        fg: Some(convert(ts.fg, mode)),
        bold: ts.bold,
    }
}

/// Down-converts RGB colors to what the terminal can show. Named colors pass
/// through untouched.
fn convert(c: Color, mode: ColorMode) -> Color {
    let Color::Rgb { r, g, b } = c else {
        return c;
    };
    match mode {
        ColorMode::TrueColor | ColorMode::Mono => c,
        ColorMode::Color256 => Color::AnsiValue(rgb_to_ansi256(r, g, b)),
        ColorMode::Color16 => rgb_to_color16(r, g, b),
    }
}

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> i32 {
    let dr = (a.0 as i32) - (b.0 as i32);
    let dg = (a.1 as i32) - (b.1 as i32);
    let db = (a.2 as i32) - (b.2 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (level(r), level(g), level(b));
    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, (0, 0, 0)),
        239..=255 => (231, (255, 255, 255)),
        _ => {
            let step = (avg - 8) / 10;
            let v = 8 + 10 * step;
            (232 + step, (v, v, v))
        }
    };

    if dist2((r, g, b), gray) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2((r, g, b), *rgb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

pub fn print_list_colors() {
    println!("AVAILABLE COLOR PALETTES (cycle with up/down):");
    println!();
    for (i, p) in PALETTES.iter().enumerate() {
        println!("{:>2}  {}", i + 1, p.name);
    }
}
