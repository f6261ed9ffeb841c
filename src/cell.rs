// Copyright (c) 2026 rezky_nightky

use std::fmt;

use unicode_width::UnicodeWidthStr;

/// One display glyph. Emoji may span several code points, so they are kept
/// as static strings from the emoji table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Glyph {
    #[default]
    Blank,
    Char(char),
    Emoji(&'static str),
}

impl Glyph {
    pub fn is_blank(self) -> bool {
        match self {
            Glyph::Blank => true,
            Glyph::Char(c) => c == ' ',
            Glyph::Emoji(s) => s.is_empty(),
        }
    }

    /// Columns the terminal advances after printing this glyph.
    pub fn width(self) -> u16 {
        let w = match self {
            Glyph::Blank => 1,
            Glyph::Char(c) => {
                let mut buf = [0u8; 4];
                UnicodeWidthStr::width(&*c.encode_utf8(&mut buf))
            }
            Glyph::Emoji(s) => UnicodeWidthStr::width(s),
        };
        w.clamp(1, 2) as u16
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Glyph::Blank => f.write_str(" "),
            Glyph::Char(c) => write!(f, "{}", c),
            Glyph::Emoji(s) => f.write_str(s),
        }
    }
}

/// Palette tier a cell is colored with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tier {
    Head,
    Bright,
    Medium,
    #[default]
    Dim,
}

impl Tier {
    /// Tier for a trail cell at fade level `level` (0.0..=1.0).
    pub fn from_level(level: f32) -> Self {
        if level > 0.7 {
            Tier::Bright
        } else if level > 0.3 {
            Tier::Medium
        } else {
            Tier::Dim
        }
    }
}

/// Two-step intensity bucket kept per cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Intensity {
    #[default]
    Full,
    Faint,
}

impl Intensity {
    pub fn from_level(level: f32) -> Self {
        if level < 0.5 {
            Intensity::Faint
        } else {
            Intensity::Full
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub glyph: Glyph,
    pub tier: Tier,
    pub intensity: Intensity,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: Glyph::Blank,
        tier: Tier::Dim,
        intensity: Intensity::Full,
    };

    pub fn new(glyph: Glyph, tier: Tier, intensity: Intensity) -> Self {
        Self {
            glyph,
            tier,
            intensity,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.glyph.is_blank()
    }
}
