// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
            ColorMode::Mono => "mono",
        }
    }
}

/// Axis the rain falls along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

impl Direction {
    /// Number of lanes droplets can occupy on a `cols` x `rows` screen.
    pub fn lanes(self, cols: u16, rows: u16) -> u16 {
        match self {
            Direction::Vertical => cols,
            Direction::Horizontal => rows,
        }
    }

    /// Screen extent along the fall axis.
    pub fn fall_extent(self, cols: u16, rows: u16) -> u16 {
        match self {
            Direction::Vertical => rows,
            Direction::Horizontal => cols,
        }
    }

    /// Maps a (lane, distance along the fall axis) pair to screen `(x, y)`.
    pub fn to_screen(self, lane: i32, along: i32) -> (i32, i32) {
        match self {
            Direction::Vertical => (lane, along),
            Direction::Horizontal => (along, lane),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Vertical => "vertical",
            Direction::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" | "v" => Ok(Direction::Vertical),
            "horizontal" | "h" => Ok(Direction::Horizontal),
            _ => Err(Error::InvalidValue {
                flag: "--direction",
                value: s.to_string(),
                expected: "vertical, horizontal".to_string(),
            }),
        }
    }
}
