// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::styling::{AnsiColor, Color, Effects, Style};
use clap::builder::Styles;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use crate::charset::Charset;
use crate::error::{Error, Result};
use crate::palette::{palette_index, PALETTES};
use crate::runtime::{ColorMode, Direction};

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn clap_styles() -> Styles {
    Styles::styled()
        .header(
            Style::new()
                .effects(Effects::BOLD)
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .usage(
            Style::new()
                .effects(Effects::BOLD)
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Magenta))))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "digital-rain", version, about)]
pub struct Args {
    #[arg(
        short = 'd',
        long = "direction",
        default_value = "vertical",
        help_heading = "APPEARANCE",
        help = "Direction of rain: vertical or horizontal"
    )]
    pub direction: String,

    #[arg(
        short = 'c',
        long = "charset",
        default_value = "ascii",
        help_heading = "CHARSET",
        help = "Character set: ascii, binary, braille, emoji, katakana"
    )]
    pub charset: String,

    #[arg(
        long = "color",
        default_value = "green",
        help_heading = "APPEARANCE",
        help = "Color palette (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "density",
        default_value_t = 1.0,
        help_heading = "APPEARANCE",
        help = "Drop density (min 0.0 max 1.0); lower means fewer drops and more gaps"
    )]
    pub density: f32,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0, 16, 8/256, 24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random generator for a reproducible run"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write log records to this file (filter with DIGITAL_RAIN_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charsets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color palettes and exit"
    )]
    pub list_colors: bool,

    #[arg(
        short = 'i',
        long = "info",
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,
}

/// Validated runtime configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub direction: Direction,
    pub charset: Charset,
    pub palette: usize,
    pub density: f32,
    pub color_mode: ColorMode,
    pub seed: Option<u64>,
    pub duration: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            direction: Direction::Vertical,
            charset: Charset::Ascii,
            palette: 0,
            density: 1.0,
            color_mode: ColorMode::Color256,
            seed: None,
            duration: None,
        }
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            direction: args.direction.parse()?,
            charset: args.charset.parse()?,
            palette: palette_index(&args.color)?,
            density: require_range("--density", args.density as f64, 0.0, 1.0)? as f32,
            color_mode: match args.colormode {
                Some(m) => color_mode_from_bits(m)?,
                None => detect_color_mode(),
            },
            seed: args.seed,
            duration: parse_duration(args.duration)?,
        })
    }

    pub fn palette_name(&self) -> &'static str {
        PALETTES[self.palette % PALETTES.len()].name
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn require_range(flag: &'static str, v: f64, min: f64, max: f64) -> Result<f64> {
    if !v.is_finite() || v < min || v > max {
        return Err(Error::OutOfRange {
            flag,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

fn parse_duration(secs: Option<f64>) -> Result<Option<Duration>> {
    match secs {
        Some(s) if s.is_finite() && s <= 0.0 => Ok(None),
        Some(s) => {
            let s = require_range("--duration", s, 0.1, 86400.0)?;
            Ok(Some(Duration::from_secs_f64(s)))
        }
        None => Ok(None),
    }
}

fn color_mode_from_bits(bits: u16) -> Result<ColorMode> {
    match bits {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        _ => Err(Error::InvalidValue {
            flag: "--colormode",
            value: bits.to_string(),
            expected: "0, 16, 8, 256, 24, 32".to_string(),
        }),
    }
}

fn detect_color_mode() -> ColorMode {
    color_mode_from_env(
        &std::env::var("COLORTERM").unwrap_or_default(),
        &std::env::var("TERM").unwrap_or_default(),
    )
}

fn color_mode_from_env(colorterm: &str, term: &str) -> ColorMode {
    let colorterm = colorterm.to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    let term = term.to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}
