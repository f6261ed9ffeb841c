// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use log::warn;
use rand::Rng;

use crate::cell::Glyph;
use crate::error::Error;

pub const FALLBACK_EMOJI: &str = "\u{1F308}";

const ASCII_FIRST: u32 = 33;
const ASCII_COUNT: u32 = 94;
const BRAILLE_FIRST: u32 = 0x2800;
const BRAILLE_COUNT: u32 = 256;
const KATAKANA_FIRST: u32 = 0x30A0;
const KATAKANA_COUNT: u32 = 96;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Charset {
    #[default]
    Ascii,
    Binary,
    Braille,
    Emoji,
    Katakana,
}

impl Charset {
    /// Order of the `1`..`5` hotkeys.
    pub const ALL: [Charset; 5] = [
        Charset::Ascii,
        Charset::Binary,
        Charset::Braille,
        Charset::Emoji,
        Charset::Katakana,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Charset::Ascii => "ascii",
            Charset::Binary => "binary",
            Charset::Braille => "braille",
            Charset::Emoji => "emoji",
            Charset::Katakana => "katakana",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Charset::Ascii => "Printable ASCII (! through ~)",
            Charset::Binary => "0 and 1",
            Charset::Braille => "Braille patterns (U+2800..U+28FF)",
            Charset::Emoji => "Emoji from the standard emoji table",
            Charset::Katakana => "Katakana block (U+30A0..U+30FF), dense trails",
        }
    }

    /// Charset bound to a digit hotkey.
    pub fn from_hotkey(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Katakana trails are drawn without gaps.
    pub fn dense_trail(self) -> bool {
        self == Charset::Katakana
    }

    /// One random glyph from this charset.
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> Glyph {
        match self {
            Charset::Ascii => code_point(ASCII_FIRST, ASCII_COUNT, rng),
            Charset::Binary => Glyph::Char(if rng.random_bool(0.5) { '1' } else { '0' }),
            Charset::Braille => code_point(BRAILLE_FIRST, BRAILLE_COUNT, rng),
            Charset::Emoji => {
                let table = emoji_table();
                if table.is_empty() {
                    return Glyph::Emoji(FALLBACK_EMOJI);
                }
                let idx = rng.random_range(0..table.len());
                Glyph::Emoji(table.get(idx).copied().unwrap_or(FALLBACK_EMOJI))
            }
            Charset::Katakana => code_point(KATAKANA_FIRST, KATAKANA_COUNT, rng),
        }
    }
}

fn code_point<R: Rng + ?Sized>(first: u32, count: u32, rng: &mut R) -> Glyph {
    let v = first + rng.random_range(0..count);
    Glyph::Char(char::from_u32(v).unwrap_or('?'))
}

fn emoji_table() -> &'static [&'static str] {
    static TABLE: OnceLock<Vec<&'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let table: Vec<&'static str> = emojis::iter().map(|e| e.as_str()).collect();
        if table.is_empty() {
            warn!("emoji table is empty, using {} for every glyph", FALLBACK_EMOJI);
        }
        table
    })
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Charset::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| Error::InvalidValue {
                flag: "--charset",
                value: s.to_string(),
                expected: Charset::ALL.map(Charset::name).join(", "),
            })
    }
}

pub fn print_list_charsets() {
    println!("AVAILABLE CHARSETS:");
    println!();
    println!("KEY  VALUE      DESCRIPTION");
    for (i, c) in Charset::ALL.iter().enumerate() {
        println!("{:<4} {:<10} {}", i + 1, c.name(), c.description());
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn binary_only_yields_0_or_1() {
        let mut rng = rng();
        for _ in 0..500 {
            let g = Charset::Binary.generate(&mut rng);
            assert!(g == Glyph::Char('0') || g == Glyph::Char('1'), "{:?}", g);
        }
    }

    #[test]
    fn ascii_stays_in_printable_range() {
        let mut rng = rng();
        for _ in 0..2000 {
            let Glyph::Char(c) = Charset::Ascii.generate(&mut rng) else {
                panic!("ascii produced a non-char glyph");
            };
            assert!((33..=126).contains(&(c as u32)), "{:?}", c);
        }
    }

    #[test]
    fn braille_and_katakana_stay_in_their_windows() {
        let mut rng = rng();
        for _ in 0..2000 {
            let Glyph::Char(b) = Charset::Braille.generate(&mut rng) else {
                panic!("braille produced a non-char glyph");
            };
            assert!((0x2800..0x2900).contains(&(b as u32)));

            let Glyph::Char(k) = Charset::Katakana.generate(&mut rng) else {
                panic!("katakana produced a non-char glyph");
            };
            assert!((0x30A0..0x3100).contains(&(k as u32)));
        }
    }

    #[test]
    fn every_charset_yields_one_visible_glyph() {
        let mut rng = rng();
        for cs in Charset::ALL {
            for _ in 0..50 {
                let g = cs.generate(&mut rng);
                assert!(!g.is_blank(), "{} produced a blank", cs);
                let text = g.to_string();
                assert!(!text.is_empty());
                if cs != Charset::Emoji {
                    assert_eq!(text.chars().count(), 1);
                }
            }
        }
    }

    #[test]
    fn emoji_comes_from_table() {
        let mut rng = rng();
        let Glyph::Emoji(s) = Charset::Emoji.generate(&mut rng) else {
            panic!("emoji charset produced a non-emoji glyph");
        };
        assert!(s == FALLBACK_EMOJI || emojis::get(s).is_some());
    }

    #[test]
    fn hotkeys_map_in_order() {
        assert_eq!(Charset::from_hotkey('1'), Some(Charset::Ascii));
        assert_eq!(Charset::from_hotkey('5'), Some(Charset::Katakana));
        assert_eq!(Charset::from_hotkey('0'), None);
        assert_eq!(Charset::from_hotkey('6'), None);
    }

    #[test]
    fn parse_is_case_insensitive_and_strict() {
        assert_eq!("KATAKANA".parse::<Charset>().unwrap(), Charset::Katakana);
        let err = "hex".parse::<Charset>().unwrap_err();
        assert!(err.to_string().contains("ascii, binary, braille, emoji, katakana"));
    }
}
