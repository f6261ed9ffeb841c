// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::io::{stdout, Result, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, PrintStyledContent, ResetColor, SetAttribute,
        SetForegroundColor, Stylize,
    },
    terminal, Command, QueueableCommand,
};

use crate::frame::Frame;
use crate::palette::{resolve, Palette, Style};
use crate::runtime::ColorMode;

/// Toggles terminal-initiated scrolling (alternate scroll mode, `?1007`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlternateScroll(pub bool);

impl Command for AlternateScroll {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str(if self.0 { "\x1b[?1007h" } else { "\x1b[?1007l" })
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> Result<()> {
        Ok(())
    }
}

/// Holds raw mode for as long as it lives.
pub struct RawMode(());

impl RawMode {
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self(()))
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

pub fn size() -> Result<(u16, u16)> {
    terminal::size()
}

pub fn poll_event(timeout: Duration) -> Result<bool> {
    event::poll(timeout)
}

pub fn read_event() -> Result<event::Event> {
    event::read()
}

/// Switches to the alternate screen and prints the controls legend on the
/// last row.
pub fn enter<W: Write>(out: &mut W, rows: u16) -> Result<()> {
    out.queue(terminal::EnterAlternateScreen)?;
    out.queue(cursor::Hide)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(terminal::Clear(terminal::ClearType::Purge))?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(AlternateScroll(false))?;
    out.queue(terminal::DisableLineWrap)?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.queue(PrintStyledContent("Press ".bold().white()))?;
    out.queue(PrintStyledContent("1-5".bold().cyan()))?;
    out.queue(PrintStyledContent(" to change charset, ".white()))?;
    out.queue(PrintStyledContent("v/h".bold().cyan()))?;
    out.queue(PrintStyledContent(" for direction, ".white()))?;
    out.queue(PrintStyledContent("\u{2191}/\u{2193}".bold().green()))?;
    out.queue(PrintStyledContent(" for color scheme, ".white()))?;
    out.queue(PrintStyledContent("q".bold().red()))?;
    out.queue(PrintStyledContent(" to quit".white()))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(ResetColor)?;
    out.flush()
}

/// Undoes [`enter`] step by step in reverse order.
pub fn leave<W: Write>(out: &mut W) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(ResetColor)?;
    out.queue(terminal::EnableLineWrap)?;
    out.queue(AlternateScroll(true))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(cursor::Show)?;
    out.queue(terminal::LeaveAlternateScreen)?;
    out.flush()
}

/// Puts back every mode [`enter`] changes without clearing anything, so it is
/// safe to send when the alternate screen was never entered or already left.
pub fn restore<W: Write>(out: &mut W) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(ResetColor)?;
    out.queue(terminal::EnableLineWrap)?;
    out.queue(AlternateScroll(true))?;
    out.queue(cursor::Show)?;
    out.queue(terminal::LeaveAlternateScreen)?;
    out.flush()
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = restore(&mut out);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

/// Serialises the non-blank cells of `frame` into `out`.
///
/// Blank cells are never written, so whatever the terminal already shows there
/// stays. A `MoveTo` is only emitted when the cursor is not already sitting on
/// the next cell, and color/weight only when they change.
pub fn encode_frame(
    frame: &Frame,
    palette: &Palette,
    mode: ColorMode,
    out: &mut String,
) -> fmt::Result {
    out.clear();

    let mut cur_pos: Option<(u16, u16)> = None;
    let mut cur_style: Option<Style> = None;

    for (x, y, cell) in frame.visible() {
        if cur_pos != Some((x, y)) {
            cursor::MoveTo(x, y).write_ansi(out)?;
        }

        let style = resolve(palette, cell.tier, cell.intensity, mode);
        if cur_style.map(|s| s.fg) != Some(style.fg) {
            SetForegroundColor(style.fg.unwrap_or(Color::Reset)).write_ansi(out)?;
        }
        if cur_style.map(|s| s.bold) != Some(style.bold) {
            SetAttribute(if style.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            })
            .write_ansi(out)?;
        }
        cur_style = Some(style);

        Print(cell.glyph).write_ansi(out)?;

        let next_x = x.saturating_add(cell.glyph.width());
        cur_pos = (next_x < frame.width).then_some((next_x, y));
    }

    if cur_style.is_some() {
        SetAttribute(Attribute::Reset).write_ansi(out)?;
        ResetColor.write_ansi(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, Glyph, Intensity, Tier};
    use crate::palette::PALETTES;

    fn cell(c: char, tier: Tier) -> Cell {
        Cell::new(Glyph::Char(c), tier, Intensity::Full)
    }

    fn encode(frame: &Frame) -> String {
        let mut out = String::new();
        encode_frame(frame, &PALETTES[0], ColorMode::TrueColor, &mut out).unwrap();
        out
    }

    #[test]
    fn empty_frame_encodes_to_nothing() {
        assert_eq!(encode(&Frame::new(10, 4)), "");
    }

    #[test]
    fn adjacent_cells_share_one_move() {
        let mut f = Frame::new(10, 4);
        f.set(2, 1, cell('0', Tier::Bright));
        f.set(3, 1, cell('1', Tier::Bright));
        let out = encode(&f);
        assert_eq!(out.matches('H').count(), 1);
        assert!(out.starts_with("\x1b[2;3H"));
        assert_eq!(out.matches("\x1b[38;5;2m").count(), 1);
        assert!(out.contains("01"));
    }

    #[test]
    fn gaps_and_new_rows_need_a_move() {
        let mut f = Frame::new(10, 4);
        f.set(2, 1, cell('0', Tier::Bright));
        f.set(5, 1, cell('1', Tier::Bright));
        f.set(0, 2, cell('1', Tier::Bright));
        let out = encode(&f);
        assert!(out.contains("\x1b[2;3H"));
        assert!(out.contains("\x1b[2;6H"));
        assert!(out.contains("\x1b[3;1H"));
    }

    #[test]
    fn style_is_only_resent_on_change() {
        let mut f = Frame::new(4, 1);
        f.set(0, 0, cell('0', Tier::Medium));
        f.set(1, 0, cell('1', Tier::Medium));
        f.set(2, 0, cell('0', Tier::Bright));
        let out = encode(&f);
        // Medium and bright share a color and differ in weight only.
        assert_eq!(out.matches("\x1b[38;5;2m").count(), 1);
        assert_eq!(out.matches("\x1b[22m").count(), 1);
        assert_eq!(out.matches("\x1b[1m").count(), 1);
        assert!(out.ends_with("\x1b[0m\x1b[0m"));
    }

    #[test]
    fn wide_glyph_moves_cursor_two_columns() {
        let mut f = Frame::new(6, 1);
        f.set(0, 0, cell('\u{30A2}', Tier::Bright));
        f.set(2, 0, cell('\u{30A4}', Tier::Bright));
        f.set(3, 0, cell('\u{30A6}', Tier::Bright));
        let out = encode(&f);
        assert_eq!(out.matches('H').count(), 2);
        assert!(out.contains("\x1b[1;4H"));
    }

    #[test]
    fn enter_and_leave_mirror_each_other() {
        let mut buf: Vec<u8> = Vec::new();
        enter(&mut buf, 24).unwrap();
        let on = String::from_utf8(buf).unwrap();
        assert!(on.starts_with("\x1b[?1049h\x1b[?25l\x1b[2J\x1b[3J"));
        assert!(on.contains("\x1b[?1007l"));
        assert!(on.contains("\x1b[24;1H"));
        assert!(on.contains("to quit"));

        let mut buf: Vec<u8> = Vec::new();
        leave(&mut buf).unwrap();
        let off = String::from_utf8(buf).unwrap();
        let scroll = off.find("\x1b[?1007h").unwrap();
        let show = off.find("\x1b[?25h").unwrap();
        let main = off.find("\x1b[?1049l").unwrap();
        assert!(scroll < show && show < main);
        assert!(off.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn restore_after_leave_never_clears_the_main_screen() {
        let mut buf: Vec<u8> = Vec::new();
        enter(&mut buf, 24).unwrap();
        leave(&mut buf).unwrap();
        let left = buf.len();
        restore(&mut buf).unwrap();

        let again = String::from_utf8(buf[left..].to_vec()).unwrap();
        assert!(!again.contains("\x1b[2J"), "{:?}", again);
        assert!(!again.contains("\x1b[3J"), "{:?}", again);
        assert!(again.contains("\x1b[?25h"));
        assert!(again.ends_with("\x1b[?1049l"));
    }
}
