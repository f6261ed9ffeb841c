// Copyright (c) 2026 rezky_nightky

use std::io::{self, Write};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};

use crate::charset::Charset;
use crate::cloud::Cloud;
use crate::config::Settings;
use crate::frame::Frame;
use crate::palette::{cycle, palette_index, Palette, PALETTES};
use crate::runtime::{ColorMode, Direction};
use crate::terminal::{encode_frame, enter, leave};

/// Owns all mutable rain state and the output stream. Input handlers and the
/// tick run on the same thread, so every tick sees a settled state.
pub struct Session<W: Write> {
    out: W,
    cloud: Cloud,
    frame: Frame,
    palette: usize,
    color_mode: ColorMode,
    running: bool,
    buf: String,
}

impl<W: Write> Session<W> {
    pub fn new(out: W, settings: &Settings, cols: u16, rows: u16) -> Self {
        let mut cloud = Cloud::new(
            settings.direction,
            settings.charset,
            settings.density,
            settings.rng(),
        );
        cloud.reset(cols, rows);

        Self {
            out,
            cloud,
            frame: Frame::new(cols, rows),
            palette: settings.palette % PALETTES.len(),
            color_mode: settings.color_mode,
            running: false,
            buf: String::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn cloud(&self) -> &Cloud {
        &self.cloud
    }

    pub fn palette(&self) -> &'static Palette {
        &PALETTES[self.palette]
    }

    pub fn start(&mut self) -> io::Result<()> {
        if self.running {
            return Ok(());
        }
        self.running = true;
        enter(&mut self.out, self.frame.height)?;
        info!(
            "session started: {}x{} {} {} palette={}",
            self.frame.width,
            self.frame.height,
            self.cloud.direction,
            self.cloud.charset,
            self.palette().name
        );
        Ok(())
    }

    /// Restores the terminal. Calling it again is a no-op.
    pub fn stop(&mut self) -> io::Result<()> {
        if !self.running {
            return Ok(());
        }
        self.running = false;
        info!("session stopped");
        leave(&mut self.out)
    }

    /// Advances the rain one step and writes the resulting frame.
    pub fn tick(&mut self) -> io::Result<()> {
        if !self.running {
            return Ok(());
        }

        self.cloud.rain();
        self.cloud.draw(&mut self.frame);
        encode_frame(
            &self.frame,
            &PALETTES[self.palette],
            self.color_mode,
            &mut self.buf,
        )
        .map_err(|_| io::Error::other("failed to encode frame"))?;

        if !self.buf.is_empty() {
            self.out.write_all(self.buf.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Rebuilds the droplet population for a new screen size.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        info!("resize to {}x{}", cols, rows);
        self.frame.resize(cols, rows);
        self.cloud.reset(cols, rows);
    }

    pub fn cycle_palette(&mut self, forward: bool) {
        self.palette = cycle(self.palette, forward);
        debug!("palette -> {}", self.palette().name);
    }

    fn select_palette(&mut self, name: &str) {
        if let Ok(i) = palette_index(name) {
            self.palette = i;
            debug!("palette -> {}", name);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> io::Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.stop()?,
            KeyCode::Char('q') | KeyCode::Esc => self.stop()?,
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(cs) = Charset::from_hotkey(c) {
                    self.cloud.set_charset(cs);
                }
            }
            KeyCode::Char('v') => {
                self.cloud.set_direction(Direction::Vertical);
            }
            KeyCode::Char('h') => {
                self.cloud.set_direction(Direction::Horizontal);
            }
            KeyCode::Char('g') => self.select_palette("green"),
            KeyCode::Char('b') => self.select_palette("blue"),
            KeyCode::Char('p') => self.select_palette("purple"),
            KeyCode::Up => self.cycle_palette(true),
            KeyCode::Down => self.cycle_palette(false),
            _ => {}
        }
        Ok(())
    }
}

impl<W: Write> Drop for Session<W> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
