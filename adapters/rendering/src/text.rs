//! Plain-text backend that prints frames to any writer.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};

use crate::{Presentation, RenderingBackend, Sprite};

/// Writes each frame as a block of characters, optionally colored with ANSI
/// escapes.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
    color: bool,
    frames: u64,
}

impl<W: Write> TextBackend<W> {
    /// Creates a monochrome backend over `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            color: false,
            frames: 0,
        }
    }

    /// Enables or disables 24-bit color escapes.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Frames presented so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn hud_line(presentation: &Presentation) -> String {
        let hud = &presentation.scene.hud;
        let mut line = format!(
            "{} | score {} | level {} | best {}",
            presentation.window_title, hud.score, hud.level, hud.high_score
        );
        if hud.shielded {
            line.push_str(" | shield");
        }
        if hud.boosted {
            line.push_str(" | boost");
        }
        if let Some(prompt) = hud.prompt() {
            line.push_str(" | ");
            line.push_str(prompt);
        }
        line
    }

    fn glyph(&self, presentation: &Presentation, sprite: Sprite) -> String {
        if !self.color {
            return sprite.symbol().to_string();
        }
        let [red, green, blue] = presentation.palette.color_of(sprite).to_rgb_u8();
        format!("\x1b[38;2;{red};{green};{blue}m{}\x1b[0m", sprite.symbol())
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        let mut frame = Self::hud_line(presentation);
        frame.push('\n');
        for line in presentation.scene.lines() {
            for &sprite in line {
                frame.push_str(&self.glyph(presentation, sprite));
            }
            frame.push('\n');
        }

        self.writer
            .write_all(frame.as_bytes())
            .context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")?;
        self.frames += 1;
        Ok(())
    }
}
