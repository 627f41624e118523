//! Preview image handling — decoding fetched bytes into an RGB grid and
//! rendering it into a dialog region with unicode half-blocks.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper half
//! block glyph with the top pixel as foreground and the bottom pixel as
//! background. Decoding and downsampling happen in the fetch task, so the
//! render path only samples an already-bounded pixel grid.

use image::GenericImageView;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use alted_core::{AltedError, Result};

use crate::theme::Theme;

/// Longest side of a decoded preview, in pixels. Terminal regions are far
/// smaller than this, so decoding any finer is wasted work.
const MAX_PREVIEW_DIM: u32 = 512;

/// A decoded, downsampled preview image.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    width: u32,
    height: u32,
    pixels: Vec<(u8, u8, u8)>,
}

impl PreviewImage {
    /// Decode raw image bytes and downsample to a bounded size.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AltedError::Preview(e.to_string()))?;
        let img = if img.width() > MAX_PREVIEW_DIM || img.height() > MAX_PREVIEW_DIM {
            img.thumbnail(MAX_PREVIEW_DIM, MAX_PREVIEW_DIM)
        } else {
            img
        };
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(AltedError::Preview("empty image".into()));
        }
        let rgb = img.to_rgb8();
        let pixels = rgb.pixels().map(|p| (p.0[0], p.0[1], p.0[2])).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }
}

/// State of the preview region inside the caption dialog.
#[derive(Debug, Clone, Default)]
pub enum PreviewState {
    /// A fetch is in flight.
    Loading,
    /// The image resolved and can be rendered.
    Ready(PreviewImage),
    /// No preview exists or it could not be resolved; show the placeholder.
    #[default]
    Unavailable,
}

/// Render the preview region for the current state.
pub fn render(state: &PreviewState, frame: &mut Frame, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    match state {
        PreviewState::Loading => {
            let placeholder = Paragraph::new(Span::styled("Loading preview...", Theme::dim()))
                .centered();
            frame.render_widget(placeholder, center_line(area));
        }
        PreviewState::Unavailable => {
            let placeholder =
                Paragraph::new(Span::styled("No preview available", Theme::dim())).centered();
            frame.render_widget(placeholder, center_line(area));
        }
        PreviewState::Ready(image) => {
            let lines = half_block_lines(image, area.width, area.height);
            frame.render_widget(Paragraph::new(lines), area);
        }
    }
}

/// A one-line Rect vertically centered in `area`, for placeholder text.
fn center_line(area: Rect) -> Rect {
    let y = area.y + area.height / 2;
    Rect::new(area.x, y, area.width, 1)
}

/// Sample the image into half-block lines fitting a cell grid of
/// `cols` x `rows`. Each cell covers two vertical subpixels, which roughly
/// compensates for the 1:2 aspect ratio of terminal cells.
fn half_block_lines(image: &PreviewImage, cols: u16, rows: u16) -> Vec<Line<'static>> {
    let grid_w = cols as u32;
    let grid_h = rows as u32 * 2;

    // Fit the image into the subpixel grid, preserving aspect ratio.
    let scale_x = grid_w as f64 / image.width() as f64;
    let scale_y = grid_h as f64 / image.height() as f64;
    let scale = scale_x.min(scale_y);
    let target_w = ((image.width() as f64 * scale) as u32).max(1);
    let target_h = ((image.height() as f64 * scale) as u32).max(1);
    let off_x = (grid_w - target_w) / 2;
    let off_y = (grid_h - target_h) / 2;

    let mut lines = Vec::with_capacity(rows as usize);
    for row in 0..rows as u32 {
        let mut spans = Vec::with_capacity(cols as usize);
        for col in 0..grid_w {
            let top = sample(image, col, row * 2, off_x, off_y, target_w, target_h);
            let bottom = sample(image, col, row * 2 + 1, off_x, off_y, target_w, target_h);
            match (top, bottom) {
                (None, None) => spans.push(Span::raw(" ")),
                (top, bottom) => {
                    let (tr, tg, tb) = top.unwrap_or((0, 0, 0));
                    let (br, bg, bb) = bottom.unwrap_or((0, 0, 0));
                    spans.push(Span::styled(
                        "\u{2580}",
                        Style::default()
                            .fg(ratatui::style::Color::Rgb(tr, tg, tb))
                            .bg(ratatui::style::Color::Rgb(br, bg, bb)),
                    ));
                }
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Nearest-neighbor sample at subpixel grid position, or None outside the
/// letterboxed image area.
fn sample(
    image: &PreviewImage,
    gx: u32,
    gy: u32,
    off_x: u32,
    off_y: u32,
    target_w: u32,
    target_h: u32,
) -> Option<(u8, u8, u8)> {
    if gx < off_x || gy < off_y {
        return None;
    }
    let tx = gx - off_x;
    let ty = gy - off_y;
    if tx >= target_w || ty >= target_h {
        return None;
    }
    let sx = tx * image.width() / target_w;
    let sy = ty * image.height() / target_h;
    Some(image.pixel(sx, sy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, _| {
            image::Rgb([(x % 256) as u8, 10, 200])
        });
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn decodes_png_bytes() {
        let image = PreviewImage::decode(&png_bytes(8, 4)).unwrap();
        assert_eq!(image.width(), 8);
        assert_eq!(image.height(), 4);
        assert_eq!(image.pixel(0, 0), (0, 10, 200));
    }

    #[test]
    fn large_images_are_downsampled() {
        let image = PreviewImage::decode(&png_bytes(1024, 256)).unwrap();
        assert!(image.width() <= MAX_PREVIEW_DIM);
        assert!(image.height() <= MAX_PREVIEW_DIM);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(PreviewImage::decode(b"not an image").is_err());
    }

    #[test]
    fn half_block_lines_fill_the_grid() {
        let image = PreviewImage::decode(&png_bytes(8, 8)).unwrap();
        let lines = half_block_lines(&image, 10, 5);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.spans.len() == 10));
    }
}
