//! Signature capture
//!
//! Terminal stand-in for a drawing canvas. Pointer strokes are rasterised onto
//! a fixed logical bitmap and exported as a base64 PBM data URL. The wizard
//! never looks inside the payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Who a signature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignatureRole {
    #[serde(rename = "party1")]
    Primary,
    #[serde(rename = "party2")]
    Secondary,
}

impl SignatureRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "Primary Party Signature",
            Self::Secondary => "Second Party Signature",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

/// Prefix of every exported payload
pub const PAYLOAD_PREFIX: &str = "data:image/x-portable-bitmap;base64,";

/// Free-hand drawing surface for one signer
#[derive(Debug, Clone)]
pub struct SignaturePad {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
    last_point: Option<(u32, u32)>,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new(Self::WIDTH, Self::HEIGHT)
    }
}

impl SignaturePad {
    /// Logical canvas size
    pub const WIDTH: u32 = 400;
    pub const HEIGHT: u32 = 150;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
            last_point: None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.last_point.is_some()
    }

    pub fn has_ink(&self) -> bool {
        self.pixels.iter().any(|p| *p)
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[(y * self.width + x) as usize]
    }

    /// Pointer down
    pub fn begin_stroke(&mut self, x: u32, y: u32) {
        let point = self.clamp(x, y);
        self.plot(point.0, point.1);
        self.last_point = Some(point);
    }

    /// Pointer drag. Ignored unless a stroke is in progress.
    pub fn extend_stroke(&mut self, x: u32, y: u32) {
        let Some(from) = self.last_point else {
            return;
        };
        let to = self.clamp(x, y);
        self.line(from, to);
        self.last_point = Some(to);
    }

    /// Pointer up. Returns the payload when a stroke was actually finished.
    pub fn end_stroke(&mut self) -> Option<String> {
        self.last_point.take()?;
        Some(self.to_payload())
    }

    /// Wipe the canvas. Returns the empty payload that means "not signed".
    pub fn clear(&mut self) -> String {
        self.pixels.iter_mut().for_each(|p| *p = false);
        self.last_point = None;
        String::new()
    }

    /// Map a terminal cell inside a `cols` x `rows` box to canvas coordinates
    pub fn point_from_cell(&self, col: u16, row: u16, cols: u16, rows: u16) -> (u32, u32) {
        let cols = u32::from(cols.max(1));
        let rows = u32::from(rows.max(1));
        let x = u32::from(col) * self.width / cols + self.width / (2 * cols);
        let y = u32::from(row) * self.height / rows + self.height / (2 * rows);
        self.clamp(x, y)
    }

    /// Downsample to a `cols` x `rows` grid, a cell is inked if any pixel in it is
    pub fn sample(&self, cols: u16, rows: u16) -> Vec<Vec<bool>> {
        let cols = u32::from(cols.max(1));
        let rows = u32::from(rows.max(1));
        (0..rows)
            .map(|r| {
                let y0 = r * self.height / rows;
                let y1 = ((r + 1) * self.height / rows).max(y0 + 1);
                (0..cols)
                    .map(|c| {
                        let x0 = c * self.width / cols;
                        let x1 = ((c + 1) * self.width / cols).max(x0 + 1);
                        (y0..y1.min(self.height))
                            .any(|y| (x0..x1.min(self.width)).any(|x| self.is_set(x, y)))
                    })
                    .collect()
            })
            .collect()
    }

    /// Export as a base64 data URL holding a binary PBM (P4) image
    pub fn to_payload(&self) -> String {
        let row_bytes = self.width.div_ceil(8) as usize;
        let mut image = format!("P4\n{} {}\n", self.width, self.height).into_bytes();
        image.reserve(row_bytes * self.height as usize);

        for y in 0..self.height {
            let mut row = vec![0u8; row_bytes];
            for x in 0..self.width {
                if self.is_set(x, y) {
                    row[(x / 8) as usize] |= 0x80 >> (x % 8);
                }
            }
            image.extend_from_slice(&row);
        }

        format!("{PAYLOAD_PREFIX}{}", STANDARD.encode(image))
    }

    fn clamp(&self, x: u32, y: u32) -> (u32, u32) {
        (x.min(self.width - 1), y.min(self.height - 1))
    }

    fn plot(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = true;
        }
    }

    // Bresenham
    fn line(&mut self, from: (u32, u32), to: (u32, u32)) {
        let (mut x0, mut y0) = (i64::from(from.0), i64::from(from.1));
        let (x1, y1) = (i64::from(to.0), i64::from(to.1));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0 as u32, y0 as u32);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
