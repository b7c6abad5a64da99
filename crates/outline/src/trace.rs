//! Raster contour tracing.
//!
//! Extracts one closed pixel-boundary polygon from a rasterized design
//! using Moore-neighbor boundary tracing. Only the first connected
//! foreground region reachable from the row-major scan is traced;
//! multi-blob images must be segmented upstream.

use image::RgbaImage;
use stickernest_core::{Error, Point, Polygon, Result};

/// Per-pixel foreground test over a rectangular buffer.
///
/// Coordinates outside the buffer are background. The tracer only ever
/// consults this test, so hosts can adapt any pixel source.
pub trait RasterMask {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn is_foreground(&self, x: i64, y: i64) -> bool;
}

/// Foreground test for one RGBA pixel: low-alpha and near-white pixels are
/// background, everything else is foreground.
pub fn foreground_pixel(rgba: [u8; 4]) -> bool {
    let [r, g, b, a] = rgba;
    if a < 128 {
        return false;
    }
    if r > 250 && g > 250 && b > 250 {
        return false;
    }
    true
}

impl RasterMask for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    fn is_foreground(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= RgbaImage::width(self) as i64 || y >= RgbaImage::height(self) as i64
        {
            return false;
        }
        foreground_pixel(self.get_pixel(x as u32, y as u32).0)
    }
}

/// 8-neighborhood in clockwise scan order, starting east.
const NEIGHBORS: [(i64, i64); 8] = [
    (1, 0),   // E
    (1, -1),  // NE
    (0, -1),  // N
    (-1, -1), // NW
    (-1, 0),  // W
    (-1, 1),  // SW
    (0, 1),   // S
    (1, 1),   // SE
];

/// Traces the outer boundary of the first foreground region in the mask.
///
/// Moore-neighbor tracing: from each boundary pixel, the eight neighbors
/// are scanned clockwise starting immediately counter-clockwise of the
/// arrival direction (the initial arrival is taken to be from the west).
/// The walk closes when it returns to the start pixel; a 1-pixel-wide
/// feature with no onward neighbor truncates the contour instead, which is
/// not an error.
///
/// Returns [`Error::NoForegroundPixel`] when the mask is entirely
/// background.
pub fn trace_outline(mask: &impl RasterMask) -> Result<Polygon> {
    let width = mask.width() as i64;
    let height = mask.height() as i64;

    // Row-major scan for the trace start.
    let mut start = None;
    'scan: for y in 0..height {
        for x in 0..width {
            if mask.is_foreground(x, y) {
                start = Some((x, y));
                break 'scan;
            }
        }
    }
    let start = start.ok_or(Error::NoForegroundPixel)?;

    let mut contour: Polygon = Vec::new();
    let mut current = start;
    let mut last_direction = 6usize;

    // Each boundary pixel is visited a bounded number of times; the cap
    // only guards against a cycle that never re-enters the start pixel.
    let max_steps = (width * height * 4).max(16) as usize;

    for _ in 0..max_steps {
        contour.push(Point::new(current.0 as f64, current.1 as f64));

        let mut check = (last_direction + 5) % 8;
        let mut next = None;

        for _ in 0..8 {
            let (dx, dy) = NEIGHBORS[check];
            let neighbor = (current.0 + dx, current.1 + dy);
            if mask.is_foreground(neighbor.0, neighbor.1) {
                next = Some((neighbor, check));
                break;
            }
            check = (check + 1) % 8;
        }

        match next {
            Some((pos, dir)) => {
                current = pos;
                last_direction = dir;
            }
            // Open contour on a 1-pixel-wide feature: truncate.
            None => break,
        }

        if current == start {
            break;
        }
    }

    Ok(contour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
    }

    #[test]
    fn test_empty_mask_is_an_error() {
        let img = blank(8, 8);
        assert!(matches!(
            trace_outline(&img),
            Err(Error::NoForegroundPixel)
        ));
    }

    #[test]
    fn test_white_pixels_are_background() {
        let mut img = blank(4, 4);
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        assert!(matches!(
            trace_outline(&img),
            Err(Error::NoForegroundPixel)
        ));

        img.put_pixel(2, 2, Rgba([250, 250, 250, 255]));
        assert!(trace_outline(&img).is_ok());
    }

    #[test]
    fn test_low_alpha_is_background() {
        let mut img = blank(4, 4);
        img.put_pixel(1, 1, Rgba([10, 10, 10, 127]));
        assert!(matches!(
            trace_outline(&img),
            Err(Error::NoForegroundPixel)
        ));
    }

    #[test]
    fn test_traces_filled_square_boundary() {
        let mut img = blank(8, 8);
        for y in 2..=4 {
            for x in 2..=4 {
                img.put_pixel(x, y, INK);
            }
        }

        let contour = trace_outline(&img).unwrap();

        // Boundary of a 3x3 block is its 8 rim pixels.
        assert_eq!(contour.len(), 8);
        assert_eq!(contour[0], Point::new(2.0, 2.0));
        for p in &contour {
            let on_rim = p.x == 2.0 || p.x == 4.0 || p.y == 2.0 || p.y == 4.0;
            assert!(on_rim, "interior pixel {:?} in contour", p);
        }
    }

    #[test]
    fn test_single_pixel_truncates() {
        let mut img = blank(4, 4);
        img.put_pixel(2, 2, INK);

        let contour = trace_outline(&img).unwrap();
        assert_eq!(contour, vec![Point::new(2.0, 2.0)]);
    }

    #[test]
    fn test_only_first_region_is_traced() {
        let mut img = blank(16, 16);
        // First blob in scan order.
        for y in 1..=3 {
            for x in 1..=3 {
                img.put_pixel(x, y, INK);
            }
        }
        // Second, disjoint blob further down.
        for y in 9..=13 {
            for x in 9..=13 {
                img.put_pixel(x, y, INK);
            }
        }

        let contour = trace_outline(&img).unwrap();
        for p in &contour {
            assert!(p.x <= 3.0 && p.y <= 3.0);
        }
    }
}
