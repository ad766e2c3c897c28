//! Occupancy masks from text grids and raster images.
//!
//! An obstacle editor can hand its drawing over as an image: every pixel painted with the marker
//! colour becomes a blocked cell, everything else is free. Pixel `(x, y)` maps to cell `(x, y)`.

use std::path::Path;

use image::{Rgb, RgbImage};
use log::debug;

use rrt::{OccupancyMask, Rectangle};

use crate::error::{MapError, Result};

/// Colour the editor paints obstacles with.
pub const DEFAULT_MARKER: Rgb<u8> = Rgb([0, 0, 255]);

const BLOCKED: char = '#';
const FREE: char = '.';

/// Parses rows of `#` (blocked) and `.` (free), top row first.
pub fn parse_grid<S: AsRef<str>>(rows: &[S]) -> Result<OccupancyMask> {
    let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
    let mut cells = Vec::with_capacity(width * rows.len());

    for (row_idx, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let len = row.chars().count();
        if len != width {
            return Err(MapError::RaggedGrid { row: row_idx, expected: width, actual: len });
        }

        for c in row.chars() {
            match c {
                BLOCKED => cells.push(true),
                FREE => cells.push(false),
                other => {
                    return Err(MapError::parse(
                        row_idx + 1,
                        format!("unexpected cell {:?}, use '{}' or '{}'", other, BLOCKED, FREE),
                    ))
                }
            }
        }
    }

    Ok(OccupancyMask::from_cells(width, rows.len(), cells)?)
}

pub fn mask_from_image(img: &RgbImage, marker: Rgb<u8>) -> OccupancyMask {
    let (width, height) = img.dimensions();
    let mut mask = OccupancyMask::new(width as usize, height as usize);

    for (x, y, pixel) in img.enumerate_pixels() {
        if *pixel == marker {
            mask.set_blocked(x as i64, y as i64);
        }
    }

    mask
}

/// Paints blocked cells with `marker` on a black background.
pub fn mask_to_image(mask: &OccupancyMask, marker: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(mask.width() as u32, mask.height() as u32, |x, y| {
        if mask.is_blocked(x as i64, y as i64) {
            marker
        } else {
            Rgb([0, 0, 0])
        }
    })
}

pub fn load_mask_image<P: AsRef<Path>>(path: P, marker: Rgb<u8>) -> Result<OccupancyMask> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|source| MapError::Image { path: path.to_path_buf(), source })?
        .into_rgb8();

    let mask = mask_from_image(&img, marker);
    debug!(
        "loaded {}x{} mask from {} with {} blocked cells",
        mask.width(),
        mask.height(),
        path.display(),
        mask.blocked_count(),
    );

    Ok(mask)
}

pub fn save_mask_image<P: AsRef<Path>>(mask: &OccupancyMask, path: P, marker: Rgb<u8>) -> Result<()> {
    let path = path.as_ref();
    mask_to_image(mask, marker)
        .save(path)
        .map_err(|source| MapError::Image { path: path.to_path_buf(), source })
}

/// Rasterizes rectangles onto a `width` x `height` mask.
pub fn rasterize<'a, I>(rects: I, width: usize, height: usize) -> OccupancyMask
where
    I: IntoIterator<Item = &'a Rectangle>,
{
    let mut mask = OccupancyMask::new(width, height);
    for rect in rects {
        mask.fill_rect(rect);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra as na;
    use rstest::rstest;

    #[test]
    fn grid_rows_become_mask_rows() {
        let mask = parse_grid(&["..#", "#..", "..."]).unwrap();
        assert_eq!((mask.width(), mask.height()), (3, 3));
        assert!(mask.is_blocked(2, 0));
        assert!(mask.is_blocked(0, 1));
        assert_eq!(mask.blocked_count(), 2);
    }

    #[test]
    fn empty_grid_is_an_empty_mask() {
        let rows: [&str; 0] = [];
        let mask = parse_grid(&rows).unwrap();
        assert_eq!((mask.width(), mask.height()), (0, 0));
    }

    #[rstest]
    #[case(&["...", ".."], 1)]
    #[case(&["..", "..."], 1)]
    #[case(&["..", "..", "."], 2)]
    fn ragged_grids_are_rejected(#[case] rows: &[&str], #[case] bad_row: usize) {
        match parse_grid(rows) {
            Err(MapError::RaggedGrid { row, .. }) => assert_eq!(row, bad_row),
            other => panic!("expected a ragged grid error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_cells_are_rejected() {
        assert!(matches!(parse_grid(&["..", ".x"]), Err(MapError::Parse { line: 2, .. })));
    }

    #[test]
    fn only_the_marker_colour_blocks() {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(1, 0, DEFAULT_MARKER);
        img.put_pixel(3, 1, DEFAULT_MARKER);
        img.put_pixel(2, 1, Rgb([0, 0, 254]));
        img.put_pixel(0, 1, Rgb([255, 0, 0]));

        let mask = mask_from_image(&img, DEFAULT_MARKER);
        assert_eq!((mask.width(), mask.height()), (4, 2));
        assert_eq!(mask.blocked_count(), 2);
        assert!(mask.is_blocked(1, 0));
        assert!(mask.is_blocked(3, 1));
    }

    #[test]
    fn drawn_rectangles_survive_the_trip_through_an_image() {
        let rects = [
            Rectangle::new(na::Point2::new(2.0, 3.0), na::Vector2::new(5.0, 4.0)),
            Rectangle::new(na::Point2::new(15.0, 0.0), na::Vector2::new(3.0, 19.0)),
        ];
        let mask = rasterize(&rects, 20, 12);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obstacles.png");
        save_mask_image(&mask, &path, DEFAULT_MARKER).unwrap();

        assert_eq!(load_mask_image(&path, DEFAULT_MARKER).unwrap(), mask);
    }

    #[test]
    fn missing_images_report_their_path() {
        let err = load_mask_image("does/not/exist.png", DEFAULT_MARKER).unwrap_err();
        assert!(matches!(err, MapError::Image { .. }));
        assert!(err.to_string().contains("does/not/exist.png"));
    }
}
