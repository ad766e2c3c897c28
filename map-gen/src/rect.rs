use nalgebra as na;

use rrt::{Rectangle, RectangleSet};

use crate::error::{MapError, Result};

const HEADER: &str = "<number of rectangles>";

/// The rectangle drawn by pressing the mouse at `press` and releasing it at `release`.
pub fn rect_from_drag(press: (i32, i32), release: (i32, i32)) -> Rectangle {
    Rectangle::from_corners(
        na::Point2::new(press.0 as f32, press.1 as f32),
        na::Point2::new(release.0 as f32, release.1 as f32),
    )
}

/// Parses a rectangle list:
///
/// ```text
/// <number of rectangles>
/// 2
/// 10,10,50,50
/// 70,10,50,50
/// ```
///
/// Each line after the count is `x,y,width,height`. Negative sizes are read as a drag towards the
/// origin and normalized.
pub fn parse_rectangles(s: &str) -> Result<RectangleSet> {
    let mut lines = s.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

    match lines.next() {
        Some((_, HEADER)) => {}
        Some((line, other)) => return Err(MapError::parse(line, format!("expected {:?}, found {:?}", HEADER, other))),
        None => return Err(MapError::parse(1, "empty rectangle list")),
    }

    let (count_line, count) = lines.next().ok_or_else(|| MapError::parse(2, "missing rectangle count"))?;
    let n_rects: usize = count
        .parse()
        .map_err(|_| MapError::parse(count_line, format!("invalid rectangle count {:?}", count)))?;

    let mut rects = Vec::with_capacity(n_rects);
    for _ in 0..n_rects {
        let (line, text) = lines
            .next()
            .ok_or_else(|| MapError::parse(count_line + rects.len() + 1, "missing rectangle"))?;

        let coords: Vec<f32> = text
            .split(',')
            .map(|c| c.trim().parse::<f32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| MapError::parse(line, format!("invalid number: {}", e)))?;

        if coords.len() != 4 {
            return Err(MapError::parse(line, format!("expected 4 values, found {}", coords.len())));
        }

        let corner = na::Point2::new(coords[0], coords[1]);
        rects.push(Rectangle::from_corners(corner, corner + na::Vector2::new(coords[2], coords[3])));
    }

    if let Some((line, extra)) = lines.find(|(_, l)| !l.is_empty()) {
        return Err(MapError::parse(line, format!("unexpected trailing line {:?}", extra)));
    }

    Ok(RectangleSet::new(rects))
}

/// Writes `rects` in the format read by [`parse_rectangles`].
pub fn write_rectangles(rects: &RectangleSet) -> String {
    let mut out = format!("{}\n{}\n", HEADER, rects.len());
    for r in rects.rects() {
        out.push_str(&format!("{},{},{},{}\n", r.corner.x, r.corner.y, r.size.x, r.size.y));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rectangle {
        Rectangle::new(na::Point2::new(x, y), na::Vector2::new(w, h))
    }

    #[test]
    fn drag_in_any_direction_gives_the_same_rectangle() {
        let expected = rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect_from_drag((10, 20), (40, 60)), expected);
        assert_eq!(rect_from_drag((40, 60), (10, 20)), expected);
        assert_eq!(rect_from_drag((40, 20), (10, 60)), expected);
    }

    #[test]
    fn test_parsing() {
        let input = "<number of rectangles>
3
10,10,50,50
70, 10, 50, 50
130,60,-20,-30
";

        let rects = parse_rectangles(input).unwrap();
        assert_eq!(
            rects.rects(),
            &[
                rect(10.0, 10.0, 50.0, 50.0),
                rect(70.0, 10.0, 50.0, 50.0),
                rect(110.0, 30.0, 20.0, 30.0),
            ]
        );
    }

    #[test]
    fn write_rectangles_output() {
        let rects = RectangleSet::new(vec![rect(10.0, 10.0, 50.0, 50.0), rect(1.5, 0.0, 2.0, 3.25)]);
        assert_eq!(
            write_rectangles(&rects),
            "<number of rectangles>\n2\n10,10,50,50\n1.5,0,2,3.25\n"
        );
        assert_eq!(write_rectangles(&RectangleSet::default()), "<number of rectangles>\n0\n");
    }

    #[test]
    fn written_lists_parse_back() {
        let rects = RectangleSet::new(vec![rect(1.5, 2.0, 3.0, 4.25), rect(0.0, 0.0, 800.0, 1.0)]);
        assert_eq!(parse_rectangles(&write_rectangles(&rects)).unwrap(), rects);
    }

    #[test]
    fn malformed_lists_report_the_line() {
        let bad_header = parse_rectangles("<number of polygons>\n0\n").unwrap_err();
        assert!(matches!(bad_header, MapError::Parse { line: 1, .. }));

        let bad_count = parse_rectangles("<number of rectangles>\nmany\n").unwrap_err();
        assert!(matches!(bad_count, MapError::Parse { line: 2, .. }));

        let short = parse_rectangles("<number of rectangles>\n2\n1,2,3,4\n").unwrap_err();
        assert!(matches!(short, MapError::Parse { line: 4, .. }));

        let wrong_arity = parse_rectangles("<number of rectangles>\n1\n1,2,3\n").unwrap_err();
        assert!(matches!(wrong_arity, MapError::Parse { line: 3, .. }));

        let not_a_number = parse_rectangles("<number of rectangles>\n1\n1,2,x,4\n").unwrap_err();
        assert!(matches!(not_a_number, MapError::Parse { line: 3, .. }));

        let trailing = parse_rectangles("<number of rectangles>\n0\n1,2,3,4\n").unwrap_err();
        assert!(matches!(trailing, MapError::Parse { line: 3, .. }));
    }
}
