//! Deterministic face-ID generation and parsing (C7).

use faceindex_geom::{Dimensions, Rect};

/// Clamps `v` to `[0.0, 0.999999]` and formats its fractional part as a zero-padded 5-digit
/// decimal, truncating rather than rounding: `.99999|9` becomes `"99999"`, not `"00000"`.
fn format_fraction(v: f64) -> String {
    let clamped = v.clamp(0.0, 0.999_999);
    let scaled = clamped * 100_000.0;
    // Guard against float representation error nudging an intended exact boundary (e.g. 60000)
    // just under the integer, which would otherwise truncate one digit short.
    let digits = (scaled + 1e-9).floor() as u32;
    format!("{digits:05}")
}

/// Builds the stable face identifier for a detection's bounding box in source pixel coordinates.
///
/// `box_in_source` must be in source-pixel coordinates (not yet normalized), and `dims` is the
/// source image's dimensions; this function performs the normalization itself.
pub fn make_face_id(file_id: i64, box_in_source: Rect, dims: Dimensions) -> String {
    let (w, h) = (dims.width as f64, dims.height as f64);
    let x_min = format_fraction(box_in_source.x / w);
    let y_min = format_fraction(box_in_source.y / h);
    let x_max = format_fraction(box_in_source.x_max() / w);
    let y_max = format_fraction(box_in_source.y_max() / h);
    format!("{file_id}_{x_min}_{y_min}_{x_max}_{y_max}")
}

/// Recovers the file ID a face ID was generated from, parsing the prefix up to the first `_`.
///
/// Returns `None` (rather than propagating an error or terminating the process) if the prefix
/// isn't a valid integer, logging a warning since this indicates a malformed ID slipped through.
pub fn file_id_from_face_id(face_id: &str) -> Option<i64> {
    match face_id.split_once('_') {
        Some((prefix, _)) => match prefix.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("file_id_from_face_id: malformed prefix {prefix:?} in {face_id:?}");
                None
            }
        },
        None => {
            log::warn!("file_id_from_face_id: no '_' separator in {face_id:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_id_formatting() {
        let id = make_face_id(42, Rect::new(10.0, 20.0, 30.0, 40.0), Dimensions::new(100, 100));
        assert_eq!(id, "42_10000_20000_40000_60000");
    }

    #[test]
    fn s3_id_clamping() {
        let id = make_face_id(7, Rect::new(99.0, 0.0, 10.0, 50.0), Dimensions::new(100, 100));
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts[0], "7");
        assert_eq!(parts[3], "99999"); // xMax = (99+10)/100 = 1.09, clamps to 0.999999
    }

    #[test]
    fn matches_id_format_regex() {
        let id = make_face_id(123, Rect::new(1.0, 2.0, 3.0, 4.0), Dimensions::new(50, 50));
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 5);
        assert!(parts[0].chars().all(|c| c.is_ascii_digit()));
        for segment in &parts[1..] {
            assert_eq!(segment.len(), 5);
            assert!(segment.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn round_trips_file_id() {
        let dims = Dimensions::new(200, 150);
        let id = make_face_id(9001, Rect::new(5.0, 5.0, 40.0, 40.0), dims);
        assert_eq!(file_id_from_face_id(&id), Some(9001));
    }

    #[test]
    fn malformed_prefix_returns_none() {
        assert_eq!(file_id_from_face_id("not_a_number_here"), None);
        assert_eq!(file_id_from_face_id("no-separator"), None);
    }
}
