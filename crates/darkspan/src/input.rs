//! Parsing of point arguments and click lines.

use darkspan_core::Point;

/// Parse `"X,Y"` or `"X Y"` into a [`Point`].
///
/// # Errors
///
/// Returns a message naming the offending text if there are not exactly
/// two finite numbers.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let mut parts = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());

    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected two coordinates \"X,Y\", got {s:?}"));
    };

    let x = parse_coordinate(x)?;
    let y = parse_coordinate(y)?;
    Ok(Point::new(x, y))
}

fn parse_coordinate(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|e| format!("invalid coordinate {s:?}: {e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("coordinate {s:?} is not finite"))
    }
}

/// Parse one line of click input.
///
/// Blank lines and lines starting with `#` are skipped (`None`).
pub fn parse_click_line(line: &str) -> Option<Result<Point, String>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(parse_point(trimmed))
}
