use log::debug;

const DEGREE_MARKER: char = '度';

/// Parses the detail page's latitude/longitude text into decimal
/// `(longitude, latitude)`.
///
/// The portal renders both angles at fixed character positions, e.g.
/// `北緯 36度13分00秒 東経 139度11分00秒`. Text without a degree marker means
/// the station publishes no location and yields `None`, as does text whose
/// digits are not where they are expected.
///
/// # Examples
///
/// ```
/// use wis_scraper::parse_coordinates;
///
/// let (lon, lat) = parse_coordinates("北緯 36度15分00秒 東経 139度30分36秒").unwrap();
/// assert!((lat - 36.25).abs() < 1e-9);
/// assert!((lon - 139.51).abs() < 1e-9);
///
/// assert_eq!(parse_coordinates("-"), None);
/// ```
pub fn parse_coordinates(text: &str) -> Option<(f64, f64)> {
    if !text.contains(DEGREE_MARKER) {
        return None;
    }
    let chars: Vec<char> = text.chars().collect();
    let parsed = angle(&chars, (3, 5), (6, 8), (9, 11))
        .zip(angle(&chars, (16, 19), (20, 22), (23, 25)))
        .map(|(lat, lon)| (lon, lat));
    if parsed.is_none() {
        debug!("Unrecognized coordinate layout: {:?}", text);
    }
    parsed
}

type Span = (usize, usize);

fn angle(chars: &[char], degrees: Span, minutes: Span, seconds: Span) -> Option<f64> {
    Some(field(chars, degrees)? + field(chars, minutes)? / 60.0 + field(chars, seconds)? / 3600.0)
}

fn field(chars: &[char], (start, end): Span) -> Option<f64> {
    let digits: String = chars.get(start..end)?.iter().collect();
    digits.trim().parse().ok()
}
