/// Glyph Letterboxd uses for one full star
pub const FULL_STAR: char = '★';

/// Glyph Letterboxd uses for half a star
pub const HALF_STAR: char = '½';

/// Converts a star-glyph rating (e.g. "★★★½") to a numeric value on the 0-5 scale.
///
/// Each full star counts 1.0 and a half-star glyph anywhere in the string adds 0.5.
/// Other characters are ignored, so malformed input degrades to whatever glyphs are present.
/// Empty or missing input means the film was logged without a rating.
pub fn parse_star_rating(raw: Option<&str>) -> Option<f32> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    let mut rating = raw.chars().filter(|c| *c == FULL_STAR).count() as f32;
    if raw.contains(HALF_STAR) {
        rating += 0.5;
    }

    Some(rating)
}
