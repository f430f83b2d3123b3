//! Glyph lookup for [`Max7219::draw_string`](crate::Max7219::draw_string).
//!
//! A glyph is eight row bytes, top row first. The most significant bit of each
//! row is the leftmost column.

/// An 8x8 glyph, one byte per row.
pub type Glyph = [u8; 8];

/// Maps characters to glyphs.
pub trait GlyphSource {
    /// The glyph for `c`, or `None` if the character has no glyph.
    fn glyph(&self, c: char) -> Option<Glyph>;
}

impl<F> GlyphSource for F
where
    F: Fn(char) -> Option<Glyph>,
{
    fn glyph(&self, c: char) -> Option<Glyph> {
        self(c)
    }
}

/// A table of `(character, glyph)` pairs, searched front to back.
impl GlyphSource for [(char, Glyph)] {
    fn glyph(&self, c: char) -> Option<Glyph> {
        self.iter()
            .find(|(character, _)| *character == c)
            .map(|(_, glyph)| *glyph)
    }
}
