use super::{grid::GlyphIndexGrid, ramp::CharacterRamp};

/// Turns a quantized index grid into text using a ramp.
pub struct GlyphMapper {
    ramp: CharacterRamp,
}

impl GlyphMapper {
    pub fn new(ramp: CharacterRamp) -> Self {
        Self { ramp }
    }

    pub fn rows<'a>(&'a self, grid: &'a GlyphIndexGrid) -> impl Iterator<Item = String> + 'a {
        grid.rows().map(move |row| row.iter().map(|&index| self.ramp.glyph(index)).collect())
    }

    /// Rows joined by `\n`, without a trailing newline.
    pub fn render_text(&self, grid: &GlyphIndexGrid) -> String {
        self.rows(grid).collect::<Vec<_>>().join("\n")
    }
}
