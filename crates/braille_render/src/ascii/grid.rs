/// Row-major grid of ramp indices, one per output character cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphIndexGrid {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<usize>,
}

impl GlyphIndexGrid {
    pub fn new(width: u32, height: u32, indices: Vec<usize>) -> Self {
        assert_eq!(width as usize * height as usize, indices.len());
        Self { width, height, indices }
    }

    pub fn get(&self, x: u32, y: u32) -> usize {
        self.indices[y as usize * self.width as usize + x as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.indices.chunks(self.width.max(1) as usize)
    }

    /// Number of distinct indices in use.
    pub fn distinct(&self) -> usize {
        let mut seen: Vec<usize> = self.indices.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}
