use std::ops::Deref;

use crate::gfx::GraphicsContext;

use super::{AtlasQuad, QuadError};

/// Glyph cell backed by a character atlas.
///
/// The atlas is laid out in code-point order starting at `first_char`
/// (printable ASCII from `' '` by default), so glyph `c` lives in tile
/// `c - first_char`. Shows tile 0 on construction.
pub struct TextTerminal<C: GraphicsContext> {
    atlas: AtlasQuad<C>,
    first_char: char,
}

impl<C: GraphicsContext> TextTerminal<C> {
    pub const DEFAULT_FIRST_CHAR: char = ' ';

    pub fn new(ctx: &mut C, columns: u32, rows: u32) -> Result<Self, QuadError> {
        Self::with_first_char(ctx, columns, rows, Self::DEFAULT_FIRST_CHAR)
    }

    pub fn with_first_char(
        ctx: &mut C,
        columns: u32,
        rows: u32,
        first_char: char,
    ) -> Result<Self, QuadError> {
        let mut atlas = AtlasQuad::new(ctx, columns, rows)?;
        atlas.set_tile_uvs(ctx, 0)?;
        Ok(Self { atlas, first_char })
    }

    /// Tile index holding `ch`, if the atlas has one.
    pub fn tile_for(&self, ch: char) -> Option<u32> {
        let index = (ch as u32).checked_sub(self.first_char as u32)?;
        (u64::from(index) < self.atlas.grid().tile_count()).then_some(index)
    }

    pub fn show_tile(&mut self, ctx: &mut C, index: u32) -> Result<(), QuadError> {
        self.atlas.set_tile_uvs(ctx, index)
    }

    pub fn show_char(&mut self, ctx: &mut C, ch: char) -> Result<(), QuadError> {
        let index = self.tile_for(ch).ok_or(QuadError::UnmappedChar { ch })?;
        self.atlas.set_tile_uvs(ctx, index)
    }
}

impl<C: GraphicsContext> Deref for TextTerminal<C> {
    type Target = AtlasQuad<C>;

    fn deref(&self) -> &AtlasQuad<C> {
        &self.atlas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::RecordingContext;

    fn terminal(ctx: &mut RecordingContext) -> TextTerminal<RecordingContext> {
        // 16x6 covers ' '..='\u{7f}'.
        TextTerminal::new(ctx, 16, 6).unwrap()
    }

    #[test]
    fn starts_on_first_tile() {
        let mut ctx = RecordingContext::new();
        let term = terminal(&mut ctx);
        assert_eq!(term.current_tile(), Some(0));
        let (tw, th) = term.grid().tile_size();
        assert_eq!(term.uvs(), &[0.0, 0.0, tw, 0.0, tw, th, 0.0, th]);
    }

    #[test]
    fn chars_map_from_first_char() {
        let mut ctx = RecordingContext::new();
        let term = terminal(&mut ctx);
        assert_eq!(term.tile_for(' '), Some(0));
        assert_eq!(term.tile_for('A'), Some(33));
        assert_eq!(term.tile_for('~'), Some(94));
        assert_eq!(term.tile_for('\n'), None);
        assert_eq!(term.tile_for('é'), None);
    }

    #[test]
    fn show_char_selects_matching_tile() {
        let mut ctx = RecordingContext::new();
        let mut term = terminal(&mut ctx);
        term.show_char(&mut ctx, 'A').unwrap();
        assert_eq!(term.current_tile(), Some(33));

        let err = term.show_char(&mut ctx, '\t').unwrap_err();
        assert!(matches!(err, QuadError::UnmappedChar { ch: '\t' }));
        assert_eq!(term.current_tile(), Some(33));
    }

    #[test]
    fn custom_first_char() {
        let mut ctx = RecordingContext::new();
        let mut term = TextTerminal::with_first_char(&mut ctx, 4, 4, '0').unwrap();
        term.show_char(&mut ctx, '9').unwrap();
        assert_eq!(term.current_tile(), Some(9));
        assert!(term.show_tile(&mut ctx, 16).is_err());
    }
}
