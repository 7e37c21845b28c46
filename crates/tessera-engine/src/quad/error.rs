use thiserror::Error;

use crate::gfx::GfxError;

#[derive(Debug, Error)]
pub enum QuadError {
    /// Construction aborted; the source carries the backend diagnostic log.
    #[error("quad shader program could not be built")]
    ShaderBuild(#[from] GfxError),

    #[error("atlas grid needs at least one column and one row (got {columns}x{rows})")]
    EmptyGrid { columns: u32, rows: u32 },

    #[error("tile {index} is outside the {columns}x{rows} atlas")]
    TileOutOfRange { index: u32, columns: u32, rows: u32 },

    #[error("character {ch:?} has no tile in this atlas")]
    UnmappedChar { ch: char },
}
