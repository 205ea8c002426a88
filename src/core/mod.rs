//! Core simulation – materials, the grid, the tick algorithm and the renderer
//! contract the front-end drives.
//!
//! Nothing in this module depends on the terminal UI.

pub mod direction;
pub mod material;
pub mod particle;
pub mod renderer;
pub mod scene;
pub mod simulation;
pub mod universe;

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the renderer contract.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: isize,
        y: isize,
        width: usize,
        height: usize,
    },

    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("failed to write snapshot to {path}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
