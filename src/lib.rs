//! Planar similarity transforms.
//!
//! A [`Sim2`] maps points between two 2D coordinate frames through a
//! rotation, a translation and a uniform scaling. Transforms can be
//! composed, inverted, applied to batches of points, converted to and
//! from their 3x3 homogeneous matrix form and persisted as flat JSON
//! objects.

pub mod io;

mod sim2;

pub use sim2::Sim2;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Sim2Error>;

#[derive(Error, Debug)]
pub enum Sim2Error {
    #[error("similarity scale factor of zero would require division by zero")]
    ZeroScale,

    #[error("expected points in N x 2 layout, got {nrows} x {ncols}")]
    InvalidPointLayout { nrows: usize, ncols: usize },

    #[error("failed to read transform file {}", path.display())]
    FileReading {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write transform file {}", path.display())]
    FileWriting {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid transform JSON in {}", path.display())]
    JsonParsing {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize transform to JSON")]
    JsonSerialization { source: serde_json::Error },
}
