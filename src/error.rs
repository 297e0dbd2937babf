//! Error types for the overlay library.

use thiserror::Error;

use crate::{body::BodyPart, Point2D};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    #[error("Degenerate reference segment: wrist {wrist:?} and ankle {ankle:?} coincide")]
    DegenerateSegment { wrist: Point2D, ankle: Point2D },

    #[error("Missing key point: {0}")]
    MissingKeyPoint(BodyPart),

    #[error("Invalid colour \"{0}\", expected a hex string such as \"#ff0000\"")]
    InvalidColour(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
