// SPDX-FileCopyrightText: 2025 Matthew Milner <matterhorn103@proton.me>
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Result alias for the fallible parts of the crate.
pub type Result<T> = std::result::Result<T, AffineError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AffineError {
    #[error("Failed to parse: {0}")]
    Parse(String),

    #[error("Noise symbol position {position} is out of range for a form with {size} symbols")]
    SymbolOutOfRange { position: usize, size: usize },
}
