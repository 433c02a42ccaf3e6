// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use thiserror::Error;

/// Errors produced by the geometry functions.
///
/// Not finding a match within tolerance is never an error; those functions
/// return `None` instead.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("malformed polyline at byte {position}: {reason}")]
    MalformedInput {
        position: usize,
        reason: &'static str,
    },
}

pub type GeometryResult<T> = Result<T, GeometryError>;
