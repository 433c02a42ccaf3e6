// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Spherical geometry used by the route tracker.

pub mod error;
pub mod geo_math;
pub mod poly_util;
pub mod polyline;
pub mod projector;

pub use error::{GeometryError, GeometryResult};

#[cfg(test)]
mod tests;
