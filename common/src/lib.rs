// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Data model for route following
//!
//! Provides the data types that are shared by the geometry engine, the
//! route tracker and the routing module.

pub mod position;
pub mod route;
pub mod serde;
pub mod test_helper;
