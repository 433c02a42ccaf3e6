// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

mod test_geo_math;
mod test_poly_util;
mod test_polyline;
