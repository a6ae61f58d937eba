/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! the stateless functions that turn two bracketing samples and a query time into draw values.
//! A factor `f` of 0 means "at `from`", 1 means "at `to`" and values above 1 extrapolate

use chrono::{DateTime,Utc};
use crate::sample::{Lights,Wake};

/// the nose wheel can't turn further than this [deg]
pub const MAX_NOSE_WHEEL_ANGLE: f32 = 90.0;

/// relative position of `now` within [from_ts,to_ts]. Degenerate segments count as already reached
pub fn factor (now: DateTime<Utc>, from_ts: DateTime<Utc>, to_ts: DateTime<Utc>)->f64 {
    let span = (to_ts - from_ts).num_microseconds().unwrap_or(i64::MAX);
    if span <= 0 { return 1.0 }

    let dt = (now - from_ts).num_microseconds().unwrap_or(i64::MAX);
    dt as f64 / span as f64
}

#[inline]
pub fn lerp (a: f64, b: f64, f: f64)->f64 {
    a + (b - a) * f
}

#[inline]
pub fn lerp_f32 (a: f32, b: f32, f: f64)->f32 {
    (a as f64 + (b as f64 - a as f64) * f) as f32
}

/// interpolate along the shorter arc, result in [0,360)
pub fn interpolate_heading (from: f32, to: f32, f: f64)->f32 {
    let diff = signed_arc( to as f64 - from as f64);
    let hdg = (from as f64 + diff * f).rem_euclid( 360.0);
    if hdg >= 360.0 { 0.0 } else { hdg as f32 } // rem_euclid can round up for tiny negative values
}

/// same as heading but for (-180,180] longitudes so that we don't go around the globe at the antimeridian
pub fn interpolate_longitude (from: f64, to: f64, f: f64)->f64 {
    let diff = signed_arc( to - from);
    signed_arc( from + diff * f)
}

/// map an angle [deg] into (-180,180]
#[inline]
fn signed_arc (deg: f64)->f64 {
    let a = deg.rem_euclid( 360.0);
    if a > 180.0 { a - 360.0 } else { a }
}

/// a unit interval ratio (gear, flaps, spoilers). If there is no target value we keep what we have,
/// if there is no start value we jump to the target
pub fn interpolate_ratio (from: Option<f32>, to: Option<f32>, f: f64, current: f32)->f32 {
    interpolate_clamped( from, to, f, current, 0.0, 1.0)
}

pub fn interpolate_nose_wheel (from: Option<f32>, to: Option<f32>, f: f64, current: f32)->f32 {
    interpolate_clamped( from, to, f, current, -MAX_NOSE_WHEEL_ANGLE, MAX_NOSE_WHEEL_ANGLE)
}

fn interpolate_clamped (from: Option<f32>, to: Option<f32>, f: f64, current: f32, min: f32, max: f32)->f32 {
    match (from, to) {
        (_, None) => current,
        (None, Some(b)) => b.clamp( min, max),
        (Some(a), Some(b)) => lerp_f32( a, b, f).clamp( min, max),
    }
}

/// lights don't fade, they switch at the segment midpoint. `None` means the chosen endpoint did not report any,
/// in which case the caller keeps its current lights
pub fn snap_lights (from: Option<Lights>, to: Option<Lights>, f: f64)->Option<Lights> {
    if f >= 0.5 { to } else { from }
}

/// lift [N]. Reported values are interpolated, unreported ones are replaced by the physical default of the
/// respective endpoint
pub fn interpolate_lift (from: &Wake, to: &Wake, f: f64)->f32 {
    let a = from.lift.unwrap_or_else( || from.default_lift());
    let b = to.lift.unwrap_or_else( || to.default_lift());
    lerp_f32( a, b, f)
}
