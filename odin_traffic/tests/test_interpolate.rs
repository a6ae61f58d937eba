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
#![allow(unused)]

use chrono::{DateTime,TimeDelta,Utc};
use odin_traffic::{
    interpolate::*,
    sample::{Lights, Wake, G_EARTH, DEFAULT_MASS_KG},
};

/// tests for the stateless interpolation functions
/// run with "cargo test --test test_interpolate -- --nocapture"

fn t0 ()->DateTime<Utc> { DateTime::from_timestamp( 1_700_000_000, 0).unwrap() }

fn approx (a: f64, b: f64)->bool { (a - b).abs() < 1e-6 }

#[test]
fn test_factor () {
    let from = t0();
    let to = t0() + TimeDelta::seconds(4);

    assert!( approx( factor( t0(), from, to), 0.0));
    assert!( approx( factor( t0() + TimeDelta::seconds(1), from, to), 0.25));
    assert!( approx( factor( t0() + TimeDelta::seconds(6), from, to), 1.5));
    assert!( approx( factor( t0() - TimeDelta::seconds(2), from, to), -0.5));
    assert!( approx( factor( t0(), from, from), 1.0), "degenerate segment");
}

#[test]
fn test_heading_wrap () {
    let h = interpolate_heading( 350.0, 10.0, 0.5);
    println!("350 -> 10 @0.5 = {h}");
    assert!( h.abs() < 1e-4 || (h - 360.0).abs() < 1e-4);

    let h = interpolate_heading( 10.0, 350.0, 0.5);
    println!("10 -> 350 @0.5 = {h}");
    assert!( h.abs() < 1e-4 || (h - 360.0).abs() < 1e-4);

    assert!( (interpolate_heading( 350.0, 10.0, 0.25) - 355.0).abs() < 1e-4);
    assert!( (interpolate_heading( 90.0, 180.0, 0.5) - 135.0).abs() < 1e-4);
    assert!( (interpolate_heading( 0.0, 10.0, 1.25) - 12.5).abs() < 1e-4);
}

#[test]
fn test_longitude_wrap () {
    let lon = interpolate_longitude( 179.0, -179.0, 0.5);
    println!("179 -> -179 @0.5 = {lon}");
    assert!( (lon.abs() - 180.0).abs() < 1e-9);

    assert!( approx( interpolate_longitude( 7.0, 7.01, 0.5), 7.005));
    assert!( approx( interpolate_longitude( -179.5, 179.5, 0.25), -179.75));
}

#[test]
fn test_ratios () {
    assert_eq!( interpolate_ratio( Some(0.0), Some(1.0), 0.5, 0.3), 0.5);
    assert_eq!( interpolate_ratio( Some(0.0), Some(1.0), 1.25, 0.3), 1.0, "clamped");
    assert_eq!( interpolate_ratio( Some(1.0), Some(0.0), 1.25, 0.3), 0.0, "clamped");
    assert_eq!( interpolate_ratio( Some(0.0), None, 0.5, 0.3), 0.3, "no target keeps current value");
    assert_eq!( interpolate_ratio( None, Some(0.8), 0.1, 0.3), 0.8, "no start jumps to target");

    assert_eq!( interpolate_nose_wheel( Some(0.0), Some(80.0), 1.25, 0.0), MAX_NOSE_WHEEL_ANGLE);
    assert_eq!( interpolate_nose_wheel( Some(-10.0), Some(10.0), 0.5, 0.0), 0.0);
}

#[test]
fn test_lights () {
    let on = Some( Lights{ taxi: true, landing: true, beacon: true, strobe: true, nav: true });
    let off = Some( Lights::default());

    assert_eq!( snap_lights( off, on, 0.49), off);
    assert_eq!( snap_lights( off, on, 0.5), on);
    assert_eq!( snap_lights( off, None, 0.7), None, "not reported");
}

#[test]
fn test_lift () {
    let reported = Wake{ lift: Some(1000.0), ..Wake::default() };
    let reported2 = Wake{ lift: Some(2000.0), ..Wake::default() };
    let heavy = Wake{ mass_kg: Some(100_000.0), ..Wake::default() };
    let unknown = Wake::default();

    assert!( (interpolate_lift( &reported, &reported2, 0.5) - 1500.0).abs() < 1e-3);

    // an endpoint that does not report lift contributes its physical default
    let heavy_reported = Wake{ lift: Some(500_000.0), ..Wake::default() };
    let lift = interpolate_lift( &heavy_reported, &heavy, 1.0) as f64;
    println!("reported -> default lift at f=1: {lift}");
    assert!( (lift - 100_000.0 * G_EARTH).abs() < 1.0);

    let lift = interpolate_lift( &heavy_reported, &heavy, 0.0) as f64;
    assert!( (lift - 500_000.0).abs() < 1.0);

    let lift = interpolate_lift( &heavy, &heavy_reported, 0.0) as f64;
    println!("default -> reported lift at f=0: {lift}");
    assert!( (lift - 100_000.0 * G_EARTH).abs() < 1.0);

    let lift = interpolate_lift( &heavy, &heavy_reported, 1.0) as f64;
    assert!( (lift - 500_000.0).abs() < 1.0);

    let lift = interpolate_lift( &unknown, &heavy, 1.0) as f64;
    println!("default lift for 100t: {lift}");
    assert!( (lift - 100_000.0 * G_EARTH).abs() < 1.0);

    let lift = interpolate_lift( &unknown, &unknown, 0.5) as f64;
    assert!( (lift - DEFAULT_MASS_KG as f64 * G_EARTH).abs() < 1.0);
}

#[test]
fn test_lerp () {
    assert!( approx( lerp( 51.0, 51.01, 0.5), 51.005));
    assert!( approx( lerp( 0.0, 1.0, 2.0), 2.0));
    assert!( (lerp_f32( 1.0, 3.0, 0.25) - 1.5).abs() < 1e-6);
}
