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
use odin_traffic::sample::{
    FlightSample, Lights, DEFAULT_MASS_KG, G_EARTH, baro_corrected_alt_ft, ft_per_hpa, ft_to_m, m_to_ft, normalize_timestamp
};

/// tests for the canonical sample and its unit/time conversions
/// run with "cargo test --test test_sample -- --nocapture"

fn t0 ()->DateTime<Utc> { DateTime::from_timestamp( 1_700_000_000, 0).unwrap() }

#[test]
fn test_normalize_timestamp () {
    let now = t0();

    println!("-- absent or NaN means now");
    assert_eq!( normalize_timestamp( None, now), now);
    assert_eq!( normalize_timestamp( Some(f64::NAN), now), now);

    println!("-- absolute epoch seconds");
    let ts = normalize_timestamp( Some(1_645_144_774.2), now);
    assert_eq!( ts.timestamp_millis(), 1_645_144_774_200);

    println!("-- epoch milliseconds");
    let ts = normalize_timestamp( Some(1_645_144_774_250.0), now);
    assert_eq!( ts.timestamp_millis(), 1_645_144_774_250);

    println!("-- relative seconds");
    assert_eq!( normalize_timestamp( Some(-2.5), now), now - TimeDelta::milliseconds(2500));
    assert_eq!( normalize_timestamp( Some(5.0), now), now + TimeDelta::seconds(5));

    println!("-- threshold itself is absolute");
    let ts = normalize_timestamp( Some(1_546_300_800.0), now);
    assert_eq!( ts.timestamp(), 1_546_300_800);

    println!("-- infinite or out of range means now");
    for raw in [1e20, -1e20, 1e300, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!( normalize_timestamp( Some(raw), now), now, "raw timestamp {raw}");
    }
}

#[test]
fn test_usability () {
    let mut s = FlightSample::new( 0xA1B2C3, t0());
    assert!( !s.is_usable());

    s.latitude = Some(51.0);
    assert!( !s.is_usable(), "only latitude set");

    s.longitude = Some(7.0);
    assert!( !s.is_usable(), "no altitude and not on ground");

    s.on_ground = true;
    assert!( s.is_usable(), "on ground does not need altitude");

    s.on_ground = false;
    s.altitude = Some(300.0);
    assert!( s.is_usable());

    s.latitude = Some(f64::NAN);
    assert!( !s.is_usable(), "NaN is unset");
    s.latitude = Some(51.0);
    s.altitude = Some(f64::INFINITY);
    assert!( !s.is_usable(), "infinite altitude");
    s.altitude = Some(300.0);

    s.id = 0;
    assert!( !s.is_usable(), "id 0 is never valid");
    println!("usability gate Ok");
}

#[test]
fn test_carry_forward () {
    let mut older = FlightSample::new( 1, t0());
    older.call_sign = Some("AAL72".to_string());
    older.heading = Some(90.0);
    older.config.gear = Some(1.0);
    older.wake.mass_kg = Some(70_000.0);
    older.wake.lift = Some(700_000.0);
    older.lights = Some( Lights{ beacon: true, ..Lights::default() });

    let mut newer = FlightSample::new( 1, t0() + TimeDelta::seconds(1));
    newer.heading = Some(95.0);
    newer.carry_forward_from( &older);

    println!("carried forward: {newer}");
    assert_eq!( newer.call_sign.as_deref(), Some("AAL72"));
    assert_eq!( newer.heading, Some(95.0));
    assert_eq!( newer.config.gear, Some(1.0));
    assert_eq!( newer.wake.mass_kg, Some(70_000.0));
    assert_eq!( newer.wake.lift, None);
    assert_eq!( newer.lights, older.lights);
}

#[test]
fn test_fill_defaults () {
    let mut s = FlightSample::new( 1, t0());
    s.on_ground = true;
    s.fill_defaults();

    assert_eq!( s.altitude, Some(0.0));
    assert_eq!( s.heading, Some(0.0));
    assert_eq!( s.config.gear, Some(1.0));
    assert_eq!( s.config.flaps, Some(0.0));
    assert_eq!( s.wake.mass_kg, Some(DEFAULT_MASS_KG));
    assert_eq!( s.wake.lift, None);
    assert!( s.lights.is_none());

    let lift = s.wake.default_lift();
    assert!( (lift as f64 - DEFAULT_MASS_KG as f64 * G_EARTH).abs() < 1.0);
}

#[test]
fn test_baro_correction () {
    println!("ft per hPa: {}", ft_per_hpa());
    assert!( (ft_per_hpa() - 29.034).abs() < 0.01);

    assert_eq!( baro_corrected_alt_ft( 5000.0, None), 5000.0);
    assert!( (baro_corrected_alt_ft( 5000.0, Some(1013.25)) - 5000.0).abs() < 1e-9);

    let alt = baro_corrected_alt_ft( 5000.0, Some(1023.25));
    assert!( (alt - (5000.0 + 10.0 * ft_per_hpa())).abs() < 1e-9);
    assert!( baro_corrected_alt_ft( 5000.0, Some(1003.25)) < 5000.0);

    assert!( (ft_to_m(1000.0) - 304.8).abs() < 1e-9);
    assert!( (m_to_ft( ft_to_m(1234.0)) - 1234.0).abs() < 1e-9);
}
