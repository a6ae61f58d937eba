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

use std::fmt;
use chrono::{DateTime,TimeDelta,Utc};
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::{foot,meter}};

/// the stable key of a tracked object (usually the 24bit mode S transponder code)
pub type ObjectId = u32;

/// 2019-01-01T00:00:00Z - raw timestamps at or above this are absolute epoch seconds, below are relative offsets
pub const EPOCH_SECS_THRESHOLD: f64 = 1_546_300_800.0;

/// raw timestamps at or above this are epoch milliseconds
pub const EPOCH_MILLIS_THRESHOLD: f64 = EPOCH_SECS_THRESHOLD * 1000.0;

/// standard atmosphere pressure at sea level [hPa]
pub const HPA_STANDARD: f64 = 1013.25;

/// pressure drop per meter within the first 1000m above sea level [Pa/m]
pub const PA_PER_M: f64 = 11.3;

/// standard gravity [m/s²]
pub const G_EARTH: f64 = 9.80665;

// wake defaults for objects that never report their own (roughly a medium category airliner)
pub const DEFAULT_WING_SPAN_M: f32 = 34.1;
pub const DEFAULT_WING_AREA_M2: f32 = 122.6;
pub const DEFAULT_MASS_KG: f32 = 60_000.0;

/// the five aircraft lights. A sample without reported lights has `lights: None`, which is different from
/// "all lights reported off"
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq,Serialize,Deserialize)]
pub struct Lights {
    pub taxi: bool,
    pub landing: bool,
    pub beacon: bool,
    pub strobe: bool,
    pub nav: bool,
}

/// wake turbulence parameters
#[derive(Debug,Clone,Copy,Default,PartialEq,Serialize,Deserialize)]
pub struct Wake {
    pub wing_span_m: Option<f32>,
    pub wing_area_m2: Option<f32>,
    pub mass_kg: Option<f32>,
    pub lift: Option<f32>, // [N]
}

impl Wake {
    /// lift of an object in level flight if telemetry does not tell us otherwise
    pub fn default_lift (&self)->f32 {
        (self.mass_kg.unwrap_or(DEFAULT_MASS_KG) as f64 * G_EARTH) as f32
    }
}

/// gear, nose wheel, flaps and spoilers. Ratios are in [0..1], the nose wheel angle is in degrees (negative is left)
#[derive(Debug,Clone,Copy,Default,PartialEq,Serialize,Deserialize)]
pub struct AircraftConfig {
    pub gear: Option<f32>,
    pub nose_wheel: Option<f32>,
    pub flaps: Option<f32>,
    pub spoilers: Option<f32>,
}

/// the canonical, format independent telemetry record for one object at one instant.
/// This is what every format adapter produces
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct FlightSample {
    pub id: ObjectId,

    pub icao_type: Option<String>,
    pub icao_airline: Option<String>,
    pub livery: Option<String>,
    pub call_sign: Option<String>,
    pub label: Option<String>,

    pub timestamp: DateTime<Utc>,

    pub latitude: Option<f64>,  // degrees
    pub longitude: Option<f64>, // degrees
    pub altitude: Option<f64>,  // meters
    pub on_ground: bool,

    pub pitch: Option<f32>,
    pub heading: Option<f32>,
    pub roll: Option<f32>,

    pub wake: Wake,
    pub config: AircraftConfig,
    pub lights: Option<Lights>,
}

impl FlightSample {
    pub fn new (id: ObjectId, timestamp: DateTime<Utc>)->Self {
        FlightSample {
            id,
            icao_type: None,
            icao_airline: None,
            livery: None,
            call_sign: None,
            label: None,
            timestamp,
            latitude: None,
            longitude: None,
            altitude: None,
            on_ground: false,
            pitch: None,
            heading: None,
            roll: None,
            wake: Wake::default(),
            config: AircraftConfig::default(),
            lights: None,
        }
    }

    /// a sample is usable if we know which object it is, where it is and how high it is (or that it is on the ground)
    pub fn is_usable (&self)->bool {
        self.id != 0
        && self.latitude.is_some_and( f64::is_finite)
        && self.longitude.is_some_and( f64::is_finite)
        && (self.altitude.is_some_and( f64::is_finite) || self.on_ground)
    }

    /// fill all still unset fields of the receiver from an older sample of the same object.
    /// Lift is the exception - if the feed does not report it we want the physical default and not a stale value
    pub fn carry_forward_from (&mut self, older: &FlightSample) {
        fn inherit<T: Clone> (field: &mut Option<T>, older: &Option<T>) {
            if field.is_none() { *field = older.clone() }
        }

        inherit( &mut self.icao_type, &older.icao_type);
        inherit( &mut self.icao_airline, &older.icao_airline);
        inherit( &mut self.livery, &older.livery);
        inherit( &mut self.call_sign, &older.call_sign);
        inherit( &mut self.label, &older.label);

        inherit( &mut self.latitude, &older.latitude);
        inherit( &mut self.longitude, &older.longitude);
        inherit( &mut self.altitude, &older.altitude);

        inherit( &mut self.pitch, &older.pitch);
        inherit( &mut self.heading, &older.heading);
        inherit( &mut self.roll, &older.roll);

        inherit( &mut self.wake.wing_span_m, &older.wake.wing_span_m);
        inherit( &mut self.wake.wing_area_m2, &older.wake.wing_area_m2);
        inherit( &mut self.wake.mass_kg, &older.wake.mass_kg);

        inherit( &mut self.config.gear, &older.config.gear);
        inherit( &mut self.config.nose_wheel, &older.config.nose_wheel);
        inherit( &mut self.config.flaps, &older.config.flaps);
        inherit( &mut self.config.spoilers, &older.config.spoilers);

        inherit( &mut self.lights, &older.lights);
    }

    /// resolve every unset interpolation input to its default (lift stays optional).
    /// Applied to the oldest sample of a new track
    pub fn fill_defaults (&mut self) {
        self.altitude.get_or_insert(0.0);

        self.pitch.get_or_insert(0.0);
        self.heading.get_or_insert(0.0);
        self.roll.get_or_insert(0.0);

        self.wake.wing_span_m.get_or_insert(DEFAULT_WING_SPAN_M);
        self.wake.wing_area_m2.get_or_insert(DEFAULT_WING_AREA_M2);
        self.wake.mass_kg.get_or_insert(DEFAULT_MASS_KG);

        self.config.gear.get_or_insert( if self.on_ground { 1.0 } else { 0.0 });
        self.config.nose_wheel.get_or_insert(0.0);
        self.config.flaps.get_or_insert(0.0);
        self.config.spoilers.get_or_insert(0.0);
    }

    /// shift the timestamp, e.g. to absorb network delay
    pub fn delay_by (&mut self, dt: TimeDelta) {
        if let Some(ts) = self.timestamp.checked_add_signed(dt) {
            self.timestamp = ts;
        }
    }
}

impl fmt::Display for FlightSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "FlightSample( id: {:06X}, ts: {}", self.id, self.timestamp.format("%H:%M:%S%.3f"))?;
        if let Some(cs) = &self.call_sign { write!( f, ", cs: \"{cs}\"")?; }
        if let (Some(lat),Some(lon)) = (self.latitude,self.longitude) { write!( f, ", pos: {lat:.5},{lon:.5}")?; }
        if let Some(alt) = self.altitude { write!( f, ", alt: {alt:.0}m")?; }
        if self.on_ground { write!( f, ", gnd")?; }
        if let Some(hdg) = self.heading { write!( f, ", hdg: {hdg:.0}")?; }
        write!( f, ")")
    }
}

/// turn a raw numeric feed timestamp into an absolute point in time:
///   - absent, NaN, infinite or out of range: now
///   - >= EPOCH_MILLIS_THRESHOLD: epoch milliseconds (scaled to seconds, then treated as absolute)
///   - >= EPOCH_SECS_THRESHOLD: absolute epoch seconds
///   - otherwise: offset in seconds relative to now
pub fn normalize_timestamp (raw: Option<f64>, now: DateTime<Utc>)->DateTime<Utc> {
    let mut ts = match raw {
        Some(ts) if ts.is_finite() => ts,
        _ => return now
    };

    if ts >= EPOCH_MILLIS_THRESHOLD {
        ts /= 1000.0;
    }

    if ts >= EPOCH_SECS_THRESHOLD {
        let secs = ts.trunc();
        let millis = ((ts - secs) * 1000.0).round() as i64;
        (secs as i64).checked_mul(1000)
            .and_then( |ms| ms.checked_add( millis))
            .and_then( DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or(now)

    } else {
        TimeDelta::try_milliseconds( (ts * 1000.0).round() as i64)
            .and_then( |dt| now.checked_add_signed(dt))
            .unwrap_or(now)
    }
}

/// feet of altitude change per hPa of pressure change (valid for the first few thousand feet)
pub fn ft_per_hpa ()->f64 {
    Length::new::<meter>( 100.0 / PA_PER_M).get::<foot>()
}

/// approximate geometric altitude [ft] from pressure altitude [ft] and local QNH [hPa].
/// Without QNH we have to assume standard pressure, i.e. return the pressure altitude as is
pub fn baro_corrected_alt_ft (pressure_alt_ft: f64, qnh: Option<f64>)->f64 {
    match qnh {
        Some(hpa) => pressure_alt_ft + (hpa - HPA_STANDARD) * ft_per_hpa(),
        None => pressure_alt_ft
    }
}

#[inline]
pub fn ft_to_m (ft: f64)->f64 { Length::new::<foot>(ft).get::<meter>() }

#[inline]
pub fn m_to_ft (m: f64)->f64 { Length::new::<meter>(m).get::<foot>() }
