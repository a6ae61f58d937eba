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

use std::{collections::VecDeque, fmt};
use chrono::{DateTime,TimeDelta,Utc};
use serde::{Serialize,Deserialize};
use tracing::{debug,trace};
use crate::{
    interpolate::{factor, interpolate_heading, interpolate_lift, interpolate_longitude, interpolate_nose_wheel,
                  interpolate_ratio, lerp, lerp_f32, snap_lights},
    sample::{FlightSample, Lights, ObjectId},
    terrain::{TerrainProbe, resolve_ground_altitude},
};

/// geodetic position plus attitude, in degrees and meters
#[derive(Debug,Clone,Copy,Default,PartialEq,Serialize,Deserialize)]
pub struct Pose {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub pitch: f32,
    pub heading: f32,
    pub roll: f32,
}

/// what a host needs to draw an object at a given point in time
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct DrawState {
    pub pose: Pose,
    pub on_ground: bool,
    pub gear: f32,
    pub nose_wheel: f32,
    pub flaps: f32,
    pub spoilers: f32,
    pub lights: Option<Lights>,
    pub lift: f32,
    pub f: f64, // the interpolation factor this state was computed with
}

impl DrawState {
    /// the state of a (fully defaulted) sample
    fn from_sample (s: &FlightSample)->Self {
        DrawState {
            pose: Pose {
                latitude: s.latitude.unwrap_or(0.0),
                longitude: s.longitude.unwrap_or(0.0),
                altitude_m: s.altitude.unwrap_or(0.0),
                pitch: s.pitch.unwrap_or(0.0),
                heading: s.heading.unwrap_or(0.0),
                roll: s.roll.unwrap_or(0.0),
            },
            on_ground: s.on_ground,
            gear: s.config.gear.unwrap_or(0.0),
            nose_wheel: s.config.nose_wheel.unwrap_or(0.0),
            flaps: s.config.flaps.unwrap_or(0.0),
            spoilers: s.config.spoilers.unwrap_or(0.0),
            lights: s.lights,
            lift: s.wake.lift.unwrap_or_else( || s.wake.default_lift()),
            f: 0.0,
        }
    }
}

/// the interpolatable state of one object, which is always between (or beyond) two samples.
///
/// `from` never has unset interpolation inputs. `to` inherits unset values from its predecessor, except of lift
/// which falls back to its physical default
#[derive(Debug)]
pub struct ObjectTrack {
    id: ObjectId,
    from: FlightSample,
    to: FlightSample,
    draw: DrawState,
}

impl ObjectTrack {
    pub fn new (mut from: FlightSample, mut to: FlightSample, terrain: &dyn TerrainProbe)->Self {
        resolve_ground_altitude( &mut from, terrain);
        from.fill_defaults();

        to.carry_forward_from( &from);
        resolve_ground_altitude( &mut to, terrain);

        let draw = DrawState::from_sample( &from);
        ObjectTrack { id: from.id, from, to, draw }
    }

    pub fn id (&self)->ObjectId { self.id }
    pub fn from (&self)->&FlightSample { &self.from }
    pub fn to (&self)->&FlightSample { &self.to }

    /// the state computed by the last `render` call
    pub fn draw_state (&self)->&DrawState { &self.draw }

    /// consume what we need from the (timestamp ordered) staged samples of this object.
    ///
    /// As long as `to` is still ahead of `now` we only drop staged samples that are too close to it. Once we
    /// reached `to` we move on to the next staged sample. If that one is in the future we start the new segment
    /// from where we currently draw the object so that there is no visible jump.
    /// Samples we don't need yet stay in `staged`. Returns true if the segment changed
    pub fn update (&mut self, staged: &mut VecDeque<FlightSample>, now: DateTime<Utc>, min_delta: TimeDelta,
                   max_factor: f64, terrain: &dyn TerrainProbe)->bool {
        let mut shifted = false;

        loop {
            let cutoff = self.to.timestamp + min_delta;
            while staged.front().is_some_and( |s| s.timestamp <= cutoff) {
                if let Some(s) = staged.pop_front() {
                    debug!("dropping obsolete sample {s}");
                }
            }

            if self.to.timestamp > now { break }
            let Some(mut next) = staged.pop_front() else { break };

            let current = self.compute( now, max_factor);

            next.carry_forward_from( &self.to);
            resolve_ground_altitude( &mut next, terrain);

            self.from = std::mem::replace( &mut self.to, next);
            if self.to.timestamp > now {
                self.from.timestamp = now;
                apply_draw_state( &mut self.from, &current);
            }

            trace!("{:06X} new segment {} -> {}", self.id, self.from.timestamp, self.to.timestamp);
            shifted = true;
        }

        shifted
    }

    /// compute and cache the draw state for `now`. Position is extrapolated without limit, attitude and
    /// configuration only up to `max_factor`
    pub fn render (&mut self, now: DateTime<Utc>, max_factor: f64)->&DrawState {
        self.draw = self.compute( now, max_factor);
        &self.draw
    }

    /// a track is done once its target sample falls behind the grace period cutoff
    pub fn is_removable (&self, cutoff: DateTime<Utc>)->bool {
        self.to.timestamp < cutoff
    }

    fn compute (&self, now: DateTime<Utc>, max_factor: f64)->DrawState {
        let from = &self.from;
        let to = &self.to;
        let current = &self.draw;

        let f = factor( now, from.timestamp, to.timestamp).max(0.0);
        let fc = f.min( max_factor);

        let pose = Pose {
            latitude: lerp( value(from.latitude), value_or(to.latitude, from.latitude), f),
            longitude: interpolate_longitude( value(from.longitude), value_or(to.longitude, from.longitude), f),
            altitude_m: lerp( value(from.altitude), value_or(to.altitude, from.altitude), f),
            pitch: lerp_f32( value(from.pitch), value_or(to.pitch, from.pitch), fc),
            heading: interpolate_heading( value(from.heading), value_or(to.heading, from.heading), fc),
            roll: lerp_f32( value(from.roll), value_or(to.roll, from.roll), fc),
        };

        DrawState {
            pose,
            on_ground: if f >= 0.5 { to.on_ground } else { from.on_ground },
            gear: interpolate_ratio( from.config.gear, to.config.gear, fc, current.gear),
            nose_wheel: interpolate_nose_wheel( from.config.nose_wheel, to.config.nose_wheel, fc, current.nose_wheel),
            flaps: interpolate_ratio( from.config.flaps, to.config.flaps, fc, current.flaps),
            spoilers: interpolate_ratio( from.config.spoilers, to.config.spoilers, fc, current.spoilers),
            lights: snap_lights( from.lights, to.lights, f).or( current.lights),
            lift: interpolate_lift( &from.wake, &to.wake, fc),
            f,
        }
    }
}

impl fmt::Display for ObjectTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "ObjectTrack( id: {:06X}", self.id)?;
        if let Some(cs) = &self.to.call_sign { write!( f, ", cs: \"{cs}\"")?; }
        write!( f, ", from: {}, to: {}, f: {:.2})", self.from.timestamp.format("%H:%M:%S%.3f"),
                self.to.timestamp.format("%H:%M:%S%.3f"), self.draw.f)
    }
}

#[inline]
fn value<T: Default> (v: Option<T>)->T { v.unwrap_or_default() }

#[inline]
fn value_or<T: Default> (v: Option<T>, fallback: Option<T>)->T { v.or(fallback).unwrap_or_default() }

/// make a sample reflect what we currently draw
fn apply_draw_state (s: &mut FlightSample, ds: &DrawState) {
    s.latitude = Some( ds.pose.latitude);
    s.longitude = Some( ds.pose.longitude);
    s.altitude = Some( ds.pose.altitude_m);
    s.pitch = Some( ds.pose.pitch);
    s.heading = Some( ds.pose.heading);
    s.roll = Some( ds.pose.roll);
    s.on_ground = ds.on_ground;

    s.config.gear = Some( ds.gear);
    s.config.nose_wheel = Some( ds.nose_wheel);
    s.config.flaps = Some( ds.flaps);
    s.config.spoilers = Some( ds.spoilers);

    s.wake.lift = Some( ds.lift);
    if ds.lights.is_some() { s.lights = ds.lights }
}
