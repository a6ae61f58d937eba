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

use tracing::warn;
use crate::sample::FlightSample;

/// the host service that knows the ground elevation at a given location
pub trait TerrainProbe {
    /// ground elevation [m] at the given location, or `None` if the location is not covered
    fn ground_altitude (&self, latitude: f64, longitude: f64)->Option<f64>;
}

/// the probe to use if the host has no elevation data. Objects on the ground just keep their reported altitude
pub struct NoTerrain;

impl TerrainProbe for NoTerrain {
    fn ground_altitude (&self, _latitude: f64, _longitude: f64)->Option<f64> { None }
}

/// a flat world at a fixed elevation, mostly useful for tests and simple hosts
pub struct FlatTerrain(pub f64);

impl TerrainProbe for FlatTerrain {
    fn ground_altitude (&self, _latitude: f64, _longitude: f64)->Option<f64> { Some(self.0) }
}

/// pin a sample that is on the ground to the terrain. If the probe has no answer we keep the reported altitude
/// (or sea level if there is none)
pub fn resolve_ground_altitude (sample: &mut FlightSample, terrain: &dyn TerrainProbe) {
    if !sample.on_ground { return }

    if let (Some(lat),Some(lon)) = (sample.latitude, sample.longitude) {
        match terrain.ground_altitude( lat, lon) {
            Some(alt) => sample.altitude = Some(alt),
            None => {
                if sample.altitude.is_none() {
                    warn!("no ground altitude for {:06X} at {:.5},{:.5}", sample.id, lat, lon);
                    sample.altitude = Some(0.0);
                }
            }
        }
    }
}
