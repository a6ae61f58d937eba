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

use geo::{Distance, Point};
use geo::algorithm::line_measures::metric_spaces::Haversine;
use uom::si::{f64::Length, length::meter};
use crate::track::ObjectTrack;

/// host supplied predicate that decides if a track is still worth keeping (e.g. because it is close enough
/// to the observer)
pub trait RelevanceTest {
    fn is_relevant (&self, track: &ObjectTrack)->bool;
}

/// keep everything until it times out
pub struct AlwaysRelevant;

impl RelevanceTest for AlwaysRelevant {
    fn is_relevant (&self, _track: &ObjectTrack)->bool { true }
}

/// keep tracks whose last rendered position is within `max_distance` of a reference point
#[derive(Debug,Clone,Copy)]
pub struct WithinDistance {
    pub latitude: f64,
    pub longitude: f64,
    pub max_distance: Length,
}

impl WithinDistance {
    pub fn new (latitude: f64, longitude: f64, max_distance: Length)->Self {
        WithinDistance { latitude, longitude, max_distance }
    }

    /// move the reference point (e.g. when the observer moves)
    pub fn set_center (&mut self, latitude: f64, longitude: f64) {
        self.latitude = latitude;
        self.longitude = longitude;
    }
}

impl RelevanceTest for WithinDistance {
    fn is_relevant (&self, track: &ObjectTrack)->bool {
        let pose = &track.draw_state().pose;
        haversine_distance( self.latitude, self.longitude, pose.latitude, pose.longitude) <= self.max_distance
    }
}

/// great circle distance on a spherical earth (angles in degrees)
pub fn haversine_distance (lat1: f64, lon1: f64, lat2: f64, lon2: f64)->Length {
    let start = Point::new( lon1, lat1);
    let end = Point::new( lon2, lat2);
    let dist = Haversine.distance( start, end);
    Length::new::<meter>(dist)
}
