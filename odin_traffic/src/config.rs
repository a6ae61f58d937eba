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

use std::{net::Ipv4Addr, path::Path, time::Duration};
use chrono::TimeDelta;
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::nautical_mile};
use crate::errors::Result;

/// the tunables of ingestion, staging and track maintenance. Durations are given as strings such as "30s" or "100ms"
/// ```ron
/// TrafficConfig(
///     buffer_period: "0s",
///     grace_period: "30s",
///     ...
/// )
/// ```
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct TrafficConfig {
    /// artificial delay added to every sample timestamp so that there is usually a future sample to interpolate to
    #[serde(with="duration_str")]
    pub buffer_period: Duration,

    /// how far a track may fall behind before it is dropped, also the cutoff for stale input
    #[serde(with="duration_str")]
    pub grace_period: Duration,

    /// samples closer than this to the current interpolation target are skipped
    #[serde(with="duration_str")]
    pub min_ts_delta: Duration,

    /// how far beyond the target sample (as fraction of the segment) attitude and configuration get extrapolated
    pub max_factor: f64,

    /// relevance radius around the observer, in nautical miles
    pub max_distance_nm: f64,

    /// cadence of staging drain and track maintenance
    #[serde(with="duration_str")]
    pub maintenance_interval: Duration,

    pub listen: ListenConfig,
}

impl Default for TrafficConfig {
    fn default()->Self {
        TrafficConfig {
            buffer_period: Duration::ZERO,
            grace_period: Duration::from_secs(30),
            min_ts_delta: Duration::from_millis(100),
            max_factor: 1.25,
            max_distance_nm: 50.0,
            maintenance_interval: Duration::from_secs(1),
            listen: ListenConfig::default(),
        }
    }
}

impl TrafficConfig {
    pub fn buffer_offset (&self)->TimeDelta { to_time_delta( self.buffer_period) }
    pub fn grace (&self)->TimeDelta { to_time_delta( self.grace_period) }
    pub fn min_delta (&self)->TimeDelta { to_time_delta( self.min_ts_delta) }

    pub fn max_distance (&self)->Length { Length::new::<nautical_mile>( self.max_distance_nm) }

    pub fn from_ron_str (s: &str)->Result<Self> {
        Ok( ron::from_str(s)? )
    }
}

/// where the UDP listeners of the `listen_traffic` tool bind to
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct ListenConfig {
    pub enable_broadcast: bool,
    pub broadcast_port: u16,

    pub enable_multicast: bool,
    pub multicast_group: Ipv4Addr,
    pub multicast_port: u16,

    pub buffer_size: usize,
}

impl Default for ListenConfig {
    fn default()->Self {
        ListenConfig {
            enable_broadcast: true,
            broadcast_port: 49800,
            enable_multicast: true,
            multicast_group: Ipv4Addr::new(239,255,1,1),
            multicast_port: 49900,
            buffer_size: 8192,
        }
    }
}

pub fn load_config<P: AsRef<Path>> (path: P)->Result<TrafficConfig> {
    let data = std::fs::read( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

fn to_time_delta (dur: Duration)->TimeDelta {
    TimeDelta::from_std(dur).unwrap_or( TimeDelta::MAX)
}

/// durations as human readable strings ("30s", "1.5s", "100ms")
mod duration_str {
    use std::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer> (dur: &Duration, s: S)->Result<S::Ok,S::Error> {
        s.collect_str( &format_args!("{dur:?}"))
    }

    pub fn deserialize<'de,D: Deserializer<'de>> (d: D)->Result<Duration,D::Error> {
        let text = String::deserialize(d)?;
        parse_duration::parse( &text).map_err( |e| D::Error::custom( format!("invalid duration '{text}': {e}")))
    }
}
