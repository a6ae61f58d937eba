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
use uom::si::length::{kilometer, nautical_mile};
use odin_traffic::{
    errors::IngestError, relevance::{WithinDistance, haversine_distance}, rttfc::MIN_FIELDS, sample::ft_to_m, terrain::FlatTerrain,
    TrackManager, TrafficConfig, TrafficStatus,
};

/// end-to-end tests for gateway, track manager and rendering
/// run with "cargo test --test test_manager -- --nocapture"

const T0: i64 = 1_700_000_000;
const ID: u32 = 0xA1B2C3;

fn at (secs: f64)->DateTime<Utc> {
    DateTime::from_timestamp( T0, 0).unwrap() + TimeDelta::milliseconds( (secs * 1000.0) as i64)
}

fn rttfc (lat: &str, lon: &str, alt: &str, gnd: &str, ts: f64)->String {
    let ts = format!("{:.3}", T0 as f64 + ts);
    let mut v = vec![""; MIN_FIELDS];
    v[0] = "RTTFC";
    v[1] = "A1B2C3";
    v[2] = lat;
    v[3] = lon;
    v[4] = alt;
    v[6] = gnd;
    v[9] = "DLH4AB";
    v[14] = ts.as_str();
    v.join(",")
}

#[test]
fn test_rttfc_end_to_end () {
    let (mut mgr, gateway) = TrackManager::new( TrafficConfig::default());
    assert_eq!( mgr.status(), TrafficStatus::Waiting);
    let now = at(0.5);

    gateway.submit_at( rttfc( "51.0", "7.0", "1000", "0", 0.0).as_bytes(), now).unwrap();
    let stats = mgr.maintain( now);
    assert_eq!( stats.received, 1);
    assert_eq!( mgr.n_tracks(), 0, "one sample is not enough for a track");
    assert_eq!( mgr.status(), TrafficStatus::Active, "staged data makes us active");

    gateway.submit_at( rttfc( "51.01", "7.01", "1050", "0", 5.0).as_bytes(), now).unwrap();
    let stats = mgr.maintain( now);
    println!("{stats:?}");
    assert_eq!( stats.created, 1);

    let track = mgr.track( ID).unwrap();
    println!("{track}");
    assert_eq!( track.from().timestamp, at(0.0));
    assert_eq!( track.to().timestamp, at(5.0));

    let frames = mgr.render( at(2.5));
    assert_eq!( frames.len(), 1);
    let frame = &frames[0];
    println!("{frame:?}");
    assert_eq!( frame.id, ID);
    assert!( !frame.removable);
    assert!( (frame.state.f - 0.5).abs() < 1e-6);
    assert!( (frame.state.pose.latitude - 51.005).abs() < 1e-9);
    assert!( (frame.state.pose.longitude - 7.005).abs() < 1e-9);
    assert!( (frame.state.pose.altitude_m - ft_to_m(1025.0)).abs() < 1e-6);

    let json = serde_json::to_string( &frames).unwrap();
    println!("{json}");
    assert!( json.contains("\"removable\":false"));
}

#[test]
fn test_idempotent_late_data () {
    let (mut mgr, gateway) = TrackManager::new( TrafficConfig::default());
    let now = at(1.0);

    gateway.submit_at( rttfc( "51.0", "7.0", "1000", "0", 0.0).as_bytes(), now).unwrap();
    gateway.submit_at( rttfc( "51.01", "7.01", "1050", "0", 5.0).as_bytes(), now).unwrap();
    mgr.maintain( now);

    let (from_before, to_before) = {
        let track = mgr.track( ID).unwrap();
        (track.from().clone(), track.to().clone())
    };

    println!("-- resubmitting consumed samples");
    gateway.submit_at( rttfc( "51.0", "7.0", "1000", "0", 0.0).as_bytes(), now).unwrap();
    gateway.submit_at( rttfc( "51.01", "7.01", "1050", "0", 5.0).as_bytes(), now).unwrap();
    let stats = mgr.maintain( now);
    println!("{stats:?}");

    assert_eq!( stats.rejected, 2);
    assert!( mgr.staging().is_empty());
    let track = mgr.track( ID).unwrap();
    assert_eq!( track.from(), &from_before);
    assert_eq!( track.to(), &to_before);
}

#[test]
fn test_status_lifecycle () {
    let (mut mgr, gateway) = TrackManager::new( TrafficConfig::default());
    assert_eq!( mgr.status(), TrafficStatus::Waiting);

    assert_eq!( mgr.maintain( at(0.0)).received, 0);
    assert_eq!( mgr.status(), TrafficStatus::Waiting);

    gateway.submit_at( rttfc( "51.0", "7.0", "1000", "0", 0.0).as_bytes(), at(0.0)).unwrap();
    gateway.submit_at( rttfc( "51.01", "7.01", "1050", "0", 5.0).as_bytes(), at(0.0)).unwrap();
    mgr.maintain( at(1.0));
    assert_eq!( mgr.status(), TrafficStatus::Active);
    assert_eq!( mgr.n_tracks(), 1);

    println!("-- no more data, track falls out of grace period");
    assert!( mgr.render( at(35.1))[0].removable);
    let stats = mgr.maintain( at(40.0));
    assert_eq!( stats.removed, 1);
    assert_eq!( mgr.n_tracks(), 0);
    assert_eq!( mgr.status(), TrafficStatus::Waiting);

    println!("-- shutdown");
    mgr.shutdown();
    assert_eq!( mgr.status(), TrafficStatus::Inactive);
    let res = gateway.submit_at( rttfc( "51.02", "7.02", "1100", "0", 41.0).as_bytes(), at(41.0));
    assert_eq!( res, Err(IngestError::Closed));
    assert_eq!( mgr.maintain( at(42.0)).received, 0);
    assert_eq!( mgr.status(), TrafficStatus::Inactive);
}

#[test]
fn test_json_array_partial () {
    let (mut mgr, gateway) = TrackManager::new( TrafficConfig::default());
    let msg = format!( r#"[
        {{ "id": 1001, "position": {{ "lat": 51.0, "lon": 7.0, "alt_geo": 3000, "timestamp": {T0} }} }},
        {{ "id": 1002, "ident": {{ "call": "NOPOS" }} }}
    ]"#);

    let sub = gateway.submit_at( msg.as_bytes(), at(0.0)).unwrap();
    println!("{sub:?}");
    assert_eq!( sub.accepted, 1);
    assert_eq!( sub.rejected.len(), 1);
    assert!( sub.is_partial());

    mgr.maintain( at(0.0));
    assert!( mgr.staging().get(1001).is_some());
    assert!( mgr.staging().get(1002).is_none());
}

#[test]
fn test_relevance () {
    let config = TrafficConfig::default();

    let (mgr, gateway) = TrackManager::new( config.clone());
    let mut mgr = mgr.with_relevance( WithinDistance::new( 0.0, 0.0, config.max_distance()));
    gateway.submit_at( rttfc( "51.0", "7.0", "1000", "0", 0.0).as_bytes(), at(0.0)).unwrap();
    gateway.submit_at( rttfc( "51.01", "7.01", "1050", "0", 5.0).as_bytes(), at(0.0)).unwrap();
    let stats = mgr.maintain( at(1.0));
    println!("far away: {stats:?}");
    assert_eq!( stats.created, 1);
    assert_eq!( stats.removed, 1);

    let (mgr, gateway) = TrackManager::new( config.clone());
    let mut mgr = mgr.with_relevance( WithinDistance::new( 51.2, 7.0, config.max_distance()));
    gateway.submit_at( rttfc( "51.0", "7.0", "1000", "0", 0.0).as_bytes(), at(0.0)).unwrap();
    gateway.submit_at( rttfc( "51.01", "7.01", "1050", "0", 5.0).as_bytes(), at(0.0)).unwrap();
    let stats = mgr.maintain( at(1.0));
    println!("close: {stats:?}");
    assert_eq!( mgr.n_tracks(), 1);
}

#[test]
fn test_haversine_distance () {
    let d = haversine_distance( 51.0, 7.0, 52.0, 7.0);
    println!("1 deg of latitude: {:.3} km", d.get::<kilometer>());
    assert!( (d.get::<kilometer>() - 111.19).abs() < 0.1);

    let d = haversine_distance( 0.0, 179.5, 0.0, -179.5);
    println!("across the antimeridian: {:.2} nm", d.get::<nautical_mile>());
    assert!( (d.get::<nautical_mile>() - 60.04).abs() < 0.1);

    assert_eq!( haversine_distance( 51.0, 7.0, 51.0, 7.0).get::<kilometer>(), 0.0);
}

#[test]
fn test_ground_traffic () {
    let (mgr, gateway) = TrackManager::new( TrafficConfig::default());
    let mut mgr = mgr.with_terrain( FlatTerrain(110.0));

    gateway.submit_at( rttfc( "51.0", "7.0", "", "1", 0.0).as_bytes(), at(0.0)).unwrap();
    gateway.submit_at( rttfc( "51.0001", "7.0", "", "1", 5.0).as_bytes(), at(0.0)).unwrap();
    mgr.maintain( at(1.0));

    let ds = mgr.render_track( ID, at(2.0)).unwrap();
    println!("{ds:?}");
    assert_eq!( ds.pose.altitude_m, 110.0);
    assert_eq!( ds.gear, 1.0);
    assert!( ds.on_ground);
    assert!( ds.lights.is_some_and( |l| l.taxi));
}
