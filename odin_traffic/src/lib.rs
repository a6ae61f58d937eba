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

//! reconstruction of smooth object motion from irregular third party traffic telemetry.
//!
//! Raw messages go into a [`Gateway`] (from any number of network threads), which turns them into
//! [`FlightSample`]s and sends them to the [`TrackManager`]. The manager owns the per object staging queues
//! and [`ObjectTrack`]s, advances them at a fixed maintenance cadence and renders a [`DrawState`] for each
//! object whenever the host asks for a frame

pub mod errors;
pub mod sample;
pub mod config;

pub mod adapter;
pub mod rttfc;
pub mod xpptraffic;

pub mod gateway;
pub mod staging;
pub mod interpolate;
pub mod track;
pub mod terrain;
pub mod relevance;
pub mod manager;

pub use errors::{OdinTrafficError,IngestError,Result};
pub use sample::{FlightSample,ObjectId,Lights,Wake,AircraftConfig};
pub use config::{TrafficConfig,ListenConfig,load_config};
pub use adapter::FormatAdapter;
pub use gateway::{Gateway,Submission};
pub use track::{ObjectTrack,DrawState,Pose};
pub use terrain::TerrainProbe;
pub use relevance::RelevanceTest;
pub use manager::{TrackManager,TrackFrame,TrafficStatus,MaintenanceStats};
