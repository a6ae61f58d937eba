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

use std::{collections::HashMap, fmt};
use chrono::{DateTime,Utc};
use kanal::Receiver;
use serde::{Serialize,Deserialize};
use tracing::{debug,info,warn};
use crate::{
    config::TrafficConfig,
    errors::IngestError,
    gateway::Gateway,
    relevance::{AlwaysRelevant, RelevanceTest},
    sample::{FlightSample, ObjectId},
    staging::StagingStore,
    terrain::{NoTerrain, TerrainProbe},
    track::{DrawState, ObjectTrack},
};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum TrafficStatus {
    /// shut down, not consuming any data
    Inactive,
    /// running but nothing to show
    Waiting,
    /// we have staged data or tracks
    Active,
}

impl fmt::Display for TrafficStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrafficStatus::Inactive => "inactive",
            TrafficStatus::Waiting => "waiting",
            TrafficStatus::Active => "active",
        };
        write!( f, "{s}")
    }
}

/// the per frame output for one object
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct TrackFrame {
    pub id: ObjectId,
    pub state: DrawState,
    pub removable: bool,
}

/// what happened during one maintenance cycle
#[derive(Debug,Clone,Default,PartialEq)]
pub struct MaintenanceStats {
    pub received: usize, // samples drained from the gateway channel
    pub rejected: usize, // received but not staged (ordering)
    pub dropped: usize,  // staged samples that fell out of the grace period
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// the consumer side of the traffic engine, which exclusively owns the staging store and all tracks.
///
/// Hosts call [`TrackManager::maintain`] at a fixed cadence to promote staged samples into tracks and
/// [`TrackManager::render`] once per frame
pub struct TrackManager {
    config: TrafficConfig,
    rx: Option<Receiver<FlightSample>>,
    staging: StagingStore,
    tracks: HashMap<ObjectId,ObjectTrack>,
    status: TrafficStatus,
    terrain: Box<dyn TerrainProbe + Send>,
    relevance: Box<dyn RelevanceTest + Send>,
}

impl TrackManager {
    /// create a manager together with the gateway that feeds it. More gateways can be obtained by cloning
    pub fn new (config: TrafficConfig)->(Self,Gateway) {
        let (tx,rx) = kanal::unbounded::<FlightSample>();
        let gateway = Gateway::new( &config, tx);

        let mut mgr = TrackManager {
            staging: StagingStore::new( config.min_delta()),
            config,
            rx: Some(rx),
            tracks: HashMap::new(),
            status: TrafficStatus::Inactive,
            terrain: Box::new( NoTerrain),
            relevance: Box::new( AlwaysRelevant),
        };
        mgr.set_status( TrafficStatus::Waiting);

        (mgr, gateway)
    }

    pub fn with_terrain (mut self, terrain: impl TerrainProbe + Send + 'static)->Self {
        self.terrain = Box::new( terrain);
        self
    }

    pub fn with_relevance (mut self, relevance: impl RelevanceTest + Send + 'static)->Self {
        self.relevance = Box::new( relevance);
        self
    }

    pub fn config (&self)->&TrafficConfig { &self.config }
    pub fn status (&self)->TrafficStatus { self.status }
    pub fn staging (&self)->&StagingStore { &self.staging }

    pub fn track (&self, id: ObjectId)->Option<&ObjectTrack> { self.tracks.get( &id) }
    pub fn n_tracks (&self)->usize { self.tracks.len() }

    /// one maintenance cycle: stage everything the gateways have sent since the last cycle, advance or create
    /// tracks from staged samples and retire tracks that are outdated or not relevant anymore
    pub fn maintain (&mut self, now: DateTime<Utc>)->MaintenanceStats {
        let mut stats = MaintenanceStats::default();
        if self.status == TrafficStatus::Inactive { return stats }

        let cutoff = now - self.config.grace();
        let min_delta = self.config.min_delta();
        let max_factor = self.config.max_factor;

        for sample in self.drain_channel() {
            stats.received += 1;
            if let Err(e) = self.stage( sample) {
                debug!("not staged: {e}");
                stats.rejected += 1;
            }
        }

        stats.dropped = self.staging.drop_older_than( cutoff);

        for id in self.staging.ids() {
            let Some(queue) = self.staging.get_mut( id) else { continue };

            if let Some(track) = self.tracks.get_mut( &id) {
                if track.update( queue, now, min_delta, max_factor, &*self.terrain) {
                    stats.updated += 1;
                }

            } else if queue.len() >= 2 {
                if let (Some(from),Some(to)) = (queue.pop_front(), queue.pop_front()) {
                    let track = ObjectTrack::new( from, to, &*self.terrain);
                    info!("new {track}");
                    self.tracks.insert( id, track);
                    stats.created += 1;
                }
            }
        }
        self.staging.remove_empty();

        let relevance = &*self.relevance;
        let n_tracks = self.tracks.len();
        self.tracks.retain( |_,track| {
            if track.is_removable( cutoff) {
                info!("removing outdated {track}");
                false
            } else if !relevance.is_relevant( track) {
                info!("removing irrelevant {track}");
                false
            } else {
                true
            }
        });
        stats.removed = n_tracks - self.tracks.len();

        if self.tracks.is_empty() && self.staging.is_empty() {
            self.set_status( TrafficStatus::Waiting);
        } else {
            self.set_status( TrafficStatus::Active);
        }

        stats
    }

    /// compute the draw states of all tracks for `now`, ordered by object id
    pub fn render (&mut self, now: DateTime<Utc>)->Vec<TrackFrame> {
        let cutoff = now - self.config.grace();
        let max_factor = self.config.max_factor;
        let relevance = &*self.relevance;

        let mut frames: Vec<TrackFrame> = self.tracks.values_mut().map( |track| {
            let state = *track.render( now, max_factor);
            let removable = track.is_removable( cutoff) || !relevance.is_relevant( track);
            TrackFrame { id: track.id(), state, removable }
        }).collect();

        frames.sort_by_key( |f| f.id);
        frames
    }

    /// render a single track
    pub fn render_track (&mut self, id: ObjectId, now: DateTime<Utc>)->Option<DrawState> {
        let max_factor = self.config.max_factor;
        self.tracks.get_mut( &id).map( |track| *track.render( now, max_factor))
    }

    /// stop consuming. Pending samples are discarded, staging and tracks are cleared and gateways from then on
    /// report [`IngestError::Closed`]
    pub fn shutdown (&mut self) {
        let n_pending = self.drain_channel().len();
        if let Some(rx) = self.rx.take() {
            let _ = rx.close();
        }
        if n_pending > 0 { debug!("discarded {n_pending} pending samples") }

        self.staging.clear();
        self.tracks.clear();
        self.set_status( TrafficStatus::Inactive);
    }

    fn drain_channel (&mut self)->Vec<FlightSample> {
        let mut samples = Vec::new();

        if let Some(rx) = &self.rx {
            loop {
                match rx.try_recv() {
                    Ok(Some(sample)) => samples.push( sample),
                    Ok(None) => break,
                    Err(e) => {
                        warn!("sample channel closed: {e}");
                        break
                    }
                }
            }
        }

        samples
    }

    /// samples that don't advance beyond what the track of their object already consumed are not staged
    fn stage (&mut self, sample: FlightSample)->Result<(),IngestError> {
        if let Some(track) = self.tracks.get( &sample.id) {
            let last = track.to().timestamp;
            if sample.timestamp == last {
                return Err( IngestError::DuplicateTimestamp{ id: sample.id, timestamp: sample.timestamp })
            }
            if sample.timestamp < last + self.staging.min_delta() {
                return Err( IngestError::OutOfSequence{ id: sample.id, timestamp: sample.timestamp, last })
            }
        }
        self.staging.append( sample)
    }

    fn set_status (&mut self, status: TrafficStatus) {
        if status != self.status {
            info!("traffic status {} -> {}", self.status, status);
            self.status = status;
        }
    }
}
