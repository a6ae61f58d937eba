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

use std::collections::{HashMap,VecDeque};
use chrono::{DateTime,TimeDelta,Utc};
use crate::{errors::IngestError, sample::{FlightSample,ObjectId}};

/// per object queues of accepted samples that have not yet been consumed by a track.
/// Consecutive samples of each queue are at least `min_delta` apart
#[derive(Debug)]
pub struct StagingStore {
    entries: HashMap<ObjectId,VecDeque<FlightSample>>,
    min_delta: TimeDelta,
}

impl StagingStore {
    pub fn new (min_delta: TimeDelta)->Self {
        StagingStore { entries: HashMap::new(), min_delta }
    }

    pub fn min_delta (&self)->TimeDelta { self.min_delta }

    /// append a sample to the queue of its object. Samples that are not at least `min_delta` ahead of the last
    /// queued one are rejected, leaving the store unchanged
    pub fn append (&mut self, sample: FlightSample)->Result<(),IngestError> {
        if let Some(last) = self.entries.get( &sample.id).and_then( |q| q.back()) {
            if sample.timestamp == last.timestamp {
                return Err( IngestError::DuplicateTimestamp{ id: sample.id, timestamp: sample.timestamp })
            }
            if sample.timestamp < last.timestamp + self.min_delta {
                return Err( IngestError::OutOfSequence{ id: sample.id, timestamp: sample.timestamp, last: last.timestamp })
            }
        }

        let queue = self.entries.entry( sample.id).or_default();
        queue.push_back( sample);
        Ok(())
    }

    /// drop all samples older than `cutoff`, returning the number of removed samples.
    /// Objects without remaining samples are removed from the store
    pub fn drop_older_than (&mut self, cutoff: DateTime<Utc>)->usize {
        let mut n_dropped = 0;
        self.entries.retain( |_,queue| {
            while queue.front().is_some_and( |s| s.timestamp < cutoff) {
                queue.pop_front();
                n_dropped += 1;
            }
            !queue.is_empty()
        });
        n_dropped
    }

    pub fn get (&self, id: ObjectId)->Option<&VecDeque<FlightSample>> { self.entries.get( &id) }

    pub fn get_mut (&mut self, id: ObjectId)->Option<&mut VecDeque<FlightSample>> { self.entries.get_mut( &id) }

    pub fn ids (&self)->Vec<ObjectId> { self.entries.keys().copied().collect() }

    /// remove all queues that have been completely consumed
    pub fn remove_empty (&mut self) {
        self.entries.retain( |_,queue| !queue.is_empty());
    }

    /// number of objects with staged samples
    pub fn len (&self)->usize { self.entries.len() }

    pub fn is_empty (&self)->bool { self.entries.is_empty() }

    /// total number of staged samples over all objects
    pub fn n_samples (&self)->usize { self.entries.values().map( |q| q.len()).sum() }

    pub fn clear (&mut self) { self.entries.clear() }
}
