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

use std::sync::Arc;
use chrono::{DateTime,TimeDelta,Utc};
use kanal::Sender;
use tracing::{debug,trace};
use crate::{
    adapter::{FormatAdapter, RecordResult, default_adapters},
    config::TrafficConfig,
    errors::{IngestError, insufficient_data},
    sample::FlightSample,
};

/// what happened to the records of one message
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Submission {
    /// records that were handed over to the track manager
    pub accepted: usize,
    /// records that parsed fine but were already too old
    pub stale: usize,
    /// records that did not make it, in message order
    pub rejected: Vec<IngestError>,
}

impl Submission {
    /// some but not all records made it
    pub fn is_partial (&self)->bool {
        (self.accepted + self.stale) > 0 && !self.rejected.is_empty()
    }
}

/// the producer side of the traffic engine. Parses raw messages, stamps and filters the resulting samples and
/// sends them to the [`crate::manager::TrackManager`] that created this gateway.
///
/// Gateways can be cloned and used concurrently from any number of network threads, they don't share any
/// mutable state
#[derive(Clone)]
pub struct Gateway {
    adapters: Arc<[Box<dyn FormatAdapter>]>,
    buffer_offset: TimeDelta,
    grace: TimeDelta,
    tx: Sender<FlightSample>,
}

impl Gateway {
    pub(crate) fn new (config: &TrafficConfig, tx: Sender<FlightSample>)->Self {
        Gateway {
            adapters: default_adapters().into(),
            buffer_offset: config.buffer_offset(),
            grace: config.grace(),
            tx,
        }
    }

    pub fn adapter_names (&self)->Vec<&'static str> {
        self.adapters.iter().map( |a| a.name()).collect()
    }

    pub fn submit (&self, raw: &[u8])->Result<Submission,IngestError> {
        self.submit_at( raw, Utc::now())
    }

    pub fn submit_str (&self, raw: &str)->Result<Submission,IngestError> {
        self.submit_at( raw.as_bytes(), Utc::now())
    }

    /// process one message with `now` as the reference time. Returns an error if no record of the message
    /// was accepted (stale records count as accepted), otherwise a [`Submission`] that tells which records
    /// were rejected
    pub fn submit_at (&self, raw: &[u8], now: DateTime<Utc>)->Result<Submission,IngestError> {
        let input = match std::str::from_utf8( raw) {
            Ok(s) => s,
            Err(e) => { debug!("message is not valid UTF-8: {e}"); return Err( IngestError::NoMatch) }
        };

        let records = self.parse( input, now).ok_or_else( || {
            debug!("no adapter for message: {:.40}", input.trim());
            IngestError::NoMatch
        })?;

        let cutoff = now - self.grace;
        let mut submission = Submission::default();

        for rec in records {
            match rec.and_then( |s| self.admit( s, cutoff)) {
                Ok(true) => submission.accepted += 1,
                Ok(false) => submission.stale += 1,
                Err(IngestError::Closed) => return Err( IngestError::Closed),
                Err(e) => {
                    debug!("rejected record: {e}");
                    submission.rejected.push(e);
                }
            }
        }

        if submission.accepted + submission.stale == 0 {
            Err( submission.rejected.into_iter().next().unwrap_or( IngestError::NoMatch))
        } else {
            Ok(submission)
        }
    }

    /// the first adapter that recognizes the structure wins
    fn parse (&self, input: &str, now: DateTime<Utc>)->Option<Vec<RecordResult>> {
        self.adapters.iter().find_map( |a| {
            let res = a.try_parse( input, now);
            if res.is_some() { trace!("message matched by {}", a.name()) }
            res
        })
    }

    /// returns Ok(false) for records that are too old to be of any use
    fn admit (&self, mut sample: FlightSample, cutoff: DateTime<Utc>)->Result<bool,IngestError> {
        if !sample.is_usable() {
            return Err( insufficient_data!("unusable sample {sample}"))
        }

        sample.delay_by( self.buffer_offset);

        if sample.timestamp < cutoff {
            let e = IngestError::Stale{ id: sample.id, timestamp: sample.timestamp, cutoff };
            debug!("{e}");
            return Ok(false)
        }

        self.tx.send( sample).map_err( |_| IngestError::Closed)?;
        Ok(true)
    }
}
