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

use chrono::{DateTime,Utc};
use thiserror::Error;
use crate::sample::ObjectId;

pub type Result<T> = std::result::Result<T,OdinTrafficError>;

#[derive(Error,Debug)]
pub enum OdinTrafficError {

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("config error {0}")]
    ConfigError( #[from] ron::error::SpannedError),

    #[error("ingest error {0}")]
    IngestError( #[from] IngestError),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

/// why a record did not make it into the staging store. None of these are fatal - the worst outcome is
/// that an object does not get an update and eventually falls out of the grace period
#[derive(Error,Debug,Clone,PartialEq)]
pub enum IngestError {

    /// no format adapter recognized the structure of the input
    #[error("no format adapter matched the input")]
    NoMatch,

    /// structurally parsed but mandatory data (id, position, altitude) is missing
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// parsed fine but already older than the grace period cutoff
    #[error("stale data for {id:06X} at {timestamp} (cutoff {cutoff})")]
    Stale { id: ObjectId, timestamp: DateTime<Utc>, cutoff: DateTime<Utc> },

    #[error("duplicate timestamp for {id:06X} at {timestamp}")]
    DuplicateTimestamp { id: ObjectId, timestamp: DateTime<Utc> },

    #[error("out of sequence data for {id:06X} at {timestamp} (last {last})")]
    OutOfSequence { id: ObjectId, timestamp: DateTime<Utc>, last: DateTime<Utc> },

    /// a single field could not be converted. The field stays unset, the record is still processed
    #[error("invalid value for field {field}: '{value}'")]
    InvalidField { field: &'static str, value: String },

    /// the consuming side has shut down
    #[error("sample channel closed")]
    Closed,
}

macro_rules! insufficient_data {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::IngestError::InsufficientData( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use insufficient_data;
