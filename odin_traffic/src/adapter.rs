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
use tracing::trace;
use crate::{errors::IngestError, sample::{FlightSample,ObjectId}};
use crate::{rttfc::RttfcAdapter, xpptraffic::{JsonArrayAdapter,JsonObjectAdapter}};

/// outcome for one record inside a (possibly multi-record) message
pub type RecordResult = std::result::Result<FlightSample,IngestError>;

/// a parser for one wire dialect.
///
/// Implementations first do a cheap structural check (leading token or first significant character) and
/// return `None` if the input is not theirs, so that the next adapter can be tried. Only if the structure
/// matches they extract fields, returning one `RecordResult` per contained record. Malformed individual
/// fields never abort a record, they just stay unset
pub trait FormatAdapter: Send + Sync {
    fn name (&self)->&'static str;

    fn try_parse (&self, input: &str, now: DateTime<Utc>)->Option<Vec<RecordResult>>;
}

/// the adapters in their fixed trial order: JSON array, JSON object, delimited text
pub fn default_adapters ()->Vec<Box<dyn FormatAdapter>> {
    vec![
        Box::new( JsonArrayAdapter),
        Box::new( JsonObjectAdapter),
        Box::new( RttfcAdapter),
    ]
}

/// the first char that is not whitespace, which is enough to tell JSON objects, JSON arrays and delimited records apart
pub fn first_significant_char (input: &str)->Option<char> {
    input.trim_start().chars().next()
}

/// feeds use various encodings of "no value"
pub fn is_absent_token (tok: &str)->bool {
    matches!( tok, "" | "-1" | "-1.0" | "-1.00")
}

/// numeric field types. Floats only count if they are finite since `from_str` also accepts "NaN" and "inf"
pub trait FieldValue: std::str::FromStr {
    fn is_valid (&self)->bool { true }
}

impl FieldValue for f64 {
    fn is_valid (&self)->bool { self.is_finite() }
}

impl FieldValue for f32 {
    fn is_valid (&self)->bool { self.is_finite() }
}

impl FieldValue for i64 {}

/// parse a numeric field, logging (but otherwise ignoring) conversion failures
pub fn parse_field<T: FieldValue> (field: &'static str, tok: &str)->Option<T> {
    match tok.trim().parse::<T>() {
        Ok(v) if v.is_valid() => Some(v),
        _ => {
            let e = IngestError::InvalidField{ field, value: tok.to_string() };
            trace!("{e}");
            None
        }
    }
}

/// object ids come as "0x.." hex, plain decimal or bare hex digits (e.g. "A1B2C3")
pub fn parse_object_id (tok: &str)->Option<ObjectId> {
    let tok = tok.trim();
    if let Some(hex) = tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X")) {
        ObjectId::from_str_radix( hex, 16).ok()
    } else if !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit()) {
        tok.parse::<ObjectId>().ok() // all digits are decimal, a leading '0' does not make it octal
    } else {
        parse_hex_id( tok)
    }
}

/// ids that are known to be hex encoded (optionally with "0x" prefix)
pub fn parse_hex_id (tok: &str)->Option<ObjectId> {
    let tok = tok.trim();
    let hex = tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X")).unwrap_or(tok);
    if hex.is_empty() { return None }
    ObjectId::from_str_radix( hex, 16).ok()
}
