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

//! the structured JSON traffic dialect. One message is either a single object or an array of objects:
//! ```json
//! { "id": 11234042,                     // number or hex string ("AB12CD")
//!   "ident":    { "airline": "AAL", "reg": "N835AN", "call": "AAL72", "label": "..." },
//!   "type":     { "icao": "B789", "wingSpan": 60.1, "wingArea": 377.0 },
//!   "position": { "lat": -33.91, "lon": 152.99, "alt_geo": 26400, "gnd": false, "timestamp": 1645144774.2 },
//!   "attitude": { "roll": -2.0, "heading": 90.1, "pitch": 1.5 },
//!   "config":   { "mass": 190000, "lift": 1863000, "gear": 0, "noseWheel": 0, "flaps": 0, "spoiler": 0 },
//!   "light":    { "taxi": false, "landing": false, "beacon": true, "strobe": true, "nav": true }
//! }
//! ```
//! Only "id" and "position" are mandatory. `null` or wrongly typed members are treated as unset

use chrono::{DateTime,Utc};
use serde_json::{Map,Value};
use tracing::{debug,trace};
use crate::adapter::{FormatAdapter, RecordResult, first_significant_char, parse_hex_id};
use crate::errors::{IngestError, insufficient_data};
use crate::sample::{FlightSample, Lights, ObjectId, ft_to_m, normalize_timestamp};

type JsonObject = Map<String,Value>;

/// a single traffic object per message
pub struct JsonObjectAdapter;

impl FormatAdapter for JsonObjectAdapter {
    fn name (&self)->&'static str { "json-object" }

    fn try_parse (&self, input: &str, now: DateTime<Utc>)->Option<Vec<RecordResult>> {
        if first_significant_char(input) != Some('{') { return None }

        match serde_json::from_str::<Value>(input) {
            Ok(v) => Some( vec![ parse_traffic_value( &v, now)] ),
            Err(e) => { debug!("malformed JSON object: {e}"); None }
        }
    }
}

/// a batch of traffic objects per message. Each element is processed independently
pub struct JsonArrayAdapter;

impl FormatAdapter for JsonArrayAdapter {
    fn name (&self)->&'static str { "json-array" }

    fn try_parse (&self, input: &str, now: DateTime<Utc>)->Option<Vec<RecordResult>> {
        if first_significant_char(input) != Some('[') { return None }

        match serde_json::from_str::<Value>(input) {
            Ok(Value::Array(elems)) => Some( elems.iter().map( |v| parse_traffic_value( v, now)).collect()),
            Ok(_) => None,
            Err(e) => { debug!("malformed JSON array: {e}"); None }
        }
    }
}

pub fn parse_traffic_value (v: &Value, now: DateTime<Utc>)->RecordResult {
    match v.as_object() {
        Some(o) => parse_traffic_object( o, now),
        None => Err( insufficient_data!("traffic element is not an object"))
    }
}

pub fn parse_traffic_object (o: &JsonObject, now: DateTime<Utc>)->RecordResult {
    let id = object_id( o).ok_or_else( || insufficient_data!("traffic object without valid 'id'"))?;
    let pos = sub_object( o, "position").ok_or_else( || insufficient_data!("traffic object {id:06X} without 'position'"))?;

    let mut s = FlightSample::new( id, now);

    s.latitude = number( pos, "lat");
    s.longitude = number( pos, "lon");
    s.altitude = number( pos, "alt_geo").map( ft_to_m);
    s.on_ground = flag( pos, "gnd").unwrap_or(false);
    s.timestamp = normalize_timestamp( number( pos, "timestamp"), now);

    if let Some(ident) = sub_object( o, "ident") {
        s.icao_airline = text( ident, "airline");
        s.livery = text( ident, "reg");
        s.call_sign = text( ident, "call");
        s.label = text( ident, "label");
    }

    if let Some(ac_type) = sub_object( o, "type") {
        s.icao_type = text( ac_type, "icao");
        s.wake.wing_span_m = number( ac_type, "wingSpan").map( |v| v as f32);
        s.wake.wing_area_m2 = number( ac_type, "wingArea").map( |v| v as f32);
    }

    if let Some(att) = sub_object( o, "attitude") {
        s.roll = number( att, "roll").map( |v| v as f32);
        s.heading = number( att, "heading").map( |v| v as f32);
        s.pitch = number( att, "pitch").map( |v| v as f32);
    }

    if let Some(cfg) = sub_object( o, "config") {
        s.wake.mass_kg = number( cfg, "mass").map( |v| v as f32);
        s.wake.lift = number( cfg, "lift").map( |v| v as f32);
        s.config.gear = number( cfg, "gear").map( |v| v as f32);
        s.config.nose_wheel = number( cfg, "noseWheel").map( |v| v as f32);
        s.config.flaps = number( cfg, "flaps").map( |v| v as f32);
        s.config.spoilers = number( cfg, "spoiler").map( |v| v as f32);
    }

    if let Some(light) = sub_object( o, "light") {
        s.lights = Some( Lights {
            taxi: flag( light, "taxi").unwrap_or(false),
            landing: flag( light, "landing").unwrap_or(false),
            beacon: flag( light, "beacon").unwrap_or(false),
            strobe: flag( light, "strobe").unwrap_or(false),
            nav: flag( light, "nav").unwrap_or(false),
        });
    }

    Ok(s)
}

/* #region member accessors */

fn object_id (o: &JsonObject)->Option<ObjectId> {
    match o.get("id")? {
        Value::Number(n) => n.as_u64().and_then( |id| ObjectId::try_from(id).ok()),
        Value::String(s) => parse_hex_id( s),
        other => { invalid( "id", other); None }
    }
}

fn sub_object<'a> (o: &'a JsonObject, key: &'static str)->Option<&'a JsonObject> {
    match o.get(key)? {
        Value::Object(m) => Some(m),
        Value::Null => None,
        other => { invalid( key, other); None }
    }
}

fn number (o: &JsonObject, key: &'static str)->Option<f64> {
    match o.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::Null => None,
        other => { invalid( key, other); None }
    }
}

/// booleans are sometimes sent as 0/1
fn flag (o: &JsonObject, key: &'static str)->Option<bool> {
    match o.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map( |v| v != 0.0),
        Value::Null => None,
        other => { invalid( key, other); None }
    }
}

fn text (o: &JsonObject, key: &'static str)->Option<String> {
    match o.get(key)? {
        Value::String(s) if !s.is_empty() => Some( s.clone()),
        Value::String(_) | Value::Null => None,
        other => { invalid( key, other); None }
    }
}

fn invalid (field: &'static str, v: &Value) {
    let e = IngestError::InvalidField{ field, value: v.to_string() };
    trace!("{e}");
}

/* #endregion member accessors */
