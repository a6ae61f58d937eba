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
use crate::adapter::{FormatAdapter, RecordResult, is_absent_token, parse_field, parse_object_id};
use crate::errors::insufficient_data;
use crate::sample::{FlightSample, Lights, baro_corrected_alt_ft, ft_to_m, normalize_timestamp};

/// the record type token every RTTFC line starts with
pub const RECORD_TYPE: &str = "RTTFC";

/// RTTFC as sent by RealTraffic (v9+)
///
/// Message example:
///  RTTFC,11234042,-33.9107,152.9902,26400,1248,0,90.12,490.00,AAL72,B789,N835AN,SYD,LAX,1645144774.2,X2,,,,,,,,,,,,,,,,,,,,,,,,,,
///
/// fields:
///   0: record type ("RTTFC")
///   1: transponder hex id (decimal, "0x" prefixed hex or bare hex digits)
///   2: latitude [deg]
///   3: longitude [deg]
///   4: barometric altitude [ft] (relative to 1013.25hPa, *not* AMSL)
///   5: barometric vertical rate [ft/min]
///   6: ground flag (1: on ground)
///   7: track [deg]
///   8: ground speed [kn]
///   9: ICAO call sign
///  10: ICAO aircraft type
///  11: registration (tail number)
///  12: origin IATA airport code
///  13: destination IATA airport code
///  14: timestamp (epoch seconds or millis, or relative seconds)
///  15: data source
///  16: IATA call sign
///  17: message type
///  18: geometric altitude [ft] (WGS84)
///  19: indicated air speed
///  20: true air speed
///  21: Mach number
///  22: track rate
///  23: roll [deg], negative is left
///  24: magnetic heading [deg]
///  25: true heading [deg]
///  26: geometric vertical rate
///  27: emergency status
///  28: category
///  29: QNH [hPa] the navigation is based on
///  30..41: MCP/FMS settings, receiver and weather data (ignored)
///
/// "", "-1", "-1.0" and "-1.00" all mean "no value". Where the same quantity is reported in several fields the
/// later (more authoritative) field wins: true heading over magnetic heading, geometric altitude over barometric
/// altitude
pub const MIN_FIELDS: usize = 42;

const HEXID: usize = 1;
const LAT: usize = 2;
const LON: usize = 3;
const ALT_BARO: usize = 4;
const GND: usize = 6;
const CS_ICAO: usize = 9;
const AC_TYPE: usize = 10;
const TAIL_NO: usize = 11;
const FROM_IATA: usize = 12;
const TO_IATA: usize = 13;
const TIMESTAMP: usize = 14;
const CS_IATA: usize = 16;
const ALT_GEOM: usize = 18;
const ROLL: usize = 23;
const MAG_HEADING: usize = 24;
const TRUE_HEADING: usize = 25;
const NAV_QNH: usize = 29;

/// below this altitude [ft] we assume landing lights are on
const LANDING_LIGHTS_BELOW_FT: f64 = 10_000.0;

pub struct RttfcAdapter;

impl FormatAdapter for RttfcAdapter {
    fn name (&self)->&'static str { RECORD_TYPE }

    fn try_parse (&self, input: &str, now: DateTime<Utc>)->Option<Vec<RecordResult>> {
        if !input.trim_start().starts_with(RECORD_TYPE) { return None }

        // a datagram might carry several lines
        let mut records: Vec<RecordResult> = Vec::new();
        for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let fields: Vec<&str> = line.split(',').collect();
            if fields[0].trim() != RECORD_TYPE {
                if records.is_empty() { return None } // something like "RTTFCX", not ours
                records.push( Err( insufficient_data!("not an RTTFC record: {:.40}", line)));
            } else {
                records.push( parse_record( &fields, now));
            }
        }

        if records.is_empty() { None } else { Some(records) }
    }
}

/// extract a FlightSample from the (already split) fields of an RTTFC line
pub fn parse_record (fields: &[&str], now: DateTime<Utc>)->RecordResult {
    if fields.len() < MIN_FIELDS {
        return Err( insufficient_data!("RTTFC record has {} fields, needs at least {}", fields.len(), MIN_FIELDS))
    }

    let mut s = FlightSample::new( 0, now);
    let mut alt_baro_ft: Option<f64> = None;
    let mut qnh: Option<f64> = None;
    let mut ts_raw: Option<f64> = None;
    let mut from_iata: Option<&str> = None;
    let mut to_iata: Option<&str> = None;

    for (i,tok) in fields.iter().enumerate() {
        let tok = tok.trim();
        if is_absent_token(tok) { continue }

        match i {
            HEXID => {
                match parse_object_id(tok) {
                    Some(id) => s.id = id,
                    None => trace!("invalid RTTFC hex id '{tok}'")
                }
            }
            LAT => s.latitude = parse_field("lat", tok),
            LON => s.longitude = parse_field("lon", tok),
            ALT_BARO => alt_baro_ft = parse_field("alt_baro", tok),
            GND => {
                if let Some(gnd) = parse_field::<i64>("gnd", tok) {
                    s.on_ground = gnd != 0;
                    if s.on_ground { s.config.gear = Some(1.0) } // no belly landings
                }
            }
            CS_ICAO => { // the first three chars of an ICAO call sign are the operator
                s.icao_airline = Some( tok.chars().take(3).collect());
                s.call_sign = Some( tok.to_string());
            }
            CS_IATA => {
                if s.call_sign.is_none() { s.call_sign = Some( tok.to_string()) }
            }
            AC_TYPE => s.icao_type = Some( tok.to_string()),
            TAIL_NO => s.livery = Some( tok.to_string()),
            FROM_IATA => from_iata = Some(tok),
            TO_IATA => to_iata = Some(tok),
            TIMESTAMP => ts_raw = parse_field("timestamp", tok),
            ALT_GEOM => {
                if let Some(ft) = parse_field::<f64>("alt_geom", tok) { s.altitude = Some( ft_to_m(ft)) }
            }
            ROLL => s.roll = parse_field("roll", tok),
            MAG_HEADING | TRUE_HEADING => {
                if let Some(hdg) = parse_field::<f32>("heading", tok) { s.heading = Some(hdg) }
            }
            NAV_QNH => qnh = parse_field("qnh", tok),
            _ => {}
        }
    }

    s.timestamp = normalize_timestamp( ts_raw, now);

    if s.altitude.is_none() {
        if let Some(alt_ft) = alt_baro_ft {
            s.altitude = Some( ft_to_m( baro_corrected_alt_ft( alt_ft, qnh)));
        }
    }

    // the feed does not report lights, assume what a pilot would do
    s.lights = Some( Lights {
        taxi: s.on_ground,
        landing: s.altitude.map( |alt| alt < ft_to_m(LANDING_LIGHTS_BELOW_FT)).unwrap_or(false),
        beacon: true,
        strobe: true,
        nav: true,
    });

    if let Some(cs) = &s.call_sign {
        if from_iata.is_some() || to_iata.is_some() {
            s.label = Some( format!("{} ({}): {} -> {}", cs, s.icao_type.as_deref().unwrap_or(""),
                                    from_iata.unwrap_or(""), to_iata.unwrap_or("")));
        }
    }

    Ok(s)
}
