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

use std::{net::{Ipv4Addr, SocketAddrV4, UdpSocket}, path::PathBuf, sync::{Arc, atomic::{AtomicBool, Ordering}},
          thread::{self, JoinHandle}, time::Duration};
use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use odin_traffic::{
    Gateway, IngestError, ListenConfig, TrackManager, TrafficConfig, load_config, relevance::WithinDistance
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "listen to RTTFC and XPPTraffic UDP broadcasts and print interpolated tracks")]
pub struct Args {
    /// RON config file (defaults are used if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// render frames per second
    #[arg(short,long, default_value_t = 2.0)]
    pub fps: f64,

    /// print rendered frames as JSON
    #[arg(short,long)]
    pub json: bool,

    /// observer latitude [deg], tracks beyond the configured max distance get dropped
    #[arg(long, requires = "lon")]
    pub lat: Option<f64>,

    /// observer longitude [deg]
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,
}

fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config: TrafficConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => TrafficConfig::default()
    };

    let (mut mgr, gateway) = TrackManager::new( config.clone());
    if let (Some(lat),Some(lon)) = (args.lat, args.lon) {
        mgr = mgr.with_relevance( WithinDistance::new( lat, lon, config.max_distance()));
    }

    let keep_alive = Arc::new( AtomicBool::new(true));
    {
        let keep_alive = keep_alive.clone();
        ctrlc::set_handler( move || {
            keep_alive.store( false, Ordering::Relaxed);
        })?;
    }

    let listeners = spawn_listeners( &config.listen, &gateway, &keep_alive)?;
    if listeners.is_empty() {
        warn!("no listeners enabled");
        return Ok(())
    }

    let frame_interval = Duration::from_secs_f64( 1.0 / args.fps.max(0.1));
    let maintenance_interval = chrono::TimeDelta::from_std( config.maintenance_interval)?;
    let mut next_maintenance = Utc::now();

    while keep_alive.load( Ordering::Relaxed) {
        let now = Utc::now();

        if now >= next_maintenance {
            let stats = mgr.maintain( now);
            debug!("maintenance: {stats:?}");
            next_maintenance = now + maintenance_interval;
        }

        let frames = mgr.render( now);
        if args.json {
            if !frames.is_empty() { println!("{}", serde_json::to_string( &frames)?); }
        } else {
            for frame in &frames {
                let p = &frame.state.pose;
                println!("{:06X}: {:10.5} {:11.5} {:7.0}m hdg:{:3.0} f:{:.2}{}", frame.id, p.latitude, p.longitude,
                         p.altitude_m, p.heading, frame.state.f, if frame.removable {" (removable)"} else {""});
            }
        }

        thread::sleep( frame_interval);
    }

    info!("shutting down");
    mgr.shutdown();
    for jh in listeners {
        if jh.join().is_err() { warn!("listener thread panicked") }
    }

    Ok(())
}

fn spawn_listeners (listen: &ListenConfig, gateway: &Gateway, keep_alive: &Arc<AtomicBool>)->Result<Vec<JoinHandle<()>>> {
    let mut handles = Vec::new();

    if listen.enable_broadcast {
        let socket = UdpSocket::bind( SocketAddrV4::new( Ipv4Addr::UNSPECIFIED, listen.broadcast_port))?;
        socket.set_broadcast(true)?;
        info!("listening for broadcasts on port {}", listen.broadcast_port);
        handles.push( spawn_receiver( "broadcast", socket, listen.buffer_size, gateway.clone(), keep_alive.clone())?);
    }

    if listen.enable_multicast {
        let socket = UdpSocket::bind( SocketAddrV4::new( Ipv4Addr::UNSPECIFIED, listen.multicast_port))?;
        socket.join_multicast_v4( &listen.multicast_group, &Ipv4Addr::UNSPECIFIED)?;
        info!("listening for multicast on {}:{}", listen.multicast_group, listen.multicast_port);
        handles.push( spawn_receiver( "multicast", socket, listen.buffer_size, gateway.clone(), keep_alive.clone())?);
    }

    Ok(handles)
}

/// blocking receive loop with a read timeout so that we notice when we are supposed to stop
fn spawn_receiver (name: &'static str, socket: UdpSocket, buffer_size: usize, gateway: Gateway, keep_alive: Arc<AtomicBool>)->Result<JoinHandle<()>> {
    socket.set_read_timeout( Some( Duration::from_millis(500)))?;

    let jh = thread::Builder::new().name( name.to_string()).spawn( move || {
        let mut buf = vec![0u8; buffer_size];

        while keep_alive.load( Ordering::Relaxed) {
            match socket.recv_from( &mut buf) {
                Ok((len,_)) => {
                    match gateway.submit( &buf[..len]) {
                        Ok(submission) => {
                            if submission.is_partial() { debug!("{name}: partially accepted {submission:?}") }
                        }
                        Err(IngestError::Closed) => break,
                        Err(e) => debug!("{name}: {e}")
                    }
                }
                Err(e) if matches!( e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => {}
                Err(e) => {
                    warn!("{name} receive failed: {e}");
                    break
                }
            }
        }
        debug!("{name} listener terminated");
    })?;

    Ok(jh)
}
