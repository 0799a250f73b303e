// src/main.rs
// Demo weather-station Woopsa server

use std::net::SocketAddr;
use std::os::fd::AsRawFd;
use std::thread;

use anyhow::Context;
use core_affinity::CoreId;

use woopsa::catalog::{
    Catalog, Entry, MethodThunk, PropertyBinding, SharedCell, TextValue, ValueType,
};
use woopsa::constants::DEFAULT_PATH_PREFIX;
use woopsa::server::{FallbackHandler, Server};
use woopsa::transport::{WorkerConfig, make_listener, run_worker};

// The published state. The cells are shared between the serving workers
// and whatever host code mutates them.
static TEMPERATURE: SharedCell<f32> = SharedCell::new(24.2);
static IS_RAINING: SharedCell<bool> = SharedCell::new(true);
static ALTITUDE: SharedCell<i32> = SharedCell::new(430);
static SENSITIVITY: SharedCell<f32> = SharedCell::new(0.5);
static CITY: SharedCell<TextValue> = SharedCell::new(TextValue::new(20));
static TIME_SINCE_LAST_RAIN: SharedCell<f32> = SharedCell::new(11.0);

fn get_weather() -> String {
    "sunny".to_string()
}

static ENTRIES: [Entry<'static>; 7] = [
    Entry::property_read_only("Temperature", PropertyBinding::Real(&TEMPERATURE)),
    Entry::property("IsRaining", PropertyBinding::Logical(&IS_RAINING)),
    Entry::property("Altitude", PropertyBinding::Integer(&ALTITUDE)),
    Entry::property("Sensitivity", PropertyBinding::Real(&SENSITIVITY)),
    Entry::property("City", PropertyBinding::Text(&CITY)),
    Entry::property("TimeSinceLastRain", PropertyBinding::TimeSpan(&TIME_SINCE_LAST_RAIN)),
    Entry::method("GetWeather", ValueType::Text, MethodThunk::Text(&get_weather)),
];

static CATALOG: Catalog<'static> = Catalog::new(&ENTRIES);

/// Plain page for anything outside the Woopsa prefix.
struct FrontPage;

impl FallbackHandler for FrontPage {
    fn serve(&self, path: &str, _is_post: bool, out: &mut [u8]) -> usize {
        if path != "/" {
            return 0;
        }
        let page: &[u8] = b"<html><body>Woopsa demo server. Try GET /woopsa/meta</body></html>";
        let n = page.len().min(out.len());
        out[..n].copy_from_slice(&page[..n]);
        n
    }
}

static FRONT_PAGE: FrontPage = FrontPage;

/// Main entry point - spawns one serving worker per CPU core
///
/// Each worker:
/// - Gets its own SO_REUSEPORT listener on the same address
/// - Is pinned to a dedicated CPU core
/// - Runs an independent io_uring event loop with its own engine instance
fn main() -> anyhow::Result<()> {
    let listen_addr: SocketAddr = "0.0.0.0:8000".parse().unwrap();

    CITY.with(|city| city.assign("Geneva"));

    let cores: Vec<CoreId> = core_affinity::get_core_ids().context("get_core_ids failed")?;
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(cores.len())
        .min(cores.len());

    eprintln!("Woopsa demo server");
    eprintln!("  Listen address: {listen_addr}");
    eprintln!("  Workers: {workers}");
    eprintln!("  Path prefix: {DEFAULT_PATH_PREFIX}");

    let mut handles = Vec::with_capacity(workers);
    for i in 0..workers {
        let listener = make_listener(listen_addr).context("bind listener")?;
        let core = cores[i];
        let config = WorkerConfig::default();

        let h = thread::spawn(move || {
            core_affinity::set_for_current(core);
            let mut server = Server::new(DEFAULT_PATH_PREFIX, &CATALOG, Some(&FRONT_PAGE));
            if let Err(e) = run_worker(listener.as_raw_fd(), &mut server, &config) {
                eprintln!("[worker {i}] fatal: {e}");
            }
        });
        handles.push(h);
    }

    for h in handles {
        let _ = h.join();
    }
    Ok(())
}
