//! Shared fakes for integration tests.

#![allow(dead_code)]

use bytes::Bytes;
use flight_compensation::{
    AirportConfig, AirportDirectory, AirportError, AirportRecord, AirportResult, CacheState,
    DirectoryLoader, RefreshAheadCache, RefreshPolicy, Transport,
};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Scripted transport keyed by URL.
///
/// Each URL has a queue of responses; the last one repeats once the queue is
/// down to a single entry.
#[derive(Default)]
pub struct FakeTransport {
    gets: Mutex<HashMap<String, VecDeque<AirportResult<String>>>>,
    posts: Mutex<VecDeque<AirportResult<String>>>,
    requests: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
    calls: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, url: &str, body: Value) -> Self {
        self.push_get(url, Ok(body.to_string()));
        self
    }

    pub fn on_get_raw(self, url: &str, body: &str) -> Self {
        self.push_get(url, Ok(body.to_string()));
        self
    }

    pub fn on_get_err(self, url: &str, err: AirportError) -> Self {
        self.push_get(url, Err(err));
        self
    }

    pub fn on_post(self, body: Value) -> Self {
        self.posts.lock().unwrap().push_back(Ok(body.to_string()));
        self
    }

    pub fn on_post_err(self, err: AirportError) -> Self {
        self.posts.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posted_bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    fn push_get(&self, url: &str, response: AirportResult<String>) {
        self.gets
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    fn next_from(queue: &mut VecDeque<AirportResult<String>>) -> Option<AirportResult<String>> {
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> AirportResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(url.to_string());

        let response = {
            let mut gets = self.gets.lock().unwrap();
            gets.get_mut(url).and_then(Self::next_from)
        };
        match response {
            Some(result) => result.map(Bytes::from),
            None => Err(AirportError::UpstreamUnavailable(format!("HTTP 404 for {url}"))),
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> AirportResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies.lock().unwrap().push(body.clone());

        let response = {
            let mut posts = self.posts.lock().unwrap();
            Self::next_from(&mut posts)
        };
        match response {
            Some(result) => result.map(Bytes::from),
            None => Err(AirportError::UpstreamUnavailable("no distance scripted".to_string())),
        }
    }
}

/// One listing page in the provider's JSON:API shape.
pub fn page(codes: &[&str], current: &str, next: Option<&str>, last: &str) -> Value {
    let data: Vec<Value> = codes
        .iter()
        .map(|code| {
            json!({
                "id": code,
                "type": "airport",
                "attributes": {
                    "iata": code,
                    "name": format!("{code} International"),
                    "city": format!("{code} City"),
                    "country": "Testland",
                    "latitude": "0.0",
                    "longitude": "0.0"
                }
            })
        })
        .collect();

    let mut links = json!({ "self": current, "last": last, "first": current });
    if let Some(next) = next {
        links["next"] = json!(next);
    }
    json!({ "data": data, "links": links })
}

pub fn distance_payload(km: f64) -> Value {
    json!({
        "data": {
            "id": "FRA-JFK",
            "type": "airport_distance",
            "attributes": {
                "kilometers": km,
                "miles": km * 0.621_371,
                "nautical_miles": km * 0.539_957
            }
        }
    })
}

pub fn test_config() -> AirportConfig {
    AirportConfig {
        directory_url: "https://directory.test/airports".to_string(),
        distance_url: "https://directory.test/airports/distance".to_string(),
        page_delay: Duration::from_millis(100),
        ..AirportConfig::default()
    }
}

/// Loader whose outcomes the test controls; clones share counters.
#[derive(Clone, Default)]
pub struct ScriptedLoader {
    loads: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    panicking: Arc<AtomicBool>,
    delay: Duration,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_panicking(&self, panicking: bool) {
        self.panicking.store(panicking, Ordering::SeqCst);
    }
}

impl DirectoryLoader for ScriptedLoader {
    async fn load(&self) -> AirportResult<AirportDirectory> {
        let version = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.panicking.load(Ordering::SeqCst) {
            panic!("scripted panic on load {version}");
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AirportError::UpstreamUnavailable(format!(
                "scripted failure on load {version}"
            )));
        }
        Ok(AirportDirectory::new(vec![AirportRecord::new(
            "VER",
            format!("v{version}"),
            "Versionville",
            "Testland",
        )]))
    }
}

/// Version number stamped into a directory by [`ScriptedLoader`].
pub fn version_of(directory: &AirportDirectory) -> usize {
    directory.airports()[0].name[1..].parse().unwrap()
}

pub fn day_policy() -> RefreshPolicy {
    RefreshPolicy {
        soft: DAY,
        hard: DAY * 2,
    }
}

/// Let background work run (paused clock auto-advances) until `state` shows.
pub async fn wait_for_state<L: DirectoryLoader>(cache: &RefreshAheadCache<L>, state: CacheState) {
    for _ in 0..1000 {
        if cache.state().await == state {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("cache never reached {state:?}, stuck at {:?}", cache.state().await);
}
