//! In-memory fakes for the conversion service (testing only)
//!
//! `LinearConversionService` answers every lookup from a per-event linear
//! curve, without any network. It can inject failures for chosen events,
//! delay chosen point values, and records every request it served.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::service::*;
use crate::Result;

const POINTS_CEILING: f64 = 1400.0;

/// Placement bonuses the reference service adds in its batch endpoint.
///
/// Mirrors the service's own table, which the domain crate also carries as
/// `CompetitionCategory::bonuses`; `rankpoints-core/tests/batch_table.rs`
/// fails if the two diverge.
const BATCH_BONUSES: &[(&str, &[i32])] = &[
    ("OW", &[375, 330, 300, 270, 250, 230, 215, 200, 130, 120, 110, 100, 95, 90, 85, 80]),
    ("DF", &[240, 210, 185, 170, 155, 145, 135, 125, 90, 80, 70, 60]),
    ("GW", &[200, 170, 150, 140, 130, 120, 110, 100, 70, 60, 50, 45]),
    ("GL", &[170, 145, 130, 120, 110, 100, 90, 80, 60, 50, 45, 40]),
    ("A", &[140, 120, 110, 100, 90, 80, 70, 60]),
    ("B", &[100, 80, 70, 60, 55, 50, 45, 40]),
    ("C", &[60, 50, 45, 40, 35, 30, 27, 25]),
    ("D", &[40, 35, 30, 25, 22, 19, 17, 15]),
    ("E", &[25, 21, 18, 15, 12, 10]),
    ("F", &[15, 10, 5]),
];

/// `performance = intercept + slope * points`.
///
/// A negative slope models timed events (more points, lower time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCurve {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearCurve {
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    fn performance(&self, points: i32) -> f64 {
        self.intercept + self.slope * f64::from(points)
    }

    fn points(&self, performance: f64) -> f64 {
        ((performance - self.intercept) / self.slope).clamp(0.0, POINTS_CEILING)
    }
}

impl Default for LinearCurve {
    fn default() -> Self {
        Self::new(0.0, 0.01)
    }
}

/// Deterministic in-memory conversion service.
#[derive(Debug, Default)]
pub struct LinearConversionService {
    curves: HashMap<String, LinearCurve>,
    failing_events: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<i32, Duration>>,
    requests: Mutex<Vec<(String, i32)>>,
    calls: AtomicUsize,
}

impl LinearConversionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `curve` for `event_type` instead of the default curve.
    pub fn with_curve(mut self, event_type: &str, curve: LinearCurve) -> Self {
        self.curves.insert(event_type.to_string(), curve);
        self
    }

    /// Make every lookup for `event_type` fail with a 500.
    pub fn fail_event(&self, event_type: &str) {
        self.failing_events
            .lock()
            .unwrap()
            .insert(event_type.to_string());
    }

    /// Delay every performance lookup for exactly `points`.
    pub fn delay_points(&self, points: i32, delay: Duration) {
        self.delays.lock().unwrap().insert(points, delay);
    }

    /// Number of service calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(event_type, points)` of every performance lookup served, in arrival order.
    pub fn performance_requests(&self) -> Vec<(String, i32)> {
        self.requests.lock().unwrap().clone()
    }

    fn curve(&self, event_type: &str) -> LinearCurve {
        self.curves.get(event_type).copied().unwrap_or_default()
    }

    fn check_failure(&self, event_type: &str) -> Result<()> {
        if self.failing_events.lock().unwrap().contains(event_type) {
            return Err(ClientError::Status {
                status: 500,
                message: format!("injected failure for {event_type}"),
            });
        }
        Ok(())
    }

    fn check_points(points: i32) -> Result<()> {
        if !(0..=POINTS_CEILING as i32).contains(&points) {
            return Err(ClientError::Status {
                status: 400,
                message: "Points must be between 0 and 1400".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ConversionService for LinearConversionService {
    async fn calculate_points(&self, request: &PointsRequest) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(&request.event_type)?;
        Ok(self.curve(&request.event_type).points(request.performance))
    }

    async fn calculate_performance(&self, request: &PerformanceRequest) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((request.event_type.clone(), request.points));

        let delay = self.delays.lock().unwrap().get(&request.points).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.check_failure(&request.event_type)?;
        Self::check_points(request.points)?;
        Ok(self.curve(&request.event_type).performance(request.points))
    }

    async fn calculate_performances_batch(
        &self,
        request: &BatchRequest,
    ) -> Result<BatchPerformances> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(&request.event_type)?;

        let curve = self.curve(&request.event_type);
        let mut results = BTreeMap::new();
        for (code, bonuses) in BATCH_BONUSES {
            let mut places = BTreeMap::new();
            for (idx, bonus) in bonuses.iter().enumerate() {
                let required = request.base_points + bonus;
                let cell = Self::check_points(required)
                    .ok()
                    .map(|_| curve.performance(required));
                places.insert(idx as u8 + 1, cell);
            }
            results.insert(code.to_string(), places);
        }
        Ok(results)
    }
}
