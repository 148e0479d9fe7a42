//! ==============================================================================
//! simulator.rs - live sensor drift simulation
//! ==============================================================================
//!
//! purpose:
//!     there is no real sensor behind this dashboard. instead a background
//!     task nudges every field of the shared reading by a small random amount
//!     every 2 seconds so the pages have something live to show.
//!
//! per tick:
//!     1. draw one uniform delta per field from its symmetric range
//!     2. add the deltas, then clamp ph to [0, 14], temperature and tds to >= 0
//!        (turbidity, cod and bod are left unclamped and may drift anywhere)
//!     3. stamp the wall-clock time
//!
//!     all three steps happen inside one store update, so readers see either
//!     the previous tick or this one.
//!
//! relationships:
//!     - writes: store.rs (the only writer)
//!     - spawned by: main.rs, stopped through a CancellationToken
//!
//! ==============================================================================

use crate::domain::{unix_now, Reading};
use crate::store::ReadingStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// time between two ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(2);

pub const PH_MIN: f64 = 0.0;
pub const PH_MAX: f64 = 14.0;

// half-widths of the symmetric drift range per field
const TEMPERATURE_DRIFT: f64 = 0.1;
const PH_DRIFT: f64 = 0.05;
const TDS_DRIFT: f64 = 2.0;
const TURBIDITY_DRIFT: f64 = 0.2;
const BOD_DRIFT: f64 = 0.3;
const COD_DRIFT: f64 = 1.0;

/// one tick's worth of per-field increments
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Deltas {
    pub temperature: f64,
    pub ph: f64,
    pub tds: f64,
    pub turbidity: f64,
    pub bod: f64,
    pub cod: f64,
}

impl Deltas {
    /// draw every delta independently and uniformly from its range
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self {
            temperature: rng.random_range(-TEMPERATURE_DRIFT..=TEMPERATURE_DRIFT),
            ph: rng.random_range(-PH_DRIFT..=PH_DRIFT),
            tds: rng.random_range(-TDS_DRIFT..=TDS_DRIFT),
            turbidity: rng.random_range(-TURBIDITY_DRIFT..=TURBIDITY_DRIFT),
            bod: rng.random_range(-BOD_DRIFT..=BOD_DRIFT),
            cod: rng.random_range(-COD_DRIFT..=COD_DRIFT),
        }
    }
}

/// apply one tick to `reading`
///
/// the timestamp never moves backwards: if the wall clock was stepped back,
/// the previous timestamp is kept.
pub fn apply(reading: &mut Reading, deltas: &Deltas, now: f64) {
    reading.temperature += deltas.temperature;
    reading.ph += deltas.ph;
    reading.tds += deltas.tds;
    reading.turbidity += deltas.turbidity;
    reading.bod += deltas.bod;
    reading.cod += deltas.cod;

    reading.ph = reading.ph.clamp(PH_MIN, PH_MAX);
    reading.temperature = reading.temperature.max(0.0);
    reading.tds = reading.tds.max(0.0);

    reading.timestamp = reading.timestamp.max(now);
}

/// owns the random source and a handle to the store it drives
pub struct Simulator<R = StdRng> {
    store: ReadingStore,
    rng: R,
    show_data: bool,
}

impl Simulator<StdRng> {
    /// simulator seeded from the operating system
    pub fn new(store: ReadingStore, show_data: bool) -> Self {
        Self::with_rng(store, StdRng::from_os_rng(), show_data)
    }
}

impl<R: Rng> Simulator<R> {
    pub fn with_rng(store: ReadingStore, rng: R, show_data: bool) -> Self {
        Self {
            store,
            rng,
            show_data,
        }
    }

    /// advance the shared reading by one tick and return the new state
    pub fn tick(&mut self) -> Reading {
        let deltas = Deltas::draw(&mut self.rng);
        let now = unix_now();
        self.store.update(|reading| {
            apply(reading, &deltas, now);
            *reading
        })
    }

    /// tick every [`TICK_INTERVAL`] until `cancel` fires
    ///
    /// the first tick happens one interval after start. the loop has no error
    /// path; cancellation is the only way out.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(interval_secs = TICK_INTERVAL.as_secs(), "simulator started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("simulator stopped");
                    return;
                }
                _ = tokio::time::sleep(TICK_INTERVAL) => {}
            }

            let r = self.tick();
            if self.show_data {
                info!(
                    temperature = r.temperature,
                    ph = r.ph,
                    tds = r.tds,
                    turbidity = r.turbidity,
                    cod = r.cod,
                    bod = r.bod,
                    "reading updated"
                );
            } else {
                debug!(timestamp = r.timestamp, "reading updated");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Reading {
        Reading::seed(1_000.0)
    }

    #[test]
    fn ph_is_clamped_to_upper_bound() {
        let mut r = seeded();
        let deltas = Deltas {
            ph: 20.0,
            ..Deltas::default()
        };

        apply(&mut r, &deltas, 1_002.0);

        assert_eq!(r.ph, 14.0);
    }

    #[test]
    fn ph_is_clamped_to_lower_bound() {
        let mut r = seeded();
        let deltas = Deltas {
            ph: -20.0,
            ..Deltas::default()
        };

        apply(&mut r, &deltas, 1_002.0);

        assert_eq!(r.ph, 0.0);
    }

    #[test]
    fn temperature_and_tds_never_go_negative() {
        let mut r = seeded();
        let deltas = Deltas {
            temperature: -100.0,
            tds: -10_000.0,
            ..Deltas::default()
        };

        apply(&mut r, &deltas, 1_002.0);

        assert_eq!(r.temperature, 0.0);
        assert_eq!(r.tds, 0.0);
    }

    #[test]
    fn turbidity_cod_and_bod_are_left_unclamped() {
        let mut r = seeded();
        let deltas = Deltas {
            turbidity: -100.0,
            cod: -100.0,
            bod: 1_000.0,
            ..Deltas::default()
        };

        apply(&mut r, &deltas, 1_002.0);

        assert!((r.turbidity - (15.2 - 100.0)).abs() < 1e-9);
        assert_eq!(r.cod, -45.0);
        assert_eq!(r.bod, 1_012.0);
    }

    #[test]
    fn every_field_moves_by_its_delta_in_one_step() {
        let mut r = seeded();
        let deltas = Deltas {
            temperature: 0.1,
            ph: -0.05,
            tds: 2.0,
            turbidity: -0.2,
            bod: 0.3,
            cod: -1.0,
        };

        apply(&mut r, &deltas, 1_002.0);

        assert!((r.temperature - 29.6).abs() < 1e-9);
        assert!((r.ph - 5.75).abs() < 1e-9);
        assert_eq!(r.tds, 752.0);
        assert!((r.turbidity - 15.0).abs() < 1e-9);
        assert!((r.bod - 12.3).abs() < 1e-9);
        assert_eq!(r.cod, 54.0);
        assert_eq!(r.timestamp, 1_002.0);
    }

    #[test]
    fn timestamp_does_not_move_backwards() {
        let mut r = seeded();

        apply(&mut r, &Deltas::default(), 500.0);

        assert_eq!(r.timestamp, 1_000.0);
    }

    #[test]
    fn drawn_deltas_stay_within_their_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let d = Deltas::draw(&mut rng);
            assert!(d.temperature.abs() <= TEMPERATURE_DRIFT);
            assert!(d.ph.abs() <= PH_DRIFT);
            assert!(d.tds.abs() <= TDS_DRIFT);
            assert!(d.turbidity.abs() <= TURBIDITY_DRIFT);
            assert!(d.bod.abs() <= BOD_DRIFT);
            assert!(d.cod.abs() <= COD_DRIFT);
        }
    }

    #[test]
    fn ticks_near_the_bounds_keep_invariants() {
        let start = Reading {
            temperature: 0.05,
            tds: 1.0,
            ph: 0.02,
            ..seeded()
        };
        let store = ReadingStore::new(start);
        let mut sim = Simulator::with_rng(store.clone(), StdRng::seed_from_u64(7), false);

        let mut prev = store.read();
        for _ in 0..10_000 {
            let r = sim.tick();
            assert_eq!(r, store.read());
            assert!((PH_MIN..=PH_MAX).contains(&r.ph), "ph out of range: {}", r.ph);
            assert!(r.temperature >= 0.0);
            assert!(r.tds >= 0.0);
            assert!(r.timestamp >= prev.timestamp);
            prev = r;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_fires_after_one_interval() {
        let store = ReadingStore::new(seeded());
        let cancel = CancellationToken::new();
        let sim = Simulator::with_rng(store.clone(), StdRng::seed_from_u64(1), false);
        let handle = tokio::spawn(sim.run(cancel.clone()));

        tokio::time::sleep(TICK_INTERVAL - Duration::from_millis(100)).await;
        assert_eq!(store.read(), seeded());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let after = store.read();
        assert_ne!(after, seeded());
        assert!(after.timestamp >= seeded().timestamp);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_loop() {
        let store = ReadingStore::new(seeded());
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Simulator::new(store.clone(), true).run(cancel.clone()));

        tokio::time::sleep(TICK_INTERVAL * 3 + Duration::from_millis(10)).await;
        cancel.cancel();
        handle.await.unwrap();

        let frozen = store.read();
        tokio::time::sleep(TICK_INTERVAL * 3).await;
        assert_eq!(store.read(), frozen);
    }
}
