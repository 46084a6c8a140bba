//! Admission bounds of the shared rate limiter under concurrent callers

use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use deploy_client::endpoint::{RateLimitOptions, RateLimiter};
use deploy_client::ClientError;
use governor::clock::FakeRelativeClock;

const THREADS: u32 = 8;
const CALLS_PER_THREAD: u32 = 25;

/// Hammer the limiter from several threads, returning how many calls got in
fn hammer(limiter: &RateLimiter<FakeRelativeClock>) -> u32 {
    let admitted = AtomicU32::new(0);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..CALLS_PER_THREAD {
                    match limiter.check() {
                        Ok(()) => {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(ClientError::RateLimited { .. }) => {}
                        Err(other) => panic!("unexpected error: {:?}", other),
                    }
                }
            });
        }
    });

    admitted.into_inner()
}

#[test]
fn test_burst_is_admitted_exactly_once() {
    let clock = FakeRelativeClock::default();
    let limiter = RateLimiter::with_clock(
        &RateLimitOptions {
            refill_interval: Duration::from_millis(100),
            burst: 10,
        },
        clock,
    )
    .unwrap();

    assert_eq!(hammer(&limiter), 10);
    assert_eq!(hammer(&limiter), 0);
}

#[test]
fn test_admissions_bounded_by_rate_and_burst() {
    let interval = Duration::from_millis(100);
    let burst = 10;
    let clock = FakeRelativeClock::default();
    let limiter = RateLimiter::with_clock(
        &RateLimitOptions {
            refill_interval: interval,
            burst,
        },
        clock.clone(),
    )
    .unwrap();

    let step = Duration::from_millis(250);
    let mut elapsed = Duration::ZERO;
    let mut total = hammer(&limiter);

    for _ in 0..12 {
        clock.advance(step);
        elapsed += step;
        total += hammer(&limiter);

        let bound = burst + (elapsed.as_millis() / interval.as_millis()) as u32;
        assert!(total <= bound, "admitted {} > bound {}", total, bound);
        assert!(total + 1 >= bound, "admitted {} well below bound {}", total, bound);
    }
}

#[test]
fn test_idle_limiter_refills_only_to_capacity() {
    let clock = FakeRelativeClock::default();
    let limiter = RateLimiter::with_clock(
        &RateLimitOptions {
            refill_interval: Duration::from_millis(100),
            burst: 5,
        },
        clock.clone(),
    )
    .unwrap();

    assert_eq!(hammer(&limiter), 5);

    clock.advance(Duration::from_secs(60));
    assert_eq!(hammer(&limiter), 5);
}
