//! Integration tests for the stopwatch tick task.
//!
//! These run on tokio's paused clock with `TokioTimeSource`, so sleeping
//! advances virtual time and the tick task fires on schedule without any
//! real waiting.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, Duration};

use timeit::{
    EventForwarder, MockDisplaySink, MockTickListener, Phase, Stopwatch, StopwatchConfig,
    StopwatchEvent, StopwatchSnapshot, TimerError, TokioTimeSource,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates a stopwatch on tokio's clock with the given tick interval.
fn create_stopwatch(
    tick_interval_ms: u64,
) -> (Stopwatch, Arc<MockTickListener>, Arc<MockDisplaySink>) {
    let config = StopwatchConfig::default().with_tick_interval_ms(tick_interval_ms);
    let stopwatch = Stopwatch::with_config(config)
        .unwrap()
        .with_time_source(Arc::new(TokioTimeSource::new()));
    let listener = Arc::new(MockTickListener::new());
    let display = Arc::new(MockDisplaySink::new());
    stopwatch.set_listener(Some(listener.clone()));
    stopwatch.set_display(Some(display.clone()));
    (stopwatch, listener, display)
}

// ============================================================================
// Ticking
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_ticks_follow_interval() {
    let (stopwatch, listener, display) = create_stopwatch(100);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(1_000)).await;

    // Immediate first tick plus one per 100 ms; the tick due at exactly
    // 1000 ms may or may not have run yet.
    let ticks = listener.tick_count();
    assert!((10..=11).contains(&ticks), "unexpected tick count {ticks}");
    assert_eq!(display.count(), ticks);

    let snapshots = listener.ticks();
    assert_eq!(snapshots[0].elapsed_ms, 0);
    assert!(snapshots.windows(2).all(|w| w[0].elapsed_ms <= w[1].elapsed_ms));
    assert!(snapshots.iter().all(|s| s.phase == Phase::Running));

    stopwatch.stop().unwrap();
    assert_eq!(stopwatch.elapsed_ms(), 1_000);
}

#[tokio::test(start_paused = true)]
async fn test_display_shows_formatted_elapsed() {
    let (stopwatch, _listener, display) = create_stopwatch(250);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(600)).await;

    let lines = display.lines();
    assert_eq!(lines[0], "00.00");
    assert_eq!(lines[1], "00.25");
    assert_eq!(lines[2], "00.50");
    stopwatch.stop().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_after_stop() {
    let (stopwatch, listener, _display) = create_stopwatch(100);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(450)).await;
    stopwatch.stop().unwrap();

    let ticks = listener.tick_count();
    sleep(Duration::from_millis(2_000)).await;
    assert_eq!(listener.tick_count(), ticks);
    assert_eq!(stopwatch.elapsed_ms(), 450);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_last_handle_ends_ticking() {
    let (stopwatch, listener, _display) = create_stopwatch(100);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(250)).await;
    drop(stopwatch);

    let ticks = listener.tick_count();
    sleep(Duration::from_millis(1_000)).await;
    assert_eq!(listener.tick_count(), ticks);
}

#[tokio::test(start_paused = true)]
async fn test_events_through_channel() {
    let (stopwatch, _listener, _display) = create_stopwatch(100);
    let (forwarder, mut events) = EventForwarder::<StopwatchEvent>::channel();
    stopwatch.set_listener(Some(Arc::new(forwarder)));

    stopwatch.start().unwrap();

    let mut received = Vec::new();
    for _ in 0..3 {
        received.push(events.recv().await.unwrap());
    }
    assert_eq!(
        received,
        vec![
            StopwatchEvent::Tick { elapsed_ms: 0, lap_ms: 0 },
            StopwatchEvent::Tick { elapsed_ms: 100, lap_ms: 100 },
            StopwatchEvent::Tick { elapsed_ms: 200, lap_ms: 200 },
        ]
    );

    // A split starts a new lap; the next event shows it.
    let split = stopwatch.split().unwrap();
    assert_eq!((split.split_ms, split.lap_ms), (200, 200));
    assert_eq!(
        events.recv().await.unwrap(),
        StopwatchEvent::Tick { elapsed_ms: 300, lap_ms: 100 }
    );

    stopwatch.stop().unwrap();
    sleep(Duration::from_millis(500)).await;
    assert!(events.try_recv().is_err(), "no events after stop");
}

// ============================================================================
// Pause / Resume
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_pause_excludes_interval() {
    let (stopwatch, listener, _display) = create_stopwatch(100);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(350)).await;
    stopwatch.pause().unwrap();
    assert_eq!(stopwatch.elapsed_ms(), 350);

    let ticks = listener.tick_count();
    sleep(Duration::from_millis(1_000)).await;
    assert_eq!(listener.tick_count(), ticks, "no ticks while paused");
    assert_eq!(stopwatch.elapsed_ms(), 350);

    stopwatch.resume().unwrap();
    sleep(Duration::from_millis(250)).await;
    stopwatch.stop().unwrap();

    assert_eq!(stopwatch.elapsed_ms(), 600);
    assert_eq!(stopwatch.phase(), Phase::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_stop_while_paused_keeps_paused_totals() {
    let (stopwatch, _listener, _display) = create_stopwatch(100);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(300)).await;
    stopwatch.pause().unwrap();
    sleep(Duration::from_millis(5_000)).await;
    stopwatch.stop().unwrap();

    assert_eq!(stopwatch.elapsed_ms(), 300);
}

// ============================================================================
// Splits
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_splits_and_laps() {
    let (stopwatch, _listener, _display) = create_stopwatch(100);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(1_000)).await;
    let first = stopwatch.split().unwrap();
    sleep(Duration::from_millis(1_500)).await;
    let second = stopwatch.split().unwrap();

    assert_eq!((first.split_ms, first.lap_ms), (1_000, 1_000));
    assert_eq!((second.split_ms, second.lap_ms), (2_500, 1_500));
    assert_eq!(stopwatch.splits(), vec![first, second]);

    stopwatch.stop().unwrap();
    assert_eq!(stopwatch.splits().len(), 2, "splits survive stop");
}

#[tokio::test(start_paused = true)]
async fn test_split_while_paused_has_empty_lap() {
    let (stopwatch, _listener, _display) = create_stopwatch(100);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(400)).await;
    stopwatch.pause().unwrap();
    stopwatch.split().unwrap();
    let split = stopwatch.split().unwrap();

    assert_eq!(split.split_ms, 400);
    assert_eq!(split.lap_ms, 0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_resets_session() {
    let (stopwatch, _listener, _display) = create_stopwatch(100);

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(700)).await;
    stopwatch.split().unwrap();
    stopwatch.stop().unwrap();

    stopwatch.start().unwrap();
    assert_eq!(stopwatch.elapsed_ms(), 0);
    assert_eq!(stopwatch.lap_ms(), 0);
    assert!(stopwatch.splits().is_empty());

    sleep(Duration::from_millis(200)).await;
    stopwatch.stop().unwrap();
    assert_eq!(stopwatch.elapsed_ms(), 200);
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_invalid_transitions_leave_state_alone() {
    let (stopwatch, _listener, _display) = create_stopwatch(100);

    assert!(stopwatch.stop().unwrap_err().is_invalid_state());
    assert!(stopwatch.split().unwrap_err().is_invalid_state());

    stopwatch.start().unwrap();
    sleep(Duration::from_millis(100)).await;
    assert!(stopwatch.start().unwrap_err().is_invalid_state());
    assert!(stopwatch.resume().unwrap_err().is_invalid_state());
    assert_eq!(stopwatch.phase(), Phase::Running);
    stopwatch.stop().unwrap();
}

#[test]
fn test_start_outside_runtime_is_rejected() {
    let stopwatch = Stopwatch::new();
    let err = stopwatch.start().unwrap_err();
    assert!(matches!(err, TimerError::SchedulerUnavailable(_)));
    assert_eq!(stopwatch.phase(), Phase::Stopped);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_control_and_ticks() {
    let config = StopwatchConfig::default().with_tick_interval_ms(1);
    let stopwatch = Stopwatch::with_config(config).unwrap();
    let violated = Arc::new(AtomicBool::new(false));
    let ticks = Arc::new(AtomicUsize::new(0));

    {
        let violated = violated.clone();
        let ticks = ticks.clone();
        stopwatch.set_listener(Some(Arc::new(
            move |_: &Stopwatch, snapshot: &StopwatchSnapshot| {
                ticks.fetch_add(1, Ordering::SeqCst);
                if snapshot.lap_ms > snapshot.elapsed_ms || snapshot.phase != Phase::Running {
                    violated.store(true, Ordering::SeqCst);
                }
            },
        )));
    }

    let mut handles = Vec::new();
    for worker in 0..4u64 {
        let stopwatch = stopwatch.clone();
        handles.push(tokio::spawn(async move {
            for step in 0..200u64 {
                // Errors are expected: workers race each other's transitions.
                let _ = match (worker + step) % 5 {
                    0 => stopwatch.start(),
                    1 => stopwatch.pause(),
                    2 => stopwatch.resume(),
                    3 => stopwatch.split().map(|_| ()),
                    _ => stopwatch.stop(),
                };
                let snapshot = stopwatch.snapshot();
                assert!(snapshot.lap_ms <= snapshot.elapsed_ms);
                tokio::task::yield_now().await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    if stopwatch.is_started() {
        stopwatch.stop().unwrap();
    }
    assert_eq!(stopwatch.phase(), Phase::Stopped);
    assert!(!violated.load(Ordering::SeqCst));

    // Let a tick that was already past the lock finish its callback.
    sleep(Duration::from_millis(20)).await;
    let after_stop = ticks.load(Ordering::SeqCst);
    sleep(Duration::from_millis(20)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
}
