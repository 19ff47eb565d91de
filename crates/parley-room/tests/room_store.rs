//! Concurrency tests for the room store, driven from real OS threads.

use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use parley_room::{RoomHandle, RoomStore};

const WRITERS: usize = 8;
const PER_WRITER: usize = 250;

#[test]
fn test_concurrent_appends_same_room_no_loss_no_duplication() {
    let store = Arc::new(RoomStore::new());
    let barrier = Arc::new(Barrier::new(WRITERS));

    let workers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_WRITER {
                    store
                        .append("general", &format!("user-{w}"), &format!("{w}:{i}"))
                        .expect("valid append");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("writer panicked");
    }

    let history = store.history("general");
    assert_eq!(history.len(), WRITERS * PER_WRITER);

    let unique: HashSet<&str> = history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(unique.len(), WRITERS * PER_WRITER, "duplicate message stored");

    // Each writer's own messages must come out in the order it sent them.
    for w in 0..WRITERS {
        let mine: Vec<usize> = history
            .iter()
            .filter(|m| m.username == format!("user-{w}"))
            .map(|m| m.text.split(':').nth(1).unwrap().parse().unwrap())
            .collect();
        assert_eq!(mine, (0..PER_WRITER).collect::<Vec<_>>());
    }

    assert!(
        history.windows(2).all(|p| p[0].timestamp <= p[1].timestamp),
        "timestamps must be non-decreasing in storage order"
    );
    assert!(history.iter().all(|m| m.room == "general"));
}

#[test]
fn test_readers_never_see_a_partial_history() {
    let store = Arc::new(RoomStore::new());
    let room = store.ensure_room("general").unwrap();

    let writer = {
        let room = room.clone();
        thread::spawn(move || {
            for i in 0..2_000 {
                room.append("alice", &i.to_string()).unwrap();
            }
        })
    };

    // Every snapshot must be a prefix 0..n with nothing missing.
    let mut last_len = 0;
    while !writer.is_finished() {
        let snapshot = store.history("general");
        assert!(snapshot.len() >= last_len, "history shrank");
        for (i, msg) in snapshot.iter().enumerate() {
            assert_eq!(msg.text, i.to_string());
        }
        last_len = snapshot.len();
    }
    writer.join().unwrap();
    assert_eq!(room.len(), 2_000);
}

#[test]
fn test_concurrent_ensure_room_yields_one_room() {
    let store = Arc::new(RoomStore::new());
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<RoomHandle> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.ensure_room("fresh").unwrap()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|t| t.join().unwrap())
        .collect();

    assert_eq!(store.room_count(), 1);
    assert!(handles.windows(2).all(|p| p[0].same_room(&p[1])));
}

#[test]
fn test_busy_room_does_not_block_other_rooms() {
    let store = Arc::new(RoomStore::new());
    let general = store.ensure_room("general").unwrap();
    let (entered_tx, entered_rx) = mpsc::channel();
    let (waiting_tx, waiting_rx) = mpsc::channel();

    // Hold general's lock until the general writer has started, then a
    // while longer.
    let holder = {
        let general = general.clone();
        thread::spawn(move || {
            general.with_history(|_| {
                entered_tx.send(()).unwrap();
                waiting_rx.recv().unwrap();
                thread::sleep(Duration::from_millis(200));
            })
        })
    };
    entered_rx.recv().unwrap();

    let start = Instant::now();
    store.append("sports", "bob", "goal").unwrap();
    let sports_latency = start.elapsed();

    let blocked = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let start = Instant::now();
            waiting_tx.send(()).unwrap();
            store.append("general", "alice", "hi").unwrap();
            start.elapsed()
        })
    };

    holder.join().unwrap();
    let general_latency = blocked.join().unwrap();

    assert!(
        sports_latency < Duration::from_millis(100),
        "append to sports waited on general: {sports_latency:?}"
    );
    assert!(
        general_latency >= Duration::from_millis(100),
        "append to general should have waited for the lock holder"
    );
    assert_eq!(store.history("general").len(), 1);
    assert_eq!(store.history("sports").len(), 1);
}
