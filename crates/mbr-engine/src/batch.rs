//! Parallel batch generation with reproducible output.
//!
//! Events are split over scoped worker threads. Worker `w` draws from
//! [`worker_stream`]`(seed, w)` only, and the collector orders results by
//! `(worker, sequence)`, so a batch is identical however the threads are
//! scheduled. Results travel to the collector over a bounded crossbeam
//! channel.

use std::thread;

use crossbeam_channel::Sender;
use mbr_core::{worker_stream, Event, GenerateError};

use crate::generator::EventGenerator;
use crate::metrics::GenerationStats;

/// Channel capacity between workers and the collector.
const CHANNEL_CAPACITY: usize = 64;

/// An event slot whose every regeneration attempt was abandoned.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchFailure {
    /// Worker that owned the slot.
    pub worker: usize,
    /// Position of the slot in that worker's share.
    pub sequence: usize,
    /// Error of the last attempt.
    pub error: GenerateError,
}

/// Result of [`generate_batch`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchOutput {
    /// Completed events, ordered by worker then sequence.
    pub events: Vec<Event>,
    /// Slots that produced no event, in the same order.
    pub failed: Vec<BatchFailure>,
    /// Statistics merged over all workers.
    pub stats: GenerationStats,
}

enum WorkerMessage {
    Slot {
        worker: usize,
        sequence: usize,
        result: Result<Event, GenerateError>,
    },
    Done(GenerationStats),
}

/// Number of events assigned to `worker`: an equal share, with the
/// remainder going to the lowest-numbered workers.
pub fn worker_share(events: usize, workers: usize, worker: usize) -> usize {
    let workers = workers.max(1);
    events / workers + usize::from(worker < events % workers)
}

/// Generate `events` events on `workers` threads (at least one).
///
/// Each slot is filled with [`EventGenerator::next_event`]; a slot whose
/// attempts are all abandoned is reported in [`BatchOutput::failed`].
pub fn generate_batch(generator: &EventGenerator, seed: u64, workers: usize, events: usize) -> BatchOutput {
    let workers = workers.max(1);
    let (tx, rx) = crossbeam_channel::bounded(CHANNEL_CAPACITY);

    let mut slots: Vec<(usize, usize, Result<Event, GenerateError>)> = Vec::with_capacity(events);
    let mut stats = GenerationStats::default();

    thread::scope(|scope| {
        for worker in 0..workers {
            let tx = tx.clone();
            let share = worker_share(events, workers, worker);
            scope.spawn(move || run_worker(generator, seed, worker, share, tx));
        }
        drop(tx);

        while let Ok(msg) = rx.recv() {
            match msg {
                WorkerMessage::Slot {
                    worker,
                    sequence,
                    result,
                } => slots.push((worker, sequence, result)),
                WorkerMessage::Done(worker_stats) => stats.merge(&worker_stats),
            }
        }
    });

    slots.sort_by_key(|&(worker, sequence, _)| (worker, sequence));
    let mut output = BatchOutput {
        events: Vec::with_capacity(slots.len()),
        failed: Vec::new(),
        stats,
    };
    for (worker, sequence, result) in slots {
        match result {
            Ok(event) => output.events.push(event),
            Err(error) => output.failed.push(BatchFailure {
                worker,
                sequence,
                error,
            }),
        }
    }

    tracing::info!(
        "Batch of {} events on {} workers: {} completed, {} failed",
        events,
        workers,
        output.events.len(),
        output.failed.len()
    );
    output
}

fn run_worker(generator: &EventGenerator, seed: u64, worker: usize, share: usize, tx: Sender<WorkerMessage>) {
    let mut rng = worker_stream(seed, worker as u64);
    let mut stats = GenerationStats::default();
    for sequence in 0..share {
        let result = generator.next_event(&mut rng, &mut stats);
        // Receiver gone; nobody is collecting.
        if tx
            .send(WorkerMessage::Slot {
                worker,
                sequence,
                result,
            })
            .is_err()
        {
            return;
        }
    }
    // Receiver gone; nobody is collecting.
    let _ = tx.send(WorkerMessage::Done(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::run_fingerprint;
    use mbr_test_utils::legacy_config;
    use mbr_xsec::ProcessSet;
    use proptest::prelude::*;

    fn generator() -> EventGenerator {
        EventGenerator::new(legacy_config(ProcessSet::ALL)).unwrap()
    }

    #[test]
    fn batch_is_reproducible() {
        let g = generator();
        let a = generate_batch(&g, 7, 3, 30);
        let b = generate_batch(&g, 7, 3, 30);
        assert_eq!(a.events.len() + a.failed.len(), 30);
        assert_eq!(run_fingerprint(&a.events), run_fingerprint(&b.events));
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn batch_matches_sequential_worker_streams() {
        let g = generator();
        let batch = generate_batch(&g, 11, 2, 8);
        let mut expected = Vec::new();
        for worker in 0..2 {
            let mut rng = worker_stream(11, worker as u64);
            let mut stats = GenerationStats::default();
            for _ in 0..worker_share(8, 2, worker) {
                expected.push(g.next_event(&mut rng, &mut stats).unwrap());
            }
        }
        assert_eq!(batch.events, expected);
    }

    #[test]
    fn batch_stats_merge_every_worker() {
        let g = generator();
        let batch = generate_batch(&g, 13, 3, 10);
        let mut expected = GenerationStats::default();
        for worker in 0..3 {
            let mut rng = worker_stream(13, worker as u64);
            let mut stats = GenerationStats::default();
            for _ in 0..worker_share(10, 3, worker) {
                let _ = g.next_event(&mut rng, &mut stats);
            }
            expected.merge(&stats);
        }
        assert_eq!(batch.stats, expected);
        assert_eq!(batch.stats.completed_total(), batch.events.len() as u64);
    }

    #[test]
    fn zero_workers_runs_one() {
        let g = generator();
        let batch = generate_batch(&g, 1, 0, 4);
        assert_eq!(batch.events.len(), 4);
        assert_eq!(batch.stats.completed_total(), 4);
    }

    #[test]
    fn empty_batch() {
        let batch = generate_batch(&generator(), 1, 4, 0);
        assert!(batch.events.is_empty() && batch.failed.is_empty());
        assert_eq!(batch.stats.attempted, 0);
    }

    proptest! {
        #[test]
        fn shares_cover_every_event(events in 0usize..1000, workers in 1usize..17) {
            let shares: Vec<_> = (0..workers).map(|w| worker_share(events, workers, w)).collect();
            prop_assert_eq!(shares.iter().sum::<usize>(), events);
            let max = shares.iter().max().copied().unwrap_or(0);
            let min = shares.iter().min().copied().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }
}
