use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;

use super::collector::Collector;
use crate::event::Event;

/// The periodic producer: a dedicated thread that owns the collector,
/// wakes on a fixed period, and hands each result to the UI loop through
/// the event channel. Collector calls block only this thread.
///
/// There is exactly one sampler, so snapshots always arrive in production
/// order. No timeout bounds an individual collect; a slow call delays the
/// next sample, never input handling.
pub struct Sampler {
    shutdown: Arc<AtomicBool>,
}

impl Sampler {
    pub fn spawn(
        mut collector: Collector,
        period: Duration,
        tx: UnboundedSender<Event>,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        // Detached on purpose: the thread exits on its own once the flag
        // is set or the channel closes.
        let _handle = thread::Builder::new().name("sampler".into()).spawn(move || {
            let mut next_tick = Instant::now() + period;
            loop {
                // Sleep in short slices so a quit is noticed promptly.
                while Instant::now() < next_tick {
                    if flag.load(Ordering::Relaxed) {
                        return;
                    }
                    let remaining = next_tick.saturating_duration_since(Instant::now());
                    thread::sleep(remaining.min(Duration::from_millis(50)));
                }
                // Fixed schedule, independent of how long collect takes.
                next_tick += period;

                if flag.load(Ordering::Relaxed) {
                    return;
                }
                let event = match collector.collect() {
                    Ok(snapshot) => Event::Sample(Box::new(snapshot)),
                    Err(err) => Event::SampleFailed(err.to_string()),
                };
                // A closed channel means the UI loop is gone; the result
                // of an in-flight collect is simply discarded.
                if tx.send(event).is_err() {
                    return;
                }
            }
        })?;

        Ok(Self { shutdown })
    }

    /// Stop the timer. The thread exits at its next wake-up; anything it
    /// was still collecting is dropped on send.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}
