use std::sync::Arc;

use arc_swap::ArcSwap;

type Subscriber = Arc<dyn Fn() + Send + Sync>;

/// A subscription point for engine events (prepared, completion).
///
/// The subscriber list is swapped atomically so `emit` never takes a lock;
/// it is safe to fire from the audio output callback.
pub struct Signal {
    subscribers: ArcSwap<Vec<Subscriber>>,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            subscribers: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn subscribe(&self, f: impl Fn() + Send + Sync + 'static) {
        let f: Subscriber = Arc::new(f);
        self.subscribers.rcu(|subs| {
            let mut next = Vec::with_capacity(subs.len() + 1);
            next.extend(subs.iter().cloned());
            next.push(f.clone());
            next
        });
    }

    pub fn emit(&self) {
        let subs = self.subscribers.load();
        for f in subs.iter() {
            f();
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}
