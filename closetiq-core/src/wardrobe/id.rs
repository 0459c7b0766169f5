use chrono::Utc;

use closetiq_common::models::ItemId;

/// Hands out millisecond-timestamp ids.
///
/// Ids from one generator strictly increase even when several are requested
/// within the same millisecond, and never collide with an id the caller
/// reports as taken.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id at or after the current time.
    pub fn next<F>(&mut self, taken: F) -> ItemId
    where
        F: Fn(&ItemId) -> bool,
    {
        self.next_from(Utc::now().timestamp_millis(), taken)
    }

    /// Next id at or after `base` milliseconds.
    pub fn next_from<F>(&mut self, base: i64, taken: F) -> ItemId
    where
        F: Fn(&ItemId) -> bool,
    {
        let mut candidate = base.max(self.last + 1);
        loop {
            let id = ItemId::new(candidate.to_string());
            if !taken(&id) {
                self.last = candidate;
                return id;
            }
            candidate += 1;
        }
    }
}
