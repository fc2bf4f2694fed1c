/// Power mode with a one-shot expiry deadline in logical milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerMode {
    deadline: Option<u64>,
}

impl PowerMode {
    /// Starts or restarts power mode. Durations do not stack.
    pub fn activate(&mut self, now: u64, duration_ms: u64) {
        self.deadline = Some(now.saturating_add(duration_ms));
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Clears power mode once `now` reaches the deadline. Returns true if it
    /// expired on this call.
    pub fn expire(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining_ms(&self, now: u64) -> u64 {
        self.deadline.map_or(0, |d| d.saturating_sub(now))
    }
}
