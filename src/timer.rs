use std::time::{Duration, Instant};

//Countdown over a player's cumulative response-time allowance for the
//whole match. The clock runs only while the engine is waiting on that
//player; it never refills.
pub struct Timer {
    allowance: Duration,
    remaining: Duration,
    mark: Instant,
    running: bool,
}

impl Timer {
    pub fn new(allowance: Duration) -> Timer {
        Timer {
            allowance,
            remaining: allowance,
            mark: Instant::now(),
            running: false
        }
    }
    //Remaining allowance
    pub fn time(&self) -> Duration {
        if self.running {
            self.remaining.saturating_sub(
                Instant::now().duration_since(self.mark)
            )
        } else {
            self.remaining
        }
    }
    //Allowance consumed so far; the player's total response time
    pub fn spent(&self) -> Duration {
        self.allowance - self.time()
    }
    pub fn expired(&self) -> bool {
        self.time().is_zero()
    }
    pub fn resume(&mut self) {
        if !self.running {
            self.mark = Instant::now();
            self.running = true;
        }
    }
    pub fn pause(&mut self) {
        if self.running {
            self.remaining = self.time();
            self.running = false;
        }
    }
}
