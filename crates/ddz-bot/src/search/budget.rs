use std::time::{Duration, Instant};

/// Wall-clock cap shared by every trial of one decision.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    start: Instant,
    time_cap: Option<Duration>,
}

impl Budget {
    pub fn new(time_cap_ms: Option<u64>) -> Self {
        Self {
            start: Instant::now(),
            time_cap: time_cap_ms.map(Duration::from_millis),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn timed_out(&self) -> bool {
        match self.time_cap {
            Some(cap) => self.start.elapsed() >= cap,
            None => false,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn utilization_percent(&self) -> u8 {
        match self.time_cap {
            Some(cap) if !cap.is_zero() => {
                let used = self.start.elapsed().as_secs_f64() / cap.as_secs_f64();
                (used * 100.0).round().clamp(0.0, 100.0) as u8
            }
            _ => 0,
        }
    }
}
