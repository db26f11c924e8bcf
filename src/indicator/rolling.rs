/// Trailing mean over a fixed number of rows, ring-buffered.
///
/// Undefined inputs occupy a slot but are skipped by the mean, and a single
/// defined observation is enough to produce a value. The mean is undefined
/// only while every slot in the window is undefined.
///
/// The mean is summed afresh from the window on every push, oldest value
/// first, so two windows holding the same values agree bit for bit and a
/// window of one repeated value returns exactly that value.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    buffer: Vec<Option<f64>>,
    head: usize,
    filled: usize,
    mean: Option<f64>,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "rolling window must be > 0");
        Self {
            window,
            buffer: vec![None; window],
            head: 0,
            filled: 0,
            mean: None,
        }
    }

    /// Push the next row's value and return the mean of the trailing window.
    pub fn push(&mut self, value: Option<f64>) -> Option<f64> {
        self.buffer[self.head] = value;
        self.head = (self.head + 1) % self.window;
        self.filled = (self.filled + 1).min(self.window);
        self.mean = self.window_mean();
        self.mean
    }

    pub fn value(&self) -> Option<f64> {
        self.mean
    }

    fn window_mean(&self) -> Option<f64> {
        // Oldest slot sits at `head` once the buffer has wrapped.
        let oldest = if self.filled == self.window { self.head } else { 0 };
        let mut first: Option<f64> = None;
        let mut constant = true;
        let mut sum = 0.0;
        let mut defined = 0u32;
        for i in 0..self.filled {
            let Some(v) = self.buffer[(oldest + i) % self.window] else {
                continue;
            };
            match first {
                None => first = Some(v),
                Some(f) => constant &= f == v,
            }
            sum += v;
            defined += 1;
        }

        match first {
            None => None,
            Some(f) if constant => Some(f),
            Some(_) => Some(sum / f64::from(defined)),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}
