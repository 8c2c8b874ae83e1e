// src/calibration.rs
/// Nose depth samples collected while the user holds a good posture.
///
/// Only scalar depths are retained; the landmark sets they came from are not.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSession {
    samples: Vec<f64>,
    target: usize,
}

impl CalibrationSession {
    pub fn new(target: usize) -> Self {
        Self {
            samples: Vec::with_capacity(target),
            target,
        }
    }

    /// Records one sample. Returns the baseline once the target count is reached.
    pub fn add_sample(&mut self, depth: f64) -> Option<f64> {
        self.samples.push(depth);

        if self.is_complete() {
            self.baseline()
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.samples.len() >= self.target
    }

    /// Arithmetic mean of the buffer, only defined once the buffer is full.
    pub fn baseline(&self) -> Option<f64> {
        if !self.is_complete() || self.samples.is_empty() {
            return None;
        }

        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn collected(&self) -> usize {
        self.samples.len()
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_undefined_until_full() {
        let mut session = CalibrationSession::new(3);
        assert_eq!(session.add_sample(-0.10), None);
        assert_eq!(session.add_sample(-0.12), None);
        assert_eq!(session.baseline(), None);
        assert_eq!(session.collected(), 2);
        assert_eq!(session.samples(), &[-0.10, -0.12]);

        let baseline = session.add_sample(-0.11).unwrap();
        assert!((baseline - -0.11).abs() < 1e-9);
        assert!(session.is_complete());
    }

    #[test]
    fn test_single_sample_target() {
        let mut session = CalibrationSession::new(1);
        assert_eq!(session.add_sample(0.25), Some(0.25));
    }
}
