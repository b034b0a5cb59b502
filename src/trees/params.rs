use crate::error::{ForestError, Result};

#[derive(Clone, Debug)]
pub struct TreeParams {
    pub epsilon: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self { epsilon: 0.0 }
    }

    /// Impurity at or below which a subset becomes a leaf.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(ForestError::InvalidEpsilon { epsilon });
        }
        self.epsilon = epsilon;
        Ok(())
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_epsilon() {
        assert_eq!(TreeParams::default().epsilon(), 0.0);
    }

    #[test]
    fn test_set_epsilon() {
        let mut params = TreeParams::new();
        params.set_epsilon(0.25).unwrap();
        assert_eq!(params.epsilon(), 0.25);
        params.set_epsilon(1.0).unwrap();
        assert_eq!(params.epsilon(), 1.0);
    }

    #[test]
    fn test_set_epsilon_out_of_range() {
        let mut params = TreeParams::new();
        for epsilon in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                params.set_epsilon(epsilon),
                Err(ForestError::InvalidEpsilon { .. })
            ));
        }
        assert_eq!(params.epsilon(), 0.0);
    }
}
