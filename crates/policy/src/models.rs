use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use engine::{Error, LearningModel, SharedModel};

/// Dense linear map `W·x + b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Vec<f32>,
    bias: Vec<f32>,
    in_dim: usize,
    out_dim: usize,
}

impl LinearModel {
    /// # Panics
    ///
    /// Panics when the weight or bias lengths do not match the dimensions.
    #[must_use]
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_dim: usize, out_dim: usize) -> Self {
        assert_eq!(weights.len(), in_dim * out_dim);
        assert_eq!(bias.len(), out_dim);
        Self {
            weights,
            bias,
            in_dim,
            out_dim,
        }
    }

    #[must_use]
    pub fn zeros(in_dim: usize, out_dim: usize) -> Self {
        Self::new(vec![0.0; in_dim * out_dim], vec![0.0; out_dim], in_dim, out_dim)
    }

    #[must_use]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[must_use]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    #[must_use]
    pub fn into_shared(self) -> SharedModel {
        Rc::new(RefCell::new(self))
    }
}

impl LearningModel for LinearModel {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn parameters(&self) -> Vec<f32> {
        let mut params = self.weights.clone();
        params.extend_from_slice(&self.bias);
        params
    }

    fn set_parameters(&mut self, parameters: &[f32]) -> Result<(), Error> {
        let expected = self.weights.len() + self.bias.len();
        if parameters.len() != expected {
            return Err(Error::Model(format!(
                "linear model has {expected} parameters, got {}",
                parameters.len()
            )));
        }
        let (weights, bias) = parameters.split_at(self.weights.len());
        self.weights.copy_from_slice(weights);
        self.bias.copy_from_slice(bias);
        Ok(())
    }

    fn predict(&self, input: &[f32]) -> Vec<f32> {
        let mut output = vec![0.0_f32; self.out_dim];
        for (o, out) in output.iter_mut().enumerate() {
            let mut sum = self.bias[o];
            for i in 0..self.in_dim.min(input.len()) {
                sum += self.weights[o * self.in_dim + i] * input[i];
            }
            *out = sum;
        }
        output
    }

    fn duplicate(&self) -> SharedModel {
        Rc::new(RefCell::new(self.clone()))
    }
}

/// Degenerate model whose parameter vector is the action it always predicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantModel {
    action: Vec<f32>,
}

impl ConstantModel {
    #[must_use]
    pub fn new(action: Vec<f32>) -> Self {
        Self { action }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedModel {
        Rc::new(RefCell::new(self))
    }
}

impl LearningModel for ConstantModel {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn parameters(&self) -> Vec<f32> {
        self.action.clone()
    }

    fn set_parameters(&mut self, parameters: &[f32]) -> Result<(), Error> {
        if parameters.len() != self.action.len() {
            return Err(Error::Model(format!(
                "constant model has {} parameters, got {}",
                self.action.len(),
                parameters.len()
            )));
        }
        self.action.copy_from_slice(parameters);
        Ok(())
    }

    fn predict(&self, _input: &[f32]) -> Vec<f32> {
        self.action.clone()
    }

    fn duplicate(&self) -> SharedModel {
        Rc::new(RefCell::new(self.clone()))
    }
}
