//! Dense feed-forward networks with a flat weight vector.
//!
//! A network is fully described by its [`NetworkShape`] and one `Vec<f32>`
//! holding every weight and bias. Keeping the parameters flat lets the genetic
//! operators in `pongevo-training` treat a network exactly like any other
//! real-valued vector.
//!
//! # Weight Layout
//!
//! Layers are stored in order. Within a layer, each output neuron stores its
//! incoming weights followed by its bias:
//!
//! ```text
//! [n0.w0, n0.w1, .., n0.bias, n1.w0, n1.w1, .., n1.bias, ..]
//! ```
//!
//! Hidden neurons use `tanh`; output neurons are linear.

use serde::{Deserialize, Serialize};

/// Errors raised when building or loading a network.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("layer {layer} has no neurons")]
    EmptyLayer { layer: usize },
    #[display("expected {expected} weights for this shape, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },
    #[display("controller needs {expected_inputs} inputs and {expected_outputs} outputs, network has {inputs} and {outputs}")]
    IncompatibleShape {
        expected_inputs: usize,
        expected_outputs: usize,
        inputs: usize,
        outputs: usize,
    },
}

/// Layer sizes of a [`FeedForwardNetwork`].
///
/// # Example
///
/// ```
/// use pongevo_controller::network::NetworkShape;
///
/// let shape = NetworkShape { inputs: 3, hidden: vec![4], outputs: 3 };
/// // (3 + 1) * 4 + (4 + 1) * 3
/// assert_eq!(shape.weight_count(), 31);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkShape {
    pub inputs: usize,
    pub hidden: Vec<usize>,
    pub outputs: usize,
}

impl Default for NetworkShape {
    fn default() -> Self {
        Self {
            inputs: 3,
            hidden: vec![4],
            outputs: 3,
        }
    }
}

impl NetworkShape {
    /// Rejects shapes with an empty layer.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EmptyLayer`] with the index of the first
    /// layer of size zero, counting the input layer as 0.
    pub fn validate(&self) -> Result<(), NetworkError> {
        let sizes = self.sizes();
        if let Some(layer) = sizes.iter().position(|&n| n == 0) {
            return Err(NetworkError::EmptyLayer { layer });
        }
        Ok(())
    }

    /// `(fan_in, fan_out)` of each weighted layer.
    pub fn layers(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let sizes = self.sizes();
        (0..sizes.len() - 1).map(move |i| (sizes[i], sizes[i + 1]))
    }

    /// Total number of weights and biases.
    #[must_use]
    pub fn weight_count(&self) -> usize {
        self.layers().map(|(fan_in, fan_out)| (fan_in + 1) * fan_out).sum()
    }

    fn sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden.len() + 2);
        sizes.push(self.inputs);
        sizes.extend_from_slice(&self.hidden);
        sizes.push(self.outputs);
        sizes
    }
}

/// A dense network with `tanh` hidden layers and a linear output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct FeedForwardNetwork {
    shape: NetworkShape,
    weights: Vec<f32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNetwork {
    shape: NetworkShape,
    weights: Vec<f32>,
}

impl TryFrom<RawNetwork> for FeedForwardNetwork {
    type Error = NetworkError;

    fn try_from(raw: RawNetwork) -> Result<Self, Self::Error> {
        Self::new(raw.shape, raw.weights)
    }
}

impl FeedForwardNetwork {
    /// Creates a network, checking that `weights` matches `shape`.
    ///
    /// # Arguments
    ///
    /// * `shape` - Layer sizes.
    /// * `weights` - Layer after layer, each neuron's incoming weights
    ///   followed by its bias. Must hold exactly [`NetworkShape::weight_count`]
    ///   values.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EmptyLayer`] for an invalid shape and
    /// [`NetworkError::WeightCountMismatch`] for a wrong number of weights.
    pub fn new(shape: NetworkShape, weights: Vec<f32>) -> Result<Self, NetworkError> {
        shape.validate()?;
        let expected = shape.weight_count();
        if weights.len() != expected {
            return Err(NetworkError::WeightCountMismatch {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self { shape, weights })
    }

    /// Creates a network whose `i`-th weight is `f(i)`.
    ///
    /// # Panics
    ///
    /// Panics if `shape` has an empty layer.
    pub fn from_fn<F>(shape: NetworkShape, f: F) -> Self
    where
        F: FnMut(usize) -> f32,
    {
        assert!(shape.validate().is_ok(), "invalid network shape: {shape:?}");
        let weights = (0..shape.weight_count()).map(f).collect();
        Self { shape, weights }
    }

    #[must_use]
    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Feeds `inputs` forward and returns the output layer.
    ///
    /// # Panics
    ///
    /// Panics if `inputs.len()` differs from the shape's input count.
    #[must_use]
    pub fn activate(&self, inputs: &[f32]) -> Vec<f32> {
        assert_eq!(inputs.len(), self.shape.inputs);
        let layer_count = self.shape.hidden.len() + 1;
        let mut values = inputs.to_vec();
        let mut offset = 0;
        for (index, (fan_in, fan_out)) in self.shape.layers().enumerate() {
            let is_output = index + 1 == layer_count;
            let mut next = Vec::with_capacity(fan_out);
            for _ in 0..fan_out {
                let neuron = &self.weights[offset..offset + fan_in + 1];
                let (weights, bias) = neuron.split_at(fan_in);
                let sum = weights.iter().zip(&values).map(|(w, v)| w * v).sum::<f32>() + bias[0];
                next.push(if is_output { sum } else { sum.tanh() });
                offset += fan_in + 1;
            }
            values = next;
        }
        values
    }
}
