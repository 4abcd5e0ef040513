use crate::brain::{Brain, INPUT_COUNT};
use crate::error::ModelError;
use rand::Rng;
use serde::{Deserialize, Serialize};

const HIDDEN_SIZE: usize = 6;
const OUTPUT_SIZE: usize = 1;

/// A small feedforward network deciding when to flap.
/// Architecture: 3 inputs -> 6 hidden neurons (tanh) -> 1 output (sigmoid)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeuralNetwork {
    // Weights from input (3) to hidden layer (6): 3 * 6 = 18 weights
    weights_input_hidden: Vec<f32>,
    // Biases for hidden layer: 6 biases
    biases_hidden: Vec<f32>,
    // Weights from hidden (6) to output layer (1): 6 weights
    weights_hidden_output: Vec<f32>,
    // Bias for the output neuron
    biases_output: Vec<f32>,
}

impl NeuralNetwork {
    /// Creates a new neural network with random weights.
    pub fn new_random<R: Rng>(rng: &mut R) -> Self {
        // Xavier initialization for better training
        let input_hidden_scale = (2.0 / INPUT_COUNT as f32).sqrt();
        let hidden_output_scale = (2.0 / HIDDEN_SIZE as f32).sqrt();

        let weights_input_hidden: Vec<f32> = (0..INPUT_COUNT * HIDDEN_SIZE)
            .map(|_| rng.random_range(-input_hidden_scale..input_hidden_scale))
            .collect();

        let biases_hidden: Vec<f32> = (0..HIDDEN_SIZE)
            .map(|_| rng.random_range(-0.1..0.1))
            .collect();

        let weights_hidden_output: Vec<f32> = (0..HIDDEN_SIZE * OUTPUT_SIZE)
            .map(|_| rng.random_range(-hidden_output_scale..hidden_output_scale))
            .collect();

        let biases_output: Vec<f32> = (0..OUTPUT_SIZE)
            .map(|_| rng.random_range(-0.1..0.1))
            .collect();

        NeuralNetwork {
            weights_input_hidden,
            biases_hidden,
            weights_hidden_output,
            biases_output,
        }
    }

    /// Creates a neural network from a flat weight vector (genome).
    pub fn from_weights(weights: &[f32]) -> Result<Self, ModelError> {
        let expected = Self::weight_count();
        if weights.len() != expected {
            return Err(ModelError::Shape {
                expected,
                actual: weights.len(),
            });
        }

        let (weights_input_hidden, rest) = weights.split_at(INPUT_COUNT * HIDDEN_SIZE);
        let (biases_hidden, rest) = rest.split_at(HIDDEN_SIZE);
        let (weights_hidden_output, biases_output) = rest.split_at(HIDDEN_SIZE * OUTPUT_SIZE);

        Ok(NeuralNetwork {
            weights_input_hidden: weights_input_hidden.to_vec(),
            biases_hidden: biases_hidden.to_vec(),
            weights_hidden_output: weights_hidden_output.to_vec(),
            biases_output: biases_output.to_vec(),
        })
    }

    /// Converts the network weights to a flat vector (genome) for evolution.
    pub fn to_weights(&self) -> Vec<f32> {
        let mut weights = Vec::with_capacity(Self::weight_count());
        weights.extend_from_slice(&self.weights_input_hidden);
        weights.extend_from_slice(&self.biases_hidden);
        weights.extend_from_slice(&self.weights_hidden_output);
        weights.extend_from_slice(&self.biases_output);
        weights
    }

    /// Returns the expected size of the weight vector.
    pub fn weight_count() -> usize {
        INPUT_COUNT * HIDDEN_SIZE + HIDDEN_SIZE + HIDDEN_SIZE * OUTPUT_SIZE + OUTPUT_SIZE
    }

    /// Checks layer sizes, e.g. after deserializing a hand-edited file.
    pub fn validate(&self) -> Result<(), ModelError> {
        let actual = self.weights_input_hidden.len()
            + self.biases_hidden.len()
            + self.weights_hidden_output.len()
            + self.biases_output.len();
        let shaped = self.weights_input_hidden.len() == INPUT_COUNT * HIDDEN_SIZE
            && self.biases_hidden.len() == HIDDEN_SIZE
            && self.weights_hidden_output.len() == HIDDEN_SIZE * OUTPUT_SIZE
            && self.biases_output.len() == OUTPUT_SIZE;
        if shaped {
            Ok(())
        } else {
            Err(ModelError::Shape {
                expected: Self::weight_count(),
                actual,
            })
        }
    }

    /// Forward propagation: input -> hidden -> output
    pub fn forward(&self, inputs: &[f32; INPUT_COUNT]) -> f32 {
        let mut hidden = [0.0f32; HIDDEN_SIZE];
        for (h, value) in hidden.iter_mut().enumerate() {
            let mut sum = self.biases_hidden[h];
            for (i, input) in inputs.iter().enumerate() {
                sum += input * self.weights_input_hidden[i * HIDDEN_SIZE + h];
            }
            *value = sum.tanh();
        }

        let mut sum = self.biases_output[0];
        for (h, value) in hidden.iter().enumerate() {
            sum += value * self.weights_hidden_output[h * OUTPUT_SIZE];
        }
        // Sigmoid so the jump threshold sits in the middle of the range
        1.0 / (1.0 + (-sum).exp())
    }

    /// Uniform crossover: each weight comes from either parent with equal odds.
    pub fn crossover<R: Rng>(a: &NeuralNetwork, b: &NeuralNetwork, rng: &mut R) -> Self {
        let pick = |x: &[f32], y: &[f32], rng: &mut R| -> Vec<f32> {
            x.iter()
                .zip(y)
                .map(|(&p1, &p2)| if rng.random_bool(0.5) { p1 } else { p2 })
                .collect()
        };

        NeuralNetwork {
            weights_input_hidden: pick(&a.weights_input_hidden, &b.weights_input_hidden, rng),
            biases_hidden: pick(&a.biases_hidden, &b.biases_hidden, rng),
            weights_hidden_output: pick(&a.weights_hidden_output, &b.weights_hidden_output, rng),
            biases_output: pick(&a.biases_output, &b.biases_output, rng),
        }
    }

    /// Nudges each weight with probability `rate` by up to `strength`,
    /// then clamps it to `[-clamp, clamp]`.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R, rate: f32, strength: f32, clamp: f32) {
        let layers = [
            &mut self.weights_input_hidden,
            &mut self.biases_hidden,
            &mut self.weights_hidden_output,
            &mut self.biases_output,
        ];
        for layer in layers {
            for weight in layer.iter_mut() {
                if rng.random::<f32>() < rate {
                    *weight += rng.random_range(-strength..strength);
                    *weight = weight.clamp(-clamp, clamp);
                }
            }
        }
    }
}

impl Brain for NeuralNetwork {
    fn activate(&self, inputs: &[f32; INPUT_COUNT]) -> f32 {
        self.forward(inputs)
    }
}
