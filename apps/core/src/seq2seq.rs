//! Encoder/decoder recurrent network topology for learned dialogue generation.
//!
//! Declares layer shapes, the compile settings and the training invocation.
//! There is no numeric backend here: the topology can be inspected,
//! checked against dataset shapes and saved, not trained.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::preprocessing::split::validation_len;

/// Where `save` writes when the caller has no preference.
pub const DEFAULT_MODEL_PATH: &str = "s2s.json";

/// Network dimensions and training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Seq2SeqConfig {
    /// One-hot width of encoder input tokens
    #[validate(range(min = 1))]
    pub num_encoder_tokens: usize,
    /// One-hot width of decoder input and output tokens
    #[validate(range(min = 1))]
    pub num_decoder_tokens: usize,
    /// Hidden state size of both LSTMs
    #[validate(range(min = 1))]
    pub latent_dim: usize,
    #[validate(range(min = 1))]
    pub batch_size: usize,
    #[validate(range(min = 1))]
    pub epochs: usize,
    /// Fraction of samples held out for validation
    #[validate(range(min = 0.0, exclusive_max = 1.0))]
    pub validation_split: f64,
}

impl Default for Seq2SeqConfig {
    fn default() -> Self {
        Self {
            num_encoder_tokens: 71,
            num_decoder_tokens: 93,
            latent_dim: 256,
            batch_size: 64,
            epochs: 100,
            validation_split: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Softmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimizer {
    RmsProp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    CategoricalCrossentropy,
}

/// One node of the declared graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    /// Variable-length sequence of one-hot vectors: `(batch, None, features)`
    Input { name: String, features: usize },
    Lstm {
        name: String,
        input: String,
        units: usize,
        input_features: usize,
        return_sequences: bool,
        return_state: bool,
        /// Layer whose final `[h, c]` states seed this one
        initial_state_from: Option<String>,
    },
    Dense {
        name: String,
        input: String,
        units: usize,
        input_features: usize,
        activation: Activation,
    },
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Input { name, .. } | Layer::Lstm { name, .. } | Layer::Dense { name, .. } => {
                name
            }
        }
    }

    /// Trainable weights, biases included.
    pub fn parameter_count(&self) -> usize {
        match self {
            Layer::Input { .. } => 0,
            Layer::Lstm {
                units,
                input_features,
                ..
            } => 4 * (units * (input_features + units) + units),
            Layer::Dense {
                units,
                input_features,
                ..
            } => units * input_features + units,
        }
    }

    /// Output shape without the batch axis; `None` marks a variable time axis.
    pub fn output_shape(&self) -> Vec<Option<usize>> {
        match self {
            Layer::Input { features, .. } => vec![None, Some(*features)],
            Layer::Lstm {
                units,
                return_sequences,
                ..
            } => {
                if *return_sequences {
                    vec![None, Some(*units)]
                } else {
                    vec![Some(*units)]
                }
            }
            Layer::Dense { units, .. } => vec![None, Some(*units)],
        }
    }
}

/// Shapes `(samples, timesteps, features)` of the three training arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataShapes {
    pub encoder_input: [usize; 3],
    pub decoder_input: [usize; 3],
    pub decoder_target: [usize; 3],
}

/// The declared training invocation for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitPlan {
    pub train_samples: usize,
    pub validation_samples: usize,
    pub steps_per_epoch: usize,
    pub epochs: usize,
    pub batch_size: usize,
}

/// Declared encoder/decoder graph with its compile settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seq2SeqModel {
    pub config: Seq2SeqConfig,
    pub layers: Vec<Layer>,
    pub optimizer: Optimizer,
    pub loss: Loss,
}

impl Seq2SeqModel {
    /// Declares the graph: encoder LSTM states seed the decoder LSTM, whose
    /// sequence output feeds a softmax over decoder tokens.
    pub fn build(config: Seq2SeqConfig) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::Validation(format!("invalid seq2seq config: {}", e)))?;

        let layers = vec![
            Layer::Input {
                name: "encoder_inputs".to_string(),
                features: config.num_encoder_tokens,
            },
            Layer::Lstm {
                name: "encoder_lstm".to_string(),
                input: "encoder_inputs".to_string(),
                units: config.latent_dim,
                input_features: config.num_encoder_tokens,
                return_sequences: false,
                return_state: true,
                initial_state_from: None,
            },
            Layer::Input {
                name: "decoder_inputs".to_string(),
                features: config.num_decoder_tokens,
            },
            Layer::Lstm {
                name: "decoder_lstm".to_string(),
                input: "decoder_inputs".to_string(),
                units: config.latent_dim,
                input_features: config.num_decoder_tokens,
                return_sequences: true,
                return_state: true,
                initial_state_from: Some("encoder_lstm".to_string()),
            },
            Layer::Dense {
                name: "decoder_dense".to_string(),
                input: "decoder_lstm".to_string(),
                units: config.num_decoder_tokens,
                input_features: config.latent_dim,
                activation: Activation::Softmax,
            },
        ];

        Ok(Self {
            config,
            layers,
            optimizer: Optimizer::RmsProp,
            loss: Loss::CategoricalCrossentropy,
        })
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    /// Shape of the model output: `(None, num_decoder_tokens)` per sample.
    pub fn output_shape(&self) -> Vec<Option<usize>> {
        self.layers
            .last()
            .map(Layer::output_shape)
            .unwrap_or_default()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    /// Tabular description of every layer.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<16} {:<8} {:<16} {:>10}", "Layer", "Kind", "Output", "Params");
        for layer in &self.layers {
            let kind = match layer {
                Layer::Input { .. } => "Input",
                Layer::Lstm { .. } => "LSTM",
                Layer::Dense { .. } => "Dense",
            };
            let shape = layer
                .output_shape()
                .iter()
                .map(|d| d.map_or_else(|| "None".to_string(), |v| v.to_string()))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "{:<16} {:<8} {:<16} {:>10}",
                layer.name(),
                kind,
                format!("({})", shape),
                layer.parameter_count()
            );
        }
        let _ = writeln!(out, "Total params: {}", self.parameter_count());
        out
    }

    /// Checks dataset shapes against the topology and returns the training plan.
    pub fn fit_plan(&self, shapes: &DataShapes) -> Result<FitPlan, AppError> {
        let [enc_samples, _, enc_features] = shapes.encoder_input;
        let [dec_samples, dec_steps, dec_features] = shapes.decoder_input;
        let [target_samples, target_steps, target_features] = shapes.decoder_target;

        if enc_samples != dec_samples || dec_samples != target_samples {
            return Err(AppError::Validation(format!(
                "sample counts differ: encoder {}, decoder {}, target {}",
                enc_samples, dec_samples, target_samples
            )));
        }
        if enc_features != self.config.num_encoder_tokens {
            return Err(AppError::Validation(format!(
                "encoder input has {} features, expected {}",
                enc_features, self.config.num_encoder_tokens
            )));
        }
        if dec_features != self.config.num_decoder_tokens
            || target_features != self.config.num_decoder_tokens
        {
            return Err(AppError::Validation(format!(
                "decoder arrays have {}/{} features, expected {}",
                dec_features, target_features, self.config.num_decoder_tokens
            )));
        }
        if dec_steps != target_steps {
            return Err(AppError::Validation(format!(
                "decoder input has {} timesteps but target has {}",
                dec_steps, target_steps
            )));
        }

        let validation_samples = validation_len(enc_samples, self.config.validation_split);
        let train_samples = enc_samples - validation_samples;
        let steps_per_epoch = train_samples.div_ceil(self.config.batch_size);

        Ok(FitPlan {
            train_samples,
            validation_samples,
            steps_per_epoch,
            epochs: self.config.epochs,
            batch_size: self.config.batch_size,
        })
    }

    /// Writes the declared topology as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Saved seq2seq topology to {:?}", path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
