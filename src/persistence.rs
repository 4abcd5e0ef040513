//! Saving and loading trained networks as JSON.

use crate::error::ModelError;
use crate::neural_network::NeuralNetwork;
use crate::simulation::GameState;
use std::path::Path;

/// Default file for networks saved by hand during windowed training.
pub const DEFAULT_MODEL_PATH: &str = "best_model.json";

/// Default file the trainer keeps its champion in.
pub const DEFAULT_CHAMPION_PATH: &str = "champion.json";

pub fn save_model<P: AsRef<Path>>(network: &NeuralNetwork, path: P) -> Result<(), ModelError> {
    let json = serde_json::to_string_pretty(network)?;
    std::fs::write(path.as_ref(), json)?;
    log::info!("Model saved to {}", path.as_ref().display());
    Ok(())
}

pub fn load_model<P: AsRef<Path>>(path: P) -> Result<NeuralNetwork, ModelError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let network: NeuralNetwork = serde_json::from_str(&json)?;
    network.validate()?;
    log::info!("Loaded model from {}", path.as_ref().display());
    Ok(network)
}

/// Saves the first live network of a batch. Returns its agent id, or `None`
/// when every bird has already crashed and nothing was written.
pub fn save_leader<P: AsRef<Path>>(
    state: &GameState<NeuralNetwork>,
    path: P,
) -> Result<Option<usize>, ModelError> {
    match state.leader() {
        Some(agent) => {
            save_model(&agent.brain, path)?;
            Ok(Some(agent.id))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_model("/nonexistent/flappy/model.json").unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }

    #[test]
    fn test_save_then_load_preserves_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let network = NeuralNetwork::new_random(&mut StdRng::seed_from_u64(11));

        save_model(&network, &path).unwrap();
        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, network);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_model(&path), Err(ModelError::Json(_))));
    }

    #[test]
    fn test_save_leader_skips_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leader.json");
        // Sigmoid of zero sits on the threshold, so this bird never jumps.
        let brains = vec![NeuralNetwork::from_weights(&[0.0; 31]).unwrap()];
        let rng = StdRng::seed_from_u64(4);
        let mut state = GameState::new(Default::default(), brains.clone(), rng);

        assert_eq!(save_leader(&state, &path).unwrap(), Some(0));
        assert_eq!(load_model(&path).unwrap(), brains[0]);

        std::fs::remove_file(&path).unwrap();
        assert!(state.run(1_000));
        assert_eq!(save_leader(&state, &path).unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_wrong_layer_sizes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{
                "weights_input_hidden": [1.0],
                "biases_hidden": [],
                "weights_hidden_output": [],
                "biases_output": [0.0]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            load_model(&path),
            Err(ModelError::Shape { expected: 31, actual: 2 })
        ));
    }
}
