use std::path::PathBuf;

use hf_hub::api::tokio;

/// Download model config and weights from Hugging Face Hub
/// If file exists in cache, it will not be downloaded again
pub async fn download_hf_model(model_name: &str) -> anyhow::Result<(PathBuf, PathBuf)> {
    let api = tokio::Api::new()
        .map_err(|e| anyhow!("Unable to reach the Hugging Face Hub: {}", e))?;
    let repo = api.model(model_name.to_string());

    let model_filepath = repo.get("model.safetensors").await.map_err(|e| {
        anyhow!(
            "Failed to download: {} weights with name: model.safetensors from HuggingFace Hub: {}",
            model_name,
            e
        )
    })?;

    let config_filepath = repo.get("config.json").await.map_err(|e| {
        anyhow!(
            "Failed to download: {} config with name: config.json from HuggingFace Hub: {}",
            model_name,
            e
        )
    })?;

    Ok((config_filepath, model_filepath))
}
