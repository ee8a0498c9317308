use anyhow::{anyhow, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::ops::softmax;
use candle_nn::VarBuilder;
use candle_transformers::models::clip::{ClipConfig, ClipModel};
use image::DynamicImage;
use tokenizers::Tokenizer;

use crate::models::{Category, Prediction};

const MODEL_REPO: &str = "openai/clip-vit-base-patch32";
// Branch carrying safetensors weights and tokenizer.json for this repo.
const MODEL_REVISION: &str = "refs/pr/15";

/// Zero-shot image classifier over the four fixed waste categories.
///
/// Loaded once at startup and shared read-only for the process lifetime.
/// The four candidate descriptions are tokenized once here; `classify`
/// only ever scores those candidates, so results are closed-set.
pub struct ClipClassifier {
    model: ClipModel,
    input_ids: Tensor,
    device: Device,
    image_size: usize,
}

impl ClipClassifier {
    /// Download (or reuse from the local Hugging Face cache) the CLIP
    /// ViT-B/32 weights and tokenizer, then build the model on CPU.
    ///
    /// This is blocking network and disk I/O; call it before the service
    /// starts accepting traffic.
    pub fn load() -> Result<Self> {
        log::info!("🔄 Loading CLIP model ({})...", MODEL_REPO);

        let api = hf_hub::api::sync::Api::new().context("failed to create Hugging Face hub client")?;
        let repo = api.repo(hf_hub::Repo::with_revision(
            MODEL_REPO.to_string(),
            hf_hub::RepoType::Model,
            MODEL_REVISION.to_string(),
        ));

        let weights_path = repo
            .get("model.safetensors")
            .context("failed to fetch CLIP weights")?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .context("failed to fetch CLIP tokenizer")?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("failed to load tokenizer: {e}"))?;

        let device = Device::Cpu;
        let config = ClipConfig::vit_base_patch32();

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .context("failed to map CLIP weights")?
        };
        let model = ClipModel::new(vb, &config).context("failed to build CLIP model")?;

        let input_ids = tokenize_candidates(&tokenizer, &device)?;

        log::info!("✅ CLIP model loaded");

        Ok(Self {
            model,
            input_ids,
            device,
            image_size: config.image_size,
        })
    }

    /// Score the image against all four candidate descriptions. Returns
    /// exactly four predictions sorted descending by score; softmax output,
    /// so the scores sum to ~1.
    pub fn classify(&self, image: &DynamicImage) -> Result<Vec<Prediction>> {
        let pixels = preprocess_image(image, self.image_size)?
            .unsqueeze(0)?
            .to_device(&self.device)?;

        let (_logits_per_text, logits_per_image) = self
            .model
            .forward(&pixels, &self.input_ids)
            .context("CLIP forward pass failed")?;

        let scores = softmax(&logits_per_image, 1)?
            .squeeze(0)?
            .to_vec1::<f32>()
            .context("failed to read classifier scores")?;

        Ok(rank_predictions(&scores))
    }
}

/// Tokenize the four fixed candidate descriptions into one padded batch.
fn tokenize_candidates(tokenizer: &Tokenizer, device: &Device) -> Result<Tensor> {
    let pad_id = *tokenizer
        .get_vocab(true)
        .get("<|endoftext|>")
        .ok_or_else(|| anyhow!("tokenizer has no <|endoftext|> token"))?;

    let mut tokens: Vec<Vec<u32>> = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let encoding = tokenizer
            .encode(category.description(), true)
            .map_err(|e| anyhow!("failed to tokenize candidate label: {e}"))?;
        tokens.push(encoding.get_ids().to_vec());
    }

    let max_len = tokens.iter().map(Vec::len).max().unwrap_or(0);
    for ids in tokens.iter_mut() {
        ids.resize(max_len, pad_id);
    }

    Ok(Tensor::new(tokens, device)?)
}

/// Resize to the model's input size and scale RGB pixels into `[-1, 1]`,
/// matching CLIP's expected input. Non-RGB inputs are converted first.
fn preprocess_image(image: &DynamicImage, image_size: usize) -> Result<Tensor> {
    let resized = image.resize_to_fill(
        image_size as u32,
        image_size as u32,
        image::imageops::FilterType::Triangle,
    );
    let rgb = resized.to_rgb8().into_raw();

    let tensor = Tensor::from_vec(rgb, (image_size, image_size, 3), &Device::Cpu)?
        .permute((2, 0, 1))?
        .to_dtype(DType::F32)?
        .affine(2.0 / 255.0, -1.0)?;

    Ok(tensor)
}

/// Pair softmax scores with their categories and sort descending.
fn rank_predictions(scores: &[f32]) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = Category::ALL
        .into_iter()
        .zip(scores.iter().copied())
        .map(|(category, score)| Prediction { category, score })
        .collect();
    predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
    predictions
}
