use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use bp_core::{Error, GenerationMode, GenerativeModel, Result};

/// A scripted reply for [`DummyModel`].
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

/// Offline model. Replies come from a queue when one is scripted, otherwise
/// canned samples are picked by looking at the prompt.
#[derive(Default)]
pub struct DummyModel {
    queue: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, GenerationMode)>>,
    samples: bool,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").field("samples", &self.samples).finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_responses() -> Self {
        Self {
            samples: true,
            ..Self::default()
        }
    }

    pub fn push_text(self, text: impl Into<String>) -> Self {
        self.lock_queue().push_back(Reply::Text(text.into()));
        self
    }

    pub fn push_failure(self, message: impl Into<String>) -> Self {
        self.lock_queue().push_back(Reply::Fail(message.into()));
        self
    }

    /// Prompts seen so far, with the mode each was sent in.
    pub fn calls(&self) -> Vec<(String, GenerationMode)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn sample_reply(prompt: &str) -> String {
        if prompt.contains("blog post topics") {
            SAMPLE_TOPICS.to_string()
        } else if prompt.contains("article themes") {
            SAMPLE_THEMES.to_string()
        } else if prompt.contains("high-authority sources") {
            SAMPLE_SOURCES.to_string()
        } else {
            SAMPLE_ARTICLE.to_string()
        }
    }
}

#[async_trait::async_trait]
impl GenerativeModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str, mode: GenerationMode) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), mode));
        }

        match self.lock_queue().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(Error::Inference(message)),
            None if self.samples => Ok(Self::sample_reply(prompt)),
            None => Err(Error::Inference("Dummy model has no scripted reply".to_string())),
        }
    }
}

const SAMPLE_TOPICS: &str = r#"```json
[
  {"title": "FP8 Training at Scale", "description": "How 8-bit floating point formats cut training cost without hurting convergence."},
  {"title": "KV-Cache Offloading", "description": "Paging attention state to host memory to serve longer contexts."},
  {"title": "Speculative Decoding in Production", "description": "Draft models and acceptance rates under real traffic."},
  {"title": "Kernel Fusion with Triton", "description": "Writing fused kernels that beat vendor libraries."},
  {"title": "Disaggregated Inference", "description": "Splitting prefill and decode across separate GPU pools."}
]
```"#;

const SAMPLE_THEMES: &str = r#"[
  {"theme": "FP8 vs BF16: A Benchmark-Driven Training Cost Breakdown", "rationale": "Quantitative comparisons rank well for cost queries."},
  {"theme": "Why FP8 Training Diverges and How to Stop It", "rationale": "Failure-case articles answer troubleshooting searches."},
  {"theme": "Inside the Transformer Engine: FP8 Scaling Factors Explained", "rationale": "Architecture deep dives earn featured snippets."},
  {"theme": "FP8 on Hopper vs Blackwell", "rationale": "Comparative angle with clear keywords."},
  {"theme": "The Real Cost of FP8 Adoption", "rationale": "Cost analysis targets decision makers."}
]"#;

const SAMPLE_SOURCES: &str = r#"```json
[
  {"title": "FP8 Formats for Deep Learning", "url": "https://arxiv.org/abs/2209.05433", "snippet": "Proposes E4M3 and E5M2 encodings.", "date": "2024-02"},
  {"title": "Transformer Engine Documentation", "url": "https://docs.nvidia.com/deeplearning/transformer-engine/", "snippet": "Delayed scaling recipe for FP8 GEMMs.", "date": "2025-01"},
  {"title": "MLPerf Training v5.0 Results", "url": "https://mlcommons.org/benchmarks/training/", "snippet": "FP8 submissions dominate LLM pretraining.", "date": "2025-06"},
  {"title": "Scaling FP8 Training to Trillion-Token Horizons", "url": "https://arxiv.org/abs/2409.12517", "snippet": "Identifies SwiGLU outlier amplification.", "date": "2024-09"},
  {"title": "Blackwell Architecture Technical Brief", "url": "https://resources.nvidia.com/blackwell", "snippet": "Microscaling formats in the second-generation Transformer Engine.", "date": "2024-03"},
  {"title": "FP8 Training Benchmarks", "url": "https://www.phoronix.com/review/fp8-training", "snippet": "Throughput measurements across accelerators.", "date": "2025-03"},
  {"title": "The Case for 8-bit Training", "url": "https://spectrum.ieee.org/fp8-training", "snippet": "Industry adoption of low precision.", "date": "2025-04"},
  {"title": "OCP 8-bit Floating Point Specification", "url": "https://www.opencompute.org/documents/ocp-8-bit-floating-point-specification-ofp8", "snippet": "Vendor-neutral FP8 definition.", "date": "2024-06"}
]
```"#;

const SAMPLE_ARTICLE: &str = r#"# FP8 vs BF16: A Benchmark-Driven Training Cost Breakdown

Eight-bit floating point halves activation memory relative to BF16 [1].

## Dynamic range

An E4M3 value covers $\pm 448$ while E5M2 reaches $\pm 57344$ [2]:

$$x_{fp8} = \mathrm{round}\left(\frac{x}{s}\right), \quad s = \frac{\max |x|}{448}$$

## Results

MLPerf submissions using FP8 trained GPT-3 175B up to 30% faster [3].
"#;
