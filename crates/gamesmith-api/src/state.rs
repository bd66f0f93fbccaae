//! Application state wiring the studio together.
//!
//! AppState holds the concrete instances used by both the CLI and the REST
//! API: the resolved config, the [`GameStudio`], and the render host the
//! studio feeds.

use std::path::PathBuf;
use std::sync::Arc;

use gamesmith_core::generation::{GenerationClient, GenerationSettings};
use gamesmith_core::llm::box_provider::BoxLlmProvider;
use gamesmith_core::render::{RenderFrame, RenderHost, SandboxPolicy, WatchRenderHost};
use gamesmith_core::session::SessionState;
use gamesmith_core::studio::GameStudio;
use gamesmith_infra::config::{apply_env_overrides, load_studio_config};
use gamesmith_infra::filesystem::resolve_data_dir;
use gamesmith_infra::llm::create_provider;
use gamesmith_infra::render::FileRenderHost;
use gamesmith_infra::secret::resolve_api_key;
use gamesmith_types::config::StudioConfig;

/// Where generated games are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// Write the preview page to `{data_dir}/{preview_file}`.
    File,
    /// Serve the preview page over HTTP.
    Served,
}

/// The render host behind the studio, kept so callers can read it back.
#[derive(Clone)]
pub enum PreviewHost {
    File(Arc<FileRenderHost>),
    Served(Arc<WatchRenderHost>),
}

impl PreviewHost {
    /// Frame currently on display.
    pub fn current(&self) -> Option<RenderFrame> {
        match self {
            PreviewHost::File(host) => host.current(),
            PreviewHost::Served(host) => host.current(),
        }
    }

    fn as_render_host(&self) -> Arc<dyn RenderHost> {
        match self {
            PreviewHost::File(host) => host.clone(),
            PreviewHost::Served(host) => host.clone(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<GameStudio>,
    pub config: Arc<StudioConfig>,
    pub data_dir: PathBuf,
    pub preview: PreviewHost,
}

impl AppState {
    /// Initialize the application state: load config, resolve the API key,
    /// build the provider and studio.
    pub async fn init(mode: PreviewMode) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = apply_env_overrides(load_studio_config(&data_dir).await)?;
        let api_key = resolve_api_key()?;
        let provider = create_provider(&config.generation, api_key)?;

        let preview = match mode {
            PreviewMode::File => {
                let path = data_dir.join(&config.render.preview_file);
                PreviewHost::File(Arc::new(FileRenderHost::spawn(path, sandbox_policy(&config))))
            }
            PreviewMode::Served => PreviewHost::Served(Arc::new(WatchRenderHost::new())),
        };

        tracing::info!(
            data_dir = %data_dir.display(),
            model = %config.generation.model,
            ?mode,
            "application state initialized"
        );
        Ok(Self::from_parts(provider, config, data_dir, preview))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        provider: BoxLlmProvider,
        config: StudioConfig,
        data_dir: PathBuf,
        preview: PreviewHost,
    ) -> Self {
        let generator = GenerationClient::new(provider, GenerationSettings::from(&config.generation));
        let studio = GameStudio::new(
            SessionState::with_greeting(),
            generator,
            preview.as_render_host(),
        )
        .with_export_prefix(config.export.file_prefix.clone());

        Self {
            studio: Arc::new(studio),
            config: Arc::new(config),
            data_dir,
            preview,
        }
    }

    /// Sandbox policy for preview pages.
    pub fn sandbox(&self) -> SandboxPolicy {
        sandbox_policy(&self.config)
    }
}

fn sandbox_policy(config: &StudioConfig) -> SandboxPolicy {
    SandboxPolicy {
        allow_same_origin: config.render.allow_same_origin,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    use std::future::Future;
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use gamesmith_core::llm::provider::LlmProvider;
    use gamesmith_types::llm::{
        CompletionRequest, CompletionResponse, ContentSegment, LlmError, ProviderCapabilities,
        StopReason, Usage,
    };

    /// Provider answering from a queue of texts, optionally held behind a gate.
    pub(crate) struct QueueProvider {
        capabilities: ProviderCapabilities,
        replies: Mutex<Vec<Result<String, LlmError>>>,
        gate: Option<Arc<Notify>>,
    }

    impl QueueProvider {
        pub(crate) fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            let mut replies = replies;
            replies.reverse();
            Self {
                capabilities: ProviderCapabilities {
                    max_context_tokens: 200_000,
                    max_output_tokens: 8_192,
                },
                replies: Mutex::new(replies),
                gate: None,
            }
        }

        pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }
    }

    impl LlmProvider for QueueProvider {
        fn name(&self) -> &str {
            "queue"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            let next = self.replies.lock().unwrap().pop().unwrap_or_else(|| {
                Err(LlmError::Provider {
                    message: "no reply queued".to_string(),
                })
            });
            let gate = self.gate.clone();
            async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                next.map(|text| CompletionResponse {
                    id: "msg_test".to_string(),
                    segments: vec![ContentSegment::Text { text }],
                    model: "test-model".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                })
            }
        }
    }

    /// State served over HTTP, backed by `provider`.
    pub(crate) fn served_state(provider: QueueProvider, data_dir: PathBuf) -> AppState {
        AppState::from_parts(
            BoxLlmProvider::new(provider),
            StudioConfig::default(),
            data_dir,
            PreviewHost::Served(Arc::new(WatchRenderHost::new())),
        )
    }
}
