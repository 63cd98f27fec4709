use crate::error::{RecommenderError, Result};
use crate::groq_service::{GroqService, LlmClient};
use crate::prompt_template::{PromptRenderer, PromptTemplate};
use crate::retriever::{Retriever, SimilarityRetriever};
use crate::settings::{Settings, RETRIEVER_TOP_K};
use crate::vector_store::VectorStore;
use anyhow::Context;
use std::sync::Arc;

const INIT_FAILED: &str = "Failed to initialize AnimeRecommender";
const INVOKE_FAILED: &str = "Failed to generate recommendation";

/// Retrieve, render, complete. Stages are read-only after construction so a
/// single recommender can serve any number of sequential requests.
pub struct AnimeRecommender {
    retriever: Arc<dyn Retriever>,
    prompt: Arc<dyn PromptRenderer>,
    llm: Arc<dyn LlmClient>,
}

impl AnimeRecommender {
    /// Builds the default stages: a Groq chat client at zero temperature, a
    /// top-3 similarity retriever over `vector_store`, and the anime prompt.
    pub fn new(vector_store: Arc<dyn VectorStore>, settings: &Settings) -> Result<Self> {
        log::info!("Initializing anime recommender...");

        let llm = GroqService::new(
            &settings.groq_api_key,
            &settings.groq_base_url,
            &settings.model_name,
            settings.temperature,
        )
        .map_err(|e| RecommenderError::initialization(INIT_FAILED, e))?;

        let retriever = SimilarityRetriever::new(vector_store, RETRIEVER_TOP_K);

        let prompt =
            PromptTemplate::anime().map_err(|e| RecommenderError::initialization(INIT_FAILED, e))?;

        log::info!("Anime recommender initialized");
        Ok(Self::from_stages(
            Arc::new(retriever),
            Arc::new(prompt),
            Arc::new(llm),
        ))
    }

    pub fn from_stages(
        retriever: Arc<dyn Retriever>,
        prompt: Arc<dyn PromptRenderer>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            retriever,
            prompt,
            llm,
        }
    }

    /// Runs the pipeline once for `query`. No retries and no internal
    /// timeout; the transport layer bounds the call.
    pub async fn get_recommendation(&self, query: &str) -> Result<String> {
        let start_time = std::time::Instant::now();

        match self.run(query).await {
            Ok(answer) => {
                log::info!(
                    "Recommendation generated in {} ms",
                    start_time.elapsed().as_millis()
                );
                Ok(answer)
            }
            Err(e) => {
                log::error!("Exception type: {}", failure_kind(&e));
                log::error!("Exception message: {e}");
                log::error!("Full traceback:\n{e:?}");
                Err(RecommenderError::invocation(INVOKE_FAILED, e))
            }
        }
    }

    async fn run(&self, query: &str) -> anyhow::Result<String> {
        let documents = self
            .retriever
            .retrieve(query)
            .await
            .context(Stage::Retrieval.label())?;

        let prompt = self
            .prompt
            .render(query, &documents)
            .context(Stage::Prompt.label())?;

        let response = self
            .llm
            .complete(&prompt)
            .await
            .context(Stage::Completion.label())?;

        Ok(response.into_text())
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Retrieval,
    Prompt,
    Completion,
}

impl Stage {
    fn label(self) -> &'static str {
        match self {
            Stage::Retrieval => "retrieval failed",
            Stage::Prompt => "prompt rendering failed",
            Stage::Completion => "LLM call failed",
        }
    }
}

/// Names the failure by the outermost error in the chain whose type we know.
fn failure_kind(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| {
            if cause.is::<crate::error::LlmError>() {
                Some("LlmError")
            } else if cause.is::<reqwest::Error>() {
                Some("reqwest::Error")
            } else if cause.is::<serde_json::Error>() {
                Some("serde_json::Error")
            } else if cause.is::<std::io::Error>() {
                Some("std::io::Error")
            } else {
                None
            }
        })
        .unwrap_or("anyhow::Error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LlmResponse, RetrievedDocument};
    use crate::vector_store::tests::sample_store;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Echoes the prompt back so tests can inspect what was sent.
    #[derive(Default)]
    struct EchoLlm {
        calls: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl LlmClient for EchoLlm {
        async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                anyhow::bail!("connection refused");
            }
            Ok(LlmResponse::Structured {
                content: prompt.to_string(),
                model: None,
            })
        }
    }

    struct RawLlm;

    #[async_trait]
    impl LlmClient for RawLlm {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<LlmResponse> {
            Ok(LlmResponse::RawText("plain reply".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingRetriever {
        queries: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Retriever for RecordingRetriever {
        async fn retrieve(&self, query: &str) -> anyhow::Result<Vec<RetrievedDocument>> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                anyhow::bail!("vector index offline");
            }
            Ok(vec![RetrievedDocument {
                title: "Naruto".into(),
                content: "Title: Naruto".into(),
                score: 1.0,
            }])
        }
    }

    fn template() -> Arc<PromptTemplate> {
        Arc::new(PromptTemplate::new("CTX[{context}] Q[{question}]").unwrap())
    }

    #[tokio::test]
    async fn runs_stages_in_order() {
        let retriever = Arc::new(RecordingRetriever::default());
        let llm = Arc::new(EchoLlm::default());
        let recommender = AnimeRecommender::from_stages(retriever.clone(), template(), llm.clone());

        let answer = recommender.get_recommendation("ninja shows").await.unwrap();

        assert_eq!(answer, "CTX[Title: Naruto] Q[ninja shows]");
        assert_eq!(*retriever.queries.lock().unwrap(), vec!["ninja shows".to_string()]);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn raw_text_responses_are_returned_as_is() {
        let recommender = AnimeRecommender::from_stages(
            Arc::new(RecordingRetriever::default()),
            template(),
            Arc::new(RawLlm),
        );
        assert_eq!(recommender.get_recommendation("q").await.unwrap(), "plain reply");
    }

    #[tokio::test]
    async fn retrieval_failure_is_wrapped_and_skips_llm() {
        let retriever = Arc::new(RecordingRetriever {
            fail: true,
            ..Default::default()
        });
        let llm = Arc::new(EchoLlm::default());
        let recommender = AnimeRecommender::from_stages(retriever, template(), llm.clone());

        let err = recommender.get_recommendation("q").await.unwrap_err();
        match err {
            RecommenderError::Invocation { context, source } => {
                assert_eq!(context, INVOKE_FAILED);
                assert_eq!(format!("{source:#}"), "retrieval failed: vector index offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn a_failed_call_does_not_poison_the_pipeline() {
        let llm = Arc::new(EchoLlm {
            fail_first: true,
            ..Default::default()
        });
        let recommender = AnimeRecommender::from_stages(
            Arc::new(RecordingRetriever::default()),
            template(),
            llm.clone(),
        );

        let err = recommender.get_recommendation("q").await.unwrap_err();
        assert!(err.to_string().contains("LLM call failed"));
        assert!(recommender.get_recommendation("q").await.is_ok());
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn repeated_queries_are_consistent() {
        let store: Arc<dyn VectorStore> = Arc::new(sample_store());
        let recommender = AnimeRecommender::from_stages(
            Arc::new(SimilarityRetriever::new(store, RETRIEVER_TOP_K)),
            template(),
            Arc::new(EchoLlm::default()),
        );

        let query = "Action anime with a strong protagonist and epic fights";
        let first = recommender.get_recommendation(query).await.unwrap();
        let second = recommender.get_recommendation(query).await.unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("CTX[Title: Naruto"));
        // Three documents joined by two blank-line separators.
        assert_eq!(first.matches("\n\n").count(), 2);
    }

    #[tokio::test]
    async fn failure_kind_finds_wrapped_transport_errors() {
        // Builder error with a url parse error as its source.
        let transport = reqwest::get("not a url").await.unwrap_err();
        assert!(std::error::Error::source(&transport).is_some());
        let err = anyhow::Error::new(transport).context(Stage::Completion.label());
        assert_eq!(failure_kind(&err), "reqwest::Error");

        let transport = reqwest::get("not a url").await.unwrap_err();
        let err = anyhow::Error::new(crate::error::LlmError::Transport(transport))
            .context(Stage::Completion.label());
        assert_eq!(failure_kind(&err), "LlmError");

        let err = anyhow::anyhow!("index offline").context(Stage::Retrieval.label());
        assert_eq!(failure_kind(&err), "anyhow::Error");
    }

    #[test]
    fn builds_default_stages_from_settings() {
        let settings = Settings::from_lookup(|name| {
            (name == "GROQ_API_KEY").then(|| "gsk_test".to_string())
        })
        .unwrap();
        let store: Arc<dyn VectorStore> = Arc::new(sample_store());
        assert!(AnimeRecommender::new(store, &settings).is_ok());
    }

    #[test]
    fn bad_llm_settings_fail_initialization() {
        let mut settings = Settings::from_lookup(|name| {
            (name == "GROQ_API_KEY").then(|| "gsk_test".to_string())
        })
        .unwrap();
        settings.groq_api_key = "bad\nkey".to_string();

        let store: Arc<dyn VectorStore> = Arc::new(sample_store());
        let err = AnimeRecommender::new(store, &settings).err().unwrap();
        assert!(matches!(err, RecommenderError::Initialization { context, .. } if context == INIT_FAILED));
    }
}
