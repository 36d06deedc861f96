//! HTTP API for tool metadata generation.
//!
//! Endpoints:
//! - `POST /auto-generate`: run the pipeline for `{toolName}`
//! - `GET /api/quotas`: quota usage per metered service
//! - `POST /translate`: English to Arabic translation of keyed content

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;

use anyhow::Context;

use crate::config::Settings;
use crate::pipeline::{AutoGenerator, Components};
use crate::quota::QuotaTracker;
use crate::translate::Translator;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub generator: AutoGenerator,
    pub quota: QuotaTracker,
    pub translator: Translator,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::from(Components::from_settings(settings)?))
    }
}

impl From<Components> for AppState {
    fn from(components: Components) -> Self {
        Self {
            generator: components.generator,
            quota: components.quota,
            translator: components.translator,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::llm::{DisabledModel, LlmError, TextGenerator, TextModel};
    use crate::models::{
        AutoGenerateResult, Category, GeneratedData, QuotaService, ToolType, VerificationResult,
    };
    use crate::pipeline::{GenerateError, ToolDataSource};

    /// Answers by tool name: "Notion" succeeds, "Broken" fails, "Partial"
    /// needs correction, anything else is unknown.
    struct ScriptedSource;

    #[async_trait]
    impl ToolDataSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn generate(
            &self,
            tool_name: &str,
        ) -> Result<Option<AutoGenerateResult>, GenerateError> {
            let data = GeneratedData::basic(
                "https://www.notion.so".to_string(),
                "https://img.brandfetch.io/notion.so".to_string(),
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
                "n".repeat(170),
                Category::Productivity,
                ToolType::Free,
            );
            match tool_name {
                "Notion" => Ok(Some(AutoGenerateResult::success(data))),
                "Partial" => Ok(Some(AutoGenerateResult::partial(
                    data.to_partial(),
                    vec![VerificationResult::invalid("imageUrl", "Not an image: text/html")],
                ))),
                "Broken" => Err(GenerateError::Failed("database unavailable".to_string())),
                _ => Err(GenerateError::UnknownTool {
                    tool_name: tool_name.to_string(),
                    reason: "No search results found".to_string(),
                }),
            }
        }
    }

    struct UppercaseModel;

    #[async_trait]
    impl TextModel for UppercaseModel {
        fn name(&self) -> &'static str {
            "upper"
        }
        fn quota_service(&self) -> QuotaService {
            QuotaService::TextPrimary
        }
        fn is_configured(&self) -> bool {
            true
        }
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            Ok(prompt.split('"').nth(1).unwrap_or_default().to_uppercase())
        }
    }

    struct NothingSource;

    #[async_trait]
    impl ToolDataSource for NothingSource {
        fn name(&self) -> &'static str {
            "nothing"
        }
        async fn generate(&self, _: &str) -> Result<Option<AutoGenerateResult>, GenerateError> {
            Ok(None)
        }
    }

    fn test_app() -> axum::Router {
        app_with_model(Arc::new(UppercaseModel))
    }

    fn app_with_model(model: Arc<dyn TextModel>) -> axum::Router {
        let quota = QuotaTracker::in_memory();
        let text = TextGenerator::new(
            model,
            Arc::new(DisabledModel::new(QuotaService::TextFallback)),
            quota.clone(),
        );
        create_router(AppState {
            generator: AutoGenerator::new(Arc::new(NothingSource), Arc::new(ScriptedSource)),
            quota,
            translator: Translator::new(text),
        })
    }

    async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_auto_generate_success() {
        let (status, json) = post_json(test_app(), "/auto-generate", r#"{"toolName":" Notion "}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["category"], "Productivity");
        assert_eq!(json["data"]["dataSource"], "api");
    }

    #[tokio::test]
    async fn test_auto_generate_partial_is_ok() {
        let (status, json) = post_json(test_app(), "/auto-generate", r#"{"toolName":"Partial"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["field"], "imageUrl");
        assert_eq!(json["partialData"]["websiteUrl"], "https://www.notion.so");
    }

    #[tokio::test]
    async fn test_auto_generate_unknown_tool() {
        let (status, json) =
            post_json(test_app(), "/auto-generate", r#"{"toolName":"Zzyzxqplorer123"}"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "unknown_tool");
        assert_eq!(json["toolName"], "Zzyzxqplorer123");
        assert_eq!(json["reason"], "No search results found");
        assert!(json["message"].as_str().unwrap().contains("Zzyzxqplorer123"));
    }

    #[tokio::test]
    async fn test_auto_generate_internal_error() {
        let (status, json) = post_json(test_app(), "/auto-generate", r#"{"toolName":"Broken"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "internal_error");
    }

    #[tokio::test]
    async fn test_auto_generate_bad_input() {
        for body in [r#"{}"#, r#"{"toolName":"   "}"#, r#"{"toolName":42}"#, "not json"] {
            let (status, json) = post_json(test_app(), "/auto-generate", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(json["error"], "Tool name is required");
        }
    }

    #[tokio::test]
    async fn test_api_quotas() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/quotas")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_translate() {
        let (status, json) = post_json(
            test_app(),
            "/translate",
            r#"{"content":{"title":"AI tools","count":3,"tags":["notes","docs"],"mixed":["a",1]}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "AI TOOLS");
        assert_eq!(json["count"], 3);
        assert_eq!(json["tags"], serde_json::json!(["NOTES", "DOCS"]));
        assert_eq!(json["mixed"], serde_json::json!(["a", 1]));

        let (status, json) = post_json(test_app(), "/translate", r#"{"content":"text"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid content format");
    }

    #[tokio::test]
    async fn test_translate_fails_when_models_are_down() {
        let app = app_with_model(Arc::new(DisabledModel::new(QuotaService::TextPrimary)));
        let (status, json) =
            post_json(app, "/translate", r#"{"content":{"title":"AI tools"}}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Translation failed");
    }
}
