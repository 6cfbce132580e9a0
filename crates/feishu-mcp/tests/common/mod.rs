//! Shared fixtures for Feishu integration tests
//!
//! A wiremock server standing in for the Open Platform, plus helpers that
//! mount the docx and drive endpoints the media tools call.

#![allow(dead_code)]

use feishu_mcp::media::VIEW_BLOCK_TYPE;
use feishu_mcp::{FeishuClient, FeishuConfig, FeishuHandler, StaticToken};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

pub const TOKEN: &str = "t-test";
pub const DOC: &str = "doxcnTestDoc";

/// Successful envelope around `data`.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 0, "msg": "success", "data": data}))
}

/// Failed envelope with HTTP 200, the way the Open Platform reports most errors.
pub fn fail(code: i64, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": code, "msg": msg}))
}

/// Open Platform mock
pub struct MockFeishu {
    pub server: MockServer,
}

impl MockFeishu {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn client(&self) -> FeishuClient {
        let config = FeishuConfig::default().with_base_url(self.server.uri());
        FeishuClient::new(&config, StaticToken::new(TOKEN)).expect("client")
    }

    pub fn handler(&self) -> FeishuHandler {
        FeishuHandler::new(self.client())
    }

    pub fn children_path(parent: &str) -> String {
        format!("/open-apis/docx/v1/documents/{DOC}/blocks/{parent}/children")
    }

    pub fn block_path(block: &str) -> String {
        format!("/open-apis/docx/v1/documents/{DOC}/blocks/{block}")
    }

    pub const UPLOAD_PATH: &'static str = "/open-apis/drive/v1/medias/upload_all";

    pub const LIST_PATH: &'static str = "/open-apis/docx/v1/documents/doxcnTestDoc/blocks";

    /// Staging call answering with `data`, expected `times` times.
    pub async fn mock_stage(&self, parent: &str, response: ResponseTemplate, times: u64) {
        Mock::given(method("POST"))
            .and(path(Self::children_path(parent)))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(response)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// File staging that creates view block `view` wrapping file block `file`.
    pub async fn mock_stage_file(&self, view: &str, file: &str) {
        self.mock_stage(
            DOC,
            ok(json!({"children": [{"block_id": view, "block_type": VIEW_BLOCK_TYPE, "children": [file]}]})),
            1,
        )
        .await;
    }

    /// Image staging that creates image block `image`.
    pub async fn mock_stage_image(&self, image: &str) {
        self.mock_stage(
            DOC,
            ok(json!({"children": [{"block_id": image, "block_type": 27, "children": []}]})),
            1,
        )
        .await;
    }

    pub async fn mock_upload(&self, response: ResponseTemplate, times: u64) {
        Mock::given(method("POST"))
            .and(path(Self::UPLOAD_PATH))
            .respond_with(response)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_finalize(&self, block: &str, response: ResponseTemplate, times: u64) {
        Mock::given(method("PATCH"))
            .and(path(Self::block_path(block)))
            .respond_with(response)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Every endpoint answers, but none may be called.
    pub async fn expect_no_calls(&self) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ok(json!({})))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}
