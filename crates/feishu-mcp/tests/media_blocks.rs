//! Media block creation against a mocked Open Platform
//!
//! Covers the stage → upload → finalize sequence for files and images,
//! local input validation, and how each step's failure surfaces.

mod common;

use std::io::Write;

use common::{DOC, MockFeishu, fail, ok};
use feishu_mcp::media::{MAX_PAYLOAD_BYTES, MediaSource};
use feishu_mcp::{
    FeishuError, MediaBlockCreator, MediaKind, MediaRequest, MediaState, RATE_LIMIT_ADVICE,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_partial_json, body_string_contains, method, path, query_param},
};

fn request(kind: MediaKind, source: MediaSource) -> MediaRequest {
    MediaRequest {
        kind,
        document_id: DOC.to_string(),
        parent_block_id: DOC.to_string(),
        index: None,
        revision_id: None,
        source,
        image: Default::default(),
    }
}

fn inline(content: &[u8], name: &str) -> MediaSource {
    use base64::Engine;
    MediaSource::Inline {
        content_base64: base64::engine::general_purpose::STANDARD.encode(content),
        file_name: name.to_string(),
    }
}

#[tokio::test]
async fn test_file_block_end_to_end() {
    let feishu = MockFeishu::start().await;

    Mock::given(method("POST"))
        .and(path(MockFeishu::children_path(DOC)))
        .and(query_param("document_revision_id", "-1"))
        .and(body_partial_json(json!({
            "children": [{"block_type": 23, "file": {"token": ""}}]
        })))
        .respond_with(ok(json!({
            "children": [{"block_id": "v1", "block_type": 33, "children": ["f1"]}]
        })))
        .expect(1)
        .mount(&feishu.server)
        .await;

    // Adler-32 of "test" is 73204161; parent_node is the inner file block.
    Mock::given(method("POST"))
        .and(path(MockFeishu::UPLOAD_PATH))
        .and(body_string_contains("73204161"))
        .and(body_string_contains("docx_file"))
        .and(body_string_contains("f1"))
        .respond_with(ok(json!({"file_token": "tok1"})))
        .expect(1)
        .mount(&feishu.server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(MockFeishu::block_path("f1")))
        .and(query_param("document_revision_id", "-1"))
        .and(body_partial_json(json!({"replace_file": {"token": "tok1"}})))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&feishu.server)
        .await;

    let result = feishu
        .handler()
        .call_tool(
            "create_feishu_file_block",
            json!({
                "document_id": DOC,
                "parent_block_id": DOC,
                "file_content_base64": "dGVzdA==",
                "file_name": "test.txt"
            }),
        )
        .await;

    assert!(!result.is_error(), "{:?}", result.first_text());
    assert_eq!(
        result.structured_content,
        Some(json!({
            "view_block_id": "v1",
            "file_block_id": "f1",
            "file_token": "tok1",
            "file_name": "test.txt"
        }))
    );
}

#[tokio::test]
async fn test_image_block_end_to_end_with_caption() {
    let feishu = MockFeishu::start().await;

    Mock::given(method("POST"))
        .and(path(MockFeishu::children_path(DOC)))
        .and(body_partial_json(json!({"children": [{"block_type": 27}], "index": 2})))
        .respond_with(ok(json!({
            "children": [{"block_id": "img1", "block_type": 27, "children": []}]
        })))
        .expect(1)
        .mount(&feishu.server)
        .await;

    Mock::given(method("POST"))
        .and(path(MockFeishu::UPLOAD_PATH))
        .and(body_string_contains("docx_image"))
        .and(body_string_contains("img1"))
        .respond_with(ok(json!({"file_token": "tok2"})))
        .expect(1)
        .mount(&feishu.server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(MockFeishu::block_path("img1")))
        .and(query_param("document_revision_id", "7"))
        .and(body_partial_json(json!({
            "replace_image": {"token": "tok2", "caption": {"content": "Architecture"}}
        })))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&feishu.server)
        .await;

    let result = feishu
        .handler()
        .call_tool(
            "create_feishu_image_block",
            json!({
                "document_id": DOC,
                "parent_block_id": DOC,
                "file_content_base64": "iVBORw0KGgo=",
                "file_name": "diagram.png",
                "index": 2,
                "document_revision_id": 7,
                "caption": "Architecture"
            }),
        )
        .await;

    assert!(!result.is_error(), "{:?}", result.first_text());
    assert_eq!(
        result.structured_content,
        Some(json!({
            "image_block_id": "img1",
            "image_token": "tok2",
            "file_name": "diagram.png"
        }))
    );
}

#[tokio::test]
async fn test_file_from_path_uses_path_name() {
    let feishu = MockFeishu::start().await;
    feishu.mock_stage_file("v1", "f1").await;
    feishu
        .mock_upload(ok(json!({"file_token": "tok1"})), 1)
        .await;
    feishu.mock_finalize("f1", ok(json!({})), 1).await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("report.pdf");
    std::fs::write(&file_path, b"%PDF-1.7").unwrap();

    let creator = MediaBlockCreator::new(feishu.client());
    let outcome = creator
        .create(request(
            MediaKind::File,
            MediaSource::Path {
                path: file_path,
                file_name: None,
            },
        ))
        .await
        .unwrap();

    assert_eq!(outcome.file_name, "report.pdf");
    assert_eq!(outcome.view_block_id.as_deref(), Some("v1"));
    assert_eq!(outcome.media_block_id, "f1");
}

#[tokio::test]
async fn test_oversized_file_rejected_before_any_call() {
    let feishu = MockFeishu::start().await;
    feishu.expect_no_calls().await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.as_file().set_len(MAX_PAYLOAD_BYTES + 1).unwrap();
    file.flush().unwrap();

    let result = feishu
        .handler()
        .call_tool(
            "create_feishu_file_block",
            json!({
                "document_id": DOC,
                "parent_block_id": DOC,
                "file_path": file.path().to_str().unwrap()
            }),
        )
        .await;

    assert!(result.is_error());
    assert!(result.first_text().unwrap().contains("20MB"));
}

#[tokio::test]
async fn test_source_selection_rejected_before_any_call() {
    let feishu = MockFeishu::start().await;
    feishu.expect_no_calls().await;
    let handler = feishu.handler();

    let neither = handler
        .call_tool(
            "create_feishu_image_block",
            json!({"document_id": DOC, "parent_block_id": DOC}),
        )
        .await;
    assert_eq!(
        neither.first_text(),
        Some("Exactly one of file_path or file_content_base64 must be provided")
    );

    let unnamed = handler
        .call_tool(
            "create_feishu_image_block",
            json!({"document_id": DOC, "parent_block_id": DOC, "file_content_base64": "dGVzdA=="}),
        )
        .await;
    assert_eq!(
        unnamed.first_text(),
        Some("file_name is required when using file_content_base64")
    );

    let missing = handler
        .call_tool(
            "create_feishu_file_block",
            json!({
                "document_id": DOC,
                "parent_block_id": DOC,
                "file_path": "/definitely/not/here.bin"
            }),
        )
        .await;
    assert!(missing.first_text().unwrap().starts_with("File not found"));

    let negative = handler
        .call_tool(
            "create_feishu_file_block",
            json!({
                "document_id": DOC,
                "parent_block_id": DOC,
                "file_content_base64": "dGVzdA==",
                "file_name": "a.txt",
                "index": -1
            }),
        )
        .await;
    assert!(negative.first_text().unwrap().contains("index"));
}

#[tokio::test]
async fn test_empty_staging_response() {
    let feishu = MockFeishu::start().await;
    feishu.mock_stage(DOC, ok(json!({"children": []})), 1).await;
    feishu.mock_upload(ok(json!({"file_token": "x"})), 0).await;

    let err = MediaBlockCreator::new(feishu.client())
        .create(request(MediaKind::File, inline(b"test", "a.txt")))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "No blocks returned from block creation API");
    assert!(matches!(
        err,
        FeishuError::Media {
            reached: MediaState::Idle,
            staged: None,
            ..
        }
    ));
}

#[tokio::test]
async fn test_view_block_without_file_child() {
    let feishu = MockFeishu::start().await;
    feishu
        .mock_stage(
            DOC,
            ok(json!({"children": [{"block_id": "v1", "block_type": 33, "children": []}]})),
            1,
        )
        .await;
    feishu.mock_upload(ok(json!({"file_token": "x"})), 0).await;

    let err = MediaBlockCreator::new(feishu.client())
        .create(request(MediaKind::File, inline(b"test", "a.txt")))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("File block ID not found"));
}

#[tokio::test]
async fn test_upload_without_data() {
    let feishu = MockFeishu::start().await;
    feishu.mock_stage_image("img1").await;
    feishu
        .mock_upload(
            ResponseTemplate::new(200).set_body_json(json!({"code": 0, "msg": "success"})),
            1,
        )
        .await;
    feishu.mock_finalize("img1", ok(json!({})), 0).await;

    let err = MediaBlockCreator::new(feishu.client())
        .create(request(MediaKind::Image, inline(b"png", "a.png")))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "No response from upload API");
    match err {
        FeishuError::Media {
            reached, staged, ..
        } => {
            assert_eq!(reached, MediaState::Staged);
            assert_eq!(staged.unwrap().media_block_id(), "img1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_without_token() {
    let feishu = MockFeishu::start().await;
    feishu.mock_stage_file("v1", "f1").await;
    feishu.mock_upload(ok(json!({"file_token": ""})), 1).await;
    feishu.mock_finalize("f1", ok(json!({})), 0).await;

    let err = MediaBlockCreator::new(feishu.client())
        .create(request(MediaKind::File, inline(b"test", "a.txt")))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("token not returned"));
}

#[tokio::test]
async fn test_finalize_error_is_verbatim() {
    let feishu = MockFeishu::start().await;
    feishu.mock_stage_file("v1", "f1").await;
    feishu
        .mock_upload(ok(json!({"file_token": "tok1"})), 1)
        .await;
    feishu
        .mock_finalize("f1", fail(1_770_001, "invalid param"), 1)
        .await;

    let err = MediaBlockCreator::new(feishu.client())
        .create(request(MediaKind::File, inline(b"test", "a.txt")))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid param");
    match err {
        FeishuError::Media {
            reached, source, ..
        } => {
            assert_eq!(reached, MediaState::Uploaded);
            assert!(matches!(*source, FeishuError::Api { code: 1_770_001, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_returns_advice() {
    let feishu = MockFeishu::start().await;
    feishu.mock_stage_file("v1", "f1").await;
    feishu
        .mock_upload(ResponseTemplate::new(429).set_body_string("too many requests"), 1)
        .await;

    let result = feishu
        .handler()
        .call_tool(
            "create_feishu_file_block",
            json!({
                "document_id": DOC,
                "parent_block_id": DOC,
                "file_content_base64": "dGVzdA==",
                "file_name": "a.txt"
            }),
        )
        .await;

    assert!(result.is_error());
    assert_eq!(result.first_text(), Some(RATE_LIMIT_ADVICE));
}

#[tokio::test]
async fn test_rate_limit_code_in_envelope() {
    let feishu = MockFeishu::start().await;
    feishu
        .mock_stage(DOC, fail(99_991_400, "request trigger frequency limit"), 1)
        .await;

    let err = MediaBlockCreator::new(feishu.client())
        .create(request(MediaKind::Image, inline(b"png", "a.png")))
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.user_message(), RATE_LIMIT_ADVICE);
}

#[tokio::test]
async fn test_staging_is_not_idempotent() {
    let feishu = MockFeishu::start().await;

    // Each create call mints a fresh block.
    for id in ["img1", "img2"] {
        Mock::given(method("POST"))
            .and(path(MockFeishu::children_path(DOC)))
            .respond_with(ok(json!({"children": [{"block_id": id, "block_type": 27}]})))
            .up_to_n_times(1)
            .expect(1)
            .mount(&feishu.server)
            .await;
        feishu.mock_finalize(id, ok(json!({})), 1).await;
    }
    feishu
        .mock_upload(ok(json!({"file_token": "tok2"})), 2)
        .await;

    let creator = MediaBlockCreator::new(feishu.client());
    let first = creator
        .create(request(MediaKind::Image, inline(b"png", "a.png")))
        .await
        .unwrap();
    let second = creator
        .create(request(MediaKind::Image, inline(b"png", "a.png")))
        .await
        .unwrap();

    assert_eq!(first.media_block_id, "img1");
    assert_eq!(second.media_block_id, "img2");
}

#[tokio::test]
async fn test_finalize_server_error_is_not_success() {
    let feishu = MockFeishu::start().await;
    // Run once through the handler and once through the creator.
    feishu
        .mock_stage(
            DOC,
            ok(json!({"children": [{"block_id": "v1", "block_type": 33, "children": ["f1"]}]})),
            2,
        )
        .await;
    feishu
        .mock_upload(ok(json!({"file_token": "tok1"})), 2)
        .await;
    feishu
        .mock_finalize(
            "f1",
            ResponseTemplate::new(500).set_body_json(json!({"error": "internal"})),
            2,
        )
        .await;

    let result = feishu
        .handler()
        .call_tool(
            "create_feishu_file_block",
            json!({
                "document_id": DOC,
                "parent_block_id": DOC,
                "file_content_base64": "dGVzdA==",
                "file_name": "a.txt"
            }),
        )
        .await;
    assert!(result.is_error());
    assert!(result.structured_content.is_none());
    assert!(result.first_text().unwrap().starts_with("HTTP 500"));

    let err = MediaBlockCreator::new(feishu.client())
        .create(request(MediaKind::File, inline(b"test", "a.txt")))
        .await
        .unwrap_err();
    match err {
        FeishuError::Media {
            reached, source, ..
        } => {
            assert_eq!(reached, MediaState::Uploaded);
            assert!(matches!(*source, FeishuError::Api { code: 500, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_staging_server_error_is_reported_as_such() {
    let feishu = MockFeishu::start().await;
    feishu
        .mock_stage(
            DOC,
            ResponseTemplate::new(500).set_body_json(json!({"error": "x"})),
            1,
        )
        .await;
    feishu.mock_upload(ok(json!({"file_token": "x"})), 0).await;

    let err = MediaBlockCreator::new(feishu.client())
        .create(request(MediaKind::Image, inline(b"png", "a.png")))
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("HTTP 500"));
    assert!(!err.to_string().contains("No blocks returned"));
    assert!(matches!(
        err,
        FeishuError::Media {
            reached: MediaState::Idle,
            staged: None,
            ..
        }
    ));
}
