use crate::AppState;
use crate::api::models::upload::{OneOrMany, UploadResponse, UrlPayload};
use crate::errors::{Error, Result};
use crate::relay::{FilePayload, UploadedFile};
use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request, State, multipart::MultipartError},
    http::{StatusCode, header},
};

#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    summary = "Relay files to the webhook",
    description = "Accepts a multipart upload (`file` fields, single or repeated) or a JSON/form body \
                   with a `url` field (string or array of strings), forwards the files to the configured \
                   webhook endpoint, and returns the resulting attachment metadata. Direct files take \
                   precedence over URLs when a request carries both.",
    request_body(
        content_type = "multipart/form-data",
        description = "File upload (`file` fields) and/or `url` values"
    ),
    responses(
        (status = 200, description = "Files relayed successfully", body = UploadResponse),
        (status = 400, description = "Neither file nor url provided"),
        (status = 403, description = "Invalid API key"),
        (status = 413, description = "Payload too large"),
        (status = 500, description = "Fetch, configuration, or relay failure")
    )
)]
pub async fn upload(State(state): State<AppState>, request: Request) -> Result<(StatusCode, Json<UploadResponse>)> {
    let (files, urls) = parse_request(&state, request).await?;

    // Direct files win over URLs when a request carries both; the URL path is
    // only taken when no direct file exists.
    let payload = if !files.is_empty() {
        FilePayload::from(files)
    } else if let [url] = urls.as_slice() {
        FilePayload::Single(state.fetcher.fetch(url).await?)
    } else if !urls.is_empty() {
        FilePayload::Many(state.fetcher.fetch_many(&urls).await?)
    } else {
        return Err(Error::Validation {
            message: "No file or url provided".to_string(),
        });
    };

    let files = payload.into_files();
    let attachments = state.relay.relay(&files).await?;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            success: true,
            message: "File uploaded successfully".to_string(),
            attachments,
        }),
    ))
}

/// Resolve the request body into direct files and/or URL references,
/// dispatching on the declared content type.
async fn parse_request(state: &AppState, request: Request) -> Result<(Vec<UploadedFile>, Vec<String>)> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| body_error(e.status(), format!("Failed to parse multipart data: {}", e.body_text())))?;
        collect_multipart(multipart).await
    } else if content_type.starts_with("application/json") {
        let Json(payload) = Json::<UrlPayload>::from_request(request, state)
            .await
            .map_err(|e| body_error(e.status(), format!("Invalid JSON body: {}", e.body_text())))?;
        Ok((Vec::new(), payload.url.map(OneOrMany::into_vec).unwrap_or_default()))
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(payload) = Form::<UrlPayload>::from_request(request, state)
            .await
            .map_err(|e| body_error(e.status(), format!("Invalid form body: {}", e.body_text())))?;
        Ok((Vec::new(), payload.url.map(OneOrMany::into_vec).unwrap_or_default()))
    } else {
        Ok((Vec::new(), Vec::new()))
    }
}

/// Map a body-read rejection, keeping the 413 from the body-limit layer
/// distinct from plain malformed input.
fn body_error(status: StatusCode, message: String) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge {
            message: "Payload too large".to_string(),
        }
    } else {
        Error::Validation { message }
    }
}

fn multipart_error(e: MultipartError) -> Error {
    body_error(e.status(), format!("Failed to parse multipart data: {}", e.body_text()))
}

/// Walk the multipart fields, collecting `file` parts and `url` text values.
async fn collect_multipart(mut multipart: Multipart) -> Result<(Vec<UploadedFile>, Vec<String>)> {
    let mut files = Vec::new();
    let mut urls = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "file" => {
                let name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload.bin".to_string());
                let data = field.bytes().await.map_err(multipart_error)?;
                files.push(UploadedFile { name, data });
            }
            "url" => {
                let value = field.text().await.map_err(multipart_error)?;
                if !value.is_empty() {
                    urls.push(value);
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unrecognized multipart field");
            }
        }
    }

    Ok((files, urls))
}

#[cfg(test)]
mod tests {
    use crate::api::models::upload::UploadResponse;
    use crate::test_utils::{create_test_app, create_test_config, create_test_config_with_webhook};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn attachments_body() -> serde_json::Value {
        json!({
            "attachments": [{
                "id": "111",
                "filename": "cat.png",
                "size": 8,
                "url": "https://cdn.example.com/cat.png",
                "proxy_url": "https://proxy.example.com/cat.png"
            }]
        })
    }

    async fn webhook_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200).set_body_json(attachments_body()))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn empty_request_is_rejected_with_400() {
        let server = create_test_app(create_test_config());

        let response = server.post("/upload").json(&json!({})).await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("No file or url provided"));
    }

    #[tokio::test]
    async fn unknown_content_type_is_rejected_with_400() {
        let server = create_test_app(create_test_config());

        let response = server
            .post("/upload")
            .content_type("text/plain")
            .text("hello")
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn multipart_file_is_relayed() {
        let webhook = webhook_server().await;
        let server = create_test_app(create_test_config_with_webhook(&format!("{}/hook", webhook.uri())));

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"pngbytes".to_vec()).file_name("cat.png").mime_type("image/png"),
        );
        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadResponse = response.json();
        assert!(body.success);
        assert_eq!(body.message, "File uploaded successfully");
        assert_eq!(body.attachments.len(), 1);
        assert_eq!(body.attachments[0].id, "111");
    }

    #[tokio::test]
    async fn multiple_multipart_files_are_relayed_as_a_batch() {
        let webhook = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_string_contains(r#"name="files[0]""#))
            .and(body_string_contains(r#"name="files[1]""#))
            .respond_with(ResponseTemplate::new(200).set_body_json(attachments_body()))
            .expect(1)
            .mount(&webhook)
            .await;

        let server = create_test_app(create_test_config_with_webhook(&format!("{}/hook", webhook.uri())));

        let form = MultipartForm::new()
            .add_part("file", Part::bytes(b"aaa".to_vec()).file_name("a.png"))
            .add_part("file", Part::bytes(b"bbb".to_vec()).file_name("b.png"));
        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn json_url_is_fetched_and_relayed() {
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/cat.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pngbytes".to_vec()))
            .expect(1)
            .mount(&origin)
            .await;

        let webhook = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_string_contains(r#"filename="cat.png""#))
            .respond_with(ResponseTemplate::new(200).set_body_json(attachments_body()))
            .expect(1)
            .mount(&webhook)
            .await;

        let server = create_test_app(create_test_config_with_webhook(&format!("{}/hook", webhook.uri())));

        let response = server
            .post("/upload")
            .json(&json!({ "url": format!("{}/media/cat.png", origin.uri()) }))
            .await;

        response.assert_status_ok();
        let body: UploadResponse = response.json();
        assert!(body.success);
    }

    #[tokio::test]
    async fn form_encoded_url_is_accepted() {
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
            .mount(&origin)
            .await;

        let webhook = webhook_server().await;
        let server = create_test_app(create_test_config_with_webhook(&format!("{}/hook", webhook.uri())));

        let response = server
            .post("/upload")
            .form(&[("url", format!("{}/report.pdf", origin.uri()))])
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn failing_url_in_a_batch_fails_the_whole_request() {
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&origin)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&origin)
            .await;

        // The successful sibling fetch must produce no observable side effect:
        // nothing may reach the webhook.
        let webhook = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(attachments_body()))
            .expect(0)
            .mount(&webhook)
            .await;

        let server = create_test_app(create_test_config_with_webhook(&format!("{}/hook", webhook.uri())));

        let response = server
            .post("/upload")
            .json(&json!({ "url": [
                format!("{}/ok.txt", origin.uri()),
                format!("{}/missing.txt", origin.uri()),
            ] }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("missing.txt"));
    }

    #[tokio::test]
    async fn direct_files_take_precedence_over_urls() {
        // A url field is present but must never be fetched
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"never".to_vec()))
            .expect(0)
            .mount(&origin)
            .await;

        let webhook = webhook_server().await;
        let server = create_test_app(create_test_config_with_webhook(&format!("{}/hook", webhook.uri())));

        let form = MultipartForm::new()
            .add_part("file", Part::bytes(b"direct".to_vec()).file_name("direct.txt"))
            .add_text("url", format!("{}/ignored.png", origin.uri()));
        let response = server.post("/upload").multipart(form).await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn missing_webhook_endpoint_is_a_500() {
        let server = create_test_app(create_test_config());

        let form = MultipartForm::new().add_part("file", Part::bytes(b"abc".to_vec()).file_name("a.txt"));
        let response = server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], json!("missing webhook endpoint"));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_the_relay() {
        let webhook = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(attachments_body()))
            .expect(0)
            .mount(&webhook)
            .await;

        let mut config = create_test_config_with_webhook(&format!("{}/hook", webhook.uri()));
        config.limits.max_upload_bytes = 64;
        let server = create_test_app(config);

        let form = MultipartForm::new().add_part("file", Part::bytes(vec![0u8; 4096]).file_name("big.bin"));
        let response = server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}
