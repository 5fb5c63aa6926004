//! Request descriptors and the one helper every endpoint goes through.

use crate::ClientConfig;
use cron_types::{ApiError, CronApiError};
use reqwest::{header, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Status code to contract message, per endpoint.
pub type ErrorTable = &'static [(u16, &'static str)];

/// Messages for statuses an endpoint does not declare itself.
const COMMON_ERRORS: ErrorTable = &[
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
];

/// Everything needed to issue one call: method, URL template, parameters, body and the
/// endpoint's declared errors.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path template relative to the base URL, e.g. `/api/v1/cron/jobs/{id}`.
    pub url: &'static str,
    pub path: Vec<(&'static str, String)>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
    pub media_type: Option<&'static str>,
    pub errors: ErrorTable,
}

impl ApiRequest {
    pub fn new(method: Method, url: &'static str) -> Self {
        Self {
            method,
            url,
            path: Vec::new(),
            query: Vec::new(),
            body: None,
            media_type: None,
            errors: &[],
        }
    }

    pub fn path_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path.push((name, value.into()));
        self
    }

    pub fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json_body<B: Serialize>(mut self, body: &B) -> Result<Self, CronApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| CronApiError::InvalidRequest(format!("request body: {e}")))?;
        self.body = Some(value);
        self.media_type = Some("application/json");
        Ok(self)
    }

    pub fn errors(mut self, errors: ErrorTable) -> Self {
        self.errors = errors;
        self
    }

    /// Contract message for `status`: the endpoint's own table first, then the common one.
    pub fn error_message(&self, status: u16) -> Option<&'static str> {
        self.errors
            .iter()
            .chain(COMMON_ERRORS.iter())
            .find(|(code, _)| *code == status)
            .map(|(_, msg)| *msg)
    }
}

/// Base URL + template with path values escaped as single segments, then the query.
pub fn resolve_url(base_url: &str, request: &ApiRequest) -> Result<Url, CronApiError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| CronApiError::InvalidRequest(format!("base url '{base_url}': {e}")))?;
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            CronApiError::InvalidRequest(format!("base url '{base_url}' cannot carry a path"))
        })?;
        segments.pop_if_empty();
        for segment in request.url.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = path_value(request, name)?;
                    segments.push(value);
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }
    if !request.query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}

fn path_value<'r>(request: &'r ApiRequest, name: &str) -> Result<&'r str, CronApiError> {
    let value = request
        .path
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.as_str())
        .ok_or_else(|| CronApiError::InvalidRequest(format!("missing path parameter '{name}'")))?;
    // These would collapse into a different route once the URL is normalized.
    if value.is_empty() || value == "." || value == ".." {
        return Err(CronApiError::InvalidRequest(format!(
            "path parameter '{name}' must not be '{value}'"
        )));
    }
    Ok(value)
}

/// Turn a descriptor into a ready-to-send reqwest request.
pub fn build_request(
    client: &reqwest::Client,
    config: &ClientConfig,
    request: &ApiRequest,
) -> Result<reqwest::Request, CronApiError> {
    let url = resolve_url(&config.base_url, request)?;
    let mut builder = client
        .request(request.method.clone(), url)
        .header(header::ACCEPT, "application/json");
    if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
        builder = builder.bearer_auth(token);
    } else if let (Some(user), Some(pass)) = (&config.username, &config.password) {
        builder = builder.basic_auth(user, Some(pass));
    }
    for (name, value) in &config.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(ref body) = request.body {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| CronApiError::InvalidRequest(format!("request body: {e}")))?;
        builder = builder
            .header(
                header::CONTENT_TYPE,
                request.media_type.unwrap_or("application/json"),
            )
            .body(bytes);
    }
    builder
        .build()
        .map_err(|e| CronApiError::InvalidRequest(e.to_string()))
}

/// Issue one request and decode the payload into `T`.
///
/// Empty bodies decode as JSON `null`, so `()` and `Option<_>` accept a 204.
pub async fn send<T: DeserializeOwned>(
    client: &reqwest::Client,
    config: &ClientConfig,
    request: ApiRequest,
) -> Result<T, CronApiError> {
    let req = build_request(client, config, &request)?;
    let method = req.method().to_string();
    let url = req.url().to_string();
    tracing::debug!(%method, %url, "sending cron api request");

    let res = client
        .execute(req)
        .await
        .map_err(|e| CronApiError::Transport(e.to_string()))?;
    let status = res.status();
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);
    let text = res
        .text()
        .await
        .map_err(|e| CronApiError::Transport(e.to_string()))?;

    if !status.is_success() {
        let err = api_error(&request, method, url, status, &text, is_json);
        tracing::warn!(status = err.status, url = %err.url, "cron api call failed: {}", err.message);
        return Err(err.into());
    }

    let value = body_value(&text, is_json)
        .map_err(|e| CronApiError::Decode(format!("{method} {url}: {e}")))?;
    serde_json::from_value(value).map_err(|e| CronApiError::Decode(format!("{method} {url}: {e}")))
}

fn body_value(text: &str, is_json: bool) -> Result<serde_json::Value, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    if is_json {
        serde_json::from_str(text)
    } else {
        Ok(serde_json::Value::String(text.to_string()))
    }
}

fn api_error(
    request: &ApiRequest,
    method: String,
    url: String,
    status: StatusCode,
    text: &str,
    is_json: bool,
) -> ApiError {
    let status_text = status.canonical_reason().unwrap_or_default().to_string();
    let message = match request.error_message(status.as_u16()) {
        Some(msg) => msg.to_string(),
        None => format!(
            "Generic Error: status: {}; status text: {}; body: {}",
            status.as_u16(),
            status_text,
            text
        ),
    };
    let body = body_value(text, is_json)
        .unwrap_or_else(|_| serde_json::Value::String(text.to_string()));
    ApiError {
        method,
        url,
        status: status.as_u16(),
        status_text,
        message,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB_BY_ID: &str = "/api/v1/cron/jobs/{id}";

    #[test]
    fn path_values_are_escaped_as_one_segment() {
        let req = ApiRequest::new(Method::GET, JOB_BY_ID).path_param("id", "a b/c?d#e%f");
        let url = resolve_url("http://cron.local", &req).unwrap();
        assert_eq!(url.path(), "/api/v1/cron/jobs/a%20b%2Fc%3Fd%23e%25f");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn plain_uuid_passes_through_verbatim() {
        let id = "6f1c1d2e-4a8b-4c39-9d5e-0b7a3f2e1c44";
        let req = ApiRequest::new(Method::DELETE, JOB_BY_ID).path_param("id", id);
        let url = resolve_url("http://cron.local", &req).unwrap();
        assert_eq!(url.as_str(), format!("http://cron.local/api/v1/cron/jobs/{id}"));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let req = ApiRequest::new(Method::GET, "/api/v1/cron/jobs");
        for base in ["http://cron.local/gateway", "http://cron.local/gateway/"] {
            let url = resolve_url(base, &req).unwrap();
            assert_eq!(url.path(), "/gateway/api/v1/cron/jobs");
        }
    }

    #[test]
    fn route_changing_path_values_are_rejected() {
        for bad in ["", ".", ".."] {
            let req = ApiRequest::new(Method::GET, JOB_BY_ID).path_param("id", bad);
            let err = resolve_url("http://cron.local", &req).unwrap_err();
            assert!(matches!(err, CronApiError::InvalidRequest(_)));
        }
        let missing = ApiRequest::new(Method::GET, JOB_BY_ID);
        assert!(resolve_url("http://cron.local", &missing).is_err());
    }

    #[test]
    fn query_pairs_are_encoded() {
        let req = ApiRequest::new(Method::GET, "/api/v1/cron/jobs")
            .query(vec![("page", "1".to_string()), ("q", "a&b c".to_string())]);
        let url = resolve_url("http://cron.local", &req).unwrap();
        assert_eq!(url.query(), Some("page=1&q=a%26b+c"));
    }

    #[test]
    fn declared_errors_override_common_table() {
        let req = ApiRequest::new(Method::GET, JOB_BY_ID).errors(&[(404, "Job not found")]);
        assert_eq!(req.error_message(404), Some("Job not found"));
        assert_eq!(req.error_message(502), Some("Bad Gateway"));
        assert_eq!(req.error_message(418), None);
    }

    #[test]
    fn bearer_token_wins_over_basic_auth() {
        let client = reqwest::Client::new();
        let config = ClientConfig::new("http://cron.local")
            .with_token("tok")
            .with_basic_auth("u", "p")
            .with_header("x-tenant-id", "tenant-1");
        let req = ApiRequest::new(Method::POST, "/api/v1/cron/migrate/up");
        let built = build_request(&client, &config, &req).unwrap();
        let headers = built.headers();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer tok");
        assert_eq!(headers[header::ACCEPT], "application/json");
        assert_eq!(headers["x-tenant-id"], "tenant-1");
        assert!(headers.get(header::CONTENT_TYPE).is_none());
        assert!(built.body().is_none());
    }

    #[test]
    fn basic_auth_used_without_token() {
        let client = reqwest::Client::new();
        let config = ClientConfig::new("http://cron.local").with_basic_auth("admin", "pw");
        let req = ApiRequest::new(Method::GET, "/api/v1/cron/jobs");
        let built = build_request(&client, &config, &req).unwrap();
        // base64("admin:pw")
        assert_eq!(built.headers()[header::AUTHORIZATION], "Basic YWRtaW46cHc=");
    }

    #[test]
    fn json_body_sets_content_type() {
        let client = reqwest::Client::new();
        let req = ApiRequest::new(Method::PATCH, JOB_BY_ID)
            .path_param("id", "x")
            .json_body(&serde_json::json!({ "is_enabled": true }))
            .unwrap();
        let built = build_request(&client, &ClientConfig::default(), &req).unwrap();
        assert_eq!(built.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = built.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(bytes, br#"{"is_enabled":true}"#);
    }

    #[test]
    fn unknown_status_gets_generic_message() {
        let req = ApiRequest::new(Method::GET, JOB_BY_ID).errors(&[(404, "Job not found")]);
        let err = api_error(
            &req,
            "GET".into(),
            "http://cron.local/x".into(),
            StatusCode::IM_A_TEAPOT,
            "short and stout",
            false,
        );
        assert_eq!(err.status, 418);
        assert_eq!(
            err.message,
            "Generic Error: status: 418; status text: I'm a teapot; body: short and stout"
        );
        assert_eq!(err.body, serde_json::json!("short and stout"));
    }

    #[test]
    fn empty_body_is_null() {
        assert_eq!(body_value("", true).unwrap(), serde_json::Value::Null);
        assert_eq!(body_value("  \n", false).unwrap(), serde_json::Value::Null);
        assert!(body_value("{not json", true).is_err());
    }
}
