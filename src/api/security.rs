use super::*;

pub(super) const DEFAULT_API_RATE_LIMIT_PER_SEC: u32 = 180;

/// Optional bearer-token auth plus a per-client fixed-window rate limit.
#[derive(Clone)]
pub(super) struct ApiSecurity {
    pub required_token: Option<String>,
    pub rate_limit_per_sec: u32,
    pub buckets: Arc<Mutex<HashMap<String, RateBucket>>>,
}

#[derive(Clone)]
pub(super) struct RateBucket {
    pub window_start: std::time::Instant,
    pub count: u32,
}

impl ApiSecurity {
    pub(super) fn from_env() -> Self {
        let required_token = std::env::var("SCENEHOST_API_TOKEN")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let rate_limit_per_sec = std::env::var("SCENEHOST_API_RATE_LIMIT_PER_SEC")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_API_RATE_LIMIT_PER_SEC)
            .max(1);
        Self {
            required_token,
            rate_limit_per_sec,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn token_matches(&self, req: &Request) -> bool {
        let Some(expected) = self.required_token.as_deref() else {
            return true;
        };
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .unwrap_or("")
        };
        let auth = header("authorization");
        let bearer = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .unwrap_or(auth);
        bearer == expected || header("x-api-key") == expected
    }
}

pub(super) async fn api_guard(
    State(security): State<ApiSecurity>,
    req: Request,
    next: Next,
) -> axum::response::Response {
    if !security.token_matches(&req) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<String>::failure(
                "Unauthorized: set SCENEHOST_API_TOKEN and send Authorization: Bearer <token>",
            )),
        )
            .into_response();
    }

    let key = req
        .headers()
        .get("x-forwarded-for")
        .or_else(|| req.headers().get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("local")
        .to_string();

    {
        let mut buckets = security.buckets.lock().unwrap();
        let now = std::time::Instant::now();
        let entry = buckets.entry(key).or_insert(RateBucket {
            window_start: now,
            count: 0,
        });
        if now.duration_since(entry.window_start).as_secs_f32() >= 1.0 {
            entry.window_start = now;
            entry.count = 0;
        }
        entry.count = entry.count.saturating_add(1);
        if entry.count > security.rate_limit_per_sec {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ApiResponse::<String>::failure("Rate limit exceeded")),
            )
                .into_response();
        }

        if buckets.len() > 4096 {
            buckets.retain(|_, v| now.duration_since(v.window_start).as_secs_f32() < 10.0);
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::Request as HttpRequest, routing::get, Router};
    use tower::util::ServiceExt;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn guarded_app(security: ApiSecurity) -> Router {
        Router::new()
            .route("/", get(ok_handler))
            .layer(middleware::from_fn_with_state(security, api_guard))
    }

    #[tokio::test]
    async fn rejects_when_token_missing_or_invalid() {
        let app = guarded_app(ApiSecurity {
            required_token: Some("secret".to_string()),
            rate_limit_per_sec: 100,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        });

        let req = HttpRequest::builder()
            .uri("/")
            .body(axum::body::Body::empty())
            .expect("request");
        let res = app.clone().oneshot(req).await.expect("response");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req_bad = HttpRequest::builder()
            .uri("/")
            .header("authorization", "Bearer nope")
            .body(axum::body::Body::empty())
            .expect("request");
        let res_bad = app.oneshot(req_bad).await.expect("response");
        assert_eq!(res_bad.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn accepts_api_key_header() {
        let app = guarded_app(ApiSecurity {
            required_token: Some("secret".to_string()),
            rate_limit_per_sec: 100,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        });

        let req = HttpRequest::builder()
            .uri("/")
            .header("x-api-key", "secret")
            .body(axum::body::Body::empty())
            .expect("request");
        let res = app.oneshot(req).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn allows_valid_token_and_applies_rate_limit() {
        let app = guarded_app(ApiSecurity {
            required_token: Some("secret".to_string()),
            rate_limit_per_sec: 1,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        });

        let req_ok = HttpRequest::builder()
            .uri("/")
            .header("authorization", "Bearer secret")
            .header("x-real-ip", "127.0.0.1")
            .body(axum::body::Body::empty())
            .expect("request");
        let res_ok = app.clone().oneshot(req_ok).await.expect("response");
        assert_eq!(res_ok.status(), StatusCode::OK);

        let req_limited = HttpRequest::builder()
            .uri("/")
            .header("authorization", "Bearer secret")
            .header("x-real-ip", "127.0.0.1")
            .body(axum::body::Body::empty())
            .expect("request");
        let res_limited = app.oneshot(req_limited).await.expect("response");
        assert_eq!(res_limited.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
