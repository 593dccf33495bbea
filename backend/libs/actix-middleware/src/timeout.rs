//! Bounded per-request processing time
//!
//! Requests still running when the deadline passes are dropped and answered
//! with `504 Gateway Timeout` and `{"error": "request timed out"}`.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout {
    duration: Duration,
}

impl RequestTimeout {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl Default for RequestTimeout {
    fn default() -> Self {
        Self::from_secs(30)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutService {
            service,
            duration: self.duration,
        }))
    }
}

pub struct RequestTimeoutService<S> {
    service: S,
    duration: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimeoutService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let duration = self.duration;
        let method = req.method().clone();
        let path = req.path().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            match tokio::time::timeout(duration, fut).await {
                Ok(res) => res,
                Err(_) => {
                    tracing::warn!(
                        method = %method,
                        path = %path,
                        timeout_ms = duration.as_millis() as u64,
                        "Request exceeded processing deadline"
                    );
                    let response = HttpResponse::GatewayTimeout()
                        .json(serde_json::json!({ "error": "request timed out" }));
                    Err(InternalError::from_response("request timed out", response).into())
                }
            }
        })
    }
}
