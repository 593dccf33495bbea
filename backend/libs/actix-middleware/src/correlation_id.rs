//! Request correlation ID middleware
//!
//! - If the request has an `X-Correlation-ID` header: use it
//! - Otherwise: generate a UUID v4
//! - Store it in request extensions for handlers
//! - Run the rest of the request inside an `http_request` span carrying it
//! - Echo it on the response and include it in the access log line

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::{HeaderMap, HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

/// Middleware that manages request correlation IDs
#[derive(Clone, Default)]
pub struct CorrelationIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CorrelationIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorrelationIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelationIdMiddlewareService { service }))
    }
}

pub struct CorrelationIdMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorrelationIdMiddlewareService<S>
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
        let correlation_id = req
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut()
            .insert(CorrelationId(correlation_id.clone()));

        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %method,
            path = %path
        );
        let fut = span.in_scope(|| self.service.call(req));

        Box::pin(
            async move {
                let mut res = match fut.await {
                    Ok(res) => res,
                    Err(err) => {
                        // Errors raised by inner middleware, e.g. the 504 from RequestTimeout
                        let mut response = err.error_response();
                        tracing::warn!(
                            status = response.status().as_u16(),
                            duration_ms = start.elapsed().as_millis() as u64,
                            error = %err,
                            "HTTP request failed"
                        );
                        echo_correlation_id(response.headers_mut(), &correlation_id);
                        return Err(InternalError::from_response(err.to_string(), response).into());
                    }
                };

                tracing::info!(
                    status = res.status().as_u16(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "HTTP request completed"
                );

                echo_correlation_id(res.headers_mut(), &correlation_id);
                Ok(res)
            }
            .instrument(span),
        )
    }
}

fn echo_correlation_id(headers: &mut HeaderMap, correlation_id: &str) {
    if let Ok(value) = HeaderValue::from_str(correlation_id) {
        headers.insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);
    }
}

/// Extract the correlation ID assigned by [`CorrelationIdMiddleware`]
pub fn get_correlation_id(req: &actix_web::HttpRequest) -> Option<String> {
    req.extensions().get::<CorrelationId>().map(|id| id.0.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpRequest, HttpResponse};

    async fn echo(req: HttpRequest) -> HttpResponse {
        HttpResponse::Ok().body(get_correlation_id(&req).unwrap_or_default())
    }

    #[actix_rt::test]
    async fn test_incoming_id_is_propagated() {
        let app = test::init_service(
            App::new()
                .wrap(CorrelationIdMiddleware)
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((CORRELATION_ID_HEADER, "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(CORRELATION_ID_HEADER).unwrap(),
            "abc-123"
        );
        let body = test::read_body(resp).await;
        assert_eq!(body, "abc-123");
    }

    #[actix_rt::test]
    async fn test_missing_id_is_generated() {
        let app = test::init_service(
            App::new()
                .wrap(CorrelationIdMiddleware)
                .route("/", web::get().to(echo)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = resp
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap()
            .to_string();

        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[actix_rt::test]
    async fn test_id_is_echoed_on_inner_middleware_error() {
        let app = test::init_service(
            App::new()
                .wrap(crate::RequestTimeout::new(std::time::Duration::from_millis(10)))
                .wrap(CorrelationIdMiddleware)
                .route(
                    "/",
                    web::get().to(|| async {
                        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                        HttpResponse::Ok().finish()
                    }),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((CORRELATION_ID_HEADER, "timeout-1"))
            .to_request();
        let err = test::try_call_service(&app, req)
            .await
            .err()
            .expect("request should time out");

        let response = err.error_response();
        assert_eq!(response.status(), actix_web::http::StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            response.headers().get(CORRELATION_ID_HEADER).unwrap(),
            "timeout-1"
        );
    }
}
