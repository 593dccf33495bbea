//! Prometheus request metrics
//!
//! Series are labelled by service, method, route pattern and status so that
//! `/api/v1/user-messages/{id}` stays one series however many ids are fetched.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;
use prometheus::{Encoder, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, TextEncoder};
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

lazy_static::lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["service", "method", "route", "status"]
    ).expect("Prometheus metrics registration should succeed at startup");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency",
        &["service", "method", "route"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).expect("Prometheus metrics registration should succeed at startup");

    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = prometheus::register_int_gauge_vec!(
        "http_requests_in_flight",
        "HTTP requests currently being served",
        &["service"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Records request count, latency and in-flight gauge for one service
#[derive(Clone)]
pub struct MetricsMiddleware {
    service: Rc<str>,
}

impl MetricsMiddleware {
    pub fn new(service: &str) -> Self {
        Self {
            service: Rc::from(service),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = MetricsMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            inner: Rc::new(service),
            service: Rc::clone(&self.service),
        }))
    }
}

/// Holds one unit of the in-flight gauge until dropped, including when the
/// request future is abandoned on client disconnect.
struct InFlight(IntGauge);

impl InFlight {
    fn enter(gauge: IntGauge) -> Self {
        gauge.inc();
        Self(gauge)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.dec();
    }
}

pub struct MetricsMiddlewareService<S> {
    inner: Rc<S>,
    service: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let inner = Rc::clone(&self.inner);
        let service = Rc::clone(&self.service);
        let in_flight = InFlight::enter(HTTP_REQUESTS_IN_FLIGHT.with_label_values(&[&service]));
        let start = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            drop(in_flight);
            let res = result?;

            let request = res.request();
            let method = request.method().as_str();
            // Pattern is only known after routing
            let route = request
                .match_pattern()
                .unwrap_or_else(|| "unmatched".to_string());
            let status = res.status().as_u16().to_string();

            HTTP_REQUESTS_TOTAL
                .with_label_values(&[&service, method, &route, &status])
                .inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&service, method, &route])
                .observe(start.elapsed().as_secs_f64());

            Ok(res)
        })
    }
}

/// Render the default registry in the Prometheus text format
pub async fn metrics_handler() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
