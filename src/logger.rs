use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use log::{info, warn};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Requests slower than this are logged at warn level
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_millis(500);

/// Request logging middleware.
///
/// Logs one line per request with method, path, status and latency. Client
/// and server errors, and slow requests, are logged at warn level. Query
/// strings are not logged: they can carry user ids.
pub struct LoggerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggerMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(LoggerMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let service = self.service.clone();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start_time.elapsed();

            match &res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_client_error() || status.is_server_error() {
                        warn!(
                            "{} {} -> {} ({}ms)",
                            method,
                            path,
                            status.as_u16(),
                            elapsed.as_millis()
                        );
                    } else if elapsed > SLOW_REQUEST_THRESHOLD {
                        warn!(
                            "Slow request: {} {} -> {} ({}ms)",
                            method,
                            path,
                            status.as_u16(),
                            elapsed.as_millis()
                        );
                    } else {
                        info!(
                            "{} {} -> {} ({}ms)",
                            method,
                            path,
                            status.as_u16(),
                            elapsed.as_millis()
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        "{} {} -> {} ({}ms)",
                        method,
                        path,
                        e.as_response_error().status_code().as_u16(),
                        elapsed.as_millis()
                    );
                }
            }

            res
        })
    }
}
