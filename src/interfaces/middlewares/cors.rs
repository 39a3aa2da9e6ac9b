use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{
        HeaderMap, HeaderValue, InvalidHeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS,
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    },
    error::InternalError,
    Error,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::settings::AppConfig;

/// Stamps the CORS headers on every response, including errors and preflights.
#[derive(Clone)]
pub struct CorsHeaders {
    allowed_origin: HeaderValue,
}

impl CorsHeaders {
    pub fn new(allowed_origin: &str) -> Result<Self, InvalidHeaderValue> {
        Ok(CorsHeaders {
            allowed_origin: HeaderValue::from_str(allowed_origin)?,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, InvalidHeaderValue> {
        Self::new(config.cors_origin())
    }
}

impl<S> Transform<S, ServiceRequest> for CorsHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsHeadersService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CorsHeadersService {
            service: Rc::new(service),
            allowed_origin: self.allowed_origin.clone(),
        })
    }
}

pub struct CorsHeadersService<S> {
    service: Rc<S>,
    allowed_origin: HeaderValue,
}

impl<S> Service<ServiceRequest> for CorsHeadersService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed_origin = self.allowed_origin.clone();

        Box::pin(async move {
            match service.call(req).await {
                Ok(mut res) => {
                    apply_cors_headers(res.headers_mut(), allowed_origin);
                    Ok(res)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Request failed before a response was built");
                    let mut res = err.error_response();
                    apply_cors_headers(res.headers_mut(), allowed_origin);
                    Err(InternalError::from_response(err, res).into())
                }
            }
        })
    }
}

fn apply_cors_headers(headers: &mut HeaderMap, allowed_origin: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allowed_origin);
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
}
