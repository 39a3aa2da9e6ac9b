use actix_web::{error::PayloadError, web, HttpRequest, HttpResponse};
use futures_util::StreamExt;

use crate::{
    constants::MAX_CONSULTATION_BODY_BYTES,
    entities::consultation::ConsultationRequest,
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// `POST /submit-consultation`.
///
/// The body is read and parsed only after the rate limit check, so a limited
/// client gets a 429 no matter what it sent.
pub async fn submit_consultation(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let client_ip = get_client_ip(&req, state.trust_x_forwarded_for);

    if state.rate_limiter.is_rate_limited(&client_ip) {
        tracing::warn!(client_ip = %client_ip, "Consultation request rate limited");
        return Err(AppError::RateLimited);
    }

    let body = read_body(payload, MAX_CONSULTATION_BODY_BYTES).await?;
    let request: ConsultationRequest = serde_json::from_slice(&body)?;

    let response = state.consultation_handler.submit(request).await?;

    Ok(HttpResponse::Ok().json(response))
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, AppError> {
    let mut body = web::BytesMut::new();
    let mut overflowed = false;

    // Oversized bodies are drained rather than abandoned so the client still reads the response.
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(payload_error)?;
        if overflowed || body.len() + chunk.len() > limit {
            overflowed = true;
            continue;
        }
        body.extend_from_slice(&chunk);
    }

    if overflowed {
        return Err(payload_error(PayloadError::Overflow));
    }
    Ok(body)
}

fn payload_error(err: PayloadError) -> AppError {
    match err {
        PayloadError::Overflow => AppError::BadRequest("Request body is too large".into()),
        other => AppError::BadRequest(format!("Invalid request body: {}", other)),
    }
}

/// Preflight short-circuit.
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

pub async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}
