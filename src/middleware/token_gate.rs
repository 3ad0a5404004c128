use std::sync::Arc;

use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::{Request, Response, header::AUTHORIZATION, request::Parts};
use axum::response::IntoResponse;
use tower::{Layer, Service};

use crate::auth::{Claims, TokenGate};
use crate::error::AppError;

/// Tower Layer that puts routes behind the bearer token gate.
#[derive(Clone)]
pub struct TokenGateLayer {
    gate: Arc<TokenGate>,
}

impl TokenGateLayer {
    pub fn new(gate: Arc<TokenGate>) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for TokenGateLayer {
    type Service = TokenGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TokenGateService {
            inner,
            gate: self.gate.clone(),
        }
    }
}

/// Forwards a request only when it carries a live bearer token. The decoded
/// [`Claims`] replace whatever the request extensions held before.
#[derive(Clone)]
pub struct TokenGateService<S> {
    inner: S,
    gate: Arc<TokenGate>,
}

impl<S> Service<Request<Body>> for TokenGateService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        match self.gate.authorize(req.headers().get(AUTHORIZATION)) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);

                // Call the instance that was polled ready, leave a fresh clone behind.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(rejection) => Box::pin(async move { Ok(rejection.into_response()) }),
        }
    }
}

/// Claims of the caller, as attached by [`TokenGateLayer`].
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "no claims on request; route is not behind TokenGateLayer"
                ))
            })
    }
}
