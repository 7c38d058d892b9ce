//! HTTP driver for checkout.
//!
//! Checkout is a hand-off: the storefront is asked whether the shopper is
//! signed in, then the cart is posted as a form to the purchase endpoint.
//! The endpoint answers with a redirect whose `compraExitosa` query flag
//! tells whether the purchase went through.
//!
//! # Endpoints
//!
//! - `GET usuarios/authenticated` - JSON `true`/`false`
//! - `POST compras/nueva` - form-encoded purchase, answers with a redirect
//! - `usuarios/login` - where unauthenticated shoppers are sent

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, LOCATION};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::checkout::CheckoutPayload;
use crate::error::CartError;
use crate::notify::Notifier;
use crate::storage::KeyValueStore;
use crate::store::CartStore;

const AUTH_PATH: &str = "usuarios/authenticated";
const PURCHASE_PATH: &str = "compras/nueva";
const LOGIN_PATH: &str = "usuarios/login";
const SUCCESS_PARAM: &str = "compraExitosa";

/// Errors from the checkout driver.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart refused to produce a payload.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The request could not be sent or its body not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront answered with a status the driver does not handle.
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),

    /// The purchase endpoint did not answer with a redirect.
    #[error("Purchase response did not redirect")]
    MissingRedirect,

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The session cookie is not a valid header value.
    #[error("Invalid session cookie")]
    InvalidCookie,
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The storefront accepted the purchase.
    Completed,
    /// The storefront rejected the purchase; the cart is kept.
    Rejected,
    /// The shopper has to sign in first.
    LoginRequired { login_url: Url },
}

/// Client for the storefront's checkout endpoints.
///
/// Redirects are not followed; the purchase outcome is read from the
/// redirect target.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a client for the storefront at `base_url`.
    ///
    /// `session_cookie` is sent as the `Cookie` header on every request so
    /// the storefront can recognise the signed-in shopper.
    ///
    /// # Errors
    ///
    /// Returns error if the cookie is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(
        mut base_url: Url,
        session_cookie: Option<&SecretString>,
    ) -> Result<Self, CheckoutError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let mut value = HeaderValue::from_str(cookie.expose_secret())
                .map_err(|_| CheckoutError::InvalidCookie)?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner { client, base_url }),
        })
    }

    /// The storefront base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Where unauthenticated shoppers are sent.
    ///
    /// # Errors
    ///
    /// Returns error if the login URL cannot be built from the base URL.
    pub fn login_url(&self) -> Result<Url, CheckoutError> {
        Ok(self.inner.base_url.join(LOGIN_PATH)?)
    }

    /// Ask the storefront whether the current session is signed in.
    ///
    /// A redirect (the storefront bouncing to its login page) counts as
    /// not signed in.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the answer is not a boolean.
    #[instrument(skip(self))]
    pub async fn is_authenticated(&self) -> Result<bool, CheckoutError> {
        let url = self.inner.base_url.join(AUTH_PATH)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<bool>().await?);
        }
        if status.is_redirection() || status == StatusCode::UNAUTHORIZED {
            return Ok(false);
        }
        Err(CheckoutError::UnexpectedStatus(status.as_u16()))
    }

    /// Post a purchase.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the storefront answers with
    /// something other than a redirect or an auth challenge.
    #[instrument(skip(self, csrf_token, payload), fields(items = payload.len()))]
    pub async fn submit_purchase(
        &self,
        csrf_token: &str,
        payload: &CheckoutPayload,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let url = self.inner.base_url.join(PURCHASE_PATH)?;
        let fields = payload.form_fields(csrf_token);
        let response = self
            .inner
            .client
            .post(url.clone())
            .form(&fields)
            .send()
            .await?;
        let status = response.status();

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(CheckoutOutcome::LoginRequired {
                login_url: self.login_url()?,
            });
        }
        if !status.is_redirection() {
            return Err(CheckoutError::UnexpectedStatus(status.as_u16()));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(CheckoutError::MissingRedirect)?;
        let target = url.join(location)?;
        Ok(self.classify_redirect(&target))
    }

    fn classify_redirect(&self, target: &Url) -> CheckoutOutcome {
        let flag = target
            .query_pairs()
            .find(|(key, _)| key == SUCCESS_PARAM)
            .map(|(_, value)| value == "true");

        match flag {
            Some(true) => CheckoutOutcome::Completed,
            Some(false) => CheckoutOutcome::Rejected,
            None if target.path().ends_with(LOGIN_PATH) => CheckoutOutcome::LoginRequired {
                login_url: target.clone(),
            },
            None => {
                tracing::warn!(target = %target, "Unrecognised purchase redirect");
                CheckoutOutcome::Rejected
            }
        }
    }
}

/// Run the checkout flow for `store`.
///
/// 1. Probe authentication; a negative or failed probe yields
///    [`CheckoutOutcome::LoginRequired`] and leaves the cart alone.
/// 2. Build the payload; an empty cart fails with [`CartError::EmptyCart`].
/// 3. Submit. A completed purchase clears the cart.
///
/// # Errors
///
/// Returns error if the cart is empty or the submission fails.
pub async fn checkout<S, N>(
    store: &mut CartStore<S, N>,
    client: &StorefrontClient,
    csrf_token: &str,
) -> Result<CheckoutOutcome, CheckoutError>
where
    S: KeyValueStore,
    N: Notifier,
{
    match client.is_authenticated().await {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!("Shopper not signed in, checkout needs login");
            return Ok(CheckoutOutcome::LoginRequired {
                login_url: client.login_url()?,
            });
        }
        Err(e) => {
            tracing::error!(error = %e, "Authentication check failed");
            return Ok(CheckoutOutcome::LoginRequired {
                login_url: client.login_url()?,
            });
        }
    }

    let payload = store.checkout_payload()?;
    let outcome = client.submit_purchase(csrf_token, &payload).await?;

    match &outcome {
        CheckoutOutcome::Completed => {
            tracing::info!(items = payload.len(), "Purchase completed");
            store.clear();
            store
                .notifier_mut()
                .success("Purchase completed successfully");
        }
        CheckoutOutcome::Rejected => {
            tracing::warn!(items = payload.len(), "Purchase rejected");
            store.notifier_mut().error("Purchase failed");
        }
        CheckoutOutcome::LoginRequired { .. } => {
            tracing::info!("Purchase bounced to login");
        }
    }
    Ok(outcome)
}
