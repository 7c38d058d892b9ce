//! Integration test support for storecart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storecart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart state surviving restarts on a file-backed store
//! - `checkout_flow` - Checkout driver against a stub storefront
//!
//! The stub storefront is a local axum server that answers the sign-in probe
//! and the purchase form the way the real storefront does: a JSON boolean,
//! and a redirect carrying the `compraExitosa` flag.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;

/// Form fields of one received purchase, in submission order.
pub type PurchaseForm = Vec<(String, String)>;

/// How the stub storefront answers.
#[derive(Debug, Clone, Copy)]
pub struct StubBehavior {
    /// Answer of the sign-in probe.
    pub authenticated: bool,
    /// Whether purchases redirect with `compraExitosa=true`.
    pub accept_purchases: bool,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            authenticated: true,
            accept_purchases: true,
        }
    }
}

#[derive(Clone)]
struct StubState {
    behavior: StubBehavior,
    purchases: Arc<Mutex<Vec<PurchaseForm>>>,
}

/// A running stub storefront.
pub struct StubStorefront {
    pub base_url: Url,
    purchases: Arc<Mutex<Vec<PurchaseForm>>>,
}

impl StubStorefront {
    /// Start a stub on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(behavior: StubBehavior) -> std::io::Result<Self> {
        let purchases: Arc<Mutex<Vec<PurchaseForm>>> = Arc::default();
        let state = StubState {
            behavior,
            purchases: Arc::clone(&purchases),
        };

        let app = Router::new()
            .route("/usuarios/authenticated", get(authenticated))
            .route("/compras/nueva", post(purchase))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Ok(Self {
            base_url,
            purchases,
        })
    }

    /// Purchases received so far.
    pub async fn purchases(&self) -> Vec<PurchaseForm> {
        self.purchases.lock().await.clone()
    }
}

async fn authenticated(State(state): State<StubState>) -> Json<bool> {
    Json(state.behavior.authenticated)
}

async fn purchase(State(state): State<StubState>, Form(fields): Form<PurchaseForm>) -> Redirect {
    state.purchases.lock().await.push(fields);
    if state.behavior.accept_purchases {
        Redirect::to("/?compraExitosa=true")
    } else {
        Redirect::to("/?compraExitosa=false")
    }
}
