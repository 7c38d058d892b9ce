//! Checkout commands.

use secrecy::ExposeSecret;
use storecart::client::checkout as run_checkout;
use storecart::{CartConfig, CheckoutOutcome, StorefrontClient};

use super::{CliCart, CommandError};

/// CSRF token from the flag, falling back to configuration.
fn csrf_token(config: &CartConfig, flag: Option<String>) -> Result<String, CommandError> {
    flag.or_else(|| {
        config
            .csrf_token
            .as_ref()
            .map(|token| token.expose_secret().to_owned())
    })
    .ok_or(CommandError::Missing(
        "CSRF token (--csrf or STOREFRONT_CSRF_TOKEN)",
    ))
}

/// Print the purchase form fields for the current cart.
///
/// # Errors
///
/// Returns an error if the cart is empty.
#[allow(clippy::print_stdout)]
pub fn payload(
    store: &mut CliCart,
    config: &CartConfig,
    csrf: Option<String>,
) -> Result<(), CommandError> {
    let token = csrf_token(config, csrf).unwrap_or_default();
    let payload = store.checkout_payload()?;
    for (name, value) in payload.form_fields(&token) {
        println!("{name}={value}");
    }
    Ok(())
}

/// Submit the cart to the configured storefront.
///
/// # Errors
///
/// Returns an error if configuration is missing, the cart is empty or the
/// storefront cannot be reached.
#[allow(clippy::print_stdout)]
pub async fn checkout(
    store: &mut CliCart,
    config: &CartConfig,
    csrf: Option<String>,
) -> Result<(), CommandError> {
    let base_url = config.require_base_url()?.clone();
    let token = csrf_token(config, csrf)?;
    let client = StorefrontClient::new(base_url, config.session_cookie.as_ref())?;

    match run_checkout(store, &client, &token).await? {
        CheckoutOutcome::Completed => println!("Purchase completed"),
        CheckoutOutcome::Rejected => println!("Purchase was not accepted; cart kept"),
        CheckoutOutcome::LoginRequired { login_url } => {
            println!("Sign in first: {login_url}");
        }
    }
    Ok(())
}
