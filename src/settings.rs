use serde::Deserialize;

/// Merchant-side configuration consumed by the request builder and the
/// digest codec. Loading it (env, file, vault) is the caller's job.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Merchant number assigned by the gateway.
    pub merchant_number: String,
    /// Base URL the customer is redirected to.
    pub gateway_url: String,
    /// Callback URL the gateway redirects back to after payment.
    pub response_url: String,
    /// PEM file with the merchant's private key.
    pub private_key_file: String,
    /// Passphrase protecting the private key PEM.
    pub private_key_pass: String,
    /// PEM file with the gateway's public key or certificate.
    pub public_key_file: String,
    /// Default MD correlation value used when a request supplies none.
    #[serde(default)]
    pub default_correlation: Option<String>,
}
