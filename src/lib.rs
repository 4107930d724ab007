//! Merchant-side client for an HTTP redirect card-payment gateway.
//!
//! The crate covers the digest protocol only: it validates order parameters,
//! assembles the protocol-ordered field sequence, signs it (RSA-SHA1,
//! base64), and on the way back verifies both response digests before
//! classifying the gateway's numeric result codes into localized,
//! customer-safety-aware errors. Sending and receiving the parameter maps is
//! the caller's job.

pub mod error;
pub mod models;
pub mod services;
pub mod settings;

pub use error::{DigestError, GatewayError, ResponseError, ValidationError, WebpayError};
pub use models::currency;
pub use models::requests::{NewOrder, PayMethod, PaymentRequestValues, OPERATION_CREATE_ORDER};
pub use models::responses::PaymentResponse;
pub use services::classify;
pub use services::crypto::DigestCodec;
pub use services::gateway::{Gateway, PaymentOutcome};
pub use settings::Settings;
