use thiserror::Error;

/// Failure while validating request field values. Construction of the owning
/// value object aborts on the first failure; no partially valid instance
/// escapes.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("field {field} exceeds maximum length {max} (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("field {field} contains characters outside printable ASCII (0x20-0x7E)")]
    NonPrintable { field: &'static str },

    #[error("field {field} contains the '|' signing delimiter")]
    ContainsDelimiter { field: &'static str },

    #[error("field {field} is not a valid e-mail address: {value:?}")]
    InvalidEmail { field: &'static str, value: String },

    #[error("field {field} exceeds {max_digits} decimal digits")]
    TooManyDigits {
        field: &'static str,
        max_digits: u32,
    },

    #[error("field {field} is not a two-letter language code: {value:?}")]
    InvalidLanguage { field: &'static str, value: String },

    #[error("unsupported payment method(s): {}", .0.join(", "))]
    UnsupportedPayMethod(Vec<String>),

    #[error("unknown currency code {0}")]
    UnknownCurrency(u16),

    #[error("amount {0} cannot be expressed as a minor-unit integer")]
    InvalidAmount(String),
}

/// Failure while loading key material or computing/checking a digest.
///
/// `verify` never reports a mismatch as a plain `false`; any non-match is a
/// `Verification` error the caller cannot silently ignore.
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("cannot read key file {path}: {source}")]
    KeyUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed PEM content. Openssl builds whose decrypt-failure text is
    /// not recognized report a wrong passphrase under this variant instead
    /// of `WrongPassphrase`; both are terminal key failures.
    #[error("invalid key material in {path}: {reason}")]
    KeyInvalid { path: String, reason: String },

    #[error("wrong passphrase for key file {path}")]
    WrongPassphrase { path: String },

    #[error("signing operation failed: {0}")]
    Signing(String),

    #[error("digest verification failed: {0}")]
    Verification(String),
}

/// Structural failure in a raw gateway response, detected before any
/// cryptographic step.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("response is missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("response field {field} is malformed: {value:?}")]
    MalformedField { field: &'static str, value: String },
}

/// A failure the gateway itself reported through its result-code pair.
///
/// `message` is localized main text plus the detail text in parentheses when
/// present. `customer_facing` tells the caller whether that text is safe to
/// show the payer verbatim; everything else belongs in operator logs only.
#[derive(Error, Debug)]
#[error("gateway declined the operation (PRCODE={prcode}, SRCODE={srcode}): {message}")]
pub struct GatewayError {
    pub prcode: i32,
    pub srcode: i32,
    pub message: String,
    pub customer_facing: bool,
}

#[derive(Error, Debug)]
pub enum WebpayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
