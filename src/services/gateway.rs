//! Orchestration: build and sign CREATE_ORDER requests, verify and classify
//! gateway responses.

use std::collections::HashMap;

use log::{info, warn};

use crate::error::{GatewayError, WebpayError};
use crate::models::requests::PaymentRequestValues;
use crate::models::responses::{PaymentResponse, PRCODE_PENDING};
use crate::services::classify;
use crate::services::crypto::DigestCodec;
use crate::settings::Settings;

/// Resolved outcome of a verified gateway response. Gateway-reported
/// failures are not an outcome; they surface as `WebpayError::Gateway`.
#[derive(Debug)]
pub enum PaymentOutcome {
    Success(PaymentResponse),
    /// Gateway asked for additional information (primary code 200).
    Pending(PaymentResponse),
}

/// Merchant-side handle composing the settings and the digest codec.
/// Performs no network I/O: it produces the parameter map the caller sends
/// and consumes the raw map the caller received.
pub struct Gateway {
    settings: Settings,
    codec: DigestCodec,
}

impl Gateway {
    pub fn new(settings: Settings) -> Self {
        let codec = DigestCodec::from_settings(&settings);
        Self { settings, codec }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds the transmittable parameter map for a CREATE_ORDER request:
    /// the canonical sequence, the DIGEST over exactly its values, then the
    /// unsigned LANG field when requested.
    pub fn create_order(
        &self,
        values: &PaymentRequestValues,
    ) -> Result<Vec<(String, String)>, WebpayError> {
        let sequence = values.canonical_sequence(&self.settings)?;
        let signed: Vec<String> = sequence.iter().map(|(_, v)| v.clone()).collect();
        let digest = self.codec.sign(&signed)?;

        let mut params: Vec<(String, String)> = sequence
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        params.push(("DIGEST".to_string(), digest));
        if let Some(lang) = values.lang() {
            params.push(("LANG".to_string(), lang.to_string()));
        }

        info!(
            "prepared CREATE_ORDER request for order {}",
            values.order_number()
        );
        Ok(params)
    }

    /// Single-pass verification of a raw gateway response: structural parse,
    /// both digest verifications, then result classification. Any failed
    /// step is terminal; a response is never trusted on partial signature
    /// success.
    pub fn process_response(
        &self,
        raw: &HashMap<String, String>,
        lang: &str,
    ) -> Result<PaymentOutcome, WebpayError> {
        let response = PaymentResponse::from_params(raw)?;

        self.codec.verify(&response.digest, &response.digest_base())?;
        self.codec.verify(
            &response.digest1,
            &response.digest1_base(&self.settings.merchant_number),
        )?;

        if response.has_error() {
            warn!(
                "gateway reported failure for order {}: PRCODE={} SRCODE={}",
                response.order_number, response.prcode, response.srcode
            );
            return Err(GatewayError {
                prcode: response.prcode,
                srcode: response.srcode,
                message: classify::result_message(response.prcode, response.srcode, lang),
                customer_facing: classify::is_error_for_customer(response.prcode),
            }
            .into());
        }

        info!(
            "verified gateway response for order {}: PRCODE={}",
            response.order_number, response.prcode
        );
        if response.prcode == PRCODE_PENDING {
            Ok(PaymentOutcome::Pending(response))
        } else {
            Ok(PaymentOutcome::Success(response))
        }
    }
}
