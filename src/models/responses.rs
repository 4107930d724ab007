//! Typed gateway response built from the raw callback parameter map.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ResponseError;

/// Primary code for a successful operation.
pub const PRCODE_OK: i32 = 0;
/// Primary code for "additional info requested"; not an error.
pub const PRCODE_PENDING: i32 = 200;

const REQUIRED_FIELDS: [&str; 6] = [
    "OPERATION",
    "ORDERNUMBER",
    "PRCODE",
    "SRCODE",
    "DIGEST",
    "DIGEST1",
];

/// Gateway response after structural validation. Digest verification is a
/// separate, repeatable step; building this object performs no cryptography.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub operation: String,
    /// Kept in wire form; the gateway echoes the merchant's order number.
    pub order_number: String,
    pub mer_order_num: Option<String>,
    pub md: Option<String>,
    pub prcode: i32,
    pub srcode: i32,
    pub result_text: Option<String>,
    pub digest: String,
    pub digest1: String,
}

impl PaymentResponse {
    /// Builds a response from the raw transport map. All missing required
    /// keys are reported together; empty optionals normalize to absent.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ResponseError> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| params.get(*key).map_or(true, |v| v.is_empty()))
            .collect();
        if !missing.is_empty() {
            return Err(ResponseError::MissingFields(missing));
        }

        let opt = |key: &str| params.get(key).filter(|v| !v.is_empty()).cloned();

        Ok(Self {
            operation: params["OPERATION"].clone(),
            order_number: params["ORDERNUMBER"].clone(),
            mer_order_num: opt("MERORDERNUM"),
            md: opt("MD"),
            prcode: parse_code("PRCODE", &params["PRCODE"])?,
            srcode: parse_code("SRCODE", &params["SRCODE"])?,
            result_text: opt("RESULTTEXT"),
            digest: params["DIGEST"].clone(),
            digest1: params["DIGEST1"].clone(),
        })
    }

    /// True unless the primary code means success or pending.
    pub fn has_error(&self) -> bool {
        !matches!(self.prcode, PRCODE_OK | PRCODE_PENDING)
    }

    /// Values covered by the gateway-origin digest, in wire order. Optionals
    /// participate only when present.
    pub fn digest_base(&self) -> Vec<String> {
        let mut values = vec![self.operation.clone(), self.order_number.clone()];
        if let Some(v) = &self.mer_order_num {
            values.push(v.clone());
        }
        if let Some(v) = &self.md {
            values.push(v.clone());
        }
        values.push(self.prcode.to_string());
        values.push(self.srcode.to_string());
        if let Some(v) = &self.result_text {
            values.push(v.clone());
        }
        values
    }

    /// Values covered by the second digest: the gateway-origin set extended
    /// with the merchant number, binding the response to this merchant.
    pub fn digest1_base(&self, merchant_number: &str) -> Vec<String> {
        let mut values = self.digest_base();
        values.push(merchant_number.to_string());
        values
    }
}

fn parse_code(field: &'static str, value: &str) -> Result<i32, ResponseError> {
    value.parse().map_err(|_| ResponseError::MalformedField {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete() -> HashMap<String, String> {
        raw(&[
            ("OPERATION", "FINALIZE_ORDER"),
            ("ORDERNUMBER", "123"),
            ("PRCODE", "0"),
            ("SRCODE", "0"),
            ("DIGEST", "c2lnbmF0dXJl"),
            ("DIGEST1", "c2lnbmF0dXJlMQ=="),
        ])
    }

    #[test]
    fn parses_complete_response() {
        let response = PaymentResponse::from_params(&complete()).unwrap();
        assert_eq!(response.operation, "FINALIZE_ORDER");
        assert_eq!(response.order_number, "123");
        assert_eq!(response.prcode, 0);
        assert!(!response.has_error());
    }

    #[test]
    fn missing_second_digest_is_named() {
        let mut params = complete();
        params.remove("DIGEST1");
        match PaymentResponse::from_params(&params) {
            Err(ResponseError::MissingFields(fields)) => assert_eq!(fields, vec!["DIGEST1"]),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn all_missing_fields_reported_together() {
        let params = raw(&[("OPERATION", "FINALIZE_ORDER"), ("ORDERNUMBER", "123")]);
        match PaymentResponse::from_params(&params) {
            Err(ResponseError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["PRCODE", "SRCODE", "DIGEST", "DIGEST1"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn empty_required_field_counts_as_missing() {
        let mut params = complete();
        params.insert("PRCODE".to_string(), String::new());
        assert!(matches!(
            PaymentResponse::from_params(&params),
            Err(ResponseError::MissingFields(f)) if f == vec!["PRCODE"]
        ));
    }

    #[test]
    fn non_numeric_code_is_malformed() {
        let mut params = complete();
        params.insert("SRCODE".to_string(), "seven".to_string());
        assert!(matches!(
            PaymentResponse::from_params(&params),
            Err(ResponseError::MalformedField { field: "SRCODE", .. })
        ));
    }

    #[test]
    fn pending_is_not_an_error() {
        let mut params = complete();
        params.insert("PRCODE".to_string(), "200".to_string());
        let response = PaymentResponse::from_params(&params).unwrap();
        assert!(!response.has_error());

        params.insert("PRCODE".to_string(), "30".to_string());
        let response = PaymentResponse::from_params(&params).unwrap();
        assert!(response.has_error());
    }

    #[test]
    fn digest_base_includes_present_optionals_in_order() {
        let mut params = complete();
        params.insert("MERORDERNUM".to_string(), "INV-1".to_string());
        params.insert("MD".to_string(), "shop-7".to_string());
        params.insert("RESULTTEXT".to_string(), "OK".to_string());
        let response = PaymentResponse::from_params(&params).unwrap();
        assert_eq!(
            response.digest_base(),
            ["FINALIZE_ORDER", "123", "INV-1", "shop-7", "0", "0", "OK"]
        );
        assert_eq!(
            response.digest1_base("654321"),
            ["FINALIZE_ORDER", "123", "INV-1", "shop-7", "0", "0", "OK", "654321"]
        );
    }

    #[test]
    fn empty_optionals_are_absent_from_digest_base() {
        let mut params = complete();
        params.insert("MD".to_string(), String::new());
        let response = PaymentResponse::from_params(&params).unwrap();
        assert_eq!(response.md, None);
        assert_eq!(response.digest_base(), ["FINALIZE_ORDER", "123", "0", "0"]);
    }
}
