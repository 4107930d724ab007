//! Outbound CREATE_ORDER request values and the canonical field sequence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::currency;
use crate::services::validate;
use crate::settings::Settings;

/// The only gateway operation this crate issues.
pub const OPERATION_CREATE_ORDER: &str = "CREATE_ORDER";

/// Payment method codes accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayMethod {
    /// Card payment.
    Crd,
    /// MasterCard Mobile.
    Mcm,
    /// MasterPass wallet.
    Mps,
    /// Bank-button transfer.
    Btncs,
    /// Google Pay.
    Gpay,
    /// Apple Pay.
    Apay,
}

impl PayMethod {
    pub const fn code(self) -> &'static str {
        match self {
            PayMethod::Crd => "CRD",
            PayMethod::Mcm => "MCM",
            PayMethod::Mps => "MPS",
            PayMethod::Btncs => "BTNCS",
            PayMethod::Gpay => "GPAY",
            PayMethod::Apay => "APAY",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "CRD" => Some(PayMethod::Crd),
            "MCM" => Some(PayMethod::Mcm),
            "MPS" => Some(PayMethod::Mps),
            "BTNCS" => Some(PayMethod::Btncs),
            "GPAY" => Some(PayMethod::Gpay),
            "APAY" => Some(PayMethod::Apay),
            _ => None,
        }
    }
}

/// Raw order parameters as supplied by the caller, not yet validated.
/// Empty strings, empty lists and zero ids mean "absent".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
    pub order_number: u64,
    pub price: Decimal,
    pub currency: u16,
    pub deposit_flag: bool,
    #[serde(default)]
    pub mer_order_num: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Merchant note / correlation value echoed back by the gateway.
    #[serde(default)]
    pub md: Option<String>,
    /// Display language for the gateway's payment page. Never signed.
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub pay_method: Option<String>,
    #[serde(default)]
    pub disable_pay_method: Option<String>,
    #[serde(default)]
    pub pay_methods: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub add_info: Option<String>,
    #[serde(default)]
    pub fastpay_id: Option<u64>,
}

/// Fully validated, immutable request values. Either every constraint holds
/// or construction fails; no partially valid instance exists.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequestValues {
    order_number: u64,
    amount: u64,
    currency: u16,
    deposit_flag: bool,
    mer_order_num: Option<String>,
    description: Option<String>,
    md: Option<String>,
    lang: Option<String>,
    pay_method: Option<PayMethod>,
    disable_pay_method: Option<PayMethod>,
    pay_methods: Vec<PayMethod>,
    email: Option<String>,
    reference_number: Option<String>,
    add_info: Option<String>,
    fastpay_id: Option<u64>,
}

impl PaymentRequestValues {
    pub fn new(order: NewOrder) -> Result<Self, ValidationError> {
        validate::digits_max("ORDERNUMBER", order.order_number, 15)?;

        let amount = currency::minor_amount(order.price, order.currency)?;
        validate::digits_max("AMOUNT", amount, 15)?;

        let mer_order_num = checked_text("MERORDERNUM", order.mer_order_num, 30)?;
        let description = checked_text("DESCRIPTION", order.description, 255)?;
        let md = checked_text("MD", order.md, 255)?;
        let reference_number = checked_text("REFERENCENUMBER", order.reference_number, 20)?;
        let add_info = checked_text("ADDINFO", order.add_info, 24_000)?;

        let email = match normalized(order.email) {
            Some(value) => {
                validate::max_length("EMAIL", &value, 255)?;
                validate::email("EMAIL", &value)?;
                Some(value)
            }
            None => None,
        };

        let lang = match normalized(order.lang) {
            Some(value) => {
                validate::language("LANG", &value)?;
                Some(value.to_ascii_lowercase())
            }
            None => None,
        };

        let pay_method = checked_method(order.pay_method)?;
        let disable_pay_method = checked_method(order.disable_pay_method)?;
        let pay_methods = checked_methods(order.pay_methods)?;

        let fastpay_id = match order.fastpay_id {
            Some(0) | None => None,
            Some(id) => {
                validate::digits_max("FASTPAYID", id, 15)?;
                Some(id)
            }
        };

        Ok(Self {
            order_number: order.order_number,
            amount,
            currency: order.currency,
            deposit_flag: order.deposit_flag,
            mer_order_num,
            description,
            md,
            lang,
            pay_method,
            disable_pay_method,
            pay_methods,
            email,
            reference_number,
            add_info,
            fastpay_id,
        })
    }

    pub fn order_number(&self) -> u64 {
        self.order_number
    }

    /// Minor-unit amount derived from price and currency exponent.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn currency(&self) -> u16 {
        self.currency
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Canonical (key, value) sequence in protocol-fixed order. Its values,
    /// pipe-joined, are exactly the signing input. Absent optionals are
    /// omitted entirely; LANG never appears here.
    ///
    /// A `default_correlation` substituted for a missing MD is held to the
    /// same constraints as a caller-supplied MD, since it becomes a signed
    /// value.
    pub fn canonical_sequence(
        &self,
        settings: &Settings,
    ) -> Result<Vec<(&'static str, String)>, ValidationError> {
        let mut seq: Vec<(&'static str, String)> = vec![
            ("MERCHANTNUMBER", settings.merchant_number.clone()),
            ("OPERATION", OPERATION_CREATE_ORDER.to_string()),
            ("ORDERNUMBER", self.order_number.to_string()),
            ("AMOUNT", self.amount.to_string()),
            ("CURRENCY", self.currency.to_string()),
            (
                "DEPOSITFLAG",
                (if self.deposit_flag { "1" } else { "0" }).to_string(),
            ),
        ];
        if let Some(v) = &self.mer_order_num {
            seq.push(("MERORDERNUM", v.clone()));
        }
        if !settings.response_url.is_empty() {
            seq.push(("URL", settings.response_url.clone()));
        }
        if let Some(v) = &self.description {
            seq.push(("DESCRIPTION", v.clone()));
        }
        let md = match &self.md {
            Some(v) => Some(v.clone()),
            None => checked_text("MD", settings.default_correlation.clone(), 255)?,
        };
        if let Some(v) = md {
            seq.push(("MD", v));
        }
        if let Some(m) = self.pay_method {
            seq.push(("PAYMETHOD", m.code().to_string()));
        }
        if let Some(m) = self.disable_pay_method {
            seq.push(("DISABLEPAYMETHOD", m.code().to_string()));
        }
        if !self.pay_methods.is_empty() {
            let joined = self
                .pay_methods
                .iter()
                .map(|m| m.code())
                .collect::<Vec<_>>()
                .join(",");
            seq.push(("PAYMETHODS", joined));
        }
        if let Some(v) = &self.email {
            seq.push(("EMAIL", v.clone()));
        }
        if let Some(v) = &self.reference_number {
            seq.push(("REFERENCENUMBER", v.clone()));
        }
        if let Some(v) = &self.add_info {
            seq.push(("ADDINFO", v.clone()));
        }
        if let Some(id) = self.fastpay_id {
            seq.push(("FASTPAYID", id.to_string()));
        }
        Ok(seq)
    }
}

fn normalized(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn checked_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match normalized(value) {
        Some(v) => {
            validate::max_length(field, &v, max)?;
            validate::printable_ascii(field, &v)?;
            validate::no_delimiter(field, &v)?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

fn checked_method(value: Option<String>) -> Result<Option<PayMethod>, ValidationError> {
    match normalized(value) {
        Some(code) => PayMethod::from_code(&code)
            .map(Some)
            .ok_or_else(|| ValidationError::UnsupportedPayMethod(vec![code])),
        None => Ok(None),
    }
}

fn checked_methods(values: Vec<String>) -> Result<Vec<PayMethod>, ValidationError> {
    let mut methods = Vec::with_capacity(values.len());
    let mut unknown = Vec::new();
    for code in values {
        match PayMethod::from_code(&code) {
            Some(m) => methods.push(m),
            None => unknown.push(code),
        }
    }
    if !unknown.is_empty() {
        return Err(ValidationError::UnsupportedPayMethod(unknown));
    }
    Ok(methods)
}
