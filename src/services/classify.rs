//! Localized classification of the gateway's (PRCODE, SRCODE) result pairs.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use log::warn;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "cs"];

// Primary codes: the outcome class reported by the gateway.
const PRIMARY_EN: &[(i32, &str)] = &[
    (0, "OK"),
    (1, "Field too long"),
    (2, "Field too short"),
    (3, "Incorrect content of field"),
    (4, "Field is null"),
    (5, "Missing required field"),
    (11, "Unknown merchant"),
    (14, "Duplicate order number"),
    (15, "Object not found"),
    (17, "Amount to deposit exceeds approved amount"),
    (18, "Total sum of credited amounts exceeded deposited amount"),
    (20, "Object not in valid state for operation"),
    (25, "Operation not allowed for user"),
    (26, "Technical problem in connection to authorization center"),
    (27, "Incorrect order type"),
    (28, "Declined in 3D"),
    (30, "Declined in authorization center"),
    (31, "Wrong digest"),
    (35, "Session expired"),
    (50, "The cardholder canceled the payment"),
    (200, "Additional info request"),
    (1000, "Technical problem"),
];

const PRIMARY_CS: &[(i32, &str)] = &[
    (0, "OK"),
    (1, "Pole je prilis dlouhe"),
    (2, "Pole je prilis kratke"),
    (3, "Chybny obsah pole"),
    (4, "Pole je prazdne"),
    (5, "Chybi povinne pole"),
    (11, "Neznamy obchodnik"),
    (14, "Duplicitni cislo objednavky"),
    (15, "Objekt nenalezen"),
    (17, "Castka k uhrade prekrocila autorizovanou castku"),
    (18, "Soucet vracenych castek prekrocil uhrazenou castku"),
    (20, "Objekt neni ve stavu odpovidajicim teto operaci"),
    (25, "Uzivatel neni opravnen k provedeni operace"),
    (26, "Technicky problem pri spojeni s autorizacnim centrem"),
    (27, "Chybny typ objednavky"),
    (28, "Zamitnuto v 3D"),
    (30, "Zamitnuto v autorizacnim centru"),
    (31, "Chybny podpis"),
    (35, "Platnost spojeni vyprsela"),
    (50, "Drzitel karty zrusil platbu"),
    (200, "Zadost o doplnujici informace"),
    (1000, "Technicky problem"),
];

// Detail codes: either the offending field (low codes, wire identifiers kept
// verbatim) or the decline reason (1xxx authorization center, 3xxx 3-D
// Secure, 65xx session).
const DETAIL_EN: &[(i32, &str)] = &[
    (0, ""),
    (1, "ORDERNUMBER"),
    (2, "MERCHANTNUMBER"),
    (6, "AMOUNT"),
    (7, "CURRENCY"),
    (8, "DEPOSITFLAG"),
    (10, "MERORDERNUM"),
    (11, "CREDITNUMBER"),
    (12, "OPERATION"),
    (18, "BATCH"),
    (22, "ORDER"),
    (24, "URL"),
    (25, "MD"),
    (26, "DESC"),
    (34, "DIGEST"),
    (1001, "Declined in authorization center: card blocked"),
    (1002, "Declined in authorization center: authorization declined"),
    (1003, "Declined in authorization center: card problem"),
    (1004, "Declined in authorization center: technical problem"),
    (1005, "Declined in authorization center: account problem"),
    (3000, "Not authenticated in 3D, cardholder not authenticated"),
    (3001, "Cardholder authenticated"),
    (3002, "Not authenticated in 3D, issuer or cardholder not participating"),
    (3004, "Not authenticated in 3D, issuer not participating or cardholder not enrolled"),
    (3005, "Declined in 3D, technical problem during cardholder authentication"),
    (3006, "Declined in 3D, technical problem during cardholder authentication"),
    (3007, "Declined in 3D, acquirer technical problem"),
    (3008, "Declined in 3D, unsupported card product"),
    (6500, "Session expired"),
    (6501, "Session in wrong state"),
    (6502, "Session limit exceeded"),
];

const DETAIL_CS: &[(i32, &str)] = &[
    (0, ""),
    (1, "ORDERNUMBER"),
    (2, "MERCHANTNUMBER"),
    (6, "AMOUNT"),
    (7, "CURRENCY"),
    (8, "DEPOSITFLAG"),
    (10, "MERORDERNUM"),
    (11, "CREDITNUMBER"),
    (12, "OPERATION"),
    (18, "BATCH"),
    (22, "ORDER"),
    (24, "URL"),
    (25, "MD"),
    (26, "DESC"),
    (34, "DIGEST"),
    (1001, "Zamitnuto v autorizacnim centru: blokovana karta"),
    (1002, "Zamitnuto v autorizacnim centru: autorizace zamitnuta"),
    (1003, "Zamitnuto v autorizacnim centru: problem karty"),
    (1004, "Zamitnuto v autorizacnim centru: technicky problem"),
    (1005, "Zamitnuto v autorizacnim centru: problem uctu"),
    (3000, "Neovereno v 3D, drzitel karty nebyl overen"),
    (3001, "Drzitel karty overen"),
    (3002, "Neovereno v 3D, vydavatel karty nebo drzitel neni zapojen"),
    (3004, "Neovereno v 3D, vydavatel karty neni zapojen nebo drzitel neni prihlasen"),
    (3005, "Zamitnuto v 3D, technicky problem pri overeni drzitele karty"),
    (3006, "Zamitnuto v 3D, technicky problem pri overeni drzitele karty"),
    (3007, "Zamitnuto v 3D, technicky problem acquirera"),
    (3008, "Zamitnuto v 3D, nepodporovany karetni produkt"),
    (6500, "Platnost spojeni vyprsela"),
    (6501, "Spojeni v chybnem stavu"),
    (6502, "Prekrocen limit spojeni"),
];

const FALLBACK_EN: &str = "Unknown error";
const FALLBACK_CS: &str = "Neznama chyba";

lazy_static! {
    static ref PRIMARY_MESSAGES: HashMap<&'static str, HashMap<i32, &'static str>> = {
        let mut m = HashMap::new();
        m.insert("en", PRIMARY_EN.iter().copied().collect());
        m.insert("cs", PRIMARY_CS.iter().copied().collect());
        m
    };
    static ref DETAIL_MESSAGES: HashMap<&'static str, HashMap<i32, &'static str>> = {
        let mut m = HashMap::new();
        m.insert("en", DETAIL_EN.iter().copied().collect());
        m.insert("cs", DETAIL_CS.iter().copied().collect());
        m
    };
    static ref GENERIC_FALLBACK: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("en", FALLBACK_EN);
        m.insert("cs", FALLBACK_CS);
        m
    };
    // Primary codes whose localized text is safe to show the payer verbatim.
    // Everything else is operator-only.
    static ref CUSTOMER_SAFE: HashSet<i32> = [28, 30, 35, 50, 1000].into_iter().collect();
}

fn table_for<'a>(
    tables: &'a HashMap<&'static str, HashMap<i32, &'static str>>,
    lang: &str,
) -> (&'a HashMap<i32, &'static str>, &'static str) {
    match tables.get_key_value(lang) {
        Some((key, table)) => (table, *key),
        None => {
            warn!("unsupported display language {lang:?}, falling back to {DEFAULT_LANGUAGE:?}");
            (&tables[DEFAULT_LANGUAGE], DEFAULT_LANGUAGE)
        }
    }
}

/// Localized text for a primary result code. An unsupported language falls
/// back to the default language; a wholly unknown code yields a generic
/// message. Both degradations log a warning, neither fails.
pub fn main_message(code: i32, lang: &str) -> String {
    let (table, resolved) = table_for(&PRIMARY_MESSAGES, lang);
    match table.get(&code) {
        Some(text) => (*text).to_string(),
        None => {
            warn!("unknown primary result code {code}, returning generic message");
            GENERIC_FALLBACK[resolved].to_string()
        }
    }
}

/// Localized text for a detail code. Unknown detail codes yield the empty
/// string, never a placeholder.
pub fn detail_message(code: i32, lang: &str) -> String {
    let (table, _) = table_for(&DETAIL_MESSAGES, lang);
    match table.get(&code) {
        Some(text) => (*text).to_string(),
        None => {
            warn!("unknown detail result code {code}");
            String::new()
        }
    }
}

/// Combined message for a result-code pair: main text, with the detail text
/// in parentheses when present.
pub fn result_message(prcode: i32, srcode: i32, lang: &str) -> String {
    let main = main_message(prcode, lang);
    let detail = detail_message(srcode, lang);
    if detail.is_empty() {
        main
    } else {
        format!("{main} ({detail})")
    }
}

/// Whether a primary code's text may be shown to the payer. Total over all
/// integers; unknown codes are operator-only.
pub fn is_error_for_customer(prcode: i32) -> bool {
    CUSTOMER_SAFE.contains(&prcode)
}
