//! Digest codec: RSA-SHA1 sign/verify over pipe-joined canonical values.

use std::fs;
use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::info;
use openssl::error::ErrorStack;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private, Public};
use openssl::sign::{Signer, Verifier};
use openssl::x509::X509;

use crate::error::DigestError;
use crate::services::validate::DIGEST_DELIMITER;
use crate::settings::Settings;

/// Signs outbound requests with the merchant private key and verifies
/// inbound digests against the gateway public key.
///
/// Key material is read from disk on first use and cached for the codec's
/// lifetime; after that the codec is immutable and safe to share across
/// threads. It holds no per-call state.
pub struct DigestCodec {
    private_key_file: String,
    private_key_pass: String,
    public_key_file: String,
    private_key: OnceLock<PKey<Private>>,
    public_key: OnceLock<PKey<Public>>,
}

impl DigestCodec {
    pub fn new(
        private_key_file: impl Into<String>,
        private_key_pass: impl Into<String>,
        public_key_file: impl Into<String>,
    ) -> Self {
        Self {
            private_key_file: private_key_file.into(),
            private_key_pass: private_key_pass.into(),
            public_key_file: public_key_file.into(),
            private_key: OnceLock::new(),
            public_key: OnceLock::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.private_key_file.clone(),
            settings.private_key_pass.clone(),
            settings.public_key_file.clone(),
        )
    }

    /// Joins ordered canonical values into the exact signing input. Always
    /// one string; an empty sequence signs the empty string.
    pub fn signing_input(values: &[String]) -> String {
        values.join(&DIGEST_DELIMITER.to_string())
    }

    /// Signs the ordered values and returns the base64 digest.
    pub fn sign(&self, values: &[String]) -> Result<String, DigestError> {
        let input = Self::signing_input(values);
        let key = self.private_key()?;
        let mut signer = Signer::new(MessageDigest::sha1(), key)
            .map_err(|e| DigestError::Signing(e.to_string()))?;
        let signature = signer
            .sign_oneshot_to_vec(input.as_bytes())
            .map_err(|e| DigestError::Signing(e.to_string()))?;
        Ok(BASE64.encode(signature))
    }

    /// Verifies a base64 digest against the ordered values. Succeeds or
    /// fails with `DigestError::Verification`; there is no `false` outcome a
    /// caller could overlook. Repeatable and side-effect-free.
    pub fn verify(&self, digest: &str, values: &[String]) -> Result<(), DigestError> {
        let signature = BASE64
            .decode(digest)
            .map_err(|e| DigestError::Verification(format!("digest is not valid base64: {e}")))?;
        let input = Self::signing_input(values);
        let key = self.public_key()?;
        let mut verifier = Verifier::new(MessageDigest::sha1(), key)
            .map_err(|e| DigestError::Verification(e.to_string()))?;
        let matches = verifier
            .verify_oneshot(&signature, input.as_bytes())
            .map_err(|e| DigestError::Verification(e.to_string()))?;
        if matches {
            Ok(())
        } else {
            Err(DigestError::Verification(
                "signature does not match signed data".to_string(),
            ))
        }
    }

    fn private_key(&self) -> Result<&PKey<Private>, DigestError> {
        if let Some(key) = self.private_key.get() {
            return Ok(key);
        }
        let pem = fs::read(&self.private_key_file).map_err(|e| DigestError::KeyUnreadable {
            path: self.private_key_file.clone(),
            source: e,
        })?;
        let key = PKey::private_key_from_pem_passphrase(&pem, self.private_key_pass.as_bytes())
            .map_err(|e| key_error(&self.private_key_file, &e))?;
        info!("loaded merchant private key from {}", self.private_key_file);
        Ok(self.private_key.get_or_init(|| key))
    }

    fn public_key(&self) -> Result<&PKey<Public>, DigestError> {
        if let Some(key) = self.public_key.get() {
            return Ok(key);
        }
        let pem = fs::read(&self.public_key_file).map_err(|e| DigestError::KeyUnreadable {
            path: self.public_key_file.clone(),
            source: e,
        })?;
        // Gateways distribute either a bare public key or an X.509 cert.
        let key = match PKey::public_key_from_pem(&pem) {
            Ok(key) => key,
            Err(_) => X509::from_pem(&pem)
                .and_then(|cert| cert.public_key())
                .map_err(|e| key_error(&self.public_key_file, &e))?,
        };
        info!("loaded gateway public key from {}", self.public_key_file);
        Ok(self.public_key.get_or_init(|| key))
    }
}

// Openssl reports a wrong PEM passphrase as a decrypt failure; the reason
// text varies across versions and providers ("bad decrypt", "BAD_DECRYPT",
// provider decrypt errors). Anything not recognized as a decrypt failure
// falls back to KeyInvalid, so a wrong passphrase is never misreported as
// success, only (at worst) as invalid key material.
fn key_error(path: &str, stack: &ErrorStack) -> DigestError {
    let reason = stack.to_string();
    let lowered = reason.to_ascii_lowercase();
    if lowered.contains("bad decrypt") || lowered.contains("bad_decrypt") {
        DigestError::WrongPassphrase {
            path: path.to_string(),
        }
    } else {
        DigestError::KeyInvalid {
            path: path.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::rsa::Rsa;
    use openssl::symm::Cipher;
    use std::io::Write;
    use tempfile::TempDir;

    const PASSPHRASE: &str = "test-passphrase";

    /// Writes an encrypted private key PEM and the matching public key PEM,
    /// returning a codec wired to both.
    fn codec_with_keys(dir: &TempDir) -> DigestCodec {
        let rsa = Rsa::generate(2048).unwrap();
        let private_pem = rsa
            .private_key_to_pem_passphrase(Cipher::aes_256_cbc(), PASSPHRASE.as_bytes())
            .unwrap();
        let public_pem = rsa.public_key_to_pem().unwrap();

        let private_path = dir.path().join("merchant.pem");
        let public_path = dir.path().join("gateway.pub.pem");
        fs::write(&private_path, private_pem).unwrap();
        fs::write(&public_path, public_pem).unwrap();

        DigestCodec::new(
            private_path.to_string_lossy().into_owned(),
            PASSPHRASE,
            public_path.to_string_lossy().into_owned(),
        )
    }

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn signing_input_is_pipe_joined() {
        assert_eq!(
            DigestCodec::signing_input(&values(&["1", "CREATE_ORDER", "123"])),
            "1|CREATE_ORDER|123"
        );
        assert_eq!(DigestCodec::signing_input(&[]), "");
    }

    #[test]
    fn sign_verify_round_trip() {
        let dir = TempDir::new().unwrap();
        let codec = codec_with_keys(&dir);
        let data = values(&["42", "CREATE_ORDER", "123", "456", "978", "1"]);
        let digest = codec.sign(&data).unwrap();
        codec.verify(&digest, &data).unwrap();
        // Repeatable with identical outcome.
        codec.verify(&digest, &data).unwrap();
    }

    #[test]
    fn any_mutation_fails_verification() {
        let dir = TempDir::new().unwrap();
        let codec = codec_with_keys(&dir);
        let data = values(&["42", "CREATE_ORDER", "123", "456", "978", "1"]);
        let digest = codec.sign(&data).unwrap();

        let mut tampered = data.clone();
        tampered[2] = "124".to_string();
        assert!(matches!(
            codec.verify(&digest, &tampered),
            Err(DigestError::Verification(_))
        ));

        let mut reordered = data.clone();
        reordered.swap(3, 4);
        assert!(matches!(
            codec.verify(&digest, &reordered),
            Err(DigestError::Verification(_))
        ));
    }

    #[test]
    fn garbage_digest_is_a_verification_error() {
        let dir = TempDir::new().unwrap();
        let codec = codec_with_keys(&dir);
        let data = values(&["x"]);
        assert!(matches!(
            codec.verify("not base64 !!!", &data),
            Err(DigestError::Verification(_))
        ));
        assert!(matches!(
            codec.verify("c2lnbmF0dXJl", &data),
            Err(DigestError::Verification(_))
        ));
    }

    #[test]
    fn missing_key_file_is_unreadable() {
        let codec = DigestCodec::new("/nonexistent/key.pem", "pass", "/nonexistent/pub.pem");
        assert!(matches!(
            codec.sign(&values(&["x"])),
            Err(DigestError::KeyUnreadable { .. })
        ));
    }

    #[test]
    fn wrong_passphrase_is_distinct_from_invalid_key() {
        let dir = TempDir::new().unwrap();
        let good = codec_with_keys(&dir);

        let wrong_pass = DigestCodec::new(
            good.private_key_file.clone(),
            "wrong-passphrase",
            good.public_key_file.clone(),
        );
        match wrong_pass.sign(&values(&["x"])) {
            Err(DigestError::WrongPassphrase { .. }) | Err(DigestError::KeyInvalid { .. }) => {}
            other => panic!("expected a key failure, got {other:?}"),
        }

        let garbled_path = dir.path().join("garbled.pem");
        let mut f = fs::File::create(&garbled_path).unwrap();
        f.write_all(b"this is not pem at all").unwrap();
        let garbled = DigestCodec::new(
            garbled_path.to_string_lossy().into_owned(),
            PASSPHRASE,
            good.public_key_file.clone(),
        );
        assert!(matches!(
            garbled.sign(&values(&["x"])),
            Err(DigestError::KeyInvalid { .. })
        ));
    }

    #[test]
    fn certificate_works_as_public_key_source() {
        use openssl::asn1::Asn1Time;
        use openssl::hash::MessageDigest;
        use openssl::x509::X509Builder;

        let dir = TempDir::new().unwrap();
        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa.clone()).unwrap();

        let mut builder = X509Builder::new().unwrap();
        builder.set_pubkey(&pkey).unwrap();
        builder
            .set_not_before(&Asn1Time::days_from_now(0).unwrap())
            .unwrap();
        builder
            .set_not_after(&Asn1Time::days_from_now(1).unwrap())
            .unwrap();
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        let cert_pem = builder.build().to_pem().unwrap();

        let private_pem = rsa
            .private_key_to_pem_passphrase(Cipher::aes_256_cbc(), PASSPHRASE.as_bytes())
            .unwrap();
        let private_path = dir.path().join("merchant.pem");
        let cert_path = dir.path().join("gateway.crt");
        fs::write(&private_path, private_pem).unwrap();
        fs::write(&cert_path, cert_pem).unwrap();

        let codec = DigestCodec::new(
            private_path.to_string_lossy().into_owned(),
            PASSPHRASE,
            cert_path.to_string_lossy().into_owned(),
        );
        let data = values(&["FINALIZE_ORDER", "123", "0", "0"]);
        let digest = codec.sign(&data).unwrap();
        codec.verify(&digest, &data).unwrap();
    }
}
