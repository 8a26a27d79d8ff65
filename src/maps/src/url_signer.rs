// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Signs requests authenticated with a client ID.
//!
//! Requests using client ID authentication carry a `signature` parameter,
//! an HMAC-SHA1 digest of the request path and query computed with the
//! client secret.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::engine::DecodePaddingMode;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

const SECRET_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Computes the signature of a request.
///
/// Applications using a hardware security module, or some other mechanism to
/// protect their client secret, can implement this trait and provide it via
/// [Builder::with_url_signer][crate::context::Builder::with_url_signer].
pub trait UrlSigner: Send + Sync + std::fmt::Debug {
    /// Returns the signature of `path_and_query`, for example
    /// `/maps/api/geocode/json?address=Sydney&client=my-client`.
    fn signature(&self, path_and_query: &str) -> String;
}

/// Represents an error creating a [HmacUrlSigner].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The secret is not valid base64.
    #[error("the client secret is not valid base64: {0}")]
    InvalidSecret(#[source] base64::DecodeError),
    /// The secret cannot be used as an HMAC key.
    #[error("the client secret is not a valid HMAC key")]
    InvalidKeyLength,
}

/// Signs requests with HMAC-SHA1 and a client secret.
///
/// # Example
/// ```
/// # use google_maps_services::url_signer::{HmacUrlSigner, UrlSigner};
/// let signer = HmacUrlSigner::new("vNIXE0xscrmjlyV-12Nj_BvUPaw=")?;
/// let signature = signer.signature("/maps/api/geocode/json?address=New+York&client=clientID");
/// assert_eq!(signature, "chaRF2hTJKOScPr-RQCEhZbSzIE=");
/// # Ok::<(), google_maps_services::url_signer::Error>(())
/// ```
#[derive(Clone)]
pub struct HmacUrlSigner {
    mac: HmacSha1,
}

impl HmacUrlSigner {
    /// Creates a signer from a base64 encoded client secret.
    ///
    /// Both the URL-safe (`-`, `_`) and the standard (`+`, `/`) alphabets are
    /// accepted, with or without padding.
    pub fn new<S: AsRef<str>>(secret: S) -> Result<Self, Error> {
        let normalized = secret.as_ref().trim().replace('+', "-").replace('/', "_");
        let key = SECRET_ENGINE
            .decode(normalized)
            .map_err(Error::InvalidSecret)?;
        let mac = HmacSha1::new_from_slice(&key).map_err(|_| Error::InvalidKeyLength)?;
        Ok(Self { mac })
    }
}

impl std::fmt::Debug for HmacUrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacUrlSigner")
            .field("secret", &"[censored]")
            .finish()
    }
}

impl UrlSigner for HmacUrlSigner {
    fn signature(&self, path_and_query: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(path_and_query.as_bytes());
        URL_SAFE.encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const SECRET: &str = "vNIXE0xscrmjlyV-12Nj_BvUPaw=";
    const PATH: &str = "/maps/api/geocode/json?address=New+York&client=clientID";
    const SIGNATURE: &str = "chaRF2hTJKOScPr-RQCEhZbSzIE=";

    #[test_case(SECRET; "url safe")]
    #[test_case("vNIXE0xscrmjlyV-12Nj_BvUPaw"; "without padding")]
    #[test_case("vNIXE0xscrmjlyV+12Nj/BvUPaw="; "standard alphabet")]
    fn signature(secret: &str) -> anyhow::Result<()> {
        let signer = HmacUrlSigner::new(secret)?;
        assert_eq!(signer.signature(PATH), SIGNATURE);
        Ok(())
    }

    #[test]
    fn signature_is_stable() -> anyhow::Result<()> {
        let signer = HmacUrlSigner::new(SECRET)?;
        assert_eq!(signer.signature(PATH), signer.signature(PATH));
        assert_ne!(signer.signature(PATH), signer.signature("/other"));
        Ok(())
    }

    #[test]
    fn invalid_secret() {
        let err = HmacUrlSigner::new("not base64 !!").unwrap_err();
        assert!(matches!(err, Error::InvalidSecret(_)), "{err:?}");
    }

    #[test]
    fn debug_censors_secret() -> anyhow::Result<()> {
        let signer = HmacUrlSigner::new(SECRET)?;
        let got = format!("{signer:?}");
        assert!(got.contains("[censored]"), "{got}");
        assert!(!got.contains(SECRET), "{got}");
        Ok(())
    }
}
