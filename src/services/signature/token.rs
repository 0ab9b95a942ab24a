//! Token validation: HMAC signature + issuer / time / destination claims.
//!
//! This module does not know about key rotation or request bodies. `Verifier`
//! calls `TokenValidator::validate` once per key and then runs the body check.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use tracing::debug;

use super::claims::{ClaimSet, EXPECTED_ISSUER};
use super::error::Rejection;

// Only symmetric algorithms are acceptable; anything else (RS*, ES*, EdDSA, none)
// would let a public key or no key at all stand in for the shared secret.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Clone)]
pub(crate) struct TokenValidator {
    validation: Validation,
}

impl TokenValidator {
    pub(crate) fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.set_issuer(&[EXPECTED_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        // The dispatcher sends `aud: ""`; the receiver binds on `sub` instead.
        validation.validate_aud = false;
        // Time claims are checked below against an explicit `now`.
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Self { validation }
    }

    /// Validate `token` with one key.
    ///
    /// - `expected_destination`: compared to `sub` unless empty.
    /// - `leeway_seconds`: widens both `nbf` and `exp` bounds (inclusive).
    /// - `now`: compared at full precision, so a token is expired as soon as
    ///   `now` passes `exp + leeway`, not at the next whole second.
    pub(crate) fn validate(
        &self,
        token: &str,
        key: &DecodingKey,
        expected_destination: &str,
        leeway_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, Rejection> {
        // 1) Algorithm family, before touching the signature.
        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            debug!(error = ?e, "undecodable token header");
            Rejection::Malformed
        })?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            debug!(alg = ?header.alg, "token uses a non-HMAC algorithm");
            return Err(Rejection::Algorithm);
        }

        // 2) Signature + issuer + required claims.
        let claims = jsonwebtoken::decode::<ClaimSet>(token, key, &self.validation)
            .map_err(|e| Rejection::from(&e))?
            .claims;

        // 3) nbf - leeway <= now <= exp + leeway
        let (secs, nanos) = (now.timestamp(), now.timestamp_subsec_nanos());
        if let Some(nbf) = claims.nbf {
            if secs < nbf.saturating_sub(leeway_seconds) {
                return Err(Rejection::NotYetValid);
            }
        }
        let not_after = claims.exp.saturating_add(leeway_seconds);
        if secs > not_after || (secs == not_after && nanos > 0) {
            return Err(Rejection::Expired);
        }

        // 4) Destination binding (opt-out with an empty destination)
        if !expected_destination.is_empty() && claims.sub != expected_destination {
            return Err(Rejection::Destination);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;

    use super::*;
    use crate::services::signature::test_support::{NOW, at, claims_for, sign, sign_value};

    const KEY: &str = "sig_current";

    fn validate(token: &str, destination: &str, leeway: i64) -> Result<ClaimSet, Rejection> {
        validate_at(token, destination, leeway, at(NOW))
    }

    fn validate_at(
        token: &str,
        destination: &str,
        leeway: i64,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, Rejection> {
        TokenValidator::new().validate(
            token,
            &DecodingKey::from_secret(KEY.as_bytes()),
            destination,
            leeway,
            now,
        )
    }

    #[test]
    fn accepts_well_formed_token() {
        let claims = claims_for(b"{}", "https://example.com");
        let token = sign(&claims, KEY);

        assert_eq!(validate(&token, "https://example.com", 0), Ok(claims));
    }

    #[test]
    fn rejects_other_key() {
        let token = sign(&claims_for(b"{}", ""), "some_other_key");
        assert_eq!(validate(&token, "", 0), Err(Rejection::Signature));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(validate("not-a-token", "", 0), Err(Rejection::Malformed));
        assert_eq!(validate("", "", 0), Err(Rejection::Malformed));
    }

    #[test]
    fn rejects_asymmetric_and_none_algorithms() {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims_for(b"{}", "")).unwrap());

        let rs256 = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let token = format!("{rs256}.{payload}.c2ln");
        assert_eq!(validate(&token, "", 0), Err(Rejection::Algorithm));

        let none = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let token = format!("{none}.{payload}.");
        assert!(validate(&token, "", 0).is_err());
    }

    #[test]
    fn accepts_every_hmac_variant() {
        let claims = claims_for(b"{}", "");
        for alg in HMAC_ALGORITHMS {
            let token = sign_value(&json!(claims), KEY, alg);
            assert!(validate(&token, "", 0).is_ok(), "{alg:?}");
        }
    }

    #[test]
    fn rejects_wrong_issuer() {
        let mut claims = claims_for(b"{}", "");
        claims.iss = "Someone".to_string();
        let token = sign(&claims, KEY);

        assert_eq!(validate(&token, "", 0), Err(Rejection::Issuer));
    }

    #[test]
    fn rejects_missing_required_claims() {
        let without_body = json!({ "iss": "Upstash", "exp": NOW + 300, "sub": "" });
        let token = sign_value(&without_body, KEY, Algorithm::HS256);
        assert_eq!(validate(&token, "", 0), Err(Rejection::Claims));

        let without_iss = json!({ "exp": NOW + 300, "body": "x" });
        let token = sign_value(&without_iss, KEY, Algorithm::HS256);
        assert_eq!(validate(&token, "", 0), Err(Rejection::Claims));
    }

    #[test]
    fn expiry_is_inclusive_and_widened_by_leeway() {
        let mut claims = claims_for(b"{}", "");

        claims.exp = NOW;
        assert!(validate(&sign(&claims, KEY), "", 0).is_ok());

        claims.exp = NOW - 10;
        let token = sign(&claims, KEY);
        assert_eq!(validate(&token, "", 0), Err(Rejection::Expired));
        assert_eq!(validate(&token, "", 9), Err(Rejection::Expired));
        assert!(validate(&token, "", 10).is_ok());
    }

    #[test]
    fn expiry_is_not_rounded_down_to_the_second() {
        let mut claims = claims_for(b"{}", "");
        claims.exp = NOW;
        let token = sign(&claims, KEY);
        let just_after = at(NOW) + chrono::Duration::milliseconds(500);

        assert_eq!(validate_at(&token, "", 0, just_after), Err(Rejection::Expired));
        assert!(validate_at(&token, "", 1, just_after).is_ok());
    }

    #[test]
    fn not_before_is_inclusive_and_widened_by_leeway() {
        let mut claims = claims_for(b"{}", "");
        claims.nbf = Some(NOW + 5);
        let token = sign(&claims, KEY);

        assert_eq!(validate(&token, "", 4), Err(Rejection::NotYetValid));
        assert!(validate(&token, "", 5).is_ok());

        claims.nbf = None;
        assert!(validate(&sign(&claims, KEY), "", 0).is_ok());
    }

    #[test]
    fn destination_must_match_exactly_when_given() {
        let token = sign(&claims_for(b"{}", "https://a.example"), KEY);

        assert!(validate(&token, "https://a.example", 0).is_ok());
        assert!(validate(&token, "", 0).is_ok());
        assert_eq!(
            validate(&token, "https://b.example", 0),
            Err(Rejection::Destination)
        );
        assert_eq!(
            validate(&token, "https://A.example", 0),
            Err(Rejection::Destination)
        );
    }
}
