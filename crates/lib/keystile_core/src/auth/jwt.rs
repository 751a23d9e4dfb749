//! JWT access token issuance and verification.
//!
//! Tokens are compact HS256 JWS strings carrying `{sub, iat, exp}`. A token is
//! usable while the evaluation time is at or before `exp`; there is no
//! revocation, expiry is the only way a token stops being valid.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use super::AuthError;
use crate::models::auth::{TokenClaims, VerifiedSubject};

/// Default access token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Longest accepted token lifetime: one hundred years.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600 * 100;

/// The only signing algorithm accepted or produced.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing secret and token lifetime for a [`CredentialService`].
#[derive(Clone)]
pub struct CredentialConfig {
    secret: String,
    ttl: Duration,
}

impl CredentialConfig {
    /// Build a config, rejecting an empty secret or a TTL outside
    /// `1..=MAX_TOKEN_TTL_MINUTES`.
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::Config("signing secret must not be empty".into()));
        }
        if ttl_minutes <= 0 {
            return Err(AuthError::Config(format!(
                "token TTL must be positive, got {ttl_minutes} minutes"
            )));
        }
        let ttl = Duration::try_minutes(ttl_minutes)
            .filter(|_| ttl_minutes <= MAX_TOKEN_TTL_MINUTES)
            .ok_or_else(|| {
                AuthError::Config(format!(
                    "token TTL must be at most {MAX_TOKEN_TTL_MINUTES} minutes, got {ttl_minutes}"
                ))
            })?;
        Ok(Self { secret, ttl })
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Issues and verifies access tokens with a single shared secret.
///
/// Stateless apart from the keys derived at construction, so it can be cloned
/// freely or shared behind an `Arc`.
#[derive(Clone)]
pub struct CredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl CredentialService {
    pub fn new(config: CredentialConfig) -> Self {
        let secret = config.secret.as_bytes();

        // Expiry is compared against the caller-supplied instant in `verify_at`,
        // so the library's wall-clock check is switched off.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: config.ttl,
        }
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for an already-authenticated subject, valid from now.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal(format!("token expiry overflows from {now}")))?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))?;
        debug!(subject, exp = claims.exp, "issued access token");
        Ok(token)
    }

    /// Verify a token against the secret and the current time.
    pub fn verify(&self, token: &str) -> Result<VerifiedSubject, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// The signature is checked over the raw `header.payload` text before
    /// anything is decoded, so an altered character in any segment surfaces
    /// as [`AuthError::InvalidSignature`].
    ///
    /// `exp` is stored in whole seconds (issuance + TTL, rounded down) and
    /// compared with `now` truncated to seconds, so a token stays valid until
    /// the end of its expiry second: up to one second past the exact
    /// issuance + TTL instant, as with any JWT `exp` claim.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedSubject, AuthError> {
        let (message, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| AuthError::Malformed("expected three dot-separated segments".into()))?;
        if message.split('.').count() != 2 {
            return Err(AuthError::Malformed(
                "expected three dot-separated segments".into(),
            ));
        }

        let signature_ok = jsonwebtoken::crypto::verify(
            signature,
            message.as_bytes(),
            &self.decoding_key,
            ALGORITHM,
        )
        .map_err(|e| AuthError::Malformed(format!("signature check: {e}")))?;
        if !signature_ok {
            return Err(AuthError::InvalidSignature);
        }

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed(e.to_string()),
            })?
            .claims;

        if now.timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(VerifiedSubject {
            subject: claims.sub,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}

impl fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialService")
            .field("algorithm", &ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, AuthError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| AuthError::Malformed(format!("timestamp out of range: {secs}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> CredentialService {
        CredentialService::new(CredentialConfig::new(secret, DEFAULT_TOKEN_TTL_MINUTES).unwrap())
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    fn replace_char(token: &str, idx: usize) -> String {
        let mut bytes = token.as_bytes().to_vec();
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn config_rejects_empty_secret() {
        let err = CredentialConfig::new("", 30).unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn config_rejects_non_positive_ttl() {
        assert!(matches!(
            CredentialConfig::new("s", 0).unwrap_err(),
            AuthError::Config(_)
        ));
        assert!(matches!(
            CredentialConfig::new("s", -5).unwrap_err(),
            AuthError::Config(_)
        ));
    }

    #[test]
    fn config_rejects_ttl_beyond_the_cap() {
        assert!(CredentialConfig::new("s", MAX_TOKEN_TTL_MINUTES).is_ok());
        for ttl in [MAX_TOKEN_TTL_MINUTES + 1, 200_000_000_000, i64::MAX] {
            assert!(
                matches!(CredentialConfig::new("s", ttl).unwrap_err(), AuthError::Config(_)),
                "ttl {ttl}"
            );
        }
    }

    #[test]
    fn expiry_past_the_calendar_end_is_an_internal_fault() {
        let svc = CredentialService::new(
            CredentialConfig::new("s3cret", MAX_TOKEN_TTL_MINUTES).unwrap(),
        );
        let near_end = Utc.with_ymd_and_hms(262_100, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            svc.issue_at("aashish", near_end).unwrap_err(),
            AuthError::Internal(_)
        ));
        assert!(svc.issue("aashish").is_ok());
    }

    #[test]
    fn config_debug_redacts_secret() {
        let config = CredentialConfig::new("hunter2-but-longer", 30).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn issued_token_verifies_to_its_subject() {
        let svc = service("round-trip-secret");
        for subject in ["aashish", "", "user@example.com", "名前 with spaces"] {
            let token = svc.issue(subject).unwrap();
            let verified = svc.verify(&token).unwrap();
            assert_eq!(verified.subject, subject);
        }
    }

    #[test]
    fn token_is_url_safe_compact_jws() {
        let token = service("s3cret").issue("aashish").unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        );
    }

    #[test]
    fn claims_carry_issuance_and_expiry() {
        let svc = service("s3cret");
        let token = svc.issue_at("aashish", t0()).unwrap();
        let verified = svc.verify_at(&token, t0()).unwrap();
        assert_eq!(verified.issued_at, t0());
        assert_eq!(verified.expires_at, t0() + Duration::minutes(30));
    }

    #[test]
    fn valid_through_expiry_instant_and_rejected_after() {
        let svc = service("s3cret");
        let token = svc.issue_at("aashish", t0()).unwrap();

        for offset in [
            Duration::zero(),
            Duration::seconds(1),
            Duration::minutes(15),
            Duration::minutes(30),
        ] {
            assert!(svc.verify_at(&token, t0() + offset).is_ok(), "offset {offset}");
        }
        for offset in [
            Duration::minutes(30) + Duration::seconds(1),
            Duration::minutes(31),
            Duration::days(1),
        ] {
            assert_eq!(
                svc.verify_at(&token, t0() + offset).unwrap_err(),
                AuthError::Expired,
                "offset {offset}"
            );
        }
    }

    #[test]
    fn expiry_is_compared_in_whole_seconds() {
        let svc = service("s3cret");
        let issued = t0() + Duration::milliseconds(500);
        let token = svc.issue_at("aashish", issued).unwrap();
        let expiry_second = t0() + Duration::minutes(30);

        assert!(svc.verify_at(&token, expiry_second + Duration::milliseconds(999)).is_ok());
        assert_eq!(
            svc.verify_at(&token, expiry_second + Duration::seconds(1)).unwrap_err(),
            AuthError::Expired
        );
    }

    #[test]
    fn custom_ttl_is_honoured() {
        let svc = CredentialService::new(CredentialConfig::new("s3cret", 5).unwrap());
        let token = svc.issue_at("aashish", t0()).unwrap();
        assert!(svc.verify_at(&token, t0() + Duration::minutes(5)).is_ok());
        assert_eq!(
            svc.verify_at(&token, t0() + Duration::minutes(6)).unwrap_err(),
            AuthError::Expired
        );
    }

    #[test]
    fn any_altered_character_is_an_invalid_signature() {
        let svc = service("s3cret");
        let token = svc.issue_at("aashish", t0()).unwrap();
        for idx in (0..token.len()).filter(|&i| token.as_bytes()[i] != b'.') {
            let tampered = replace_char(&token, idx);
            assert_eq!(
                svc.verify_at(&tampered, t0()).unwrap_err(),
                AuthError::InvalidSignature,
                "offset {idx}"
            );
        }
    }

    #[test]
    fn altered_separator_is_malformed() {
        let svc = service("s3cret");
        let token = svc.issue_at("aashish", t0()).unwrap();
        let idx = token.find('.').unwrap();
        let tampered = replace_char(&token, idx);
        assert!(matches!(
            svc.verify_at(&tampered, t0()).unwrap_err(),
            AuthError::Malformed(_)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = service("s3cret");
        for junk in ["", "not-a-token", "a.b", "a.b.c.d"] {
            assert!(
                matches!(svc.verify(junk).unwrap_err(), AuthError::Malformed(_)),
                "input {junk:?}"
            );
        }
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let svc = service("s3cret");
        let token = svc.issue("aashish").unwrap();
        let unsigned = format!("{}.", token.rsplit_once('.').unwrap().0);
        assert_eq!(svc.verify(&unsigned).unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let issuer = service("secret-a");
        let verifier = service("secret-b");
        let token = issuer.issue("aashish").unwrap();
        assert_eq!(
            verifier.verify(&token).unwrap_err(),
            AuthError::InvalidSignature
        );
    }

    #[test]
    fn verify_is_repeatable() {
        let svc = service("s3cret");
        let token = svc.issue("aashish").unwrap();
        let first = svc.verify(&token).unwrap();
        for _ in 0..5 {
            assert_eq!(svc.verify(&token).unwrap(), first);
        }
    }

    #[test]
    fn aashish_scenario() {
        let svc = service("s3cret");
        let token = svc.issue_at("aashish", t0()).unwrap();

        let ok = svc.verify_at(&token, t0() + Duration::minutes(29)).unwrap();
        assert_eq!(ok.subject, "aashish");

        assert_eq!(
            svc.verify_at(&token, t0() + Duration::minutes(31)).unwrap_err(),
            AuthError::Expired
        );

        let mid = token.len() / 2;
        let idx = if token.as_bytes()[mid] == b'.' { mid + 1 } else { mid };
        let tampered = replace_char(&token, idx);
        assert_eq!(
            svc.verify_at(&tampered, t0() + Duration::minutes(29)).unwrap_err(),
            AuthError::InvalidSignature
        );
    }

    #[test]
    fn service_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<CredentialService>();
    }
}
