use jsonwebtoken::{EncodingKey, Header, encode};

use vehiclix_auth::error::AuthError;
use vehiclix_auth::jwt::{AccessClaims, TokenValidator, bearer_token};
use vehiclix_auth::role::UserRole;

const SECRET: &[u8] = b"test-secret-test-secret-test-secret";

fn claims(role: UserRole, exp_offset_secs: i64) -> AccessClaims {
    let now = jiff::Timestamp::now().as_second();
    AccessClaims {
        sub: "7".to_string(),
        name: "Dana Fleet".to_string(),
        email: Some("dana@vehiclix.test".to_string()),
        role,
        iss: "vehiclix".to_string(),
        aud: "vehiclix-web".to_string(),
        exp: (now + exp_offset_secs) as u64,
    }
}

fn sign(claims: &AccessClaims, secret: &[u8]) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
}

fn validator() -> TokenValidator {
    TokenValidator::new(SECRET, "vehiclix", "vehiclix-web")
}

#[test]
fn valid_token_yields_principal() {
    let token = sign(&claims(UserRole::Admin, 600), SECRET);
    let principal = validator().validate(&token).unwrap();
    assert_eq!(principal.name, "Dana Fleet");
    assert_eq!(principal.subject, "7");
    assert_eq!(principal.role, UserRole::Admin);
}

#[test]
fn expired_token_is_rejected() {
    let token = sign(&claims(UserRole::User, -3600), SECRET);
    assert!(matches!(
        validator().validate(&token),
        Err(AuthError::TokenExpired)
    ));
}

#[test]
fn wrong_secret_is_rejected() {
    let token = sign(&claims(UserRole::User, 600), b"another-secret-another-secret-xx");
    assert!(matches!(validator().validate(&token), Err(AuthError::Jwt(_))));
}

#[test]
fn wrong_audience_is_rejected() {
    let mut c = claims(UserRole::User, 600);
    c.aud = "mobile".to_string();
    let token = sign(&c, SECRET);
    assert!(validator().validate(&token).is_err());
}

#[test]
fn role_check() {
    let token = sign(&claims(UserRole::InsuranceProvider, 600), SECRET);
    let principal = validator().validate(&token).unwrap();
    assert!(
        principal
            .require_any(&[UserRole::Admin, UserRole::InsuranceProvider])
            .is_ok()
    );
    assert!(matches!(
        principal.require_any(&[UserRole::Admin]),
        Err(AuthError::Forbidden {
            role: UserRole::InsuranceProvider
        })
    ));
}

#[test]
fn bearer_header_parsing() {
    assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    assert!(matches!(bearer_token("Basic Zm9v"), Err(AuthError::MissingToken)));
    assert!(matches!(bearer_token("Bearer   "), Err(AuthError::MissingToken)));
}
