//! Admin account service: credentials, bearer tokens, and the OTP
//! password-reset flow.
//!
//! Reset progress is tracked by an explicit tri-state column
//! (`none` / `pending` / `verified`), so "was the code verified" is never
//! inferred from which columns happen to be null.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::entities::{OtpState, admin};
use campus_db::repositories::AdminRepository;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::email::EmailService;

/// OTP lifetime.
const OTP_TTL_MINUTES: i64 = 10;

/// Claims carried by the admin bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin ID.
    pub sub: String,
    /// Admin username.
    pub username: String,
    /// Always `admin` for tokens issued here.
    pub role: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Input for creating an admin account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Request to mail a reset code.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpInput {
    #[validate(email)]
    pub email: String,
}

/// Request to verify a mailed reset code.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpInput {
    #[validate(email)]
    pub email: String,
    pub otp_code: String,
}

/// Request to set a new password after verification.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// An admin account as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub created_at: String,
}

impl From<admin::Model> for AdminResponse {
    fn from(a: admin::Model) -> Self {
        Self {
            id: a.id,
            username: a.username,
            email: a.email,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Login response: token plus the account it belongs to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminResponse,
}

/// Admin account service.
#[derive(Clone)]
pub struct AccountService {
    admin_repo: AdminRepository,
    email_service: EmailService,
    jwt_secret: String,
    token_expiry_secs: u64,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(
        admin_repo: AdminRepository,
        email_service: EmailService,
        jwt_secret: String,
        token_expiry_secs: u64,
    ) -> Self {
        Self {
            admin_repo,
            email_service,
            jwt_secret,
            token_expiry_secs,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an admin account.
    pub async fn create(&self, input: CreateAdminInput) -> AppResult<AdminResponse> {
        input.validate()?;

        if self
            .admin_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = admin::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            password_hash: Set(password_hash),
            email: Set(input.email),
            otp_code: Set(None),
            otp_expiry: Set(None),
            otp_state: Set(OtpState::None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        let admin = self.admin_repo.create(model).await?;
        Ok(admin.into())
    }

    /// Verify credentials and issue a bearer token.
    pub async fn login(&self, input: LoginInput) -> AppResult<LoginResponse> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(AppError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }

        let admin = self
            .admin_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let valid = bcrypt::verify(&input.password, &admin.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
        if !valid {
            return Err(AppError::Unauthorized);
        }

        let token = self.issue_token(&admin)?;
        Ok(LoginResponse {
            token,
            admin: admin.into(),
        })
    }

    /// Decode and validate a bearer token.
    pub fn verify_token(&self, token: &str) -> AppResult<AdminClaims> {
        let data = decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(data.claims)
    }

    /// Mail a reset code to the admin behind the given email.
    pub async fn send_otp(&self, input: SendOtpInput) -> AppResult<()> {
        input.validate()?;

        let admin = self
            .admin_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

        let code = generate_otp_code();
        let expiry = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

        let mut active: admin::ActiveModel = admin.into();
        active.otp_code = Set(Some(code.clone()));
        active.otp_expiry = Set(Some(expiry.into()));
        active.otp_state = Set(OtpState::Pending);
        active.updated_at = Set(Some(Utc::now().into()));
        self.admin_repo.update(active).await?;

        self.email_service.send_otp_code(&input.email, &code).await?;

        Ok(())
    }

    /// Check a mailed code; success moves the account to the verified state.
    pub async fn verify_otp(&self, input: VerifyOtpInput) -> AppResult<()> {
        input.validate()?;

        let admin = self
            .admin_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

        if admin.otp_state != OtpState::Pending {
            return Err(AppError::BadRequest("No OTP requested".to_string()));
        }

        let expiry = admin
            .otp_expiry
            .ok_or_else(|| AppError::BadRequest("No OTP requested".to_string()))?;
        if Utc::now() > expiry {
            return Err(AppError::BadRequest("OTP has expired".to_string()));
        }

        let stored = admin
            .otp_code
            .clone()
            .ok_or_else(|| AppError::BadRequest("No OTP requested".to_string()))?;
        if stored != input.otp_code {
            return Err(AppError::BadRequest("Invalid OTP".to_string()));
        }

        let mut active: admin::ActiveModel = admin.into();
        active.otp_code = Set(None);
        active.otp_expiry = Set(None);
        active.otp_state = Set(OtpState::Verified);
        active.updated_at = Set(Some(Utc::now().into()));
        self.admin_repo.update(active).await?;

        Ok(())
    }

    /// Set a new password; only permitted after a successful verification.
    pub async fn reset_password(&self, input: ResetPasswordInput) -> AppResult<()> {
        input.validate()?;

        let admin = self
            .admin_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

        if admin.otp_state != OtpState::Verified {
            return Err(AppError::BadRequest("OTP not verified yet".to_string()));
        }

        let password_hash = hash_password(&input.new_password)?;

        let mut active: admin::ActiveModel = admin.into();
        active.password_hash = Set(password_hash);
        active.otp_state = Set(OtpState::None);
        active.updated_at = Set(Some(Utc::now().into()));
        self.admin_repo.update(active).await?;

        Ok(())
    }

    fn issue_token(&self, admin: &admin::Model) -> AppResult<String> {
        let claims = AdminClaims {
            sub: admin.id.clone(),
            username: admin.username.clone(),
            role: "admin".to_string(),
            exp: (Utc::now() + Duration::seconds(self.token_expiry_secs as i64)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// 6-digit, zero-padded numeric code.
fn generate_otp_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase};

    fn make_admin(state: OtpState, code: Option<&str>, expiry_offset_min: i64) -> admin::Model {
        admin::Model {
            id: "adm1".to_string(),
            username: "root".to_string(),
            password_hash: bcrypt::hash("correct horse", 4).unwrap(),
            email: Some("admin@example.com".to_string()),
            otp_code: code.map(str::to_string),
            otp_expiry: Some((Utc::now() + Duration::minutes(expiry_offset_min)).into()),
            otp_state: state,
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn service_over(db: sea_orm::DatabaseConnection) -> AccountService {
        AccountService::new(
            AdminRepository::new(Arc::new(db)),
            EmailService::new(None).unwrap(),
            "test-secret".to_string(),
            3600,
        )
    }

    #[test]
    fn test_otp_code_shape() {
        for _ in 0..32 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let admin = make_admin(OtpState::None, None, 10);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin]])
            .into_connection();
        let service = service_over(db);

        let result = service
            .login(LoginInput {
                username: "root".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let admin = make_admin(OtpState::None, None, 10);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin]])
            .into_connection();
        let service = service_over(db);

        let response = service
            .login(LoginInput {
                username: "root".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        let claims = service.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, "adm1");
        assert_eq!(claims.username, "root");
        assert_eq!(claims.role, "admin");
    }

    #[tokio::test]
    async fn test_verify_otp_rejects_expired_code() {
        let admin = make_admin(OtpState::Pending, Some("123456"), -1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin]])
            .into_connection();
        let service = service_over(db);

        let result = service
            .verify_otp(VerifyOtpInput {
                email: "admin@example.com".to_string(),
                otp_code: "123456".to_string(),
            })
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "OTP has expired"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verify_otp_rejects_wrong_code() {
        let admin = make_admin(OtpState::Pending, Some("123456"), 5);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin]])
            .into_connection();
        let service = service_over(db);

        let result = service
            .verify_otp(VerifyOtpInput {
                email: "admin@example.com".to_string(),
                otp_code: "000000".to_string(),
            })
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid OTP"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_password_requires_verified_state() {
        let admin = make_admin(OtpState::Pending, Some("123456"), 5);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin]])
            .into_connection();
        let service = service_over(db);

        let result = service
            .reset_password(ResetPasswordInput {
                email: "admin@example.com".to_string(),
                new_password: "brand new password".to_string(),
            })
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "OTP not verified yet"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
