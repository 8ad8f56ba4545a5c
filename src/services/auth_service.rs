use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr,
};

use crate::entities::AuthProvider;
use crate::entities::users::{self, Entity as Users};
use crate::error::{AppError, AppResult};
use crate::external::OAuthClient;
use crate::models::{OAuthLoginRequest, RegisterRequest, Token, UserResponse};
use crate::utils::{JwtService, hash_password, validate_email, validate_password, verify_password};

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg_attr(not(test), derive(Clone))] // sea-orm mock (test-only) strips Clone from DatabaseConnection
pub struct AuthService {
    db: DatabaseConnection,
    jwt: JwtService,
    oauth: OAuthClient,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, jwt: JwtService, oauth: OAuthClient) -> Self {
        Self { db, jwt, oauth }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<Token> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        // Email is unique across providers; an OAuth account with this email
        // also blocks password registration.
        let existing = Users::find()
            .filter(users::Column::Email.eq(&request.email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let hashed = hash_password(&request.password)?;
        let now = Utc::now();

        let user = users::ActiveModel {
            email: Set(request.email),
            full_name: Set(request.full_name),
            hashed_password: Set(Some(hashed)),
            auth_provider: Set(AuthProvider::Email),
            oauth_id: Set(None),
            phone: Set(request.phone),
            avatar_url: Set(None),
            is_active: Set(true),
            is_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(None),
            last_login: Set(Some(now)),
            ..Default::default()
        };

        // The existence check above is not atomic with the insert; a losing
        // racer surfaces here through the unique index instead.
        let user = user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateEmail
            } else {
                AppError::from(e)
            }
        })?;

        log::info!("registered user {} (id {})", user.email, user.id);

        // Mail delivery is not wired up; the verification token only reaches
        // the logs at debug level.
        let verification = self.jwt.generate_email_verification_token(&user.email)?;
        log::debug!("email verification token for {}: {verification}", user.email);

        self.issue_token(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<Token> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?
            // Unknown email and wrong password are indistinguishable.
            .ok_or(AppError::InvalidCredentials)?;

        if user.auth_provider != AuthProvider::Email {
            return Err(AppError::WrongAuthProvider(user.auth_provider.to_string()));
        }

        let hashed = user
            .hashed_password
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;
        if !verify_password(password, hashed)? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::InactiveAccount);
        }

        let now = Utc::now();
        let mut active: users::ActiveModel = user.into();
        active.last_login = Set(Some(now));
        active.updated_at = Set(Some(now));
        let user = active.update(&self.db).await?;

        self.issue_token(user)
    }

    pub async fn oauth_login(&self, request: OAuthLoginRequest) -> AppResult<Token> {
        if request.provider == AuthProvider::Email {
            return Err(AppError::UnsupportedProvider(request.provider.to_string()));
        }

        let profile = self
            .oauth
            .fetch_profile(request.provider, &request.access_token)
            .await?;

        let existing = Users::find()
            .filter(users::Column::Email.eq(&profile.email))
            .one(&self.db)
            .await?;

        let now = Utc::now();
        let user = match existing {
            Some(user) if user.auth_provider == request.provider => {
                // Refresh profile fields from the provider on every login.
                let mut active: users::ActiveModel = user.clone().into();
                if profile.display_name.is_some() {
                    active.full_name = Set(profile.display_name);
                }
                if profile.avatar_url.is_some() {
                    active.avatar_url = Set(profile.avatar_url);
                }
                active.last_login = Set(Some(now));
                active.updated_at = Set(Some(now));
                active.update(&self.db).await?
            }
            // Email uniqueness is global: the same address cannot exist under
            // two providers.
            Some(user) => {
                return Err(AppError::WrongAuthProvider(user.auth_provider.to_string()));
            }
            None => {
                let user = users::ActiveModel {
                    email: Set(profile.email),
                    full_name: Set(profile.display_name),
                    hashed_password: Set(None),
                    auth_provider: Set(request.provider),
                    oauth_id: Set(Some(profile.external_id)),
                    phone: Set(None),
                    avatar_url: Set(profile.avatar_url),
                    is_active: Set(true),
                    is_verified: Set(false),
                    created_at: Set(now),
                    updated_at: Set(None),
                    last_login: Set(Some(now)),
                    ..Default::default()
                };
                let user = user.insert(&self.db).await.map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::DuplicateEmail
                    } else {
                        AppError::from(e)
                    }
                })?;
                log::info!(
                    "created user {} (id {}) via {} login",
                    user.email,
                    user.id,
                    user.auth_provider
                );
                user
            }
        };

        self.issue_token(user)
    }

    /// Verifies the bearer token and loads its subject.
    pub async fn resolve_current_user(&self, token: &str) -> AppResult<users::Model> {
        let claims = self.jwt.verify_access_token(token)?;
        self.resolve_user_by_email(&claims.sub).await
    }

    /// Loads a user already authenticated upstream (e.g. by the middleware).
    pub async fn resolve_user_by_email(&self, email: &str) -> AppResult<users::Model> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.is_active {
            return Err(AppError::InactiveAccount);
        }

        Ok(user)
    }

    /// Always succeeds from the caller's view so the endpoint cannot be used
    /// to probe which emails are registered.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        match user {
            Some(user) if user.auth_provider == AuthProvider::Email => {
                let token = self.jwt.generate_password_reset_token(&user.email)?;
                // Mail delivery is not wired up; the token only reaches the
                // logs at debug level.
                log::info!("password reset token issued for {}", user.email);
                log::debug!("password reset token for {}: {}", user.email, token);
            }
            Some(user) => {
                log::info!(
                    "ignoring password reset for {} ({} account)",
                    user.email,
                    user.auth_provider
                );
            }
            None => {
                log::info!("ignoring password reset for unknown email");
            }
        }

        Ok(())
    }

    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AppResult<()> {
        let email = self.jwt.verify_password_reset_token(token)?;
        validate_password(new_password)?;

        let user = Users::find()
            .filter(users::Column::Email.eq(&email))
            .one(&self.db)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if user.auth_provider != AuthProvider::Email {
            return Err(AppError::WrongAuthProvider(user.auth_provider.to_string()));
        }

        let hashed = hash_password(new_password)?;
        let mut active: users::ActiveModel = user.into();
        active.hashed_password = Set(Some(hashed));
        active.updated_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;

        Ok(())
    }

    pub async fn confirm_email(&self, token: &str) -> AppResult<UserResponse> {
        let email = self.jwt.verify_email_verification_token(token)?;

        let user = Users::find()
            .filter(users::Column::Email.eq(&email))
            .one(&self.db)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let mut active: users::ActiveModel = user.into();
        active.is_verified = Set(true);
        active.updated_at = Set(Some(Utc::now()));
        let user = active.update(&self.db).await?;

        Ok(user.into())
    }

    fn issue_token(&self, user: users::Model) -> AppResult<Token> {
        let access_token = self.jwt.generate_access_token(&user.email)?;
        Ok(Token {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.jwt.access_token_expires_in(),
            user: user.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn jwt() -> JwtService {
        JwtService::new("test-secret", "HS256", 60).unwrap()
    }

    fn service(db: DatabaseConnection) -> AuthService {
        AuthService::new(db, jwt(), OAuthClient::new())
    }

    fn email_user(password: &str) -> users::Model {
        users::Model {
            id: 1,
            email: "a@b.com".to_string(),
            full_name: Some("A B".to_string()),
            hashed_password: Some(hash_password(password).unwrap()),
            auth_provider: AuthProvider::Email,
            oauth_id: None,
            phone: None,
            avatar_url: None,
            is_active: true,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: None,
            last_login: None,
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![email_user("longpassword1")]])
            .into_connection();

        let result = service(db)
            .register(RegisterRequest {
                email: "a@b.com".to_string(),
                password: "other12345".to_string(),
                full_name: None,
                phone: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .register(RegisterRequest {
                email: "a@b.com".to_string(),
                password: "short".to_string(),
                full_name: None,
                phone: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let result = service(db).login("nobody@b.com", "longpassword1").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![email_user("longpassword1")]])
            .into_connection();

        let result = service(db).login("a@b.com", "wrong-password").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_oauth_account_is_wrong_provider() {
        let mut user = email_user("longpassword1");
        user.auth_provider = AuthProvider::Google;
        user.hashed_password = None;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user]])
            .into_connection();

        let result = service(db).login("a@b.com", "longpassword1").await;
        match result {
            Err(AppError::WrongAuthProvider(provider)) => assert_eq!(provider, "google"),
            other => panic!("expected WrongAuthProvider, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let mut user = email_user("longpassword1");
        user.is_active = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user]])
            .into_connection();

        let result = service(db).login("a@b.com", "longpassword1").await;
        assert!(matches!(result, Err(AppError::InactiveAccount)));
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_token() {
        let user = email_user("longpassword1");
        let mut updated = user.clone();
        updated.last_login = Some(Utc::now());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user]])
            .append_query_results([vec![updated]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let token = service(db).login("a@b.com", "longpassword1").await.unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.user.email, "a@b.com");

        let claims = jwt().verify_access_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, "a@b.com");
    }

    #[tokio::test]
    async fn test_oauth_login_email_provider_unsupported() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .oauth_login(OAuthLoginRequest {
                provider: AuthProvider::Email,
                access_token: "whatever".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::UnsupportedProvider(_))));
    }

    #[tokio::test]
    async fn test_resolve_current_user_inactive() {
        let mut user = email_user("longpassword1");
        user.is_active = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user]])
            .into_connection();

        let svc = service(db);
        let token = jwt().generate_access_token("a@b.com").unwrap();
        assert!(matches!(
            svc.resolve_current_user(&token).await,
            Err(AppError::InactiveAccount)
        ));
    }

    #[tokio::test]
    async fn test_resolve_current_user_unknown_subject() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let svc = service(db);
        let token = jwt().generate_access_token("gone@b.com").unwrap();
        assert!(matches!(
            svc.resolve_current_user(&token).await,
            Err(AppError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_resolve_current_user_bad_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        assert!(matches!(
            service(db).resolve_current_user("garbage").await,
            Err(AppError::InvalidToken)
        ));
    }
}
