//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::{UpdateUser, UserProfile};
use crate::errors::{ServiceError, ServiceResult};
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtManager;
use sqlx::SqlitePool;
use validator::Validate;

/// Session handling shared by every request: token manager and hashing cost.
///
/// Built once at startup and attached to the router as an extension.
#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtManager,
    pub hash_cost: u32,
}

impl AuthState {
    pub fn new(jwt: JwtManager, hash_cost: u32) -> Self {
        Self { jwt, hash_cost }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(JwtManager::from_config(config), config.bcrypt_cost)
    }
}

/// Authentication service for registration, login and account self-service
pub struct AuthService<'a> {
    jwt: &'a JwtManager,
    user_service: UserService<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, state: &'a AuthState) -> Self {
        AuthService {
            jwt: &state.jwt,
            user_service: UserService::new(pool, state.hash_cost),
        }
    }

    /// Create an account and sign the caller in
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let request = request.normalize();
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let user = self
            .user_service
            .create_user(&request.name, &request.email, &request.password)
            .await?;

        let token = self.jwt.generate_token(&user.id)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
            message: "User registered successfully".to_string(),
        })
    }

    /// Authenticate user and issue a session token
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let request = request.normalize();
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let user = self
            .user_service
            .authenticate_user(&request.email, &request.password)
            .await?;

        let token = self.jwt.generate_token(&user.id)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
            message: "Logged in successfully".to_string(),
        })
    }

    /// Apply a whitelisted partial update to the caller's account
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> ServiceResult<UserProfile> {
        let request = request.normalize();
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let user = self
            .user_service
            .update_profile(user_id, UpdateUser::from(request))
            .await?;

        Ok(user.into())
    }

    /// Change the caller's password
    pub async fn update_password(
        &self,
        user_id: &str,
        request: UpdatePasswordRequest,
    ) -> ServiceResult<()> {
        self.user_service
            .change_password(user_id, &request.current_password, &request.new_password)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn test_state() -> AuthState {
        AuthState::new(JwtManager::new("test-secret", 604800), 4)
    }

    fn alice() -> RegisterRequest {
        RegisterRequest {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_token_decodes_to_registered_id() {
        let pool = test_pool().await;
        let state = test_state();
        let service = AuthService::new(&pool, &state);

        let registered = service.register(alice()).await.unwrap();
        let logged_in = service
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        let register_claims = state.jwt.validate_token(&registered.token).unwrap();
        let login_claims = state.jwt.validate_token(&logged_in.token).unwrap();
        assert_eq!(register_claims.user_id, registered.user.id);
        assert_eq!(login_claims.user_id, registered.user.id);
        assert_eq!(logged_in.message, "Logged in successfully");
    }

    #[tokio::test]
    async fn test_register_twice_is_conflict() {
        let pool = test_pool().await;
        let state = test_state();
        let service = AuthService::new(&pool, &state);

        service.register(alice()).await.unwrap();
        let err = service.register(alice()).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let pool = test_pool().await;
        let state = test_state();
        let service = AuthService::new(&pool, &state);

        let err = service
            .register(RegisterRequest {
                email: "not-an-email".to_string(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_trims_before_validating() {
        let pool = test_pool().await;
        let state = test_state();
        let service = AuthService::new(&pool, &state);

        let err = service
            .register(RegisterRequest {
                name: "   ".to_string(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let registered = service
            .register(RegisterRequest {
                name: " Alice ".to_string(),
                email: " A@X.com ".to_string(),
                ..alice()
            })
            .await
            .unwrap();
        assert_eq!(registered.user.name, "Alice");
        assert_eq!(registered.user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_blank_name() {
        let pool = test_pool().await;
        let state = test_state();
        let service = AuthService::new(&pool, &state);
        let registered = service.register(alice()).await.unwrap();

        let err = service
            .update_profile(
                &registered.user.id,
                UpdateProfileRequest {
                    name: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let updated = service
            .update_profile(
                &registered.user.id,
                UpdateProfileRequest {
                    name: Some("  Alicia ".to_string()),
                    email: Some(" Alicia@X.com ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, "alicia@x.com");
    }
}
