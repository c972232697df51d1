use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        // 验证输入参数
        let username = request.username.trim();
        if username.is_empty() {
            return Err(AppError::ValidationError("Username is required".to_string()));
        }
        if username.len() > 50 {
            return Err(AppError::ValidationError(
                "Username must be at most 50 characters".to_string(),
            ));
        }
        validate_password(&request.password)?;
        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        // 检查用户名是否已注册
        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        // 密码哈希
        let password_hash = hash_password(&request.password)?;

        let inserted = users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;
        let user = match inserted {
            Ok(user) => user,
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    return Err(AppError::Conflict("Username already exists".to_string()));
                }
                _ => return Err(e.into()),
            },
        };

        // 生成JWT令牌
        let access_token = self.jwt_service.generate_access_token(user.id, &user.username)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, &user.username)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        // 查找用户
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

        // 验证密码
        let is_valid = verify_password(&request.password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }

        // 生成JWT令牌
        let access_token = self.jwt_service.generate_access_token(user.id, &user.username)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, &user.username)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        // 验证刷新令牌
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        // 生成新的访问令牌
        let access_token = self.jwt_service.generate_access_token(user.id, &user.username)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_test_db;

    fn test_service(db: DatabaseConnection) -> AuthService {
        AuthService::new(db, JwtService::new("test-secret", 3600, 86400))
    }

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: None,
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let db = setup_test_db().await;
        let service = test_service(db);

        let registered = service
            .register(register_request("attendant", "Password123"))
            .await
            .unwrap();
        assert_eq!(registered.user.username, "attendant");
        assert!(!registered.access_token.is_empty());

        let logged_in = service
            .login(LoginRequest {
                username: "attendant".to_string(),
                password: "Password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let db = setup_test_db().await;
        let service = test_service(db);

        service
            .register(register_request("attendant", "Password123"))
            .await
            .unwrap();
        let err = service
            .register(register_request("attendant", "Password456"))
            .await
            .unwrap_err();
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "Username already exists"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let db = setup_test_db().await;
        let service = test_service(db);

        let err = service
            .register(register_request("attendant", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let db = setup_test_db().await;
        let service = test_service(db);

        service
            .register(register_request("attendant", "Password123"))
            .await
            .unwrap();
        let err = service
            .login(LoginRequest {
                username: "attendant".to_string(),
                password: "Password999".to_string(),
            })
            .await
            .unwrap_err();
        match err {
            AppError::AuthError(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_issues_new_access_token() {
        let db = setup_test_db().await;
        let service = test_service(db);

        let registered = service
            .register(register_request("attendant", "Password123"))
            .await
            .unwrap();
        let refreshed = service
            .refresh_token(&registered.refresh_token)
            .await
            .unwrap();
        assert_eq!(refreshed.user.id, registered.user.id);
        assert!(!refreshed.access_token.is_empty());

        // an access token must not pass as a refresh token
        let err = service
            .refresh_token(&registered.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }
}
