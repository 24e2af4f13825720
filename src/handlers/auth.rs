use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::create_access_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::error::{AppError, AppResult};
use crate::models::user::{User, UserProfile};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_response(user: User, state: &AppState) -> AppResult<AuthResponse> {
    let access = create_access_token(user.id, &user.email, &state.config)?;
    Ok(AuthResponse {
        token: access.token,
        expires_in: access.expires_in,
        user: user.into(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;
    let email = normalize_email(&body.email);

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&state.db)
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let password_hash = hash_password(&body.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password_hash, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(body.name.trim())
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict("Email already exists".into())
        }
        other => AppError::Database(other),
    })?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(Json(auth_response(user, &state)?))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(normalize_email(&body.email))
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(Json(auth_response(user, &state)?))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_register_request_validation() {
        let ok: RegisterRequest = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","password":"12345678"}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());

        let short_password = RegisterRequest {
            password: "1234".into(),
            ..ok
        };
        let err: AppError = short_password.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(m) if m == "Password must be 8-128 characters"));
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            name: "Ada".into(),
            email: "not-an-email".into(),
            password: "12345678".into(),
        };
        let err: AppError = req.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(m) if m == "Invalid email format"));
    }

    #[test]
    fn test_auth_response_shape() {
        let resp = AuthResponse {
            token: "tok".into(),
            expires_in: 3600,
            user: UserProfile {
                id: Uuid::new_v4(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                created_at: chrono::Utc::now(),
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["token"], "tok");
        assert_eq!(json["expiresIn"], 3600);
        assert_eq!(json["user"]["name"], "Ada");
    }
}
