use crate::{
    auth::{
        hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest, TokenService,
    },
    config::Config,
    error::{AppError, INVALID_CREDENTIALS, USERNAME_TAKEN},
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// Register a new user
///
/// Hashes the password, stores the user and returns its identity together with
/// a freshly issued token. A taken username yields `409 Conflict`.
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    tokens: web::Data<TokenService>,
    config: web::Data<Config>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        username,
        password,
        role,
    } = register_data.into_inner();

    let existing_user: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(&username)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN.into()));
    }

    let password_hash = hash_password(&password, config.bcrypt_cost)?;

    // A concurrent registration can still win the race; the unique index turns
    // that into the same Conflict through `From<sqlx::Error>`.
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, password, role) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&username)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&**pool)
    .await?;

    let token = tokens.issue(user_id, &username, role)?;
    log::info!("registered user {} ({}) as {}", username, user_id, role);

    Ok(HttpResponse::Created().json(AuthResponse {
        user_id,
        username,
        role,
        token,
    }))
}

/// Login user
///
/// Unknown usernames and wrong passwords produce the same `401`.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password, role FROM users WHERE username = ?",
    )
    .bind(&login_data.username)
    .fetch_optional(&**pool)
    .await?;

    let user = match user {
        Some(user) if verify_password(&login_data.password, &user.password_hash)? => user,
        _ => {
            log::warn!("failed login for {:?}", login_data.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let token = tokens.issue(user.id, &user.username, user.role)?;
    log::info!("user {} logged in", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        user_id: user.id,
        username: user.username,
        role: user.role,
        token,
    }))
}
