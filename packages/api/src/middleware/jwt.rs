use crate::{
    entity::user,
    error::ApiError,
    session_jwt::{self, TokenType},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sea_orm::EntityTrait;

#[derive(Debug, Clone)]
pub struct SessionUser {
    pub sub: String,
}

/// The requesting principal, inserted into request extensions by
/// [`jwt_middleware`] for every request.
#[derive(Debug, Clone)]
pub enum AuthUser {
    Session(SessionUser),
    Unauthorized,
}

impl AuthUser {
    pub fn sub(&self) -> Result<String, ApiError> {
        match self {
            AuthUser::Session(user) => Ok(user.sub.clone()),
            AuthUser::Unauthorized => Err(ApiError::unauthorized(
                "Authentication credentials were not provided",
            )),
        }
    }

    pub async fn get_user(&self, state: &AppState) -> Result<user::Model, ApiError> {
        let sub = self.sub()?;
        user::Entity::find_by_id(&sub)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))
    }

    /// Resolve the principal and require the ADMIN role.
    pub async fn require_admin(&self, state: &AppState) -> Result<user::Model, ApiError> {
        let user = self.get_user(state).await?;
        if user.role != user::UserRole::Admin {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(user)
    }
}

pub async fn jwt_middleware(
    State(_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response<Body>, ApiError> {
    let mut request = request;

    if let Some(auth_header) = request.headers().get(AUTHORIZATION)
        && let Ok(raw) = auth_header.to_str()
    {
        let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
        if !token.is_empty() {
            let claims = session_jwt::verify(token, TokenType::Access)
                .map_err(|e| ApiError::unauthorized(format!("Token is invalid or expired: {}", e)))?;
            let user = AuthUser::Session(SessionUser { sub: claims.sub });
            request.extensions_mut().insert::<AuthUser>(user);
            return Ok(next.run(request).await);
        }
    }

    request
        .extensions_mut()
        .insert::<AuthUser>(AuthUser::Unauthorized);
    Ok(next.run(request).await)
}
