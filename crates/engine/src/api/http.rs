//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use jojo_domain::{Character, CharacterId, CharacterProfile, PlayStateUpdate, ProposedStandStats};
use jojo_shared::{
    AuthResponse, CharacterData, CreateCharacterRequest, CreateCharacterResponse, LoginRequest,
    MessageResponse, RegisterRequest, StandData, UpdateCharacterRequest, UserData,
};

use super::auth::AuthUser;
use crate::app::App;
use crate::use_cases::{AuthError, AuthSession, CharacterError, NewCharacter, NewStand};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/characters", get(list_characters).post(create_character))
        .route(
            "/characters/{id}",
            get(get_character)
                .patch(update_character)
                .delete(delete_character),
        )
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("JoJo TTRPG API Running!"))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Accounts
// =============================================================================

async fn register(
    State(app): State<Arc<App>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let req = body(payload)?;
    let session = app
        .use_cases
        .auth
        .register(&req.username, &req.email, &req.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(auth_response("User created successfully", session)),
    ))
}

async fn login(
    State(app): State<Arc<App>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = body(payload)?;
    let session = app.use_cases.auth.login(&req.email, &req.password).await?;
    Ok(Json(auth_response("Logged in successfully", session)))
}

// =============================================================================
// Characters
// =============================================================================

async fn create_character(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateCharacterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateCharacterResponse>), ApiError> {
    let req = body(payload)?;
    let character = app
        .use_cases
        .characters
        .create(user_id, new_character(req))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateCharacterResponse {
            message: "Character created successfully".to_string(),
            character: character_data(&character),
        }),
    ))
}

async fn list_characters(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CharacterData>>, ApiError> {
    let characters = app.use_cases.characters.list(user_id).await?;
    Ok(Json(characters.iter().map(character_data).collect()))
}

async fn get_character(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CharacterData>, ApiError> {
    let character = app
        .use_cases
        .characters
        .get(user_id, parse_character_id(&id)?)
        .await?;
    Ok(Json(character_data(&character)))
}

async fn update_character(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCharacterRequest>, JsonRejection>,
) -> Result<Json<CharacterData>, ApiError> {
    let character_id = parse_character_id(&id)?;
    let req = body(payload)?;
    let update = PlayStateUpdate {
        stress: req.stress,
        harm: req.harm,
        special_armor: req.special_armor,
    };
    let character = app
        .use_cases
        .characters
        .update(user_id, character_id, update)
        .await?;
    Ok(Json(character_data(&character)))
}

async fn delete_character(
    State(app): State<Arc<App>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    app.use_cases
        .characters
        .delete(user_id, parse_character_id(&id)?)
        .await?;
    Ok(Json(MessageResponse::new("Character deleted successfully")))
}

// =============================================================================
// Mapping
// =============================================================================

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// Malformed ids cannot name an existing character.
fn parse_character_id(raw: &str) -> Result<CharacterId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Character not found"))
}

fn auth_response(message: &str, auth: AuthSession) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        user: UserData {
            id: auth.user.id.to_uuid(),
            username: auth.user.username,
            email: auth.user.email,
        },
        token: auth.session.token,
        expires_at: auth.session.expires_at,
    }
}

fn new_character(req: CreateCharacterRequest) -> NewCharacter {
    NewCharacter {
        profile: CharacterProfile {
            name: req.name.unwrap_or_default(),
            origin: req.origin,
            vice: req.vice,
            vice_purveyor: req.vice_purveyor,
            friends: req.friends,
            rivals: req.rivals,
        },
        stand: req.stand.map(|stand| NewStand {
            name: stand.name,
            ability: stand.ability,
            stats: ProposedStandStats {
                power: stand.power,
                speed: stand.speed,
                range: stand.range,
                durability: stand.durability,
                precision: stand.precision,
                potential: stand.potential,
            },
        }),
        actions: req.actions,
    }
}

fn character_data(character: &Character) -> CharacterData {
    CharacterData {
        id: character.id.to_uuid(),
        user_id: character.user_id.to_uuid(),
        name: character.name.clone(),
        origin: character.origin.clone(),
        vice: character.vice.clone(),
        vice_purveyor: character.vice_purveyor.clone(),
        friends: character.friends.clone(),
        rivals: character.rivals.clone(),
        actions: character.actions,
        stand: character.stand.as_ref().map(|stand| StandData {
            id: stand.id.to_uuid(),
            character_id: character.id.to_uuid(),
            name: stand.name.clone(),
            ability: stand.ability.clone(),
            power: stand.stats.power,
            speed: stand.stats.speed,
            range: stand.stats.range,
            durability: stand.stats.durability,
            precision: stand.stats.precision,
            potential: stand.stats.potential,
        }),
        stress: character.stress,
        max_stress: character.max_stress,
        harm: character.harm.clone(),
        special_armor: character.special_armor,
        created_at: character.created_at,
        updated_at: character.updated_at,
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(&'static str),
    Forbidden,
    NotFound(&'static str),
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Repo(e) => ApiError::Internal(e.to_string()),
            AuthError::Hashing(detail) => ApiError::Internal(detail),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<CharacterError> for ApiError {
    fn from(e: CharacterError) -> Self {
        match e {
            CharacterError::NotFound => ApiError::NotFound("Character not found"),
            CharacterError::Forbidden => ApiError::Forbidden,
            CharacterError::Invalid(e) => ApiError::BadRequest(e.to_string()),
            CharacterError::Repo(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Unauthorized".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };
        (status, Json(MessageResponse::new(message))).into_response()
    }
}
