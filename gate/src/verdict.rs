use serde::Serialize;
use session::model::SessionId;

use crate::error::GateError;

/// Member-facing texts. Callers must branch on `success`/`status`, never on these.
pub mod messages {
    pub const ACCESS_GRANTED: &str = "Acceso concedido al área de miembros";
    pub const WRONG_PASSWORD: &str = "Contraseña incorrecta. Verifica tu clave de acceso.";
    pub const USERNAME_REQUIRED: &str = "El nombre de usuario es requerido";
    pub const PASSWORD_REQUIRED: &str = "La contraseña es requerida";
    pub const INVALID_REQUEST: &str = "Error en la validación de datos";
    pub const NO_ACTIVE_SESSION: &str = "No hay sesión activa";
    pub const INVALID_SESSION: &str = "Sesión inválida";
    pub const LOGGED_OUT: &str = "Sesión cerrada exitosamente";
    pub const SERVER_ERROR: &str = "Error del servidor";
    pub const LOGOUT_FAILED: &str = "Error al cerrar sesión";
}

/// HTTP-equivalent class of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Ok,
    BadRequest,
    Unauthorized,
    ServerError,
}

impl StatusClass {
    pub fn code(self) -> u16 {
        match self {
            StatusClass::Ok => 200,
            StatusClass::BadRequest => 400,
            StatusClass::Unauthorized => 401,
            StatusClass::ServerError => 500,
        }
    }
}

/// Outcome of a gate operation, serialized as `{success, username?, message?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub status: StatusClass,
}

impl Verdict {
    pub fn granted(username: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            success: true,
            username: Some(username.into()),
            message: message.map(str::to_owned),
            status: StatusClass::Ok,
        }
    }

    pub fn logged_out() -> Self {
        Self {
            success: true,
            username: None,
            message: Some(messages::LOGGED_OUT.to_owned()),
            status: StatusClass::Ok,
        }
    }

    pub fn denied(status: StatusClass, message: &str) -> Self {
        Self {
            success: false,
            username: None,
            message: Some(message.to_owned()),
            status,
        }
    }
}

impl From<GateError> for Verdict {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Validation(msg) => Verdict::denied(StatusClass::BadRequest, msg),
            GateError::InvalidCredentials => {
                Verdict::denied(StatusClass::Unauthorized, messages::WRONG_PASSWORD)
            }
            GateError::Unauthenticated(msg) => Verdict::denied(StatusClass::Unauthorized, msg),
            GateError::SessionNotCreated(_) => {
                Verdict::denied(StatusClass::BadRequest, messages::INVALID_REQUEST)
            }
            GateError::Internal { message, .. } => {
                Verdict::denied(StatusClass::ServerError, message)
            }
        }
    }
}

/// Result of the core login: the verdict plus, on success, the identifier the
/// transport must associate with the caller.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub verdict: Verdict,
    pub session_id: Option<SessionId>,
}

impl LoginOutcome {
    pub fn rejected(err: GateError) -> Self {
        Self {
            verdict: err.into(),
            session_id: None,
        }
    }
}
