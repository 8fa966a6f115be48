use axum::http::StatusCode;

use crate::db::dao::DaoLayerError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Internal(message) => message.as_str(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } | DaoLayerError::InvalidPagination { .. } => {
                AppError::not_found(err.to_string())
            }
            DaoLayerError::Db(_) => AppError::internal(err.to_string()),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::internal(format!("template rendering failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::AppError;
    use crate::db::dao::DaoLayerError;

    #[test]
    fn dao_errors_map_to_page_statuses() {
        let missing = AppError::from(DaoLayerError::NotFound {
            entity: "recipe",
            id: Uuid::nil(),
        });
        let bad_page = AppError::from(DaoLayerError::InvalidPagination {
            page: 0,
            page_size: 10,
        });
        let db = AppError::from(DaoLayerError::Db(DbErr::Custom("boom".to_string())));

        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(bad_page.status(), StatusCode::NOT_FOUND);
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(db.message().contains("boom"));
    }
}
