//! Errores de persistencia.
//! Mapea errores de Diesel / pool a variantes semánticas, y éstas al
//! `StoreError` del contrato `JobStore`.

use crew_core::StoreError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("not found")]
    NotFound,
    #[error("invalid row: {0}")]
    InvalidRow(String),
    #[error("serialization conflict")]
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl PersistenceError {
    /// Traduce al error del contrato, con el id del job afectado.
    pub fn into_store_error(self, job_id: &str) -> StoreError {
        match self {
            Self::NotFound => StoreError::NotFound(job_id.to_string()),
            Self::UniqueViolation(m) | Self::CheckViolation(m) | Self::ForeignKeyViolation(m) => {
                StoreError::Constraint(m)
            }
            Self::InvalidRow(m) => StoreError::InvalidRecord(m),
            other @ (Self::SerializationConflict | Self::TransientIo(_) | Self::Unknown(_)) => {
                StoreError::Unavailable(other.to_string())
            }
        }
    }
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(info.message().to_string()),
                DatabaseErrorKind::CheckViolation => Self::CheckViolation(info.message().to_string()),
                DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(info.message().to_string()),
                DatabaseErrorKind::NotNullViolation => Self::CheckViolation(info.message().to_string()),
                DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                other => Self::Unknown(format!("db error kind {other:?}: {}", info.message())),
            },
            DieselError::DeserializationError(e) => Self::InvalidRow(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<r2d2::Error> for PersistenceError {
    fn from(err: r2d2::Error) -> Self {
        Self::TransientIo(format!("pool checkout: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_store_not_found_with_the_id() {
        let err = PersistenceError::from(DieselError::NotFound);
        assert_eq!(err.into_store_error("J1"), StoreError::NotFound("J1".into()));
    }

    #[test]
    fn connectivity_problems_are_unavailable() {
        let err = PersistenceError::TransientIo("refused".into()).into_store_error("J1");
        assert!(matches!(err, StoreError::Unavailable(ref m) if m.contains("refused")));
    }

    #[test]
    fn constraint_violations_keep_the_message() {
        let err = PersistenceError::UniqueViolation("reports_pkey".into()).into_store_error("J1");
        assert_eq!(err, StoreError::Constraint("reports_pkey".into()));
    }
}
