use crate::gateway::GatewayError;
use std::fmt;

#[derive(Debug)]
pub enum FivefoldError {
    InvalidConfiguration(String),
    InvalidResponseValue { statement_id: u32, value: u8 },
    UnknownStatement(u32),
    NotReadyToSubmit(String),
    EmptyRegionImage(String),
    EmptyExport,
    Gateway(GatewayError),
    Compose(String),
    Io(std::io::Error),
}

impl fmt::Display for FivefoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FivefoldError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            FivefoldError::InvalidResponseValue {
                statement_id,
                value,
            } => write!(
                f,
                "response {} for statement {} is outside 1..=5",
                value, statement_id
            ),
            FivefoldError::UnknownStatement(id) => {
                write!(f, "statement {} is not in the catalog", id)
            }
            FivefoldError::NotReadyToSubmit(message) => {
                write!(f, "session cannot be submitted: {}", message)
            }
            FivefoldError::EmptyRegionImage(region_id) => {
                write!(f, "region '{}' rasterized to an empty image", region_id)
            }
            FivefoldError::EmptyExport => write!(f, "no regions provided to export"),
            FivefoldError::Gateway(err) => write!(f, "interpretation failed: {}", err),
            FivefoldError::Compose(message) => write!(f, "page composition failed: {}", message),
            FivefoldError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for FivefoldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FivefoldError::Gateway(err) => Some(err),
            FivefoldError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FivefoldError {
    fn from(value: std::io::Error) -> Self {
        FivefoldError::Io(value)
    }
}

impl From<GatewayError> for FivefoldError {
    fn from(value: GatewayError) -> Self {
        FivefoldError::Gateway(value)
    }
}

impl From<lopdf::Error> for FivefoldError {
    fn from(value: lopdf::Error) -> Self {
        FivefoldError::Compose(value.to_string())
    }
}
