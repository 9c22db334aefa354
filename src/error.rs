use crate::media::PhotoPath;

pub type GreetingResult<T> = Result<T, GreetingError>;

#[derive(thiserror::Error, Debug)]
pub enum GreetingError {
    #[error("dom error: {0}")]
    Dom(String),

    #[error("missing element #{0}")]
    MissingElement(String),

    #[error("camera unavailable: {0}")]
    CameraDenied(String),

    #[error("photo acquisition already running via {0:?}")]
    AcquisitionBusy(PhotoPath),

    #[error("config error: {0}")]
    Config(String),
}

impl GreetingError {
    pub fn dom(msg: impl Into<String>) -> Self {
        Self::Dom(msg.into())
    }

    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement(id.into())
    }

    pub fn camera(msg: impl Into<String>) -> Self {
        Self::CameraDenied(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for GreetingError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(GreetingError::dom("x").to_string().contains("dom error:"));
        assert_eq!(
            GreetingError::missing("heart-canvas").to_string(),
            "missing element #heart-canvas"
        );
        assert!(GreetingError::camera("NotAllowedError")
            .to_string()
            .starts_with("camera unavailable:"));
        assert!(GreetingError::config("x").to_string().contains("config error:"));
    }

    #[test]
    fn busy_names_the_running_path() {
        let err = GreetingError::AcquisitionBusy(PhotoPath::Camera);
        assert!(err.to_string().contains("Camera"));
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: GreetingError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GreetingError::Config(_)));
    }
}
