// Failures while attaching to the host page. The grid core itself never fails.
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    NoWindow,
    CanvasMissing,
    ContextUnavailable(String),
    Listener { event: &'static str, reason: String },
}

impl Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::NoWindow => write!(f, "no global window"),
            SurfaceError::CanvasMissing => write!(f, "canvas ref is not attached to a canvas element"),
            SurfaceError::ContextUnavailable(s) => write!(f, "2d context unavailable: {s}"),
            SurfaceError::Listener { event, reason } => {
                write!(f, "could not listen for {event}: {reason}")
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Render a JS exception for an error message.
pub fn js_reason(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = SurfaceError::Listener { event: "wheel", reason: "denied".into() };
        assert_eq!(err.to_string(), "could not listen for wheel: denied");
        assert!(SurfaceError::ContextUnavailable("null".into()).to_string().contains("null"));
    }
}
