/// Failure reported by an external marker localizer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalizeError {
    #[error("color frame could not be read: {0}")]
    UnreadableFrame(String),
    #[error("marker localizer failed: {0}")]
    Backend(String),
}

/// Coarse classification of a [`MarkerDetectError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerFaultKind {
    /// No candidate in the current frame.
    NotFound,
    /// Zero divisor or out-of-domain trigonometric input.
    DegenerateGeometry,
    /// Malformed corner set or a sample outside the depth map.
    IndexFault,
    /// The color frame could not be read; prior state must stay untouched.
    InputFault,
}

/// Errors returned by the marker detector. All of them are per-frame.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MarkerDetectError {
    #[error("no marker candidates in frame")]
    NotFound,

    #[error("marker {id}: expected 4 corners, got {got}")]
    CornerCount { id: u32, got: usize },

    #[error("zero divisor in marker geometry (left span b={left_span}, right span a={right_span})")]
    DivisionFault { left_span: f64, right_span: f64 },

    #[error("acos argument {ratio} out of [-1, 1] (h={width_px}, b={left_span})")]
    GeometryDomain {
        ratio: f64,
        width_px: f64,
        left_span: f64,
    },

    #[error("depth sample [{x}][{y}] outside {width}x{height} depth map")]
    DepthOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error(transparent)]
    Localize(#[from] LocalizeError),
}

impl MarkerDetectError {
    pub fn kind(&self) -> MarkerFaultKind {
        match self {
            MarkerDetectError::NotFound => MarkerFaultKind::NotFound,
            MarkerDetectError::DivisionFault { .. } | MarkerDetectError::GeometryDomain { .. } => {
                MarkerFaultKind::DegenerateGeometry
            }
            MarkerDetectError::CornerCount { .. } | MarkerDetectError::DepthOutOfBounds { .. } => {
                MarkerFaultKind::IndexFault
            }
            MarkerDetectError::Localize(_) => MarkerFaultKind::InputFault,
        }
    }

    #[inline]
    pub fn is_degenerate_geometry(&self) -> bool {
        self.kind() == MarkerFaultKind::DegenerateGeometry
    }
}
