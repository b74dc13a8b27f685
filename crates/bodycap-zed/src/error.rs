use thiserror::Error;

/// Status code reported by the tracking service.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    #[error("Failure")]
    Failure,
    #[error("No GPU compatible")]
    NoGpuCompatible,
    #[error("Not enough GPU memory")]
    NotEnoughGpuMemory,
    #[error("Camera not detected")]
    CameraNotDetected,
    #[error("Error code {0}")]
    Other(i32),
}

impl ErrorCode {
    /// Maps a raw SDK status, where zero means success.
    pub fn check(code: i32) -> Result<(), ErrorCode> {
        match code {
            0 => Ok(()),
            1 => Err(ErrorCode::Failure),
            2 => Err(ErrorCode::NoGpuCompatible),
            3 => Err(ErrorCode::NotEnoughGpuMemory),
            4 => Err(ErrorCode::CameraNotDetected),
            other => Err(ErrorCode::Other(other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Camera open: {0}")]
    CameraOpen(ErrorCode),
    #[error("Enable body tracking: {0}")]
    BodyTrackingEnable(ErrorCode),
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;

    #[test]
    pub fn test_check() {
        assert_eq!(ErrorCode::check(0), Ok(()));
        assert_eq!(ErrorCode::check(4), Err(ErrorCode::CameraNotDetected));
        assert_eq!(ErrorCode::check(-1), Err(ErrorCode::Other(-1)));
    }
}
