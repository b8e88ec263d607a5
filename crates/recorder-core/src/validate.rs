// crates/recorder-core/src/validate.rs
//
// Shared validation used across the `Set*` family. Each repeats a
// one-line `if` in `recorder_impl.cpp`; factored out once here the way
// the teacher's `helpers/` modules dedupe repeated geometry/time checks.

use crate::error::RecorderError;

/// `width > 0 && height > 0`-style check, used for video size, frame rate,
/// bit rate, sample rate, channel count — anywhere the original just tests
/// `value <= 0`.
pub fn non_zero_positive(value: u32, field: &'static str) -> Result<u32, RecorderError> {
    if value == 0 {
        Err(RecorderError::InvalidParam(field))
    } else {
        Ok(value)
    }
}

/// Same check, for the `int32_t`-typed setters (`SetVideoSize`,
/// `SetAudioSampleRate`, ...) — the original tests `value <= 0` on a
/// signed parameter, so a caller-supplied negative number must be
/// rejected rather than reinterpreted as a huge unsigned one.
pub fn non_zero_positive_i32(value: i32, field: &'static str) -> Result<u32, RecorderError> {
    if value <= 0 {
        Err(RecorderError::InvalidParam(field))
    } else {
        Ok(value as u32)
    }
}

/// `SetCaptureRate`'s compound rejection, preserved verbatim:
/// `(fps > -EPSILON && fps < EPSILON) || fps < 0.0` — i.e. reject anything
/// within `EPSILON` of zero, or negative. A capture rate of exactly `0.0`
/// is therefore rejected even though it is not negative.
pub const EPSILON: f64 = 1e-6;

pub fn capture_rate(fps: f64) -> Result<f64, RecorderError> {
    if (fps > -EPSILON && fps < EPSILON) || fps < 0.0 {
        Err(RecorderError::InvalidParam("capture rate near zero or negative"))
    } else {
        Ok(fps)
    }
}

/// `SetOrientationHint`'s `degree <= 0` rejection — note this excludes
/// zero, which a caller might reasonably expect to mean "no rotation".
/// Preserved as-is; see DESIGN.md.
pub fn orientation_hint(degree: i32) -> Result<i32, RecorderError> {
    if degree <= 0 {
        Err(RecorderError::InvalidParam("orientation hint must be positive"))
    } else {
        Ok(degree)
    }
}

/// `IsValidFileFd`'s `(flags & (O_RDWR|O_WRONLY)) != 0` test, kept
/// independent of the actual `fcntl(F_GETFL)` syscall so this crate does
/// not need a `libc` dependency — `recorder-engine` calls this with the
/// flags it reads from the fd and the platform's `O_RDWR`/`O_WRONLY`
/// constants.
pub fn fd_mode_ok(flags: i32, o_rdwr: i32, o_wronly: i32) -> bool {
    (flags & (o_rdwr | o_wronly)) != 0
}
