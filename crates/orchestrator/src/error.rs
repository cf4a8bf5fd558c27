use std::path::PathBuf;

/// Failures surfaced by the orchestration layer.
///
/// The first three variants are terminal: they are the only checked failure
/// conditions a run can hit before any resource exists, and callers are
/// expected to stop rather than retry. Everything else is a programming or
/// environment error caught before (validation) or after (readback) work is
/// submitted to the queue.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No adapter could be acquired from any backend.
    #[error(
        "failed to get adapter from the GPU instance; it looks like this \
         environment does not have a GPU or is not supported"
    )]
    Unsupported(#[source] wgpu::RequestAdapterError),

    /// An adapter exists but refused to hand out a device.
    #[error(
        "failed to get device from GPU adapter; it looks like this \
         environment does not have a GPU or is not supported"
    )]
    DeviceUnavailable(#[source] wgpu::RequestDeviceError),

    /// Shader source could not be read from disk.
    #[error("failed to load shader {}", path.display())]
    ShaderLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A resource or pass description failed validation before any encoding.
    #[error("invalid plan: {0}")]
    Validation(String),

    /// Mapping a staging buffer for readback failed.
    #[error("failed to map staging buffer for readback")]
    Readback(#[source] wgpu::BufferAsyncError),

    /// The device rejected the blocking poll that drives readback mapping.
    #[error("device poll failed while waiting for readback")]
    Poll(#[source] wgpu::PollError),

    /// The map completion callback was dropped without delivering a result.
    #[error("readback completion channel closed before the map result arrived")]
    ReadbackChannel,
}

impl Error {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Error::Validation(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_load_message_names_the_failure_and_path() {
        let err = Error::ShaderLoad {
            path: PathBuf::from("shaders/mandelbrot.wgsl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = err.to_string();
        assert!(message.contains("failed to load shader"), "{message}");
        assert!(message.contains("mandelbrot.wgsl"), "{message}");
    }

    #[test]
    fn validation_message_carries_the_reason() {
        let err = Error::validation("draw references unknown buffer 'quad'");
        assert_eq!(
            err.to_string(),
            "invalid plan: draw references unknown buffer 'quad'"
        );
    }
}
