/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Requested present mode. Falls back to FIFO when the surface lacks it.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface. A hint; support varies.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Pen-friendly settings: mailbox presentation when available and a single
    /// frame in flight, so stamps reach the screen as soon as possible.
    pub fn low_latency() -> Self {
        Self {
            present_mode: wgpu::PresentMode::Mailbox,
            desired_maximum_frame_latency: 1,
            ..Self::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_latency_overrides_present_only() {
        let init = GpuInit::low_latency();
        assert_eq!(init.present_mode, wgpu::PresentMode::Mailbox);
        assert_eq!(init.desired_maximum_frame_latency, 1);
        assert!(init.prefer_srgb);
        assert_eq!(init.required_features, wgpu::Features::empty());
    }
}
