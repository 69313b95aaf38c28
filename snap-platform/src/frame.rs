use crate::error::{PlatformError, PlatformResult};

/// Where a backend is within `new_frame → imgui_render → render_frame`.
///
/// Dear ImGui asserts when a frame is begun twice or rendered without being
/// begun, so every backend checks the order here before touching the context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum FramePhase {
    #[default]
    Idle,
    Building,
    Finalized,
}

impl FramePhase {
    pub(crate) fn begin(&mut self) -> PlatformResult<()> {
        match self {
            FramePhase::Building => Err(PlatformError::FrameSequence(
                "new_frame called while a frame is still being built",
            )),
            // A finalized but never presented frame is simply dropped
            FramePhase::Idle | FramePhase::Finalized => {
                *self = FramePhase::Building;
                Ok(())
            }
        }
    }

    pub(crate) fn finalize(&mut self) -> PlatformResult<()> {
        match self {
            FramePhase::Building => {
                *self = FramePhase::Finalized;
                Ok(())
            }
            _ => Err(PlatformError::FrameSequence(
                "imgui_render called without a matching new_frame",
            )),
        }
    }

    pub(crate) fn present(&mut self) -> PlatformResult<()> {
        match self {
            FramePhase::Finalized => {
                *self = FramePhase::Idle;
                Ok(())
            }
            _ => Err(PlatformError::FrameSequence(
                "render_frame called before imgui_render",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_returns_to_idle() {
        let mut phase = FramePhase::default();
        phase.begin().unwrap();
        phase.finalize().unwrap();
        phase.present().unwrap();
        assert_eq!(phase, FramePhase::Idle);
    }

    #[test]
    fn double_begin_is_rejected() {
        let mut phase = FramePhase::default();
        phase.begin().unwrap();
        assert!(matches!(
            phase.begin(),
            Err(PlatformError::FrameSequence(_))
        ));
    }

    #[test]
    fn out_of_order_calls_are_rejected() {
        let mut phase = FramePhase::default();
        assert!(phase.finalize().is_err());
        assert!(phase.present().is_err());
        phase.begin().unwrap();
        assert!(phase.present().is_err());
    }

    #[test]
    fn unpresented_frame_can_be_replaced() {
        let mut phase = FramePhase::default();
        phase.begin().unwrap();
        phase.finalize().unwrap();
        phase.begin().unwrap();
        assert_eq!(phase, FramePhase::Building);
    }
}
