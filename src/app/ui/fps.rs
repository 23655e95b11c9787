use std::collections::VecDeque;

use eframe::egui::Context;

const FPS_SAMPLE_WINDOW: usize = 180;

#[derive(Default)]
pub(in crate::app) struct FpsCounter {
    current: f32,
    samples: VecDeque<f32>,
}

impl FpsCounter {
    pub(in crate::app) fn record(&mut self, ctx: &Context) {
        self.push_frame_time(ctx.input(|input| input.stable_dt));
    }

    fn push_frame_time(&mut self, dt: f32) {
        if dt <= f32::EPSILON {
            return;
        }

        self.current = (1.0 / dt).clamp(0.0, 1000.0);
        self.samples.push_back(self.current);
        while self.samples.len() > FPS_SAMPLE_WINDOW {
            self.samples.pop_front();
        }
    }

    pub(in crate::app) fn display_text(&self) -> Option<String> {
        if self.samples.is_empty() {
            return None;
        }
        let avg = self.samples.iter().sum::<f32>() / self.samples.len() as f32;
        Some(format!("FPS {:.0} | avg {:.1}", self.current, avg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_bounded_and_ignores_zero_dt() {
        let mut fps = FpsCounter::default();
        assert!(fps.display_text().is_none());

        fps.push_frame_time(0.0);
        assert!(fps.display_text().is_none());

        for _ in 0..(FPS_SAMPLE_WINDOW + 20) {
            fps.push_frame_time(1.0 / 50.0);
        }
        assert_eq!(fps.samples.len(), FPS_SAMPLE_WINDOW);
        assert_eq!(fps.display_text().as_deref(), Some("FPS 50 | avg 50.0"));
    }
}
