use run21_types::{
    DEAL_CARD_MS, DEAL_PAUSE_MS, GAME_OVER_GAP_MS, MOVE_CARD_MS, ROUND_MS, SWEEP_MS,
};

/// Engine timing and round configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub seed: u32,
    pub round_ms: u32,
    pub deal_card_ms: u32,
    pub deal_pause_ms: u32,
    pub move_card_ms: u32,
    pub sweep_ms: u32,
    /// Multiplier applied to every popup hold duration.
    pub popup_scale: f32,
    pub game_over_gap_ms: u32,
    pub log_dir: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            round_ms: ROUND_MS,
            deal_card_ms: DEAL_CARD_MS,
            deal_pause_ms: DEAL_PAUSE_MS,
            move_card_ms: MOVE_CARD_MS,
            sweep_ms: SWEEP_MS,
            popup_scale: 1.0,
            game_over_gap_ms: GAME_OVER_GAP_MS,
            log_dir: "logs".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create from `RUN21_*` environment variables
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let ms = |key: &str, fallback: u32| -> u32 {
            env::var(key)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(fallback)
        };

        let popup_scale = env::var("RUN21_POPUP_SCALE")
            .ok()
            .and_then(|s| s.trim().parse::<f32>().ok())
            .filter(|s| s.is_finite() && *s >= 0.0)
            .unwrap_or(defaults.popup_scale);

        let log_dir = env::var("RUN21_LOG_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .unwrap_or(defaults.log_dir);

        Self {
            seed: ms("RUN21_SEED", defaults.seed),
            round_ms: ms("RUN21_ROUND_MS", defaults.round_ms),
            deal_card_ms: ms("RUN21_DEAL_CARD_MS", defaults.deal_card_ms),
            deal_pause_ms: ms("RUN21_DEAL_PAUSE_MS", defaults.deal_pause_ms),
            move_card_ms: ms("RUN21_MOVE_CARD_MS", defaults.move_card_ms),
            sweep_ms: defaults.sweep_ms,
            popup_scale,
            game_over_gap_ms: ms("RUN21_GAME_OVER_GAP_MS", defaults.game_over_gap_ms),
            log_dir,
        }
    }

    /// Every duration set to zero: animations finish on the tick they start
    pub fn instant() -> Self {
        Self {
            deal_card_ms: 0,
            deal_pause_ms: 0,
            move_card_ms: 0,
            sweep_ms: 0,
            popup_scale: 0.0,
            game_over_gap_ms: 0,
            ..Self::default()
        }
    }

    /// Scale a base popup hold duration
    pub fn popup_ms(&self, base_ms: u32) -> u32 {
        (base_ms as f32 * self.popup_scale).round() as u32
    }
}
