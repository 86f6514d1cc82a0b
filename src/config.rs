use crate::plant::Stage;

/// Runtime configuration for drawing a plant in the terminal
#[derive(Clone)]
pub struct RenderConfig {
    pub seed: Option<String>,
    pub stage: Stage,
    pub scale: u32,
    pub live: bool,
    pub infinite: bool,
    pub print: bool,
    pub time_step: f32,
    pub time_wait: f64,
    pub background: Option<String>,
    pub caption: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seed: None,
            stage: Stage::Bloom,
            scale: 1,
            live: false,
            infinite: false,
            print: false,
            time_step: 0.6,
            time_wait: 4.0,
            background: None,
            caption: None,
        }
    }
}
