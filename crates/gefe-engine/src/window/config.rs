/// Main window configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,

    /// Size in logical pixels used before (or instead of) maximizing.
    pub initial_size: (u32, u32),

    pub maximized: bool,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Super Perico".to_string(),
            initial_size: (800, 800),
            maximized: true,
            resizable: true,
        }
    }
}
