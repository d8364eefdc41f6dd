pub struct DefaultsConfig {
    pub history_depth: usize,
    pub pulled_dims: [bool; 3],
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            history_depth: 1,
            pulled_dims: [true; 3],
        }
    }
}
