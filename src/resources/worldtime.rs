/// Simulation clock advanced once per tick by [`Game`](crate::game::Game).
#[derive(Debug, Clone, Copy)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame: 0,
        }
    }
}

impl WorldTime {
    /// Records a tick of `real_delta` seconds scaled by `time_scale`.
    pub fn advance(&mut self, real_delta: f32) {
        self.delta = real_delta.max(0.0) * self.time_scale;
        self.elapsed += self.delta;
        self.frame += 1;
    }
}
