use bp_inference::Pipeline;

pub struct AppState {
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }
}
