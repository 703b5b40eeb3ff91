use wq_scrappers::QuizPipeline;

pub struct AppState {
    pub pipeline: QuizPipeline,
}

impl AppState {
    pub fn new(pipeline: QuizPipeline) -> Self {
        Self { pipeline }
    }
}
