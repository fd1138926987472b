use std::sync::Arc;

use mealsnap_core::application::MealSnapService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: MealSnapService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: MealSnapService) -> Self {
        Self { args, service }
    }
}
