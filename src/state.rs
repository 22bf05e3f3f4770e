use std::sync::Arc;

use crate::flags::FlagClient;
use crate::items::ItemStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub flags: FlagClient,
}
