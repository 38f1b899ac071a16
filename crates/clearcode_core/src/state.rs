use crate::view_model::ToggleView;

pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settle_delay_ms: u64,
    page_ready: bool,
    delete_responses: bool,
    next_run_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settle_delay(DEFAULT_SETTLE_DELAY_MS)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settle_delay(settle_delay_ms: u64) -> Self {
        Self {
            settle_delay_ms,
            page_ready: false,
            delete_responses: false,
            next_run_id: 1,
        }
    }

    pub fn view(&self) -> ToggleView {
        ToggleView::new(self.delete_responses, self.next_run_id - 1)
    }

    pub fn delete_responses(&self) -> bool {
        self.delete_responses
    }

    pub(crate) fn settle_delay_ms(&self) -> u64 {
        self.settle_delay_ms
    }

    pub(crate) fn page_ready(&self) -> bool {
        self.page_ready
    }

    pub(crate) fn mark_page_ready(&mut self) {
        self.page_ready = true;
    }

    pub(crate) fn set_delete_responses(&mut self, enabled: bool) {
        self.delete_responses = enabled;
    }

    pub(crate) fn allocate_run_id(&mut self) -> u64 {
        let id = self.next_run_id;
        self.next_run_id += 1;
        id
    }
}
