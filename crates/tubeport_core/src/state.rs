use crate::view_model::{AppViewModel, Notification, TaskView};
use crate::{StatusReport, Task, Transition, UrlValidity};

/// Identifies one submit-to-terminal polling chain. Never reused in a session.
pub type ChainId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    url_input: String,
    url_validity: UrlValidity,
    cookies_input: String,
    task: Option<Task>,
    busy: bool,
    active_chain: Option<ChainId>,
    last_chain: ChainId,
    uploads_in_flight: usize,
    notification: Option<Notification>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url: self.url_input.clone(),
            url_validity: self.url_validity,
            cookies: self.cookies_input.clone(),
            busy: self.busy,
            can_submit: self.can_submit(),
            can_reset: self.busy || self.task.is_some(),
            uploads_in_flight: self.uploads_in_flight,
            task: self.task.as_ref().map(TaskView::from_task),
            notification: self.notification.clone(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn active_chain(&self) -> Option<ChainId> {
        self.active_chain
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.uploads_in_flight
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn can_submit(&self) -> bool {
        !self.busy && self.url_validity.is_valid()
    }

    pub(crate) fn url_input(&self) -> &str {
        &self.url_input
    }

    pub(crate) fn cookies_input(&self) -> &str {
        &self.cookies_input
    }

    pub(crate) fn set_url_input(&mut self, raw: String) {
        self.url_validity = UrlValidity::of(&raw);
        self.url_input = raw;
        self.mark_dirty();
    }

    pub(crate) fn set_cookies_input(&mut self, raw: String) {
        self.cookies_input = raw;
        self.mark_dirty();
    }

    /// Drops any previous task and opens a new chain.
    pub(crate) fn begin_chain(&mut self) -> ChainId {
        self.last_chain += 1;
        self.active_chain = Some(self.last_chain);
        self.task = None;
        self.busy = true;
        self.mark_dirty();
        self.last_chain
    }

    /// True if results for `chain` may still be applied.
    pub(crate) fn is_current(&self, chain: ChainId) -> bool {
        self.active_chain == Some(chain)
    }

    pub(crate) fn task_created(&mut self, task_id: String) {
        self.task = Some(Task::pending(task_id));
        self.mark_dirty();
    }

    pub(crate) fn creation_failed(&mut self, message: String) {
        self.task = Some(Task::rejected(message));
        self.end_chain();
    }

    pub(crate) fn apply_report(&mut self, report: StatusReport) {
        let Some(task) = self.task.as_mut() else {
            return;
        };
        if task.apply_report(report) == Transition::Applied {
            if task.is_terminal() {
                self.end_chain();
            }
            self.mark_dirty();
        }
    }

    pub(crate) fn poll_failed(&mut self, message: String) {
        if let Some(task) = self.task.as_mut() {
            task.fail(message);
        }
        self.end_chain();
    }

    fn end_chain(&mut self) {
        self.busy = false;
        self.active_chain = None;
        self.mark_dirty();
    }

    /// Back to the empty form. Chain numbering and uploads carry on.
    pub(crate) fn reset(&mut self) -> Option<ChainId> {
        let cancelled = self.active_chain.take();
        let last_chain = self.last_chain;
        let uploads_in_flight = self.uploads_in_flight;
        *self = Self {
            last_chain,
            uploads_in_flight,
            dirty: true,
            ..Self::default()
        };
        cancelled
    }

    pub(crate) fn upload_started(&mut self) {
        self.uploads_in_flight += 1;
        self.mark_dirty();
    }

    pub(crate) fn upload_finished(&mut self, notification: Notification) {
        self.uploads_in_flight = self.uploads_in_flight.saturating_sub(1);
        self.notification = Some(notification);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_notification(&mut self) {
        if self.notification.take().is_some() {
            self.mark_dirty();
        }
    }
}
