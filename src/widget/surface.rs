use crate::message::Message;

/// What the controller needs from whatever draws it.
pub(crate) trait Surface {
    fn append(&mut self, message: Message);
    fn last_message(&self) -> Option<&Message>;
    fn set_loading(&mut self, loading: bool);
    fn scroll_to_bottom(&mut self);
    fn focus_input(&mut self);
}
