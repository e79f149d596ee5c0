//! Where the interpreter sends text

/// Receives `Disp` output, parser warnings, and fatal errors.
///
/// Warnings only arrive when the run enabled them; fatal errors always do.
pub trait MessageSink {
    fn on_message(&mut self, text: &str);
    fn on_warning(&mut self, text: &str);
    fn on_fatal_error(&mut self, text: &str);
}

/// Discards everything
impl MessageSink for () {
    fn on_message(&mut self, _text: &str) {}
    fn on_warning(&mut self, _text: &str) {}
    fn on_fatal_error(&mut self, _text: &str) {}
}
