//! Capabilities supplied by the hosting application.

/// Asks the user for a new column label.
///
/// Returning `None` means the user cancelled and nothing should change.
pub trait ColumnLabelSource {
    fn request_column_label(&mut self) -> Option<String>;
}

impl<F> ColumnLabelSource for F
where
    F: FnMut() -> Option<String>,
{
    fn request_column_label(&mut self) -> Option<String> {
        self()
    }
}
