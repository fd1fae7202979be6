//! Load state shared by every data-backed view.

/// What a view shows: a spinner, a single error message, or its data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }
}
