use crate::api::Directory;

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) directory: Directory,
}
