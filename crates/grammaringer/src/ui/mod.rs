mod editor_snapshot;
mod server;

pub(crate) use {
    editor_snapshot::EditorSnapshot,
    server::{EditorContext, serve},
};

#[cfg(test)]
pub(crate) use server::{is_editor_origin, router};
