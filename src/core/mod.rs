pub mod id3v1;
pub mod reconciler;
pub mod resolver;
pub mod tag_view;
pub mod tagger;
pub mod walker;
