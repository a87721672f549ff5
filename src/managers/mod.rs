// Smart Bookmark state managers
// Managers own in-memory session state: the bookmark list, its highlight marker, and the add form.

pub mod bookmark_form;
pub mod bookmark_list;
pub mod highlight;
