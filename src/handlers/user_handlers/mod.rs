mod crud;
mod list;

pub use crud::{delete, detail, edit_form, update};
pub use list::list;
