pub mod display;
pub mod donation;
pub mod invitation;
pub mod listing;
pub mod nav_item;
pub mod report;
pub mod role;
pub mod user;
pub mod working_group;
