pub mod meta;
pub mod option;
pub mod post;
pub mod settings;
pub mod term;
