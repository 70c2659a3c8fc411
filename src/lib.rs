mod entry;
pub mod arena;
pub mod red_black_tree;
