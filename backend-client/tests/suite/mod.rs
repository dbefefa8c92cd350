mod blame;
mod tree_entry;
