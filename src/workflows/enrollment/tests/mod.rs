mod allocator;
mod common;
mod lifecycle;
