pub mod samuraifrog;
