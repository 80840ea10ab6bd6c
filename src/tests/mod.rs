mod context;
mod expr;
mod lsystem;
