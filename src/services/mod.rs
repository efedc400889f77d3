pub mod availability;
pub mod free_busy;
pub mod schedule;

#[cfg(test)]
mod availability_test;
