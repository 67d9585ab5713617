// "operating system" for single-core microcontrollers: a cooperative,
// run-to-completion task scheduler plus a small demo firmware

#![cfg_attr(not(test), no_std)]

pub mod apps;
pub mod board;
pub mod drivers;
pub mod kernel;
