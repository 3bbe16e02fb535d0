mod flight;
mod input;
mod session;
mod streaming;
