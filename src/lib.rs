/// PIN handling: the redacted [`credential::Pin`] input type and the
/// SHA-256 digest stored in its place.
pub mod credential;

/// All logic related to the account balance and its audit trail.
/// State is modified using events, which are created by handling commands
pub mod account;

/// Requests that the shell builds from user input and hands to [`account`].
pub mod command;

/// Teller interface, plus owned and shared implementations.
/// Turns a request into a [`processor::Receipt`] the shell can render.
pub mod processor;

/// Interactive menu and batch script front ends. Lives in the library so
/// the integration tests can drive it with in-memory input and output.
pub mod bin_utils;
