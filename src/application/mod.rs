//! Application layer driving a checkout session.
//!
//! This module defines the `SessionController`, which owns the session state,
//! calls the payments backend for each operator action and routes every
//! outcome to either the transcript or the operator console.

pub mod controller;
