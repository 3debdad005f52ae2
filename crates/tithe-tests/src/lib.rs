//! Shared helpers for Tithe scenario and integration tests.

pub mod helpers;
