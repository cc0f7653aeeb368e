//! Tests for the verification service

mod concurrency_tests;
