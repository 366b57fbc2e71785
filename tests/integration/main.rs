//! Integration tests for kol-board
//!
//! These tests use wiremock to stand in for the upstream leaderboard page and
//! drive the axum router end-to-end.

mod leaderboard_tests;
