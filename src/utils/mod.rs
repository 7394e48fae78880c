// ABOUTME: Utility modules for common functionality across the client
// ABOUTME: Contains shared date formatting helpers used by the domain models
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Timestamp formatting for display
pub mod date;
